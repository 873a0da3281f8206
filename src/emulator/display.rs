//! The 64x32 monochrome frame buffer.
//!
//! Each row is a `u64` with the leftmost pixel in the most significant bit.

use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

pub type Frame = [u64; SCREEN_HEIGHT];

const EMPTY_FRAME: Frame = [0; SCREEN_HEIGHT];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    rows: Frame,
}

impl FrameBuffer {
    pub fn new() -> FrameBuffer {
        FrameBuffer { rows: EMPTY_FRAME }
    }

    pub fn clear(&mut self) {
        self.rows = EMPTY_FRAME;
    }

    /// XOR `sprite` onto the screen with its top left corner at `(x, y)`.
    ///
    /// Each sprite byte is one row of eight pixels. Rows below the bottom
    /// edge are dropped and pixels right of the last column are cut off,
    /// nothing wraps. Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let x = x % SCREEN_WIDTH;
        let mut collision = false;
        for (offset, &byte) in sprite.iter().enumerate() {
            let row = match self.rows.get_mut(y + offset) {
                Some(row) => row,
                None => break,
            };
            let line = (u64::from(byte) << (SCREEN_WIDTH - 8)) >> x;
            if *row & line != 0 {
                collision = true;
            }
            *row ^= line;
        }
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH
            && self
                .rows
                .get(y)
                .map_or(false, |row| row >> (SCREEN_WIDTH - 1 - x) & 1 == 1)
    }

    pub fn rows(&self) -> &Frame {
        &self.rows
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                write!(f, "{}", if self.pixel(x, y) { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
