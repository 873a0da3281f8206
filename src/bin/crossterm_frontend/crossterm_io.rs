use fake_chip_8::emulator::display::{Frame, SCREEN_HEIGHT, SCREEN_WIDTH};
use fake_chip_8::emulator::input::{EmulatorInput, Keypad};
use fake_chip_8::emulator::output::EmulatorOutput;

use super::key_manager::KeyManager;

use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};

pub struct CrosstermInput<'a> {
    key_manager: &'a KeyManager,
}

impl CrosstermInput<'_> {
    pub fn new(key_manager: &KeyManager) -> CrosstermInput<'_> {
        CrosstermInput { key_manager }
    }
}

impl EmulatorInput for CrosstermInput<'_> {
    fn read(&mut self) -> Keypad {
        self.key_manager.keypad()
    }
}

/// Draws the screen inside a box, two terminal cells per pixel.
pub struct CrosstermOutput {
    stdout: Stdout,
    shown: Frame,
}

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        let mut stdout = stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;

        let bottom = SCREEN_HEIGHT + 1;
        let right = 2 * SCREEN_WIDTH + 1;
        for y in 0..=bottom {
            for x in 0..=right {
                let c = match (x, y) {
                    (0, 0) => '┏',
                    (x, 0) if x == right => '┓',
                    (0, y) if y == bottom => '┗',
                    (x, y) if x == right && y == bottom => '┛',
                    (_, y) if y == 0 || y == bottom => '━',
                    (x, _) if x == 0 || x == right => '┃',
                    _ => continue,
                };
                queue!(stdout, cursor::MoveTo(x as u16, y as u16), Print(c))?;
            }
        }
        stdout.flush()?;

        Ok(CrosstermOutput {
            stdout,
            shown: [0; SCREEN_HEIGHT],
        })
    }

    fn plot(&mut self, x: usize, y: usize, lit: bool) -> crossterm::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(2 * x as u16 + 1, y as u16 + 1),
            Print(if lit { "██" } else { "  " })
        )
    }

    /// Redraw only the pixels that changed since the last frame.
    fn render(&mut self, frame: &Frame) -> crossterm::Result<()> {
        for y in 0..SCREEN_HEIGHT {
            let changed = self.shown[y] ^ frame[y];
            if changed == 0 {
                continue;
            }
            for x in 0..SCREEN_WIDTH {
                let mask = 1u64 << (SCREEN_WIDTH - 1 - x);
                if changed & mask != 0 {
                    self.plot(x, y, frame[y] & mask != 0)?;
                }
            }
        }
        self.shown = *frame;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl EmulatorOutput for CrosstermOutput {
    fn draw(&mut self, frame: &Frame) {
        if let Err(e) = self.render(frame) {
            log::warn!("Could not draw frame: {}", e);
        }
    }
}
