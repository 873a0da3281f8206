use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// None of these are recovered inside the emulator. The instruction that
/// produced the error is abandoned and the driver decides what happens next.
#[derive(Debug, Error)]
pub enum Error {
    /// An instruction addressed memory outside the address space.
    #[error("memory access at {addr:#06x} is outside the {size}-byte address space")]
    MemoryOutOfBounds { addr: usize, size: usize },

    /// A register index outside `V0..=VF`.
    #[error("register index {index} is outside V0..=VF")]
    RegisterOutOfBounds { index: usize },

    /// A decoded instruction with no defined behaviour.
    #[error("unsupported opcode {0:#06x}")]
    UnsupportedOpcode(u16),

    /// `00EE` executed with nothing on the call stack.
    #[error("return with an empty call stack")]
    StackUnderflow,

    /// Subroutine calls nested deeper than the stack allows.
    #[error("call stack exceeded {0} entries")]
    StackOverflow(usize),

    /// The program image does not fit after the program start address.
    #[error("program of {size} bytes does not fit in {capacity} bytes of program memory")]
    RomTooLarge { size: usize, capacity: usize },

    /// The ROM file could not be read.
    #[error("could not read rom {path:?}")]
    RomRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no input device attached")]
    InputUnavailable,

    #[error("no display attached")]
    DisplayUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
