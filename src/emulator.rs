//! The virtual machine and the traits connecting it to a screen and a keypad.

pub mod display;
pub mod emulator;
pub mod error;
pub mod input;
pub mod instruction;
pub mod key_wait;
pub mod memory;
pub mod output;
pub mod registers;
pub mod rom;
pub mod trace;

pub use emulator::Emulator;
pub use error::{Error, Result};
