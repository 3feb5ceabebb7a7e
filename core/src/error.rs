use thiserror::Error;

/// Errors raised while building or running a [`Chip8`](crate::Chip8).
///
/// Runtime variants are fatal: once returned from a step the interpreter stays
/// faulted and keeps returning the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("stack underflow: return at 0x{pc:03x} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("stack overflow: call at 0x{pc:03x} exceeds the limit of {limit} return addresses")]
    StackOverflow { pc: u16, limit: usize },

    #[error("ROM is too small ({size} bytes), it must hold at least one instruction")]
    RomTooSmall { size: usize },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("font sprite must be {expected} bytes, got {size}")]
    InvalidFont { size: usize, expected: usize },

    #[error("font at 0x{base:03x} does not fit below the program area")]
    InvalidFontBase { base: u16 },
}
