//! CHIP-8 interpreter core.
//!
//! The [`Chip8`] interpreter owns all machine state and is driven one cycle at a
//! time by a host that supplies key input and elapsed time:
//!
//! ```
//! use std::time::Duration;
//! use chip8_core::{Chip8Builder, KeyInput};
//!
//! // CLEAR; JMP 0x202
//! let mut chip = Chip8Builder::new()
//!     .with_rom(vec![0x00, 0xE0, 0x12, 0x02])
//!     .build()
//!     .unwrap();
//!
//! chip.cycle(&KeyInput::released(), Duration::from_millis(2)).unwrap();
//! assert!(chip.display().is_blank());
//! ```

mod chip8;
mod color;
mod display;
mod error;
mod execute;
mod keypad;
mod machine;
mod opcode;
mod quirks;
mod timer;

pub use chip8::{Chip8, Chip8Builder, StepOutcome};
pub use color::{
    frame_bytes, Chip8Color, Chip8ColorParseError, Palette, DEFAULT_BACKGROUND_COLOR,
    DEFAULT_FOREGROUND_COLOR,
};
pub use display::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::Chip8Error;
pub use keypad::{KeyInput, Keypad};
pub use machine::{ExecState, DEFAULT_FONT, DEFAULT_FONT_BASE, MAX_ROM_SIZE, PROGRAM_START};
pub use opcode::{Instruction, Opcode};
pub use quirks::{Chip8Mode, Chip8ModeParseError, Quirks};
pub use timer::{TimerClock, TIMER_FREQUENCY_HZ};
