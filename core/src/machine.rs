use crate::{display::Display, keypad::Keypad};

pub const MEMORY_SIZE: usize = 0x1000;
pub const ADDRESS_MASK: u16 = 0x0FFF;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const DEFAULT_FONT_BASE: u16 = 0x050;
pub const FONT_GLYPH_SIZE: u16 = 5;

pub static DEFAULT_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Whether the machine fetches instructions or is blocked on FX0A.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecState {
    Running,
    /// Waiting for a key-down edge to store in register `x`
    AwaitingKey { x: usize },
}

/// All mutable CHIP-8 machine state.
#[derive(Clone, Debug)]
pub struct Machine {
    /// General purpose registers
    pub(crate) regs: [u8; 16],
    /// Index register
    pub(crate) index: u16,
    /// Program counter
    pub(crate) pc: u16,
    /// Call stack
    pub(crate) stack: Vec<u16>,
    /// Delay Timer
    pub(crate) delay_timer: u8,
    /// Sound Timer
    pub(crate) sound_timer: u8,
    /// Memory
    pub(crate) memory: Vec<u8>,
    pub(crate) display: Display,
    pub(crate) keypad: Keypad,
    /// Address of the glyph for `0`
    pub(crate) font_base: u16,
    pub(crate) state: ExecState,
}

impl Machine {
    /// Fresh machine with `font` at `font_base` and `rom` at the program start.
    ///
    /// Callers validate that both images fit; see [`Chip8Builder`](crate::Chip8Builder).
    pub(crate) fn new(rom: &[u8], font: &[u8], font_base: u16) -> Machine {
        let mut memory = vec![0u8; MEMORY_SIZE];

        let base = font_base as usize;
        memory[base..base + font.len()].copy_from_slice(font);

        let start = PROGRAM_START as usize;
        memory[start..start + rom.len()].copy_from_slice(rom);

        Machine {
            regs: [0u8; 16],
            index: 0,
            pc: PROGRAM_START,
            stack: Vec::new(),
            delay_timer: 0,
            sound_timer: 0,
            memory,
            display: Display::new(),
            keypad: Keypad::default(),
            font_base,
            state: ExecState::Running,
        }
    }

    pub(crate) fn read_u8(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDRESS_MASK) as usize]
    }

    pub(crate) fn write_u8(&mut self, addr: u16, data: u8) {
        self.memory[(addr & ADDRESS_MASK) as usize] = data;
    }

    /// Big-endian instruction word at `addr`; the second byte wraps past 0xFFF.
    pub(crate) fn read_u16_be(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    pub(crate) fn set_pc(&mut self, addr: u16) {
        self.pc = addr & ADDRESS_MASK;
    }

    pub(crate) fn set_index(&mut self, addr: u16) {
        self.index = addr & ADDRESS_MASK;
    }

    pub(crate) fn skip(&mut self) {
        self.set_pc(self.pc + 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layout() {
        let machine = Machine::new(&[0x12, 0x34], &DEFAULT_FONT, DEFAULT_FONT_BASE);

        assert_eq!(machine.pc, PROGRAM_START);
        assert_eq!(&machine.memory[0x050..0x0A0], &DEFAULT_FONT[..]);
        assert_eq!(machine.read_u16_be(0x200), 0x1234);
        assert_eq!(machine.state, ExecState::Running);
        assert!(machine.stack.is_empty());
        assert!(machine.display.is_blank());
    }

    #[test]
    fn test_addresses_wrap() {
        let mut machine = Machine::new(&[0x00, 0xE0], &DEFAULT_FONT, DEFAULT_FONT_BASE);

        machine.write_u8(0x1FFF, 0xAB);
        assert_eq!(machine.read_u8(0x0FFF), 0xAB);

        machine.write_u8(0x0000, 0xCD);
        assert_eq!(machine.read_u16_be(0x0FFF), 0xABCD);
    }

    #[test]
    fn test_registers_masked() {
        let mut machine = Machine::new(&[0x00, 0xE0], &DEFAULT_FONT, DEFAULT_FONT_BASE);

        machine.set_pc(0x1FFE);
        machine.skip();
        assert_eq!(machine.pc, 0x000);

        machine.set_index(0xF123);
        assert_eq!(machine.index, 0x123);
    }
}
