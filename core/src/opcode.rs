use std::fmt;

/// A raw 16-bit instruction word split into its nibble and byte fields.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Opcode {
    /// Bits 12-15: instruction class
    pub op: u8,
    /// Bits 8-11: first register
    pub x: u8,
    /// Bits 4-7: second register
    pub y: u8,
    /// Bits 0-3: 4-bit immediate
    pub n: u8,
    /// Bits 0-7: 8-bit immediate
    pub kk: u8,
    /// Bits 0-11: 12-bit address
    pub nnn: u16,
}

impl Opcode {
    pub const fn decode(word: u16) -> Opcode {
        Opcode {
            op: ((word & 0xF000) >> 12) as u8,
            x: ((word & 0x0F00) >> 8) as u8,
            y: ((word & 0x00F0) >> 4) as u8,
            n: (word & 0x000F) as u8,
            kk: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }
}

/// Every base CHIP-8 instruction the interpreter executes.
///
/// Register operands are stored as `usize` indices (0x0..=0xF) so handlers can
/// index the register file directly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XKK
    SkipEqImmediate { x: usize, kk: u8 },
    /// 4XKK
    SkipNeqImmediate { x: usize, kk: u8 },
    /// 5XY0
    SkipEqReg { x: usize, y: usize },
    /// 6XKK
    SetImmediate { x: usize, kk: u8 },
    /// 7XKK
    AddImmediate { x: usize, kk: u8 },
    /// 8XY0
    SetReg { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    AddReg { x: usize, y: usize },
    /// 8XY5
    SubXY { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize, y: usize },
    /// 8XY7
    SubYX { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize, y: usize },
    /// 9XY0
    SkipNeqReg { x: usize, y: usize },
    /// ANNN
    SetIndex { addr: u16 },
    /// BNNN
    JumpWithOffset { x: usize, addr: u16 },
    /// CXKK
    Random { x: usize, kk: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipKeyPressed { x: usize },
    /// EXA1
    SkipKeyNotPressed { x: usize },
    /// FX07
    ReadDelayTimer { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelayTimer { x: usize },
    /// FX18
    SetSoundTimer { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    FontChar { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    StoreRegs { x: usize },
    /// FX65
    LoadRegs { x: usize },
}

impl Instruction {
    /// Maps an instruction word onto an [`Instruction`].
    ///
    /// Returns `None` for words that match no base instruction, including the
    /// `0NNN` machine code routine call.
    pub fn decode(word: u16) -> Option<Instruction> {
        use Instruction::*;

        let Opcode { op, x, y, n, kk, nnn } = Opcode::decode(word);
        let (x, y) = (x as usize, y as usize);

        let inst = match (op, n, kk) {
            (0x0, _, _) => match nnn {
                0x0E0 => ClearScreen,
                0x0EE => Return,
                _ => return None,
            },
            (0x1, _, _) => Jump { addr: nnn },
            (0x2, _, _) => Call { addr: nnn },
            (0x3, _, _) => SkipEqImmediate { x, kk },
            (0x4, _, _) => SkipNeqImmediate { x, kk },
            (0x5, 0x0, _) => SkipEqReg { x, y },
            (0x6, _, _) => SetImmediate { x, kk },
            (0x7, _, _) => AddImmediate { x, kk },
            (0x8, 0x0, _) => SetReg { x, y },
            (0x8, 0x1, _) => Or { x, y },
            (0x8, 0x2, _) => And { x, y },
            (0x8, 0x3, _) => Xor { x, y },
            (0x8, 0x4, _) => AddReg { x, y },
            (0x8, 0x5, _) => SubXY { x, y },
            (0x8, 0x6, _) => ShiftRight { x, y },
            (0x8, 0x7, _) => SubYX { x, y },
            (0x8, 0xE, _) => ShiftLeft { x, y },
            (0x9, 0x0, _) => SkipNeqReg { x, y },
            (0xA, _, _) => SetIndex { addr: nnn },
            (0xB, _, _) => JumpWithOffset { x, addr: nnn },
            (0xC, _, _) => Random { x, kk },
            (0xD, _, _) => Draw { x, y, n },
            (0xE, _, 0x9E) => SkipKeyPressed { x },
            (0xE, _, 0xA1) => SkipKeyNotPressed { x },
            (0xF, _, 0x07) => ReadDelayTimer { x },
            (0xF, _, 0x0A) => WaitKey { x },
            (0xF, _, 0x15) => SetDelayTimer { x },
            (0xF, _, 0x18) => SetSoundTimer { x },
            (0xF, _, 0x1E) => AddIndex { x },
            (0xF, _, 0x29) => FontChar { x },
            (0xF, _, 0x33) => StoreBcd { x },
            (0xF, _, 0x55) => StoreRegs { x },
            (0xF, _, 0x65) => LoadRegs { x },
            _ => return None,
        };

        Some(inst)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLEAR"),
            Return => write!(f, "RET"),
            Jump { addr } => write!(f, "JMP 0x{:03x}", addr),
            Call { addr } => write!(f, "CALL 0x{:03x}", addr),
            SkipEqImmediate { x, kk } => write!(f, "SKIP V{:x}=={:02x}", x, kk),
            SkipNeqImmediate { x, kk } => write!(f, "SKIP V{:x}!={:02x}", x, kk),
            SkipEqReg { x, y } => write!(f, "SKIP V{:x}==V{:x}", x, y),
            SetImmediate { x, kk } => write!(f, "SET V{:x} {:02x}", x, kk),
            AddImmediate { x, kk } => write!(f, "ADD V{:x} {:02x}", x, kk),
            SetReg { x, y } => write!(f, "SET V{:x} V{:x}", x, y),
            Or { x, y } => write!(f, "OR V{:x} V{:x}", x, y),
            And { x, y } => write!(f, "AND V{:x} V{:x}", x, y),
            Xor { x, y } => write!(f, "XOR V{:x} V{:x}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:x} V{:x}", x, y),
            SubXY { x, y } => write!(f, "SUB V{:x} V{:x}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:x} V{:x}", x, y),
            SubYX { x, y } => write!(f, "SUB2 V{:x} V{:x}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:x} V{:x}", x, y),
            SkipNeqReg { x, y } => write!(f, "SKIP V{:x}!=V{:x}", x, y),
            SetIndex { addr } => write!(f, "SET I 0x{:03x}", addr),
            JumpWithOffset { x, addr } => write!(f, "JMP 0x{:03x} V0|V{:x}", addr, x),
            Random { x, kk } => write!(f, "RNG V{:x} 0x{:02x}", x, kk),
            Draw { x, y, n } => write!(f, "DISPLAY V{:x} V{:x} {:x}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKIP KEY V{:x}", x),
            SkipKeyNotPressed { x } => write!(f, "SKIP !KEY V{:x}", x),
            ReadDelayTimer { x } => write!(f, "SET V{:x} DT", x),
            WaitKey { x } => write!(f, "WAIT KEY V{:x}", x),
            SetDelayTimer { x } => write!(f, "SET DT V{:x}", x),
            SetSoundTimer { x } => write!(f, "SET ST V{:x}", x),
            AddIndex { x } => write!(f, "ADD I V{:x}", x),
            FontChar { x } => write!(f, "FONT V{:x}", x),
            StoreBcd { x } => write!(f, "BCD V{:x}", x),
            StoreRegs { x } => write!(f, "STORE V{:x}", x),
            LoadRegs { x } => write!(f, "LOAD V{:x}", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        let op = Opcode::decode(0xD12F);

        assert_eq!(op.op, 0xD);
        assert_eq!(op.x, 0x1);
        assert_eq!(op.y, 0x2);
        assert_eq!(op.n, 0xF);
        assert_eq!(op.kk, 0x2F);
        assert_eq!(op.nnn, 0x12F);
    }

    #[test]
    fn test_decode_extremes() {
        assert_eq!(
            Opcode::decode(0x0000),
            Opcode { op: 0, x: 0, y: 0, n: 0, kk: 0, nnn: 0 }
        );
        assert_eq!(
            Opcode::decode(0xFFFF),
            Opcode { op: 0xF, x: 0xF, y: 0xF, n: 0xF, kk: 0xFF, nnn: 0xFFF }
        );
    }

    #[test]
    fn test_decode_instructions() {
        use Instruction::*;

        assert_eq!(Instruction::decode(0x00E0), Some(ClearScreen));
        assert_eq!(Instruction::decode(0x00EE), Some(Return));
        assert_eq!(Instruction::decode(0x1ABC), Some(Jump { addr: 0xABC }));
        assert_eq!(Instruction::decode(0x5AB0), Some(SkipEqReg { x: 0xA, y: 0xB }));
        assert_eq!(Instruction::decode(0x8126), Some(ShiftRight { x: 0x1, y: 0x2 }));
        assert_eq!(Instruction::decode(0x812E), Some(ShiftLeft { x: 0x1, y: 0x2 }));
        assert_eq!(
            Instruction::decode(0xB3F0),
            Some(JumpWithOffset { x: 0x3, addr: 0x3F0 })
        );
        assert_eq!(Instruction::decode(0xD015), Some(Draw { x: 0x0, y: 0x1, n: 0x5 }));
        assert_eq!(Instruction::decode(0xE49E), Some(SkipKeyPressed { x: 0x4 }));
        assert_eq!(Instruction::decode(0xF70A), Some(WaitKey { x: 0x7 }));
        assert_eq!(Instruction::decode(0xFF65), Some(LoadRegs { x: 0xF }));
    }

    #[test]
    fn test_decode_unknown() {
        // Machine code routine
        assert_eq!(Instruction::decode(0x0123), None);
        assert_eq!(Instruction::decode(0x0000), None);
        // Bad secondary field
        assert_eq!(Instruction::decode(0x5121), None);
        assert_eq!(Instruction::decode(0x8128), None);
        assert_eq!(Instruction::decode(0x812F), None);
        assert_eq!(Instruction::decode(0x9121), None);
        assert_eq!(Instruction::decode(0xE100), None);
        assert_eq!(Instruction::decode(0xF1FF), None);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::ClearScreen.to_string(), "CLEAR");
        assert_eq!(Instruction::Jump { addr: 0x200 }.to_string(), "JMP 0x200");
        assert_eq!(
            Instruction::AddReg { x: 0xA, y: 0x1 }.to_string(),
            "ADD Va V1"
        );
    }
}
