use rand::RngCore;

use crate::{
    display::{SCREEN_HEIGHT, SCREEN_WIDTH},
    error::Chip8Error,
    machine::{ExecState, Machine, ADDRESS_MASK, FONT_GLYPH_SIZE},
    opcode::Instruction,
    quirks::Quirks,
};

const FLAG: usize = 0xF;

impl Machine {
    /// Apply a single decoded instruction.
    ///
    /// The program counter already points past the instruction. A handler that
    /// fails leaves the machine untouched.
    pub(crate) fn execute(
        &mut self,
        inst: Instruction,
        quirks: &Quirks,
        rng: &mut dyn RngCore,
    ) -> Result<(), Chip8Error> {
        use Instruction::*;

        match inst {
            ClearScreen => self.display.clear(),
            Return => self.ret()?,
            Jump { addr } => self.set_pc(addr),
            Call { addr } => self.call(addr, quirks.stack_limit)?,
            SkipEqImmediate { x, kk } => self.skip_if(self.regs[x] == kk),
            SkipNeqImmediate { x, kk } => self.skip_if(self.regs[x] != kk),
            SkipEqReg { x, y } => self.skip_if(self.regs[x] == self.regs[y]),
            SkipNeqReg { x, y } => self.skip_if(self.regs[x] != self.regs[y]),
            SetImmediate { x, kk } => self.regs[x] = kk,
            AddImmediate { x, kk } => self.regs[x] = self.regs[x].wrapping_add(kk),
            SetReg { x, y } => self.regs[x] = self.regs[y],
            Or { x, y } => self.logic(x, y, quirks, |a, b| a | b),
            And { x, y } => self.logic(x, y, quirks, |a, b| a & b),
            Xor { x, y } => self.logic(x, y, quirks, |a, b| a ^ b),
            AddReg { x, y } => {
                let (res, carry) = self.regs[x].overflowing_add(self.regs[y]);
                self.set_with_flag(x, res, carry);
            }
            SubXY { x, y } => {
                let (res, borrow) = self.regs[x].overflowing_sub(self.regs[y]);
                self.set_with_flag(x, res, !borrow);
            }
            SubYX { x, y } => {
                let (res, borrow) = self.regs[y].overflowing_sub(self.regs[x]);
                self.set_with_flag(x, res, !borrow);
            }
            ShiftRight { x, y } => {
                let src = self.shift_source(x, y, quirks);
                self.set_with_flag(x, src >> 1, src & 0x01 != 0);
            }
            ShiftLeft { x, y } => {
                let src = self.shift_source(x, y, quirks);
                self.set_with_flag(x, src << 1, src & 0x80 != 0);
            }
            SetIndex { addr } => self.set_index(addr),
            JumpWithOffset { x, addr } => {
                let offset = if quirks.jump_with_offset_uses_vx {
                    self.regs[x]
                } else {
                    self.regs[0]
                };
                self.set_pc(addr + offset as u16);
            }
            Random { x, kk } => {
                let n = rng.next_u32() as u8;
                self.regs[x] = n & kk;
            }
            Draw { x, y, n } => self.draw(x, y, n, quirks.draw_wraps_sprites),
            SkipKeyPressed { x } => self.skip_if(self.keypad.is_down(self.regs[x])),
            SkipKeyNotPressed { x } => self.skip_if(!self.keypad.is_down(self.regs[x])),
            ReadDelayTimer { x } => self.regs[x] = self.delay_timer,
            WaitKey { x } => self.wait_key(x),
            SetDelayTimer { x } => self.delay_timer = self.regs[x],
            SetSoundTimer { x } => self.sound_timer = self.regs[x],
            AddIndex { x } => {
                let sum = self.index + self.regs[x] as u16;
                self.set_index(sum);
                if quirks.add_index_sets_overflow_flag {
                    self.regs[FLAG] = (sum > ADDRESS_MASK) as u8;
                }
            }
            FontChar { x } => {
                let glyph = (self.regs[x] & 0xF) as u16;
                self.set_index(self.font_base + glyph * FONT_GLYPH_SIZE);
            }
            StoreBcd { x } => {
                let val = self.regs[x];
                self.write_u8(self.index, val / 100);
                self.write_u8(self.index + 1, (val / 10) % 10);
                self.write_u8(self.index + 2, val % 10);
            }
            StoreRegs { x } => {
                for i in 0..=x {
                    self.write_u8(self.index + i as u16, self.regs[i]);
                }
                self.advance_index(x, quirks);
            }
            LoadRegs { x } => {
                for i in 0..=x {
                    self.regs[i] = self.read_u8(self.index + i as u16);
                }
                self.advance_index(x, quirks);
            }
        }

        Ok(())
    }

    // 00EE
    fn ret(&mut self) -> Result<(), Chip8Error> {
        let prev = self.stack.pop().ok_or(Chip8Error::StackUnderflow {
            pc: self.pc.wrapping_sub(2) & ADDRESS_MASK,
        })?;
        self.set_pc(prev);
        Ok(())
    }

    // 2NNN
    fn call(&mut self, addr: u16, limit: Option<usize>) -> Result<(), Chip8Error> {
        if let Some(limit) = limit {
            if self.stack.len() >= limit {
                return Err(Chip8Error::StackOverflow {
                    pc: self.pc.wrapping_sub(2) & ADDRESS_MASK,
                    limit,
                });
            }
        }
        self.stack.push(self.pc);
        self.set_pc(addr);
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.skip();
        }
    }

    /// VF is written after the result so it wins when X is F.
    fn set_with_flag(&mut self, x: usize, res: u8, flag: bool) {
        self.regs[x] = res;
        self.regs[FLAG] = flag as u8;
    }

    fn logic(&mut self, x: usize, y: usize, quirks: &Quirks, op: impl Fn(u8, u8) -> u8) {
        self.regs[x] = op(self.regs[x], self.regs[y]);
        if quirks.logic_ops_reset_flag {
            self.regs[FLAG] = 0;
        }
    }

    fn shift_source(&self, x: usize, y: usize, quirks: &Quirks) -> u8 {
        if quirks.shift_uses_secondary_register {
            self.regs[y]
        } else {
            self.regs[x]
        }
    }

    // DXYN
    fn draw(&mut self, x: usize, y: usize, n: u8, wrap: bool) {
        // Origin is always wrapped, only the sprite body may be clipped
        let ox = self.regs[x] as usize % SCREEN_WIDTH;
        let oy = self.regs[y] as usize % SCREEN_HEIGHT;

        let mut collision = false;

        for row in 0..n as usize {
            let mut py = oy + row;
            if py >= SCREEN_HEIGHT {
                if !wrap {
                    break;
                }
                py %= SCREEN_HEIGHT;
            }

            let data = self.read_u8(self.index + row as u16);

            for col in 0..8 {
                if data & (0x80 >> col) == 0 {
                    continue;
                }

                let mut px = ox + col;
                if px >= SCREEN_WIDTH {
                    if !wrap {
                        break;
                    }
                    px %= SCREEN_WIDTH;
                }

                collision |= self.display.flip(px, py);
            }
        }

        self.regs[FLAG] = collision as u8;
    }

    // FX0A
    fn wait_key(&mut self, x: usize) {
        match self.keypad.last_pressed() {
            Some(key) => self.regs[x] = key,
            None => self.state = ExecState::AwaitingKey { x },
        }
    }

    fn advance_index(&mut self, x: usize, quirks: &Quirks) {
        if quirks.bulk_register_ops_increment_index {
            self.set_index(self.index + x as u16 + 1);
        }
    }
}
