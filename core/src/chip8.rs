// CHIP-8 interpreter
//
// Useful links:
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
// * [CHIP-8 opcode table](https://chip8.gulrak.net/)
// * [CHIP-8 test suite](https://github.com/Timendus/chip8-test-suite)
//

use std::time::Duration;

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    display::Display,
    error::Chip8Error,
    keypad::KeyInput,
    machine::{
        ExecState, Machine, DEFAULT_FONT, DEFAULT_FONT_BASE, MAX_ROM_SIZE, PROGRAM_START,
    },
    opcode::Instruction,
    quirks::{Chip8Mode, Quirks},
    timer::TimerClock,
};

/// What a single [`Chip8::step`] did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    /// Instruction fetched and executed
    Executed(Instruction),
    /// Word matched no instruction and was skipped
    Unhandled(u16),
    /// Blocked on FX0A, no key-down edge this cycle
    Waiting,
    /// FX0A completed with the given key
    KeyReceived(u8),
}

pub struct Chip8Builder {
    /// ROM
    rom: Option<Vec<u8>>,
    /// Font sprite
    font: Option<Vec<u8>>,
    /// Font location in memory
    font_base: u16,
    /// PRNG Seed
    rng_seed: Option<u64>,
    /// Caller supplied random source, overrides the seed
    rng: Option<Box<dyn RngCore + Send>>,
    quirks: Quirks,
}

pub struct Chip8 {
    machine: Machine,
    quirks: Quirks,
    /// PRNG Generator
    rng: Box<dyn RngCore + Send>,
    timer_clock: TimerClock,
    /// Fatal error latched by a failed step
    fault: Option<Chip8Error>,
    unhandled: u64,
}

impl Default for Chip8Builder {
    fn default() -> Self {
        Chip8Builder::new()
    }
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder {
            rom: None,
            font: None,
            font_base: DEFAULT_FONT_BASE,
            rng_seed: None,
            rng: None,
            quirks: Quirks::default(),
        }
    }

    pub fn with_rom(mut self, rom: Vec<u8>) -> Self {
        self.rom = Some(rom);
        self
    }

    pub fn with_font(mut self, font: Vec<u8>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_font_base(mut self, base: u16) -> Self {
        self.font_base = base;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn with_mode(mut self, mode: Chip8Mode) -> Self {
        self.quirks = Quirks::for_mode(mode);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn build(self) -> Result<Chip8, Chip8Error> {
        let rom = self.rom.unwrap_or_default();
        if rom.len() < 2 {
            return Err(Chip8Error::RomTooSmall { size: rom.len() });
        }
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let font = self.font.as_deref().unwrap_or(&DEFAULT_FONT[..]);
        if font.len() != DEFAULT_FONT.len() {
            return Err(Chip8Error::InvalidFont {
                size: font.len(),
                expected: DEFAULT_FONT.len(),
            });
        }
        if self.font_base as usize + font.len() > PROGRAM_START as usize {
            return Err(Chip8Error::InvalidFontBase {
                base: self.font_base,
            });
        }

        // Pseudo random number generator
        let rng: Box<dyn RngCore + Send> = match (self.rng, self.rng_seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(StdRng::seed_from_u64(seed)),
            (None, None) => Box::new(StdRng::from_entropy()),
        };

        log::debug!(
            "loaded {} byte ROM, font at 0x{:03x}, quirks: {:?}",
            rom.len(),
            self.font_base,
            self.quirks
        );

        Ok(Chip8 {
            machine: Machine::new(&rom, font, self.font_base),
            quirks: self.quirks,
            rng,
            timer_clock: TimerClock::new(),
            fault: None,
            unhandled: 0,
        })
    }
}

impl Chip8 {
    pub fn display(&self) -> &Display {
        &self.machine.display
    }

    /// Returns true once after every clear or draw.
    pub fn display_changed(&mut self) -> bool {
        self.machine.display.take_dirty()
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.machine.regs
    }

    pub fn index(&self) -> u16 {
        self.machine.index
    }

    pub fn program_counter(&self) -> u16 {
        self.machine.pc
    }

    pub fn stack(&self) -> &[u16] {
        &self.machine.stack
    }

    pub fn memory(&self) -> &[u8] {
        &self.machine.memory
    }

    pub fn delay_timer(&self) -> u8 {
        self.machine.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.sound_timer
    }

    /// The sound collaborator should beep while this is true.
    pub fn sound_active(&self) -> bool {
        self.machine.sound_timer > 0
    }

    pub fn exec_state(&self) -> ExecState {
        self.machine.state
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    pub fn unhandled_opcodes(&self) -> u64 {
        self.unhandled
    }

    pub fn fault(&self) -> Option<&Chip8Error> {
        self.fault.as_ref()
    }

    /// Run one full cycle: refresh the keypad, step one instruction, then
    /// advance the timers by `elapsed`.
    pub fn cycle(&mut self, input: &KeyInput, elapsed: Duration) -> Result<StepOutcome, Chip8Error> {
        self.machine.keypad.update(input);
        let outcome = self.step()?;
        self.tick_timers(elapsed);
        Ok(outcome)
    }

    /// Execute one CHIP-8 instruction, or one poll of a pending key wait.
    pub fn step(&mut self) -> Result<StepOutcome, Chip8Error> {
        if let Some(err) = &self.fault {
            return Err(err.clone());
        }

        let res = match self.machine.state {
            ExecState::AwaitingKey { x } => Ok(self.poll_key(x)),
            ExecState::Running => self.fetch_execute(),
        };

        self.machine.keypad.clear_pressed();

        if let Err(err) = &res {
            log::error!("{}", err);
            self.fault = Some(err.clone());
        }

        res
    }

    fn fetch_execute(&mut self) -> Result<StepOutcome, Chip8Error> {
        let at = self.machine.pc;
        let word = self.machine.read_u16_be(at);
        self.machine.set_pc(at + 2);

        let Some(inst) = Instruction::decode(word) else {
            self.unhandled += 1;
            log::warn!("0x{:03x}: unhandled instruction 0x{:04x}", at, word);
            return Ok(StepOutcome::Unhandled(word));
        };

        log::trace!("0x{:03x}: 0x{:04x} {}", at, word, inst);

        if let Err(err) = self.machine.execute(inst, &self.quirks, self.rng.as_mut()) {
            self.machine.pc = at;
            return Err(err);
        }

        if let ExecState::AwaitingKey { x } = self.machine.state {
            log::debug!("0x{:03x}: waiting for key into V{:x}", at, x);
            return Ok(StepOutcome::Waiting);
        }

        Ok(StepOutcome::Executed(inst))
    }

    fn poll_key(&mut self, x: usize) -> StepOutcome {
        match self.machine.keypad.last_pressed() {
            Some(key) => {
                log::debug!("key 0x{:x} stored in V{:x}", key, x);
                self.machine.regs[x] = key;
                self.machine.state = ExecState::Running;
                StepOutcome::KeyReceived(key)
            }
            None => StepOutcome::Waiting,
        }
    }

    /// Advance the 60 Hz timers by the elapsed host time.
    ///
    /// Returns the number of timer ticks that were due.
    pub fn tick_timers(&mut self, elapsed: Duration) -> u64 {
        let ticks = self.timer_clock.advance(elapsed);
        let dec = ticks.min(u8::MAX as u64) as u8;
        self.machine.delay_timer = self.machine.delay_timer.saturating_sub(dec);
        self.machine.sound_timer = self.machine.sound_timer.saturating_sub(dec);
        ticks
    }

    /// Single 60 Hz timer tick for hosts running their own timer clock.
    pub fn step_timer(&mut self) {
        if self.machine.delay_timer > 0 {
            self.machine.delay_timer -= 1;
        }

        if self.machine.sound_timer > 0 {
            self.machine.sound_timer -= 1;
        }
    }
}
