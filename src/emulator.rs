use std::{fs::File, io::Read, path::Path};

use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::{BorrowFlag, Config, TimerMode},
    decode::Instruction,
    display::FrameBuffer,
    error::{ExecError, LoadError},
    keyboard::Keyboard,
    memory::{self, font_address, Memory, TypeAddr},
    registers::{IndexRegister, ProgramCounter, Registers, Stack},
    timer::Timer,
};

/// Outcome of a cycle that did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Executed(Instruction),
    /// FX0A found no key down. The program counter did not move and the timers did
    /// not tick, so the next cycle retries the same instruction.
    WaitingForKey,
}

pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    pc: ProgramCounter,
    index: IndexRegister,
    stack: Stack,
    keyboard: Keyboard,
    delay_timer: Timer,
    sound_timer: Timer,
    rng: StdRng,
    config: Config,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(Config::with_seed(seed))
    }

    pub fn with_config(config: Config) -> Self {
        let mut emu = Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            stack: Stack::new(),
            keyboard: Keyboard::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            rng: Self::seeded_rng(&config),
            config,
        };
        emu.initialize();
        emu
    }

    fn seeded_rng(config: &Config) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Puts the machine back into its power-on state: memory holds only the font,
    /// every register, the stack, the keys and the screen are cleared and the
    /// program counter points at 0x200.
    pub fn initialize(&mut self) {
        self.mem.reset();
        self.regs.reset();
        self.stack.reset();
        self.keyboard.reset();
        self.fb.clear_buffer();
        self.pc = ProgramCounter::default();
        self.index = IndexRegister::default();
        self.delay_timer.set(0);
        self.sound_timer.set(0);
        self.rng = Self::seeded_rng(&self.config);
        debug!("emulator initialized with {:?}", self.config);
    }

    /// Resets the machine and copies `bytes` to 0x200.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.initialize();
        self.mem.load_rom(bytes)
    }

    pub fn load_rom_from_reader<R: Read>(&mut self, reader: R) -> Result<(), LoadError> {
        self.initialize();
        let staged = memory::stage_rom(reader)?;
        self.mem.load_rom(&staged)
    }

    pub fn load_rom_by_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        debug!("loading rom from {}", path.display());
        match File::open(path) {
            Ok(file) => self.load_rom_from_reader(file),
            Err(err) => {
                self.initialize();
                Err(err.into())
            }
        }
    }

    pub fn fetch_decode(&self) -> Result<Instruction, ExecError> {
        let raw = self.mem.fetch(self.pc.0)?;
        let ins = Instruction::decode(raw);
        trace!("{:03X}: {} {:?}", self.pc.0, raw, ins);
        Ok(ins)
    }

    /// Runs one fetch, decode and execute step and then ticks the timers if they
    /// are driven per cycle.
    pub fn execute_cycle(&mut self) -> Result<CycleStatus, ExecError> {
        let result = self
            .fetch_decode()
            .and_then(|ins| self.execute_ins(ins));

        if let Err(err) = &result {
            warn!("fault at {:03X}: {}", self.pc.0, err);
        }
        let waiting = matches!(result, Ok(CycleStatus::WaitingForKey));
        if self.config.timer_mode == TimerMode::PerCycle && !waiting {
            self.tick_timers();
        }
        result
    }

    /// Counts both timers down by one. Called by `execute_cycle` in
    /// `TimerMode::PerCycle`, by the host otherwise.
    pub fn tick_timers(&mut self) {
        self.delay_timer.decrement();
        self.sound_timer.decrement();
    }

    /// Applies a decoded instruction. On error nothing but the log has changed.
    pub fn execute_ins(&mut self, ins: Instruction) -> Result<CycleStatus, ExecError> {
        match ins {
            Instruction::ClearScreen => {
                self.fb.clear_buffer();
                self.pc.increment();
            }
            Instruction::Return => {
                let addr = self
                    .stack
                    .pop()
                    .ok_or(ExecError::StackUnderflow { pc: self.pc.0 })?;
                // the stack holds the call itself, step over it
                self.pc.set_addr(addr);
                self.pc.increment();
            }
            Instruction::Jump(addr) => {
                self.pc.set_addr(addr);
            }
            Instruction::Call(addr) => {
                self.stack.push(self.pc.0)?;
                self.pc.set_addr(addr);
            }
            Instruction::JumpWithOffset(addr) => {
                self.pc.set_addr(addr + self.regs.get(0) as TypeAddr);
            }
            Instruction::SkipEqualConstant(vx, kk) => {
                self.skip_if(self.regs.get(vx) == kk);
            }
            Instruction::SkipNotEqualConstant(vx, kk) => {
                self.skip_if(self.regs.get(vx) != kk);
            }
            Instruction::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy));
            }
            Instruction::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy));
            }
            Instruction::SetRegister(vx, kk) => {
                self.regs.set_register(vx, kk);
                self.pc.increment();
            }
            Instruction::AddToRegister(vx, kk) => {
                self.regs.add_to_register(vx, kk);
                self.pc.increment();
            }
            Instruction::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
                self.pc.increment();
            }
            // ALU ops write VF before the result, so with X = F the result wins
            Instruction::Add(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let (sum, carry) = x.overflowing_add(y);
                self.regs.set_flag(carry);
                self.regs.set_register(vx, sum);
                self.pc.increment();
            }
            Instruction::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(x >= y); // no borrow
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.pc.increment();
            }
            Instruction::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let no_borrow = match self.config.borrow_flag {
                    BorrowFlag::Legacy => y != x,
                    BorrowFlag::Canonical => y >= x,
                };
                self.regs.set_flag(no_borrow);
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.pc.increment();
            }
            Instruction::RightShift(vx, _) => {
                let x = self.regs.get(vx);
                self.regs.set_flag(x & 1 == 1);
                self.regs.set_register(vx, x >> 1);
                self.pc.increment();
            }
            Instruction::LeftShift(vx, _) => {
                let x = self.regs.get(vx);
                self.regs.set_flag(x >> 7 == 1);
                self.regs.set_register(vx, x << 1);
                self.pc.increment();
            }
            Instruction::SetIndexRegister(addr) => {
                self.index.set_addr(addr);
                self.pc.increment();
            }
            Instruction::AddToIndex(vx) => {
                self.index.add(self.regs.get(vx));
                self.pc.increment();
            }
            Instruction::Random(vx, kk) => {
                let ransuu: u8 = self.rng.gen_range(0..0xFF);
                self.regs.set_register(vx, ransuu & kk);
                self.pc.increment();
            }
            Instruction::Draw(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                let sprite = self.mem.slice(self.index.0, height as usize)?;
                let collision = self.fb.paint(x, y, sprite);
                self.regs.set_flag(collision);
                self.pc.increment();
            }
            Instruction::SkipIfPressed(vx) => {
                let pressed = self.keyboard.is_pressed(self.regs.get(vx))?;
                self.skip_if(pressed);
            }
            Instruction::SkipIfNotPressed(vx) => {
                let pressed = self.keyboard.is_pressed(self.regs.get(vx))?;
                self.skip_if(!pressed);
            }
            Instruction::GetKey(vx) => match self.keyboard.pressed_key() {
                Some(key) => {
                    self.regs.set_register(vx, key);
                    self.pc.increment();
                }
                None => return Ok(CycleStatus::WaitingForKey),
            },
            Instruction::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.get());
                self.pc.increment();
            }
            Instruction::CopyRegisterToDelay(vx) => {
                self.delay_timer.set(self.regs.get(vx));
                self.pc.increment();
            }
            Instruction::CopyRegisterToSound(vx) => {
                self.sound_timer.set(self.regs.get(vx));
                self.pc.increment();
            }
            Instruction::PointChar(vx) => {
                self.index.set_addr(font_address(self.regs.get(vx)));
                self.pc.increment();
            }
            Instruction::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = self.mem.slice_mut(self.index.0, 3)?;
                digits.copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
                self.pc.increment();
            }
            Instruction::StoreRegistersToMemory(vx) => {
                let src = self.regs.up_to(vx);
                self.mem
                    .slice_mut(self.index.0, src.len())?
                    .copy_from_slice(src);
                self.pc.increment();
            }
            Instruction::LoadRegistersFromMemory(vx) => {
                let dst = self.regs.up_to_mut(vx);
                dst.copy_from_slice(self.mem.slice(self.index.0, dst.len())?);
                self.pc.increment();
            }
            Instruction::Unknown(code) => return Err(ExecError::UnknownOpcode(code)),
        }
        Ok(CycleStatus::Executed(ins))
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc.skip();
        } else {
            self.pc.increment();
        }
    }

    pub fn press_key(&mut self, key: u8) -> Result<(), ExecError> {
        self.keyboard.press(key)
    }

    pub fn release_key(&mut self, key: u8) -> Result<(), ExecError> {
        self.keyboard.release(key)
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn display_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get()
    }

    pub fn pc(&self) -> TypeAddr {
        self.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.index.0
    }

    pub fn sp(&self) -> usize {
        self.stack.sp()
    }

    pub fn register(&self, reg_num: u8) -> u8 {
        self.regs.get(reg_num)
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
