use crate::error::ExecError;
use crate::memory::{TypeAddr, PROGRAM_START};

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
/// VF doubles as the carry, borrow and collision flag.
pub const FLAG_REGISTER: u8 = 0xF;

pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.registers = [0; REGISTER_COUNT];
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[reg_num as usize & 0xF] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set_register(FLAG_REGISTER, on as u8);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[reg_num as usize & 0xF]
    }

    /// V0..=VX
    pub fn up_to(&self, last: u8) -> &[u8] {
        &self.registers[..=(last as usize & 0xF)]
    }

    pub fn up_to_mut(&mut self, last: u8) -> &mut [u8] {
        &mut self.registers[..=(last as usize & 0xF)]
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl Default for ProgramCounter {
    fn default() -> Self {
        ProgramCounter(PROGRAM_START)
    }
}

impl ProgramCounter {
    /// Moves past one instruction.
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn skip(&mut self) {
        self.0 = self.0.wrapping_add(4);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, value: u8) {
        self.0 = self.0.wrapping_add(value as u16);
    }
}

/// Return addresses for 2NNN/00EE. Holds the address of the call instruction itself.
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<(), ExecError> {
        let slot = self
            .addresses
            .get_mut(self.sp)
            .ok_or(ExecError::StackOverflow { pc: addr })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.addresses[self.sp])
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    #[cfg(test)]
    fn is_full(&self) -> bool {
        self.sp == STACK_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps() {
        let mut regs = Registers::new();
        regs.set_register(3, 0xFF);
        regs.add_to_register(3, 2);
        assert_eq!(regs.get(3), 1);
        assert_eq!(regs.get(FLAG_REGISTER), 0);
    }

    #[test]
    fn test_up_to() {
        let mut regs = Registers::new();
        regs.up_to_mut(2).copy_from_slice(&[7, 8, 9]);
        assert_eq!(regs.up_to(3), &[7, 8, 9, 0]);
        assert_eq!(regs.up_to(0xF).len(), REGISTER_COUNT);
    }

    #[test]
    fn test_pc_and_index() {
        let mut pc = ProgramCounter::default();
        assert_eq!(pc.0, 0x200);
        pc.increment();
        assert_eq!(pc.0, 0x202);
        pc.skip();
        assert_eq!(pc.0, 0x206);

        let mut index = IndexRegister::default();
        index.set_addr(0xFFFF);
        index.add(2);
        assert_eq!(index.0, 1);
    }

    #[test]
    fn test_stack_depth() {
        let mut stack = Stack::new();
        for i in 0..STACK_DEPTH as u16 {
            stack.push(0x200 + i * 2).unwrap();
        }
        assert!(stack.is_full());
        assert_eq!(stack.push(0x400), Err(ExecError::StackOverflow { pc: 0x400 }));
        assert_eq!(stack.sp(), STACK_DEPTH);

        for i in (0..STACK_DEPTH as u16).rev() {
            assert_eq!(stack.pop(), Some(0x200 + i * 2));
        }
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.sp(), 0);
    }
}
