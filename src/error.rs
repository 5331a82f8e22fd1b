use thiserror::Error;

use crate::memory::TypeAddr;

/// Failures while bringing a ROM image into memory. The emulator is left in its
/// freshly initialized state whenever one of these is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read rom: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to allocate a {requested} byte staging buffer")]
    Allocation { requested: usize },
    #[error("rom is {size} bytes, at most {max} bytes fit in program memory")]
    Size { size: usize, max: usize },
}

/// Faults raised by a single cycle. The faulting instruction is not applied and the
/// program counter still points at it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    #[error("unknown opcode {0:#06x}")]
    UnknownOpcode(u16),
    #[error("call stack overflow at {pc:#05x}")]
    StackOverflow { pc: TypeAddr },
    #[error("return with empty call stack at {pc:#05x}")]
    StackUnderflow { pc: TypeAddr },
    #[error("address {0:#06x} is outside of memory")]
    AddressOutOfRange(TypeAddr),
    #[error("key {0:#04x} does not exist")]
    InvalidKey(u8),
}
