// 16 8-bit data registers named V0 to VF, VF doubles as the flag register
// I -> address register, PC starts at 0x200
//
// Stack of 16 return addresses
//
// Delay timer & Sound timer: count down to 0, either once per cycle or at 60Hz
//
// Display res: 64 width, 32 height, sprites are XORed on and wrap around
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      KK: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::{BorrowFlag, Config, TimerMode};
pub use decode::{Instruction, RawInstruction};
pub use emulator::{CycleStatus, Emulator};
pub use error::{ExecError, LoadError};
