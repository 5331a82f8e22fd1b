use std::fmt;

use crate::memory::TypeAddr;

/// A fetched 16 bit opcode, split into hex digits on demand.
///
/// Digits are numbered 1..=4 from the most significant end, so for `0xD12F`
/// digit 1 is `D`, digit 2 is `1` (X), digit 3 is `2` (Y) and digit 4 is `F` (N).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction(pub u16);

impl RawInstruction {
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        RawInstruction(((hi as u16) << 8) | lo as u16)
    }

    // n is starting digit, m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        debug_assert!(n >= 1 && m >= 1 && n + m <= 5);
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        ((self.0 as u32 >> shift_places) & mask) as u16
    }

    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl fmt::Display for RawInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// Every instruction the interpreter understands. Register operands are register
/// numbers (0..=0xF), not values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0
    ClearScreen,
    // 00EE
    Return,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    Call(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),

    // 3XKK
    SkipEqualConstant(u8, u8),
    // 4XKK
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XKK
    SetRegister(u8, u8),
    // 7XKK, wraps and leaves VF alone
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5, VX = VX - VY
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7, VX = VY - VX
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // FX1E
    AddToIndex(u8),
    // CXKK
    Random(u8, u8),

    // DXYN
    // draw an N row sprite from I at (VX, VY), VF = collision
    Draw(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),
    // FX0A
    GetKey(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),

    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegistersToMemory(u8),
    // FX65
    LoadRegistersFromMemory(u8),

    Unknown(u16),
}

impl Instruction {
    /// Decodes an opcode. Never fails: anything outside the instruction set comes
    /// back as `Unknown` and is reported when executed.
    pub fn decode(raw: RawInstruction) -> Self {
        let (x, y) = (raw.x(), raw.y());

        match raw.family() {
            // only the low nibble picks between clear and return
            0x0 => match raw.n() {
                0x0 => Self::ClearScreen,
                0xE => Self::Return,
                _ => Self::Unknown(raw.0),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::Call(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.kk()),
            0x4 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.kk()),
            0x7 => Self::AddToRegister(x, raw.kk()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unknown(raw.0),
            },
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.kk()),
            0xD => Self::Draw(x, y, raw.n()),
            0xE => match raw.kk() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unknown(raw.0),
            },
            0xF => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegistersToMemory(x),
                0x65 => Self::LoadRegistersFromMemory(x),
                _ => Self::Unknown(raw.0),
            },
            _ => unreachable!("opcode family is a single hex digit"),
        }
    }
}

impl From<u16> for Instruction {
    fn from(code: u16) -> Self {
        Self::decode(RawInstruction(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_manip() {
        let raw = RawInstruction(0x4CEE);
        assert_eq!(raw.nth_m_digits(2, 1), 0xC);
        assert_eq!(raw.nth_m_digits(3, 1), 0xE);
        assert_eq!(raw.nth_m_digits(1, 1), 0x4);

        assert_eq!(raw.nth_m_digits(1, 2), 0x4C);
        assert_eq!(raw.nth_m_digits(2, 2), 0xCE);
        assert_eq!(raw.nth_m_digits(2, 3), 0xCEE);
        assert_eq!(raw.nth_m_digits(1, 4), 0x4CEE);
    }

    #[test]
    fn test_fields() {
        let raw = RawInstruction::from_bytes(0xD1, 0x2F);
        assert_eq!(raw.family(), 0xD);
        assert_eq!(raw.x(), 0x1);
        assert_eq!(raw.y(), 0x2);
        assert_eq!(raw.n(), 0xF);
        assert_eq!(raw.kk(), 0x2F);
        assert_eq!(raw.nnn(), 0x12F);
        assert_eq!(raw.to_string(), "D12F");
    }

    #[test]
    fn test_decode_families() {
        assert_eq!(Instruction::from(0x00E0), Instruction::ClearScreen);
        assert_eq!(Instruction::from(0x00EE), Instruction::Return);
        assert_eq!(Instruction::from(0x1ABC), Instruction::Jump(0xABC));
        assert_eq!(Instruction::from(0x2300), Instruction::Call(0x300));
        assert_eq!(Instruction::from(0x3A42), Instruction::SkipEqualConstant(0xA, 0x42));
        assert_eq!(Instruction::from(0x4A42), Instruction::SkipNotEqualConstant(0xA, 0x42));
        assert_eq!(Instruction::from(0x5120), Instruction::SkipEqualRegister(1, 2));
        assert_eq!(Instruction::from(0x6F01), Instruction::SetRegister(0xF, 0x01));
        assert_eq!(Instruction::from(0x7105), Instruction::AddToRegister(1, 5));
        assert_eq!(Instruction::from(0x9120), Instruction::SkipNotEqualRegister(1, 2));
        assert_eq!(Instruction::from(0xA123), Instruction::SetIndexRegister(0x123));
        assert_eq!(Instruction::from(0xB200), Instruction::JumpWithOffset(0x200));
        assert_eq!(Instruction::from(0xC30F), Instruction::Random(3, 0x0F));
        assert_eq!(Instruction::from(0xD015), Instruction::Draw(0, 1, 5));
    }

    #[test]
    fn test_decode_alu() {
        let expected = [
            (0x8120, Instruction::CopyRegister(1, 2)),
            (0x8121, Instruction::Or(1, 2)),
            (0x8122, Instruction::And(1, 2)),
            (0x8123, Instruction::XOr(1, 2)),
            (0x8124, Instruction::Add(1, 2)),
            (0x8125, Instruction::SubtractForward(1, 2)),
            (0x8126, Instruction::RightShift(1, 2)),
            (0x8127, Instruction::SubtractBackward(1, 2)),
            (0x812E, Instruction::LeftShift(1, 2)),
        ];
        for (code, ins) in expected {
            assert_eq!(Instruction::from(code), ins, "{code:04X}");
        }
        assert_eq!(Instruction::from(0x8128), Instruction::Unknown(0x8128));
    }

    #[test]
    fn test_decode_keys_and_misc() {
        assert_eq!(Instruction::from(0xE59E), Instruction::SkipIfPressed(5));
        assert_eq!(Instruction::from(0xE5A1), Instruction::SkipIfNotPressed(5));
        assert_eq!(Instruction::from(0xE5A2), Instruction::Unknown(0xE5A2));
        assert_eq!(Instruction::from(0xF307), Instruction::CopyDelayToRegister(3));
        assert_eq!(Instruction::from(0xF30A), Instruction::GetKey(3));
        assert_eq!(Instruction::from(0xF315), Instruction::CopyRegisterToDelay(3));
        assert_eq!(Instruction::from(0xF318), Instruction::CopyRegisterToSound(3));
        assert_eq!(Instruction::from(0xF31E), Instruction::AddToIndex(3));
        assert_eq!(Instruction::from(0xF329), Instruction::PointChar(3));
        assert_eq!(Instruction::from(0xF333), Instruction::ToDecimal(3));
        assert_eq!(Instruction::from(0xF355), Instruction::StoreRegistersToMemory(3));
        assert_eq!(Instruction::from(0xF365), Instruction::LoadRegistersFromMemory(3));
        assert_eq!(Instruction::from(0xF366), Instruction::Unknown(0xF366));
    }

    #[test]
    fn test_decode_loose_matches() {
        // selection looks at a single nibble, so these still decode
        assert_eq!(Instruction::from(0x0120), Instruction::ClearScreen);
        assert_eq!(Instruction::from(0x012E), Instruction::Return);
        assert_eq!(Instruction::from(0x5121), Instruction::SkipEqualRegister(1, 2));
        assert_eq!(Instruction::from(0x912F), Instruction::SkipNotEqualRegister(1, 2));
        assert_eq!(Instruction::from(0x0123), Instruction::Unknown(0x0123));
    }
}
