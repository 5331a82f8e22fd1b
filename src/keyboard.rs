use crate::error::ExecError;

pub const KEY_COUNT: usize = 16;

/// The 16 key hex keypad. Written by the host between cycles, read by the interpreter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), ExecError> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(ExecError::InvalidKey(key))?;
        *slot = pressed;
        Ok(())
    }

    pub fn press(&mut self, key: u8) -> Result<(), ExecError> {
        self.set_key(key, true)
    }

    pub fn release(&mut self, key: u8) -> Result<(), ExecError> {
        self.set_key(key, false)
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool, ExecError> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(ExecError::InvalidKey(key))
    }

    /// Highest numbered key that is currently down.
    pub fn pressed_key(&self) -> Option<u8> {
        self.keys.iter().rposition(|down| *down).map(|k| k as u8)
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut kb = Keyboard::new();
        kb.press(0xA).unwrap();
        assert_eq!(kb.is_pressed(0xA), Ok(true));
        kb.release(0xA).unwrap();
        assert_eq!(kb.is_pressed(0xA), Ok(false));
    }

    #[test]
    fn test_invalid_key() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.press(16), Err(ExecError::InvalidKey(16)));
        assert_eq!(kb.is_pressed(0xFF), Err(ExecError::InvalidKey(0xFF)));
    }

    #[test]
    fn test_pressed_key_prefers_highest() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.pressed_key(), None);
        kb.press(2).unwrap();
        kb.press(9).unwrap();
        assert_eq!(kb.pressed_key(), Some(9));
        kb.reset();
        assert_eq!(kb.pressed_key(), None);
    }
}
