/// Input snapshot handed to the interpreter once per cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct KeyInput {
    /// Continuous key-down state for keys 0x0-0xF
    pub keys: [bool; 16],
    /// Key that saw a key-down edge since the previous cycle
    pub pressed: Option<u8>,
}

impl KeyInput {
    pub fn released() -> KeyInput {
        KeyInput::default()
    }

    pub fn press(key: u8) -> KeyInput {
        let mut input = KeyInput::default();
        input.keys[(key & 0xF) as usize] = true;
        input.pressed = Some(key & 0xF);
        input
    }
}

/// Keypad state as seen by the executing program.
#[derive(Clone, Debug, Default)]
pub struct Keypad {
    keys: [bool; 16],
    last_pressed: Option<u8>,
}

impl Keypad {
    pub fn update(&mut self, input: &KeyInput) {
        self.keys = input.keys;
        self.last_pressed = input.pressed.map(|k| k & 0xF);
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn last_pressed(&self) -> Option<u8> {
        self.last_pressed
    }

    /// Forget the key-down edge; edges only count for the cycle they arrive in.
    pub fn clear_pressed(&mut self) {
        self.last_pressed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_mask() {
        let mut keypad = Keypad::default();
        keypad.update(&KeyInput::press(0xA));

        assert!(keypad.is_down(0xA));
        assert!(keypad.is_down(0x1A), "key index is masked to 4 bits");
        assert!(!keypad.is_down(0xB));
        assert_eq!(keypad.last_pressed(), Some(0xA));
    }

    #[test]
    fn test_edge_not_latched() {
        let mut keypad = Keypad::default();
        keypad.update(&KeyInput::press(0x3));
        keypad.clear_pressed();

        assert!(keypad.is_down(0x3));
        assert_eq!(keypad.last_pressed(), None);

        keypad.update(&KeyInput::released());
        assert!(!keypad.is_down(0x3));
    }
}
