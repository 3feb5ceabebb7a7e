use chip8_core::KeyInput;
use sdl2::keyboard::{KeyboardState, Scancode};

/// Physical key layout mapped onto the CHIP-8 hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
const KEYMAP: [(Scancode, u8); 16] = [
    (Scancode::X, 0x0),
    (Scancode::Num1, 0x1),
    (Scancode::Num2, 0x2),
    (Scancode::Num3, 0x3),
    (Scancode::Q, 0x4),
    (Scancode::W, 0x5),
    (Scancode::E, 0x6),
    (Scancode::A, 0x7),
    (Scancode::S, 0x8),
    (Scancode::D, 0x9),
    (Scancode::Z, 0xA),
    (Scancode::C, 0xB),
    (Scancode::Num4, 0xC),
    (Scancode::R, 0xD),
    (Scancode::F, 0xE),
    (Scancode::V, 0xF),
];

pub fn keypad_index(scancode: Scancode) -> Option<u8> {
    KEYMAP
        .iter()
        .find(|(sc, _)| *sc == scancode)
        .map(|(_, key)| *key)
}

/// Snapshot the held keys, combined with the key-down edge seen this frame.
pub fn key_input(state: &KeyboardState, pressed: Option<u8>) -> KeyInput {
    let mut input = KeyInput {
        pressed,
        ..KeyInput::default()
    };
    for (sc, key) in KEYMAP {
        input.keys[key as usize] = state.is_scancode_pressed(sc);
    }
    input
}
