use winit::keyboard::KeyCode;

/// Physical keys for hex keys 0x0-0xF, laid out as the 4x4 block under 1-4.
const KEYMAP: [KeyCode; 16] = [
    KeyCode::KeyX,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::KeyQ,
    KeyCode::KeyW,
    KeyCode::KeyE,
    KeyCode::KeyA,
    KeyCode::KeyS,
    KeyCode::KeyD,
    KeyCode::KeyZ,
    KeyCode::KeyC,
    KeyCode::Digit4,
    KeyCode::KeyR,
    KeyCode::KeyF,
    KeyCode::KeyV,
];

pub fn chip_key(code: KeyCode) -> Option<usize> {
    KEYMAP.iter().position(|k| *k == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn layout() {
        assert!(chip_key(KeyCode::KeyX) == Some(0x0));
        assert!(chip_key(KeyCode::Digit1) == Some(0x1));
        assert!(chip_key(KeyCode::Digit4) == Some(0xC));
        assert!(chip_key(KeyCode::KeyV) == Some(0xF));
        assert!(chip_key(KeyCode::KeyP) == None);
    }
}
