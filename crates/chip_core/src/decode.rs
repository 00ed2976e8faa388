/// Mask applied to an instruction word, selected by its top nibble.
/// The masked word is the opcode key that identifies the operation.
pub const OPCODE_MASKS: [u16; 16] = [
    0xFFFF, // 0x0 clear / return
    0xF000, // 0x1
    0xF000, // 0x2
    0xF000, // 0x3
    0xF000, // 0x4
    0xF00F, // 0x5
    0xF000, // 0x6
    0xF000, // 0x7
    0xF00F, // 0x8 alu group
    0xF000, // 0x9
    0xF000, // 0xA
    0xF000, // 0xB
    0xF000, // 0xC
    0xF000, // 0xD
    0xF0FF, // 0xE keypad
    0xF0FF, // 0xF timers / memory
];

/// Returns the canonical opcode key of an instruction word.
#[inline(always)]
pub fn opcode_key(ins: u16) -> u16 {
    ins & OPCODE_MASKS[(ins >> 12) as usize]
}

/// Decodes an instruction word. `None` means the word is not part of the
/// instruction set and executes as a no-op.
pub fn decode(ins: u16) -> Option<Opcode> {
    Opcode::from_key(opcode_key(ins))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    ClearScreen,        // 00E0
    Return,             // 00EE
    Jump,               // 1NNN
    Call,               // 2NNN
    SkipIfEqImm,        // 3XNN
    SkipIfNotEqImm,     // 4XNN
    SkipIfEqReg,        // 5XY0
    SetImm,             // 6XNN
    AddImm,             // 7XNN
    SetReg,             // 8XY0
    Or,                 // 8XY1
    And,                // 8XY2
    Xor,                // 8XY3
    AddWithCarry,       // 8XY4
    SubYFromX,          // 8XY5
    ShiftRight,         // 8XY6
    SubXFromY,          // 8XY7
    ShiftLeft,          // 8XYE
    SkipIfNotEqReg,     // 9XY0
    SetIndex,           // ANNN
    JumpWithOffset,     // BNNN
    Random,             // CXNN
    Draw,               // DXYN
    SkipIfKey,          // EX9E
    SkipIfNotKey,       // EXA1
    GetDelayTimer,      // FX07
    WaitForKey,         // FX0A
    SetDelayTimer,      // FX15
    SetSoundTimer,      // FX18
    AddToIndex,         // FX1E
    FontCharacter,      // FX29
    BinaryToDecimal,    // FX33
    StoreRegisters,     // FX55
    LoadRegisters,      // FX65
}

impl Opcode {
    pub fn from_key(key: u16) -> Option<Self> {
        let op = match key {
            0x00E0 => Opcode::ClearScreen,
            0x00EE => Opcode::Return,
            0x1000 => Opcode::Jump,
            0x2000 => Opcode::Call,
            0x3000 => Opcode::SkipIfEqImm,
            0x4000 => Opcode::SkipIfNotEqImm,
            0x5000 => Opcode::SkipIfEqReg,
            0x6000 => Opcode::SetImm,
            0x7000 => Opcode::AddImm,
            0x8000 => Opcode::SetReg,
            0x8001 => Opcode::Or,
            0x8002 => Opcode::And,
            0x8003 => Opcode::Xor,
            0x8004 => Opcode::AddWithCarry,
            0x8005 => Opcode::SubYFromX,
            0x8006 => Opcode::ShiftRight,
            0x8007 => Opcode::SubXFromY,
            0x800E => Opcode::ShiftLeft,
            0x9000 => Opcode::SkipIfNotEqReg,
            0xA000 => Opcode::SetIndex,
            0xB000 => Opcode::JumpWithOffset,
            0xC000 => Opcode::Random,
            0xD000 => Opcode::Draw,
            0xE09E => Opcode::SkipIfKey,
            0xE0A1 => Opcode::SkipIfNotKey,
            0xF007 => Opcode::GetDelayTimer,
            0xF00A => Opcode::WaitForKey,
            0xF015 => Opcode::SetDelayTimer,
            0xF018 => Opcode::SetSoundTimer,
            0xF01E => Opcode::AddToIndex,
            0xF029 => Opcode::FontCharacter,
            0xF033 => Opcode::BinaryToDecimal,
            0xF055 => Opcode::StoreRegisters,
            0xF065 => Opcode::LoadRegisters,
            _ => return None,
        };
        Some(op)
    }
}
