use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fs, path::Path};

use crate::{
    decode::{decode, opcode_key, Opcode},
    display::Display,
    errors::ChipError,
    font::FONT,
    globals::{
        FONT_GLYPH_SIZE, FONT_START, KEY_COUNT, PROGRAM_START, RAM_SIZE, REG_COUNT,
        SCREEN_BUFFER_SIZE, STACK_SIZE,
    },
    quirks::{QuirkSettings, QuirkStore},
    utils::{mem_addr, op_n, op_nn, op_nnn, op_x, op_y, u16_from_two},
};

pub struct Cpu {
    memory: [u8; RAM_SIZE],
    display: Display,
    v: [u8; REG_COUNT],
    pc: u16,
    i: u16,
    sp: usize,
    stack: [u16; STACK_SIZE],
    delay_timer: u8,
    sound_timer: u8,
    keypad: [bool; KEY_COUNT],
    instruction: u16,
    quirks: QuirkSettings,
    rng: StdRng,
    redraw: bool
}
impl Cpu {
    /// Powers on with a random source seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
    /// Powers on with a deterministic random source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
    pub fn with_rng(rng: StdRng) -> Self {
        let mut memory = [0; RAM_SIZE];
        let font = FONT_START as usize;
        memory[font..font + FONT.len()].copy_from_slice(&FONT);
        Cpu {
            memory,
            display: Display::new(),
            v: [0; REG_COUNT],
            pc: PROGRAM_START,
            i: 0,
            sp: 0,
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            keypad: [false; KEY_COUNT],
            instruction: 0,
            quirks: QuirkSettings::default(),
            rng,
            redraw: false
        }
    }
    /// Copies a program to `PROGRAM_START`. Anything past the end of memory
    /// is dropped. Returns the number of bytes copied.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<usize, ChipError> {
        let start = PROGRAM_START as usize;
        let len = data.len().min(RAM_SIZE - start);
        if len == 0 {
            return Err(ChipError::EmptyProgram);
        }
        if len < data.len() {
            tracing::warn!(size = data.len(), loaded = len, "program truncated to fit memory");
        }
        self.memory[start..start + len].copy_from_slice(&data[..len]);
        self.pc = PROGRAM_START;
        Ok(len)
    }
    pub fn load_rom_file(&mut self, path: &Path) -> Result<usize, ChipError> {
        let data = fs::read(path).map_err(|source| ChipError::ProgramRead {
            path: path.to_path_buf(),
            source,
        })?;
        let len = self.load_rom(&data)?;
        tracing::debug!(path = %path.display(), bytes = len, "program loaded");
        Ok(len)
    }
    /// Loads a program file together with its stored quirks.
    pub fn load_program(&mut self, path: &Path, store: &QuirkStore) -> Result<usize, ChipError> {
        let len = self.load_rom_file(path)?;
        store.load_into(path, &mut self.quirks)?;
        Ok(len)
    }
    pub fn get_display_buffer(&self) -> &[u32; SCREEN_BUFFER_SIZE] {
        self.display.get_buffer()
    }
    /// Checks and clears the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        if self.redraw {
            self.redraw = false;
            return true;
        }
        false
    }
    pub fn quirks(&self) -> &QuirkSettings {
        &self.quirks
    }
    pub fn quirks_mut(&mut self) -> &mut QuirkSettings {
        &mut self.quirks
    }
    pub fn set_key(&mut self, key: usize, pressed: bool) {
        if let Some(slot) = self.keypad.get_mut(key) {
            *slot = pressed;
        }
    }

    // read-only views for debuggers

    pub fn pc(&self) -> u16 {
        self.pc
    }
    pub fn index(&self) -> u16 {
        self.i
    }
    pub fn instruction(&self) -> u16 {
        self.instruction
    }
    pub fn registers(&self) -> &[u8; REG_COUNT] {
        &self.v
    }
    pub fn keypad(&self) -> &[bool; KEY_COUNT] {
        &self.keypad
    }
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }
    pub fn memory(&self) -> &[u8; RAM_SIZE] {
        &self.memory
    }

    /// One fetch, decode and execute pass.
    pub fn step(&mut self) -> Result<(), ChipError> {
        self.fetch();
        self.execute(self.decode())
    }
    /// Reads the big endian word at the program counter and moves past it.
    pub fn fetch(&mut self) {
        let addr = self.pc as usize;
        self.instruction = u16_from_two(self.memory[mem_addr(addr)], self.memory[mem_addr(addr + 1)]);
        self.pc = self.pc.wrapping_add(2);
    }
    pub fn decode(&self) -> Option<Opcode> {
        decode(self.instruction)
    }
    /// Counts both timers down by one, stopping at zero. Driven at 60Hz.
    pub fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
    pub fn execute(&mut self, op: Option<Opcode>) -> Result<(), ChipError> {
        let ins = self.instruction;
        let (x, y) = (op_x(ins), op_y(ins));
        let (n, nn, nnn) = (op_n(ins), op_nn(ins), op_nnn(ins));
        let Some(op) = op else {
            tracing::trace!(instruction = ins, key = opcode_key(ins), "ignoring unknown opcode");
            return Ok(());
        };
        match op {
            Opcode::ClearScreen => {
                self.display.clear();
                self.redraw = true;
            },
            Opcode::Return => self.pc = self.pop_stack()?,
            Opcode::Jump => self.pc = nnn,
            Opcode::Call => {
                self.push_stack(self.pc)?;
                self.pc = nnn;
            },
            Opcode::SkipIfEqImm => self.skip_if(self.v[x] == nn),
            Opcode::SkipIfNotEqImm => self.skip_if(self.v[x] != nn),
            Opcode::SkipIfEqReg => self.skip_if(self.v[x] == self.v[y]),
            Opcode::SkipIfNotEqReg => self.skip_if(self.v[x] != self.v[y]),
            Opcode::SetImm => self.v[x] = nn,
            // VF untouched
            Opcode::AddImm => self.v[x] = self.v[x].wrapping_add(nn),
            Opcode::SetReg => self.v[x] = self.v[y],
            Opcode::Or => self.v[x] |= self.v[y],
            Opcode::And => self.v[x] &= self.v[y],
            Opcode::Xor => self.v[x] ^= self.v[y],
            Opcode::AddWithCarry => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, sum, carry);
            },
            Opcode::SubYFromX => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vx.wrapping_sub(vy), vx >= vy);
            },
            Opcode::SubXFromY => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vy.wrapping_sub(vx), vy >= vx);
            },
            Opcode::ShiftRight => {
                let value = self.shift_source(x, y);
                self.set_with_flag(x, value >> 1, value & 0x01 != 0);
            },
            Opcode::ShiftLeft => {
                let value = self.shift_source(x, y);
                self.set_with_flag(x, value << 1, value & 0x80 != 0);
            },
            Opcode::SetIndex => self.i = nnn,
            Opcode::JumpWithOffset => {
                self.pc = if self.quirks.super_chip_jump {
                    // XNN + VX
                    ((x as u16) << 8 | nn as u16) + self.v[x] as u16
                } else {
                    nnn + self.v[0] as u16
                };
            },
            Opcode::Random => self.v[x] = self.rng.gen::<u8>() & nn,
            Opcode::Draw => self.draw(x, y, n),
            Opcode::SkipIfKey => self.skip_if(self.key_down(self.v[x])),
            Opcode::SkipIfNotKey => self.skip_if(!self.key_down(self.v[x])),
            Opcode::GetDelayTimer => self.v[x] = self.delay_timer,
            Opcode::SetDelayTimer => self.delay_timer = self.v[x],
            Opcode::SetSoundTimer => self.sound_timer = self.v[x],
            Opcode::AddToIndex => self.i = self.i.wrapping_add(self.v[x] as u16),
            Opcode::WaitForKey => match self.keypad.iter().position(|k| *k) {
                Some(key) => self.v[x] = key as u8,
                // run this instruction again next cycle
                None => self.pc = self.pc.wrapping_sub(2),
            },
            Opcode::FontCharacter => {
                self.i = FONT_START + (self.v[x] & 0x0F) as u16 * FONT_GLYPH_SIZE;
            },
            Opcode::BinaryToDecimal => {
                let value = self.v[x];
                self.write_mem(0, value / 100);
                self.write_mem(1, (value / 10) % 10);
                self.write_mem(2, value % 10);
            },
            Opcode::StoreRegisters => {
                for r in 0..=x {
                    self.write_mem(r, self.v[r]);
                }
                self.advance_index(x);
            },
            Opcode::LoadRegisters => {
                for r in 0..=x {
                    self.v[r] = self.read_mem(r);
                }
                self.advance_index(x);
            },
        };
        Ok(())
    }
    fn draw(&mut self, x: usize, y: usize, n: u8) {
        let mut sprite = [0u8; 15];
        let rows = n as usize;
        for (row, byte) in sprite.iter_mut().take(rows).enumerate() {
            *byte = self.read_mem(row);
        }
        let collision = self.display.blit_sprite(
            self.v[x] as usize,
            self.v[y] as usize,
            &sprite[..rows]
        );
        self.v[0xF] = collision as u8;
        self.redraw = true;
    }
    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// Writes the result first so VF holds the flag even when X is F.
    fn set_with_flag(&mut self, x: usize, val: u8, flag: bool) {
        self.v[x] = val;
        self.v[0xF] = flag as u8;
    }
    fn shift_source(&self, x: usize, y: usize) -> u8 {
        if self.quirks.modern_shift { self.v[x] } else { self.v[y] }
    }
    fn key_down(&self, key: u8) -> bool {
        self.keypad[(key & 0x0F) as usize]
    }
    fn advance_index(&mut self, x: usize) {
        if !self.quirks.modern_load_store {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }
    fn read_mem(&self, offset: usize) -> u8 {
        self.memory[mem_addr(self.i as usize + offset)]
    }
    /// Writes below the program area are dropped so the font stays intact.
    fn write_mem(&mut self, offset: usize, val: u8) {
        let addr = mem_addr(self.i as usize + offset);
        if addr < PROGRAM_START as usize {
            tracing::trace!(addr, "ignoring write to reserved memory");
            return;
        }
        self.memory[addr] = val;
    }
    fn push_stack(&mut self, val: u16) -> Result<(), ChipError> {
        if self.sp >= STACK_SIZE {
            return Err(ChipError::StackOverflow { pc: self.pc.wrapping_sub(2) });
        }
        self.stack[self.sp] = val;
        self.sp += 1;
        Ok(())
    }
    fn pop_stack(&mut self) -> Result<u16, ChipError> {
        if self.sp == 0 {
            return Err(ChipError::StackUnderflow { pc: self.pc.wrapping_sub(2) });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
