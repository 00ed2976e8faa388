/// Higher resolution mode is reserved but not implemented; only `false` is supported.
pub const SUPER_CHIP: bool = false;

pub const RAM_SIZE: usize = 4096;
pub const STACK_SIZE: usize = 16;
pub const REG_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

pub const PROGRAM_START: u16 = 0x200;
pub const FONT_START: u16 = 0x50;
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const SCREEN_WIDTH: usize = if SUPER_CHIP { 128 } else { 64 };
pub const SCREEN_HEIGHT: usize = if SUPER_CHIP { 64 } else { 32 };
pub const SCREEN_BUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
pub const PIXEL_OFF: u32 = 0;

/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u64 = 60;
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;
pub const MIN_INSTRUCTIONS_PER_SECOND: u32 = 1;
pub const MAX_INSTRUCTIONS_PER_SECOND: u32 = 1000;
