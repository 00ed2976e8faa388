use crate::globals::{PIXEL_OFF, PIXEL_ON, SCREEN_BUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Monochrome frame buffer, one u32 per pixel so hosts can upload it as-is.
pub struct Display {
    buffer: [u32; SCREEN_BUFFER_SIZE],
}
impl Display {
    pub fn new() -> Self {
        Display {
            buffer: [PIXEL_OFF; SCREEN_BUFFER_SIZE],
        }
    }
    pub fn clear(&mut self) {
        self.buffer = [PIXEL_OFF; SCREEN_BUFFER_SIZE];
    }
    pub fn get_buffer(&self) -> &[u32; SCREEN_BUFFER_SIZE] {
        &self.buffer
    }
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.buffer[y * SCREEN_WIDTH + x] == PIXEL_ON
    }
    /// XORs an 8 pixel wide sprite onto the buffer. The origin wraps, the
    /// sprite itself is clipped at the right and bottom edges.
    /// Returns true if any lit pixel was turned off.
    pub fn blit_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        // power of two dimensions only
        let x = x & (SCREEN_WIDTH - 1);
        let y = y & (SCREEN_HEIGHT - 1);
        let mut collision = false;
        for (row, byte) in rows.iter().enumerate() {
            let py = y + row;
            if py >= SCREEN_HEIGHT { break }
            collision |= self.blit_byte(x, py, *byte);
        }
        collision
    }
    fn blit_byte(&mut self, x: usize, y: usize, data: u8) -> bool {
        let mut collision = false;
        for col in 0..8 {
            let px = x + col;
            if px >= SCREEN_WIDTH { break }
            if (data >> (7 - col)) & 0x1 == 0 { continue }
            let pixel = &mut self.buffer[y * SCREEN_WIDTH + px];
            collision |= *pixel == PIXEL_ON;
            *pixel ^= PIXEL_ON;
        }
        collision
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_bits(display: &Display, x: usize, y: usize) -> u8 {
        (0..8).fold(0, |acc, i| {
            let on = x + i < SCREEN_WIDTH && display.is_on(x + i, y);
            acc << 1 | on as u8
        })
    }

    #[test]
    fn blit_byte() {
        let mut display = Display::new();
        let flag = display.blit_byte(8, 0, 0b10101011);
        assert!(!flag);
        assert!(row_bits(&display, 0, 0) == 0x0);
        assert!(row_bits(&display, 8, 0) == 0b10101011);
        assert!(row_bits(&display, 16, 0) == 0x0);
    }
    #[test]
    fn blit_byte_non_empty() {
        let mut display = Display::new();
        display.blit_byte(8, 0, 0b11011111);
        let flag = display.blit_byte(8, 0, 0b10111111);
        assert!(flag);
        assert!(row_bits(&display, 8, 0) == 0b01100000);
    }
    #[test]
    fn blit_byte_unaligned() {
        let mut display = Display::new();
        let flag = display.blit_byte(2, 2, 0b10101011);
        assert!(!flag);
        assert!(row_bits(&display, 0, 2) == 0b00101010);
        assert!(row_bits(&display, 8, 2) == 0b11000000);
        assert!(row_bits(&display, 0, 1) == 0x0);
    }
    #[test]
    fn blit_byte_trim_x() {
        let mut display = Display::new();
        let flag = display.blit_byte(59, 0, 0b10101011);
        assert!(!flag);
        assert!(row_bits(&display, 56, 0) == 0b00010101);
        // clipped columns do not wrap onto the next row or the left edge
        assert!(row_bits(&display, 0, 1) == 0x0);
        assert!(row_bits(&display, 0, 0) == 0x0);
    }
    #[test]
    fn blit_sprite_wraps_origin() {
        let mut display = Display::new();
        display.blit_sprite(SCREEN_WIDTH + 8, SCREEN_HEIGHT + 2, &[0b10101011]);
        assert!(row_bits(&display, 8, 2) == 0b10101011);
    }
    #[test]
    fn blit_sprite_trim_y() {
        let mut display = Display::new();
        let flag = display.blit_sprite(0, SCREEN_HEIGHT - 1, &[0xFF, 0xFF, 0xFF]);
        assert!(!flag);
        assert!(row_bits(&display, 0, SCREEN_HEIGHT - 1) == 0xFF);
        assert!(row_bits(&display, 0, 0) == 0x0);
        assert!(row_bits(&display, 0, 1) == 0x0);
    }
    #[test]
    fn blit_sprite_multi_line() {
        let mut display = Display::new();
        let sprite = [
            0b10101011,
            0b11101011,
            0b10111011,
        ];
        let flag = display.blit_sprite(8, 2, &sprite);
        assert!(!flag);
        assert!(row_bits(&display, 8, 1) == 0x0);
        assert!(row_bits(&display, 8, 2) == 0b10101011);
        assert!(row_bits(&display, 8, 3) == 0b11101011);
        assert!(row_bits(&display, 8, 4) == 0b10111011);
        assert!(row_bits(&display, 8, 5) == 0x0);
    }
    #[test]
    fn blit_sprite_twice_cancels() {
        let mut display = Display::new();
        let sprite = [0xF0, 0x90, 0xF0];
        assert!(!display.blit_sprite(10, 10, &sprite));
        assert!(display.blit_sprite(10, 10, &sprite));
        assert!(display.get_buffer().iter().all(|p| *p == PIXEL_OFF));
    }
    #[test]
    fn clear() {
        let mut display = Display::new();
        display.blit_sprite(0, 0, &[0xFF; 8]);
        display.clear();
        assert!(display.get_buffer().iter().all(|p| *p == PIXEL_OFF));
    }
}
