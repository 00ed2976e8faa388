use crate::globals::RAM_SIZE;

#[inline(always)]
pub fn u16_from_two(a: u8, b: u8) -> u16 {
    (a as u16) << 8 | b as u16
}

/// Wraps any address into the 4K address space.
#[inline(always)]
pub fn mem_addr(addr: usize) -> usize {
    addr % RAM_SIZE
}

// operand fields of an instruction word

#[inline(always)]
pub fn op_x(ins: u16) -> usize {
    ((ins >> 8) & 0x0F) as usize
}

#[inline(always)]
pub fn op_y(ins: u16) -> usize {
    ((ins >> 4) & 0x0F) as usize
}

#[inline(always)]
pub fn op_n(ins: u16) -> u8 {
    (ins & 0x0F) as u8
}

#[inline(always)]
pub fn op_nn(ins: u16) -> u8 {
    (ins & 0xFF) as u8
}

#[inline(always)]
pub fn op_nnn(ins: u16) -> u16 {
    ins & 0x0FFF
}
