//! `RESETS` block: subsystem reset control.

use super::{clear_bits, read_reg, set_bits};

/// `RESETS` base address
pub const RESETS_BASE: usize = 0x4000_C000;

/// Reset control (1 = held in reset)
pub const RESET_OFFSET: usize = 0x00;
/// Reset done status
pub const RESET_DONE_OFFSET: usize = 0x08;

/// DMA controller
pub const RESET_DMA: u32 = 1 << 2;
/// `IO_BANK0`
pub const RESET_IO_BANK0: u32 = 1 << 5;
/// `PADS_BANK0`
pub const RESET_PADS_BANK0: u32 = 1 << 8;
/// `SPI0`
pub const RESET_SPI0: u32 = 1 << 16;
/// `SPI1`
pub const RESET_SPI1: u32 = 1 << 17;

/// `RESETS` accessors
pub struct Resets;

impl Resets {
    /// Hold the blocks in `mask` in reset
    pub fn assert(mask: u32) {
        unsafe { set_bits(RESETS_BASE + RESET_OFFSET, mask) }
    }

    /// Release the blocks in `mask` from reset
    pub fn release(mask: u32) {
        unsafe { clear_bits(RESETS_BASE + RESET_OFFSET, mask) }
    }

    /// Check if every block in `mask` finished coming out of reset
    pub fn is_done(mask: u32) -> bool {
        unsafe { read_reg(RESETS_BASE + RESET_DONE_OFFSET) & mask == mask }
    }
}
