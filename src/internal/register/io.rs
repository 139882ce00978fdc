//! `IO_BANK0` (function select, edge interrupts) and `PADS_BANK0` registers.
//!
//! # Interrupt Layout
//!
//! Each GPIO owns a 4-bit event field; eight GPIOs share one 32-bit
//! register in `INTR`, `PROC0_INTE` and `PROC0_INTS`.
//!
//! | Bit | Event |
//! |-----|-------|
//! | 0 | LEVEL_LOW |
//! | 1 | LEVEL_HIGH |
//! | 2 | EDGE_LOW |
//! | 3 | EDGE_HIGH |

use super::{clear_bits, read_reg, set_bits, write_reg};

/// `IO_BANK0` base address
pub const IO_BANK0_BASE: usize = 0x4001_4000;

/// `PADS_BANK0` base address
pub const PADS_BANK0_BASE: usize = 0x4001_C000;

/// `GPIOn_CTRL` offset for GPIO 0 (stride 8)
pub const GPIO_CTRL_OFFSET: usize = 0x04;
/// Raw interrupt status (edge bits are write-1-to-clear)
pub const INTR_OFFSET: usize = 0x0F0;
/// Processor 0 interrupt enable
pub const PROC0_INTE_OFFSET: usize = 0x100;
/// Processor 0 interrupt status after masking
pub const PROC0_INTS_OFFSET: usize = 0x120;

/// `FUNCSEL` field mask
pub const GPIO_CTRL_FUNCSEL_MASK: u32 = 0x1F;
/// SPI function
pub const FUNCSEL_SPI: u32 = 1;

/// Falling edge event
pub const GPIO_EVENT_EDGE_LOW: u32 = 1 << 2;
/// Rising edge event
pub const GPIO_EVENT_EDGE_HIGH: u32 = 1 << 3;

/// Pad: input enable
pub const PADS_IE: u32 = 1 << 6;
/// Pad: output disable
pub const PADS_OD: u32 = 1 << 7;

/// Register and shift of a GPIO's event field within an interrupt bank
#[inline(always)]
#[must_use]
pub const fn event_position(gpio: u8) -> (usize, u32) {
    let reg = (gpio as usize / 8) * 4;
    let shift = (gpio as u32 % 8) * 4;
    (reg, shift)
}

/// `IO_BANK0` accessors
pub struct IoBank0;

impl IoBank0 {
    /// Address of `GPIOn_CTRL`
    #[inline(always)]
    #[must_use]
    pub const fn ctrl_addr(gpio: u8) -> usize {
        IO_BANK0_BASE + GPIO_CTRL_OFFSET + gpio as usize * 8
    }

    /// Route `gpio` to peripheral function `funcsel`
    pub fn set_function(gpio: u8, funcsel: u32) {
        // Overrides cleared; FUNCSEL is the only field we want set
        unsafe { write_reg(Self::ctrl_addr(gpio), funcsel & GPIO_CTRL_FUNCSEL_MASK) }
    }

    /// Pending masked events of `gpio` for processor 0
    pub fn proc0_events(gpio: u8) -> u32 {
        let (reg, shift) = event_position(gpio);
        unsafe { (read_reg(IO_BANK0_BASE + PROC0_INTS_OFFSET + reg) >> shift) & 0xF }
    }

    /// Acknowledge edge events of `gpio`
    pub fn acknowledge(gpio: u8, events: u32) {
        let (reg, shift) = event_position(gpio);
        unsafe { write_reg(IO_BANK0_BASE + INTR_OFFSET + reg, (events & 0xF) << shift) }
    }

    /// Enable events of `gpio` on processor 0
    pub fn enable_proc0_events(gpio: u8, events: u32) {
        let (reg, shift) = event_position(gpio);
        unsafe { set_bits(IO_BANK0_BASE + PROC0_INTE_OFFSET + reg, (events & 0xF) << shift) }
    }
}

/// `PADS_BANK0` accessors
pub struct PadsBank0;

impl PadsBank0 {
    /// Address of the pad control register of `gpio`
    #[inline(always)]
    #[must_use]
    pub const fn pad_addr(gpio: u8) -> usize {
        PADS_BANK0_BASE + 0x04 + gpio as usize * 4
    }

    /// Enable the input buffer and the output driver of `gpio`
    pub fn enable_io(gpio: u8) {
        let addr = Self::pad_addr(gpio);
        unsafe {
            set_bits(addr, PADS_IE);
            clear_bits(addr, PADS_OD);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_addresses() {
        assert_eq!(IoBank0::ctrl_addr(0), 0x4001_4004);
        assert_eq!(IoBank0::ctrl_addr(13), 0x4001_406C);
    }

    #[test]
    fn pad_addresses() {
        assert_eq!(PadsBank0::pad_addr(0), 0x4001_C004);
        assert_eq!(PadsBank0::pad_addr(13), 0x4001_C038);
    }

    #[test]
    fn event_positions() {
        assert_eq!(event_position(0), (0, 0));
        assert_eq!(event_position(7), (0, 28));
        // GPIO13 lives in the second bank register, field 5
        assert_eq!(event_position(13), (4, 20));
        assert_eq!(event_position(29), (12, 20));
    }

    #[test]
    fn edge_event_bits() {
        assert_eq!(GPIO_EVENT_EDGE_LOW, 0b0100);
        assert_eq!(GPIO_EVENT_EDGE_HIGH, 0b1000);
    }
}
