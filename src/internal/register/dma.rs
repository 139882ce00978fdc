//! RP2040 DMA controller registers.
//!
//! Twelve identical channels at a 0x40 stride, plus shared control
//! registers above them. Writing the non-trigger aliases (`READ_ADDR`,
//! `WRITE_ADDR`, `TRANS_COUNT`, `AL1_CTRL`) programs a channel without
//! starting it; `MULTI_CHAN_TRIGGER` starts several at once.

use super::{reg_ro, reg_rw};
use crate::internal::constants::DMA_CHANNEL_COUNT;

/// DMA base address
pub const DMA_BASE: usize = 0x5000_0000;

/// Distance between channel register blocks
pub const CHANNEL_STRIDE: usize = 0x40;

// =============================================================================
// Channel Register Offsets
// =============================================================================

/// Read address
pub const READ_ADDR_OFFSET: usize = 0x00;
/// Write address
pub const WRITE_ADDR_OFFSET: usize = 0x04;
/// Transfer count (reads return remaining transfers)
pub const TRANS_COUNT_OFFSET: usize = 0x08;
/// Control, non-triggering alias
pub const AL1_CTRL_OFFSET: usize = 0x10;

// =============================================================================
// Shared Register Offsets
// =============================================================================

/// Trigger several channels at once
pub const MULTI_CHAN_TRIGGER_OFFSET: usize = 0x430;
/// Abort in-progress transfers (reads back busy-aborting channels)
pub const CHAN_ABORT_OFFSET: usize = 0x444;

// =============================================================================
// CTRL bits
// =============================================================================

/// Channel enable
pub const CTRL_EN: u32 = 1 << 0;
/// Data size shift
pub const CTRL_DATA_SIZE_SHIFT: u32 = 2;
/// Data size: byte
pub const DATA_SIZE_BYTE: u32 = 0;
/// Increment read address
pub const CTRL_INCR_READ: u32 = 1 << 4;
/// Increment write address
pub const CTRL_INCR_WRITE: u32 = 1 << 5;
/// Chain target shift (chain to self = no chaining)
pub const CTRL_CHAIN_TO_SHIFT: u32 = 11;
/// Transfer request select shift
pub const CTRL_TREQ_SEL_SHIFT: u32 = 15;
/// Suppress completion interrupts
pub const CTRL_IRQ_QUIET: u32 = 1 << 21;

/// Spin bound while waiting for an abort to settle
pub const ABORT_SPIN_LIMIT: u32 = 1_000;

/// Handle to one DMA channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaChannelRegs {
    base: usize,
    channel: u8,
}

impl DmaChannelRegs {
    /// Handle for `channel` (wrapped into the valid range)
    #[must_use]
    pub const fn new(channel: u8) -> Self {
        let channel = channel % DMA_CHANNEL_COUNT;
        Self {
            base: DMA_BASE + channel as usize * CHANNEL_STRIDE,
            channel,
        }
    }

    /// Channel number
    #[inline(always)]
    #[must_use]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Bit of this channel in the shared trigger/abort masks
    #[inline(always)]
    #[must_use]
    pub const fn mask(&self) -> u32 {
        1 << self.channel
    }

    /// Block base address
    #[inline(always)]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    reg_rw!(read_addr, set_read_addr, READ_ADDR_OFFSET, "read address");
    reg_rw!(write_addr, set_write_addr, WRITE_ADDR_OFFSET, "write address");
    reg_rw!(trans_count, set_trans_count, TRANS_COUNT_OFFSET, "transfer count");
    reg_rw!(ctrl, set_ctrl, AL1_CTRL_OFFSET, "control register (non-triggering alias)");
}

/// Control value for a byte-wide, DREQ-paced, unchained channel
#[must_use]
pub const fn ctrl_value(channel: u8, dreq: u32, incr_read: bool, incr_write: bool) -> u32 {
    let mut value = CTRL_EN
        | CTRL_IRQ_QUIET
        | (DATA_SIZE_BYTE << CTRL_DATA_SIZE_SHIFT)
        | ((channel as u32 & 0xF) << CTRL_CHAIN_TO_SHIFT)
        | ((dreq & 0x3F) << CTRL_TREQ_SEL_SHIFT);
    if incr_read {
        value |= CTRL_INCR_READ;
    }
    if incr_write {
        value |= CTRL_INCR_WRITE;
    }
    value
}

/// Shared DMA control registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaRegs {
    base: usize,
}

impl DmaRegs {
    /// Handle to the DMA block
    #[must_use]
    pub const fn new() -> Self {
        Self { base: DMA_BASE }
    }

    reg_ro!(abort_status, CHAN_ABORT_OFFSET, "channel abort register");

    /// Start all channels in `mask`
    #[inline(always)]
    pub fn trigger(&self, mask: u32) {
        unsafe { super::write_reg(self.base + MULTI_CHAN_TRIGGER_OFFSET, mask) }
    }

    /// Abort all channels in `mask` and wait (bounded) for them to settle.
    ///
    /// Returns `false` if a channel was still aborting at the spin limit.
    pub fn abort(&self, mask: u32) -> bool {
        unsafe { super::write_reg(self.base + CHAN_ABORT_OFFSET, mask) };
        for _ in 0..ABORT_SPIN_LIMIT {
            if self.abort_status() & mask == 0 {
                return true;
            }
            core::hint::spin_loop();
        }
        false
    }
}

impl Default for DmaRegs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_addresses() {
        assert_eq!(DmaChannelRegs::new(0).base(), 0x5000_0000);
        assert_eq!(DmaChannelRegs::new(3).base(), 0x5000_00C0);
        assert_eq!(DmaChannelRegs::new(11).base(), 0x5000_02C0);
    }

    #[test]
    fn channel_mask() {
        assert_eq!(DmaChannelRegs::new(0).mask(), 0x001);
        assert_eq!(DmaChannelRegs::new(11).mask(), 0x800);
    }

    #[test]
    fn ctrl_rx_channel() {
        // RX: fixed read from SSPDR, incrementing write, SPI1 RX DREQ, chain to self
        let ctrl = ctrl_value(2, 19, false, true);
        assert_ne!(ctrl & CTRL_EN, 0);
        assert_ne!(ctrl & CTRL_INCR_WRITE, 0);
        assert_eq!(ctrl & CTRL_INCR_READ, 0);
        assert_eq!((ctrl >> CTRL_TREQ_SEL_SHIFT) & 0x3F, 19);
        assert_eq!((ctrl >> CTRL_CHAIN_TO_SHIFT) & 0xF, 2);
        assert_eq!((ctrl >> CTRL_DATA_SIZE_SHIFT) & 0x3, 0);
    }

    #[test]
    fn ctrl_tx_channel() {
        let ctrl = ctrl_value(3, 18, true, false);
        assert_ne!(ctrl & CTRL_INCR_READ, 0);
        assert_eq!(ctrl & CTRL_INCR_WRITE, 0);
        assert_eq!((ctrl >> CTRL_TREQ_SEL_SHIFT) & 0x3F, 18);
    }
}
