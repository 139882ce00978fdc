//! PL022 synchronous serial port registers.

use super::{reg_bit_check, reg_bit_ops, reg_ro, reg_rw};
use crate::driver::config::SpiInstance;

// =============================================================================
// Base Addresses
// =============================================================================

/// `SPI0` base address
pub const SPI0_BASE: usize = 0x4003_C000;

/// `SPI1` base address
pub const SPI1_BASE: usize = 0x4004_0000;

// =============================================================================
// Register Offsets
// =============================================================================

/// Control register 0
pub const SSPCR0_OFFSET: usize = 0x00;
/// Control register 1
pub const SSPCR1_OFFSET: usize = 0x04;
/// Data register (FIFO access)
pub const SSPDR_OFFSET: usize = 0x08;
/// Status register
pub const SSPSR_OFFSET: usize = 0x0C;
/// Clock prescale register
pub const SSPCPSR_OFFSET: usize = 0x10;
/// Interrupt mask set/clear
pub const SSPIMSC_OFFSET: usize = 0x14;
/// Interrupt clear
pub const SSPICR_OFFSET: usize = 0x20;
/// DMA control register
pub const SSPDMACR_OFFSET: usize = 0x24;

// =============================================================================
// SSPCR0
// =============================================================================

/// Data size select: 8-bit frames (`DSS = size - 1`)
pub const SSPCR0_DSS_8BIT: u32 = 0x7;
/// Frame format shift
pub const SSPCR0_FRF_SHIFT: u32 = 4;
/// Frame format: Motorola SPI
pub const FRF_MOTOROLA: u32 = 0;
/// Clock polarity
pub const SSPCR0_SPO: u32 = 1 << 6;
/// Clock phase
pub const SSPCR0_SPH: u32 = 1 << 7;
/// Serial clock rate shift
pub const SSPCR0_SCR_SHIFT: u32 = 8;

// =============================================================================
// SSPCR1
// =============================================================================

/// Synchronous serial port enable
pub const SSPCR1_SSE: u32 = 1 << 1;
/// Master/slave select (1 = slave)
pub const SSPCR1_MS: u32 = 1 << 2;

// =============================================================================
// SSPSR
// =============================================================================

/// Transmit FIFO empty
pub const SSPSR_TFE: u32 = 1 << 0;
/// Receive FIFO not empty
pub const SSPSR_RNE: u32 = 1 << 2;

// =============================================================================
// SSPICR / SSPDMACR
// =============================================================================

/// Clear receive overrun interrupt
pub const SSPICR_RORIC: u32 = 1 << 0;

/// Receive DMA enable
pub const SSPDMACR_RXDMAE: u32 = 1 << 0;
/// Transmit DMA enable
pub const SSPDMACR_TXDMAE: u32 = 1 << 1;

// =============================================================================
// DREQ numbers
// =============================================================================

/// `SPI0` transmit DREQ
pub const DREQ_SPI0_TX: u32 = 16;
/// `SPI0` receive DREQ
pub const DREQ_SPI0_RX: u32 = 17;
/// `SPI1` transmit DREQ
pub const DREQ_SPI1_TX: u32 = 18;
/// `SPI1` receive DREQ
pub const DREQ_SPI1_RX: u32 = 19;

/// Handle to one PL022 instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiRegs {
    base: usize,
}

impl SpiRegs {
    /// Handle for `instance`
    #[must_use]
    pub const fn new(instance: SpiInstance) -> Self {
        let base = match instance {
            SpiInstance::Spi0 => SPI0_BASE,
            SpiInstance::Spi1 => SPI1_BASE,
        };
        Self { base }
    }

    /// Block base address
    #[inline(always)]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Bus address of `SSPDR`, the fixed side of both DMA channels
    #[inline(always)]
    #[must_use]
    pub const fn dr_addr(&self) -> usize {
        self.base + SSPDR_OFFSET
    }

    /// Transmit DREQ of this instance
    #[must_use]
    pub const fn tx_dreq(&self) -> u32 {
        if self.base == SPI0_BASE {
            DREQ_SPI0_TX
        } else {
            DREQ_SPI1_TX
        }
    }

    /// Receive DREQ of this instance
    #[must_use]
    pub const fn rx_dreq(&self) -> u32 {
        if self.base == SPI0_BASE {
            DREQ_SPI0_RX
        } else {
            DREQ_SPI1_RX
        }
    }

    reg_rw!(cr0, set_cr0, SSPCR0_OFFSET, "control register 0");
    reg_rw!(cr1, set_cr1, SSPCR1_OFFSET, "control register 1");
    reg_rw!(dr, set_dr, SSPDR_OFFSET, "data register");
    reg_rw!(cpsr, set_cpsr, SSPCPSR_OFFSET, "clock prescale register");
    reg_rw!(imsc, set_imsc, SSPIMSC_OFFSET, "interrupt mask register");
    reg_rw!(dmacr, set_dmacr, SSPDMACR_OFFSET, "DMA control register");
    reg_ro!(sr, SSPSR_OFFSET, "status register");

    reg_bit_ops!(
        enable,
        disable,
        SSPCR1_OFFSET,
        SSPCR1_SSE,
        "synchronous serial port",
        "Enable",
        "Disable"
    );

    reg_bit_check!(tx_fifo_empty, SSPSR_OFFSET, SSPSR_TFE, "Check if the transmit FIFO is empty");
    reg_bit_check!(rx_not_empty, SSPSR_OFFSET, SSPSR_RNE, "Check if the receive FIFO holds data");

    /// Set DMA request enables
    #[inline(always)]
    pub fn set_dma_requests(&self, bits: u32) {
        unsafe { super::set_bits(self.base + SSPDMACR_OFFSET, bits) }
    }

    /// Clear DMA request enables
    #[inline(always)]
    pub fn clear_dma_requests(&self, bits: u32) {
        unsafe { super::clear_bits(self.base + SSPDMACR_OFFSET, bits) }
    }

    /// Clear a latched receive overrun
    #[inline(always)]
    pub fn clear_overrun(&self) {
        unsafe { super::write_reg(self.base + SSPICR_OFFSET, SSPICR_RORIC) }
    }
}

/// `SSPCR0` value for 8-bit Motorola frames with the given clock settings
#[must_use]
pub const fn cr0_value(scr: u32, polarity: bool, phase: bool) -> u32 {
    let mut value =
        SSPCR0_DSS_8BIT | (FRF_MOTOROLA << SSPCR0_FRF_SHIFT) | (scr << SSPCR0_SCR_SHIFT);
    if polarity {
        value |= SSPCR0_SPO;
    }
    if phase {
        value |= SSPCR0_SPH;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_addresses() {
        assert_eq!(SpiRegs::new(SpiInstance::Spi0).base(), 0x4003_C000);
        assert_eq!(SpiRegs::new(SpiInstance::Spi1).dr_addr(), 0x4004_0008);
    }

    #[test]
    fn dreq_per_instance() {
        let spi0 = SpiRegs::new(SpiInstance::Spi0);
        let spi1 = SpiRegs::new(SpiInstance::Spi1);
        assert_eq!((spi0.tx_dreq(), spi0.rx_dreq()), (16, 17));
        assert_eq!((spi1.tx_dreq(), spi1.rx_dreq()), (18, 19));
    }

    #[test]
    fn cr0_mode1_reference() {
        // 8-bit, Motorola, CPOL=0, CPHA=1, SCR=62
        assert_eq!(cr0_value(62, false, true), 0x3E87);
    }

    #[test]
    fn cr0_mode3() {
        assert_eq!(cr0_value(0, true, true), 0x00C7);
    }

    #[test]
    fn dma_enable_bits_disjoint() {
        assert_eq!(SSPDMACR_RXDMAE & SSPDMACR_TXDMAE, 0);
    }
}
