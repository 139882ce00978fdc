//! Memory-mapped register definitions for the RP2040 blocks the transport
//! drives: PL022 SPI, DMA, `IO_BANK0` / `PADS_BANK0` and `RESETS`.
//!
//! All register access is volatile. Blocks are addressed through small
//! `*Regs` handles holding a base address, since SPI instances and DMA
//! channels share one layout at different bases.

pub mod dma;
pub mod io;
pub mod resets;
pub mod spi;

// =============================================================================
// Atomic Aliases
// =============================================================================

/// Offset of the atomic bitmask-set alias of a peripheral register
pub const ALIAS_SET: usize = 0x2000;

/// Offset of the atomic bitmask-clear alias of a peripheral register
pub const ALIAS_CLR: usize = 0x3000;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Set bits through the atomic SET alias (no read-modify-write)
///
/// # Safety
/// The caller must ensure the address is a valid peripheral register with
/// atomic aliases.
#[inline(always)]
pub unsafe fn set_bits(addr: usize, bits: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { write_reg(addr + ALIAS_SET, bits) }
}

/// Clear bits through the atomic CLR alias (no read-modify-write)
///
/// # Safety
/// The caller must ensure the address is a valid peripheral register with
/// atomic aliases.
#[inline(always)]
pub unsafe fn clear_bits(addr: usize, bits: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { write_reg(addr + ALIAS_CLR, bits) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register of a `*Regs` handle.
///
/// # Example
/// ```ignore
/// impl SpiRegs {
///     reg_rw!(cr0, set_cr0, SSPCR0_OFFSET, "Control register 0");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            unsafe { $crate::internal::register::read_reg(self.base + $offset) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            unsafe { $crate::internal::register::write_reg(self.base + $offset, value) }
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            unsafe { $crate::internal::register::read_reg(self.base + $offset) }
        }
    };
}

/// Generate atomic set/clear methods for one or more bits of a register.
///
/// # Example
/// ```ignore
/// impl SpiRegs {
///     reg_bit_ops!(enable, disable, SSPCR1_OFFSET, SSPCR1_SSE,
///                  "synchronous serial port", "Enable", "Disable");
/// }
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&self) {
            unsafe { $crate::internal::register::set_bits(self.base + $offset, $bit) }
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&self) {
            unsafe { $crate::internal::register::clear_bits(self.base + $offset, $bit) }
        }
    };
}

/// Generate a bit check method (true when the bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            unsafe { ($crate::internal::register::read_reg(self.base + $offset) & $bit) != 0 }
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_ro;
pub(crate) use reg_rw;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_offsets() {
        assert_eq!(ALIAS_SET, 0x2000);
        assert_eq!(ALIAS_CLR, 0x3000);
    }
}
