//! RP2040 SPI Slave Frame Transport
//!
//! A `no_std`, `no_alloc` DMA-driven SPI slave for the RP2040 that exchanges
//! fixed-size frames with an SPI master.
//!
//! Frames are delimited by chip select (CSn). While CSn is low, two DMA
//! channels move one frame in each direction between the PL022 FIFOs and
//! statically allocated frame rings; the CPU only acts on the CSn edges.
//!
//! # Architecture
//!
//! 1. **Transport** ([`driver::slave`]): Frame rings, edge handling, the
//!    application `submit`/`receive` API
//! 2. **HAL** ([`hal`]): The [`SlaveHardware`] seam plus the RP2040
//!    register backend, pin table, baud divisors and reset sequencing
//! 3. **Sync** ([`sync`]): The critical-section exclusion domain shared by
//!    the CSn interrupt and mainline code
//!
//! # Delivery Semantics
//!
//! The link is lossy and never blocks:
//!
//! - A full outbound ring drops the newly submitted frame
//! - A full inbound ring evicts the oldest unread frame
//! - An empty outbound ring makes the master read an all-zero frame
//! - A frame window shorter than a full frame is discarded on the inbound
//!   side
//!
//! Every such event is counted in [`LinkStats`].
//!
//! # Features
//!
//! - `rp2040` (default): Register-level RP2040 backend
//! - `defmt`: Enable defmt logging and formatting for public types
//! - `async`: Enable [`SpiSlave::receive_async`]
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_spis::{SlaveConfig, SpiMode};
//!
//! ph_rp2040_spis::spi_slave_static!(SLAVE);
//!
//! SLAVE
//!     .initialize(SlaveConfig::new().with_mode(SpiMode::Mode1), &mut delay)
//!     .unwrap();
//!
//! SLAVE.submit(&[0xAA; 128]);
//!
//! let mut frame = [0u8; 128];
//! if SLAVE.receive(&mut frame) == 128 {
//!     // got one
//! }
//!
//! #[interrupt]
//! fn IO_IRQ_BANK0() {
//!     SLAVE.handle_interrupt();
//! }
//! ```
//!
//! # Memory Requirements
//!
//! With the defaults (128 byte frames, 32 slots per direction) one instance
//! holds 2 x 32 x 128 bytes of rings plus one zero frame: a little over 8 KB
//! of SRAM.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{DmaChannels, SlaveConfig, SpiInstance, SpiMode, State};
pub use driver::edge::{LinkPhase, SelectEdge};
pub use driver::error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use driver::slave::SpiSlave;
pub use driver::stats::LinkStats;
pub use hal::{SlaveHardware, SpiPins};

/// Low-level register accessors for advanced use.
///
/// Most users should prefer [`SpiSlave`]. Touching these while the
/// transport is running bypasses its sequencing.
#[cfg(feature = "rp2040")]
#[cfg_attr(docsrs, doc(cfg(feature = "rp2040")))]
pub mod unsafe_registers {
    pub use crate::internal::register::dma::{DmaChannelRegs, DmaRegs};
    pub use crate::internal::register::spi::SpiRegs;
}

/// Shared transport constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Clocks
        DEFAULT_BAUD_HZ,
        // Frame geometry
        DEFAULT_FRAME_SIZE,
        DEFAULT_PERI_CLOCK_HZ,
        DEFAULT_RING_DEPTH,
        // Limits
        DMA_CHANNEL_COUNT,
        GPIO_COUNT,
        RESET_TIMEOUT_US,
        RX_DRAIN_LIMIT,
        SLAVE_CLOCK_RATIO,
        SPI_FIFO_DEPTH,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static SPI slave on the RP2040 backend.
///
/// The transport must stay at a fixed address once initialized, since the
/// DMA channels point into it; a `static` guarantees that.
///
/// # Examples
///
/// ```ignore
/// ph_rp2040_spis::spi_slave_static!(SLAVE);
/// ph_rp2040_spis::spi_slave_static!(SMALL, 32, 8);
///
/// SLAVE.initialize(SlaveConfig::new(), &mut delay).unwrap();
/// ```
#[cfg(feature = "rp2040")]
#[macro_export]
macro_rules! spi_slave_static {
    ($name:ident) => {
        $crate::spi_slave_static!(
            $name,
            $crate::constants::DEFAULT_FRAME_SIZE,
            $crate::constants::DEFAULT_RING_DEPTH
        );
    };
    ($name:ident, $frame:expr, $depth:expr) => {
        static $name: $crate::SpiSlave<$crate::hal::rp2040::Rp2040Hardware, { $frame }, { $depth }> =
            $crate::SpiSlave::new($crate::hal::rp2040::Rp2040Hardware::new());
    };
}
