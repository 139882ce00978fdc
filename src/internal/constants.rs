//! Centralized Constants
//!
//! Single source of truth for the frame geometry, FIFO sizes, clock defaults
//! and bring-up timeouts used throughout the transport.
//!
//! Hardware register bit definitions remain in `internal::register::*`.

// =============================================================================
// Frame and Ring Geometry
// =============================================================================

/// Frame size used by the reference system (bytes per chip-select window)
pub const DEFAULT_FRAME_SIZE: usize = 128;

/// Number of frame slots per direction in the reference system
pub const DEFAULT_RING_DEPTH: usize = 32;

// =============================================================================
// PL022 FIFO
// =============================================================================

/// Depth of the PL022 receive and transmit FIFOs (entries)
pub const SPI_FIFO_DEPTH: usize = 8;

/// Upper bound on RX FIFO reads while draining at frame end.
///
/// The FIFO holds at most [`SPI_FIFO_DEPTH`] entries; the extra headroom
/// covers bytes that land while the drain is running.
pub const RX_DRAIN_LIMIT: usize = SPI_FIFO_DEPTH * 4;

// =============================================================================
// Clocks
// =============================================================================

/// Default `clk_peri` frequency (system PLL at 125 MHz)
pub const DEFAULT_PERI_CLOCK_HZ: u32 = 125_000_000;

/// Default link baud rate (the master drives SCK, this sizes the slave sampler)
pub const DEFAULT_BAUD_HZ: u32 = 1_000_000;

/// Slave mode requires `clk_peri` to be at least this multiple of SCK
pub const SLAVE_CLOCK_RATIO: u32 = 12;

// =============================================================================
// Timing
// =============================================================================

/// Maximum time waiting for `RESETS.RESET_DONE` after releasing a block
pub const RESET_TIMEOUT_US: u32 = 1_000;

/// Poll interval while waiting on `RESET_DONE`
pub const RESET_POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// DMA
// =============================================================================

/// Number of DMA channels on the RP2040
pub const DMA_CHANNEL_COUNT: u8 = 12;

/// Number of user GPIOs in `IO_BANK0`
pub const GPIO_COUNT: u8 = 30;
