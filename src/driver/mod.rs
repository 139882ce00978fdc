//! Core driver components for the RP2040 SPI slave transport.
//!
//! - [`config`] - Instance, pin, mode and DMA channel configuration
//! - [`edge`] - Chip-select edges and link phase
//! - [`error`] - Error types and result aliases
//! - [`slave`] - The frame transport itself
//! - [`stats`] - Link counters
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_spis::driver::{SlaveConfig, SpiInstance, SpiMode};
//!
//! let config = SlaveConfig::new()
//!     .with_spi(SpiInstance::Spi1)
//!     .with_mode(SpiMode::Mode1)
//!     .with_baud_hz(1_000_000);
//! ```

// Submodules
pub mod config;
pub mod edge;
pub mod error;
pub mod slave;
pub mod stats;

// Re-exports for convenience
pub use config::{DmaChannels, SlaveConfig, SpiInstance, SpiMode, State};
pub use edge::{EdgeEvents, LinkPhase, SelectEdge};
pub use error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use slave::SpiSlave;
pub use stats::LinkStats;
