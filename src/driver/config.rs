//! Configuration types for the SPI slave transport

use crate::driver::error::{ConfigError, ConfigResult};
use crate::hal::clock::BaudDivisors;
use crate::hal::pins::SpiPins;
use crate::internal::constants::{DEFAULT_BAUD_HZ, DEFAULT_PERI_CLOCK_HZ, DMA_CHANNEL_COUNT};

/// PL022 instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiInstance {
    /// `SPI0`
    Spi0,
    /// `SPI1`
    #[default]
    Spi1,
}

/// Clock polarity and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// CPOL=0, CPHA=0. The PL022 needs CS toggled between bytes in this
    /// mode, which breaks DMA-driven frames.
    Mode0,
    /// CPOL=0, CPHA=1
    #[default]
    Mode1,
    /// CPOL=1, CPHA=0. Same CS restriction as mode 0.
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Clock idles high
    #[must_use]
    pub const fn polarity(self) -> bool {
        matches!(self, SpiMode::Mode2 | SpiMode::Mode3)
    }

    /// Data captured on the second clock edge
    #[must_use]
    pub const fn phase(self) -> bool {
        matches!(self, SpiMode::Mode1 | SpiMode::Mode3)
    }
}

/// DMA channel selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaChannels {
    /// Claim the lowest free channels
    #[default]
    Auto,
    /// Claim exactly these channels
    Fixed {
        /// Channel moving `SSPDR` into inbound slots
        rx: u8,
        /// Channel moving outbound slots into `SSPDR`
        tx: u8,
    },
}

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// `initialize` not called yet (or it failed)
    #[default]
    Uninitialized,
    /// Hardware configured, edges are being serviced
    Running,
}

/// Slave transport configuration.
///
/// ```ignore
/// let config = SlaveConfig::new()
///     .with_spi(SpiInstance::Spi0)
///     .with_pins(SpiPins::new(16, 19, 18, 17))
///     .with_baud_hz(4_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveConfig {
    /// Peripheral instance
    pub spi: SpiInstance,
    /// Signal pins (must match `spi`)
    pub pins: SpiPins,
    /// Clock polarity / phase, must match the master
    pub mode: SpiMode,
    /// Expected SCK rate
    pub baud_hz: u32,
    /// `clk_peri` frequency feeding the PL022
    pub peri_clock_hz: u32,
    /// DMA channel selection
    pub dma: DmaChannels,
}

impl SlaveConfig {
    /// Reference configuration: SPI1 on GPIO 10..=13, mode 1, 1 MHz.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spi: SpiInstance::Spi1,
            pins: SpiPins::DEFAULT,
            mode: SpiMode::Mode1,
            baud_hz: DEFAULT_BAUD_HZ,
            peri_clock_hz: DEFAULT_PERI_CLOCK_HZ,
            dma: DmaChannels::Auto,
        }
    }

    /// Set the SPI instance
    #[must_use]
    pub const fn with_spi(mut self, spi: SpiInstance) -> Self {
        self.spi = spi;
        self
    }

    /// Set the signal pins
    #[must_use]
    pub const fn with_pins(mut self, pins: SpiPins) -> Self {
        self.pins = pins;
        self
    }

    /// Set the SPI mode
    #[must_use]
    pub const fn with_mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the expected SCK rate
    #[must_use]
    pub const fn with_baud_hz(mut self, baud_hz: u32) -> Self {
        self.baud_hz = baud_hz;
        self
    }

    /// Set the `clk_peri` frequency
    #[must_use]
    pub const fn with_peri_clock_hz(mut self, hz: u32) -> Self {
        self.peri_clock_hz = hz;
        self
    }

    /// Pin the transport to specific DMA channels
    #[must_use]
    pub const fn with_dma_channels(mut self, rx: u8, tx: u8) -> Self {
        self.dma = DmaChannels::Fixed { rx, tx };
        self
    }

    /// Divisors for the configured rates
    pub fn divisors(&self) -> ConfigResult<BaudDivisors> {
        BaudDivisors::compute(self.peri_clock_hz, self.baud_hz)
    }

    /// Check pins, rates and channel numbers without touching hardware
    pub fn validate(&self) -> ConfigResult<()> {
        self.pins.validate(self.spi)?;
        self.divisors()?;
        if let DmaChannels::Fixed { rx, tx } = self.dma
            && (rx == tx || rx >= DMA_CHANNEL_COUNT || tx >= DMA_CHANNEL_COUNT)
        {
            return Err(ConfigError::NoFreeDmaChannel);
        }
        Ok(())
    }
}

impl Default for SlaveConfig {
    fn default() -> Self {
        Self::new()
    }
}
