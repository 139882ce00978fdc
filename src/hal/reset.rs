//! Reset Controller HAL
//!
//! Cycles RP2040 subsystems through `RESETS` and waits for `RESET_DONE`
//! with a bounded poll.

use embedded_hal::delay::DelayNs;

use crate::driver::config::SpiInstance;
use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::{RESET_POLL_INTERVAL_US, RESET_TIMEOUT_US};
use crate::internal::register::resets::{
    RESET_DMA, RESET_IO_BANK0, RESET_PADS_BANK0, RESET_SPI0, RESET_SPI1, Resets,
};

/// `RESETS` bit of an SPI instance
#[must_use]
pub const fn spi_reset_bit(spi: SpiInstance) -> u32 {
    match spi {
        SpiInstance::Spi0 => RESET_SPI0,
        SpiInstance::Spi1 => RESET_SPI1,
    }
}

/// Blocks the transport needs out of reset besides the SPI instance itself.
/// They are released but never cycled, since other code may share them.
pub const SHARED_BLOCKS: u32 = RESET_DMA | RESET_IO_BANK0 | RESET_PADS_BANK0;

/// Number of `RESET_DONE` polls that fit in `timeout_us`
#[must_use]
pub const fn poll_budget(timeout_us: u32) -> u32 {
    let polls = timeout_us / RESET_POLL_INTERVAL_US;
    if polls == 0 { 1 } else { polls }
}

/// Reset controller for the SPI slave's subsystems
#[derive(Debug)]
pub struct ResetController<'a, D: DelayNs> {
    delay: &'a mut D,
    timeout_us: u32,
}

impl<'a, D: DelayNs> ResetController<'a, D> {
    /// Create a controller with the default timeout
    pub fn new(delay: &'a mut D) -> Self {
        Self {
            delay,
            timeout_us: RESET_TIMEOUT_US,
        }
    }

    /// Create a controller with a custom timeout
    pub fn with_timeout(delay: &'a mut D, timeout_us: u32) -> Self {
        Self { delay, timeout_us }
    }

    /// Put `spi` through a full reset cycle and make sure the shared blocks
    /// are running.
    pub fn reset_spi(&mut self, spi: SpiInstance) -> ConfigResult<()> {
        let spi_bit = spi_reset_bit(spi);
        Resets::assert(spi_bit);
        Resets::release(spi_bit | SHARED_BLOCKS);
        self.wait_done(spi_bit | SHARED_BLOCKS)
    }

    /// Wait until every block in `mask` reports reset done
    pub fn wait_done(&mut self, mask: u32) -> ConfigResult<()> {
        for _ in 0..poll_budget(self.timeout_us) {
            if Resets::is_done(mask) {
                return Ok(());
            }
            self.delay.delay_us(RESET_POLL_INTERVAL_US);
        }

        if Resets::is_done(mask) {
            Ok(())
        } else {
            Err(ConfigError::ResetFailed)
        }
    }
}
