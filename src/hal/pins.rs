//! SPI pin assignment and the RP2040 function table.
//!
//! In `IO_BANK0` function 1 (SPI) follows a fixed pattern: bit 3 of the
//! GPIO number selects the instance and the low two bits select the signal
//! (0 = RX, 1 = CSn, 2 = SCK, 3 = TX).

use crate::driver::config::SpiInstance;
use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::GPIO_COUNT;

/// SPI signal carried by a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiSignal {
    /// Master-out, slave-in (slave receive)
    Rx,
    /// Chip select, active low
    Csn,
    /// Serial clock
    Sck,
    /// Master-in, slave-out (slave transmit)
    Tx,
}

impl SpiSignal {
    /// SPI instance and signal a GPIO carries in function 1, if any
    #[must_use]
    pub const fn of_gpio(gpio: u8) -> Option<(SpiInstance, SpiSignal)> {
        if gpio >= GPIO_COUNT {
            return None;
        }
        let instance = if (gpio >> 3) & 1 == 0 {
            SpiInstance::Spi0
        } else {
            SpiInstance::Spi1
        };
        let signal = match gpio & 0b11 {
            0 => SpiSignal::Rx,
            1 => SpiSignal::Csn,
            2 => SpiSignal::Sck,
            _ => SpiSignal::Tx,
        };
        Some((instance, signal))
    }
}

/// GPIO numbers for the four slave signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    /// Receive (MOSI)
    pub rx: u8,
    /// Transmit (MISO)
    pub tx: u8,
    /// Clock
    pub sck: u8,
    /// Chip select, also the edge interrupt source
    pub csn: u8,
}

impl SpiPins {
    /// Pins of the reference board on SPI1
    pub const DEFAULT: Self = Self {
        rx: 12,
        tx: 11,
        sck: 10,
        csn: 13,
    };

    /// Create a pin set
    #[must_use]
    pub const fn new(rx: u8, tx: u8, sck: u8, csn: u8) -> Self {
        Self { rx, tx, sck, csn }
    }

    /// Pins paired with the signal each must carry
    #[must_use]
    pub const fn assignments(&self) -> [(u8, SpiSignal); 4] {
        [
            (self.rx, SpiSignal::Rx),
            (self.tx, SpiSignal::Tx),
            (self.sck, SpiSignal::Sck),
            (self.csn, SpiSignal::Csn),
        ]
    }

    /// Check that every pin carries its signal on `spi` and no pin is reused
    pub fn validate(&self, spi: SpiInstance) -> ConfigResult<()> {
        let assignments = self.assignments();

        for (i, (gpio, _)) in assignments.iter().enumerate() {
            if assignments[i + 1..].iter().any(|(other, _)| other == gpio) {
                return Err(ConfigError::PinConflict);
            }
        }

        for (gpio, signal) in assignments {
            match SpiSignal::of_gpio(gpio) {
                Some((instance, carried)) if instance == spi && carried == signal => {}
                _ => return Err(ConfigError::InvalidPin),
            }
        }

        Ok(())
    }
}

impl Default for SpiPins {
    fn default() -> Self {
        Self::DEFAULT
    }
}
