//! PL022 clock divisors.
//!
//! `SSPCLKOUT = clk_peri / (CPSDVSR * (1 + SCR))`, with `CPSDVSR` even in
//! `2..=254` and `SCR` in `0..=255`. In slave mode the master drives SCK,
//! but the peripheral still needs `clk_peri >= 12 * SCK` to sample it.

use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::SLAVE_CLOCK_RATIO;

/// Prescale and post-divide pair for `SSPCPSR` and `SSPCR0.SCR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivisors {
    /// `CPSDVSR` (even, 2..=254)
    pub prescale: u32,
    /// Post divider (1..=256); `SCR = postdiv - 1`
    pub postdiv: u32,
}

impl BaudDivisors {
    /// Smallest even prescale that can reach `baud_hz`, then the largest
    /// post divider whose rate still lands above it. Matches the vendor SDK,
    /// so the result may round up when the post divider saturates.
    pub fn compute(peri_hz: u32, baud_hz: u32) -> ConfigResult<Self> {
        if baud_hz == 0 || peri_hz == 0 {
            return Err(ConfigError::InvalidBaudRate);
        }
        if u64::from(baud_hz) * u64::from(SLAVE_CLOCK_RATIO) > u64::from(peri_hz) {
            return Err(ConfigError::InvalidBaudRate);
        }

        let freq_in = u64::from(peri_hz);
        let baud = u64::from(baud_hz);

        let prescale = (2..=254u64)
            .step_by(2)
            .find(|&p| freq_in < (p + 2) * 256 * baud)
            .ok_or(ConfigError::InvalidBaudRate)?;

        let postdiv = (2..=256u64)
            .rev()
            .find(|&d| freq_in / (prescale * (d - 1)) > baud)
            .unwrap_or(1);

        Ok(Self {
            prescale: prescale as u32,
            postdiv: postdiv as u32,
        })
    }

    /// `SCR` field value
    #[inline(always)]
    #[must_use]
    pub const fn scr(&self) -> u32 {
        self.postdiv - 1
    }

    /// Rate these divisors produce from `peri_hz`
    #[inline]
    #[must_use]
    pub const fn actual_hz(&self, peri_hz: u32) -> u32 {
        peri_hz / (self.prescale * self.postdiv)
    }
}
