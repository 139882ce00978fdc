//! Hardware Abstraction Layer
//!
//! The transport core never touches registers directly. Everything it needs
//! from the SPI peripheral, the DMA controller and the CS edge detector goes
//! through [`SlaveHardware`], so the frame logic runs unchanged against the
//! RP2040 backend or a host-side simulator.
//!
//! # Modules
//!
//! - [`clock`]: Baud divisor computation for the PL022
//! - [`pins`]: SPI function pin table and validation
//! - [`reset`]: Subsystem reset sequencing (feature `rp2040`)
//! - [`rp2040`]: Register-level backend (feature `rp2040`)
//!
//! # Delay Integration
//!
//! Bring-up uses `embedded_hal::delay::DelayNs` directly. Pass any delay
//! implementation from your HAL.

pub mod clock;
pub mod pins;
#[cfg(feature = "rp2040")]
#[cfg_attr(docsrs, doc(cfg(feature = "rp2040")))]
pub mod reset;
#[cfg(feature = "rp2040")]
#[cfg_attr(docsrs, doc(cfg(feature = "rp2040")))]
pub mod rp2040;

pub use clock::BaudDivisors;
pub use pins::{SpiPins, SpiSignal};

use embedded_hal::delay::DelayNs;

use crate::driver::config::SlaveConfig;
use crate::driver::edge::EdgeEvents;
use crate::driver::error::Result;

// =============================================================================
// Directions
// =============================================================================

/// Transfer direction as seen from the slave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master to slave (peripheral RX FIFO into memory)
    Inbound,
    /// Slave to master (memory into peripheral TX FIFO)
    Outbound,
}

/// Set of directions, used for DMA request enables and channel control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Directions {
    /// Inbound lane selected
    pub inbound: bool,
    /// Outbound lane selected
    pub outbound: bool,
}

impl Directions {
    /// No direction
    pub const NONE: Self = Self {
        inbound: false,
        outbound: false,
    };
    /// Inbound only
    pub const INBOUND: Self = Self {
        inbound: true,
        outbound: false,
    };
    /// Outbound only
    pub const OUTBOUND: Self = Self {
        inbound: false,
        outbound: true,
    };
    /// Both directions
    pub const BOTH: Self = Self {
        inbound: true,
        outbound: true,
    };

    /// Check whether `direction` is part of the set
    #[inline]
    pub const fn contains(&self, direction: Direction) -> bool {
        match direction {
            Direction::Inbound => self.inbound,
            Direction::Outbound => self.outbound,
        }
    }

    /// Check if the set is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !self.inbound && !self.outbound
    }
}

// =============================================================================
// Engine Binding
// =============================================================================

/// Where the engine reads from or writes to for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingSource {
    /// A slot of the direction's frame ring
    Slot(usize),
    /// The shared all-zero frame (outbound only)
    ZeroFrame,
}

/// One frame's worth of DMA programming for one direction.
///
/// `addr` is the memory side of the transfer: the write address for
/// inbound, the read address for outbound. The peripheral side is fixed at
/// configure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineBinding {
    /// Direction this binding programs
    pub direction: Direction,
    /// Memory address of the first byte still to move
    pub addr: *const u8,
    /// Transfer length in bytes. One frame, except for an outbound frame
    /// whose head is already staged in the TX FIFO; may then be zero.
    pub len: usize,
    /// Ring slot or zero frame behind `addr`
    pub source: BindingSource,
}

impl EngineBinding {
    /// Memory address as a 32-bit bus address
    #[inline(always)]
    pub fn bus_addr(&self) -> u32 {
        self.addr as usize as u32
    }
}

// =============================================================================
// Hardware Trait
// =============================================================================

/// Operations the transport needs from the SPI + DMA + CS-edge hardware.
///
/// Every method except [`configure`](Self::configure) is called with the
/// transport's exclusion domain held and must complete in bounded time.
pub trait SlaveHardware {
    /// Bring the peripheral up in slave mode, claim two DMA channels and
    /// enable the chip-select edge interrupt. Requests stay disabled.
    fn configure<D: DelayNs>(&mut self, config: &SlaveConfig, delay: &mut D) -> Result<()>;

    /// Program address and count for one direction without triggering it.
    fn bind(&mut self, binding: &EngineBinding);

    /// Trigger the selected channels with their current binding. A
    /// zero-length binding is left idle.
    fn start_channels(&mut self, channels: Directions);

    /// Abort any in-flight transfer on the selected channels.
    fn abort_channels(&mut self, channels: Directions);

    /// Bytes the selected channel still has to move in its current transfer.
    fn remaining(&self, direction: Direction) -> usize;

    /// Let the peripheral pace the selected channels (set `RXDMAE`/`TXDMAE`).
    fn enable_requests(&mut self, requests: Directions);

    /// Stop the peripheral from pacing the selected channels.
    fn disable_requests(&mut self, requests: Directions);

    /// Check if the receive FIFO holds at least one entry.
    fn rx_readable(&self) -> bool;

    /// Pop one entry from the receive FIFO.
    fn read_rx(&mut self) -> u8;

    /// Check if the transmit FIFO is empty.
    fn tx_fifo_empty(&self) -> bool;

    /// Read and acknowledge pending chip-select edge events.
    fn take_select_events(&mut self) -> EdgeEvents;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_contains() {
        assert!(Directions::BOTH.contains(Direction::Inbound));
        assert!(Directions::BOTH.contains(Direction::Outbound));
        assert!(Directions::INBOUND.contains(Direction::Inbound));
        assert!(!Directions::INBOUND.contains(Direction::Outbound));
        assert!(!Directions::OUTBOUND.contains(Direction::Inbound));
    }

    #[test]
    fn directions_empty() {
        assert!(Directions::NONE.is_empty());
        assert!(Directions::default().is_empty());
        assert!(!Directions::OUTBOUND.is_empty());
    }

    #[test]
    fn binding_bus_addr_truncates_pointer() {
        let frame = [0u8; 4];
        let binding = EngineBinding {
            direction: Direction::Outbound,
            addr: frame.as_ptr(),
            len: frame.len(),
            source: BindingSource::ZeroFrame,
        };
        assert_eq!(binding.bus_addr(), frame.as_ptr() as usize as u32);
    }
}
