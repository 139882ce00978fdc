//! Chip-select edge events and link phase.
//!
//! The select line is active-low: a falling edge opens a frame window
//! ([`SelectEdge::Assert`]), a rising edge closes it
//! ([`SelectEdge::Deassert`]).

use crate::internal::register::io::{GPIO_EVENT_EDGE_HIGH, GPIO_EVENT_EDGE_LOW};

/// Chip-select transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectEdge {
    /// Line driven low, master starts clocking a frame
    Assert,
    /// Line released high, frame complete
    Deassert,
}

/// Implicit state of the select line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkPhase {
    /// Line deasserted, no transfer expected
    #[default]
    Idle,
    /// Line asserted, master is clocking a frame
    Active,
}

/// Edge events latched for the CS pin since the last acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvents {
    /// Rising edge seen (frame end)
    pub deassert: bool,
    /// Falling edge seen (frame start)
    pub assert: bool,
}

impl EdgeEvents {
    /// No pending event
    pub const NONE: Self = Self {
        deassert: false,
        assert: false,
    };

    /// Create from the 4-bit GPIO event nibble of the CS pin
    #[inline]
    pub fn from_raw(events: u32) -> Self {
        Self {
            deassert: (events & GPIO_EVENT_EDGE_HIGH) != 0,
            assert: (events & GPIO_EVENT_EDGE_LOW) != 0,
        }
    }

    /// Convert back to the event nibble (write-1-to-clear)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.deassert {
            val |= GPIO_EVENT_EDGE_HIGH;
        }
        if self.assert {
            val |= GPIO_EVENT_EDGE_LOW;
        }
        val
    }

    /// Event for a single edge
    #[inline]
    pub const fn from_edge(edge: SelectEdge) -> Self {
        match edge {
            SelectEdge::Assert => Self {
                deassert: false,
                assert: true,
            },
            SelectEdge::Deassert => Self {
                deassert: true,
                assert: false,
            },
        }
    }

    /// Check if any edge is pending
    #[inline]
    pub fn any(&self) -> bool {
        self.deassert || self.assert
    }

    /// Edges in handling order: a frame end is always closed out before
    /// the next frame start is armed.
    pub fn edges(&self) -> impl Iterator<Item = SelectEdge> {
        let deassert = self.deassert.then_some(SelectEdge::Deassert);
        let assert = self.assert.then_some(SelectEdge::Assert);
        deassert.into_iter().chain(assert)
    }
}

impl core::ops::BitOr for EdgeEvents {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            deassert: self.deassert || rhs.deassert,
            assert: self.assert || rhs.assert,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
