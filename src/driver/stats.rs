//! Link counters.
//!
//! Every lossy decision the transport makes (drop, overwrite, zero fill,
//! deferral, drain) is counted here, since none of them is reported as an
//! error. Counters wrap.

use crate::hal::BindingSource;
use crate::internal::engine::RearmReport;
use crate::internal::ring::WriteOutcome;

/// Per-instance link statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Queued outbound frames clocked out to the master
    pub frames_sent: u32,
    /// Complete inbound frames committed to the inbound ring
    pub frames_received: u32,
    /// Frames where the master read the zero frame
    pub zero_frames_sent: u32,
    /// Frame windows that ended with a partial inbound frame (discarded)
    pub partial_frames: u32,
    /// Frames rejected by `submit` because the outbound ring was full
    pub outbound_dropped: u32,
    /// Unread inbound frames evicted by newer ones
    pub inbound_overwritten: u32,
    /// Frame windows opened with transmit requests withheld
    pub deferred_transmits: u32,
    /// Stale bytes discarded from the receive FIFO at frame end
    pub drained_bytes: u32,
}

impl LinkStats {
    /// All counters zero (const)
    pub const fn new() -> Self {
        Self {
            frames_sent: 0,
            frames_received: 0,
            zero_frames_sent: 0,
            partial_frames: 0,
            outbound_dropped: 0,
            inbound_overwritten: 0,
            deferred_transmits: 0,
            drained_bytes: 0,
        }
    }

    /// Account for one closed frame window
    pub(crate) fn record_frame<const FRAME: usize>(
        &mut self,
        report: &RearmReport,
        inbound_bytes: usize,
        drained: usize,
    ) {
        match report.committed {
            Some(WriteOutcome::Stored) => self.frames_received = self.frames_received.wrapping_add(1),
            Some(WriteOutcome::Overwrote) => {
                self.frames_received = self.frames_received.wrapping_add(1);
                self.inbound_overwritten = self.inbound_overwritten.wrapping_add(1);
            }
            None if inbound_bytes > 0 && inbound_bytes < FRAME => {
                self.partial_frames = self.partial_frames.wrapping_add(1);
            }
            None => {}
        }

        match report.sent {
            Some(BindingSource::Slot(_)) => self.frames_sent = self.frames_sent.wrapping_add(1),
            Some(BindingSource::ZeroFrame) => {
                self.zero_frames_sent = self.zero_frames_sent.wrapping_add(1);
            }
            None => {}
        }

        self.drained_bytes = self.drained_bytes.wrapping_add(drained as u32);
    }

    pub(crate) fn record_drop(&mut self) {
        self.outbound_dropped = self.outbound_dropped.wrapping_add(1);
    }

    pub(crate) fn record_deferral(&mut self) {
        self.deferred_transmits = self.deferred_transmits.wrapping_add(1);
    }
}
