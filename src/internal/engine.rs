//! Frame-boundary bookkeeping for the two DMA directions.
//!
//! [`TransferEngine`] owns both frame rings and the all-zero frame, and
//! decides at every frame end which memory each DMA channel is bound to
//! next. It never touches hardware; the driver applies the returned
//! [`EngineBinding`]s through the backend.

use super::ring::{FrameRing, WriteOutcome};
use crate::hal::{BindingSource, Direction, EngineBinding};

/// What the master did during the frame that just ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameExchange {
    /// Bytes the inbound channel moved into the landing slot
    pub inbound_bytes: usize,
    /// Bytes drained from the RX FIFO after the abort
    pub drained: usize,
    /// Bytes the outbound channel had not yet moved into the TX FIFO
    pub outbound_remaining: usize,
    /// Transmit requests were withheld for this frame (stale TX FIFO)
    pub outbound_deferred: bool,
}

impl FrameExchange {
    /// The master clocked at least one byte
    #[inline]
    pub const fn clocked(&self) -> bool {
        self.inbound_bytes > 0 || self.drained > 0
    }
}

/// Outcome of [`TransferEngine::rearm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RearmReport {
    /// Next inbound binding
    pub inbound: EngineBinding,
    /// Next outbound binding
    pub outbound: EngineBinding,
    /// Set when a full inbound frame was committed
    pub committed: Option<WriteOutcome>,
    /// Source that was streamed out, if the outbound frame counts as sent
    pub sent: Option<BindingSource>,
}

/// Both frame rings plus the outbound binding state.
pub struct TransferEngine<const FRAME: usize, const DEPTH: usize> {
    inbound: FrameRing<FRAME, DEPTH>,
    outbound: FrameRing<FRAME, DEPTH>,
    zero_frame: [u8; FRAME],
    outbound_source: BindingSource,
    /// Head of the outbound source already sitting in the TX FIFO
    outbound_offset: usize,
}

impl<const FRAME: usize, const DEPTH: usize> TransferEngine<FRAME, DEPTH> {
    /// Create an engine with empty rings. Const-compatible.
    pub const fn new() -> Self {
        Self {
            inbound: FrameRing::new(),
            outbound: FrameRing::new(),
            zero_frame: [0u8; FRAME],
            outbound_source: BindingSource::ZeroFrame,
            outbound_offset: 0,
        }
    }

    /// Queue capacity per direction
    #[inline(always)]
    pub const fn capacity() -> usize {
        FrameRing::<FRAME, DEPTH>::capacity()
    }

    /// Drop all queued frames in both directions
    pub fn reset(&mut self) {
        self.inbound.reset();
        self.outbound.reset();
        self.outbound_source = BindingSource::ZeroFrame;
        self.outbound_offset = 0;
    }

    /// Initial bindings: inbound at the landing slot, outbound at the next
    /// queued frame or the zero frame.
    pub fn prime(&mut self) -> (EngineBinding, EngineBinding) {
        self.outbound_source = self.next_outbound_source();
        self.outbound_offset = 0;
        (self.inbound_binding(), self.outbound_binding())
    }

    /// Account for the frame that just ended and pick the next bindings.
    ///
    /// Only a full frame is committed to the inbound ring; anything shorter
    /// is overwritten by rebinding the same landing slot.
    ///
    /// The outbound frame counts as sent only when the master clocked at
    /// least one byte with transmit requests enabled. If nothing was
    /// clocked but the channel already staged the head of the frame in the
    /// TX FIFO, the binding resumes after that head so the next frame
    /// carries it exactly once. Otherwise the same source is replayed.
    pub fn rearm(&mut self, exchange: FrameExchange) -> RearmReport {
        let committed = (exchange.inbound_bytes >= FRAME).then(|| self.inbound.advance_write());

        let consumed = exchange.clocked() && !exchange.outbound_deferred;
        let staged = if exchange.outbound_deferred {
            0
        } else {
            self.outbound_len().saturating_sub(exchange.outbound_remaining)
        };
        let previous = self.outbound_source;

        if consumed {
            self.outbound_offset = 0;
            self.outbound_source = self.next_outbound_source();
        } else {
            self.outbound_offset += staged;
            if self.outbound_offset == 0 && previous == BindingSource::ZeroFrame {
                self.outbound_source = self.next_outbound_source();
            }
        }

        RearmReport {
            inbound: self.inbound_binding(),
            outbound: self.outbound_binding(),
            committed,
            sent: consumed.then_some(previous),
        }
    }

    /// Rebind a starved outbound channel to a freshly queued frame.
    ///
    /// Returns the new binding when the outbound side was streaming the zero
    /// frame and a frame is now queued.
    pub fn promote(&mut self) -> Option<EngineBinding> {
        // Staged zeros ahead of a promoted frame would shift it
        if self.outbound_source != BindingSource::ZeroFrame || self.outbound_offset > 0 {
            return None;
        }
        let idx = self.outbound.try_reserve_next()?;
        self.outbound_source = BindingSource::Slot(idx);
        Some(self.outbound_binding())
    }

    /// Queue an outbound frame. `false` when the ring is full.
    #[inline]
    pub fn submit(&mut self, frame: &[u8; FRAME]) -> bool {
        self.outbound.enqueue(frame)
    }

    /// Copy out the oldest inbound frame. `false` when none is queued.
    #[inline]
    pub fn receive_into(&mut self, out: &mut [u8; FRAME]) -> bool {
        match self.inbound.dequeue() {
            Some(frame) => {
                out.copy_from_slice(frame);
                true
            }
            None => false,
        }
    }

    /// Outbound frames queued behind the engine
    #[inline(always)]
    pub const fn outbound_pending(&self) -> usize {
        self.outbound.len()
    }

    /// Inbound frames awaiting the application
    #[inline(always)]
    pub const fn inbound_pending(&self) -> usize {
        self.inbound.len()
    }

    /// Current outbound source
    #[inline(always)]
    pub const fn outbound_source(&self) -> BindingSource {
        self.outbound_source
    }

    /// Bytes of the outbound source already staged in the TX FIFO by an
    /// earlier unclocked frame window
    #[inline(always)]
    pub const fn outbound_carried(&self) -> usize {
        self.outbound_offset
    }

    #[inline(always)]
    const fn outbound_len(&self) -> usize {
        FRAME - self.outbound_offset
    }

    fn next_outbound_source(&mut self) -> BindingSource {
        self.outbound
            .try_reserve_next()
            .map_or(BindingSource::ZeroFrame, BindingSource::Slot)
    }

    fn inbound_binding(&mut self) -> EngineBinding {
        let idx = self.inbound.cursor();
        EngineBinding {
            direction: Direction::Inbound,
            addr: self.inbound.slot_mut_ptr(idx).cast_const(),
            len: FRAME,
            source: BindingSource::Slot(idx),
        }
    }

    fn outbound_binding(&self) -> EngineBinding {
        let base = match self.outbound_source {
            BindingSource::Slot(idx) => self.outbound.slot_ptr(idx),
            BindingSource::ZeroFrame => self.zero_frame.as_ptr(),
        };
        EngineBinding {
            direction: Direction::Outbound,
            addr: base.wrapping_add(self.outbound_offset),
            len: self.outbound_len(),
            source: self.outbound_source,
        }
    }
}

impl<const FRAME: usize, const DEPTH: usize> Default for TransferEngine<FRAME, DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
