//! Fixed-capacity circular store of whole frames.
//!
//! One [`FrameRing`] exists per direction. The slot at `cursor` always
//! belongs to the DMA engine; the application only ever touches the slots
//! on the far side of it, so one slot of the `DEPTH` is never queueable.
//!
//! Outbound rings use [`FrameRing::enqueue`] (application) and
//! [`FrameRing::try_reserve_next`] (re-arm). Inbound rings use
//! [`FrameRing::advance_write`] (re-arm) and [`FrameRing::dequeue`]
//! (application).

/// Result of committing a received frame with [`FrameRing::advance_write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Frame queued, a free slot became the new landing slot
    Stored,
    /// Ring was full, the oldest unread frame was evicted
    Overwrote,
}

/// Circular frame ring with an engine cursor and a stored-frame count.
pub struct FrameRing<const FRAME: usize, const DEPTH: usize> {
    /// Frame storage
    pub(super) slots: [[u8; FRAME]; DEPTH],
    /// Slot currently bound to the DMA engine
    pub(super) cursor: usize,
    /// Frames awaiting transfer (outbound) or consumption (inbound)
    pub(super) stored: usize,
}

impl<const FRAME: usize, const DEPTH: usize> FrameRing<FRAME, DEPTH> {
    /// Create an empty ring. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        const {
            assert!(DEPTH >= 2, "a frame ring needs at least two slots");
            assert!(FRAME > 0, "frames must not be empty");
        }
        Self {
            slots: [[0u8; FRAME]; DEPTH],
            cursor: 0,
            stored: 0,
        }
    }

    /// Maximum number of queued frames (one slot stays with the engine)
    #[inline(always)]
    #[must_use]
    pub const fn capacity() -> usize {
        DEPTH - 1
    }

    /// Number of queued frames
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stored
    }

    /// Check if no frame is queued
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stored == 0
    }

    /// Check if the ring cannot accept another frame
    #[inline(always)]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.stored >= Self::capacity()
    }

    /// Slot currently bound to the engine
    #[inline(always)]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Forget all queued frames and park the cursor on slot 0
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.stored = 0;
    }

    // =========================================================================
    // Outbound side
    // =========================================================================

    /// Queue a frame behind the engine slot and any frames already waiting.
    ///
    /// Returns `false` and leaves the ring untouched when it is full.
    pub fn enqueue(&mut self, frame: &[u8; FRAME]) -> bool {
        if self.is_full() {
            return false;
        }
        let idx = (self.cursor + 1 + self.stored) % DEPTH;
        self.slots[idx] = *frame;
        self.stored += 1;
        true
    }

    /// Move the cursor onto the next queued frame and hand it to the engine.
    ///
    /// Returns `None` when nothing is queued; the cursor stays put.
    pub fn try_reserve_next(&mut self) -> Option<usize> {
        if self.stored == 0 {
            return None;
        }
        self.cursor = (self.cursor + 1) % DEPTH;
        self.stored -= 1;
        Some(self.cursor)
    }

    // =========================================================================
    // Inbound side
    // =========================================================================

    /// Commit the frame the engine just wrote at the cursor and move on.
    ///
    /// When the ring is full the next slot still holds the oldest unread
    /// frame; it becomes the landing slot and that frame is lost.
    pub fn advance_write(&mut self) -> WriteOutcome {
        self.cursor = (self.cursor + 1) % DEPTH;
        if self.is_full() {
            WriteOutcome::Overwrote
        } else {
            self.stored += 1;
            WriteOutcome::Stored
        }
    }

    /// Take the oldest committed frame.
    pub fn dequeue(&mut self) -> Option<&[u8; FRAME]> {
        if self.stored == 0 {
            return None;
        }
        let idx = (self.cursor + DEPTH - self.stored) % DEPTH;
        self.stored -= 1;
        Some(&self.slots[idx])
    }

    // =========================================================================
    // Engine addressing
    // =========================================================================

    /// Frame stored at `index` (wraps)
    #[inline(always)]
    pub fn slot(&self, index: usize) -> &[u8; FRAME] {
        &self.slots[index % DEPTH]
    }

    /// Engine read address of the slot at `index` (wraps)
    #[inline(always)]
    pub fn slot_ptr(&self, index: usize) -> *const u8 {
        self.slots[index % DEPTH].as_ptr()
    }

    /// Engine write address of the slot at `index` (wraps)
    #[inline(always)]
    pub fn slot_mut_ptr(&mut self, index: usize) -> *mut u8 {
        self.slots[index % DEPTH].as_mut_ptr()
    }
}

impl<const FRAME: usize, const DEPTH: usize> Default for FrameRing<FRAME, DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame<const F: usize>(fill: u8) -> [u8; F] {
        [fill; F]
    }

    #[test]
    fn new_ring_is_empty() {
        let ring: FrameRing<8, 4> = FrameRing::new();
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.cursor(), 0);
    }

    #[test]
    fn capacity_reserves_engine_slot() {
        assert_eq!(FrameRing::<8, 4>::capacity(), 3);
        assert_eq!(FrameRing::<128, 32>::capacity(), 31);
        assert_eq!(FrameRing::<1, 2>::capacity(), 1);
    }

    #[test]
    fn enqueue_writes_behind_cursor() {
        let mut ring: FrameRing<4, 4> = FrameRing::new();
        assert!(ring.enqueue(&frame(0x11)));
        assert!(ring.enqueue(&frame(0x22)));

        // Slot 0 belongs to the engine, queued frames start at slot 1
        assert_eq!(ring.slot(0), &[0; 4]);
        assert_eq!(ring.slot(1), &[0x11; 4]);
        assert_eq!(ring.slot(2), &[0x22; 4]);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn reserve_returns_frames_in_submission_order() {
        let mut ring: FrameRing<2, 8> = FrameRing::new();
        for fill in 1..=5u8 {
            assert!(ring.enqueue(&frame(fill)));
        }

        for fill in 1..=5u8 {
            let idx = ring.try_reserve_next().unwrap();
            assert_eq!(ring.slot(idx), &[fill; 2]);
            assert_eq!(ring.cursor(), idx);
        }
        assert_eq!(ring.try_reserve_next(), None);
    }

    #[test]
    fn reserve_on_empty_keeps_cursor() {
        let mut ring: FrameRing<2, 4> = FrameRing::new();
        ring.enqueue(&frame(1));
        ring.try_reserve_next();
        let cursor = ring.cursor();

        assert_eq!(ring.try_reserve_next(), None);
        assert_eq!(ring.cursor(), cursor);
        assert_eq!(ring.len(), 0);
    }

    #[test]
    fn enqueue_when_full_is_idempotent_drop() {
        let mut ring: FrameRing<2, 4> = FrameRing::new();
        for fill in 1..=3u8 {
            assert!(ring.enqueue(&frame(fill)));
        }
        assert!(ring.is_full());

        assert!(!ring.enqueue(&frame(0xEE)));
        assert!(!ring.enqueue(&frame(0xEE)));
        assert_eq!(ring.len(), 3);
        for (offset, fill) in (1..=3u8).enumerate() {
            assert_eq!(ring.slot(1 + offset), &[fill; 2]);
        }
    }

    #[test]
    fn enqueue_never_touches_engine_slot() {
        let mut ring: FrameRing<2, 4> = FrameRing::new();
        for round in 0..20u8 {
            while ring.enqueue(&frame(round)) {}
            let idx = ring.try_reserve_next().unwrap();
            let before = *ring.slot(idx);
            // Refill while the engine streams from `idx`
            while ring.enqueue(&frame(0xFF)) {}
            assert_eq!(ring.slot(idx), &before);
            while ring.try_reserve_next().is_some() {}
        }
    }

    #[test]
    fn outbound_wraparound_keeps_order() {
        let mut ring: FrameRing<1, 3> = FrameRing::new();
        let mut next_in = 0u8;
        let mut next_out = 0u8;

        for _ in 0..50 {
            assert!(ring.enqueue(&[next_in]));
            next_in = next_in.wrapping_add(1);
            let idx = ring.try_reserve_next().unwrap();
            assert_eq!(ring.slot(idx), &[next_out]);
            next_out = next_out.wrapping_add(1);
        }
    }

    #[test]
    fn advance_write_then_dequeue() {
        let mut ring: FrameRing<2, 4> = FrameRing::new();
        ring.slots[ring.cursor()] = [0xA1; 2];
        assert_eq!(ring.advance_write(), WriteOutcome::Stored);
        ring.slots[ring.cursor()] = [0xA2; 2];
        assert_eq!(ring.advance_write(), WriteOutcome::Stored);

        assert_eq!(ring.dequeue(), Some(&[0xA1; 2]));
        assert_eq!(ring.dequeue(), Some(&[0xA2; 2]));
        assert_eq!(ring.dequeue(), None);
    }

    #[test]
    fn dequeue_on_empty_returns_none() {
        let mut ring: FrameRing<2, 4> = FrameRing::new();
        assert_eq!(ring.dequeue(), None);
        assert_eq!(ring.len(), 0);
    }

    #[test]
    fn advance_write_overflow_evicts_oldest() {
        let mut ring: FrameRing<1, 4> = FrameRing::new();
        let capacity = FrameRing::<1, 4>::capacity();

        for fill in 0..capacity as u8 {
            ring.slots[ring.cursor()] = [fill];
            assert_eq!(ring.advance_write(), WriteOutcome::Stored);
        }
        assert!(ring.is_full());

        // capacity + 1-th arrival
        ring.slots[ring.cursor()] = [0x99];
        assert_eq!(ring.advance_write(), WriteOutcome::Overwrote);
        assert_eq!(ring.len(), capacity);

        // Oldest (0) is gone, survivors stay ordered, newest is last
        assert_eq!(ring.dequeue(), Some(&[1]));
        assert_eq!(ring.dequeue(), Some(&[2]));
        assert_eq!(ring.dequeue(), Some(&[0x99]));
        assert_eq!(ring.dequeue(), None);
    }

    #[test]
    fn landing_slot_never_holds_unread_frame() {
        let mut ring: FrameRing<1, 4> = FrameRing::new();
        for fill in 0..40u8 {
            ring.slots[ring.cursor()] = [fill];
            ring.advance_write();

            let landing = ring.cursor();
            for age in 1..=ring.len() {
                let idx = (landing + 4 - age) % 4;
                assert_ne!(idx, landing);
            }
        }
    }

    #[test]
    fn slot_pointers_are_stable_and_distinct() {
        let mut ring: FrameRing<16, 4> = FrameRing::new();
        let p0 = ring.slot_ptr(0);
        let p1 = ring.slot_ptr(1);
        assert_ne!(p0, p1);
        assert_eq!(p1 as usize - p0 as usize, 16);
        assert_eq!(ring.slot_ptr(4), p0);
        assert_eq!(ring.slot_mut_ptr(1) as *const u8, p1);
    }

    #[test]
    fn reset_clears_bookkeeping() {
        let mut ring: FrameRing<2, 4> = FrameRing::new();
        ring.enqueue(&frame(1));
        ring.enqueue(&frame(2));
        ring.try_reserve_next();
        ring.reset();

        assert_eq!(ring.cursor(), 0);
        assert!(ring.is_empty());
    }
}
