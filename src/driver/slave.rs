//! SPI slave frame transport.
//!
//! [`SpiSlave`] owns both frame rings, the DMA bindings and the hardware
//! backend behind one [`ExclusionCell`]. Application calls
//! ([`submit`](SpiSlave::submit), [`receive`](SpiSlave::receive)) and the
//! chip-select edge handler ([`handle_interrupt`](SpiSlave::handle_interrupt))
//! all go through it, so ring bookkeeping never interleaves.
//!
//! # Frame Window
//!
//! ```text
//!  CSn  ‾‾‾‾‾‾\____________________________/‾‾‾‾‾‾‾‾
//!             ^ assert                     ^ deassert
//!             enable DMA requests          disable requests, abort,
//!             (TX held back if the         drain RX FIFO, re-arm,
//!              TX FIFO is not empty)       restart channels
//! ```
//!
//! The link is lossy on purpose: a full outbound ring drops the new frame,
//! a full inbound ring evicts the oldest unread frame, and an empty outbound
//! ring makes the master read zeros. [`LinkStats`] counts all of these.

use embedded_hal::delay::DelayNs;

use super::config::{SlaveConfig, State};
use super::edge::{EdgeEvents, LinkPhase, SelectEdge};
use super::error::{ConfigError, IoError, IoResult, Result};
use super::stats::LinkStats;
use crate::hal::{Direction, Directions, SlaveHardware};
use crate::internal::constants::{DEFAULT_FRAME_SIZE, DEFAULT_RING_DEPTH, RX_DRAIN_LIMIT};
use crate::internal::engine::{FrameExchange, TransferEngine};
#[cfg(feature = "defmt")]
use crate::internal::ring::WriteOutcome;
#[cfg(feature = "async")]
use crate::sync::AtomicWaker;
use crate::sync::ExclusionCell;

/// Everything guarded by the exclusion domain
struct SlaveCore<H, const FRAME: usize, const DEPTH: usize> {
    hw: H,
    engine: TransferEngine<FRAME, DEPTH>,
    state: State,
    phase: LinkPhase,
    tx_deferred: bool,
    stats: LinkStats,
}

impl<H: SlaveHardware, const FRAME: usize, const DEPTH: usize> SlaveCore<H, FRAME, DEPTH> {
    /// Handle latched edges. Returns `true` if an inbound frame was committed.
    fn dispatch(&mut self, events: EdgeEvents) -> bool {
        if self.state != State::Running {
            return false;
        }
        let mut committed = false;
        for edge in events.edges() {
            match edge {
                SelectEdge::Deassert => committed |= self.close_frame(),
                SelectEdge::Assert => self.open_frame(),
            }
        }
        committed
    }

    fn close_frame(&mut self) -> bool {
        self.hw.disable_requests(Directions::BOTH);
        let inbound_bytes = FRAME.saturating_sub(self.hw.remaining(Direction::Inbound));
        let outbound_remaining = self.hw.remaining(Direction::Outbound);
        self.hw.abort_channels(Directions::BOTH);
        let drained = self.drain_rx();

        let report = self.engine.rearm(FrameExchange {
            inbound_bytes,
            drained,
            outbound_remaining,
            outbound_deferred: self.tx_deferred,
        });
        self.hw.bind(&report.inbound);
        self.hw.bind(&report.outbound);
        self.hw.start_channels(Directions::BOTH);

        self.tx_deferred = false;
        self.phase = LinkPhase::Idle;
        self.stats.record_frame::<FRAME>(&report, inbound_bytes, drained);

        #[cfg(feature = "defmt")]
        {
            if report.committed == Some(WriteOutcome::Overwrote) {
                defmt::warn!("inbound ring full, oldest frame overwritten");
            }
            if drained > 0 {
                defmt::trace!("drained {} stale RX bytes", drained);
            }
            if self.engine.outbound_carried() > 0 {
                defmt::trace!(
                    "no clocks, {} outbound bytes staged",
                    self.engine.outbound_carried()
                );
            }
        }

        report.committed.is_some()
    }

    fn open_frame(&mut self) {
        // A carried head is the bound frame's own prefix, not residue
        if self.engine.outbound_carried() > 0 || self.hw.tx_fifo_empty() {
            self.hw.enable_requests(Directions::BOTH);
            self.tx_deferred = false;
        } else {
            // Residual bytes would shift the outbound frame; send it next window
            self.hw.enable_requests(Directions::INBOUND);
            self.tx_deferred = true;
            self.stats.record_deferral();

            #[cfg(feature = "defmt")]
            defmt::debug!("TX FIFO not empty at frame start, outbound deferred");
        }
        self.phase = LinkPhase::Active;
    }

    fn drain_rx(&mut self) -> usize {
        let mut drained = 0;
        while drained < RX_DRAIN_LIMIT && self.hw.rx_readable() {
            self.hw.read_rx();
            drained += 1;
        }
        drained
    }

    /// Hand a newly queued frame to an outbound channel that is idling on
    /// the zero frame. Only valid while requests are disabled.
    fn promote_outbound(&mut self) {
        if let Some(binding) = self.engine.promote() {
            self.hw.abort_channels(Directions::OUTBOUND);
            self.hw.bind(&binding);
            self.hw.start_channels(Directions::OUTBOUND);
        }
    }
}

/// DMA-driven SPI slave exchanging `FRAME`-byte frames.
///
/// `DEPTH` slots per direction; one is always bound to the engine, so each
/// queue holds `DEPTH - 1` frames.
///
/// The instance must not move after [`initialize`](Self::initialize): the
/// DMA channels hold addresses into it. Firmware places it in a `static`
/// (see [`spi_slave_static!`](crate::spi_slave_static)).
///
/// # Example
///
/// ```ignore
/// use ph_rp2040_spis::{SlaveConfig, SpiSlave, hal::rp2040::Rp2040Hardware};
///
/// static SLAVE: SpiSlave<Rp2040Hardware> = SpiSlave::new(Rp2040Hardware::new());
///
/// SLAVE.initialize(SlaveConfig::new(), &mut delay)?;
/// SLAVE.submit(&[0xAA; 128]);
///
/// let mut frame = [0u8; 128];
/// if SLAVE.receive(&mut frame) == 128 {
///     // one complete frame from the master
/// }
///
/// #[interrupt]
/// fn IO_IRQ_BANK0() {
///     SLAVE.handle_interrupt();
/// }
/// ```
pub struct SpiSlave<H, const FRAME: usize = DEFAULT_FRAME_SIZE, const DEPTH: usize = DEFAULT_RING_DEPTH>
{
    core: ExclusionCell<SlaveCore<H, FRAME, DEPTH>>,
    #[cfg(feature = "async")]
    rx_waker: AtomicWaker,
}

impl<H: SlaveHardware, const FRAME: usize, const DEPTH: usize> SpiSlave<H, FRAME, DEPTH> {
    /// Frame size in bytes
    pub const FRAME_SIZE: usize = FRAME;

    /// Create an uninitialized transport (const, suitable for statics)
    pub const fn new(hw: H) -> Self {
        Self {
            core: ExclusionCell::new(SlaveCore {
                hw,
                engine: TransferEngine::new(),
                state: State::Uninitialized,
                phase: LinkPhase::Idle,
                tx_deferred: false,
                stats: LinkStats::new(),
            }),
            #[cfg(feature = "async")]
            rx_waker: AtomicWaker::new(),
        }
    }

    /// Frames each direction can queue
    pub const fn capacity() -> usize {
        TransferEngine::<FRAME, DEPTH>::capacity()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Bring the link up.
    ///
    /// 1. Configure the backend (reset, slave mode, pins, DMA channels,
    ///    CSn edge interrupt)
    /// 2. Bind inbound to its landing slot and outbound to the zero frame
    /// 3. Start both channels with DMA requests disabled
    ///
    /// The link is `Idle` afterwards; the first assert edge opens a frame.
    pub fn initialize<D: DelayNs>(&self, config: SlaveConfig, delay: &mut D) -> Result<()> {
        self.core.lock(|core| {
            if core.state != State::Uninitialized {
                return Err(ConfigError::AlreadyInitialized.into());
            }

            core.hw.configure(&config, delay)?;

            let (inbound, outbound) = core.engine.prime();
            core.hw.disable_requests(Directions::BOTH);
            core.hw.bind(&inbound);
            core.hw.bind(&outbound);
            core.hw.start_channels(Directions::BOTH);

            core.phase = LinkPhase::Idle;
            core.tx_deferred = false;
            core.state = State::Running;

            #[cfg(feature = "defmt")]
            defmt::info!(
                "SPI slave running: {} byte frames, {} per queue",
                FRAME,
                Self::capacity()
            );

            Ok(())
        })
    }

    // =========================================================================
    // Application API
    // =========================================================================

    /// Queue a frame for the master. Dropped silently when the outbound
    /// ring is full.
    pub fn submit(&self, frame: &[u8; FRAME]) {
        let _ = self.try_submit(frame);
    }

    /// Queue a frame for the master, reporting a drop.
    pub fn try_submit(&self, frame: &[u8; FRAME]) -> IoResult<()> {
        self.core.lock(|core| {
            if core.state != State::Running {
                return Err(IoError::NotInitialized);
            }
            if !core.engine.submit(frame) {
                core.stats.record_drop();

                #[cfg(feature = "defmt")]
                defmt::warn!("outbound ring full, frame dropped");

                return Err(IoError::QueueFull);
            }
            if core.phase == LinkPhase::Idle {
                core.promote_outbound();
            }
            Ok(())
        })
    }

    /// Copy the oldest received frame into `out`.
    ///
    /// Returns `FRAME` on success, `0` when nothing is queued.
    pub fn receive(&self, out: &mut [u8; FRAME]) -> usize {
        match self.receive_into(out) {
            Ok(()) => FRAME,
            Err(_) => 0,
        }
    }

    /// Take the oldest received frame.
    pub fn try_receive(&self) -> IoResult<[u8; FRAME]> {
        let mut frame = [0u8; FRAME];
        self.receive_into(&mut frame)?;
        Ok(frame)
    }

    fn receive_into(&self, out: &mut [u8; FRAME]) -> IoResult<()> {
        self.core.lock(|core| {
            if core.state != State::Running {
                return Err(IoError::NotInitialized);
            }
            if core.engine.receive_into(out) {
                Ok(())
            } else {
                Err(IoError::NoFrame)
            }
        })
    }

    /// Wait for the next received frame.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn receive_async(&self, out: &mut [u8; FRAME]) -> IoResult<usize> {
        use core::future::poll_fn;
        use core::task::Poll;

        poll_fn(|cx| match self.receive_into(out) {
            Ok(()) => Poll::Ready(Ok(FRAME)),
            Err(IoError::NoFrame) => {
                self.rx_waker.register(cx.waker());
                // A frame may have landed between the check and registering
                match self.receive_into(out) {
                    Ok(()) => Poll::Ready(Ok(FRAME)),
                    Err(IoError::NoFrame) => Poll::Pending,
                    Err(e) => Poll::Ready(Err(e)),
                }
            }
            Err(e) => Poll::Ready(Err(e)),
        })
        .await
    }

    // =========================================================================
    // Interrupt Side
    // =========================================================================

    /// Service the CSn edge interrupt: read and acknowledge the latched
    /// edges, then handle them (deassert before assert).
    pub fn handle_interrupt(&self) {
        let committed = self.core.lock(|core| {
            let events = core.hw.take_select_events();
            core.dispatch(events)
        });
        self.notify(committed);
    }

    /// Handle one edge reported by an external edge source.
    pub fn on_select_edge(&self, edge: SelectEdge) {
        let committed = self
            .core
            .lock(|core| core.dispatch(EdgeEvents::from_edge(edge)));
        self.notify(committed);
    }

    #[inline]
    fn notify(&self, committed: bool) {
        #[cfg(feature = "async")]
        if committed {
            self.rx_waker.wake();
        }
        #[cfg(not(feature = "async"))]
        let _ = committed;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state
    pub fn state(&self) -> State {
        self.core.read(|core| core.state)
    }

    /// Current link phase
    pub fn phase(&self) -> LinkPhase {
        self.core.read(|core| core.phase)
    }

    /// Outbound frames waiting behind the one bound to the engine
    pub fn outbound_pending(&self) -> usize {
        self.core.read(|core| core.engine.outbound_pending())
    }

    /// Received frames waiting for `receive`
    pub fn inbound_pending(&self) -> usize {
        self.core.read(|core| core.engine.inbound_pending())
    }

    /// Snapshot of the link counters
    pub fn stats(&self) -> LinkStats {
        self.core.read(|core| core.stats)
    }

    /// Zero the link counters
    pub fn reset_stats(&self) {
        self.core.lock(|core| core.stats = LinkStats::new());
    }
}

// =============================================================================
// Tests
// =============================================================================
