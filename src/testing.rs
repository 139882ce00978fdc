//! Testing utilities and mock implementations
//!
//! [`MockLink`] stands in for the PL022 + DMA + CSn edge hardware and also
//! plays the master: it selects, clocks bytes and deselects. Cloned handles
//! share one simulated link, so a test keeps one handle while the
//! [`SpiSlave`] under test owns another.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::driver::config::SlaveConfig;
use crate::driver::edge::EdgeEvents;
use crate::driver::error::{ConfigError, Result};
use crate::driver::slave::SpiSlave;
use crate::hal::{BindingSource, Direction, Directions, EngineBinding, SlaveHardware};
use crate::internal::constants::SPI_FIFO_DEPTH;

// =============================================================================
// Mock Link
// =============================================================================

/// Backend operation, recorded in call order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwOp {
    Configure,
    Bind(Direction),
    Start(Directions),
    Abort(Directions),
    Enable(Directions),
    Disable(Directions),
    ReadRx,
}

/// One simulated DMA channel. Addresses are kept as integers so the link
/// state stays `Send`.
#[derive(Debug, Default)]
struct Channel {
    addr: usize,
    len: usize,
    moved: usize,
    remaining: usize,
    running: bool,
    source: Option<BindingSource>,
}

impl Channel {
    fn bind(&mut self, binding: &EngineBinding) {
        self.addr = binding.addr as usize;
        self.len = binding.len;
        self.source = Some(binding.source);
    }

    fn start(&mut self) {
        self.moved = 0;
        self.remaining = self.len;
        self.running = self.len > 0;
    }

    fn abort(&mut self) {
        self.running = false;
    }

    fn step(&mut self) {
        self.moved += 1;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
        }
    }
}

#[derive(Debug, Default)]
struct LinkState {
    config: Option<SlaveConfig>,
    configure_calls: usize,
    configure_error: Option<ConfigError>,
    requests: Directions,
    rx: Channel,
    tx: Channel,
    rx_fifo: VecDeque<u8>,
    tx_fifo: VecDeque<u8>,
    pending: EdgeEvents,
    selected: bool,
    overruns: usize,
    ops: Vec<HwOp>,
}

impl LinkState {
    /// Let DREQ-paced channels move whatever the FIFOs allow
    fn service(&mut self) {
        if self.requests.outbound {
            while self.tx.running && self.tx_fifo.len() < SPI_FIFO_DEPTH {
                // SAFETY: the channel is bound to a live FRAME-sized buffer of
                // the slave under test and `moved < len`
                let byte = unsafe { *(self.tx.addr as *const u8).add(self.tx.moved) };
                self.tx_fifo.push_back(byte);
                self.tx.step();
            }
        }
        if self.requests.inbound {
            while self.rx.running {
                let Some(byte) = self.rx_fifo.pop_front() else {
                    break;
                };
                // SAFETY: as above, for the inbound landing slot
                unsafe { *(self.rx.addr as *mut u8).add(self.rx.moved) = byte };
                self.rx.step();
            }
        }
    }

    fn channels(&mut self, directions: Directions) -> impl Iterator<Item = &mut Channel> {
        let (rx, tx) = (&mut self.rx, &mut self.tx);
        directions
            .inbound
            .then_some(rx)
            .into_iter()
            .chain(directions.outbound.then_some(tx))
    }
}

/// Simulated PL022 slave, its two DMA channels and the master driving it.
#[derive(Debug, Clone, Default)]
pub struct MockLink {
    state: Arc<Mutex<LinkState>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap()
    }

    // --- master side ---------------------------------------------------------

    /// Drive CSn low
    pub fn select(&self) {
        let mut state = self.state();
        state.selected = true;
        state.pending.assert = true;
    }

    /// Release CSn
    pub fn deselect(&self) {
        let mut state = self.state();
        state.selected = false;
        state.pending.deassert = true;
    }

    /// Clock one byte: shift `mosi` in, return what the slave shifted out.
    /// An empty TX FIFO (underrun) shifts out zero.
    pub fn clock(&self, mosi: u8) -> u8 {
        let mut state = self.state();
        state.service();
        let miso = state.tx_fifo.pop_front().unwrap_or(0);
        if state.rx_fifo.len() < SPI_FIFO_DEPTH {
            state.rx_fifo.push_back(mosi);
        } else {
            state.overruns += 1;
        }
        state.service();
        miso
    }

    pub fn clock_bytes(&self, mosi: &[u8]) -> Vec<u8> {
        mosi.iter().map(|&b| self.clock(b)).collect()
    }

    // --- fault injection -----------------------------------------------------

    /// Put bytes straight into the RX FIFO, as a glitch on SCK would
    pub fn inject_rx(&self, bytes: &[u8]) {
        let mut state = self.state();
        for &b in bytes {
            if state.rx_fifo.len() < SPI_FIFO_DEPTH {
                state.rx_fifo.push_back(b);
            }
        }
        state.service();
    }

    /// Leave residue in the TX FIFO
    pub fn preload_tx(&self, bytes: &[u8]) {
        let mut state = self.state();
        for &b in bytes {
            if state.tx_fifo.len() < SPI_FIFO_DEPTH {
                state.tx_fifo.push_back(b);
            }
        }
    }

    /// Make the next `configure` fail
    pub fn fail_configure(&self, error: ConfigError) {
        self.state().configure_error = Some(error);
    }

    // --- inspection ----------------------------------------------------------

    pub fn ops(&self) -> Vec<HwOp> {
        self.state().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state().ops.clear();
    }

    pub fn requests(&self) -> Directions {
        self.state().requests
    }

    pub fn configured_with(&self) -> Option<SlaveConfig> {
        self.state().config
    }

    pub fn configure_calls(&self) -> usize {
        self.state().configure_calls
    }

    pub fn outbound_source(&self) -> Option<BindingSource> {
        self.state().tx.source
    }

    pub fn rx_fifo_len(&self) -> usize {
        self.state().rx_fifo.len()
    }

    pub fn tx_fifo_len(&self) -> usize {
        self.state().tx_fifo.len()
    }

    pub fn overruns(&self) -> usize {
        self.state().overruns
    }

    pub fn is_selected(&self) -> bool {
        self.state().selected
    }
}

impl SlaveHardware for MockLink {
    fn configure<D: DelayNs>(&mut self, config: &SlaveConfig, delay: &mut D) -> Result<()> {
        let mut state = self.state();
        state.ops.push(HwOp::Configure);
        state.configure_calls += 1;
        if let Some(error) = state.configure_error.take() {
            return Err(error.into());
        }
        config.validate()?;
        delay.delay_us(10);
        state.config = Some(*config);
        Ok(())
    }

    fn bind(&mut self, binding: &EngineBinding) {
        let mut state = self.state();
        state.ops.push(HwOp::Bind(binding.direction));
        match binding.direction {
            Direction::Inbound => state.rx.bind(binding),
            Direction::Outbound => state.tx.bind(binding),
        }
    }

    fn start_channels(&mut self, channels: Directions) {
        let mut state = self.state();
        state.ops.push(HwOp::Start(channels));
        state.channels(channels).for_each(Channel::start);
        state.service();
    }

    fn abort_channels(&mut self, channels: Directions) {
        let mut state = self.state();
        state.ops.push(HwOp::Abort(channels));
        state.channels(channels).for_each(Channel::abort);
    }

    fn remaining(&self, direction: Direction) -> usize {
        let state = self.state();
        match direction {
            Direction::Inbound => state.rx.remaining,
            Direction::Outbound => state.tx.remaining,
        }
    }

    fn enable_requests(&mut self, requests: Directions) {
        let mut state = self.state();
        state.ops.push(HwOp::Enable(requests));
        state.requests.inbound |= requests.inbound;
        state.requests.outbound |= requests.outbound;
        state.service();
    }

    fn disable_requests(&mut self, requests: Directions) {
        let mut state = self.state();
        state.ops.push(HwOp::Disable(requests));
        state.requests.inbound &= !requests.inbound;
        state.requests.outbound &= !requests.outbound;
    }

    fn rx_readable(&self) -> bool {
        !self.state().rx_fifo.is_empty()
    }

    fn read_rx(&mut self) -> u8 {
        let mut state = self.state();
        state.ops.push(HwOp::ReadRx);
        state.rx_fifo.pop_front().unwrap_or(0)
    }

    fn tx_fifo_empty(&self) -> bool {
        self.state().tx_fifo.is_empty()
    }

    fn take_select_events(&mut self) -> EdgeEvents {
        core::mem::take(&mut self.state().pending)
    }
}

// =============================================================================
// Master-side helpers
// =============================================================================

/// One complete frame window: select, clock `F` bytes, deselect, with the
/// edge interrupt serviced after each edge. Returns what the master read.
pub fn exchange<const F: usize, const D: usize>(
    slave: &SpiSlave<MockLink, F, D>,
    link: &MockLink,
    mosi: &[u8; F],
) -> [u8; F] {
    let miso = partial_exchange(slave, link, mosi);
    let mut out = [0u8; F];
    out.copy_from_slice(&miso);
    out
}

/// A frame window in which the master clocks only `mosi.len()` bytes
pub fn partial_exchange<const F: usize, const D: usize>(
    slave: &SpiSlave<MockLink, F, D>,
    link: &MockLink,
    mosi: &[u8],
) -> Vec<u8> {
    link.select();
    slave.handle_interrupt();
    let miso = link.clock_bytes(mosi);
    link.deselect();
    slave.handle_interrupt();
    miso
}

/// Select and deselect without clocking
pub fn idle_cycle<const F: usize, const D: usize>(slave: &SpiSlave<MockLink, F, D>, link: &MockLink) {
    partial_exchange(slave, link, &[]);
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Delay provider that only records how long it was asked to wait
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(link: &mut MockLink, direction: Direction, buf: &mut [u8]) {
        link.bind(&EngineBinding {
            direction,
            addr: buf.as_mut_ptr().cast_const(),
            len: buf.len(),
            source: BindingSource::Slot(0),
        });
    }

    #[test]
    fn tx_channel_prefills_fifo_when_requested() {
        let mut link = MockLink::new();
        let mut frame: [u8; 12] = core::array::from_fn(|i| i as u8 + 1);
        bound(&mut link, Direction::Outbound, &mut frame);
        link.start_channels(Directions::OUTBOUND);
        assert_eq!(link.tx_fifo_len(), 0);

        link.enable_requests(Directions::OUTBOUND);
        assert_eq!(link.tx_fifo_len(), SPI_FIFO_DEPTH);
        assert_eq!(link.remaining(Direction::Outbound), 4);

        let miso = link.clock_bytes(&[0; 13]);
        assert_eq!(&miso[..12], &frame);
        assert_eq!(miso[12], 0);
    }

    #[test]
    fn rx_fifo_holds_bytes_until_requested() {
        let mut link = MockLink::new();
        let mut slot = [0u8; 4];
        bound(&mut link, Direction::Inbound, &mut slot);
        link.start_channels(Directions::INBOUND);

        link.clock_bytes(&[1, 2]);
        assert_eq!(link.rx_fifo_len(), 2);

        link.enable_requests(Directions::INBOUND);
        link.clock_bytes(&[3, 4]);
        assert_eq!(link.remaining(Direction::Inbound), 0);
        assert_eq!(slot, [1, 2, 3, 4]);
    }

    #[test]
    fn rx_overrun_counted() {
        let link = MockLink::new();
        link.clock_bytes(&[0; SPI_FIFO_DEPTH + 3]);
        assert_eq!(link.rx_fifo_len(), SPI_FIFO_DEPTH);
        assert_eq!(link.overruns(), 3);
    }

    #[test]
    fn select_events_are_taken_once() {
        let mut link = MockLink::new();
        link.select();
        link.deselect();
        assert!(!link.is_selected());

        let events = link.take_select_events();
        assert!(events.assert && events.deassert);
        assert!(!link.take_select_events().any());
    }

    #[test]
    fn mock_delay_accumulates() {
        let mut delay = MockDelay::new();
        delay.delay_ns(1_000);
        delay.delay_us(2);
        assert_eq!(delay.total_ns(), 3_000);
    }
}
