//! RP2040 register-level backend.
//!
//! Drives one PL022 instance in slave mode, two DMA channels paced by its
//! DREQs, and the `IO_BANK0` edge detector of the CSn pin.
//!
//! # Interrupt Routing
//!
//! The backend only enables the CSn edge events for processor 0. Unmask
//! `IO_IRQ_BANK0` in the NVIC and call
//! [`SpiSlave::handle_interrupt`](crate::SpiSlave::handle_interrupt) from it.
//! If other GPIOs share that interrupt, call it unconditionally; it ignores
//! events of foreign pins.

use embedded_hal::delay::DelayNs;

use super::reset::ResetController;
use super::{Direction, Directions, EngineBinding, SlaveHardware};
use crate::driver::config::{DmaChannels, SlaveConfig};
use crate::driver::edge::EdgeEvents;
use crate::driver::error::{ConfigError, ConfigResult, Result};
use crate::internal::constants::DMA_CHANNEL_COUNT;
use crate::internal::register::dma::{DmaChannelRegs, DmaRegs, ctrl_value};
use crate::internal::register::io::{
    FUNCSEL_SPI, GPIO_EVENT_EDGE_HIGH, GPIO_EVENT_EDGE_LOW, IoBank0, PadsBank0,
};
use crate::internal::register::spi::{SSPCR1_MS, SSPDMACR_RXDMAE, SSPDMACR_TXDMAE, SpiRegs, cr0_value};
use crate::sync::ExclusionCell;

const SELECT_EVENTS: u32 = GPIO_EVENT_EDGE_LOW | GPIO_EVENT_EDGE_HIGH;

// =============================================================================
// DMA Channel Claims
// =============================================================================

/// Bitmask of claimed DMA channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelClaims {
    mask: u16,
}

impl ChannelClaims {
    /// Nothing claimed
    pub const fn new() -> Self {
        Self { mask: 0 }
    }

    /// Check if `channel` is taken
    pub const fn is_claimed(&self, channel: u8) -> bool {
        channel < DMA_CHANNEL_COUNT && self.mask & (1 << channel) != 0
    }

    /// Claim exactly `channel`
    pub fn claim(&mut self, channel: u8) -> ConfigResult<u8> {
        if channel >= DMA_CHANNEL_COUNT || self.is_claimed(channel) {
            return Err(ConfigError::NoFreeDmaChannel);
        }
        self.mask |= 1 << channel;
        Ok(channel)
    }

    /// Claim the lowest free channel
    pub fn claim_any(&mut self) -> ConfigResult<u8> {
        let channel = (0..DMA_CHANNEL_COUNT)
            .find(|&ch| !self.is_claimed(ch))
            .ok_or(ConfigError::NoFreeDmaChannel)?;
        self.claim(channel)
    }

    /// Return `channel` to the pool
    pub fn release(&mut self, channel: u8) {
        if channel < DMA_CHANNEL_COUNT {
            self.mask &= !(1 << channel);
        }
    }

    /// Claim an (rx, tx) pair per `selection`, all or nothing
    pub fn claim_pair(&mut self, selection: DmaChannels) -> ConfigResult<(u8, u8)> {
        let rx = match selection {
            DmaChannels::Auto => self.claim_any()?,
            DmaChannels::Fixed { rx, .. } => self.claim(rx)?,
        };
        let tx = match selection {
            DmaChannels::Auto => self.claim_any(),
            DmaChannels::Fixed { tx, .. } => self.claim(tx),
        };
        match tx {
            Ok(tx) => Ok((rx, tx)),
            Err(e) => {
                self.release(rx);
                Err(e)
            }
        }
    }
}

static DMA_CLAIMS: ExclusionCell<ChannelClaims> = ExclusionCell::new(ChannelClaims::new());

/// Mark `channel` as used by other code so automatic selection skips it.
pub fn reserve_dma_channel(channel: u8) -> ConfigResult<()> {
    DMA_CLAIMS.lock(|claims| claims.claim(channel)).map(|_| ())
}

/// `SSPDMACR` bits for a direction set
#[must_use]
pub const fn request_bits(requests: Directions) -> u32 {
    let mut bits = 0;
    if requests.inbound {
        bits |= SSPDMACR_RXDMAE;
    }
    if requests.outbound {
        bits |= SSPDMACR_TXDMAE;
    }
    bits
}

// =============================================================================
// Backend
// =============================================================================

/// PL022 + DMA + GPIO edge backend
#[derive(Debug)]
pub struct Rp2040Hardware {
    spi: SpiRegs,
    rx: DmaChannelRegs,
    tx: DmaChannelRegs,
    csn: u8,
    tx_armed: bool,
    configured: bool,
}

impl Rp2040Hardware {
    /// Unconfigured backend (const, suitable for static initialization)
    pub const fn new() -> Self {
        let config = SlaveConfig::new();
        Self {
            spi: SpiRegs::new(config.spi),
            rx: DmaChannelRegs::new(0),
            tx: DmaChannelRegs::new(1),
            csn: config.pins.csn,
            tx_armed: false,
            configured: false,
        }
    }

    /// Claimed (rx, tx) DMA channels, once configured
    pub fn dma_channels(&self) -> Option<(u8, u8)> {
        self.configured
            .then(|| (self.rx.channel(), self.tx.channel()))
    }

    fn channel_mask(&self, channels: Directions) -> u32 {
        let mut mask = 0;
        if channels.inbound {
            mask |= self.rx.mask();
        }
        if channels.outbound {
            mask |= self.tx.mask();
        }
        mask
    }

    fn configure_spi(&self, config: &SlaveConfig) -> ConfigResult<()> {
        let divisors = config.divisors()?;
        let spi = self.spi;
        spi.disable();
        spi.set_cpsr(divisors.prescale);
        spi.set_cr0(cr0_value(divisors.scr(), config.mode.polarity(), config.mode.phase()));
        spi.set_cr1(SSPCR1_MS);
        spi.set_imsc(0);
        spi.set_dmacr(0);
        spi.clear_overrun();
        spi.enable();
        Ok(())
    }

    fn configure_dma(&self) {
        let dr = self.spi.dr_addr() as u32;
        let rx = self.rx;
        rx.set_read_addr(dr);
        rx.set_ctrl(ctrl_value(rx.channel(), self.spi.rx_dreq(), false, true));

        let tx = self.tx;
        tx.set_write_addr(dr);
        tx.set_ctrl(ctrl_value(tx.channel(), self.spi.tx_dreq(), true, false));
    }
}

impl Default for Rp2040Hardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SlaveHardware for Rp2040Hardware {
    fn configure<D: DelayNs>(&mut self, config: &SlaveConfig, delay: &mut D) -> Result<()> {
        if self.configured {
            return Err(ConfigError::AlreadyInitialized.into());
        }
        config.validate()?;

        let (rx, tx) = DMA_CLAIMS.lock(|claims| claims.claim_pair(config.dma))?;

        // === STEP 1: Reset ===
        if let Err(e) = ResetController::new(delay).reset_spi(config.spi) {
            DMA_CLAIMS.lock(|claims| {
                claims.release(rx);
                claims.release(tx);
            });
            return Err(e.into());
        }

        self.spi = SpiRegs::new(config.spi);
        self.rx = DmaChannelRegs::new(rx);
        self.tx = DmaChannelRegs::new(tx);
        self.csn = config.pins.csn;

        // === STEP 2: PL022 in slave mode, DMA requests off ===
        self.configure_spi(config)?;

        // === STEP 3: Route pins ===
        // CSn goes to the PL022 too, so TX stays tri-stated while
        // deselected. Mode 1 keeps FSS low across bytes, and the edge
        // detector reads the pad whatever the function select.
        for (gpio, _) in config.pins.assignments() {
            PadsBank0::enable_io(gpio);
            IoBank0::set_function(gpio, FUNCSEL_SPI);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SPI pins routed: rx={} tx={} sck={} csn={}",
            config.pins.rx,
            config.pins.tx,
            config.pins.sck,
            config.pins.csn
        );

        // === STEP 4: DMA channels (fixed SSPDR side, unchained) ===
        self.configure_dma();

        // === STEP 5: CSn edges on processor 0 ===
        IoBank0::acknowledge(self.csn, SELECT_EVENTS);
        IoBank0::enable_proc0_events(self.csn, SELECT_EVENTS);

        self.configured = true;
        Ok(())
    }

    fn bind(&mut self, binding: &EngineBinding) {
        match binding.direction {
            Direction::Inbound => {
                self.rx.set_write_addr(binding.bus_addr());
                self.rx.set_trans_count(binding.len as u32);
            }
            Direction::Outbound => {
                self.tx.set_read_addr(binding.bus_addr());
                self.tx.set_trans_count(binding.len as u32);
                // Whole frame already staged in the TX FIFO
                self.tx_armed = binding.len > 0;
            }
        }
    }

    fn start_channels(&mut self, channels: Directions) {
        let channels = Directions {
            outbound: channels.outbound && self.tx_armed,
            ..channels
        };
        let mask = self.channel_mask(channels);
        if mask != 0 {
            DmaRegs::new().trigger(mask);
        }
    }

    fn abort_channels(&mut self, channels: Directions) {
        let mask = self.channel_mask(channels);
        if mask != 0 && !DmaRegs::new().abort(mask) {
            #[cfg(feature = "defmt")]
            defmt::warn!("DMA abort did not settle (mask {:#06x})", mask);
        }
    }

    fn remaining(&self, direction: Direction) -> usize {
        match direction {
            Direction::Inbound => self.rx.trans_count() as usize,
            Direction::Outbound => self.tx.trans_count() as usize,
        }
    }

    fn enable_requests(&mut self, requests: Directions) {
        self.spi.set_dma_requests(request_bits(requests));
    }

    fn disable_requests(&mut self, requests: Directions) {
        self.spi.clear_dma_requests(request_bits(requests));
    }

    fn rx_readable(&self) -> bool {
        self.spi.rx_not_empty()
    }

    fn read_rx(&mut self) -> u8 {
        self.spi.dr() as u8
    }

    fn tx_fifo_empty(&self) -> bool {
        self.spi.tx_fifo_empty()
    }

    fn take_select_events(&mut self) -> EdgeEvents {
        let raw = IoBank0::proc0_events(self.csn) & SELECT_EVENTS;
        if raw != 0 {
            IoBank0::acknowledge(self.csn, raw);
        }
        EdgeEvents::from_raw(raw)
    }
}
