//! Command protocol of the NAND controller: chip select, command and address
//! latching, data transfers and ready polling.

use core::hint;
use core::marker::PhantomData;

use bitflags::bitflags;
use log::{debug, trace};

use super::regs::{Register, RegisterBus};
use super::variant::{ActiveVariant, Latch, Timing, Variant};
use super::{NandError, Result};

/// Poll budget used by [`NandConfig::default`].
pub const DEFAULT_READY_POLLS: u32 = 1_000_000;

/// Busy-wait iterations between address cycles.
pub const DEFAULT_SETTLE_CYCLES: u32 = 10;

bitflags! {
    /// Control line flags passed to [`NandController::cmd_ctrl`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctrl: u32 {
        /// Chip enable.
        const NCE = 0x01;
        /// Command latch enable.
        const CLE = 0x02;
        /// Address latch enable.
        const ALE = 0x04;
        /// The line state above differs from the previous call.
        const CHANGE = 0x80;
    }
}

/// Target of a chip-select operation. There is one chip per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipSelect {
    Chip0,
    Deselect,
}

impl TryFrom<i32> for ChipSelect {
    type Error = i32;

    fn try_from(chipnr: i32) -> core::result::Result<Self, i32> {
        match chipnr {
            0 => Ok(Self::Chip0),
            -1 => Ok(Self::Deselect),
            other => Err(other),
        }
    }
}

/// Controller settings chosen by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NandConfig {
    /// Board timing; `None` uses the variant default.
    pub timing: Option<Timing>,
    /// Busy-wait iterations after each address cycle and command.
    pub settle_cycles: u32,
    /// Ready polls before giving up. `None` polls forever.
    pub ready_timeout: Option<u32>,
    /// Keep the bad block table in flash.
    pub bbt_use_flash: bool,
}

impl Default for NandConfig {
    fn default() -> Self {
        Self {
            timing: None,
            settle_cycles: DEFAULT_SETTLE_CYCLES,
            ready_timeout: Some(DEFAULT_READY_POLLS),
            bbt_use_flash: false,
        }
    }
}

/// Exclusive handle to one NAND controller.
pub struct NandController<B, V = ActiveVariant> {
    bus: B,
    latch: Latch,
    selected: bool,
    config: NandConfig,
    _variant: PhantomData<V>,
}

impl<B: RegisterBus, V: Variant> NandController<B, V> {
    /// Wrap a register bus. Nothing is written until [`init`](Self::init).
    pub fn new(bus: B, config: NandConfig) -> Self {
        Self {
            bus,
            latch: Latch::Data,
            selected: false,
            config,
            _variant: PhantomData,
        }
    }

    /// Program timing, enable the controller and leave the chip deselected.
    pub fn init(&mut self) {
        let timing = self.timing();
        debug!(
            "nand: {} init tacls={} twrph0={} twrph1={} nfconf={:#x}",
            V::NAME,
            timing.tacls,
            timing.twrph0,
            timing.twrph1,
            V::conf_value(timing),
        );
        V::configure(&mut self.bus, timing);
        self.latch = Latch::Data;
        self.selected = false;
    }

    pub fn timing(&self) -> Timing {
        self.config.timing.unwrap_or(V::DEFAULT_TIMING)
    }

    pub fn config(&self) -> &NandConfig {
        &self.config
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn latch(&self) -> Latch {
        self.latch
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Assert or release chip select.
    pub fn select(&mut self, chip: ChipSelect) {
        let enable = chip == ChipSelect::Chip0;
        trace!("nand: select {:?}", chip);
        V::chip_enable(&mut self.bus, enable);
        self.selected = enable;
    }

    /// Latch a command byte.
    pub fn send_command(&mut self, code: u8) {
        self.set_latch(Latch::Command);
        self.bus.write8(V::latch_offset(Latch::Command), code);
        self.settle();
        self.set_latch(Latch::Data);
    }

    /// Latch the five address cycles of a flat byte address.
    pub fn send_address(&mut self, address: u32) {
        let cycles = super::read::FlashAddress::from_flat(address).cycles();
        self.set_latch(Latch::Address);
        let offset = V::latch_offset(Latch::Address);
        for byte in cycles {
            self.bus.write8(offset, byte);
            self.settle();
        }
        self.set_latch(Latch::Data);
    }

    /// Current state of the ready/busy line.
    pub fn is_ready(&mut self) -> bool {
        V::is_ready(&mut self.bus)
    }

    /// Poll ready/busy until the device is ready.
    ///
    /// With `ready_timeout == None` this never returns if the device stays
    /// busy.
    pub fn wait_ready(&mut self) -> Result<()> {
        match self.config.ready_timeout {
            None => {
                while !V::is_ready(&mut self.bus) {
                    hint::spin_loop();
                }
                Ok(())
            }
            Some(limit) => {
                for _ in 0..limit {
                    if V::is_ready(&mut self.bus) {
                        return Ok(());
                    }
                    hint::spin_loop();
                }
                Err(NandError::Timeout)
            }
        }
    }

    /// Read one byte from the data port.
    pub fn read_byte(&mut self) -> u8 {
        self.bus.read8(V::offset(Register::Data))
    }

    /// Read `buf.len()` bytes from the data port.
    pub fn read_buf(&mut self, buf: &mut [u8]) {
        let offset = V::offset(Register::Data);
        for byte in buf.iter_mut() {
            *byte = self.bus.read8(offset);
        }
    }

    /// Write one byte to the current latch destination.
    pub fn write_byte(&mut self, value: u8) {
        self.bus.write8(V::latch_offset(self.latch), value);
    }

    /// Control line hook. On `Ctrl::CHANGE` the latch destination and chip
    /// enable follow `ctrl`; `cmd` (if any) is then written to the latch.
    /// `None` returns the destination to the data port.
    ///
    /// `CLE` takes precedence over `ALE` when both are set, so the byte
    /// goes to the command latch on either variant.
    pub fn cmd_ctrl(&mut self, cmd: Option<u8>, ctrl: Ctrl) {
        trace!("nand: cmd_ctrl {:?} {:?}", cmd, ctrl);
        if ctrl.contains(Ctrl::CHANGE) {
            let latch = if ctrl.contains(Ctrl::CLE) {
                Latch::Command
            } else if ctrl.contains(Ctrl::ALE) {
                Latch::Address
            } else {
                Latch::Data
            };
            self.set_latch(latch);

            let enable = ctrl.contains(Ctrl::NCE);
            V::chip_enable(&mut self.bus, enable);
            self.selected = enable;
        }

        match cmd {
            Some(byte) => self.bus.write8(V::latch_offset(self.latch), byte),
            None => self.set_latch(Latch::Data),
        }
    }

    fn set_latch(&mut self, latch: Latch) {
        self.latch = latch;
    }

    fn settle(&self) {
        for i in 0..self.config.settle_cycles {
            hint::black_box(i);
        }
    }
}
