//! Simulated NAND controller for unit tests.
//!
//! `SimNand` implements [`RegisterBus`] for either register map and behaves
//! like a large-page part behind the controller: it decodes read commands and
//! address cycles, serves page data from an in-memory array, counts down a
//! busy period after each read confirm and exposes the ECC register. Every
//! register access is logged, and a second log keeps the protocol view
//! (chip select edges, commands, address cycles, data transfers).

use std::collections::BTreeMap;
use std::vec::Vec;

use crate::nand::regs::{Register, RegisterBus};
use crate::nand::variant::Variant;
use crate::nand::{CMD_READ0, CMD_READSTART, PAGE_SIZE};

/// Raw register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Read32 { offset: usize, value: u32 },
    Write32 { offset: usize, value: u32 },
    Read8 { offset: usize, value: u8 },
    Write8 { offset: usize, value: u8 },
}

/// Protocol-level view of the same traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Select,
    /// nFCE written low while already low.
    Reselect,
    Deselect,
    Command(u8),
    Address(u8),
    PageRead { row: u32, column: u32 },
    DataRead(u8),
    DataWrite(u8),
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    cont: usize,
    cmd: usize,
    addr: usize,
    data: usize,
    stat: usize,
    ecc: usize,
    nfce: u32,
}

impl Layout {
    fn of<V: Variant>() -> Self {
        Self {
            cont: V::offset(Register::Cont),
            cmd: V::offset(Register::Cmd),
            addr: V::offset(Register::Addr),
            data: V::offset(Register::Data),
            stat: V::offset(Register::Stat),
            ecc: V::offset(Register::Ecc),
            nfce: V::NFCE,
        }
    }
}

/// Byte stored at flat address `addr` of a freshly built `SimNand`.
pub fn pattern(addr: usize) -> u8 {
    (addr ^ (addr >> 11).wrapping_mul(31)) as u8
}

pub struct SimNand {
    layout: Layout,
    conf_offset: usize,
    regs: BTreeMap<usize, u32>,
    flash: Vec<u8>,
    address: Vec<u8>,
    cursor: Option<(usize, usize)>,
    busy_polls: u32,
    busy_left: u32,
    stuck: bool,
    status_polls: u32,
    ecc: [u8; 3],
    events: Vec<Event>,
    ops: Vec<Op>,
    violations: usize,
}

impl SimNand {
    /// A part with `pages` pages of pattern data and the register map of `V`.
    pub fn new<V: Variant>(pages: usize) -> Self {
        let flash = (0..pages * PAGE_SIZE as usize).map(pattern).collect();
        Self {
            layout: Layout::of::<V>(),
            conf_offset: V::offset(Register::Conf),
            regs: BTreeMap::new(),
            flash,
            address: Vec::new(),
            cursor: None,
            busy_polls: 0,
            busy_left: 0,
            stuck: false,
            status_polls: 0,
            ecc: [0; 3],
            events: Vec::new(),
            ops: Vec::new(),
            violations: 0,
        }
    }

    pub fn flash(&self) -> &[u8] {
        &self.flash
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.ops.clear();
    }

    /// Commands, address cycles or data moved while the chip was deselected.
    pub fn violations(&self) -> usize {
        self.violations
    }

    pub fn chip_selected(&self) -> bool {
        self.reg(self.layout.cont) & self.layout.nfce == 0
    }

    pub fn conf(&self) -> u32 {
        self.reg(self.conf_offset)
    }

    /// Busy polls to report after each read confirm.
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
        self.busy_left = polls;
    }

    pub fn set_stuck_busy(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    pub fn status_polls(&self) -> u32 {
        self.status_polls
    }

    pub fn set_ecc(&mut self, ecc: [u8; 3]) {
        self.ecc = ecc;
    }

    pub fn page_reads(&self) -> Vec<(u32, u32)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::PageRead { row, column } => Some((row, column)),
                _ => None,
            })
            .collect()
    }

    fn reg(&self, offset: usize) -> u32 {
        // nFCE resets high: the chip starts deselected.
        self.regs.get(&offset).copied().unwrap_or(if offset == self.layout.cont {
            self.layout.nfce
        } else {
            0
        })
    }

    fn check_selected(&mut self) {
        if !self.chip_selected() {
            self.violations += 1;
        }
    }

    fn command(&mut self, code: u8) {
        self.check_selected();
        self.ops.push(Op::Command(code));
        match code {
            CMD_READ0 => {
                self.address.clear();
                self.cursor = None;
            }
            CMD_READSTART if self.address.len() == 5 => {
                let a = &self.address;
                let column = a[0] as u32 | (a[1] as u32) << 8;
                let row = a[2] as u32 | (a[3] as u32) << 8 | (a[4] as u32) << 16;
                let start = (row * PAGE_SIZE + column) as usize;
                let end = ((row + 1) * PAGE_SIZE) as usize;
                self.cursor = Some((start, end));
                self.busy_left = self.busy_polls;
                self.ops.push(Op::PageRead { row, column });
            }
            _ => {}
        }
    }

    fn data_read(&mut self) -> u8 {
        self.check_selected();
        let value = match self.cursor {
            Some((pos, end)) if pos < end && pos < self.flash.len() => {
                self.cursor = Some((pos + 1, end));
                self.flash[pos]
            }
            _ => 0xFF,
        };
        self.ops.push(Op::DataRead(value));
        value
    }
}

impl RegisterBus for SimNand {
    fn read32(&mut self, offset: usize) -> u32 {
        let value = if offset == self.layout.stat {
            self.status_polls += 1;
            if self.stuck {
                0
            } else if self.busy_left > 0 {
                self.busy_left -= 1;
                0
            } else {
                1
            }
        } else {
            self.reg(offset)
        };
        self.events.push(Event::Read32 { offset, value });
        value
    }

    fn write32(&mut self, offset: usize, value: u32) {
        self.events.push(Event::Write32 { offset, value });
        if offset == self.layout.cont {
            let was_selected = self.chip_selected();
            let selecting = value & self.layout.nfce == 0;
            match (was_selected, selecting) {
                (false, true) => self.ops.push(Op::Select),
                (true, true) => self.ops.push(Op::Reselect),
                (true, false) => self.ops.push(Op::Deselect),
                (false, false) => {}
            }
        }
        self.regs.insert(offset, value);
    }

    fn read8(&mut self, offset: usize) -> u8 {
        let ecc = self.layout.ecc;
        let value = if offset == self.layout.data {
            self.data_read()
        } else if (ecc..ecc + 3).contains(&offset) {
            self.ecc[offset - ecc]
        } else {
            self.reg(offset & !3).to_le_bytes()[offset & 3]
        };
        self.events.push(Event::Read8 { offset, value });
        value
    }

    fn write8(&mut self, offset: usize, value: u8) {
        self.events.push(Event::Write8 { offset, value });
        if offset == self.layout.cmd {
            self.command(value);
        } else if offset == self.layout.addr {
            self.check_selected();
            self.address.push(value);
            self.ops.push(Op::Address(value));
        } else if offset == self.layout.data {
            self.check_selected();
            self.ops.push(Op::DataWrite(value));
        }
    }
}
