//! Page-crossing reads.
//!
//! A read of arbitrary offset and length becomes one page-read sequence
//! (`READ0`, five address cycles, `READSTART`, wait ready, data) per page
//! touched. The first page starts at the column of the source address; every
//! following page starts at column 0.

use log::trace;

use super::controller::{ChipSelect, NandController};
use super::regs::RegisterBus;
use super::variant::Variant;
use super::{CMD_READ0, CMD_READSTART, PAGE_SIZE, Result};

/// A flat flash address split into page (row) and in-page offset (column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashAddress {
    pub column: u32,
    pub row: u32,
}

impl FlashAddress {
    pub const fn from_flat(address: u32) -> Self {
        Self {
            column: address % PAGE_SIZE,
            row: address / PAGE_SIZE,
        }
    }

    pub const fn flat(&self) -> u32 {
        self.row * PAGE_SIZE + self.column
    }

    /// Address cycles in bus order: column low, column high, row low, row
    /// mid, row high.
    pub const fn cycles(&self) -> [u8; 5] {
        [
            self.column as u8,
            (self.column >> 8) as u8,
            self.row as u8,
            (self.row >> 8) as u8,
            (self.row >> 16) as u8,
        ]
    }
}

/// Number of page-read sequences a read of `len` bytes at `address` issues.
pub const fn pages_spanned(address: u32, len: usize) -> usize {
    let column = (address % PAGE_SIZE) as usize;
    (column + len).div_ceil(PAGE_SIZE as usize)
}

/// Copy `dest.len()` bytes starting at flash address `address` into `dest`.
///
/// The chip is selected once for the whole transfer and released afterwards,
/// also when the device times out. Returns the number of pages read.
pub fn read_from_nand<B: RegisterBus, V: Variant>(
    nand: &mut NandController<B, V>,
    address: u32,
    dest: &mut [u8],
) -> Result<usize> {
    read_with_progress(nand, address, dest, |_| {})
}

/// [`read_from_nand`], calling `progress` with the byte count copied so far
/// after every page.
pub fn read_with_progress<B: RegisterBus, V: Variant>(
    nand: &mut NandController<B, V>,
    address: u32,
    dest: &mut [u8],
    progress: impl FnMut(usize),
) -> Result<usize> {
    nand.select(ChipSelect::Chip0);
    let result = read_pages(nand, address, dest, progress);
    nand.select(ChipSelect::Deselect);
    result
}

fn read_pages<B: RegisterBus, V: Variant>(
    nand: &mut NandController<B, V>,
    mut address: u32,
    dest: &mut [u8],
    mut progress: impl FnMut(usize),
) -> Result<usize> {
    let mut column = address % PAGE_SIZE;
    let mut index = 0;
    let mut pages = 0;

    while index < dest.len() {
        nand.send_command(CMD_READ0);
        nand.send_address(address);
        nand.send_command(CMD_READSTART);
        nand.wait_ready()?;

        let chunk = ((PAGE_SIZE - column) as usize).min(dest.len() - index);
        trace!("nand: page {} column {} len {}", address / PAGE_SIZE, column, chunk);
        nand.read_buf(&mut dest[index..index + chunk]);

        index += chunk;
        // A read ending at the top of flash leaves the address at zero.
        address = address.wrapping_add(chunk as u32);
        // Every page after the first starts at its beginning.
        column = 0;
        pages += 1;
        progress(index);
    }

    Ok(pages)
}
