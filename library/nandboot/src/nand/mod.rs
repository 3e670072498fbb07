//! NAND flash controller of the S3C24x0 family.
//!
//! Layered leaf first: [`regs`] (raw register access), [`variant`] (register
//! map of the S3C2410 / S3C2440), [`controller`] (command, address and data
//! cycles, chip select, ready polling), [`read`] (page-crossing reads) and
//! [`host`] (the hooks a generic NAND layer drives).

pub mod controller;
#[cfg(feature = "hwecc")]
pub mod ecc;
pub mod host;
pub mod read;
pub mod regs;
pub mod variant;

use core::fmt;

pub use controller::{ChipSelect, Ctrl, NandConfig, NandController};
pub use host::{ChipDescriptor, EccMode, NandHost, board_nand_init};
pub use read::{FlashAddress, pages_spanned, read_from_nand, read_with_progress};
pub use regs::{Mmio, Register, RegisterBus};
pub use variant::{ActiveVariant, Latch, S3c2410, S3c2440, Timing, Variant};

#[cfg(feature = "hwecc")]
pub use ecc::{EccCode, HwEcc, correct_data};

/// Bytes per page. Fixed for the parts this loader supports.
pub const PAGE_SIZE: u32 = 2048;

/// Read setup (first cycle of a page read).
pub const CMD_READ0: u8 = 0x00;
/// Read confirm (second cycle of a large-page read).
pub const CMD_READSTART: u8 = 0x30;

/// Errors reported by the NAND layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NandError {
    /// Stored and computed ECC differ; the data cannot be trusted.
    BadMessage,
    /// The device did not report ready within the configured poll budget.
    Timeout,
}

impl NandError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadMessage => "uncorrectable ECC error",
            Self::Timeout => "device ready timeout",
        }
    }
}

impl fmt::Display for NandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::error::Error for NandError {}

pub type Result<T> = core::result::Result<T, NandError>;
