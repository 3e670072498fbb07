//! Hardware ECC hook.
//!
//! The controller computes a 3-byte ECC while a page streams through the data
//! port. Comparing it against the stored code is all that is done here: a
//! mismatch is reported, never corrected.

use log::{debug, warn};

use super::controller::NandController;
use super::regs::{Register, RegisterBus};
use super::variant::Variant;
use super::{NandError, Result};

/// ECC bytes produced per step.
pub const ECC_BYTES: usize = 3;
/// Data bytes covered by one ECC step.
pub const ECC_SIZE: usize = 512;

pub type EccCode = [u8; ECC_BYTES];

/// ECC operations a generic NAND layer drives around each step.
pub trait HwEcc {
    /// Reset the ECC engine before a transfer. `mode` is the generic
    /// layer's read/write hint and does not change what the hardware does.
    fn hwctl(&mut self, mode: u32);
    /// ECC of the step just transferred. `data` is not inspected; the code
    /// comes from the controller.
    fn calculate(&mut self, data: &[u8]) -> EccCode;
    /// Check `data` against the stored code.
    fn correct(&mut self, data: &mut [u8], read_ecc: &EccCode, calc_ecc: &EccCode) -> Result<()>;
}

impl<B: RegisterBus, V: Variant> NandController<B, V> {
    /// Reset the ECC engine ahead of a page transfer.
    pub fn enable_ecc(&mut self) {
        V::init_ecc(self.bus_mut());
    }

    /// Read the ECC computed over the last transfer.
    pub fn calculate_ecc(&mut self) -> EccCode {
        let offset = V::offset(Register::Ecc);
        let bus = self.bus_mut();
        let code = [bus.read8(offset), bus.read8(offset + 1), bus.read8(offset + 2)];
        debug!("nand: ecc {:02x} {:02x} {:02x}", code[0], code[1], code[2]);
        code
    }
}

/// Succeeds only when both codes match byte for byte.
pub fn correct_data(read_ecc: &EccCode, calc_ecc: &EccCode) -> Result<()> {
    if read_ecc == calc_ecc {
        return Ok(());
    }
    warn!(
        "nand: ecc mismatch read={:02x?} calc={:02x?}, correction not implemented",
        read_ecc, calc_ecc
    );
    Err(NandError::BadMessage)
}

impl<B: RegisterBus, V: Variant> HwEcc for NandController<B, V> {
    fn hwctl(&mut self, _mode: u32) {
        self.enable_ecc();
    }

    fn calculate(&mut self, _data: &[u8]) -> EccCode {
        self.calculate_ecc()
    }

    fn correct(&mut self, _data: &mut [u8], read_ecc: &EccCode, calc_ecc: &EccCode) -> Result<()> {
        correct_data(read_ecc, calc_ecc)
    }
}
