//! Controller variants.
//!
//! The S3C2410 and S3C2440 controllers share the protocol but not the
//! register map: field positions differ and the chip-enable bit lives in
//! `NFCONF` on the former and in `NFCONT` on the latter. A build targets
//! exactly one of them, picked by cargo feature through [`ActiveVariant`].

use super::regs::{Register, RegisterBus};

/// Controller timing in HCLK cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// CLE/ALE setup to nWE.
    pub tacls: u8,
    /// nWE pulse width.
    pub twrph0: u8,
    /// CLE/ALE hold after nWE.
    pub twrph1: u8,
}

impl Timing {
    pub const fn new(tacls: u8, twrph0: u8, twrph1: u8) -> Self {
        Self { tacls, twrph0, twrph1 }
    }
}

/// Write destination of a byte transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latch {
    Command,
    Address,
    Data,
}

/// Register layout and bit positions of one controller generation.
pub trait Variant {
    const NAME: &'static str;
    const DEFAULT_TIMING: Timing;

    /// nFCE bit in the [`Register::Cont`] register; set means deselected.
    const NFCE: u32;
    /// ECC reset bit in the [`Register::Cont`] register.
    const INITECC: u32;

    /// Byte offset of `reg` from the controller base.
    fn offset(reg: Register) -> usize;

    /// `NFCONF` value for the given timing.
    fn conf_value(timing: Timing) -> u32;

    /// `NFCONT` value written after `NFCONF` at init, if the variant has one.
    fn cont_value() -> Option<u32>;

    fn latch_offset(latch: Latch) -> usize {
        match latch {
            Latch::Command => Self::offset(Register::Cmd),
            Latch::Address => Self::offset(Register::Addr),
            Latch::Data => Self::offset(Register::Data),
        }
    }

    /// Program timing and enable the controller. The chip is left deselected.
    fn configure<B: RegisterBus>(bus: &mut B, timing: Timing) {
        bus.write32(Self::offset(Register::Conf), Self::conf_value(timing));
        if let Some(cont) = Self::cont_value() {
            bus.write32(Self::offset(Register::Cont), cont);
        }
    }

    /// Drive nFCE. `enable == true` asserts chip select (clears the bit).
    fn chip_enable<B: RegisterBus>(bus: &mut B, enable: bool) {
        let offset = Self::offset(Register::Cont);
        if enable {
            bus.modify32(offset, |v| v & !Self::NFCE);
        } else {
            bus.modify32(offset, |v| v | Self::NFCE);
        }
    }

    fn init_ecc<B: RegisterBus>(bus: &mut B) {
        bus.modify32(Self::offset(Register::Cont), |v| v | Self::INITECC);
    }

    fn is_ready<B: RegisterBus>(bus: &mut B) -> bool {
        bus.read32(Self::offset(Register::Stat)) & 0x01 != 0
    }
}

/// Variant A.
#[derive(Debug, Clone, Copy)]
pub enum S3c2410 {}

impl S3c2410 {
    pub const NFCONF_EN: u32 = 1 << 15;
    pub const NFCONF_INITECC: u32 = 1 << 12;
    pub const NFCONF_NFCE: u32 = 1 << 11;

    const fn field(cycles: u8) -> u32 {
        (cycles.saturating_sub(1) as u32) & 0x7
    }
}

impl Variant for S3c2410 {
    const NAME: &'static str = "s3c2410";
    const DEFAULT_TIMING: Timing = Timing::new(4, 8, 8);
    const NFCE: u32 = Self::NFCONF_NFCE;
    const INITECC: u32 = Self::NFCONF_INITECC;

    // The control bits live in NFCONF, so `Cont` aliases it.
    fn offset(reg: Register) -> usize {
        match reg {
            Register::Conf | Register::Cont => 0x00,
            Register::Cmd => 0x04,
            Register::Addr => 0x08,
            Register::Data => 0x0C,
            Register::Stat => 0x10,
            Register::Ecc => 0x14,
        }
    }

    fn conf_value(timing: Timing) -> u32 {
        Self::NFCONF_EN
            | Self::NFCONF_NFCE
            | (Self::field(timing.tacls) << 8)
            | (Self::field(timing.twrph0) << 4)
            | Self::field(timing.twrph1)
    }

    fn cont_value() -> Option<u32> {
        None
    }
}

/// Variant B.
#[derive(Debug, Clone, Copy)]
pub enum S3c2440 {}

impl S3c2440 {
    pub const NFCONT_INITECC: u32 = 1 << 4;
    pub const NFCONT_NFCE: u32 = 1 << 1;
    pub const NFCONT_EN: u32 = 1 << 0;
}

impl Variant for S3c2440 {
    const NAME: &'static str = "s3c2440";
    const DEFAULT_TIMING: Timing = Timing::new(0, 1, 0);
    const NFCE: u32 = Self::NFCONT_NFCE;
    const INITECC: u32 = Self::NFCONT_INITECC;

    fn offset(reg: Register) -> usize {
        match reg {
            Register::Conf => 0x00,
            Register::Cont => 0x04,
            Register::Cmd => 0x08,
            Register::Addr => 0x0C,
            Register::Data => 0x10,
            Register::Stat => 0x20,
            // NFMECC0, main area ECC.
            Register::Ecc => 0x2C,
        }
    }

    fn conf_value(timing: Timing) -> u32 {
        ((timing.tacls as u32 & 0x3) << 12)
            | ((timing.twrph0 as u32 & 0x7) << 8)
            | ((timing.twrph1 as u32 & 0x7) << 4)
    }

    fn cont_value() -> Option<u32> {
        Some(Self::NFCONT_INITECC | Self::NFCONT_NFCE | Self::NFCONT_EN)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "s3c2440")] {
        /// Variant selected for this build.
        pub type ActiveVariant = S3c2440;
    } else if #[cfg(feature = "s3c2410")] {
        /// Variant selected for this build.
        pub type ActiveVariant = S3c2410;
    } else {
        compile_error!("enable one of the `s3c2410` or `s3c2440` features");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3c2440_default_timing_packs_into_nfconf() {
        assert_eq!(S3c2440::conf_value(S3c2440::DEFAULT_TIMING), 0x0000_0100);
        assert_eq!(S3c2440::cont_value(), Some(0x13));
    }

    #[test]
    fn s3c2410_timing_fields_are_minus_one() {
        let conf = S3c2410::conf_value(S3c2410::DEFAULT_TIMING);
        assert_eq!(conf & 0x7ff, (3 << 8) | (7 << 4) | 7);
        assert_ne!(conf & S3c2410::NFCONF_EN, 0);
        assert_ne!(conf & S3c2410::NFCONF_NFCE, 0);
    }

    #[test]
    fn timing_fields_are_masked() {
        let conf = S3c2440::conf_value(Timing::new(0xff, 0xff, 0xff));
        assert_eq!(conf, (0x3 << 12) | (0x7 << 8) | (0x7 << 4));
    }

    #[test]
    fn latches_map_to_distinct_registers() {
        assert_eq!(S3c2440::latch_offset(Latch::Command), 0x08);
        assert_eq!(S3c2440::latch_offset(Latch::Address), 0x0C);
        assert_eq!(S3c2440::latch_offset(Latch::Data), 0x10);
        assert_eq!(S3c2410::latch_offset(Latch::Command), 0x04);
        assert_eq!(S3c2410::latch_offset(Latch::Address), 0x08);
        assert_eq!(S3c2410::latch_offset(Latch::Data), 0x0C);
    }
}
