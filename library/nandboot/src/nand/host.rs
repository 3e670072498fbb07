//! Hooks handed to a generic NAND layer, and the board init that produces
//! them.

use log::info;

use super::controller::{ChipSelect, Ctrl, NandConfig, NandController};
use super::regs::{CLKCON, CLKCON_NAND, RegisterBus};
use super::variant::Variant;

/// Low-level operations a generic NAND layer drives.
pub trait NandHost {
    fn read_buf(&mut self, buf: &mut [u8]);
    fn cmd_ctrl(&mut self, cmd: Option<u8>, ctrl: Ctrl);
    fn dev_ready(&mut self) -> bool;
    /// `0` selects the chip and `-1` releases it.
    ///
    /// # Panics
    ///
    /// On any other chip number; there is a single chip per controller.
    fn select_chip(&mut self, chipnr: i32);
}

impl<B: RegisterBus, V: Variant> NandHost for NandController<B, V> {
    fn read_buf(&mut self, buf: &mut [u8]) {
        NandController::read_buf(self, buf);
    }

    fn cmd_ctrl(&mut self, cmd: Option<u8>, ctrl: Ctrl) {
        NandController::cmd_ctrl(self, cmd, ctrl);
    }

    fn dev_ready(&mut self) -> bool {
        self.is_ready()
    }

    fn select_chip(&mut self, chipnr: i32) {
        match ChipSelect::try_from(chipnr) {
            Ok(chip) => self.select(chip),
            Err(chipnr) => panic!("nand: invalid chip number {chipnr}"),
        }
    }
}

/// How page data is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EccMode {
    /// Controller-computed ECC through [`HwEcc`](super::HwEcc).
    Hardware { size: usize, bytes: usize, strength: u8 },
    /// Left to the generic layer.
    Software,
}

/// What [`board_nand_init`] tells the generic layer about the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipDescriptor {
    pub variant: &'static str,
    pub ecc: EccMode,
    /// Bad block table is stored in flash.
    pub bbt_use_flash: bool,
}

/// Gate the NAND clock on, configure the controller and describe the chip.
///
/// `clock` is the clock and power management block; only `CLKCON` is
/// touched.
pub fn board_nand_init<C, B, V>(clock: &mut C, bus: B, config: NandConfig) -> (NandController<B, V>, ChipDescriptor)
where
    C: RegisterBus,
    B: RegisterBus,
    V: Variant,
{
    clock.modify32(CLKCON, |v| v | CLKCON_NAND);

    let mut nand = NandController::new(bus, config);
    nand.init();

    #[cfg(feature = "hwecc")]
    let ecc = EccMode::Hardware {
        size: super::ecc::ECC_SIZE,
        bytes: super::ecc::ECC_BYTES,
        strength: 1,
    };
    #[cfg(not(feature = "hwecc"))]
    let ecc = EccMode::Software;

    let descriptor = ChipDescriptor {
        variant: V::NAME,
        ecc,
        bbt_use_flash: config.bbt_use_flash,
    };
    info!("nand: {} ready, ecc {:?}, bbt in flash: {}", V::NAME, ecc, config.bbt_use_flash);
    (nand, descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nand::{S3c2440, Timing};
    use crate::testing::SimNand;

    struct Clock(u32);

    impl RegisterBus for Clock {
        fn read32(&mut self, offset: usize) -> u32 {
            assert_eq!(offset, CLKCON);
            self.0
        }
        fn write32(&mut self, offset: usize, value: u32) {
            assert_eq!(offset, CLKCON);
            self.0 = value;
        }
        fn read8(&mut self, _: usize) -> u8 {
            unreachable!()
        }
        fn write8(&mut self, _: usize, _: u8) {
            unreachable!()
        }
    }

    fn init(config: NandConfig) -> (Clock, NandController<SimNand, S3c2440>, ChipDescriptor) {
        let mut clock = Clock(0x0000_0010 ^ 0xFFFF_FFF0);
        let (nand, descriptor) = board_nand_init(&mut clock, SimNand::new::<S3c2440>(2), config);
        (clock, nand, descriptor)
    }

    #[test]
    fn init_gates_clock_and_configures() {
        let config = NandConfig {
            timing: Some(Timing::new(1, 2, 0)),
            bbt_use_flash: true,
            ..NandConfig::default()
        };
        let (clock, nand, descriptor) = init(config);
        assert_eq!(clock.0, 0xFFFF_FFF0);
        assert_eq!(nand.bus().conf(), (1 << 12) | (2 << 8));
        assert!(!nand.bus().chip_selected());
        assert_eq!(descriptor.variant, "s3c2440");
        assert!(descriptor.bbt_use_flash);
        #[cfg(feature = "hwecc")]
        assert_eq!(descriptor.ecc, EccMode::Hardware { size: 512, bytes: 3, strength: 1 });
    }

    #[test]
    fn select_chip_accepts_zero_and_minus_one() {
        let (_, mut nand, _) = init(NandConfig::default());
        NandHost::select_chip(&mut nand, 0);
        assert!(nand.bus().chip_selected());
        NandHost::select_chip(&mut nand, -1);
        assert!(!nand.bus().chip_selected());
    }

    #[test]
    #[should_panic(expected = "invalid chip number 1")]
    fn select_chip_rejects_other_chips() {
        let (_, mut nand, _) = init(NandConfig::default());
        NandHost::select_chip(&mut nand, 1);
    }

    #[test]
    fn host_hooks_drive_a_reset_and_read() {
        let (_, mut nand, _) = init(NandConfig::default());
        NandHost::select_chip(&mut nand, 0);
        NandHost::cmd_ctrl(&mut nand, Some(0x00), Ctrl::NCE | Ctrl::CLE | Ctrl::CHANGE);
        NandHost::cmd_ctrl(&mut nand, Some(0x10), Ctrl::NCE | Ctrl::ALE | Ctrl::CHANGE);
        for byte in [0x00, 0x00, 0x00, 0x00] {
            NandHost::cmd_ctrl(&mut nand, Some(byte), Ctrl::NCE | Ctrl::ALE);
        }
        NandHost::cmd_ctrl(&mut nand, Some(0x30), Ctrl::NCE | Ctrl::CLE | Ctrl::CHANGE);
        NandHost::cmd_ctrl(&mut nand, None, Ctrl::NCE | Ctrl::CHANGE);
        assert!(nand.dev_ready());

        let mut buf = [0u8; 8];
        NandHost::read_buf(&mut nand, &mut buf);
        assert_eq!(&buf[..], &nand.bus().flash()[0x10..0x18]);
        assert_eq!(nand.bus().violations(), 0);
    }
}
