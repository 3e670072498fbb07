//! Register interface of the S3C24x0 NAND flash controller.
//!
//! Every access goes straight to the device: nothing is cached and the order
//! of reads and writes is exactly the order they are issued in.

use core::ptr;

/// Physical base of the NAND controller on both S3C2410 and S3C2440.
pub const NAND_BASE: usize = 0x4E00_0000;

/// Clock and power management base; `CLKCON` gates the NAND clock.
pub const CLOCK_POWER_BASE: usize = 0x4C00_0000;
pub const CLKCON: usize = 0x0C;
pub const CLKCON_NAND: u32 = 1 << 4;

/// Named controller registers. Offsets depend on the variant, see
/// [`Variant::offset`](super::variant::Variant::offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Configuration: timing fields (and, on the S3C2410, enable/nFCE/ECC init).
    Conf,
    /// Control: enable, nFCE and ECC init (S3C2440 only).
    Cont,
    /// Command latch.
    Cmd,
    /// Address latch.
    Addr,
    /// Data port.
    Data,
    /// Status; bit 0 is ready/busy.
    Stat,
    /// First byte of the hardware ECC result.
    Ecc,
}

/// Single-width accesses to the controller by byte offset from its base.
///
/// Reads take `&mut self`: reading the data port consumes a byte from the
/// device, so no access is side-effect free.
pub trait RegisterBus {
    fn read32(&mut self, offset: usize) -> u32;
    fn write32(&mut self, offset: usize, value: u32);
    fn read8(&mut self, offset: usize) -> u8;
    fn write8(&mut self, offset: usize, value: u8);

    /// Read-modify-write of a 32-bit register.
    #[inline]
    fn modify32(&mut self, offset: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    #[inline]
    fn read32(&mut self, offset: usize) -> u32 {
        (**self).read32(offset)
    }
    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
    #[inline]
    fn read8(&mut self, offset: usize) -> u8 {
        (**self).read8(offset)
    }
    #[inline]
    fn write8(&mut self, offset: usize, value: u8) {
        (**self).write8(offset, value)
    }
}

/// Memory-mapped register block.
#[derive(Debug)]
pub struct Mmio {
    base_addr: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base_addr` must be the physical base of a register block that nothing
    /// else accesses for the lifetime of the returned value.
    pub const unsafe fn new(base_addr: usize) -> Self {
        Self { base_addr }
    }

    /// The NAND controller at its fixed physical address.
    ///
    /// # Safety
    ///
    /// See [`Mmio::new`]; the caller must hold the only handle to the controller.
    pub const unsafe fn nand() -> Self {
        unsafe { Self::new(NAND_BASE) }
    }

    pub fn base_addr(&self) -> usize {
        self.base_addr
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read32(&mut self, offset: usize) -> u32 {
        unsafe { ptr::read_volatile((self.base_addr + offset) as *const u32) }
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        unsafe { ptr::write_volatile((self.base_addr + offset) as *mut u32, value) }
    }

    #[inline]
    fn read8(&mut self, offset: usize) -> u8 {
        unsafe { ptr::read_volatile((self.base_addr + offset) as *const u8) }
    }

    #[inline]
    fn write8(&mut self, offset: usize, value: u8) {
        unsafe { ptr::write_volatile((self.base_addr + offset) as *mut u8, value) }
    }
}
