//! UART0 in polling mode, 8N1 at 115200 baud.

use core::fmt;

use nandboot::nand::{Mmio, RegisterBus};

const UART0_BASE: usize = 0x5000_0000;
const GPIO_BASE: usize = 0x5600_0000;

const GPHCON: usize = 0x70;
const GPHUP: usize = 0x78;

const ULCON: usize = 0x00;
const UCON: usize = 0x04;
const UFCON: usize = 0x08;
const UMCON: usize = 0x0C;
const UTRSTAT: usize = 0x10;
const UTXH: usize = 0x20;
const UBRDIV: usize = 0x28;

const UTRSTAT_TX_EMPTY: u32 = 1 << 2;

const PCLK: u32 = 50_000_000;
const BAUDRATE: u32 = 115_200;

pub struct Uart0 {
    regs: Mmio,
}

impl Uart0 {
    /// # Safety
    ///
    /// Output from several handles interleaves; callers must not rely on
    /// ordering between them.
    pub const unsafe fn new() -> Self {
        Self {
            regs: unsafe { Mmio::new(UART0_BASE) },
        }
    }

    /// Route GPH2/GPH3 to TXD0/RXD0 and program the line.
    pub fn init(&mut self) {
        let mut gpio = unsafe { Mmio::new(GPIO_BASE) };
        gpio.modify32(GPHCON, |v| v | 0xA0);
        gpio.write32(GPHUP, 0x0C);

        self.regs.write32(ULCON, 0x03);
        // polling, PCLK
        self.regs.write32(UCON, 0x05);
        self.regs.write32(UFCON, 0x00);
        self.regs.write32(UMCON, 0x00);
        self.regs.write32(UBRDIV, PCLK / (BAUDRATE * 16) - 1);
    }

    pub fn putc(&mut self, c: u8) {
        while self.regs.read32(UTRSTAT) & UTRSTAT_TX_EMPTY == 0 {
            core::hint::spin_loop();
        }
        self.regs.write8(UTXH, c);
    }
}

impl fmt::Write for Uart0 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.bytes() {
            if c == b'\n' {
                self.putc(b'\r');
            }
            self.putc(c);
        }
        Ok(())
    }
}
