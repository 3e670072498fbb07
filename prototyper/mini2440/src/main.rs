#![no_std]
#![no_main]

mod board;
mod logger;
mod uart;

use log::info;
use nandboot::kernel::{BootSource, MemoryRegion, load_and_boot, relocate_stage};
use panic_halt as _;

use crate::uart::Uart0;

unsafe extern "C" {
    static __stage_start: u8;
    static __stage_end: u8;
    static __bss_start: u8;
    static __bss_end: u8;
}

/// Copy this stage from flash offset 0 to its link address. Called by the
/// reset code with `.bss` already zeroed and no logger installed; returns 0
/// on success. Everything it reaches is linked below `__boot_end`, inside
/// the 4 KiB steppingstone.
#[unsafe(no_mangle)]
#[unsafe(link_section = ".text.boot")]
extern "C" fn copy_codes_to_sdram() -> i32 {
    let dest = &raw const __stage_start as usize;
    let len = &raw const __stage_end as usize - dest;
    let mut nand = board::relocation_nand();
    let source = unsafe { nandboot::kernel::probe_storage() };
    match unsafe { relocate_stage(&mut nand, source, 0, dest, len) } {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

#[unsafe(no_mangle)]
extern "C" fn main() -> ! {
    let bss = MemoryRegion::new(&raw const __bss_start as usize, &raw const __bss_end as usize);
    let config = board::boot_config();
    unsafe {
        load_and_boot(bss, config, || {
            let mut uart = Uart0::new();
            uart.init();
            logger::init();
            info!("nandboot: mini2440, machine {}", config.machine_id);
            if config.source == BootSource::Probe {
                info!("nandboot: kernel source decided by probe");
            }
            board::nand()
        })
    }
}
