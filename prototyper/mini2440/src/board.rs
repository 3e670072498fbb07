//! Board constants from `board.toml` and NAND bring-up.

use log::debug;
use nandboot::kernel::{BootConfig, BootSource};
use nandboot::nand::regs::CLOCK_POWER_BASE;
use nandboot::nand::{Mmio, NandConfig, NandController, Timing, board_nand_init};

static_toml::static_toml! {
    static BOARD = include_toml!("board.toml");
}

const KERNEL_SOURCE: BootSource = match BootSource::from_name(BOARD.kernel.source) {
    Some(source) => source,
    None => panic!("board.toml: kernel.source must be \"nand\", \"nor\" or \"probe\""),
};

pub fn boot_config() -> BootConfig<'static> {
    BootConfig {
        source: KERNEL_SOURCE,
        kernel_source: BOARD.kernel.offset as u32,
        kernel_load: BOARD.kernel.load_address as u32,
        kernel_size: BOARD.kernel.size as u32,
        params_base: BOARD.memory.params_base as u32,
        params_size: BOARD.memory.params_size as u32,
        mem_base: BOARD.memory.sdram_base as u32,
        mem_size: BOARD.memory.sdram_size as u32,
        machine_id: BOARD.board.machine_id as u32,
        cmdline: BOARD.kernel.cmdline,
    }
}

pub fn nand_config() -> NandConfig {
    let polls = BOARD.nand.ready_timeout as u32;
    NandConfig {
        timing: Some(Timing::new(
            BOARD.nand.tacls as u8,
            BOARD.nand.twrph_0 as u8,
            BOARD.nand.twrph_1 as u8,
        )),
        ready_timeout: (polls != 0).then_some(polls),
        bbt_use_flash: BOARD.nand.bbt_use_flash,
        ..NandConfig::default()
    }
}

/// Gate the NAND clock and configure the controller.
pub fn nand() -> NandController<Mmio> {
    nand_with(nand_config())
}

/// Controller for the relocation copy. Runs from the steppingstone before
/// `.data` and `.rodata` are at their link address, so `board.toml` is not
/// read; the variant default timing applies.
#[inline(always)]
pub fn relocation_nand() -> NandController<Mmio> {
    nand_with(NandConfig::default())
}

#[inline(always)]
fn nand_with(config: NandConfig) -> NandController<Mmio> {
    let mut clock = unsafe { Mmio::new(CLOCK_POWER_BASE) };
    let (nand, chip) = board_nand_init(&mut clock, unsafe { Mmio::nand() }, config);
    debug!("board: {:?}", chip);
    nand
}
