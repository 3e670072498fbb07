//! Memory layout of the mini2440 (S3C2440, 64 MiB SDRAM).

/// SDRAM bank 6.
pub const SDRAM_BASE: u32 = 0x3000_0000;
pub const SDRAM_SIZE: u32 = 0x0400_0000; // 64MB

/// ATAG list location expected by the kernel.
pub const PARAMS_ADDRESS: u32 = 0x3000_0100;
pub const PARAMS_SIZE: u32 = 0x4000; // 16KB

/// Kernel link address (zImage load address).
pub const KERNEL_LOAD_ADDRESS: u32 = 0x3000_8000;

/// Kernel partition offset in NAND, past the 64-byte uImage header.
pub const KERNEL_NAND_OFFSET: u32 = 0x0006_0000 + 64;
pub const KERNEL_SIZE: u32 = 0x0020_0000; // 2MB

/// Link address of this stage once relocated to SDRAM.
pub const STAGE_LINK_ADDRESS: u32 = 0x33F8_0000;

/// Machine number of the S3C2440 (SMDK2440) board.
pub const MACH_TYPE_S3C2440: u32 = 362;

pub const DEFAULT_CMDLINE: &str = "noinitrd root=/dev/mtdblock3 init=/linuxrc console=ttySAC0";
