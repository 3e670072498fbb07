// library/nandboot/src/kernel/boot.rs
use super::atags;
use super::error::{BootError, Result};
use super::memory_layout::*;

/// Where the kernel image is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSource {
    /// Decide at boot by probing address zero.
    Probe,
    /// Directly addressable (NOR) flash: plain memory copy.
    MemoryMapped,
    /// Raw NAND through the page-read sequencer.
    Nand,
}

impl BootSource {
    /// Parse a board configuration name: `nand`, `nor` or `probe`.
    pub const fn from_name(name: &str) -> Option<Self> {
        if bytes_eq(name, "nand") {
            Some(Self::Nand)
        } else if bytes_eq(name, "nor") {
            Some(Self::MemoryMapped)
        } else if bytes_eq(name, "probe") {
            Some(Self::Probe)
        } else {
            None
        }
    }
}

const fn bytes_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Boot configuration parameters.
#[derive(Debug, Clone, Copy)]
pub struct BootConfig<'a> {
    pub source: BootSource,
    /// NAND offset, or address when memory-mapped.
    pub kernel_source: u32,
    pub kernel_load: u32,
    pub kernel_size: u32,
    pub params_base: u32,
    pub params_size: u32,
    pub mem_base: u32,
    pub mem_size: u32,
    pub machine_id: u32,
    pub cmdline: &'a str,
}

impl Default for BootConfig<'_> {
    fn default() -> Self {
        Self {
            source: BootSource::Nand,
            kernel_source: KERNEL_NAND_OFFSET,
            kernel_load: KERNEL_LOAD_ADDRESS,
            kernel_size: KERNEL_SIZE,
            params_base: PARAMS_ADDRESS,
            params_size: PARAMS_SIZE,
            mem_base: SDRAM_BASE,
            mem_size: SDRAM_SIZE,
            machine_id: MACH_TYPE_S3C2440,
            cmdline: DEFAULT_CMDLINE,
        }
    }
}

impl<'a> BootConfig<'a> {
    pub fn with_cmdline(self, cmdline: &'a str) -> Self {
        Self { cmdline, ..self }
    }

    fn mem_end(&self) -> u64 {
        self.mem_base as u64 + self.mem_size as u64
    }

    fn in_sdram(&self, start: u32, len: u32) -> bool {
        start >= self.mem_base && start as u64 + len as u64 <= self.mem_end()
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernel_load % 4 != 0 || self.params_base % 4 != 0 {
            return Err(BootError::InvalidConfig("unaligned load or parameter address"));
        }
        if self.kernel_source as u64 + self.kernel_size as u64 > 1 << 32 {
            return Err(BootError::InvalidConfig("kernel source past end of address space"));
        }
        if !self.in_sdram(self.kernel_load, self.kernel_size) {
            return Err(BootError::InvalidConfig("kernel outside SDRAM"));
        }
        if !self.in_sdram(self.params_base, self.params_size) {
            return Err(BootError::InvalidConfig("parameters outside SDRAM"));
        }
        let kernel_end = self.kernel_load as u64 + self.kernel_size as u64;
        let params_end = self.params_base as u64 + self.params_size as u64;
        if (self.params_base as u64) < kernel_end && (self.kernel_load as u64) < params_end {
            return Err(BootError::InvalidConfig("parameters overlap the kernel"));
        }
        if atags::list_words(self.cmdline) > (self.params_size / 4) as usize {
            return Err(BootError::ParamsOverflow);
        }
        Ok(())
    }
}
