//! Control transfer to the loaded image, and storage detection.

use log::{error, info};

use super::boot::BootSource;
use super::error::{BootError, Result};

#[cfg(target_arch = "arm")]
unsafe extern "C" {
    fn nandboot_enter_image(entry: u32, zero: u32, machine: u32, params: u32);
    fn nandboot_probe_zero(sentinel: u32) -> u32;
}

/// Word written to address zero by the storage probe.
pub const PROBE_SENTINEL: u32 = 0x1234_5678;

/// A validated kernel entry point with its register arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelEntry {
    entry: u32,
    machine_id: u32,
    params: u32,
}

impl KernelEntry {
    pub fn new(entry: u32, machine_id: u32, params: u32) -> Result<Self> {
        if entry == 0 || entry % 4 != 0 || params == 0 || params % 4 != 0 {
            return Err(BootError::InvalidEntry);
        }
        Ok(Self {
            entry,
            machine_id,
            params,
        })
    }

    pub fn entry(&self) -> u32 {
        self.entry
    }

    pub fn machine_id(&self) -> u32 {
        self.machine_id
    }

    pub fn params(&self) -> u32 {
        self.params
    }

    /// Branch to the image with `r0 = 0`, `r1 = machine id`, `r2 = params`.
    ///
    /// # Safety
    ///
    /// A complete image must be loaded at the entry address and the
    /// parameter list must be in place.
    pub unsafe fn boot(self) -> ! {
        info!(
            "boot: jumping to {:#010x}, machine {}, params {:#010x}",
            self.entry, self.machine_id, self.params
        );
        unsafe { enter(self) };
        error!("start kernel ERROR");
        halt()
    }
}

#[cfg(target_arch = "arm")]
unsafe fn enter(kernel: KernelEntry) {
    unsafe { nandboot_enter_image(kernel.entry, 0, kernel.machine_id, kernel.params) }
}

#[cfg(not(target_arch = "arm"))]
unsafe fn enter(kernel: KernelEntry) {
    let image: extern "C" fn(u32, u32, u32) =
        unsafe { core::mem::transmute(kernel.entry as usize) };
    image(0, kernel.machine_id, kernel.params);
}

/// Spin forever.
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

/// Storage kind from the value read back after writing [`PROBE_SENTINEL`].
///
/// The steppingstone SRAM at address zero keeps the write on a NAND boot;
/// NOR flash does not.
pub fn classify_probe(readback: u32) -> BootSource {
    if readback == PROBE_SENTINEL {
        BootSource::Nand
    } else {
        BootSource::MemoryMapped
    }
}

/// Write the sentinel to address zero, read it back and restore the old word.
///
/// # Safety
///
/// Address zero must be either the steppingstone or NOR flash, and nothing
/// else may be running from the word at address zero.
#[cfg(target_arch = "arm")]
pub unsafe fn probe_storage() -> BootSource {
    let readback = unsafe { nandboot_probe_zero(PROBE_SENTINEL) };
    let source = classify_probe(readback);
    info!("boot: probe read {:#010x}, booting from {:?}", readback, source);
    source
}

/// Resolve [`BootSource::Probe`] into a concrete source.
///
/// # Safety
///
/// See [`probe_storage`].
#[cfg(target_arch = "arm")]
pub unsafe fn resolve_source(source: BootSource) -> BootSource {
    match source {
        BootSource::Probe => unsafe { probe_storage() },
        other => other,
    }
}
