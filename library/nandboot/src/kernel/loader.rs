// library/nandboot/src/kernel/loader.rs
use log::info;

use super::atags::ParamBuilder;
use super::boot::{BootConfig, BootSource};
use super::boot_env::KernelEntry;
use super::error::{BootError, Result};
use super::progress::ProgressBar;
use crate::nand::{NandController, RegisterBus, Variant, read_with_progress};

/// Bytes copied between progress updates of a memory-mapped copy.
const MAPPED_CHUNK: usize = 0x1_0000;
/// Percent between logged progress lines.
const PROGRESS_STEP: usize = 10;

/// Where image bytes come from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Directly addressable flash.
    Mapped(&'a [u8]),
    /// Raw NAND, starting at a flat flash offset.
    Nand { offset: u32 },
}

/// A `[start, end)` range of physical memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: usize,
    pub end: usize,
}

impl MemoryRegion {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Zero a `.bss` region.
///
/// # Safety
///
/// Nothing may be alive in `region`; every static stored there reads as zero
/// afterwards.
pub unsafe fn clear_bss(region: MemoryRegion) {
    unsafe { core::ptr::write_bytes(region.start as *mut u8, 0, region.len()) };
}

/// Copy `dest.len()` bytes from `source`, reporting the running total.
pub fn copy_image<B: RegisterBus, V: Variant>(
    nand: &mut NandController<B, V>,
    source: ImageSource<'_>,
    dest: &mut [u8],
    mut progress: impl FnMut(usize),
) -> Result<()> {
    match source {
        ImageSource::Mapped(src) => {
            let src = src.get(..dest.len()).ok_or(BootError::ImageTooLarge)?;
            let mut done = 0;
            for (to, from) in dest.chunks_mut(MAPPED_CHUNK).zip(src.chunks(MAPPED_CHUNK)) {
                to.copy_from_slice(from);
                done += to.len();
                progress(done);
            }
        }
        ImageSource::Nand { offset } => {
            read_with_progress(nand, offset, dest, progress)?;
        }
    }
    Ok(())
}

/// Copy this stage from flash to its link address.
///
/// Runs before any logger is installed, so the only output is the result.
/// `source` must already be resolved; [`BootSource::Probe`] is rejected.
///
/// # Safety
///
/// `dest` must be valid for `len` writable bytes that nothing else uses;
/// for [`BootSource::MemoryMapped`], `from` must be readable for `len`
/// bytes.
pub unsafe fn relocate_stage<B: RegisterBus, V: Variant>(
    nand: &mut NandController<B, V>,
    source: BootSource,
    from: u32,
    dest: usize,
    len: usize,
) -> Result<()> {
    let source = match source {
        BootSource::Nand => ImageSource::Nand { offset: from },
        BootSource::MemoryMapped => {
            ImageSource::Mapped(unsafe { core::slice::from_raw_parts(from as *const u8, len) })
        }
        BootSource::Probe => return Err(BootError::InvalidConfig("unresolved probe")),
    };
    let dest = unsafe { core::slice::from_raw_parts_mut(dest as *mut u8, len) };
    copy_image(nand, source, dest, |_| {})
}

/// Copies the kernel and lays out its parameters.
pub struct StageLoader<'a, B, V> {
    nand: &'a mut NandController<B, V>,
    config: BootConfig<'a>,
}

impl<'a, B: RegisterBus, V: Variant> StageLoader<'a, B, V> {
    pub fn new(nand: &'a mut NandController<B, V>, config: BootConfig<'a>) -> Self {
        Self { nand, config }
    }

    /// Copy the kernel into `image`, logging progress.
    pub fn load_kernel(&mut self, source: ImageSource<'_>, image: &mut [u8]) -> Result<()> {
        info!(
            "Copy kernel image ({} bytes) from {:?} to {:#010x}",
            image.len(),
            self.config.source,
            self.config.kernel_load
        );
        let mut bar = ProgressBar::new(image.len(), PROGRESS_STEP);
        copy_image(self.nand, source, image, |done| {
            bar.update(done);
        })
    }

    /// Write the tag list into `region`. Returns the words used, terminator
    /// included.
    pub fn build_params(&self, region: &mut [u32]) -> Result<usize> {
        info!("Set boot params at {:#010x}", self.config.params_base);
        let mut params = ParamBuilder::new(region);
        params
            .start()?
            .memory(self.config.mem_base, self.config.mem_size)?
            .cmdline(self.config.cmdline)?;
        params.end()?;
        info!("Boot params: {}", self.config.cmdline);
        Ok(params.len() + 2)
    }

    /// Load the kernel, write its parameters and return where to jump.
    pub fn prepare(&mut self, source: ImageSource<'_>, image: &mut [u8], params: &mut [u32]) -> Result<KernelEntry> {
        self.config.validate()?;
        self.load_kernel(source, image)?;
        self.build_params(params)?;
        KernelEntry::new(self.config.kernel_load, self.config.machine_id, self.config.params_base)
    }
}

/// Zero `.bss`, bring up the board through `init`, load the kernel and jump.
///
/// `init` runs after `.bss` is cleared and must install the logger and
/// return the initialised NAND controller.
///
/// # Safety
///
/// Every address in `config` must be real memory of this board, `bss` must
/// be this image's `.bss`, and [`BootSource::Probe`] may write address zero.
#[cfg(target_arch = "arm")]
pub unsafe fn load_and_boot<B, V>(
    bss: MemoryRegion,
    mut config: BootConfig<'_>,
    init: impl FnOnce() -> NandController<B, V>,
) -> !
where
    B: RegisterBus,
    V: Variant,
{
    use super::boot_env::{halt, resolve_source};
    use log::error;

    unsafe { clear_bss(bss) };
    let mut nand = init();

    config.source = unsafe { resolve_source(config.source) };
    if let Err(e) = config.validate() {
        error!("boot: {}", e);
        halt();
    }

    let len = config.kernel_size as usize;
    let image = unsafe { core::slice::from_raw_parts_mut(config.kernel_load as *mut u8, len) };
    let params = unsafe {
        core::slice::from_raw_parts_mut(config.params_base as *mut u32, (config.params_size / 4) as usize)
    };
    let source = match config.source {
        BootSource::Nand => ImageSource::Nand {
            offset: config.kernel_source,
        },
        _ => ImageSource::Mapped(unsafe { core::slice::from_raw_parts(config.kernel_source as *const u8, len) }),
    };

    match StageLoader::new(&mut nand, config).prepare(source, image, params) {
        Ok(kernel) => unsafe { kernel.boot() },
        Err(e) => {
            error!("boot: {}", e);
            halt()
        }
    }
}
