// library/nandboot/src/kernel/mod.rs
//! Kernel stage loading: copy the image, lay out its boot parameters and
//! jump to it.

pub mod atags;
pub mod boot;
pub mod boot_env;
pub mod error;
pub mod loader;
pub mod memory_layout;
pub mod progress;

pub use atags::{ParamBuilder, Tag, TagIter};
pub use boot::{BootConfig, BootSource};
pub use boot_env::{KernelEntry, PROBE_SENTINEL, classify_probe, halt};
pub use error::BootError;
#[cfg(target_arch = "arm")]
pub use loader::load_and_boot;
pub use loader::{ImageSource, MemoryRegion, StageLoader, clear_bss, copy_image, relocate_stage};
pub use progress::ProgressBar;

#[cfg(target_arch = "arm")]
pub use boot_env::{probe_storage, resolve_source};
