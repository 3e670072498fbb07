// library/nandboot/src/kernel/error.rs
use crate::nand::NandError;

/// Stage loader error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    Nand(NandError),
    /// The tag list does not fit in the parameter region.
    ParamsOverflow,
    /// The image source holds fewer bytes than the kernel size.
    ImageTooLarge,
    /// Entry or parameter address unusable for the jump.
    InvalidEntry,
    InvalidConfig(&'static str),
}

impl From<NandError> for BootError {
    fn from(err: NandError) -> Self {
        BootError::Nand(err)
    }
}

impl core::fmt::Display for BootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BootError::Nand(e) => write!(f, "NAND error: {}", e),
            BootError::ParamsOverflow => write!(f, "Boot parameters overflow their region"),
            BootError::ImageTooLarge => write!(f, "Kernel larger than its source"),
            BootError::InvalidEntry => write!(f, "Invalid kernel entry"),
            BootError::InvalidConfig(msg) => write!(f, "Invalid boot config: {}", msg),
        }
    }
}

impl core::error::Error for BootError {}

pub type Result<T> = core::result::Result<T, BootError>;
