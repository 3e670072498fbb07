//! Second-stage loader for S3C2410 / S3C2440 boards booting from NAND.
//!
//! [`nand`] drives the on-chip NAND controller and reads arbitrary byte
//! ranges across page boundaries. [`kernel`] copies the kernel image, lays
//! out the ARM boot parameter list and jumps to it.
#![cfg_attr(not(test), no_std)]

pub mod kernel;
pub mod nand;

#[cfg(test)]
mod testing;

pub use kernel::{BootConfig, BootError, BootSource, KernelEntry};
pub use nand::{ActiveVariant, NandConfig, NandController, NandError};
