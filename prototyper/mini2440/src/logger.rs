use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::uart::Uart0;

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        const LEVEL: LevelFilter = LevelFilter::Debug;
    } else {
        const LEVEL: LevelFilter = LevelFilter::Info;
    }
}

struct UartLogger;

static LOGGER: UartLogger = UartLogger;

impl Log for UartLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut uart = unsafe { Uart0::new() };
        let _ = writeln!(uart, "[{:>5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// Install the UART logger. Single-threaded boot only: ARMv4T has no
/// atomic compare-and-swap, so the racy setters are used.
pub fn init() {
    unsafe {
        let _ = log::set_logger_racy(&LOGGER);
        log::set_max_level_racy(LEVEL);
    }
}
