//! Kernel log backend
//!
//! Routes the `log` facade to a console sink, typically the platform's
//! serial port. Each record becomes one line:
//!
//! ```text
//! [WARN ] pantheros_syscall::syscall::handler: syscall: unknown call number 9999
//! ```
//!
//! # Security Considerations
//! - The sink is behind a spinlock, so lines from different CPUs never
//!   interleave
//! - Nothing is logged before `init`; records are dropped, not buffered

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// A console the kernel can write log lines to.
pub type Console = dyn Write + Send;

/// `log` backend writing to the kernel console
pub struct KernelLogger {
    console: Mutex<Option<&'static mut Console>>,
}

impl KernelLogger {
    const fn new() -> Self {
        Self {
            console: Mutex::new(None),
        }
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut console = self.console.lock();
        if let Some(out) = console.as_mut() {
            // A failing console has nowhere to report to.
            let _ = writeln!(
                out,
                "[{:<5}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Global logger instance
static LOGGER: KernelLogger = KernelLogger::new();

/// Install the kernel logger, writing to `console` at up to `level`.
///
/// Fails if a logger is already installed.
pub fn init(console: &'static mut Console, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    *LOGGER.console.lock() = Some(console);
    log::set_max_level(level);
    Ok(())
}
