//! Logger setup - stderr only, so the chart stays the single file written.

use flexi_logger::{DeferredNow, FlexiLoggerError, Logger, LoggerHandle, Record};
use std::io::Write;

const DEFAULT_LEVEL: &str = "info";

/// Start the global logger. Keep the returned handle alive until exit.
pub fn init_logger() -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_str(DEFAULT_LEVEL)?
        .log_to_stderr()
        .format(log_format)
        .start()
}

fn log_format(w: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
    write!(
        w,
        "[{}] [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.args()
    )
}
