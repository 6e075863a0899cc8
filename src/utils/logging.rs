//! Logger setup. Library code only uses the `log` macros; the binary installs
//! a `flexi_logger` backend writing to stderr so stdout stays clean for tables.

use crate::error::UtilsError;
use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use log::Record;

/// Log level used when `RUST_LOG` is not set.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

fn log_cmdline_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(w, "[{}] {}", record.level(), record.args())
}

/// Start the stderr logger. Keep the returned handle alive for the whole run.
pub fn init_logging(verbose: bool) -> Result<LoggerHandle, UtilsError> {
    let to_error = |e: flexi_logger::FlexiLoggerError| UtilsError::Logging {
        message: e.to_string(),
    };
    let handle = Logger::try_with_env_or_str(default_level(verbose))
        .map_err(to_error)?
        .log_to_stderr()
        .format(log_cmdline_format)
        .start()
        .map_err(to_error)?;
    log::debug!("Logger started at level {}", default_level(verbose));
    Ok(handle)
}
