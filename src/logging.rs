//! Logger initialisation for the native driver.

use crate::config::LogLevel;

/// Install `env_logger` at `level`. `RUST_LOG`, when set, overrides it.
///
/// Calling this twice is harmless; the second call only logs at debug level.
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();

    match result {
        Ok(()) => log::debug!("Logger initialised at {:?}", level),
        Err(e) => log::debug!("Logger already initialised: {}", e),
    }
}
