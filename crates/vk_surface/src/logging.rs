//! Logging setup for binaries built on this crate

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// `RUST_LOG`, when set, takes precedence over `default_filter`. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
