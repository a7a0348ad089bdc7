//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize logging with a default level, still overridable through `RUST_LOG`
///
/// Returns quietly if a logger is already installed, so hosts that set up
/// their own logger before loading the overlay are left alone.
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
