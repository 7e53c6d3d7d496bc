// hostscope library - public API

// Re-export error types
pub mod error;
pub use error::{HostError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ffi;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;
pub use core::maintenance::PackageManager;
pub use core::sampling::{CpuUsage, NetRate};
pub use core::telemetry::Telemetry;

/// Initialize logging on stderr so stdout only ever carries JSON.
///
/// The level defaults to `warn` and follows `RUST_LOG` when set.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .try_init();
}
