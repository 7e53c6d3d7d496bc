// Core business logic module

pub mod config;
pub mod maintenance;
pub mod sampling;
pub mod system_info;
pub mod system_monitor;
pub mod telemetry;

// Re-export commonly used items
pub use config::Config;
pub use maintenance::PackageManager;
pub use telemetry::Telemetry;
