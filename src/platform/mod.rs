// Platform-specific code module

pub mod command;
pub mod elevation;
pub mod fs;
pub mod gpu;

// Re-exports for cleaner imports
pub use command::{CommandOutput, CommandRunner, ShellRunner};
pub use elevation::{is_elevated, privilege_prefix};
pub use fs::{filesystem_usage, read_trimmed, FsUsage};
pub use gpu::{get_gpu_probe, GpuProbe};
