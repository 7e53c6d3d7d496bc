//! Package maintenance through pacman.

pub mod package_manager;

pub use package_manager::{
    InstallReport, PackageManager, PackageUpdate, UpdateList, UpgradeReport,
};
