use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::core::config::Config;
use crate::core::system_info::os::is_arch_based;
use crate::error::{HostError, Result};
use crate::platform::command::{CommandOutput, CommandRunner, ShellRunner};
use crate::platform::elevation::{is_elevated, privilege_prefix};
use crate::ui::json::{error_payload, to_json};

static PACKAGE_NAME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@._+/-]+$").ok());

const PASSWORD_PROMPTS: &[&str] = &[
    "password is required",
    "a password is required",
    "password for",
];

const CHECKUPDATES: &str = "checkupdates";
const PACMAN_QUERY_UPDATES: &str = "pacman -Qu";

/// Outcome of `pacman -Syu`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeReport {
    pub command: String,
    pub interactive_command: String,
    pub exit_code: i32,
    pub requires_password: bool,
    pub output: String,
}

/// Outcome of `pacman -S`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub command: String,
    pub interactive_command: String,
    pub packages: Vec<String>,
    pub exit_code: i32,
    pub requires_password: bool,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageUpdate {
    pub name: String,
    pub current: String,
    pub available: String,
}

/// Pending updates as reported by `checkupdates` or `pacman -Qu`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateList {
    pub command: String,
    pub exit_code: i32,
    pub fallback_used: bool,
    pub updates: Vec<PackageUpdate>,
    pub output: String,
}

impl UpdateList {
    fn not_arch() -> Self {
        Self {
            command: "none".to_string(),
            exit_code: 0,
            fallback_used: false,
            updates: Vec::new(),
            output: "Not an Arch-based system".to_string(),
        }
    }
}

pub fn is_valid_package_name(name: &str) -> bool {
    !name.starts_with('-')
        && PACKAGE_NAME
            .as_ref()
            .is_some_and(|re| re.is_match(name))
}

pub fn contains_password_prompt(output: &str) -> bool {
    PASSWORD_PROMPTS.iter().any(|prompt| output.contains(prompt))
}

/// Parse `name current -> available` lines; anything shorter is skipped
pub fn parse_update_lines(output: &str) -> Vec<PackageUpdate> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next()?;
            let current = tokens.next()?;
            let _arrow = tokens.next()?;
            let available = tokens.next()?;
            Some(PackageUpdate {
                name: name.to_string(),
                current: current.to_string(),
                available: available.to_string(),
            })
        })
        .collect()
}

/// Thin wrapper over pacman that reports what it ran and what came back
pub struct PackageManager {
    runner: Arc<dyn CommandRunner>,
    is_root: bool,
    arch_based: bool,
}

impl PackageManager {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(Arc::new(ShellRunner), is_elevated(), is_arch_based(config))
    }

    pub fn with_parts(runner: Arc<dyn CommandRunner>, is_root: bool, arch_based: bool) -> Self {
        Self {
            runner,
            is_root,
            arch_based,
        }
    }

    /// Run with stderr folded into the output; a spawn failure becomes exit -1
    fn capture(&self, command: &str) -> CommandOutput {
        match self.runner.run(&format!("{} 2>&1", command)) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Failed to start '{}': {}", command, e);
                CommandOutput::new(-1, e.to_string())
            }
        }
    }

    fn pacman_command(&self, non_interactive: bool, operation: &str, assume_yes: bool) -> String {
        let mut command = format!(
            "{}pacman {}",
            privilege_prefix(self.is_root, non_interactive),
            operation
        );
        if assume_yes {
            command.push_str(" --noconfirm");
        }
        command
    }

    fn needs_password(result: &CommandOutput) -> bool {
        !result.success() && contains_password_prompt(&result.output)
    }

    pub fn sync_upgrade(&self, assume_yes: bool) -> UpgradeReport {
        let command = self.pacman_command(true, "-Syu", assume_yes);
        let interactive_command = self.pacman_command(false, "-Syu", assume_yes);
        let result = self.capture(&command);

        UpgradeReport {
            requires_password: Self::needs_password(&result),
            command,
            interactive_command,
            exit_code: result.exit_code,
            output: result.output,
        }
    }

    pub fn install(&self, packages: &[String], assume_yes: bool) -> Result<InstallReport> {
        if packages.is_empty() {
            return Err(HostError::NoPackages);
        }
        if let Some(bad) = packages.iter().find(|p| !is_valid_package_name(p)) {
            return Err(HostError::invalid_package(bad.as_str()));
        }

        let names = packages.join(" ");
        let command = format!("{} {}", self.pacman_command(true, "-S", assume_yes), names);
        let interactive_command =
            format!("{} {}", self.pacman_command(false, "-S", assume_yes), names);
        let result = self.capture(&command);

        Ok(InstallReport {
            requires_password: Self::needs_password(&result),
            command,
            interactive_command,
            packages: packages.to_vec(),
            exit_code: result.exit_code,
            output: result.output,
        })
    }

    pub fn list_updates(&self) -> UpdateList {
        if !self.arch_based {
            return UpdateList::not_arch();
        }

        let checked = if self.runner.is_available(CHECKUPDATES) {
            Some(self.capture(CHECKUPDATES))
        } else {
            None
        };
        let (command, result, fallback_used) = match checked {
            Some(result) if !matches!(result.exit_code, 127 | -1) => (CHECKUPDATES, result, false),
            _ => {
                log::debug!("checkupdates unavailable, falling back to pacman -Qu");
                (PACMAN_QUERY_UPDATES, self.capture(PACMAN_QUERY_UPDATES), true)
            }
        };

        // checkupdates exits 2 when nothing is pending; pacman -Qu exits 1
        let updates = if matches!(result.exit_code, 0..=2) {
            parse_update_lines(&result.output)
        } else {
            Vec::new()
        };

        UpdateList {
            command: command.to_string(),
            exit_code: result.exit_code,
            fallback_used,
            updates,
            output: result.output,
        }
    }

    pub fn sync_upgrade_json(&self, assume_yes: bool) -> Result<String> {
        to_json(&self.sync_upgrade(assume_yes))
    }

    /// Install report, or the error payload for an unusable package list
    pub fn install_json(&self, packages: &[String], assume_yes: bool) -> Result<String> {
        let error = match self.install(packages, assume_yes) {
            Ok(report) => return to_json(&report),
            Err(e) => e,
        };
        match &error {
            HostError::NoPackages => Ok(error_payload(error.code())),
            HostError::InvalidPackage(name) => {
                to_json(&serde_json::json!({ "error": error.code(), "package": name }))
            }
            _ => Err(error),
        }
    }

    pub fn list_updates_json(&self) -> Result<String> {
        to_json(&self.list_updates())
    }
}
