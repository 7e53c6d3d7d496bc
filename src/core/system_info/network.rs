use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::Config;
use crate::core::system_info::types::InterfaceDetails;
use crate::platform::command::CommandRunner;
use crate::platform::fs::read_trimmed;

static INTERFACE_NAME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.:@-]+$").ok());

/// Whether an interface name may be placed on a shell command line
pub fn is_safe_interface_name(name: &str) -> bool {
    INTERFACE_NAME
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// First address of the given family (`inet` or `inet6`) in `ip addr` output,
/// without its prefix length
pub fn first_address(output: &str, family: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        if tokens.next()? != family {
            return None;
        }
        let address = tokens.next()?;
        let address = address.split('/').next().unwrap_or(address);
        Some(address.to_string())
    })
}

/// Static fields of one interface; anything unreadable keeps its sentinel
pub fn details(config: &Config, runner: &dyn CommandRunner, name: &str) -> InterfaceDetails {
    let mut details = InterfaceDetails::default();
    if !is_safe_interface_name(name) {
        log::warn!("Skipping address lookup for unusual interface name {:?}", name);
        return details;
    }

    let class_dir = config.sys_path("class/net").join(name);
    if let Some(mac) = read_trimmed(&class_dir.join("address")).filter(|m| !m.is_empty()) {
        details.mac_address = mac;
    }
    if let Some(state) = read_trimmed(&class_dir.join("operstate")) {
        details.is_up = state == "up";
    }

    let v4 = runner.output_or_empty(&format!("ip -4 addr show {}", name));
    if let Some(address) = first_address(&v4, "inet") {
        details.ipv4_address = address;
    }
    let v6 = runner.output_or_empty(&format!("ip -6 addr show {}", name));
    if let Some(address) = first_address(&v6, "inet6") {
        details.ipv6_address = address;
    }

    details
}
