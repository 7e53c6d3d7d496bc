use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::system_info::types::GpuInfo;
use crate::platform::command::CommandRunner;
use crate::platform::gpu::GpuProbe;

static DISPLAY_CLASS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(VGA|3D|Display).*controller").ok());

const NVIDIA_SMI_QUERY: &str = "nvidia-smi --query-gpu=name --format=csv,noheader,nounits";

/// Split an `lspci -mm` line into its quoted fields and bare flags
fn machine_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let field: String = chars.by_ref().take_while(|&ch| ch != '"').collect();
            fields.push(field);
        } else {
            let mut field = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                field.push(ch);
                chars.next();
            }
            fields.push(field);
        }
    }
    fields
}

fn is_display_class(class: &str) -> bool {
    DISPLAY_CLASS
        .as_ref()
        .is_some_and(|re| re.is_match(class))
}

/// Display controllers from `lspci -mm` output
pub fn parse_lspci_machine(output: &str) -> Vec<GpuInfo> {
    output
        .lines()
        .filter_map(|line| {
            let fields = machine_fields(line);
            if fields.len() < 4 || !is_display_class(&fields[1]) {
                return None;
            }
            let vendor = &fields[2];
            let device = &fields[3];
            let revision = fields[4..]
                .iter()
                .find_map(|f| f.strip_prefix("-r").filter(|r| !r.is_empty()));

            let name = match revision {
                Some(rev) => format!("{} {} (rev {})", vendor, device, rev),
                None => format!("{} {}", vendor, device),
            };
            let mut gpu = GpuInfo::named(name);
            gpu.vendor = vendor.clone();
            Some(gpu)
        })
        .collect()
}

/// Display controllers from plain `lspci` output
pub fn parse_lspci_plain(output: &str) -> Vec<GpuInfo> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.contains("VGA") || line.contains("3D") || line.contains("Display"))
        .map(GpuInfo::named)
        .collect()
}

pub fn parse_nvidia_smi(output: &str) -> Vec<GpuInfo> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut gpu = GpuInfo::named(format!("NVIDIA {}", line));
            gpu.vendor = "NVIDIA".to_string();
            gpu
        })
        .collect()
}

/// Detect GPUs, trying each source in turn until one reports something
pub fn collect(runner: &dyn CommandRunner, probe: Option<&dyn GpuProbe>) -> Vec<GpuInfo> {
    let mut gpus = parse_lspci_machine(&runner.output_or_empty("lspci -mm"));
    if gpus.is_empty() {
        gpus = parse_lspci_plain(&runner.output_or_empty("lspci"));
    }
    if gpus.is_empty() && runner.is_available("nvidia-smi") {
        gpus = parse_nvidia_smi(&runner.output_or_empty(NVIDIA_SMI_QUERY));
    }
    if gpus.is_empty() {
        return vec![GpuInfo::undetected()];
    }

    if let Some(probe) = probe {
        log::debug!("Enriching {} GPU(s) via {}", gpus.len(), probe.name());
        probe.enrich(&mut gpus);
    }
    gpus
}
