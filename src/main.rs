use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;

use hostscope::commands::{completions, info, monitor, pacman};
use hostscope::{Config, Telemetry};

fn assume_yes_arg() -> Arg {
    Arg::new("assume-yes")
        .short('y')
        .long("assume-yes")
        .visible_alias("yes")
        .help("Pass --noconfirm to pacman")
        .action(ArgAction::SetTrue)
}

fn sample_ms_arg() -> Arg {
    Arg::new("sample-ms")
        .long("sample-ms")
        .value_name("MS")
        .help(
            "Take a baseline, wait MS milliseconds, then report rates \
             (0 reports a single observation)",
        )
        .value_parser(clap::value_parser!(u64))
        .default_value("500")
}

fn build_cli() -> Command {
    Command::new("hostscope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Host telemetry as JSON: CPU, memory, disks, network, GPU, drivers and pacman")
        .subcommand(Command::new("summary").about("Print the full system summary"))
        .subcommand(
            Command::new("cpu")
                .about("Print CPU information, or usage with --usage")
                .arg(
                    Arg::new("usage")
                        .long("usage")
                        .help("Report usage percentages instead of static information")
                        .action(ArgAction::SetTrue),
                )
                .arg(sample_ms_arg()),
        )
        .subcommand(Command::new("gpu").about("Print detected GPUs"))
        .subcommand(Command::new("memory").about("Print memory and swap usage"))
        .subcommand(Command::new("disks").about("Print mounted block-device filesystems"))
        .subcommand(
            Command::new("network")
                .about("Print network interfaces with throughput")
                .arg(sample_ms_arg()),
        )
        .subcommand(
            Command::new("drivers")
                .about("Print loaded kernel modules")
                .arg(
                    Arg::new("backup")
                        .long("backup")
                        .value_name("FILE")
                        .help("Also save the raw lsmod output to FILE"),
                ),
        )
        .subcommand(
            Command::new("monitor")
                .about("Record performance samples and print the history (Ctrl+C stops early)")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("N")
                        .help("Number of samples to record")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    Arg::new("interval-ms")
                        .short('i')
                        .long("interval-ms")
                        .value_name("MS")
                        .help("Delay between samples (defaults to the configured interval)")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("proxy")
                .about("Set or clear the proxy environment variables")
                .arg(Arg::new("http").long("http").value_name("URL").default_value(""))
                .arg(Arg::new("https").long("https").value_name("URL").default_value("")),
        )
        .subcommand(
            Command::new("pacman")
                .about("Query and run pacman (use 'hostscope pacman --help' for subcommands)")
                .subcommand_required(true)
                .subcommand(Command::new("list-updates").about("List pending package updates"))
                .subcommand(
                    Command::new("upgrade")
                        .about("Run a full system upgrade")
                        .arg(assume_yes_arg()),
                )
                .subcommand(
                    Command::new("install")
                        .about("Install packages")
                        .arg(
                            Arg::new("packages")
                                .value_name("PACKAGE")
                                .num_args(0..),
                        )
                        .arg(assume_yes_arg()),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell type (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .value_parser(clap::value_parser!(Shell)),
                ),
        )
}

fn run(matches: &ArgMatches, cli: &mut Command) -> Result<()> {
    let config = Config::load()?;

    match matches.subcommand() {
        Some(("pacman", sub_matches)) => return pacman::execute(sub_matches, &config),
        Some(("completions", sub_matches)) => return completions::execute(sub_matches, cli),
        _ => {}
    }

    let telemetry = Telemetry::new(config);
    match matches.subcommand() {
        None | Some(("summary", _)) => info::execute_summary(&telemetry),
        Some(("cpu", sub_matches)) => info::execute_cpu(sub_matches, &telemetry),
        Some(("gpu", _)) => info::execute_gpu(&telemetry),
        Some(("memory", _)) => info::execute_memory(&telemetry),
        Some(("disks", _)) => info::execute_disks(&telemetry),
        Some(("network", sub_matches)) => info::execute_network(sub_matches, &telemetry),
        Some(("drivers", sub_matches)) => info::execute_drivers(sub_matches, &telemetry),
        Some(("monitor", sub_matches)) => monitor::execute(sub_matches, &telemetry),
        Some(("proxy", sub_matches)) => info::execute_proxy(sub_matches, &telemetry),
        Some((other, _)) => anyhow::bail!("Unknown command: {}", other),
    }
}

fn main() {
    hostscope::init_logging();

    let mut cli = build_cli();
    let matches = match cli.clone().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(&matches, &mut cli) {
        eprintln!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
