use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::{Config, PackageManager};

pub fn execute(matches: &ArgMatches, config: &Config) -> Result<()> {
    let manager = PackageManager::new(config);

    let json = match matches.subcommand() {
        Some(("list-updates", _)) => manager.list_updates_json(),
        Some(("upgrade", sub_matches)) => {
            manager.sync_upgrade_json(sub_matches.get_flag("assume-yes"))
        }
        Some(("install", sub_matches)) => {
            let packages: Vec<String> = sub_matches
                .get_many::<String>("packages")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            manager.install_json(&packages, sub_matches.get_flag("assume-yes"))
        }
        _ => anyhow::bail!("Use 'hostscope pacman --help' for more information."),
    }
    .context("Failed to encode pacman result")?;

    println!("{}", json);
    Ok(())
}
