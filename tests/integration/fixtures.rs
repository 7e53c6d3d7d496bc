//! Shared fixtures: a fake host tree, canned shell output and a hand-driven clock.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tempfile::TempDir;

use hostscope::core::sampling::Clock;
use hostscope::platform::{CommandOutput, CommandRunner};
use hostscope::{Config, Telemetry};

pub const NET_DEV_HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

/// Temporary `/proc`, `/sys` and `/etc` roots
pub struct HostTree {
    dir: TempDir,
}

impl HostTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for root in ["proc", "sys", "etc"] {
            fs::create_dir_all(dir.path().join(root)).unwrap();
        }
        Self { dir }
    }

    pub fn proc(&self) -> PathBuf {
        self.dir.path().join("proc")
    }

    pub fn sys(&self) -> PathBuf {
        self.dir.path().join("sys")
    }

    pub fn etc(&self) -> PathBuf {
        self.dir.path().join("etc")
    }

    pub fn config(&self) -> Config {
        Config::with_roots(self.proc(), self.sys(), self.etc())
    }

    pub fn write(&self, root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn write_stat(&self, ticks: [u64; 8]) {
        let numbers: Vec<String> = ticks.iter().map(u64::to_string).collect();
        let contents = format!("cpu  {} 0 0\ncpu0 1 2 3 4 5 6 7 8\n", numbers.join(" "));
        self.write(&self.proc(), "stat", &contents);
    }

    /// `(name, rx_bytes, tx_bytes)` rows after the two header lines
    pub fn write_net_dev(&self, rows: &[(&str, u64, u64)]) {
        let mut contents = NET_DEV_HEADER.to_string();
        for (name, rx, tx) in rows {
            contents.push_str(&format!(
                "{:>6}: {} 100 0 0 0 0 0 0 {} 100 0 0 0 0 0 0\n",
                name, rx, tx
            ));
        }
        self.write(&self.proc(), "net/dev", &contents);
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Command runner answering from a table; unknown commands exit 127
#[derive(Default)]
pub struct FixtureRunner {
    responses: Mutex<HashMap<String, CommandOutput>>,
    calls: Mutex<Vec<String>>,
}

impl FixtureRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, command: &str, exit_code: i32, output: &str) -> Self {
        self.responses
            .lock()
            .insert(command.to_string(), CommandOutput::new(exit_code, output));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl CommandRunner for FixtureRunner {
    fn run(&self, command: &str) -> io::Result<CommandOutput> {
        self.calls.lock().push(command.to_string());
        Ok(self
            .responses
            .lock()
            .get(command)
            .cloned()
            .unwrap_or_else(|| CommandOutput::new(127, "")))
    }

    fn is_available(&self, program: &str) -> bool {
        self.responses
            .lock()
            .keys()
            .any(|command| command.split_whitespace().next() == Some(program))
    }
}

pub type FixtureTelemetry = (Telemetry, Arc<ManualClock>, Arc<FixtureRunner>);

/// Telemetry over the fixture tree with a manual clock and a canned runner
pub fn telemetry(tree: &HostTree, runner: FixtureRunner) -> FixtureTelemetry {
    telemetry_with(tree.config(), runner)
}

pub fn telemetry_with(config: Config, runner: FixtureRunner) -> FixtureTelemetry {
    let clock = Arc::new(ManualClock::new());
    let runner = Arc::new(runner);
    let telemetry = Telemetry::with_parts(config, runner.clone(), clock.clone());
    (telemetry, clock, runner)
}
