//! Scenario runner CLI.
//!
//! Loads `e2e/runner.json` (or `--config`), applies flags, runs every
//! `*.scenario.json` in the test directory on every engine and exits 0 only
//! if all of them pass. With `serveDir` / `--serve` the page is served from
//! disk on a local port, so no dev server or desktop window is needed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use nin_lib::config::{BrowserEngine, RunnerConfig, RunnerOverrides};
use nin_lib::error::NinResult;
use nin_lib::logging;
use nin_lib::scenario::{self, ChromiumLauncher, ScenarioRunner, StaticServer};

/// Config file used when `--config` is not given and it exists.
const DEFAULT_CONFIG: &str = "e2e/runner.json";

#[derive(Parser, Debug)]
#[command(name = "nin-e2e", version, about = "Run browser scenarios against the nin window")]
struct Cli {
    /// Runner config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding *.scenario.json files
    #[arg(long)]
    test_dir: Option<PathBuf>,

    /// Base URL for relative navigation
    #[arg(long)]
    base_url: Option<String>,

    /// Timeout for a whole scenario, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Timeout for a single navigation, in milliseconds
    #[arg(long, value_name = "MS")]
    navigation_timeout: Option<u64>,

    /// Timeout for waiting on a control or result, in milliseconds
    #[arg(long, value_name = "MS")]
    action_timeout: Option<u64>,

    /// Run the browser without a window
    #[arg(long, conflicts_with = "headed")]
    headless: bool,

    /// Run the browser with a window
    #[arg(long)]
    headed: bool,

    /// Viewport width
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height
    #[arg(long)]
    height: Option<u32>,

    /// Delay before each browser action, in milliseconds
    #[arg(long, value_name = "MS")]
    slow_mo: Option<u64>,

    /// Engine to run (repeatable)
    #[arg(long = "engine", value_enum)]
    engines: Vec<BrowserEngine>,

    /// Serve this directory locally and run against it instead of --base-url
    #[arg(long = "serve", value_name = "DIR")]
    serve_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> RunnerOverrides {
        let headless = match (self.headless, self.headed) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        RunnerOverrides {
            base_url: self.base_url.clone(),
            test_dir: self.test_dir.clone(),
            timeout_ms: self.timeout,
            navigation_timeout_ms: self.navigation_timeout,
            action_timeout_ms: self.action_timeout,
            headless,
            width: self.width,
            height: self.height,
            slow_mo_ms: self.slow_mo,
            engines: self.engines.clone(),
            serve_dir: self.serve_dir.clone(),
        }
    }
}

fn load_config(cli: &Cli) -> NinResult<RunnerConfig> {
    let mut config = match &cli.config {
        Some(path) => RunnerConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => RunnerConfig::load(Path::new(DEFAULT_CONFIG))?,
        None => RunnerConfig::default(),
    };
    cli.overrides().apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_console_logging();
    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("nin-e2e: {}", e);
            return ExitCode::from(2);
        }
    };

    let scenarios = match scenario::load_dir(&config.test_dir) {
        Ok(scenarios) => scenarios,
        Err(e) => {
            eprintln!("nin-e2e: {}", e);
            return ExitCode::from(2);
        }
    };
    log::info!(
        "[E2E] {} scenario(s) from {} on {:?}",
        scenarios.len(),
        config.test_dir.display(),
        config.engines
    );

    let server = match &config.serve_dir {
        Some(dir) => match StaticServer::start(dir).await {
            Ok(server) => {
                config.base_url = server.base_url();
                Some(server)
            },
            Err(e) => {
                eprintln!("nin-e2e: {}", e);
                return ExitCode::from(2);
            },
        },
        None => None,
    };

    let runner = ScenarioRunner::new(ChromiumLauncher, config);
    let report = runner.run_all(&scenarios).await;
    println!("{}", report);

    if let Some(server) = server {
        server.stop().await;
    }

    ExitCode::from(report.exit_code() as u8)
}
