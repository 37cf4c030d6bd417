//! gridkeys - spreadsheet key interpretation on a terminal grid

mod config;
mod error;
mod keys;
mod logging;
mod scenario;
mod session;
#[cfg(feature = "tui")]
mod tui;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use gridkeys_core::PermissionLevel;

use crate::config::Config;
use crate::logging::LogTarget;
use crate::session::Session;

fn print_usage() {
    eprintln!("Usage: gridkeys [OPTIONS] [SCENARIO]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCENARIO]                Scenario file to load (.toml)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <FILE>           Load settings from FILE instead of the user config");
    eprintln!("  --permission <LEVEL>      anonymous, viewer, editor or owner");
    eprintln!("  --replay                  Feed the scenario's keys and print each decision");
    eprintln!("  -h, --help                Print help");
}

struct Options {
    scenario: Option<PathBuf>,
    config_file: Option<PathBuf>,
    permission: Option<PermissionLevel>,
    replay: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut options = Options {
        scenario: None,
        config_file: None,
        permission: None,
        replay: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                options.config_file = Some(PathBuf::from(&args[i]));
            }
            "--permission" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --permission requires a value");
                    std::process::exit(1);
                }
                match args[i].parse::<PermissionLevel>() {
                    Ok(level) => options.permission = Some(level),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            "--replay" => options.replay = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if options.scenario.is_none() {
                    options.scenario = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    if options.replay && options.scenario.is_none() {
        eprintln!("Error: --replay requires a scenario file");
        print_usage();
        std::process::exit(1);
    }

    let (mut config, warnings) = config::load_config(options.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(level) = options.permission {
        config.permission = level;
    }

    let target = if options.replay {
        LogTarget::Stderr
    } else {
        LogTarget::File
    };
    let _guard = match logging::init(&config, target) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    if let Err(e) = run(&options, &config) {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: &Options, config: &Config) -> anyhow::Result<()> {
    let scenario = options
        .scenario
        .as_deref()
        .map(scenario::load_scenario)
        .transpose()?;

    let mut session = match &scenario {
        Some(scenario) => scenario.build_session(config)?,
        None => Session::from_config(config),
    };
    if let Some(level) = options.permission {
        session.permission = level;
    }
    tracing::info!(
        sheet = session.sheet_id(),
        permission = %session.permission,
        replay = options.replay,
        "session ready"
    );

    if options.replay {
        let scenario = scenario.context("--replay requires a scenario file")?;
        let keys = scenario.keys()?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        scenario::replay(&mut session, &keys, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    run_interactive(&mut session, config)
}

#[cfg(feature = "tui")]
fn run_interactive(session: &mut Session, config: &Config) -> anyhow::Result<()> {
    tui::run(session, config)
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_session: &mut Session, _config: &Config) -> anyhow::Result<()> {
    anyhow::bail!("built without the `tui` feature; use --replay")
}
