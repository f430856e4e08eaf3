mod cli;
mod config;
mod domain;
mod engine;
mod error;
mod recipe;
mod resolver;
mod staleness;
mod wildcard;

use anyhow::{Context, Result};
use clap::ArgMatches;
use cli::{arg, get_app};
use config::Config;
use engine::Engine;
use log::LevelFilter;
use std::io::Write;
use std::path::Path;
use std::process;

fn main() {
    let arg_matches = get_app().get_matches();
    init_logger(arg_matches.occurrences_of(arg::VERBOSITY));

    if let Err(e) = run(&arg_matches) {
        log::error!("{:#}", e);
        log::error!("*** terminating");
        process::exit(1);
    }
}

fn run(arg_matches: &ArgMatches) -> Result<()> {
    let project_dir = Path::new(arg_matches.value_of(arg::PROJECT_DIR).unwrap_or("."));
    std::env::set_current_dir(project_dir).with_context(|| {
        format!(
            "Failed to enter project directory {}",
            project_dir.display()
        )
    })?;

    let config_file = Path::new(arg_matches.value_of(arg::FILE).unwrap_or("cape.yml"));
    let config = Config::load(config_file)?;
    log::debug!("Declared targets: {}", config.list_target_names().join(", "));

    let registry = config.into_registry()?;
    if registry.is_empty() {
        log::warn!("No target declared in {}", config_file.display());
    }

    let mut engine = Engine::new(registry);
    match arg_matches.values_of_lossy(arg::TARGETS) {
        Some(requested_targets) => engine.build_requested(&requested_targets)?,
        None => engine.build_all()?,
    }

    Ok(())
}

fn init_logger(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_module(module_path!(), level)
        .format(|buf, record| writeln!(buf, "cape: {}", record.args()))
        .init();
}
