mod app;
mod config;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use lifekernel::storage;
use lifekernel::TickDriver;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lifekernel")]
#[command(about = "Life-family automaton stages in the terminal", long_about = None)]
struct Args {
    /// Campaign or single-stage JSON file (built-in demo if omitted)
    #[arg(long)]
    stages: Option<PathBuf>,

    /// Campaign stage to start on
    #[arg(long, default_value_t = 0)]
    stage: usize,

    /// Override the stage rule: name (conway, highlife, maze, day_and_night, seeds) or B/S string
    #[arg(long)]
    rule: Option<String>,

    /// Seed for cluster placement
    #[arg(long)]
    seed: Option<u64>,

    /// Initial ms between ticks
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Run without a terminal UI and print the final grid
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Write the effective settings back to the settings file
    #[arg(long, default_value_t = false)]
    save_settings: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.headless { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = config::project_paths()?;
    let mut settings = config::load_settings(&paths.settings_path);
    if let Some(seed) = args.seed {
        settings.engine.seed = seed;
    }
    if let Some(ms) = args.interval_ms {
        settings.engine.tick_interval_ms = ms;
    }
    if let Some(path) = &args.stages {
        settings.stages_path = Some(path.clone());
    }

    let campaign = match &settings.stages_path {
        Some(path) => storage::load_campaign(path)
            .with_context(|| format!("loading stages from {}", path.display()))?,
        None => storage::demo_campaign().context("parsing built-in demo campaign")?,
    };

    let mut driver = TickDriver::new(settings.engine.clone()).context("creating grid")?;
    driver.set_stages(campaign.stages);
    driver
        .select_stage(args.stage)
        .with_context(|| format!("loading stage {}", args.stage))?;
    if let Some(rule) = &args.rule {
        driver.set_variant_named(rule)?;
    }

    if args.save_settings {
        config::save_settings_atomic(&paths.settings_path, &settings)?;
    }

    if args.headless {
        return app::run_headless(&mut driver, args.ticks);
    }
    let mut app = app::App::new(settings, driver)?;
    app.run()
}
