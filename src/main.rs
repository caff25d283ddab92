//! # Strata - Window Registry Demo Driver
//!
//! Development CLI for exercising the strata library: loads configuration,
//! wires a registry to a file-backed layout store, and optionally runs a
//! short scripted session covering registration, snap zones, grouping, and
//! layout save/load.

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;

use strata::config::expand_path;
use strata::{
    FileLayoutStore, StrataConfig, WindowDescriptor, WindowRegistry,
};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Window registry with stacking, snap zones, and persisted layouts")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/strata/strata.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Override the layout store directory
    #[arg(long)]
    layout_dir: Option<String>,

    /// Run a scripted demo session against the registry
    #[arg(long)]
    demo: bool,

    /// List persisted layouts and exit
    #[arg(long)]
    list_layouts: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    info!("Starting Strata window registry v{}", strata::VERSION);

    // Load configuration
    let config = match StrataConfig::load(&cli.config) {
        Ok(config) => {
            info!("Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            info!("Using default configuration");
            StrataConfig::default()
        }
    };

    let layout_dir = expand_path(
        cli.layout_dir
            .as_deref()
            .unwrap_or(&config.layout.directory),
    )?;
    info!("Layout store: {}", layout_dir.display());

    let store = Arc::new(FileLayoutStore::new(&layout_dir));
    let mut registry = WindowRegistry::with_store(&config, store);

    if cli.list_layouts {
        let layouts = registry.saved_layouts().await?;
        if layouts.is_empty() {
            info!("No saved layouts");
        }
        for name in layouts {
            println!("{}", name);
        }
        return Ok(());
    }

    if cli.demo {
        run_demo(&mut registry).await?;
        return Ok(());
    }

    info!("Nothing to do; try --demo or --list-layouts");
    Ok(())
}

/// Scripted session touching every major registry operation
async fn run_demo(registry: &mut WindowRegistry) -> Result<()> {
    info!("Running registry demo session...");

    let chart = registry.register_window(
        WindowDescriptor::new("chart")
            .with_id("chart")
            .with_title("Price Chart"),
    )?;
    let ticker = registry.register_window(
        WindowDescriptor::new("ticker")
            .with_id("ticker")
            .with_title("Ticker Tape"),
    )?;
    let news = registry.register_window(
        WindowDescriptor::new("news")
            .with_id("news")
            .with_title("News Feed"),
    )?;
    info!(
        "Registered {} windows, stack: {:?}",
        registry.window_count(),
        registry.stack_order()
    );

    registry.snap_to_zone(&chart.id, "left-half")?;
    registry.snap_to_zone(&ticker.id, "top-right-quarter")?;
    registry.snap_to_zone(&news.id, "bottom-right-quarter")?;
    info!("Snapped windows into a two-column arrangement");

    registry.create_group("market", &[ticker.id.clone(), news.id.clone()]);
    registry.bring_group_to_front("market");
    info!("Grouped ticker/news and raised the group");

    registry.save_layout("demo").await?;
    info!("Saved layout \"demo\"");

    registry.maximize_window(&chart.id)?;
    registry.minimize_window(&news.id)?;
    info!("Mutated live state (chart maximized, news minimized)");

    let restored = registry.load_layout("demo").await?;
    info!(
        "Reloaded layout \"demo\" (found: {}), stack: {:?}",
        restored,
        registry.stack_order()
    );

    for window in registry.get_all_windows() {
        info!(
            "  {} [{}] {:?} at ({}, {}) {}x{}",
            window.id,
            window.title,
            window.state,
            window.position.x,
            window.position.y,
            window.size.width,
            window.size.height
        );
    }

    info!("Demo session complete");
    Ok(())
}
