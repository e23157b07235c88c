use anyhow::{Context, Result};
use clap::Parser;
use skywatch::TrackerConfig;
use skywatch::tle::{CatalogLoader, CelestrakFetcher};
use skywatch::tracking::{TrackingScheduler, TrackingSnapshot, filter_positions, first_match};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skywatch", version, about = "Live satellite tracker")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip CelesTrak and use the embedded snapshot
    #[arg(long)]
    offline: bool,

    /// Override the CelesTrak GP endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Track the first object whose name contains this text
    #[arg(short, long)]
    select: Option<String>,

    /// Only print objects whose name contains this text
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Stop after this many ticks (runs until Ctrl-C otherwise)
    #[arg(short = 'n', long)]
    ticks: Option<u64>,

    /// Print each snapshot as one JSON line
    #[arg(long)]
    json: bool,
}

fn print_snapshot(snapshot: &TrackingSnapshot, search: Option<&str>, json: bool) -> Result<()> {
    let positions = filter_positions(&snapshot.positions, search.unwrap_or(""));
    if json {
        let mut line = serde_json::to_value(snapshot)?;
        line["positions"] = serde_json::to_value(&positions)?;
        println!("{line}");
        return Ok(());
    }

    println!(
        "tick {} [{:?}] {} objects shown / {} tracked",
        snapshot.tick,
        snapshot.status,
        positions.len(),
        snapshot.positions.len()
    );
    if search.is_some() {
        for p in &positions {
            println!(
                "  {:<28} {:>8.3} {:>9.3} {:>8.1} km {:>6.3} km/s",
                p.name, p.latitude, p.longitude, p.altitude, p.speed
            );
        }
    }
    if let Some(telemetry) = &snapshot.telemetry {
        let p = &telemetry.position;
        println!(
            "  > {} lat {:.3} lon {:.3} alt {:.1} km speed {:.3} km/s{}",
            p.name,
            p.latitude,
            p.longitude,
            p.altitude,
            p.speed,
            if telemetry.stale { " (stale)" } else { "" }
        );
    }
    if let Some(path) = &snapshot.orbit_path {
        println!(
            "  > orbit ring {} points, period {:.1} min",
            path.points.len(),
            path.period_minutes
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default(),
    };
    if cli.offline {
        config.catalog.offline = true;
    }
    if let Some(url) = &cli.base_url {
        config.catalog.base_url = url.clone();
    }

    let fetcher = CelestrakFetcher::new(
        config.catalog.base_url.clone(),
        config.catalog.request_timeout(),
    )?;
    let catalog = CatalogLoader::new(fetcher, config.catalog.clone())
        .load()
        .await;

    let mut scheduler = TrackingScheduler::new(config.scheduler.clone());
    scheduler.install_catalog(Arc::new(catalog))?;
    let handle = scheduler.start()?;
    let mut snapshots = handle.subscribe();
    let mut pending_selection = cli.select.clone();

    let mut printed = 0u64;
    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                changed.context("tracker stopped publishing")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
        let snapshot = snapshots.borrow_and_update().clone();

        if let Some(query) = pending_selection.take() {
            let selection = handle.selection();
            match first_match(&snapshot.positions, &query) {
                Some(p) => selection.select(p.name.clone()),
                None => warn!("no tracked object matches {:?}", query),
            }
            if let Some(name) = selection.current() {
                info!("tracking {}", name);
            }
        }

        print_snapshot(&snapshot, cli.search.as_deref(), cli.json)?;
        printed += 1;
        if cli.ticks.is_some_and(|n| printed >= n) {
            break;
        }
    }

    handle.stop().await?;
    Ok(())
}
