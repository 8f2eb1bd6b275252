#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a weather garden session in the terminal.

mod heartbeat;
mod session;
mod settings;
mod text_backend;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use weather_garden_catalog::Catalog;
use weather_garden_core::WeatherTheme;
use weather_garden_rendering::RenderingBackend;
use weather_garden_system_collection::{CollectionStore, JsonFileStore, MemoryStore};
use weather_garden_weather::{LocationCell, WeatherReport};

use crate::{heartbeat::Heartbeat, session::Session, settings::Settings, text_backend::TextBackend};

#[derive(Parser, Debug)]
#[command(name = "weather-garden")]
#[command(about = "Weather-driven creature garden rendered in the terminal")]
struct Args {
    /// Theme to apply at startup.
    #[arg(long, conflicts_with = "weather_report")]
    theme: Option<WeatherTheme>,

    /// Current-conditions JSON report used to pick the theme.
    #[arg(long)]
    weather_report: Option<PathBuf>,

    /// Catalog manifest; the built-in catalog is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Settings file with lifecycle and placement tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file that persists collected creatures.
    #[arg(long)]
    collection: Option<PathBuf>,

    /// Name of the user captures are recorded for.
    #[arg(long, default_value = "guest")]
    user: String,

    /// Seed overriding the configured random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of heartbeat ticks to run.
    #[arg(long, default_value_t = 30)]
    ticks: u32,

    /// Capture the leftmost creature every N ticks; zero disables captures.
    #[arg(long, default_value_t = 5)]
    capture_every: u32,

    /// Sleep for each heartbeat period instead of simulating time.
    #[arg(long)]
    realtime: bool,
}

/// Entry point for the weather garden command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        settings.lifecycle.rng_seed = seed;
    }

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_manifest_path(path)?,
        None => Catalog::builtin(),
    };

    let mut location = LocationCell::new();
    let theme = resolve_theme(&args, &mut location)?;
    if let Some(coordinates) = location.snapshot() {
        log::info!(
            "garden located at ({:.2}, {:.2})",
            coordinates.lat,
            coordinates.lon
        );
    }

    let mut store: Box<dyn CollectionStore> = match &args.collection {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .with_context(|| format!("failed to open collection {}", path.display()))?;
            log::info!("collection stored in {}", store.path().display());
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    };
    let user = match store.user_named(&args.user) {
        Some(record) => record,
        None => store
            .create_user(&args.user)
            .with_context(|| format!("failed to create user '{}'", args.user))?,
    };
    log::info!(
        "recording captures for {} ({} already collected)",
        user.name,
        user.collected.len()
    );

    let heartbeat = if args.realtime {
        Heartbeat::realtime(settings.heartbeat())
    } else {
        Heartbeat::simulated(settings.heartbeat())
    };
    let mut session = Session::new(&settings, catalog, store, user.id, heartbeat);
    let mut backend = TextBackend::new(io::stdout().lock());

    if let Some(theme) = theme {
        session.apply_theme(theme);
    }
    present(&mut session, &mut backend)?;

    for tick in 1..=args.ticks {
        if !session.advance() {
            break;
        }
        if args.capture_every > 0 && tick % args.capture_every == 0 {
            if let Some(creature) = session.capture_leftmost() {
                log::info!("captured {creature} on tick {tick}");
            }
        }
        present(&mut session, &mut backend)?;
    }

    let collected = session.shutdown();
    println!("collected: {}", collected.join(", "));
    Ok(())
}

fn resolve_theme(args: &Args, location: &mut LocationCell) -> Result<Option<WeatherTheme>> {
    let Some(path) = &args.weather_report else {
        return Ok(Some(args.theme.unwrap_or(WeatherTheme::Sunny)));
    };

    let report = WeatherReport::from_path(path)
        .with_context(|| format!("failed to load weather report {}", path.display()))?;
    if let Some(coordinates) = report.coordinates {
        let _ = location.update(coordinates);
    }
    let theme = report.theme();
    if theme.is_none() {
        log::warn!("weather report for '{}' maps to no theme", report.name);
    }
    Ok(theme)
}

fn present(session: &mut Session, backend: &mut impl RenderingBackend) -> Result<()> {
    match session.take_frame() {
        Some(scene) => backend.present(&scene),
        None => Ok(()),
    }
}
