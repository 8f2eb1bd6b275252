use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use weather_garden_system_lifecycle::Config as LifecycleConfig;

const DEFAULT_RESPAWN_DELAY_MS: u64 = 10_000;
const DEFAULT_HEARTBEAT_MS: u64 = 1_000;

/// Session tuning loaded from an optional TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Delay, in milliseconds, between a capture and the matching respawn becoming due.
    pub(crate) respawn_delay_ms: u64,
    /// Period, in milliseconds, between heartbeat ticks.
    pub(crate) heartbeat_ms: u64,
    /// Lifecycle and placement knobs.
    pub(crate) lifecycle: LifecycleConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            respawn_delay_ms: DEFAULT_RESPAWN_DELAY_MS,
            heartbeat_ms: DEFAULT_HEARTBEAT_MS,
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid settings file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        if settings.heartbeat_ms == 0 {
            bail!("heartbeat_ms must be positive");
        }
        if settings.lifecycle.proximity < 0.0 {
            bail!(
                "lifecycle.proximity must not be negative (received {})",
                settings.lifecycle.proximity
            );
        }
        let zone = settings.lifecycle.zone;
        if zone.max_horizontal() < zone.min_horizontal() {
            bail!(
                "lifecycle.zone ends at {} before it starts at {}",
                zone.max_horizontal(),
                zone.min_horizontal()
            );
        }
        Ok(settings)
    }

    pub(crate) fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.respawn_delay_ms)
    }

    pub(crate) fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }
}
