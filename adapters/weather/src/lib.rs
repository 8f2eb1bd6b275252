#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves current-conditions weather reports into garden themes.
//!
//! Reports follow the OpenWeather current-weather layout. Condition groups are
//! keyed by the numeric id; the `main` label is only consulted when the id is
//! outside every known group.

mod location;

pub use location::{Coordinates, LocationCell};

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use weather_garden_core::WeatherTheme;

/// Errors raised while reading weather reports.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The report file could not be read.
    #[error("failed to read weather report")]
    Io(#[from] io::Error),
    /// The report is not valid JSON or misses required fields.
    #[error("malformed weather report")]
    Malformed(#[from] serde_json::Error),
}

/// Single condition entry of a weather report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Numeric condition code.
    pub id: u32,
    /// Condition group label such as `Rain` or `Clouds`.
    #[serde(default)]
    pub main: String,
    /// Free-form description of the condition.
    #[serde(default)]
    pub description: String,
}

/// Current-conditions report for a location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Name of the reporting location.
    #[serde(default)]
    pub name: String,
    /// Conditions in order of relevance; the first one drives the theme.
    #[serde(default, rename = "weather")]
    pub conditions: Vec<Condition>,
    /// Location the report was issued for.
    #[serde(default, rename = "coord")]
    pub coordinates: Option<Coordinates>,
}

impl WeatherReport {
    /// Parses a report from its JSON representation.
    pub fn from_json(contents: &str) -> Result<Self, WeatherError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Reads and parses the report stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WeatherError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Theme matching the primary condition.
    ///
    /// Returns `None` when the report carries no condition the garden knows.
    #[must_use]
    pub fn theme(&self) -> Option<WeatherTheme> {
        let condition = self.conditions.first()?;
        let theme = theme_for_condition(condition.id).or_else(|| theme_for_label(&condition.main));
        if theme.is_none() {
            log::warn!(
                "weather condition {} ({}) has no matching theme",
                condition.id,
                condition.main
            );
        }
        theme
    }
}

/// Maps an OpenWeather condition id onto a theme.
#[must_use]
pub fn theme_for_condition(id: u32) -> Option<WeatherTheme> {
    match id {
        200..=399 | 500..=599 => Some(WeatherTheme::Rainy),
        600..=699 => Some(WeatherTheme::Snowy),
        800 => Some(WeatherTheme::Sunny),
        700..=799 | 801..=804 => Some(WeatherTheme::Cloudy),
        _ => None,
    }
}

/// Maps a condition group label onto a theme, ignoring case.
#[must_use]
pub fn theme_for_label(label: &str) -> Option<WeatherTheme> {
    match label.trim().to_ascii_lowercase().as_str() {
        "clear" => Some(WeatherTheme::Sunny),
        "clouds" => Some(WeatherTheme::Cloudy),
        "rain" | "drizzle" | "thunderstorm" => Some(WeatherTheme::Rainy),
        "snow" => Some(WeatherTheme::Snowy),
        _ => None,
    }
}
