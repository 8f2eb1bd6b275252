use serde::{Deserialize, Serialize};

/// Latitude and longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Holder of the most recently known location.
///
/// Only the owner updates the cell; readers receive copies.
#[derive(Clone, Debug, Default)]
pub struct LocationCell {
    current: Option<Coordinates>,
}

impl LocationCell {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored location and returns the previous one.
    pub fn update(&mut self, coordinates: Coordinates) -> Option<Coordinates> {
        log::debug!(
            "location updated to ({:.4}, {:.4})",
            coordinates.lat,
            coordinates.lon
        );
        self.current.replace(coordinates)
    }

    /// Copy of the stored location.
    #[must_use]
    pub fn snapshot(&self) -> Option<Coordinates> {
        self.current
    }
}
