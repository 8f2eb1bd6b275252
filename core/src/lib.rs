#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the weather garden.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.

use std::{error::Error, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Weather category that drives the visible scene and the eligible creature pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherTheme {
    /// Clear skies.
    Sunny,
    /// Overcast or partly clouded skies.
    Cloudy,
    /// Rain, drizzle, or thunderstorms.
    Rainy,
    /// Snowfall.
    Snowy,
}

impl WeatherTheme {
    /// Every theme in declaration order.
    pub const ALL: [WeatherTheme; 4] = [Self::Sunny, Self::Cloudy, Self::Rainy, Self::Snowy];

    /// Lowercase name used in manifests and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
        }
    }
}

impl fmt::Display for WeatherTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherTheme {
    type Err = ParseThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseThemeError(trimmed.to_owned()))
    }
}

/// Error returned when a string does not name a known [`WeatherTheme`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseThemeError(String);

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown weather theme '{}' (expected sunny, cloudy, rainy or snowy)",
            self.0
        )
    }
}

impl Error for ParseThemeError {}

/// Display group a creature belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Creatures anchored to the bottom edge of the scene.
    Ground,
    /// Creatures anchored to the top edge of the scene.
    Sky,
}

impl Layer {
    /// Lowercase name used in manifests and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Sky => "sky",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier assigned to a creature by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Catalog entry describing a creature that may appear in the scene.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creature {
    id: CreatureId,
    name: String,
    image: String,
    layer: Layer,
}

impl Creature {
    /// Creates a new creature description.
    #[must_use]
    pub fn new(id: CreatureId, name: impl Into<String>, image: impl Into<String>, layer: Layer) -> Self {
        Self {
            id,
            name: name.into(),
            image: image.into(),
            layer,
        }
    }

    /// Stable identifier of the creature.
    #[must_use]
    pub const fn id(&self) -> CreatureId {
        self.id
    }

    /// Human readable name of the creature.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image reference handed to rendering adapters.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Natural layer the creature lives in.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }
}

/// Horizontal band, in percent of the viewport width, that placements may use.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementZone {
    min_horizontal: f32,
    max_horizontal: f32,
}

impl PlacementZone {
    /// Creates a zone spanning `min_horizontal..=max_horizontal`.
    #[must_use]
    pub const fn new(min_horizontal: f32, max_horizontal: f32) -> Self {
        Self {
            min_horizontal,
            max_horizontal,
        }
    }

    /// Left edge of the zone.
    #[must_use]
    pub const fn min_horizontal(&self) -> f32 {
        self.min_horizontal
    }

    /// Right edge of the zone.
    #[must_use]
    pub const fn max_horizontal(&self) -> f32 {
        self.max_horizontal
    }

    /// Span left for the left edge of a creature once its footprint is subtracted.
    ///
    /// May be zero or negative when the zone is narrower than the footprint.
    #[must_use]
    pub fn usable_span(&self, creature_width: f32) -> f32 {
        self.max_horizontal - self.min_horizontal - creature_width
    }
}

/// Computed on-screen placement of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Left edge of the creature in percent of the viewport width.
    pub horizontal_percent: f32,
    /// Offset from the layer's anchor edge in percent of the viewport height.
    pub vertical_percent: f32,
    /// Uniform scale multiplier applied when drawing.
    pub scale_factor: f32,
}

/// Half-open horizontal interval `[left, left + width)` used for overlap tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    left: f32,
    width: f32,
}

impl Footprint {
    /// Creates a footprint starting at `left` with the provided width.
    #[must_use]
    pub const fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Left edge of the footprint.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Exclusive right edge of the footprint.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Reports whether the two intervals intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.left < other.right() && self.right() > other.left
    }
}

/// Creature paired with the position computed for it by a placement call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedCreature {
    creature: Creature,
    layer: Layer,
    position: Position,
}

impl PlacedCreature {
    /// Creates a new placement record.
    #[must_use]
    pub fn new(creature: Creature, layer: Layer, position: Position) -> Self {
        Self {
            creature,
            layer,
            position,
        }
    }

    /// Identifier of the placed creature.
    #[must_use]
    pub const fn id(&self) -> CreatureId {
        self.creature.id()
    }

    /// Catalog entry of the placed creature.
    #[must_use]
    pub const fn creature(&self) -> &Creature {
        &self.creature
    }

    /// Layer the creature was placed into.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// Computed position of the creature.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Horizontal footprint of the creature for the provided width.
    #[must_use]
    pub const fn footprint(&self, creature_width: f32) -> Footprint {
        Footprint::new(self.position.horizontal_percent, creature_width)
    }
}

/// Identifier assigned to a queued respawn by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RespawnId(u32);

impl RespawnId {
    /// Creates a new respawn identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Queued intent to reintroduce a creature into a layer once it falls due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RespawnRecord {
    /// Identifier allocated by the world.
    pub id: RespawnId,
    /// Creature whose capture produced the record, when known.
    pub creature: Option<CreatureId>,
    /// Session time at which the record becomes eligible.
    pub due_at: Duration,
    /// Layer the replacement creature is drawn into.
    pub layer: Layer,
}

impl RespawnRecord {
    /// Reports whether the record may be consumed at session time `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.due_at <= now
    }
}

/// Reasons a respawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RespawnError {
    /// No queued record with the provided identifier exists.
    MissingRecord,
    /// The creature is already present in one of the visible sets.
    AlreadyVisible,
    /// The placement targets a different layer than the record.
    LayerMismatch,
}

/// Read-only snapshot of both visible sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleView {
    ground: Vec<PlacedCreature>,
    sky: Vec<PlacedCreature>,
}

impl VisibleView {
    /// Creates a new view from the ground and sky sets in display order.
    #[must_use]
    pub fn new(ground: Vec<PlacedCreature>, sky: Vec<PlacedCreature>) -> Self {
        Self { ground, sky }
    }

    /// Creatures in the provided layer, in display order.
    #[must_use]
    pub fn layer(&self, layer: Layer) -> &[PlacedCreature] {
        match layer {
            Layer::Ground => &self.ground,
            Layer::Sky => &self.sky,
        }
    }

    /// Iterator over every visible creature, ground layer first.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedCreature> {
        self.ground.iter().chain(self.sky.iter())
    }

    /// Total number of visible creatures across both layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ground.len() + self.sky.len()
    }

    /// Reports whether no creature is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whether a creature with the provided identifier is visible in either layer.
    #[must_use]
    pub fn contains(&self, creature: CreatureId) -> bool {
        self.iter().any(|placed| placed.id() == creature)
    }
}

/// Source of the creatures eligible for each theme and layer.
pub trait CreaturePools {
    /// Creatures eligible under `theme` in `layer`.
    ///
    /// Returns `None` when the theme is unknown to the source, which callers
    /// treat as "skip placement" rather than as an empty pool.
    fn creatures(&self, theme: WeatherTheme, layer: Layer) -> Option<&[Creature]>;
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Updates the delay between a capture and the respawn it schedules.
    ConfigureRespawn {
        /// Session time added to the capture time to compute the due time.
        delay: Duration,
    },
    /// Activates a weather theme and discards every pending respawn.
    ApplyTheme {
        /// Theme reported by the weather collaborator.
        theme: WeatherTheme,
    },
    /// Replaces both visible sets wholesale.
    PopulateScene {
        /// New ground set in display order.
        ground: Vec<PlacedCreature>,
        /// New sky set in display order.
        sky: Vec<PlacedCreature>,
    },
    /// Removes a creature selected by the player and schedules its respawn.
    CaptureCreature {
        /// Identifier of the captured creature.
        creature: CreatureId,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of session time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Consumes a queued respawn by adding the placement to its layer.
    RespawnCreature {
        /// Record being consumed.
        record: RespawnId,
        /// Creature and position to introduce.
        placed: PlacedCreature,
    },
    /// Removes a queued respawn that has no eligible creature left.
    DropRespawn {
        /// Record being discarded.
        record: RespawnId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of session time that elapsed in the tick.
        dt: Duration,
        /// Session time after applying the tick.
        now: Duration,
    },
    /// Announces that a new theme became active.
    ThemeApplied {
        /// Theme that became active.
        theme: WeatherTheme,
        /// Number of pending respawns that were discarded.
        discarded_respawns: usize,
    },
    /// Confirms that both visible sets were replaced.
    ScenePopulated {
        /// Creatures now visible on the ground layer.
        ground: Vec<CreatureId>,
        /// Creatures now visible on the sky layer.
        sky: Vec<CreatureId>,
    },
    /// Confirms that a creature was captured and removed from its layer.
    CreatureCaptured {
        /// Identifier of the captured creature.
        creature: CreatureId,
        /// Layer the creature was removed from.
        layer: Layer,
    },
    /// Confirms that a respawn record joined the queue.
    RespawnScheduled {
        /// Record appended to the queue.
        record: RespawnRecord,
    },
    /// Confirms that a queued respawn reintroduced a creature.
    CreatureRespawned {
        /// Record that was consumed.
        record: RespawnId,
        /// Identifier of the reintroduced creature.
        creature: CreatureId,
        /// Layer the creature joined.
        layer: Layer,
    },
    /// Confirms that a queued respawn was discarded without a placement.
    RespawnDropped {
        /// Record that was discarded.
        record: RespawnId,
    },
    /// Reports that a respawn request was rejected.
    RespawnRejected {
        /// Record named by the request.
        record: RespawnId,
        /// Specific reason the respawn failed.
        reason: RespawnError,
    },
}
