#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement engine that scatters creatures across a zone without overlapping footprints.
//!
//! Overlap avoidance is rejection sampling with a bounded number of attempts per
//! creature. When every attempt collides the last candidate is kept, so a call
//! always terminates and always places every selected creature. Non-overlap is
//! therefore best-effort and only holds when the search succeeds.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use weather_garden_core::{Creature, Footprint, Layer, PlacedCreature, PlacementZone, Position};

/// Footprint width, in percent of the viewport, assumed for every creature.
pub const DEFAULT_CREATURE_WIDTH: f32 = 15.0;
/// Candidate positions generated per creature before accepting a collision.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

const DEFAULT_SCALE_MIN: f32 = 0.8;
const DEFAULT_SCALE_MAX: f32 = 1.3;
const DEFAULT_GROUND_OFFSET_MAX: f32 = 15.0;
const DEFAULT_SKY_OFFSET_MAX: f32 = 85.0;

/// Tuning knobs for the placement engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    creature_width: f32,
    max_attempts: u32,
    scale_min: f32,
    scale_max: f32,
    ground_offset_max: f32,
    sky_offset_max: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            creature_width: DEFAULT_CREATURE_WIDTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            scale_min: DEFAULT_SCALE_MIN,
            scale_max: DEFAULT_SCALE_MAX,
            ground_offset_max: DEFAULT_GROUND_OFFSET_MAX,
            sky_offset_max: DEFAULT_SKY_OFFSET_MAX,
        }
    }
}

impl Config {
    /// Creates a configuration with the provided footprint and retry budget.
    ///
    /// Cosmetic ranges start at their defaults.
    #[must_use]
    pub fn new(creature_width: f32, max_attempts: u32) -> Self {
        Self {
            creature_width,
            max_attempts,
            ..Self::default()
        }
    }

    /// Overrides the range the random scale multiplier is drawn from.
    #[must_use]
    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.scale_min = min;
        self.scale_max = max;
        self
    }

    /// Overrides the largest anchor offsets for ground and sky creatures.
    #[must_use]
    pub fn with_vertical_limits(mut self, ground_offset_max: f32, sky_offset_max: f32) -> Self {
        self.ground_offset_max = ground_offset_max;
        self.sky_offset_max = sky_offset_max;
        self
    }

    /// Footprint width assumed for every creature.
    #[must_use]
    pub const fn creature_width(&self) -> f32 {
        self.creature_width
    }

    /// Candidate positions generated per creature.
    ///
    /// A configured value of zero still generates one candidate.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Lower and upper bound of the scale multiplier.
    #[must_use]
    pub const fn scale_range(&self) -> (f32, f32) {
        (self.scale_min, self.scale_max)
    }

    /// Largest anchor offset drawn for creatures in the provided layer.
    #[must_use]
    pub const fn vertical_limit(&self, layer: Layer) -> f32 {
        match layer {
            Layer::Ground => self.ground_offset_max,
            Layer::Sky => self.sky_offset_max,
        }
    }
}

/// Places up to `count` distinct creatures drawn from `pool`.
///
/// Returns `min(count, pool.len())` placements in selection order. Footprints of
/// creatures placed by the same call avoid each other whenever the bounded
/// search finds a free slot. Positions lie in
/// `[zone.min_horizontal, zone.max_horizontal - creature_width]`, collapsing to
/// `zone.min_horizontal` when that span is not positive.
pub fn place<R>(
    pool: &[Creature],
    count: usize,
    zone: PlacementZone,
    layer: Layer,
    config: &Config,
    rng: &mut R,
) -> Vec<PlacedCreature>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() || count == 0 {
        return Vec::new();
    }

    let selected: Vec<&Creature> = pool.choose_multiple(rng, count).collect();
    let mut placed = Vec::with_capacity(selected.len());

    for creature in selected {
        let left = resolve_left(zone, &placed, config, rng);
        placed.push(PlacedCreature::new(
            creature.clone(),
            layer,
            finish_position(left, layer, config, rng),
        ));
    }

    placed
}

/// Places a single creature, ignoring every other creature.
///
/// Callers that need to avoid an existing scene retry this themselves.
pub fn place_single<R>(
    creature: &Creature,
    zone: PlacementZone,
    layer: Layer,
    config: &Config,
    rng: &mut R,
) -> PlacedCreature
where
    R: Rng + ?Sized,
{
    let left = candidate_left(zone, config, rng);
    PlacedCreature::new(
        creature.clone(),
        layer,
        finish_position(left, layer, config, rng),
    )
}

fn resolve_left<R>(
    zone: PlacementZone,
    placed: &[PlacedCreature],
    config: &Config,
    rng: &mut R,
) -> f32
where
    R: Rng + ?Sized,
{
    let width = config.creature_width();
    let mut left = zone.min_horizontal();
    for _ in 0..config.max_attempts() {
        left = candidate_left(zone, config, rng);
        let footprint = Footprint::new(left, width);
        if !placed
            .iter()
            .any(|other| other.footprint(width).overlaps(&footprint))
        {
            break;
        }
    }
    left
}

fn candidate_left<R>(zone: PlacementZone, config: &Config, rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    let span = zone.usable_span(config.creature_width());
    if span > 0.0 {
        zone.min_horizontal() + rng.gen_range(0.0..span)
    } else {
        zone.min_horizontal()
    }
}

fn finish_position<R>(left: f32, layer: Layer, config: &Config, rng: &mut R) -> Position
where
    R: Rng + ?Sized,
{
    let (scale_min, scale_max) = config.scale_range();
    Position {
        horizontal_percent: left,
        vertical_percent: sample(rng, 0.0, config.vertical_limit(layer)),
        scale_factor: sample(rng, scale_min, scale_max),
    }
}

fn sample<R>(rng: &mut R, min: f32, max: f32) -> f32
where
    R: Rng + ?Sized,
{
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
