#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lifecycle system that lays out the scene on theme changes and drives respawns.
//!
//! The system never mutates the world. It reacts to `ThemeApplied` by placing
//! fresh ground and sky sets, and to `TimeAdvanced` by evaluating the respawn
//! queue once per tick period against the live snapshot handed in by the caller.

use std::time::Duration;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use weather_garden_core::{
    Command, Creature, CreaturePools, Event, Layer, PlacedCreature, PlacementZone, RespawnRecord,
    VisibleView, WeatherTheme,
};
use weather_garden_system_placement::{self as placement, place, place_single};

/// Creatures placed on the ground layer when a theme is applied.
pub const DEFAULT_GROUND_COUNT: usize = 2;
/// Creatures placed on the sky layer when a theme is applied.
pub const DEFAULT_SKY_COUNT: usize = 1;
/// Largest number of creatures visible across both layers before respawns pause.
pub const DEFAULT_MAX_VISIBLE: usize = 3;
/// Smallest horizontal distance a respawned creature keeps from visible ones.
pub const DEFAULT_PROXIMITY: f32 = 15.0;
/// Horizontal band used for every placement.
pub const DEFAULT_ZONE: PlacementZone = PlacementZone::new(15.0, 85.0);

const DEFAULT_TICK_PERIOD_MS: u64 = 1_000;
const DEFAULT_RNG_SEED: u64 = 0x5eed_0f_9a4d_e11;

/// Tuning knobs for the lifecycle system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Period, in milliseconds, between respawn evaluations.
    pub tick_period_ms: u64,
    /// Creatures placed on the ground layer when a theme is applied.
    pub ground_count: usize,
    /// Creatures placed on the sky layer when a theme is applied.
    pub sky_count: usize,
    /// Horizontal band handed to the placement engine.
    pub zone: PlacementZone,
    /// Visible creature cap; respawns wait while the scene is full.
    pub max_visible: usize,
    /// Smallest horizontal distance between a respawn and any visible creature.
    pub proximity: f32,
    /// Seed for the system's random source.
    pub rng_seed: u64,
    /// Settings forwarded to the placement engine.
    pub placement: placement::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            ground_count: DEFAULT_GROUND_COUNT,
            sky_count: DEFAULT_SKY_COUNT,
            zone: DEFAULT_ZONE,
            max_visible: DEFAULT_MAX_VISIBLE,
            proximity: DEFAULT_PROXIMITY,
            rng_seed: DEFAULT_RNG_SEED,
            placement: placement::Config::default(),
        }
    }
}

impl Config {
    /// Creates the default configuration seeded with `rng_seed`.
    #[must_use]
    pub fn seeded(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            ..Self::default()
        }
    }

    /// Period between respawn evaluations.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Live snapshot of the world state the lifecycle decisions are made against.
#[derive(Clone, Copy, Debug)]
pub struct GardenView<'a> {
    /// Theme currently applied, if any.
    pub theme: Option<WeatherTheme>,
    /// Both visible sets.
    pub visible: &'a VisibleView,
    /// Pending respawns in queue order.
    pub queue: &'a [RespawnRecord],
    /// Current session time.
    pub now: Duration,
}

/// System that emits layout and respawn commands.
#[derive(Debug)]
pub struct Lifecycle {
    config: Config,
    rng: ChaCha8Rng,
    accumulator: Duration,
}

impl Lifecycle {
    /// Creates a new lifecycle system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            accumulator: Duration::ZERO,
        }
    }

    /// Configuration the system was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes world events and the current snapshot to emit commands.
    ///
    /// `pools` resolves the creatures eligible for a theme and layer. A theme
    /// unknown to `pools` skips placement entirely.
    pub fn handle<P>(&mut self, events: &[Event], view: GardenView<'_>, pools: &P, out: &mut Vec<Command>)
    where
        P: CreaturePools + ?Sized,
    {
        let mut populated = false;
        let mut elapsed = Duration::ZERO;

        for event in events {
            match event {
                Event::ThemeApplied { theme, .. } => {
                    populated |= self.populate(*theme, pools, out);
                }
                Event::TimeAdvanced { dt, .. } => {
                    elapsed = elapsed.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if elapsed.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        if !self.resolve_due_tick() || populated {
            return;
        }

        self.evaluate_respawns(view, pools, out);
    }

    fn populate<P>(&mut self, theme: WeatherTheme, pools: &P, out: &mut Vec<Command>) -> bool
    where
        P: CreaturePools + ?Sized,
    {
        let (Some(ground_pool), Some(sky_pool)) = (
            pools.creatures(theme, Layer::Ground),
            pools.creatures(theme, Layer::Sky),
        ) else {
            log::warn!("no creature pools registered for theme {theme}; keeping current scene");
            return false;
        };

        let ground = self.place_layer(ground_pool, self.config.ground_count, Layer::Ground);
        let sky = self.place_layer(sky_pool, self.config.sky_count, Layer::Sky);
        log::info!(
            "laying out {theme} scene with {} ground and {} sky creatures",
            ground.len(),
            sky.len()
        );
        out.push(Command::PopulateScene { ground, sky });
        true
    }

    fn place_layer(&mut self, pool: &[Creature], count: usize, layer: Layer) -> Vec<PlacedCreature> {
        place(
            pool,
            count,
            self.config.zone,
            layer,
            &self.config.placement,
            &mut self.rng,
        )
    }

    fn resolve_due_tick(&mut self) -> bool {
        let period = self.config.tick_period();
        if period.is_zero() {
            self.accumulator = Duration::ZERO;
            return true;
        }

        let mut due = false;
        while self.accumulator >= period {
            self.accumulator -= period;
            due = true;
        }
        due
    }

    fn evaluate_respawns<P>(&mut self, view: GardenView<'_>, pools: &P, out: &mut Vec<Command>)
    where
        P: CreaturePools + ?Sized,
    {
        if view.visible.len() >= self.config.max_visible || view.queue.is_empty() {
            return;
        }

        let Some(record) = view.queue.iter().find(|record| record.is_due(view.now)) else {
            return;
        };

        let eligible: Vec<&Creature> = view
            .theme
            .and_then(|theme| pools.creatures(theme, record.layer))
            .unwrap_or_default()
            .iter()
            .filter(|creature| !view.visible.contains(creature.id()))
            .collect();

        let Some(creature) = eligible.choose(&mut self.rng).copied() else {
            log::debug!(
                "no eligible {} creature for respawn {}; dropping record",
                record.layer,
                record.id.get()
            );
            out.push(Command::DropRespawn { record: record.id });
            return;
        };

        match self.find_clear_position(creature, record.layer, view.visible) {
            Some(placed) => {
                log::debug!(
                    "respawning {} ({}) on {} layer",
                    creature.name(),
                    creature.id(),
                    record.layer
                );
                out.push(Command::RespawnCreature {
                    record: record.id,
                    placed,
                });
            }
            None => log::debug!(
                "respawn {} found no clear slot for {}; retrying next tick",
                record.id.get(),
                creature.id()
            ),
        }
    }

    fn find_clear_position(
        &mut self,
        creature: &Creature,
        layer: Layer,
        visible: &VisibleView,
    ) -> Option<PlacedCreature> {
        for _ in 0..self.config.placement.max_attempts() {
            let candidate = place_single(
                creature,
                self.config.zone,
                layer,
                &self.config.placement,
                &mut self.rng,
            );
            let left = candidate.position().horizontal_percent;
            let clear = visible.iter().all(|other| {
                (other.position().horizontal_percent - left).abs() >= self.config.proximity
            });
            if clear {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_period_does_not_trigger_evaluation() {
        let mut lifecycle = Lifecycle::new(Config::default());
        lifecycle.accumulator = Duration::from_millis(999);
        assert!(!lifecycle.resolve_due_tick());
        lifecycle.accumulator = Duration::from_millis(2_500);
        assert!(lifecycle.resolve_due_tick());
        assert_eq!(lifecycle.accumulator, Duration::from_millis(500));
    }

    #[test]
    fn zero_period_evaluates_every_advance() {
        let mut lifecycle = Lifecycle::new(Config {
            tick_period_ms: 0,
            ..Config::default()
        });
        lifecycle.accumulator = Duration::from_millis(1);
        assert!(lifecycle.resolve_due_tick());
        assert!(lifecycle.accumulator.is_zero());
    }
}
