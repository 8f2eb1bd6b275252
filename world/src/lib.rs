#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative garden state: active theme, visible sets, and the respawn queue.
//!
//! The world is the single owner of everything the lifecycle reacts to. It is
//! only ever mutated through [`apply`], which keeps every trigger (theme
//! changes, captures, ticks) serialized on one timeline.

use std::time::Duration;

use weather_garden_core::{
    Command, CreatureId, Event, Layer, PlacedCreature, RespawnError, RespawnId, RespawnRecord,
    WeatherTheme,
};

const DEFAULT_RESPAWN_DELAY: Duration = Duration::from_secs(10);

/// Represents the authoritative garden state.
#[derive(Debug)]
pub struct World {
    theme: Option<WeatherTheme>,
    ground: Vec<PlacedCreature>,
    sky: Vec<PlacedCreature>,
    respawn_queue: Vec<RespawnRecord>,
    respawn_delay: Duration,
    clock: Duration,
    next_respawn_id: u32,
}

impl World {
    /// Creates an empty world with no theme, no creatures, and an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: None,
            ground: Vec::new(),
            sky: Vec::new(),
            respawn_queue: Vec::new(),
            respawn_delay: DEFAULT_RESPAWN_DELAY,
            clock: Duration::ZERO,
            next_respawn_id: 0,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<PlacedCreature> {
        match layer {
            Layer::Ground => &mut self.ground,
            Layer::Sky => &mut self.sky,
        }
    }

    fn locate(&self, creature: CreatureId) -> Option<Layer> {
        if self.ground.iter().any(|placed| placed.id() == creature) {
            Some(Layer::Ground)
        } else if self.sky.iter().any(|placed| placed.id() == creature) {
            Some(Layer::Sky)
        } else {
            None
        }
    }

    fn remove_creature(&mut self, layer: Layer, creature: CreatureId) {
        let previous = std::mem::take(self.layer_mut(layer));
        *self.layer_mut(layer) = previous
            .into_iter()
            .filter(|placed| placed.id() != creature)
            .collect();
    }

    fn allocate_respawn_id(&mut self) -> RespawnId {
        let id = RespawnId::new(self.next_respawn_id);
        self.next_respawn_id = self.next_respawn_id.wrapping_add(1);
        id
    }

    fn respawn_index(&self, record: RespawnId) -> Option<usize> {
        self.respawn_queue
            .iter()
            .position(|queued| queued.id == record)
    }

    fn validate_respawn(
        &self,
        record: RespawnId,
        placed: &PlacedCreature,
    ) -> Result<usize, RespawnError> {
        let index = self
            .respawn_index(record)
            .ok_or(RespawnError::MissingRecord)?;
        if self.respawn_queue[index].layer != placed.layer() {
            return Err(RespawnError::LayerMismatch);
        }
        if self.locate(placed.id()).is_some() {
            return Err(RespawnError::AlreadyVisible);
        }
        Ok(index)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureRespawn { delay } => {
            world.respawn_delay = delay;
        }
        Command::ApplyTheme { theme } => {
            world.theme = Some(theme);
            let discarded_respawns = world.respawn_queue.len();
            world.respawn_queue.clear();
            out_events.push(Event::ThemeApplied {
                theme,
                discarded_respawns,
            });
        }
        Command::PopulateScene { ground, sky } => {
            world.ground = ground;
            world.sky = sky;
            out_events.push(Event::ScenePopulated {
                ground: world.ground.iter().map(PlacedCreature::id).collect(),
                sky: world.sky.iter().map(PlacedCreature::id).collect(),
            });
        }
        Command::CaptureCreature { creature } => {
            let Some(layer) = world.locate(creature) else {
                return;
            };

            world.remove_creature(layer, creature);
            let record = RespawnRecord {
                id: world.allocate_respawn_id(),
                creature: Some(creature),
                due_at: world.clock.saturating_add(world.respawn_delay),
                layer,
            };
            world.respawn_queue.push(record);
            out_events.push(Event::CreatureCaptured { creature, layer });
            out_events.push(Event::RespawnScheduled { record });
        }
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                now: world.clock,
            });
        }
        Command::RespawnCreature { record, placed } => {
            match world.validate_respawn(record, &placed) {
                Ok(index) => {
                    let consumed = world.respawn_queue.remove(index);
                    let creature = placed.id();
                    world.layer_mut(consumed.layer).push(placed);
                    out_events.push(Event::CreatureRespawned {
                        record,
                        creature,
                        layer: consumed.layer,
                    });
                }
                Err(reason) => out_events.push(Event::RespawnRejected { record, reason }),
            }
        }
        Command::DropRespawn { record } => match world.respawn_index(record) {
            Some(index) => {
                let _ = world.respawn_queue.remove(index);
                out_events.push(Event::RespawnDropped { record });
            }
            None => out_events.push(Event::RespawnRejected {
                record,
                reason: RespawnError::MissingRecord,
            }),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use weather_garden_core::{Layer, PlacedCreature, RespawnRecord, VisibleView, WeatherTheme};

    /// Theme currently driving the scene, if one has been applied.
    #[must_use]
    pub fn theme(world: &World) -> Option<WeatherTheme> {
        world.theme
    }

    /// Creatures currently visible in the provided layer, in display order.
    #[must_use]
    pub fn layer(world: &World, layer: Layer) -> &[PlacedCreature] {
        match layer {
            Layer::Ground => &world.ground,
            Layer::Sky => &world.sky,
        }
    }

    /// Captures a read-only view of both visible sets.
    #[must_use]
    pub fn visible_view(world: &World) -> VisibleView {
        VisibleView::new(world.ground.clone(), world.sky.clone())
    }

    /// Pending respawn records in queue order.
    #[must_use]
    pub fn respawn_queue(world: &World) -> &[RespawnRecord] {
        &world.respawn_queue
    }

    /// Delay applied to respawns scheduled by future captures.
    #[must_use]
    pub fn respawn_delay(world: &World) -> Duration {
        world.respawn_delay
    }

    /// Session time accumulated from every applied tick.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}
