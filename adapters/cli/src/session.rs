use glam::Vec2;
use weather_garden_catalog::Catalog;
use weather_garden_core::{Command, CreatureId, Event, WeatherTheme};
use weather_garden_rendering::Scene;
use weather_garden_system_collection::{Collection, CollectionStore, UserId};
use weather_garden_system_lifecycle::{GardenView, Lifecycle};
use weather_garden_world::{self as world, query, World};

use crate::{heartbeat::Heartbeat, settings::Settings};

/// Screen the session resolves captures against, one unit per percent.
const SCENE_SIZE: Vec2 = Vec2::new(100.0, 100.0);
/// Sprite box at unit scale, in scene units.
const SPRITE_SIZE: Vec2 = Vec2::new(15.0, 15.0);

/// Owner of the world, its systems, and the heartbeat that drives them.
pub(crate) struct Session {
    world: World,
    lifecycle: Lifecycle,
    collection: Collection,
    store: Box<dyn CollectionStore>,
    catalog: Catalog,
    heartbeat: Heartbeat,
    frame_dirty: bool,
}

impl Session {
    pub(crate) fn new(
        settings: &Settings,
        catalog: Catalog,
        store: Box<dyn CollectionStore>,
        user: UserId,
        heartbeat: Heartbeat,
    ) -> Self {
        let mut session = Self {
            world: World::new(),
            lifecycle: Lifecycle::new(settings.lifecycle.clone()),
            collection: Collection::new(user),
            store,
            catalog,
            heartbeat,
            frame_dirty: false,
        };
        log::debug!(
            "lifecycle seeded with {:#x}, respawn proximity {}",
            session.lifecycle.config().rng_seed,
            session.lifecycle.config().proximity
        );
        session.dispatch(Command::ConfigureRespawn {
            delay: settings.respawn_delay(),
        });
        session
    }

    pub(crate) fn apply_theme(&mut self, theme: WeatherTheme) {
        log::info!("applying {theme} theme");
        self.dispatch(Command::ApplyTheme { theme });
    }

    /// Waits for the next heartbeat and advances the garden by it.
    ///
    /// Returns `false` once the heartbeat has been cancelled.
    pub(crate) fn advance(&mut self) -> bool {
        let Some(dt) = self.heartbeat.next_beat() else {
            return false;
        };
        self.dispatch(Command::Tick { dt });
        true
    }

    /// Clicks the centre of the sprite closest to the left edge, if any.
    pub(crate) fn capture_leftmost(&mut self) -> Option<CreatureId> {
        let scene = self.scene()?;
        let (min, size) = scene
            .sprites()
            .min_by(|a, b| a.left_percent.total_cmp(&b.left_percent))?
            .bounds(SCENE_SIZE, SPRITE_SIZE);
        self.capture_at(min + size * 0.5)
    }

    /// Captures the creature whose sprite covers `point` in scene space.
    pub(crate) fn capture_at(&mut self, point: Vec2) -> Option<CreatureId> {
        let Some(creature) = self.scene()?.hit_test(point, SCENE_SIZE, SPRITE_SIZE) else {
            log::debug!("click at ({:.1}, {:.1}) hit nothing", point.x, point.y);
            return None;
        };
        self.dispatch(Command::CaptureCreature { creature });
        Some(creature)
    }

    /// Scene to present when the visible sets changed since the last frame.
    pub(crate) fn take_frame(&mut self) -> Option<Scene> {
        if !std::mem::take(&mut self.frame_dirty) {
            return None;
        }
        self.scene()
    }

    fn scene(&self) -> Option<Scene> {
        let theme = query::theme(&self.world)?;
        let Some(assets) = self.catalog.theme(theme) else {
            log::debug!("catalog has no assets for {theme}; skipping frame");
            return None;
        };
        Some(Scene::new(
            theme,
            assets.background(),
            assets.icon().map(str::to_owned),
            &query::visible_view(&self.world),
        ))
    }

    /// Cancels the heartbeat and returns the names of every creature the user collected.
    pub(crate) fn shutdown(mut self) -> Vec<String> {
        self.heartbeat.cancel();
        let collected = self
            .store
            .user(self.collection.user())
            .map(|record| record.collected)
            .unwrap_or_default();
        log::info!(
            "session ended at {:?} with {} creatures collected",
            query::clock(&self.world),
            collected.len()
        );
        collected
            .into_iter()
            .map(|id| {
                self.catalog
                    .creature(id)
                    .map_or_else(|| id.to_string(), |creature| creature.name().to_owned())
            })
            .collect()
    }

    fn dispatch(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            self.frame_dirty |= events.iter().any(changes_scene);
            self.collection.handle(&events, self.store.as_mut());

            let visible = query::visible_view(&self.world);
            let view = GardenView {
                theme: query::theme(&self.world),
                visible: &visible,
                queue: query::respawn_queue(&self.world),
                now: query::clock(&self.world),
            };
            let mut commands = Vec::new();
            self.lifecycle
                .handle(&events, view, &self.catalog, &mut commands);

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

fn changes_scene(event: &Event) -> bool {
    matches!(
        event,
        Event::ScenePopulated { .. }
            | Event::CreatureCaptured { .. }
            | Event::CreatureRespawned { .. }
    )
}
