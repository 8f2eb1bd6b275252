use std::time::Duration;

use weather_garden_core::{
    Command, Creature, CreatureId, Event, Layer, PlacedCreature, Position, RespawnError,
    RespawnId, WeatherTheme,
};
use weather_garden_world::{self as world, query, World};

fn placed(id: u32, layer: Layer, left: f32) -> PlacedCreature {
    PlacedCreature::new(
        Creature::new(
            CreatureId::new(id),
            format!("creature-{id}"),
            format!("/character/{id}.png"),
            layer,
        ),
        layer,
        Position {
            horizontal_percent: left,
            vertical_percent: 5.0,
            scale_factor: 1.0,
        },
    )
}

fn populated_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ApplyTheme {
            theme: WeatherTheme::Sunny,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::PopulateScene {
            ground: vec![placed(1, Layer::Ground, 20.0)],
            sky: vec![placed(2, Layer::Sky, 50.0)],
        },
        &mut events,
    );
    world
}

#[test]
fn new_world_starts_empty() {
    let world = World::new();

    assert_eq!(query::theme(&world), None);
    assert!(query::visible_view(&world).is_empty());
    assert!(query::respawn_queue(&world).is_empty());
    assert_eq!(query::clock(&world), Duration::ZERO);
}

#[test]
fn capture_removes_creature_and_enqueues_ground_respawn() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureRespawn {
            delay: Duration::from_secs(3),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(1),
        },
        &mut events,
    );

    let view = query::visible_view(&world);
    assert!(view.layer(Layer::Ground).is_empty());
    assert_eq!(view.layer(Layer::Sky).len(), 1);
    assert_eq!(view.layer(Layer::Sky)[0].id(), CreatureId::new(2));

    let queue = query::respawn_queue(&world);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].layer, Layer::Ground);
    assert_eq!(queue[0].creature, Some(CreatureId::new(1)));
    assert_eq!(queue[0].due_at, Duration::from_secs(3));

    assert!(events.contains(&Event::CreatureCaptured {
        creature: CreatureId::new(1),
        layer: Layer::Ground,
    }));
}

#[test]
fn capture_of_missing_creature_is_ignored() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(99),
        },
        &mut events,
    );

    assert!(events.is_empty(), "unknown capture must not emit events");
    assert_eq!(query::visible_view(&world).len(), 2);
    assert!(query::respawn_queue(&world).is_empty());
}

#[test]
fn due_time_tracks_the_session_clock() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(1_500),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(2),
        },
        &mut events,
    );

    let record = query::respawn_queue(&world)[0];
    assert_eq!(record.layer, Layer::Sky);
    assert_eq!(record.due_at, Duration::from_millis(11_500));
    assert!(events.contains(&Event::TimeAdvanced {
        dt: Duration::from_millis(1_500),
        now: Duration::from_millis(1_500),
    }));
}

#[test]
fn applying_theme_discards_pending_respawns() {
    let mut world = populated_world();
    let mut events = Vec::new();
    for id in [1, 2] {
        world::apply(
            &mut world,
            Command::CaptureCreature {
                creature: CreatureId::new(id),
            },
            &mut events,
        );
    }
    assert_eq!(query::respawn_queue(&world).len(), 2);

    events.clear();
    world::apply(
        &mut world,
        Command::ApplyTheme {
            theme: WeatherTheme::Rainy,
        },
        &mut events,
    );

    assert!(query::respawn_queue(&world).is_empty());
    assert_eq!(query::theme(&world), Some(WeatherTheme::Rainy));
    assert_eq!(
        events,
        vec![Event::ThemeApplied {
            theme: WeatherTheme::Rainy,
            discarded_respawns: 2,
        }]
    );
}

#[test]
fn respawn_consumes_record_and_appends_to_layer() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(1),
        },
        &mut events,
    );
    let record = query::respawn_queue(&world)[0].id;

    events.clear();
    world::apply(
        &mut world,
        Command::RespawnCreature {
            record,
            placed: placed(3, Layer::Ground, 60.0),
        },
        &mut events,
    );

    assert!(query::respawn_queue(&world).is_empty());
    let ground = query::layer(&world, Layer::Ground);
    assert_eq!(ground.len(), 1);
    assert_eq!(ground[0].id(), CreatureId::new(3));
    assert_eq!(
        events,
        vec![Event::CreatureRespawned {
            record,
            creature: CreatureId::new(3),
            layer: Layer::Ground,
        }]
    );
}

#[test]
fn respawn_of_visible_creature_is_rejected() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(1),
        },
        &mut events,
    );
    let record = query::respawn_queue(&world)[0].id;

    events.clear();
    world::apply(
        &mut world,
        Command::RespawnCreature {
            record,
            placed: placed(2, Layer::Ground, 60.0),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::RespawnRejected {
            record,
            reason: RespawnError::AlreadyVisible,
        }]
    );
    assert_eq!(query::respawn_queue(&world).len(), 1, "record stays queued");
    assert!(query::layer(&world, Layer::Ground).is_empty());
}

#[test]
fn respawn_into_wrong_layer_is_rejected() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(1),
        },
        &mut events,
    );
    let record = query::respawn_queue(&world)[0].id;

    events.clear();
    world::apply(
        &mut world,
        Command::RespawnCreature {
            record,
            placed: placed(5, Layer::Sky, 60.0),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::RespawnRejected {
            record,
            reason: RespawnError::LayerMismatch,
        }]
    );
}

#[test]
fn dropping_unknown_record_is_rejected() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::DropRespawn {
            record: RespawnId::new(42),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::RespawnRejected {
            record: RespawnId::new(42),
            reason: RespawnError::MissingRecord,
        }]
    );
}

#[test]
fn dropping_record_removes_it_from_queue() {
    let mut world = populated_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CaptureCreature {
            creature: CreatureId::new(2),
        },
        &mut events,
    );
    let record = query::respawn_queue(&world)[0].id;

    events.clear();
    world::apply(&mut world, Command::DropRespawn { record }, &mut events);

    assert!(query::respawn_queue(&world).is_empty());
    assert_eq!(events, vec![Event::RespawnDropped { record }]);
}
