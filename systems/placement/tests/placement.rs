use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use weather_garden_core::{Creature, CreatureId, Layer, PlacedCreature, PlacementZone};
use weather_garden_system_placement::{place, place_single, Config, DEFAULT_CREATURE_WIDTH};

const GARDEN_ZONE: PlacementZone = PlacementZone::new(15.0, 85.0);

fn pool(size: u32, layer: Layer) -> Vec<Creature> {
    (0..size)
        .map(|id| {
            Creature::new(
                CreatureId::new(id),
                format!("creature-{id}"),
                format!("/character/{id}.png"),
                layer,
            )
        })
        .collect()
}

fn lefts(placed: &[PlacedCreature]) -> Vec<f32> {
    placed
        .iter()
        .map(|entry| entry.position().horizontal_percent)
        .collect()
}

fn pairwise_separated(placed: &[PlacedCreature], width: f32) -> bool {
    let lefts = lefts(placed);
    lefts.iter().enumerate().all(|(index, left)| {
        lefts[index + 1..]
            .iter()
            .all(|other| (left - other).abs() >= width)
    })
}

#[test]
fn selects_requested_count_of_distinct_pool_members() {
    let creatures = pool(6, Layer::Ground);
    let known: HashSet<_> = creatures.iter().map(Creature::id).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for count in 0..=6 {
        let placed = place(
            &creatures,
            count,
            GARDEN_ZONE,
            Layer::Ground,
            &Config::default(),
            &mut rng,
        );
        assert_eq!(placed.len(), count);
        let ids: HashSet<_> = placed.iter().map(PlacedCreature::id).collect();
        assert_eq!(ids.len(), count, "selection must not repeat creatures");
        assert!(ids.is_subset(&known));
    }
}

#[test]
fn clamps_count_to_pool_size() {
    let creatures = pool(3, Layer::Ground);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let placed = place(
        &creatures,
        10,
        GARDEN_ZONE,
        Layer::Ground,
        &Config::default(),
        &mut rng,
    );

    assert_eq!(placed.len(), 3);
}

#[test]
fn empty_pool_yields_no_placements() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for count in [0, 1, 5] {
        let placed = place(
            &[],
            count,
            GARDEN_ZONE,
            Layer::Sky,
            &Config::default(),
            &mut rng,
        );
        assert!(placed.is_empty());
    }
}

#[test]
fn every_creature_can_be_selected() {
    let creatures = pool(5, Layer::Ground);
    let mut seen = HashSet::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0xabcd);

    for _ in 0..200 {
        for placed in place(
            &creatures,
            1,
            GARDEN_ZONE,
            Layer::Ground,
            &Config::default(),
            &mut rng,
        ) {
            let _ = seen.insert(placed.id());
        }
    }

    assert_eq!(seen.len(), creatures.len());
}

#[test]
fn placements_stay_inside_the_zone() {
    let creatures = pool(4, Layer::Ground);
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..500 {
        let placed = place(&creatures, 4, GARDEN_ZONE, Layer::Ground, &config, &mut rng);
        for left in lefts(&placed) {
            assert!(left >= GARDEN_ZONE.min_horizontal());
            assert!(left <= GARDEN_ZONE.max_horizontal() - config.creature_width());
        }
    }
}

#[test]
fn footprints_rarely_overlap_with_default_budget() {
    let creatures = pool(5, Layer::Ground);
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0xfeed_beef);
    let trials = 1_000;

    let separated = (0..trials)
        .filter(|_| {
            let placed = place(&creatures, 2, GARDEN_ZONE, Layer::Ground, &config, &mut rng);
            pairwise_separated(&placed, config.creature_width())
        })
        .count();

    assert!(
        separated * 100 >= trials * 95,
        "only {separated} of {trials} trials were overlap free"
    );
}

#[test]
fn exhausted_search_still_places_every_creature() {
    let creatures = pool(4, Layer::Ground);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let crowded = PlacementZone::new(15.0, 40.0);

    let placed = place(
        &creatures,
        4,
        crowded,
        Layer::Ground,
        &Config::default(),
        &mut rng,
    );

    assert_eq!(placed.len(), 4);
    assert!(!pairwise_separated(&placed, DEFAULT_CREATURE_WIDTH));
}

#[test]
fn non_positive_span_collapses_to_zone_start() {
    let creatures = pool(3, Layer::Sky);
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let narrow = PlacementZone::new(30.0, 40.0);

    let placed = place(&creatures, 3, narrow, Layer::Sky, &Config::default(), &mut rng);

    assert_eq!(placed.len(), 3);
    for left in lefts(&placed) {
        assert!((left - 30.0).abs() < f32::EPSILON);
    }
}

#[test]
fn vertical_offset_and_scale_follow_layer_ranges() {
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let ground = pool(5, Layer::Ground);
    let sky = pool(5, Layer::Sky);

    for _ in 0..200 {
        for placed in place(&ground, 2, GARDEN_ZONE, Layer::Ground, &config, &mut rng) {
            let position = placed.position();
            assert_eq!(placed.layer(), Layer::Ground);
            assert!((0.0..15.0).contains(&position.vertical_percent));
            assert!((0.8..1.3).contains(&position.scale_factor));
        }
        for placed in place(&sky, 1, GARDEN_ZONE, Layer::Sky, &config, &mut rng) {
            let position = placed.position();
            assert_eq!(placed.layer(), Layer::Sky);
            assert!((0.0..85.0).contains(&position.vertical_percent));
            assert!((0.8..1.3).contains(&position.scale_factor));
        }
    }
}

#[test]
fn custom_cosmetic_ranges_are_respected() {
    let config = Config::new(10.0, 20)
        .with_scale_range(1.0, 1.0)
        .with_vertical_limits(5.0, 10.0);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let creatures = pool(2, Layer::Ground);

    for placed in place(&creatures, 2, GARDEN_ZONE, Layer::Ground, &config, &mut rng) {
        let position = placed.position();
        assert!((position.scale_factor - 1.0).abs() < f32::EPSILON);
        assert!(position.vertical_percent < 5.0);
        assert!(position.horizontal_percent <= 75.0);
    }
}

#[test]
fn pool_is_left_untouched() {
    let creatures = pool(4, Layer::Ground);
    let snapshot = creatures.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(13);

    let _ = place(
        &creatures,
        3,
        GARDEN_ZONE,
        Layer::Ground,
        &Config::default(),
        &mut rng,
    );

    assert_eq!(creatures, snapshot);
}

#[test]
fn same_seed_produces_same_layout() {
    let creatures = pool(5, Layer::Ground);
    let config = Config::default();
    let first = place(
        &creatures,
        2,
        GARDEN_ZONE,
        Layer::Ground,
        &config,
        &mut ChaCha8Rng::seed_from_u64(0x1234),
    );
    let second = place(
        &creatures,
        2,
        GARDEN_ZONE,
        Layer::Ground,
        &config,
        &mut ChaCha8Rng::seed_from_u64(0x1234),
    );

    assert_eq!(first, second);
}

#[test]
fn garden_scenario_places_two_of_three_ground_creatures() {
    let creatures = pool(3, Layer::Ground);
    let known: HashSet<_> = creatures.iter().map(Creature::id).collect();
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0x6a7d_e11);

    for _ in 0..100 {
        let placed = place(&creatures, 2, GARDEN_ZONE, Layer::Ground, &config, &mut rng);
        assert_eq!(placed.len(), 2);
        assert_ne!(placed[0].id(), placed[1].id());
        for entry in &placed {
            assert!(known.contains(&entry.id()));
            let left = entry.position().horizontal_percent;
            assert!((15.0..=70.0).contains(&left), "left {left} outside [15, 70]");
        }
    }
}

#[test]
fn single_placement_uses_requested_layer() {
    let creature = pool(1, Layer::Sky).remove(0);
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let placed = place_single(
        &creature,
        GARDEN_ZONE,
        Layer::Sky,
        &Config::default(),
        &mut rng,
    );

    assert_eq!(placed.id(), creature.id());
    assert_eq!(placed.layer(), Layer::Sky);
    assert!((15.0..=70.0).contains(&placed.position().horizontal_percent));
}
