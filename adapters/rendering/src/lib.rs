#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for weather garden adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use weather_garden_core::{CreatureId, Layer, PlacedCreature, VisibleView, WeatherTheme};

/// Edge of the scene a sprite's vertical offset is measured from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalAnchor {
    /// Offset, in percent of the scene height, above the bottom edge.
    Bottom(f32),
    /// Offset, in percent of the scene height, below the top edge.
    Top(f32),
}

impl VerticalAnchor {
    /// Anchor used for creatures in the provided layer.
    #[must_use]
    pub const fn for_layer(layer: Layer, offset_percent: f32) -> Self {
        match layer {
            Layer::Ground => Self::Bottom(offset_percent),
            Layer::Sky => Self::Top(offset_percent),
        }
    }

    /// Distance from the top edge expressed as a fraction of the scene height.
    #[must_use]
    pub fn from_top(self) -> f32 {
        match self {
            Self::Bottom(percent) => 1.0 - percent / 100.0,
            Self::Top(percent) => percent / 100.0,
        }
    }
}

/// Describes a creature sprite that should be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Identifier of the creature, reported back when the sprite is captured.
    pub creature: CreatureId,
    /// Image reference resolved by the backend.
    pub image: String,
    /// Left edge in percent of the scene width.
    pub left_percent: f32,
    /// Vertical placement relative to the sprite's layer edge.
    pub anchor: VerticalAnchor,
    /// Size multiplier applied to the sprite.
    pub scale: f32,
}

impl SpritePresentation {
    /// Builds a sprite from a placed creature.
    #[must_use]
    pub fn from_placed(placed: &PlacedCreature) -> Self {
        let position = placed.position();
        Self {
            creature: placed.id(),
            image: placed.creature().image().to_owned(),
            left_percent: position.horizontal_percent,
            anchor: VerticalAnchor::for_layer(placed.layer(), position.vertical_percent),
            scale: position.scale_factor,
        }
    }

    /// Anchor point of the sprite in screen space for a scene of the given size.
    ///
    /// The origin is the top-left corner of the scene.
    #[must_use]
    pub fn screen_position(&self, scene_size: Vec2) -> Vec2 {
        Vec2::new(
            self.left_percent / 100.0 * scene_size.x,
            self.anchor.from_top() * scene_size.y,
        )
    }

    /// Top-left corner and size of the sprite's box in screen space.
    ///
    /// `sprite_size` is the box at unit scale. Ground sprites stand on their
    /// anchor and sky sprites hang from it.
    #[must_use]
    pub fn bounds(&self, scene_size: Vec2, sprite_size: Vec2) -> (Vec2, Vec2) {
        let size = sprite_size * self.scale;
        let anchor = self.screen_position(scene_size);
        let top = match self.anchor {
            VerticalAnchor::Bottom(_) => anchor.y - size.y,
            VerticalAnchor::Top(_) => anchor.y,
        };
        (Vec2::new(anchor.x, top), size)
    }
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Theme the scene is dressed for.
    pub theme: WeatherTheme,
    /// Background image drawn behind every sprite.
    pub background: String,
    /// Weather icon shown alongside the scene, if the theme has one.
    pub icon: Option<String>,
    /// Ground sprites in placement order.
    pub ground: Vec<SpritePresentation>,
    /// Sky sprites in placement order.
    pub sky: Vec<SpritePresentation>,
}

impl Scene {
    /// Creates a scene from the visible sets of the garden.
    #[must_use]
    pub fn new(
        theme: WeatherTheme,
        background: impl Into<String>,
        icon: Option<String>,
        visible: &VisibleView,
    ) -> Self {
        Self {
            theme,
            background: background.into(),
            icon,
            ground: sprites(visible.layer(Layer::Ground)),
            sky: sprites(visible.layer(Layer::Sky)),
        }
    }

    /// Every sprite, sky first so ground sprites are drawn on top.
    pub fn sprites(&self) -> impl Iterator<Item = &SpritePresentation> {
        self.sky.iter().chain(&self.ground)
    }

    /// Sprite covering `point` in screen space, using `sprite_size` at unit scale.
    ///
    /// Ground sprites win over sky sprites when both cover the point.
    #[must_use]
    pub fn hit_test(&self, point: Vec2, scene_size: Vec2, sprite_size: Vec2) -> Option<CreatureId> {
        self.ground
            .iter()
            .chain(&self.sky)
            .find(|sprite| {
                let (min, size) = sprite.bounds(scene_size, sprite_size);
                let max = min + size;
                point.cmpge(min).all() && point.cmplt(max).all()
            })
            .map(|sprite| sprite.creature)
    }
}

fn sprites(placed: &[PlacedCreature]) -> Vec<SpritePresentation> {
    placed.iter().map(SpritePresentation::from_placed).collect()
}

/// Rendering backends implement this trait to present scenes.
pub trait RenderingBackend {
    /// Presents the provided scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_garden_core::{Creature, Position};

    fn placed(id: u32, layer: Layer, left: f32, offset: f32) -> PlacedCreature {
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
                vertical_percent: offset,
                scale_factor: 1.0,
            },
        )
    }

    #[test]
    fn anchors_follow_layer() {
        assert_eq!(
            VerticalAnchor::for_layer(Layer::Ground, 10.0),
            VerticalAnchor::Bottom(10.0)
        );
        assert_eq!(
            VerticalAnchor::for_layer(Layer::Sky, 40.0),
            VerticalAnchor::Top(40.0)
        );
    }

    #[test]
    fn screen_position_measures_from_layer_edge() {
        let size = Vec2::new(200.0, 100.0);
        let ground = SpritePresentation::from_placed(&placed(1, Layer::Ground, 25.0, 10.0));
        let sky = SpritePresentation::from_placed(&placed(2, Layer::Sky, 50.0, 20.0));

        assert!(ground
            .screen_position(size)
            .abs_diff_eq(Vec2::new(50.0, 90.0), 1e-3));
        assert!(sky
            .screen_position(size)
            .abs_diff_eq(Vec2::new(100.0, 20.0), 1e-3));
    }

    #[test]
    fn scene_keeps_layers_apart() {
        let view = VisibleView::new(
            vec![placed(1, Layer::Ground, 20.0, 0.0)],
            vec![placed(2, Layer::Sky, 60.0, 30.0)],
        );
        let scene = Scene::new(WeatherTheme::Sunny, "sunny.png", None, &view);

        assert_eq!(scene.ground.len(), 1);
        assert_eq!(scene.sky[0].creature, CreatureId::new(2));
        assert_eq!(
            scene.sprites().map(|sprite| sprite.creature.get()).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[test]
    fn hit_test_resolves_sprite_under_point() {
        let view = VisibleView::new(vec![placed(7, Layer::Ground, 10.0, 0.0)], Vec::new());
        let scene = Scene::new(WeatherTheme::Rainy, "rainy.png", None, &view);
        let size = Vec2::new(100.0, 100.0);
        let sprite = Vec2::new(15.0, 20.0);

        assert_eq!(
            scene.hit_test(Vec2::new(12.0, 95.0), size, sprite),
            Some(CreatureId::new(7))
        );
        assert_eq!(scene.hit_test(Vec2::new(30.0, 95.0), size, sprite), None);
        assert_eq!(scene.hit_test(Vec2::new(12.0, 50.0), size, sprite), None);
    }

    #[test]
    fn sky_bounds_hang_below_anchor() {
        let sky = SpritePresentation::from_placed(&placed(3, Layer::Sky, 40.0, 10.0));

        let (min, size) = sky.bounds(Vec2::new(100.0, 100.0), Vec2::new(15.0, 20.0));

        assert!(min.abs_diff_eq(Vec2::new(40.0, 10.0), 1e-3));
        assert!(size.abs_diff_eq(Vec2::new(15.0, 20.0), 1e-3));
    }
}
