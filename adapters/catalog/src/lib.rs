#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Creature catalog describing the assets and pools available for each weather theme.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use weather_garden_core::{Creature, CreatureId, CreaturePools, Layer, WeatherTheme};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

const SUNNY_GROUND: [(u32, &str); 4] = [
    (1, "miyamakirishima"),
    (2, "sotetsu"),
    (3, "rurikakesu"),
    (4, "satumanishiki"),
];

const CLOUDY_RAINY_GROUND: [(u32, &str); 5] = [
    (5, "amamiishikawagaeru"),
    (6, "amaminokurousagi"),
    (7, "hikagehego"),
    (8, "oosumisansyouuo"),
    (9, "ootoratugumi"),
];

/// Presentation assets and creature pools registered for one theme.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeAssets {
    background: String,
    icon: Option<String>,
    ground: Vec<Creature>,
    sky: Vec<Creature>,
}

impl ThemeAssets {
    /// Background image shown behind the scene.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Weather icon, absent for themes without one.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Creatures eligible in the provided layer.
    #[must_use]
    pub fn pool(&self, layer: Layer) -> &[Creature] {
        match layer {
            Layer::Ground => &self.ground,
            Layer::Sky => &self.sky,
        }
    }
}

/// Lookup table from weather theme to its assets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    themes: BTreeMap<WeatherTheme, ThemeAssets>,
}

impl Catalog {
    /// Catalog shipped with the garden.
    ///
    /// Cloudy and rainy share their ground creatures; snowy has none and no
    /// icon. No theme populates the sky.
    #[must_use]
    pub fn builtin() -> Self {
        let sunny = builtin_creatures(&SUNNY_GROUND, "sunny");
        let cloudy_rainy = builtin_creatures(&CLOUDY_RAINY_GROUND, "cloudy_rainy");

        let mut themes = BTreeMap::new();
        for theme in WeatherTheme::ALL {
            let ground = match theme {
                WeatherTheme::Sunny => sunny.clone(),
                WeatherTheme::Cloudy | WeatherTheme::Rainy => cloudy_rainy.clone(),
                WeatherTheme::Snowy => Vec::new(),
            };
            let icon = match theme {
                WeatherTheme::Snowy => None,
                _ => Some(format!("weather/{theme}.jpg")),
            };
            let _ = themes.insert(
                theme,
                ThemeAssets {
                    background: format!("background/background_{theme}.png"),
                    icon,
                    ground,
                    sky: Vec::new(),
                },
            );
        }
        Self { themes }
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/catalog.toml")
    }

    /// Loads a catalog from the manifest located at the provided path.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read catalog manifest at {}",
                manifest_path.display()
            )
        })?;
        let catalog = parse_manifest(&contents)
            .with_context(|| format!("invalid catalog manifest {}", manifest_path.display()))?;
        log::info!(
            "loaded catalog with {} themes from {}",
            catalog.themes.len(),
            manifest_path.display()
        );
        Ok(catalog)
    }

    /// Parses a catalog from manifest TOML contents.
    pub fn from_manifest_str(contents: &str) -> Result<Self> {
        parse_manifest(contents)
    }

    /// Assets registered for the provided theme.
    #[must_use]
    pub fn theme(&self, theme: WeatherTheme) -> Option<&ThemeAssets> {
        self.themes.get(&theme)
    }

    /// Themes known to the catalog in declaration order.
    pub fn themes(&self) -> impl Iterator<Item = WeatherTheme> + '_ {
        self.themes.keys().copied()
    }

    /// Looks up a creature by identifier across every theme.
    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.themes
            .values()
            .flat_map(|assets| assets.ground.iter().chain(&assets.sky))
            .find(|creature| creature.id() == id)
    }
}

impl CreaturePools for Catalog {
    fn creatures(&self, theme: WeatherTheme, layer: Layer) -> Option<&[Creature]> {
        self.theme(theme).map(|assets| assets.pool(layer))
    }
}

fn builtin_creatures(entries: &[(u32, &str)], folder: &str) -> Vec<Creature> {
    entries
        .iter()
        .map(|&(id, name)| {
            Creature::new(
                CreatureId::new(id),
                name,
                format!("/character/{folder}/{name}.png"),
                Layer::Ground,
            )
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    creatures: Vec<CreatureEntry>,
    #[serde(default)]
    themes: BTreeMap<String, ThemeEntry>,
}

#[derive(Debug, Deserialize)]
struct CreatureEntry {
    id: u32,
    name: String,
    image: String,
    layer: Layer,
}

#[derive(Debug, Deserialize)]
struct ThemeEntry {
    background: String,
    icon: Option<String>,
    #[serde(default)]
    creatures: Vec<u32>,
}

fn parse_manifest(contents: &str) -> Result<Catalog> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse catalog manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported catalog manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut creatures = HashMap::with_capacity(manifest.creatures.len());
    for entry in manifest.creatures {
        let creature = Creature::new(
            CreatureId::new(entry.id),
            entry.name,
            entry.image,
            entry.layer,
        );
        if creatures.insert(entry.id, creature).is_some() {
            bail!("catalog manifest contains duplicate creature id {}", entry.id);
        }
    }

    let mut themes = BTreeMap::new();
    for (name, entry) in manifest.themes {
        let theme: WeatherTheme = name
            .parse()
            .with_context(|| format!("unknown theme `{name}` in catalog manifest"))?;
        let mut seen = HashSet::with_capacity(entry.creatures.len());
        let mut assets = ThemeAssets {
            background: entry.background,
            icon: entry.icon,
            ground: Vec::new(),
            sky: Vec::new(),
        };
        for id in entry.creatures {
            let Some(creature) = creatures.get(&id) else {
                bail!("theme {theme} references unknown creature id {id}");
            };
            if !seen.insert(id) {
                bail!("theme {theme} lists creature id {id} more than once");
            }
            match creature.layer() {
                Layer::Ground => assets.ground.push(creature.clone()),
                Layer::Sky => assets.sky.push(creature.clone()),
            }
        }
        if themes.insert(theme, assets).is_some() {
            bail!("catalog manifest contains duplicate entry for theme {theme}");
        }
    }

    Ok(Catalog { themes })
}
