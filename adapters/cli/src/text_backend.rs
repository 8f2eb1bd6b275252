use std::io::Write;

use anyhow::{Context, Result};
use weather_garden_rendering::{RenderingBackend, Scene, SpritePresentation};

const STRIP_COLUMNS: usize = 100;

/// Backend that draws the sky and ground as two strips of text.
///
/// Each sprite is drawn as its creature identifier starting at its left edge.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    frames: u64,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.frames += 1;
        let icon = scene.icon.as_deref().unwrap_or("-");
        writeln!(
            self.out,
            "frame {} | {} | background {} | icon {}",
            self.frames, scene.theme, scene.background, icon
        )
        .context("failed to write frame header")?;
        writeln!(self.out, "sky    |{}|", strip(&scene.sky))
            .context("failed to write sky strip")?;
        writeln!(self.out, "ground |{}|", strip(&scene.ground))
            .context("failed to write ground strip")?;
        self.out.flush().context("failed to flush frame")
    }
}

fn strip(sprites: &[SpritePresentation]) -> String {
    let mut cells = vec!['.'; STRIP_COLUMNS];
    for sprite in sprites {
        let start = (sprite.left_percent.max(0.0).round() as usize).min(STRIP_COLUMNS - 1);
        let label = sprite.creature.to_string();
        for (cell, glyph) in cells[start..].iter_mut().zip(label.chars()) {
            *cell = glyph;
        }
    }
    cells.into_iter().collect()
}
