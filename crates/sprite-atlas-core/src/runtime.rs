use crate::error::{AtlasError, Result};
use crate::model::{Animation, AtlasMap, Rect, Sprite};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Runtime view over an exported map: O(1) lookup from sprite name to its
/// placement and from animation name to its frame list. The name indices
/// are built lazily, once, from the flat exported arrays.
#[derive(Debug)]
pub struct SpriteAtlas {
    sprites: Vec<Sprite>,
    animations: Vec<Animation>,
    sprite_index: OnceLock<HashMap<String, usize>>,
    animation_index: OnceLock<HashMap<String, usize>>,
}

impl SpriteAtlas {
    pub fn new(map: AtlasMap) -> Self {
        Self {
            sprites: map.sprites,
            animations: map.animations,
            sprite_index: OnceLock::new(),
            animation_index: OnceLock::new(),
        }
    }

    /// Parses a structured-text atlas map (the `MapFormat::Atlas` output).
    pub fn from_map_text(text: &str) -> Result<Self> {
        Ok(Self::new(parse_map_text(text)?))
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        let index = self.sprite_index.get_or_init(|| {
            self.sprites
                .iter()
                .enumerate()
                .map(|(i, s)| (s.name.clone(), i))
                .collect()
        });
        index.get(name).map(|&i| &self.sprites[i])
    }

    /// Animation names are not guaranteed unique (two subdirectories with
    /// the same name under different parents collide); a duplicate resolves
    /// to the last one in the map.
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        let index = self.animation_index.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.animations.len());
            for (i, a) in self.animations.iter().enumerate() {
                if index.insert(a.name.clone(), i).is_some() {
                    debug!(name = %a.name, "duplicate animation name, keeping the later one");
                }
            }
            index
        });
        index.get(name).map(|&i| &self.animations[i])
    }

    /// Frames of an animation resolved to sprites, in frame order. Returns
    /// `None` for an unknown animation or an index outside the sprite list.
    pub fn animation_frames(&self, name: &str) -> Option<Vec<&Sprite>> {
        let anim = self.animation(name)?;
        anim.frames
            .iter()
            .map(|&i| self.sprites.get(i))
            .collect()
    }
}

/// Parses the structured-text map format: sprite blocks of three lines
/// (name / `x,y,w,h` / `ox,oy`) up to the first blank line, then animation
/// blocks of three lines (name / frame rate / comma-separated indices).
fn parse_map_text(text: &str) -> Result<AtlasMap> {
    let mut lines = text.lines().peekable();
    let mut sprites = Vec::new();
    let mut animations = Vec::new();

    while let Some(&line) = lines.peek() {
        if line.trim().is_empty() {
            lines.next();
            break;
        }
        let name = lines.next().unwrap_or_default().trim().to_string();
        let rect_line = next_field(&mut lines, &name, "rectangle")?;
        let origin_line = next_field(&mut lines, &name, "origin")?;

        let nums = parse_u32_list(&rect_line)?;
        let &[x, y, w, h] = nums.as_slice() else {
            return Err(AtlasError::Parse(format!(
                "sprite `{name}`: expected 4 rectangle fields, got {}",
                nums.len()
            )));
        };
        let origin = parse_origin(&origin_line, &name)?;
        sprites.push(Sprite {
            name,
            rect: Rect::new(x, y, w, h),
            origin,
        });
    }

    while let Some(&line) = lines.peek() {
        if line.trim().is_empty() {
            lines.next();
            continue;
        }
        let name = lines.next().unwrap_or_default().trim().to_string();
        let rate_line = next_field(&mut lines, &name, "frame rate")?;
        let frames_line = next_field(&mut lines, &name, "frame indices")?;

        let frame_rate: u32 = rate_line
            .parse()
            .map_err(|_| AtlasError::Parse(format!("animation `{name}`: bad frame rate")))?;
        let frames = parse_u32_list(&frames_line)?
            .into_iter()
            .map(|v| v as usize)
            .collect();
        animations.push(Animation {
            name,
            frame_rate,
            frames,
        });
    }

    Ok(AtlasMap {
        sprites,
        animations,
    })
}

fn next_field(
    lines: &mut std::iter::Peekable<std::str::Lines<'_>>,
    owner: &str,
    what: &str,
) -> Result<String> {
    match lines.next() {
        Some(l) if !l.trim().is_empty() => Ok(l.trim().to_string()),
        _ => Err(AtlasError::Parse(format!(
            "`{owner}`: missing {what} line"
        ))),
    }
}

fn parse_u32_list(s: &str) -> Result<Vec<u32>> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .map_err(|_| AtlasError::Parse(format!("bad integer `{}`", p.trim())))
        })
        .collect()
}

fn parse_origin(s: &str, owner: &str) -> Result<(f32, f32)> {
    let mut parts = s.split(',').map(str::trim);
    let ox = parts.next().and_then(|p| p.parse::<f32>().ok());
    let oy = parts.next().and_then(|p| p.parse::<f32>().ok());
    match (ox, oy) {
        (Some(ox), Some(oy)) => Ok((ox, oy)),
        _ => Err(AtlasError::Parse(format!("sprite `{owner}`: bad origin"))),
    }
}
