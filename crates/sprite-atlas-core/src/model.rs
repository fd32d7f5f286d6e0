use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Shrinks the rectangle by `amount` on every side.
    pub fn inset(&self, amount: u32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.w.saturating_sub(amount * 2),
            self.h.saturating_sub(amount * 2),
        )
    }
    /// Grows the rectangle by `amount` on every side. Saturates at the origin.
    pub fn outset(&self, amount: u32) -> Rect {
        Rect::new(
            self.x.saturating_sub(amount),
            self.y.saturating_sub(amount),
            self.w + amount * 2,
            self.h + amount * 2,
        )
    }
}

/// One packed sprite in the exported map: trimmed placement plus origin.
///
/// The rectangle is the sprite's true (unpadded) size within the atlas;
/// the origin is a normalized pivot in `[0,1]` carried through from the
/// run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub rect: Rect,
    pub origin: (f32, f32),
}

/// An animation: ordered indices into the atlas map's flat sprite list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub frame_rate: u32,
    pub frames: Vec<usize>,
}

/// The format-agnostic exported map: a flat sprite list (order defines
/// the frame indices used by animations) plus the animation groupings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasMap {
    pub sprites: Vec<Sprite>,
    pub animations: Vec<Animation>,
}
