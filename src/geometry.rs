use serde::{Deserialize, Serialize};

/// Integer-aligned rectangle. Maxima are exclusive: `x_max() == x + width`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn x_max(&self) -> i32 {
        self.x + self.width
    }

    pub fn y_max(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Padded overlap: `self` grown by `pad` on every side intersects `other`
    /// on both axes. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect, pad: i32) -> bool {
        self.x.saturating_sub(pad) < other.x_max()
            && self.x_max().saturating_add(pad) > other.x
            && self.y.saturating_sub(pad) < other.y_max()
            && self.y_max().saturating_add(pad) > other.y
    }

    /// True when all four edges of `self` lie within `other` (shared edges allowed).
    pub fn is_inside(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.x_max() <= other.x_max()
            && self.y >= other.y
            && self.y_max() <= other.y_max()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x_max = self.x_max().max(other.x_max());
        let y_max = self.y_max().max(other.y_max());
        Rect::new(x, y, x_max - x, y_max - y)
    }
}
