use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Aabb {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.w < 0.0 || self.h < 0.0
    }

    /// Inclusive intersection: boxes that share an edge intersect.
    ///
    /// A body resting exactly on a surface must keep touching it, otherwise
    /// grounded objects would lose contact every other tick.
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.right() >= other.left()
            && self.bottom() >= other.top()
            && self.left() <= other.right()
            && self.top() <= other.bottom()
    }
}
