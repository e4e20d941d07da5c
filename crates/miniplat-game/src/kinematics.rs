use serde::{Deserialize, Serialize};

use miniplat_core::geometry::Aabb;

/// Position, velocity and size of anything that moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub w: f64,
    pub h: f64,
}

impl Body {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            w,
            h,
        }
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    /// One integration step: `pos += vel`. No sub-stepping.
    pub fn integrate(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn apply_gravity(&mut self, gravity: f64) {
        self.vy += gravity;
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.w, self.h)
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

    pub fn stop(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
    }
}
