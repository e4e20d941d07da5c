use serde::{Deserialize, Serialize};

use crate::config::ProjectileConfig;
use crate::kinematics::Body;

/// A shot fired by a Shooter. Travels horizontally until it leaves the
/// screen or hits the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub active: bool,
}

impl Projectile {
    /// Projectile of the configured size at (`x`, `y`) moving at `vx`.
    pub fn new(x: f64, y: f64, vx: f64, cfg: &ProjectileConfig) -> Self {
        Self {
            body: Body::new(x, y, cfg.width, cfg.height).with_velocity(vx, 0.0),
            active: true,
        }
    }

    pub fn update(&mut self, screen_width: f64) {
        if !self.active {
            return;
        }
        self.body.vy = 0.0;
        self.body.integrate();
        if self.body.x < 0.0 || self.body.x > screen_width {
            self.active = false;
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
