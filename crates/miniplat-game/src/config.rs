use serde::{Deserialize, Serialize};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "MINIPLAT_CONFIG";
/// Config path tried when the environment variable is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/miniplat.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
    pub fps: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fps: 60,
        }
    }
}

/// Per-tick physics constants. Velocities are in units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub jump_force: f64,
    pub move_speed: f64,
    /// How far above a platform top the previous bottom edge may be and still land.
    pub landing_tolerance: f64,
    pub stomp_bounce: f64,
    pub weapon_bounce: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_force: -12.0,
            move_speed: 5.0,
            landing_tolerance: 10.0,
            stomp_bounce: -5.0,
            weapon_bounce: -3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f64,
    pub height: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub max_lives: u32,
    pub damage_cooldown_ms: u64,
    pub attack_duration_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
            start_x: 100.0,
            start_y: 400.0,
            max_lives: 3,
            damage_cooldown_ms: 1000,
            attack_duration_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub koopa_speed_factor: f64,
    pub flyer_speed_factor: f64,
    pub flyer_amplitude: f64,
    pub flyer_period_ms: f64,
    pub shooter_speed: f64,
    pub shooter_min_x: f64,
    /// Shooter turns back once its x passes `screen.width - shooter_margin_right`.
    pub shooter_margin_right: f64,
    pub shoot_cooldown_ms: u64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            speed: 2.0,
            koopa_speed_factor: 0.8,
            flyer_speed_factor: 1.2,
            flyer_amplitude: 20.0,
            flyer_period_ms: 500.0,
            shooter_speed: 1.0,
            shooter_min_x: 50.0,
            shooter_margin_right: 100.0,
            shoot_cooldown_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 8.0,
            speed: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub invincibility_ms: u64,
    pub speed_multiplier: f64,
    /// Probability that a defeated enemy drops a collectible.
    pub drop_chance: f64,
    pub min_spawned: usize,
    pub max_spawned: usize,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            invincibility_ms: 10_000,
            speed_multiplier: 2.0,
            drop_chance: 0.3,
            min_spawned: 4,
            max_spawned: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    pub size: f64,
    pub coin_value: u32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            coin_value: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub projectile: ProjectileConfig,
    pub powerup: PowerUpConfig,
    pub collectible: CollectibleConfig,
    pub obstacle: ObstacleConfig,
    /// Seed for the session RNG. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Load config from `MINIPLAT_CONFIG` or `config/miniplat.toml`. Falls
    /// back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse TOML and replace out-of-range values with their defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.validate();
        Ok(config)
    }

    /// Replace values the simulation cannot run with, logging a warning for
    /// each one.
    pub fn validate(&mut self) {
        let screen = ScreenConfig::default();
        if self.screen.fps == 0 {
            tracing::warn!("screen.fps must be > 0, using {}", screen.fps);
            self.screen.fps = screen.fps;
        }
        positive(&mut self.screen.width, screen.width, "screen.width");
        positive(&mut self.screen.height, screen.height, "screen.height");

        let player = PlayerConfig::default();
        positive(&mut self.player.width, player.width, "player.width");
        positive(&mut self.player.height, player.height, "player.height");

        let enemy = EnemyConfig::default();
        positive(&mut self.enemy.width, enemy.width, "enemy.width");
        positive(&mut self.enemy.height, enemy.height, "enemy.height");

        let projectile = ProjectileConfig::default();
        positive(&mut self.projectile.width, projectile.width, "projectile.width");
        positive(&mut self.projectile.height, projectile.height, "projectile.height");

        positive(
            &mut self.collectible.size,
            CollectibleConfig::default().size,
            "collectible.size",
        );

        let obstacle = ObstacleConfig::default();
        positive(&mut self.obstacle.width, obstacle.width, "obstacle.width");
        positive(&mut self.obstacle.height, obstacle.height, "obstacle.height");

        let powerup = PowerUpConfig::default();
        if !(0.0..=1.0).contains(&self.powerup.drop_chance) {
            tracing::warn!(
                "powerup.drop_chance must be within [0, 1], got {}, using {}",
                self.powerup.drop_chance,
                powerup.drop_chance
            );
            self.powerup.drop_chance = powerup.drop_chance;
        }
        if self.powerup.min_spawned > self.powerup.max_spawned {
            tracing::warn!(
                "powerup.min_spawned ({}) exceeds max_spawned ({}), using {}..={}",
                self.powerup.min_spawned,
                self.powerup.max_spawned,
                powerup.min_spawned,
                powerup.max_spawned
            );
            self.powerup.min_spawned = powerup.min_spawned;
            self.powerup.max_spawned = powerup.max_spawned;
        }
        if self.powerup.invincibility_ms == 0 {
            tracing::warn!(
                "powerup.invincibility_ms must be > 0, using {}",
                powerup.invincibility_ms
            );
            self.powerup.invincibility_ms = powerup.invincibility_ms;
        }
    }
}

/// Sizes must be finite and strictly positive.
fn positive(value: &mut f64, default: f64, name: &str) {
    if !value.is_finite() || *value <= 0.0 {
        tracing::warn!("{name} must be a positive number, got {value}, using {default}");
        *value = default;
    }
}
