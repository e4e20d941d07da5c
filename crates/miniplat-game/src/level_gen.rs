use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use miniplat_core::events;

use crate::config::GameConfig;
use crate::level::{Collectible, CollectibleKind, Component, Level, Obstacle, ObstacleKind, Platform};
use crate::powerups::PowerUpKind;

/// Supplies the initial level content for a session. Called once at session
/// start; the result is never regenerated mid-run.
pub trait LevelProvider: Send + Sync {
    fn build(&self, cfg: &GameConfig, rng: &mut StdRng) -> Level;
}

/// Ground strips with gaps: (x, y, w, h).
const GROUND: [(f64, f64, f64, f64); 3] = [
    (0.0, 550.0, 200.0, 50.0),
    (250.0, 550.0, 150.0, 50.0),
    (450.0, 550.0, 350.0, 50.0),
];

/// Floating platform height.
const LEDGE_HEIGHT: f64 = 20.0;

/// Floating platform rows: (y, [(x, w)]).
const LEDGES: [(f64, &[(f64, f64)]); 5] = [
    (450.0, &[(50.0, 120.0), (200.0, 100.0), (350.0, 120.0), (550.0, 100.0), (700.0, 100.0)]),
    (380.0, &[(100.0, 150.0), (300.0, 100.0), (450.0, 150.0), (650.0, 100.0)]),
    (300.0, &[(50.0, 100.0), (200.0, 120.0), (400.0, 100.0), (550.0, 120.0), (700.0, 100.0)]),
    (220.0, &[(150.0, 100.0), (300.0, 120.0), (500.0, 100.0), (650.0, 120.0)]),
    (150.0, &[(100.0, 80.0), (250.0, 80.0), (400.0, 80.0), (550.0, 80.0), (700.0, 80.0)]),
];

const COINS: [(f64, f64); 29] = [
    (100.0, 520.0), (150.0, 520.0), (300.0, 520.0), (500.0, 520.0), (600.0, 520.0), (700.0, 520.0),
    (100.0, 420.0), (200.0, 420.0), (350.0, 420.0), (550.0, 420.0), (700.0, 420.0),
    (150.0, 350.0), (300.0, 350.0), (450.0, 350.0), (650.0, 350.0),
    (100.0, 270.0), (250.0, 270.0), (400.0, 270.0), (550.0, 270.0), (700.0, 270.0),
    (150.0, 190.0), (300.0, 190.0), (500.0, 190.0), (650.0, 190.0),
    (100.0, 120.0), (250.0, 120.0), (400.0, 120.0), (550.0, 120.0), (700.0, 120.0),
];

const OBSTACLES: [(f64, f64, ObstacleKind); 5] = [
    (210.0, 568.0, ObstacleKind::Spike),
    (410.0, 568.0, ObstacleKind::Spike),
    (250.0, 420.0, ObstacleKind::Fire),
    (600.0, 350.0, ObstacleKind::Fire),
    (450.0, 120.0, ObstacleKind::Fire),
];

/// Weighted pool for placed power-ups; weapon appears twice.
const PLACED_POWER_UPS: [PowerUpKind; 6] = [
    PowerUpKind::Weapon,
    PowerUpKind::Weapon,
    PowerUpKind::Shield,
    PowerUpKind::DoubleJump,
    PowerUpKind::SpeedBoost,
    PowerUpKind::Invincibility,
];

/// Height above a platform top at which a placed power-up floats.
const POWER_UP_LIFT: f64 = 30.0;

/// The single hand-authored level: fixed platforms, coins and obstacles plus
/// a few randomly placed power-ups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicLevel;

impl ClassicLevel {
    fn platforms() -> Vec<Platform> {
        let ground = GROUND.iter().map(|&(x, y, w, h)| Platform::new(x, y, w, h));
        let ledges = LEDGES.iter().flat_map(|(y, row)| {
            row.iter()
                .map(move |&(x, w)| Platform::new(x, *y, w, LEDGE_HEIGHT))
        });
        ground.chain(ledges).collect()
    }

    /// Shuffle the platforms, take the first N (N drawn from the configured
    /// range) and float one power-up above a random spot on each.
    fn place_power_ups(
        platforms: &[Platform],
        cfg: &GameConfig,
        rng: &mut StdRng,
    ) -> Vec<Collectible> {
        let min = cfg.powerup.min_spawned;
        let max = cfg.powerup.max_spawned.max(min);
        let count = rng.random_range(min..=max);

        let mut candidates: Vec<&Platform> = platforms.iter().collect();
        candidates.shuffle(rng);

        let size = cfg.collectible.size;
        candidates
            .into_iter()
            .take(count)
            .map(|p| {
                let kind = PLACED_POWER_UPS[rng.random_range(0..PLACED_POWER_UPS.len())];
                let x = p.bounds.x + rng.random::<f64>() * (p.bounds.w - size);
                let y = p.bounds.y - POWER_UP_LIFT;
                events::gameplay(&format!(
                    "Spawned random power-up: {} at ({x:.1}, {y:.1})",
                    kind.id()
                ));
                Collectible::new(x, y, CollectibleKind::PowerUp(kind), cfg)
            })
            .collect()
    }
}

impl LevelProvider for ClassicLevel {
    fn build(&self, cfg: &GameConfig, rng: &mut StdRng) -> Level {
        let mut level = Level::new("Level 1", cfg.screen.width, cfg.screen.height);
        let platforms = Self::platforms();
        for platform in &platforms {
            level.add(Component::Platform(platform.clone()));
        }
        for &(x, y) in &COINS {
            level.add(Component::Collectible(Collectible::new(x, y, CollectibleKind::Coin, cfg)));
        }
        for collectible in Self::place_power_ups(&platforms, cfg, rng) {
            level.add(Component::Collectible(collectible));
        }
        for &(x, y, kind) in &OBSTACLES {
            level.add(Component::Obstacle(Obstacle::new(x, y, kind, cfg)));
        }
        events::gameplay("Level 1 created");
        level
    }
}
