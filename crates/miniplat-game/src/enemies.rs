use serde::{Deserialize, Serialize};

use miniplat_core::audio::{AudioCue, AudioCueQueue};
use miniplat_core::events;
use miniplat_core::time::{Cooldown, Millis};

use crate::config::GameConfig;
use crate::kinematics::Body;
use crate::projectile::Projectile;

/// Enemy variant with its type-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks back and forth across the screen.
    Patroller,
    /// Patrols until `enter_shell`, then slides at double speed for good.
    ShellToggle { in_shell: bool },
    /// Patrols while bobbing vertically.
    Flyer,
    /// Paces a short stretch and fires at the player on a cooldown.
    Shooter { cooldown: Cooldown },
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Patroller => "Goomba",
            EnemyKind::ShellToggle { .. } => "Koopa",
            EnemyKind::Flyer => "FlyingEnemy",
            EnemyKind::Shooter { .. } => "Shooter",
        }
    }
}

/// Per-tick inputs shared by all enemy updates.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTick<'a> {
    pub now: Millis,
    pub player_x: f64,
    pub cfg: &'a GameConfig,
}

/// Output channels an enemy update may write to.
pub struct EnemyOutput<'a> {
    pub projectiles: &'a mut Vec<Projectile>,
    pub cues: &'a mut AudioCueQueue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub active: bool,
    pub moving_right: bool,
    /// Patrol speed in units per tick.
    pub speed: f64,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn patroller(x: f64, y: f64, cfg: &GameConfig) -> Self {
        Self::with_kind(x, y, cfg.enemy.speed, true, EnemyKind::Patroller, cfg)
    }

    pub fn shell_toggle(x: f64, y: f64, cfg: &GameConfig) -> Self {
        let speed = cfg.enemy.speed * cfg.enemy.koopa_speed_factor;
        Self::with_kind(x, y, speed, true, EnemyKind::ShellToggle { in_shell: false }, cfg)
    }

    pub fn flyer(x: f64, y: f64, cfg: &GameConfig) -> Self {
        let speed = cfg.enemy.speed * cfg.enemy.flyer_speed_factor;
        Self::with_kind(x, y, speed, true, EnemyKind::Flyer, cfg)
    }

    /// Shooter whose first shot comes one full cooldown after `now`.
    pub fn shooter(x: f64, y: f64, now: Millis, cfg: &GameConfig) -> Self {
        let kind = EnemyKind::Shooter {
            cooldown: Cooldown::started_at(cfg.enemy.shoot_cooldown_ms, now),
        };
        Self::with_kind(x, y, cfg.enemy.shooter_speed, false, kind, cfg)
    }

    fn with_kind(
        x: f64,
        y: f64,
        speed: f64,
        moving_right: bool,
        kind: EnemyKind,
        cfg: &GameConfig,
    ) -> Self {
        events::gameplay(&format!("{} enemy created at ({x}, {y})", kind.name()));
        Self {
            body: Body::new(x, y, cfg.enemy.width, cfg.enemy.height),
            active: true,
            moving_right,
            speed,
            kind,
        }
    }

    /// Build an enemy from its content name. Unknown names become a
    /// Patroller with a warning.
    pub fn from_name(name: &str, x: f64, y: f64, now: Millis, cfg: &GameConfig) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "goomba" => Self::patroller(x, y, cfg),
            "koopa" => Self::shell_toggle(x, y, cfg),
            "flying" => Self::flyer(x, y, cfg),
            "shooter" => Self::shooter(x, y, now, cfg),
            _ => {
                tracing::warn!("Unknown enemy type: {name}, creating Goomba instead");
                Self::patroller(x, y, cfg)
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_in_shell(&self) -> bool {
        matches!(self.kind, EnemyKind::ShellToggle { in_shell: true })
    }

    /// Switch a ShellToggle into shell mode. Ignored by other kinds.
    pub fn enter_shell(&mut self) {
        if let EnemyKind::ShellToggle { in_shell } = &mut self.kind
            && !*in_shell
        {
            *in_shell = true;
            events::gameplay("Koopa entered shell mode");
        }
    }

    pub fn defeat(&mut self) {
        self.active = false;
    }

    fn signed_speed(&self) -> f64 {
        if self.moving_right { self.speed } else { -self.speed }
    }

    /// Reverse at the screen edges: `x < 0` or `x > width - w`.
    fn bounce_off_screen(&mut self, screen_width: f64) {
        if self.body.x < 0.0 {
            self.moving_right = true;
        } else if self.body.x > screen_width - self.body.w {
            self.moving_right = false;
        }
    }

    pub fn update(&mut self, tick: &EnemyTick<'_>, out: &mut EnemyOutput<'_>) {
        if !self.active {
            return;
        }
        let enemy = &tick.cfg.enemy;
        let screen_width = tick.cfg.screen.width;

        let fire = match &mut self.kind {
            EnemyKind::Shooter { cooldown } => cooldown.try_trigger(tick.now),
            _ => false,
        };

        self.body.vx = match self.kind {
            EnemyKind::ShellToggle { in_shell: true } => self.signed_speed() * 2.0,
            _ => self.signed_speed(),
        };
        if self.kind == EnemyKind::Flyer {
            let phase = tick.now as f64 / enemy.flyer_period_ms;
            self.body.vy = phase.sin() * enemy.flyer_amplitude * 0.1;
        }
        self.body.integrate();

        match self.kind {
            EnemyKind::Shooter { .. } => {
                if self.body.x < enemy.shooter_min_x
                    || self.body.x > screen_width - enemy.shooter_margin_right
                {
                    self.moving_right = !self.moving_right;
                }
            },
            _ => self.bounce_off_screen(screen_width),
        }

        if fire {
            self.shoot(tick, out);
        }
    }

    fn shoot(&self, tick: &EnemyTick<'_>, out: &mut EnemyOutput<'_>) {
        let speed = tick.cfg.projectile.speed;
        let vx = if tick.player_x < self.body.x { -speed } else { speed };
        out.projectiles.push(Projectile::new(
            self.body.center_x(),
            self.body.center_y(),
            vx,
            &tick.cfg.projectile,
        ));
        out.cues.push(AudioCue::Shoot);
        events::gameplay("Shooter fired projectile towards player");
    }
}

/// Default enemy placement for the classic level: (type, x, y).
pub const SPAWN_TABLE: [(&str, f64, f64); 6] = [
    ("goomba", 350.0, 518.0),
    ("koopa", 550.0, 518.0),
    ("shooter", 650.0, 418.0),
    ("flying", 400.0, 250.0),
    ("shooter", 750.0, 418.0),
    ("goomba", 150.0, 518.0),
];

/// Instantiate every entry of [`SPAWN_TABLE`].
pub fn spawn_default(now: Millis, cfg: &GameConfig) -> Vec<Enemy> {
    SPAWN_TABLE
        .iter()
        .map(|(name, x, y)| Enemy::from_name(name, *x, *y, now, cfg))
        .collect()
}
