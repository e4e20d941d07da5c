use serde::{Deserialize, Serialize};

use miniplat_core::audio::{AudioCue, AudioCueQueue};
use miniplat_core::events::{self, Entity};
use miniplat_core::input::TickInput;
use miniplat_core::time::{Cooldown, Millis};

use crate::config::GameConfig;
use crate::kinematics::Body;
use crate::powerups::{ModifierParams, PowerUpChain, PowerUpKind};

/// Behavioral state of the player character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
    Attacking { started_at: Millis },
    Dead,
}

impl PlayerState {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "IDLE",
            PlayerState::Running => "RUNNING",
            PlayerState::Jumping => "JUMPING",
            PlayerState::Attacking { .. } => "ATTACKING",
            PlayerState::Dead => "DEAD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Result of a call to [`Player::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still inside the damage cooldown, or already dead.
    Ignored,
    ShieldAbsorbed,
    LifeLost { remaining: u32 },
    Died,
}

impl DamageOutcome {
    pub fn lost_life(&self) -> bool {
        matches!(self, DamageOutcome::LifeLost { .. } | DamageOutcome::Died)
    }
}

/// Per-player constants copied out of [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    pub gravity: f64,
    pub jump_force: f64,
    pub move_speed: f64,
    pub screen_width: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub attack_duration_ms: Millis,
    pub modifiers: ModifierParams,
}

impl PlayerTuning {
    pub fn from_config(cfg: &GameConfig) -> Self {
        Self {
            gravity: cfg.physics.gravity,
            jump_force: cfg.physics.jump_force,
            move_speed: cfg.physics.move_speed,
            screen_width: cfg.screen.width,
            start_x: cfg.player.start_x,
            start_y: cfg.player.start_y,
            attack_duration_ms: cfg.player.attack_duration_ms,
            modifiers: ModifierParams {
                speed_multiplier: cfg.powerup.speed_multiplier,
                invincibility_ms: cfg.powerup.invincibility_ms,
            },
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub chain: PowerUpChain,
    pub state: PlayerState,
    pub facing: Facing,
    pub on_ground: bool,
    /// Set once the double-jump air jump has been spent this airborne period.
    pub air_jump_used: bool,
    pub damage_cooldown: Cooldown,
    pub jump_started_at: Option<Millis>,
    #[serde(skip)]
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(cfg: &GameConfig) -> Self {
        let tuning = PlayerTuning::from_config(cfg);
        events::gameplay(&format!(
            "Player created at position ({}, {})",
            tuning.start_x, tuning.start_y
        ));
        Self {
            body: Body::new(tuning.start_x, tuning.start_y, cfg.player.width, cfg.player.height),
            lives: cfg.player.max_lives,
            chain: PowerUpChain::new(),
            state: PlayerState::Idle,
            facing: Facing::Right,
            on_ground: false,
            air_jump_used: false,
            damage_cooldown: Cooldown::new(cfg.player.damage_cooldown_ms),
            jump_started_at: None,
            tuning,
        }
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Tuning is not part of the serialized player; restore it after decoding.
    pub fn set_tuning(&mut self, tuning: PlayerTuning) {
        self.tuning = tuning;
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn is_invincible(&self, now: Millis) -> bool {
        self.chain.is_invincible(now)
    }

    fn set_state(&mut self, next: PlayerState) {
        if self.state.name() != next.name() {
            events::state_changed(Entity::Player, self.state.name(), next.name());
        }
        self.state = next;
    }

    /// Apply this tick's input according to the current state.
    pub fn handle_input(&mut self, input: &TickInput, now: Millis, cues: &mut AudioCueQueue) {
        match self.state {
            PlayerState::Idle | PlayerState::Running => {
                if input.jump_pressed && self.jump(now, cues) {
                    self.set_state(PlayerState::Jumping);
                } else if input.attack_pressed {
                    self.attack();
                    self.set_state(PlayerState::Attacking { started_at: now });
                } else if input.direction() == 0 {
                    if self.state == PlayerState::Running {
                        self.stop_moving();
                        self.set_state(PlayerState::Idle);
                    }
                } else {
                    self.apply_direction(input.direction());
                    self.set_state(PlayerState::Running);
                }
            },
            PlayerState::Jumping => {
                self.apply_direction(input.direction());
                if input.jump_pressed {
                    self.jump(now, cues);
                }
            },
            PlayerState::Attacking { .. } => {
                self.apply_direction(input.direction());
                if input.jump_pressed && self.jump(now, cues) {
                    self.set_state(PlayerState::Jumping);
                }
            },
            PlayerState::Dead => {},
        }
    }

    /// One tick of motion followed by the state's own update.
    pub fn update(&mut self, now: Millis) {
        if self.is_dead() {
            return;
        }
        if !self.on_ground {
            self.body.apply_gravity(self.tuning.gravity);
        }
        self.body.integrate();

        let max_x = self.tuning.screen_width - self.body.w;
        if self.body.x < 0.0 || self.body.x > max_x {
            self.body.x = self.body.x.clamp(0.0, max_x.max(0.0));
            if self.on_ground {
                self.on_ground = false;
                events::gameplay("Player fell off platform at border");
            }
        }

        match self.state {
            PlayerState::Idle => self.stop_moving(),
            PlayerState::Running => {},
            PlayerState::Jumping => {
                if self.on_ground {
                    self.set_state(self.grounded_state());
                }
            },
            PlayerState::Attacking { started_at } => {
                if now.saturating_sub(started_at) > self.tuning.attack_duration_ms {
                    let next = if self.on_ground {
                        self.grounded_state()
                    } else {
                        PlayerState::Jumping
                    };
                    self.set_state(next);
                }
            },
            PlayerState::Dead => {},
        }
    }

    fn grounded_state(&self) -> PlayerState {
        if self.body.vx.abs() > 0.0 {
            PlayerState::Running
        } else {
            PlayerState::Idle
        }
    }

    fn apply_direction(&mut self, direction: i8) {
        match direction {
            d if d < 0 => self.move_left(),
            d if d > 0 => self.move_right(),
            _ => self.stop_moving(),
        }
    }

    /// Jump from the ground, or spend the air jump when double jump is held.
    /// Returns whether the jump happened.
    pub fn jump(&mut self, now: Millis, cues: &mut AudioCueQueue) -> bool {
        if !self.on_ground {
            if !self.chain.can_double_jump() || self.air_jump_used {
                return false;
            }
            self.air_jump_used = true;
        }
        self.body.vy = self.tuning.jump_force;
        self.on_ground = false;
        self.jump_started_at = Some(now);
        cues.push(AudioCue::Jump);
        events::gameplay("Player jumped");
        true
    }

    pub fn move_left(&mut self) {
        self.body.vx = -self.tuning.move_speed * self.chain.speed_multiplier();
        self.facing = Facing::Left;
    }

    pub fn move_right(&mut self) {
        self.body.vx = self.tuning.move_speed * self.chain.speed_multiplier();
        self.facing = Facing::Right;
    }

    pub fn stop_moving(&mut self) {
        self.body.vx = 0.0;
    }

    pub fn attack(&mut self) {
        if self.chain.has_weapon() {
            events::gameplay("Player attacked with weapon");
        }
    }

    /// Rest the player's bottom edge on `top`.
    pub fn land_on(&mut self, top: f64) {
        self.body.y = top - self.body.h;
        self.body.vy = 0.0;
        self.on_ground = true;
        self.air_jump_used = false;
    }

    /// Wrap the power-up chain with a new layer.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now: Millis) {
        self.chain.wrap(kind, self.tuning.modifiers, now);
    }

    /// Damage protocol: cooldown gate, then shield, then a life.
    pub fn take_damage(&mut self, now: Millis, cues: &mut AudioCueQueue) -> DamageOutcome {
        if self.is_dead() || !self.damage_cooldown.try_trigger(now) {
            return DamageOutcome::Ignored;
        }
        cues.push(AudioCue::Damage);
        if self.chain.has_shield() {
            self.chain.remove_shield();
            return DamageOutcome::ShieldAbsorbed;
        }
        self.lives = self.lives.saturating_sub(1);
        events::gameplay(&format!("Player took damage. Lives remaining: {}", self.lives));
        if self.lives == 0 {
            self.set_state(PlayerState::Dead);
            DamageOutcome::Died
        } else {
            DamageOutcome::LifeLost {
                remaining: self.lives,
            }
        }
    }

    /// Back to the start position, at rest and airborne, with the damage
    /// cooldown cleared.
    pub fn respawn(&mut self) {
        self.body.x = self.tuning.start_x;
        self.body.y = self.tuning.start_y;
        self.body.stop();
        self.on_ground = false;
        self.air_jump_used = false;
        self.damage_cooldown.reset();
        events::gameplay("Player respawned");
    }
}
