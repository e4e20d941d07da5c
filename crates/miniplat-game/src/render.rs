//! Render-view extraction. The simulation never draws; it hands the renderer
//! a [`Frame`] describing everything visible this tick.

use serde::Serialize;

use miniplat_core::geometry::Aabb;
use miniplat_core::time::Millis;

use crate::game_state::GameState;
use crate::level::{CollectibleKind, Component, ObstacleKind};
use crate::player::{Facing, PlayerState};
use crate::powerups::Capabilities;
use crate::scoring::elapsed_secs;
use crate::session::World;

/// One drawable thing, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawItem {
    Platform {
        bounds: Aabb,
    },
    Obstacle {
        bounds: Aabb,
        kind: ObstacleKind,
        animated_at: Millis,
    },
    Collectible {
        bounds: Aabb,
        kind: CollectibleKind,
    },
    Enemy {
        bounds: Aabb,
        kind: &'static str,
        moving_right: bool,
        in_shell: bool,
    },
    Player {
        bounds: Aabb,
        state: PlayerState,
        facing: Facing,
        capabilities: Capabilities,
        jump_started_at: Option<Millis>,
        last_damage_at: Option<Millis>,
    },
    Projectile {
        bounds: Aabb,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub elapsed_secs: u64,
    /// Active capability labels: Speed, Shield, Weapon, DoubleJump, Invincible.
    pub power_ups: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub state: GameState,
    pub now: Millis,
    /// World contents; empty outside Playing and Pause.
    pub items: Vec<DrawItem>,
    pub hud: Option<Hud>,
}

/// Consumer of rendered frames.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame);
}

/// Build the frame for `state`. The world is drawn while playing or paused:
/// level components, then enemies, the player and projectiles.
pub fn build_frame(state: &GameState, world: Option<&World>, now: Millis) -> Frame {
    let visible = matches!(state, GameState::Playing | GameState::Paused);
    match world {
        Some(world) if visible => Frame {
            state: *state,
            now,
            items: draw_items(world, now),
            hud: Some(hud(world, now)),
        },
        _ => Frame {
            state: *state,
            now,
            items: Vec::new(),
            hud: None,
        },
    }
}

fn draw_items(world: &World, now: Millis) -> Vec<DrawItem> {
    let mut items: Vec<DrawItem> = world
        .level
        .active_leaves()
        .into_iter()
        .filter_map(|component| match component {
            Component::Platform(p) => Some(DrawItem::Platform { bounds: p.bounds }),
            Component::Obstacle(o) => Some(DrawItem::Obstacle {
                bounds: o.bounds,
                kind: o.kind,
                animated_at: o.animated_at,
            }),
            Component::Collectible(c) => Some(DrawItem::Collectible {
                bounds: c.bounds,
                kind: c.kind,
            }),
            Component::Group(_) => None,
        })
        .collect();

    items.extend(world.enemies.iter().filter(|e| e.active).map(|e| DrawItem::Enemy {
        bounds: e.body.aabb(),
        kind: e.name(),
        moving_right: e.moving_right,
        in_shell: e.is_in_shell(),
    }));

    let player = &world.player;
    items.push(DrawItem::Player {
        bounds: player.body.aabb(),
        state: player.state,
        facing: player.facing,
        capabilities: player.chain.capabilities(now),
        jump_started_at: player.jump_started_at,
        last_damage_at: player.damage_cooldown.last,
    });

    items.extend(
        world
            .projectiles
            .iter()
            .filter(|p| p.active)
            .map(|p| DrawItem::Projectile {
                bounds: p.body.aabb(),
            }),
    );
    items
}

fn hud(world: &World, now: Millis) -> Hud {
    Hud {
        score: world.score.value(),
        lives: world.player.lives,
        elapsed_secs: elapsed_secs(world.started_at, now),
        power_ups: world.player.chain.capabilities(now).labels(),
    }
}
