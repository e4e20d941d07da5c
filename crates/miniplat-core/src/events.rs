//! Structured log events emitted by the simulation.
//!
//! These are observational only. Nothing in the game reads them back.

use tracing::{debug, info};

/// Which state machine a transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Player,
    Game,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Player => "Player",
            Entity::Game => "Game",
        }
    }
}

pub fn state_changed(entity: Entity, from: &str, to: &str) {
    info!(entity = entity.as_str(), from, to, "[STATE] {}: {from} -> {to}", entity.as_str());
}

/// A power-up layer was wrapped around `target`.
pub fn decorator_applied(decorator: &str, target: &str) {
    info!(decorator, target, "[DECORATOR] {decorator} applied to {target}");
}

pub fn decorator_removed(decorator: &str, target: &str) {
    info!(decorator, target, "[DECORATOR] {decorator} removed from {target}");
}

pub fn gameplay(message: &str) {
    info!("[GAMEPLAY] {message}");
}

/// Gameplay message for things that happen most ticks (landings, bounces).
pub fn gameplay_trace(message: &str) {
    debug!("[GAMEPLAY] {message}");
}
