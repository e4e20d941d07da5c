use serde::{Deserialize, Serialize};

use miniplat_core::events;
use miniplat_core::powerup::TimedEffect;
use miniplat_core::time::Millis;

/// Name of the unmodified character at the bottom of every chain.
pub const BASE_NAME: &str = "BasePlayer";

/// Power-up types a collectible can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    Shield,
    Weapon,
    DoubleJump,
    Invincibility,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::Weapon,
        PowerUpKind::DoubleJump,
        PowerUpKind::Invincibility,
    ];

    /// Name used in chain descriptions and decorator log events.
    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "SpeedBoost",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Weapon => "Weapon",
            PowerUpKind::DoubleJump => "DoubleJump",
            PowerUpKind::Invincibility => "Invincibility",
        }
    }

    /// Identifier used by level content (`"speedBoost"`, `"doubleJump"`...).
    pub fn id(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "speedBoost",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Weapon => "weapon",
            PowerUpKind::DoubleJump => "doubleJump",
            PowerUpKind::Invincibility => "invincibility",
        }
    }

    /// Case-insensitive lookup by content identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id))
    }
}

/// One layer of the power-up chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    SpeedBoost { multiplier: f64 },
    Shield { active: bool },
    Weapon,
    DoubleJump,
    Invincibility(TimedEffect),
}

impl Modifier {
    pub fn kind(&self) -> PowerUpKind {
        match self {
            Modifier::SpeedBoost { .. } => PowerUpKind::SpeedBoost,
            Modifier::Shield { .. } => PowerUpKind::Shield,
            Modifier::Weapon => PowerUpKind::Weapon,
            Modifier::DoubleJump => PowerUpKind::DoubleJump,
            Modifier::Invincibility(_) => PowerUpKind::Invincibility,
        }
    }
}

/// Tunables a new layer needs when it is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierParams {
    pub speed_multiplier: f64,
    pub invincibility_ms: Millis,
}

impl Default for ModifierParams {
    fn default() -> Self {
        Self {
            speed_multiplier: 2.0,
            invincibility_ms: 10_000,
        }
    }
}

/// Stack of modifiers wrapped around the base character, innermost first.
///
/// Capability queries fold over the layers from the outermost inward. Only
/// [`PowerUpChain::remove_shield`] mutates a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpChain {
    layers: Vec<Modifier>,
}

impl PowerUpChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[Modifier] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wrap the current chain in a new layer of `kind`.
    pub fn wrap(&mut self, kind: PowerUpKind, params: ModifierParams, now: Millis) {
        events::decorator_applied(kind.name(), &self.describe());
        let layer = match kind {
            PowerUpKind::SpeedBoost => Modifier::SpeedBoost {
                multiplier: params.speed_multiplier,
            },
            PowerUpKind::Shield => Modifier::Shield { active: true },
            PowerUpKind::Weapon => Modifier::Weapon,
            PowerUpKind::DoubleJump => Modifier::DoubleJump,
            PowerUpKind::Invincibility => {
                Modifier::Invincibility(TimedEffect::new(now, params.invincibility_ms))
            },
        };
        self.layers.push(layer);
    }

    /// Builder-style [`wrap`](Self::wrap) for constructing chains in one expression.
    pub fn wrapped(mut self, kind: PowerUpKind, params: ModifierParams, now: Millis) -> Self {
        self.wrap(kind, params, now);
        self
    }

    /// Product of every speed layer's multiplier.
    pub fn speed_multiplier(&self) -> f64 {
        self.layers
            .iter()
            .rev()
            .fold(1.0, |acc, layer| match layer {
                Modifier::SpeedBoost { multiplier } => acc * multiplier,
                _ => acc,
            })
    }

    pub fn has_shield(&self) -> bool {
        self.layers
            .iter()
            .rev()
            .any(|layer| matches!(layer, Modifier::Shield { active: true }))
    }

    /// Spend the outermost active shield. No-op when no shield is up.
    pub fn remove_shield(&mut self) -> bool {
        let Some(idx) = self
            .layers
            .iter()
            .rposition(|layer| matches!(layer, Modifier::Shield { active: true }))
        else {
            return false;
        };
        self.layers[idx] = Modifier::Shield { active: false };
        events::decorator_removed(
            PowerUpKind::Shield.name(),
            &Self::describe_layers(&self.layers[..idx]),
        );
        true
    }

    pub fn has_weapon(&self) -> bool {
        self.layers
            .iter()
            .rev()
            .any(|layer| matches!(layer, Modifier::Weapon))
    }

    pub fn can_double_jump(&self) -> bool {
        self.layers
            .iter()
            .rev()
            .any(|layer| matches!(layer, Modifier::DoubleJump))
    }

    /// Whether any invincibility layer is still inside its window at `now`.
    pub fn is_invincible(&self, now: Millis) -> bool {
        self.layers.iter().rev().any(|layer| match layer {
            Modifier::Invincibility(effect) => effect.is_active(now),
            _ => false,
        })
    }

    /// Nested name such as `Shield(SpeedBoost(BasePlayer))`.
    pub fn describe(&self) -> String {
        Self::describe_layers(&self.layers)
    }

    fn describe_layers(layers: &[Modifier]) -> String {
        layers.iter().fold(BASE_NAME.to_string(), |inner, layer| {
            format!("{}({inner})", layer.kind().name())
        })
    }

    /// Snapshot of every capability at `now`.
    pub fn capabilities(&self, now: Millis) -> Capabilities {
        Capabilities {
            speed_multiplier: self.speed_multiplier(),
            shield: self.has_shield(),
            weapon: self.has_weapon(),
            double_jump: self.can_double_jump(),
            invincible: self.is_invincible(now),
        }
    }
}

/// Capability flags resolved from a chain at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub speed_multiplier: f64,
    pub shield: bool,
    pub weapon: bool,
    pub double_jump: bool,
    pub invincible: bool,
}

impl Capabilities {
    /// Short labels for the HUD, in a fixed order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.speed_multiplier > 1.0 {
            labels.push("Speed");
        }
        if self.shield {
            labels.push("Shield");
        }
        if self.weapon {
            labels.push("Weapon");
        }
        if self.double_jump {
            labels.push("DoubleJump");
        }
        if self.invincible {
            labels.push("Invincible");
        }
        labels
    }
}
