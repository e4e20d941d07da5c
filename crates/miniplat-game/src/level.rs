use serde::{Deserialize, Serialize};

use miniplat_core::events;
use miniplat_core::geometry::Aabb;
use miniplat_core::time::Millis;

use crate::config::GameConfig;
use crate::powerups::PowerUpKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spike,
    Fire,
}

impl ObstacleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Fire => "fire",
        }
    }

    /// Parse a content name. Unknown names become a spike with a warning.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "spike" => ObstacleKind::Spike,
            "fire" => ObstacleKind::Fire,
            _ => {
                tracing::warn!("Unknown obstacle type: {name}, creating spike instead");
                ObstacleKind::Spike
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    PowerUp(PowerUpKind),
}

impl CollectibleKind {
    pub fn name(&self) -> &'static str {
        match self {
            CollectibleKind::Coin => "coin",
            CollectibleKind::PowerUp(kind) => kind.id(),
        }
    }

    /// Parse a content name. Unknown names become a coin with a warning.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("coin") {
            return CollectibleKind::Coin;
        }
        match PowerUpKind::from_id(name) {
            Some(kind) => CollectibleKind::PowerUp(kind),
            None => {
                tracing::warn!("Unknown collectible type: {name}, creating coin instead");
                CollectibleKind::Coin
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Aabb,
    pub active: bool,
}

impl Platform {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            bounds: Aabb::new(x, y, w, h),
            active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub active: bool,
    pub kind: ObstacleKind,
    /// Last animation tick, advanced every update for fire.
    pub animated_at: Millis,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, kind: ObstacleKind, cfg: &GameConfig) -> Self {
        Self {
            bounds: Aabb::new(x, y, cfg.obstacle.width, cfg.obstacle.height),
            active: true,
            kind,
            animated_at: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub bounds: Aabb,
    pub active: bool,
    pub kind: CollectibleKind,
    /// Score awarded on pickup. Zero for power-ups.
    pub value: u32,
}

impl Collectible {
    pub fn new(x: f64, y: f64, kind: CollectibleKind, cfg: &GameConfig) -> Self {
        let size = cfg.collectible.size;
        let value = match kind {
            CollectibleKind::Coin => cfg.collectible.coin_value,
            CollectibleKind::PowerUp(_) => 0,
        };
        Self {
            bounds: Aabb::new(x, y, size, size),
            active: true,
            kind,
            value,
        }
    }

    /// Deactivate on pickup. Returns false if it was already collected.
    pub fn collect(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        events::gameplay(&format!("Collected {}", self.kind.name()));
        true
    }
}

/// Node of the level scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Platform(Platform),
    Obstacle(Obstacle),
    Collectible(Collectible),
    Group(Level),
}

impl Component {
    pub fn bounds(&self) -> Aabb {
        match self {
            Component::Platform(p) => p.bounds,
            Component::Obstacle(o) => o.bounds,
            Component::Collectible(c) => c.bounds,
            Component::Group(level) => level.bounds,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Component::Platform(p) => p.active,
            Component::Obstacle(o) => o.active,
            Component::Collectible(c) => c.active,
            Component::Group(level) => level.active,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match self {
            Component::Platform(p) => p.active = active,
            Component::Obstacle(o) => o.active = active,
            Component::Collectible(c) => c.active = active,
            Component::Group(level) => level.active = active,
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        let bounds = match self {
            Component::Platform(p) => &mut p.bounds,
            Component::Obstacle(o) => &mut o.bounds,
            Component::Collectible(c) => &mut c.bounds,
            Component::Group(level) => &mut level.bounds,
        };
        bounds.x = x;
        bounds.y = y;
    }

    pub fn update(&mut self, now: Millis) {
        match self {
            Component::Obstacle(o) if o.kind == ObstacleKind::Fire => o.animated_at = now,
            Component::Group(level) => level.update(now),
            _ => {},
        }
    }

    /// Add a child. Only groups accept children; leaves ignore the call and
    /// return false.
    pub fn add(&mut self, child: Component) -> bool {
        match self {
            Component::Group(level) => {
                level.add(child);
                true
            },
            _ => false,
        }
    }
}

/// Ordered container of components. Insertion order is update and render
/// order. A level can itself be nested as a [`Component::Group`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub bounds: Aabb,
    pub active: bool,
    components: Vec<Component>,
}

impl Level {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            bounds: Aabb::new(0.0, 0.0, width, height),
            active: true,
            components: Vec::new(),
        }
    }

    pub fn add(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn remove(&mut self, index: usize) -> Option<Component> {
        (index < self.components.len()).then(|| self.components.remove(index))
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Update every active child, in insertion order.
    pub fn update(&mut self, now: Millis) {
        if !self.active {
            return;
        }
        for component in self.components.iter_mut().filter(|c| c.is_active()) {
            component.update(now);
        }
    }

    /// Every active leaf in render order, descending into active groups.
    pub fn active_leaves(&self) -> Vec<&Component> {
        let mut out = Vec::new();
        self.push_active_leaves(&mut out);
        out
    }

    fn push_active_leaves<'a>(&'a self, out: &mut Vec<&'a Component>) {
        if !self.active {
            return;
        }
        for component in self.components.iter().filter(|c| c.is_active()) {
            match component {
                Component::Group(level) => level.push_active_leaves(out),
                leaf => out.push(leaf),
            }
        }
    }

    /// Bounds of every active platform.
    pub fn active_platforms(&self) -> Vec<Aabb> {
        self.active_leaves()
            .into_iter()
            .filter_map(|c| match c {
                Component::Platform(p) => Some(p.bounds),
                _ => None,
            })
            .collect()
    }

    pub fn active_obstacles(&self) -> Vec<&Obstacle> {
        self.active_leaves()
            .into_iter()
            .filter_map(|c| match c {
                Component::Obstacle(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    /// Mutable handles to every active collectible, in render order.
    pub fn active_collectibles_mut(&mut self) -> Vec<&mut Collectible> {
        let mut out = Vec::new();
        Self::collect_collectibles(&mut self.components, self.active, &mut out);
        out
    }

    fn collect_collectibles<'a>(
        components: &'a mut [Component],
        active: bool,
        out: &mut Vec<&'a mut Collectible>,
    ) {
        if !active {
            return;
        }
        for component in components.iter_mut() {
            match component {
                Component::Collectible(c) if c.active => out.push(c),
                Component::Group(level) => {
                    Self::collect_collectibles(&mut level.components, level.active, out)
                },
                _ => {},
            }
        }
    }

    pub fn count_active_collectibles(&self) -> usize {
        self.active_leaves()
            .iter()
            .filter(|c| matches!(c, Component::Collectible(_)))
            .count()
    }
}
