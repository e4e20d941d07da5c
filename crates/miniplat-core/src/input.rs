use serde::{Deserialize, Serialize};

/// Held state of the five game buttons for one tick, already debounced by the
/// input source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub pause: bool,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Input resolved for the simulation: movement is level triggered, actions
/// fire only on the tick their button goes down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
    pub pause_pressed: bool,
}

impl TickInput {
    /// Horizontal direction requested: -1 left, 1 right, 0 for none or both.
    pub fn direction(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Remembers the previous frame so held buttons turn into just-pressed edges.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    prev: InputFrame,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, frame: InputFrame) -> TickInput {
        let tick = TickInput {
            left: frame.left,
            right: frame.right,
            jump_pressed: frame.jump && !self.prev.jump,
            attack_pressed: frame.attack && !self.prev.attack,
            pause_pressed: frame.pause && !self.prev.pause,
        };
        self.prev = frame;
        tick
    }

    /// Forget held buttons, e.g. after a reset, so a button still held from
    /// the previous run does not fire again.
    pub fn clear(&mut self) {
        self.prev = InputFrame::default();
    }
}
