use miniplat_core::input::InputFrame;
use miniplat_game::GameState;

/// Ticks spent running in one direction before turning around.
const LEG_TICKS: u64 = 90;
/// A jump is pressed on every Nth tick while playing.
const JUMP_EVERY: u64 = 45;
const ATTACK_EVERY: u64 = 120;

/// Scripted input source: starts the game from the menu, runs back and forth
/// jumping and attacking, resumes if paused and quits once the run is over.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    tick: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_frame(&mut self, state: &GameState) -> InputFrame {
        let tick = self.tick;
        self.tick += 1;
        // Buttons alternate so each press is a fresh edge.
        let pulse = tick % 2 == 0;
        match state {
            GameState::Menu { .. } => InputFrame {
                attack: pulse,
                ..Default::default()
            },
            GameState::Playing => {
                let rightward = (tick / LEG_TICKS) % 2 == 0;
                InputFrame {
                    left: !rightward,
                    right: rightward,
                    jump: tick % JUMP_EVERY == 0,
                    attack: tick % ATTACK_EVERY == 0,
                    pause: false,
                }
            },
            GameState::Paused | GameState::GameOver { .. } | GameState::Victory { .. } => InputFrame {
                pause: pulse,
                ..Default::default()
            },
        }
    }
}
