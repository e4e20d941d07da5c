use miniplat_game::render::{DrawItem, Frame, Hud, Renderer};
use miniplat_game::GameState;

/// One-line summary of a frame.
pub fn format_frame(frame: &Frame) -> String {
    match frame.state {
        GameState::Menu { selected } => format!("MENU [{selected:?}]"),
        GameState::GameOver { score } => format!("GAME OVER  score {score}"),
        GameState::Victory { score, elapsed_ms } => {
            format!("VICTORY  score {score}  time {}s", elapsed_ms / 1000)
        },
        GameState::Playing | GameState::Paused => {
            let enemies = frame
                .items
                .iter()
                .filter(|i| matches!(i, DrawItem::Enemy { .. }))
                .count();
            let hud = frame.hud.as_ref().map(format_hud).unwrap_or_default();
            let paused = if frame.state == GameState::Paused {
                "  [PAUSED]"
            } else {
                ""
            };
            format!("{hud}  enemies {enemies}{paused}")
        },
    }
}

fn format_hud(hud: &Hud) -> String {
    let power_ups = if hud.power_ups.is_empty() {
        "-".to_string()
    } else {
        hud.power_ups.join(" ")
    };
    format!(
        "score {}  lives {}  time {}s  power-ups {}",
        hud.score, hud.lives, hud.elapsed_secs, power_ups
    )
}

/// Logs a HUD line every `every` frames, and immediately whenever the game
/// state changes.
#[derive(Debug)]
pub struct TextRenderer {
    every: u64,
    frames: u64,
    last_state: Option<&'static str>,
}

impl TextRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last_state: None,
        }
    }

    fn should_print(&mut self, frame: &Frame) -> bool {
        let name = frame.state.name();
        let changed = self.last_state != Some(name);
        self.last_state = Some(name);
        let due = self.frames % self.every == 0;
        self.frames += 1;
        changed || (due && frame.hud.is_some())
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &Frame) {
        if self.should_print(frame) {
            tracing::info!("{}", format_frame(frame));
        }
    }
}
