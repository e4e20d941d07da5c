//! Fire-and-forget audio: every cue becomes its own tokio task.
//!
//! Synthesis is not done here. The task works out the tone for the cue and
//! logs it, which is where a real output device would be driven.

use miniplat_core::audio::{AudioCue, AudioSink};
use tokio::runtime::Handle;

/// What a cue sounds like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    /// Linear frequency sweep.
    Sweep {
        start_hz: f64,
        end_hz: f64,
        duration_ms: u32,
    },
    /// Notes played back to back: (frequency, duration, volume).
    Notes(&'static [(f64, u32, f64)]),
}

impl Tone {
    pub fn for_cue(cue: AudioCue) -> Self {
        match cue {
            AudioCue::Jump => Tone::Sweep {
                start_hz: 400.0,
                end_hz: 800.0,
                duration_ms: 150,
            },
            AudioCue::Coin => Tone::Notes(&[(987.77, 50, 0.5), (1318.51, 100, 0.5)]),
            AudioCue::Damage => Tone::Sweep {
                start_hz: 200.0,
                end_hz: 50.0,
                duration_ms: 300,
            },
            AudioCue::Shoot => Tone::Sweep {
                start_hz: 600.0,
                end_hz: 300.0,
                duration_ms: 50,
            },
            AudioCue::EnemyDefeat => Tone::Sweep {
                start_hz: 300.0,
                end_hz: 100.0,
                duration_ms: 200,
            },
            AudioCue::PowerUp => {
                Tone::Notes(&[(440.0, 50, 0.4), (554.0, 50, 0.4), (659.0, 100, 0.4)])
            },
        }
    }

    pub fn duration_ms(&self) -> u32 {
        match self {
            Tone::Sweep { duration_ms, .. } => *duration_ms,
            Tone::Notes(notes) => notes.iter().map(|(_, ms, _)| ms).sum(),
        }
    }
}

/// Sink that spawns one task per cue on the given runtime. Results are
/// never awaited.
#[derive(Debug, Clone)]
pub struct TaskAudio {
    runtime: Handle,
}

impl TaskAudio {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl AudioSink for TaskAudio {
    fn play(&self, cue: AudioCue) {
        let _ = self.runtime.spawn(async move {
            let tone = Tone::for_cue(cue);
            tracing::debug!(cue = cue.name(), duration_ms = tone.duration_ms(), ?tone, "audio cue");
        });
    }
}
