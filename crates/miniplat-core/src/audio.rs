use serde::{Deserialize, Serialize};

/// Named sound cues the simulation can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Jump,
    Coin,
    Damage,
    Shoot,
    EnemyDefeat,
    PowerUp,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::Coin => "coin",
            AudioCue::Damage => "damage",
            AudioCue::Shoot => "shoot",
            AudioCue::EnemyDefeat => "enemyDefeat",
            AudioCue::PowerUp => "powerup",
        }
    }
}

/// Fire-and-forget consumer of audio cues.
///
/// Implementations must not block and must swallow their own failures.
pub trait AudioSink: Send + Sync {
    fn play(&self, cue: AudioCue);
}

/// Sink that discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&self, _cue: AudioCue) {}
}

/// Cues raised during a tick, flushed to a sink once the tick is done.
#[derive(Debug, Clone, Default)]
pub struct AudioCueQueue {
    cues: Vec<AudioCue>,
}

impl AudioCueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn pending(&self) -> &[AudioCue] {
        &self.cues
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AudioCue> + '_ {
        self.cues.drain(..)
    }

    /// Hand every queued cue to `sink` in the order raised.
    pub fn flush(&mut self, sink: &dyn AudioSink) {
        for cue in self.cues.drain(..) {
            sink.play(cue);
        }
    }
}
