pub mod audio;
pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod powerup;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::audio::{AudioCue, AudioSink};
    use crate::game_trait::Game;
    use crate::input::InputFrame;
    use crate::time::{Clock, Millis};

    /// Clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock {
        now: Arc<AtomicU64>,
    }

    impl ManualClock {
        pub fn new(start: Millis) -> Self {
            Self {
                now: Arc::new(AtomicU64::new(start)),
            }
        }

        pub fn set(&self, now: Millis) {
            self.now.store(now, Ordering::SeqCst);
        }

        pub fn advance(&self, by: Millis) {
            self.now.fetch_add(by, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> Millis {
            self.now.load(Ordering::SeqCst)
        }
    }

    /// Audio sink that records every cue it receives. Clones share the log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAudio {
        cues: Arc<Mutex<Vec<AudioCue>>>,
    }

    impl RecordingAudio {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn cues(&self) -> Vec<AudioCue> {
            self.cues.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn count(&self, cue: AudioCue) -> usize {
            self.cues().iter().filter(|c| **c == cue).count()
        }

        pub fn clear(&self) {
            if let Ok(mut cues) = self.cues.lock() {
                cues.clear();
            }
        }
    }

    impl AudioSink for RecordingAudio {
        fn play(&self, cue: AudioCue) {
            if let Ok(mut cues) = self.cues.lock() {
                cues.push(cue);
            }
        }
    }

    pub fn press_left() -> InputFrame {
        InputFrame {
            left: true,
            ..Default::default()
        }
    }

    pub fn press_right() -> InputFrame {
        InputFrame {
            right: true,
            ..Default::default()
        }
    }

    pub fn press_jump() -> InputFrame {
        InputFrame {
            jump: true,
            ..Default::default()
        }
    }

    pub fn press_attack() -> InputFrame {
        InputFrame {
            attack: true,
            ..Default::default()
        }
    }

    pub fn press_pause() -> InputFrame {
        InputFrame {
            pause: true,
            ..Default::default()
        }
    }

    /// Feed `input` then an idle frame, so the next press is a fresh edge.
    pub fn tap<G: Game>(game: &mut G, input: InputFrame) {
        game.handle_input(input);
        game.handle_input(InputFrame::idle());
    }

    /// Run `n` ticks with no buttons held.
    pub fn run_idle_ticks<G: Game>(game: &mut G, n: usize) {
        for _ in 0..n {
            game.handle_input(InputFrame::idle());
            game.update();
        }
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every Game implementation must pass. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// serialize_state() must return non-empty bytes from the initial state.
    pub fn contract_state_is_serializable<G: Game>(game: &G) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// reset() must bring the state back to what a fresh game serializes to.
    pub fn contract_reset_restores_initial_state<G: Game>(game: &mut G, fresh: &G) {
        game.reset();
        assert_eq!(
            game.serialize_state(),
            fresh.serialize_state(),
            "reset must restore the initial state"
        );
    }

    /// apply_state(serialize_state()) must be lossless, and garbage must be
    /// ignored.
    pub fn contract_apply_state_roundtrip<G: Game>(source: &G, target: &mut G) {
        let data = source.serialize_state();
        target.apply_state(&data);
        assert_eq!(target.serialize_state(), data, "apply_state must restore serialized state");
        target.apply_state(&[0xc1, 0xff, 0x00]);
        assert_eq!(target.serialize_state(), data, "malformed state must be ignored");
    }

    /// A positive tick rate is required by the host loop.
    pub fn contract_tick_rate_positive<G: Game>(game: &G) {
        assert!(game.tick_rate() > 0.0, "tick_rate must be positive");
    }

}
