use crate::input::InputFrame;

/// Core trait a simulation must implement to be driven by the host loop.
///
/// The host owns the clock tick, the input device, the renderer and the audio
/// output; the game only handles game-specific logic.
pub trait Game: Send {
    /// Per-frame view handed to the renderer.
    type View;

    /// Deliver the held button state for this tick.
    fn handle_input(&mut self, input: InputFrame);

    /// Advance the simulation by one tick.
    fn update(&mut self);

    /// Extract everything a renderer needs to draw the current frame.
    fn render(&self) -> Self::View;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Whether the player asked to leave the game.
    fn is_quit_requested(&self) -> bool;

    /// Serialize the full simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore state produced by [`Game::serialize_state`]. Malformed input
    /// leaves the current state untouched.
    fn apply_state(&mut self, state: &[u8]);

    /// Discard the current run and start over from the initial state.
    fn reset(&mut self);
}
