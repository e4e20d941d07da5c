mod audio;
mod autopilot;
mod config;
mod hud;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use miniplat_core::game_trait::Game;
use miniplat_core::input::InputFrame;
use miniplat_game::{GameConfig, GameSession, Renderer};

use audio::TaskAudio;
use autopilot::Autopilot;
use config::HostConfig;
use hud::TextRenderer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("miniplat starting");

    let host = HostConfig::load();
    let game_config = GameConfig::load();
    let audio = TaskAudio::new(tokio::runtime::Handle::current());
    let mut session = GameSession::new(game_config).with_audio(Arc::new(audio));

    run(&mut session, &host).await;
    tracing::info!("miniplat stopped");
}

/// Fixed-rate loop: input, update, render once per tick until the game asks
/// to quit, the tick budget runs out, or Ctrl-C.
async fn run(session: &mut GameSession, host: &HostConfig) {
    let tick_interval = Duration::from_secs_f32(1.0 / session.tick_rate());
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut pilot = Autopilot::new();
    let mut renderer = TextRenderer::new(host.hud_every);
    let mut tick: u64 = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let input = if host.autopilot {
                    pilot.next_frame(session.state())
                } else {
                    InputFrame::idle()
                };
                session.handle_input(input);
                session.update();
                renderer.draw(&session.render());

                tick += 1;
                if session.is_quit_requested() {
                    tracing::info!(tick, "Quit requested");
                    break;
                }
                if host.max_ticks > 0 && tick >= host.max_ticks {
                    tracing::info!(tick, "Tick budget reached");
                    break;
                }
            },
            _ = &mut shutdown => {
                tracing::info!(tick, "Interrupted");
                break;
            },
        }
    }
}
