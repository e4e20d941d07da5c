//! The game session: owns the world and drives it one tick at a time.
//!
//! There is exactly one session per run of the game. It is an ordinary value
//! constructed by the host; [`GameSession::reset`] throws the current run
//! away and returns to a freshly constructed menu.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use miniplat_core::audio::{AudioCueQueue, AudioSink, NullAudio};
use miniplat_core::events;
use miniplat_core::game_trait::Game;
use miniplat_core::input::{InputFrame, InputTracker};
use miniplat_core::time::{Clock, Millis, SystemClock};

use crate::collision::{self, CollisionContext};
use crate::config::GameConfig;
use crate::enemies::{self, Enemy, EnemyOutput, EnemyTick};
use crate::game_state::{self, Action, GameState};
use crate::level::Level;
use crate::level_gen::{ClassicLevel, LevelProvider};
use crate::player::{Player, PlayerTuning};
use crate::projectile::Projectile;
use crate::render::{self, Frame};
use crate::scoring::Score;

/// Everything that exists only while a run is in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    pub level: Level,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub score: Score,
    pub started_at: Millis,
    pub elapsed_ms: Millis,
}

impl World {
    /// A new run on `level`, with the default enemy spawn table.
    pub fn new(cfg: &GameConfig, level: Level, now: Millis) -> Self {
        Self {
            player: Player::new(cfg),
            level,
            enemies: enemies::spawn_default(now, cfg),
            projectiles: Vec::new(),
            score: Score::new(),
            started_at: now,
            elapsed_ms: 0,
        }
    }
}

/// Serializable view of the whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: GameState,
    pub world: Option<World>,
    pub quit_requested: bool,
}

fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub struct GameSession {
    cfg: GameConfig,
    clock: Arc<dyn Clock>,
    audio: Arc<dyn AudioSink>,
    levels: Box<dyn LevelProvider>,
    rng: StdRng,
    state: GameState,
    world: Option<World>,
    quit_requested: bool,
    input: InputTracker,
    cues: AudioCueQueue,
}

impl GameSession {
    /// Session on the system clock, with silent audio and the classic level.
    pub fn new(mut cfg: GameConfig) -> Self {
        cfg.validate();
        let rng = session_rng(cfg.seed);
        events::gameplay("Game session initialized");
        Self {
            cfg,
            clock: Arc::new(SystemClock::new()),
            audio: Arc::new(NullAudio),
            levels: Box::new(ClassicLevel),
            rng,
            state: GameState::menu(),
            world: None,
            quit_requested: false,
            input: InputTracker::new(),
            cues: AudioCueQueue::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_audio(mut self, audio: Arc<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_levels(mut self, levels: Box<dyn LevelProvider>) -> Self {
        self.levels = levels;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    /// Build a fresh world and enter Playing.
    pub fn start_game(&mut self) {
        let now = self.clock.now_ms();
        let level = self.levels.build(&self.cfg, &mut self.rng);
        self.world = Some(World::new(&self.cfg, level, now));
        events::gameplay("Game started");
        self.change_state(GameState::Playing);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            world: self.world.clone(),
            quit_requested: self.quit_requested,
        }
    }

    fn change_state(&mut self, next: GameState) {
        game_state::transition(&mut self.state, next);
    }

    /// One Playing tick: move everything, resolve contacts, then settle life
    /// loss, the playfield bounds and the victory condition in that order.
    fn step(&mut self, now: Millis) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let cfg = &self.cfg;

        world.player.update(now);
        let tick = EnemyTick {
            now,
            player_x: world.player.body.x,
            cfg,
        };
        let mut out = EnemyOutput {
            projectiles: &mut world.projectiles,
            cues: &mut self.cues,
        };
        for enemy in &mut world.enemies {
            enemy.update(&tick, &mut out);
        }
        world.level.update(now);
        for projectile in &mut world.projectiles {
            projectile.update(cfg.screen.width);
        }

        let lives_before = world.player.lives;
        let mut ctx = CollisionContext {
            now,
            cfg,
            rng: &mut self.rng,
            cues: &mut self.cues,
        };
        collision::resolve_all(
            &mut world.player,
            &mut world.enemies,
            &mut world.level,
            &mut world.projectiles,
            &mut world.score,
            &mut ctx,
        );

        let mut next = None;
        if world.player.lives < lives_before {
            next = respawn_or_game_over(&mut world.player, world.score);
        }
        if next.is_none()
            && collision::is_out_of_bounds(&world.player, cfg.screen.width, cfg.screen.height)
        {
            events::gameplay("Player fell out of bounds");
            world.player.take_damage(now, &mut self.cues);
            next = respawn_or_game_over(&mut world.player, world.score);
        }
        if next.is_none() && world.enemies.iter().all(|e| !e.active) {
            next = Some(GameState::Victory {
                score: world.score.value(),
                elapsed_ms: world.elapsed_ms,
            });
        }

        world.projectiles.retain(|p| p.active);

        if let Some(next) = next {
            self.change_state(next);
        }
    }
}

fn respawn_or_game_over(player: &mut Player, score: Score) -> Option<GameState> {
    if player.lives == 0 {
        Some(GameState::GameOver {
            score: score.value(),
        })
    } else {
        player.respawn();
        None
    }
}

impl Game for GameSession {
    type View = Frame;

    fn handle_input(&mut self, frame: InputFrame) {
        let input = self.input.resolve(frame);
        match self.state.on_input(&input) {
            Action::Stay => {},
            Action::Select(selected) => {
                self.state = GameState::Menu { selected };
            },
            Action::StartGame => self.start_game(),
            Action::Enter(next) => self.change_state(next),
            Action::Control => {
                let now = self.clock.now_ms();
                if let Some(world) = self.world.as_mut() {
                    world.player.handle_input(&input, now, &mut self.cues);
                }
            },
            Action::Quit => {
                events::gameplay("Quit requested");
                self.quit_requested = true;
            },
        }
    }

    fn update(&mut self) {
        let now = self.clock.now_ms();
        if matches!(self.state, GameState::Playing | GameState::Paused)
            && let Some(world) = self.world.as_mut()
        {
            world.elapsed_ms = now.saturating_sub(world.started_at);
        }
        if self.state.is_simulating() {
            self.step(now);
        }
        self.cues.flush(self.audio.as_ref());
    }

    fn render(&self) -> Frame {
        render::build_frame(&self.state, self.world.as_ref(), self.clock.now_ms())
    }

    fn tick_rate(&self) -> f32 {
        self.cfg.screen.fps as f32
    }

    fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.snapshot()).expect("session state serialization must succeed")
    }

    fn apply_state(&mut self, state: &[u8]) {
        if let Ok(snapshot) = rmp_serde::from_slice::<SessionSnapshot>(state) {
            let mut world = snapshot.world;
            if let Some(world) = world.as_mut() {
                world.player.set_tuning(PlayerTuning::from_config(&self.cfg));
            }
            self.state = snapshot.state;
            self.world = world;
            self.quit_requested = snapshot.quit_requested;
        }
    }

    fn reset(&mut self) {
        self.rng = session_rng(self.cfg.seed);
        self.state = GameState::menu();
        self.world = None;
        self.quit_requested = false;
        self.input.clear();
        self.cues.clear();
        events::gameplay("Game session reset");
    }
}

#[cfg(test)]
mod tests {
    use miniplat_core::audio::AudioCue;
    use miniplat_core::test_helpers::{
        ManualClock, RecordingAudio, contract_apply_state_roundtrip,
        contract_reset_restores_initial_state, contract_state_is_serializable,
        contract_tick_rate_positive, press_attack, press_jump, press_pause, press_right,
        run_idle_ticks, tap,
    };

    use super::*;
    use crate::game_state::MenuOption;
    use crate::level::{Component, Obstacle, ObstacleKind, Platform};
    use crate::player::PlayerState;
    use crate::powerups::{ModifierParams, PowerUpKind};

    /// One ground strip across the whole screen and nothing else.
    struct FlatLevel;

    impl LevelProvider for FlatLevel {
        fn build(&self, cfg: &GameConfig, _rng: &mut StdRng) -> Level {
            let mut level = Level::new("flat", cfg.screen.width, cfg.screen.height);
            level.add(Component::Platform(Platform::new(0.0, 550.0, 800.0, 50.0)));
            level
        }
    }

    fn test_config() -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.seed = Some(7);
        cfg.powerup.drop_chance = 0.0;
        cfg
    }

    fn session() -> (GameSession, ManualClock, RecordingAudio) {
        let clock = ManualClock::new(1_000);
        let audio = RecordingAudio::new();
        let session = GameSession::new(test_config())
            .with_clock(Arc::new(clock.clone()))
            .with_audio(Arc::new(audio.clone()))
            .with_levels(Box::new(FlatLevel));
        (session, clock, audio)
    }

    fn playing() -> (GameSession, ManualClock, RecordingAudio) {
        let (mut s, clock, audio) = session();
        s.start_game();
        (s, clock, audio)
    }

    fn world(s: &mut GameSession) -> &mut World {
        s.world_mut().expect("session has a world")
    }

    fn place_player(s: &mut GameSession, x: f64, y: f64) {
        let player = &mut world(s).player;
        player.body.x = x;
        player.body.y = y;
        player.body.vx = 0.0;
        player.body.vy = 0.0;
        player.on_ground = false;
    }

    fn defeat_all(s: &mut GameSession) {
        for enemy in &mut world(s).enemies {
            enemy.defeat();
        }
    }

    // ================================================================
    // Menu
    // ================================================================

    #[test]
    fn starts_in_menu_without_world() {
        let (s, _, _) = session();
        assert_eq!(*s.state(), GameState::menu());
        assert!(s.world().is_none());
        assert!(!s.is_quit_requested());
    }

    #[test]
    fn confirming_start_builds_a_world() {
        let (mut s, _, _) = session();
        tap(&mut s, press_attack());
        assert_eq!(*s.state(), GameState::Playing);
        let w = s.world().unwrap();
        assert_eq!(w.player.lives, 3);
        assert_eq!(w.enemies.len(), 6);
        assert_eq!(w.score.value(), 0);
        assert_eq!(w.started_at, 1_000);
    }

    #[test]
    fn selecting_quit_then_confirming_requests_quit() {
        let (mut s, _, _) = session();
        s.handle_input(press_pause());
        assert_eq!(
            *s.state(),
            GameState::Menu {
                selected: MenuOption::Quit
            }
        );
        s.handle_input(press_attack());
        assert!(s.is_quit_requested());
        assert!(s.world().is_none());
    }

    // ================================================================
    // Playing / Pause
    // ================================================================

    #[test]
    fn input_drives_the_player() {
        let (mut s, _, _) = playing();
        s.handle_input(press_right());
        let player = &s.world().unwrap().player;
        assert_eq!(player.body.vx, 5.0);
        assert_eq!(player.state, PlayerState::Running);
    }

    #[test]
    fn pause_freezes_the_world() {
        let (mut s, clock, _) = playing();
        tap(&mut s, press_pause());
        assert_eq!(*s.state(), GameState::Paused);
        let y = s.world().unwrap().player.body.y;
        clock.advance(100);
        s.update();
        assert_eq!(s.world().unwrap().player.body.y, y);

        tap(&mut s, press_pause());
        assert_eq!(*s.state(), GameState::Playing);
        s.update();
        assert!(s.world().unwrap().player.body.y > y);
    }

    #[test]
    fn resting_player_stays_put() {
        let (mut s, _, _) = playing();
        place_player(&mut s, 100.0, 502.0);
        world(&mut s).player.on_ground = true;
        s.update();
        let player = &s.world().unwrap().player;
        assert_eq!((player.body.x, player.body.y), (100.0, 502.0));
        assert!(player.on_ground);
    }

    #[test]
    fn jump_cue_reaches_the_sink() {
        let (mut s, _, audio) = playing();
        run_idle_ticks(&mut s, 40);
        assert!(s.world().unwrap().player.on_ground);
        s.handle_input(press_jump());
        s.update();
        assert_eq!(audio.count(AudioCue::Jump), 1);
        assert!(s.world().unwrap().player.body.vy < 0.0);
    }

    // ================================================================
    // Shooters and projectiles
    // ================================================================

    #[test]
    fn shooters_fire_once_cooldown_elapses() {
        let (mut s, clock, audio) = playing();
        clock.advance(1_999);
        s.update();
        assert!(s.world().unwrap().projectiles.is_empty());

        clock.advance(1);
        s.update();
        let w = s.world().unwrap();
        assert_eq!(w.projectiles.len(), 2);
        assert!(w.projectiles.iter().all(|p| p.body.vx < 0.0));
        assert_eq!(audio.count(AudioCue::Shoot), 2);
    }

    #[test]
    fn spent_projectiles_are_pruned() {
        let (mut s, _, _) = playing();
        let cfg = s.config().projectile.clone();
        world(&mut s)
            .projectiles
            .push(Projectile::new(799.0, 100.0, 4.0, &cfg));
        world(&mut s)
            .projectiles
            .push(Projectile::new(300.0, 100.0, 4.0, &cfg));
        s.update();
        let w = s.world().unwrap();
        assert_eq!(w.projectiles.len(), 1);
        assert_eq!(w.projectiles[0].body.x, 304.0);
    }

    // ================================================================
    // Life loss and game over
    // ================================================================

    fn add_spike(s: &mut GameSession, x: f64, y: f64) {
        let obstacle = Obstacle::new(x, y, ObstacleKind::Spike, &test_config());
        world(s).level.add(Component::Obstacle(obstacle));
    }

    #[test]
    fn life_loss_respawns_at_start() {
        let (mut s, _, audio) = playing();
        add_spike(&mut s, 400.0, 518.0);
        place_player(&mut s, 400.0, 480.0);
        world(&mut s).player.body.vx = 5.0;
        s.update();

        let player = &s.world().unwrap().player;
        assert_eq!(player.lives, 2);
        assert_eq!((player.body.x, player.body.y), (100.0, 400.0));
        assert_eq!((player.body.vx, player.body.vy), (0.0, 0.0));
        assert_eq!(player.damage_cooldown.last, None);
        assert_eq!(*s.state(), GameState::Playing);
        assert_eq!(audio.count(AudioCue::Damage), 1);
    }

    #[test]
    fn last_life_ends_the_game_with_exact_score() {
        let (mut s, _, _) = playing();
        add_spike(&mut s, 400.0, 518.0);
        place_player(&mut s, 400.0, 480.0);
        world(&mut s).player.lives = 1;
        world(&mut s).score.add(40);
        s.update();
        assert_eq!(*s.state(), GameState::GameOver { score: 40 });
    }

    #[test]
    fn game_over_wins_over_victory_in_the_same_tick() {
        let (mut s, _, _) = playing();
        add_spike(&mut s, 400.0, 518.0);
        place_player(&mut s, 400.0, 480.0);
        world(&mut s).player.lives = 1;
        defeat_all(&mut s);
        s.update();
        assert_eq!(*s.state(), GameState::GameOver { score: 0 });
    }

    #[test]
    fn falling_out_of_bounds_costs_a_life() {
        let (mut s, _, _) = playing();
        place_player(&mut s, 300.0, 620.0);
        s.update();
        let player = &s.world().unwrap().player;
        assert_eq!(player.lives, 2);
        assert_eq!((player.body.x, player.body.y), (100.0, 400.0));
        assert_eq!(*s.state(), GameState::Playing);
    }

    #[test]
    fn shield_absorbs_a_fall_but_still_respawns() {
        let (mut s, clock, _) = playing();
        let now = clock.now_ms();
        world(&mut s)
            .player
            .chain
            .wrap(PowerUpKind::Shield, ModifierParams::default(), now);
        place_player(&mut s, 300.0, 620.0);
        s.update();

        let player = &s.world().unwrap().player;
        assert_eq!(player.lives, 3);
        assert!(!player.chain.has_shield());
        assert_eq!((player.body.x, player.body.y), (100.0, 400.0));
        assert_eq!(*s.state(), GameState::Playing);
    }

    #[test]
    fn simultaneous_hits_cost_one_life() {
        let (mut s, _, audio) = playing();
        add_spike(&mut s, 400.0, 518.0);
        place_player(&mut s, 400.0, 480.0);
        let goomba = &mut world(&mut s).enemies[0];
        goomba.body.x = 400.0;
        goomba.body.y = 490.0;
        s.update();

        let player = &s.world().unwrap().player;
        assert_eq!(player.lives, 2);
        assert_eq!((player.body.x, player.body.y), (100.0, 400.0));
        assert_eq!(audio.count(AudioCue::Damage), 1);
    }

    #[test]
    fn falling_out_on_last_life_is_game_over() {
        let (mut s, _, _) = playing();
        place_player(&mut s, 300.0, 620.0);
        world(&mut s).player.lives = 1;
        world(&mut s).score.add(20);
        s.update();
        assert_eq!(*s.state(), GameState::GameOver { score: 20 });
    }

    #[test]
    fn game_over_returns_to_menu_then_starts_fresh() {
        let (mut s, _, _) = playing();
        place_player(&mut s, 300.0, 620.0);
        world(&mut s).player.lives = 1;
        s.update();
        assert!(s.state().is_finished());

        tap(&mut s, press_attack());
        assert_eq!(*s.state(), GameState::menu());
        tap(&mut s, press_attack());
        assert_eq!(*s.state(), GameState::Playing);
        assert_eq!(s.world().unwrap().player.lives, 3);
    }

    #[test]
    fn pause_on_game_over_quits() {
        let (mut s, _, _) = playing();
        place_player(&mut s, 300.0, 620.0);
        world(&mut s).player.lives = 1;
        s.update();
        s.handle_input(press_pause());
        assert!(s.is_quit_requested());
    }

    // ================================================================
    // Victory
    // ================================================================

    #[test]
    fn clearing_every_enemy_is_victory() {
        let (mut s, clock, _) = playing();
        defeat_all(&mut s);
        world(&mut s).score.add(70);
        clock.advance(12_345);
        s.update();
        assert_eq!(
            *s.state(),
            GameState::Victory {
                score: 70,
                elapsed_ms: 12_345
            }
        );
    }

    #[test]
    fn victory_waits_for_the_last_enemy() {
        let (mut s, _, _) = playing();
        for enemy in world(&mut s).enemies.iter_mut().skip(1) {
            enemy.defeat();
        }
        s.update();
        assert_eq!(*s.state(), GameState::Playing);
    }

    // ================================================================
    // Rendering and snapshots
    // ================================================================

    #[test]
    fn render_shows_hud_while_playing() {
        let (mut s, clock, _) = playing();
        clock.advance(2_500);
        s.update();
        let frame = s.render();
        let hud = frame.hud.unwrap();
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.elapsed_secs, 2);
        assert!(hud.power_ups.is_empty());
    }

    #[test]
    fn snapshot_mirrors_session() {
        let (s, _, _) = playing();
        let snap = s.snapshot();
        assert_eq!(snap.state, GameState::Playing);
        assert_eq!(snap.world.unwrap().enemies.len(), 6);
    }

    #[test]
    fn classic_level_session_starts_cleanly() {
        let mut s = GameSession::new(test_config()).with_clock(Arc::new(ManualClock::new(0)));
        s.start_game();
        assert_eq!(s.world().unwrap().level.active_platforms().len(), 26);
    }

    // ================================================================
    // Game trait contracts
    // ================================================================

    #[test]
    fn contract_tick_rate() {
        let (s, _, _) = session();
        contract_tick_rate_positive(&s);
        assert_eq!(s.tick_rate(), 60.0);
    }

    #[test]
    fn invalid_config_is_repaired_on_construction() {
        let mut cfg = test_config();
        cfg.screen.fps = 0;
        cfg.powerup.drop_chance = f64::NAN;
        let s = GameSession::new(cfg);
        assert_eq!(s.tick_rate(), 60.0);
        assert_eq!(s.config().powerup.drop_chance, 0.3);
    }

    #[test]
    fn contract_serializable() {
        let (s, _, _) = playing();
        contract_state_is_serializable(&s);
    }

    #[test]
    fn contract_reset() {
        let (mut s, _, _) = playing();
        run_idle_ticks(&mut s, 5);
        let (fresh, _, _) = session();
        contract_reset_restores_initial_state(&mut s, &fresh);
    }

    #[test]
    fn contract_apply_state() {
        let (mut source, _, _) = playing();
        run_idle_ticks(&mut source, 3);
        let (mut target, _, _) = session();
        contract_apply_state_roundtrip(&source, &mut target);
        assert_eq!(*target.state(), GameState::Playing);
    }
}
