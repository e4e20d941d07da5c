//! Single-screen platformer simulation.
//!
//! [`GameSession`] is the entry point: the host feeds it one [`InputFrame`]
//! per tick, calls `update`, and draws the [`Frame`] returned by `render`.
//!
//! [`InputFrame`]: miniplat_core::input::InputFrame

pub mod collision;
pub mod config;
pub mod enemies;
pub mod game_state;
pub mod kinematics;
pub mod level;
pub mod level_gen;
pub mod player;
pub mod powerups;
pub mod projectile;
pub mod render;
pub mod scoring;
pub mod session;

pub use config::GameConfig;
pub use game_state::GameState;
pub use render::{Frame, Renderer};
pub use session::{GameSession, SessionSnapshot, World};
