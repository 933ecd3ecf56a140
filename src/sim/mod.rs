//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per 60 Hz frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod hit;
pub mod layout;
pub mod round;
pub mod score;
pub mod state;
pub mod tick;

pub use hit::hit_test;
pub use layout::Theme;
pub use round::{Category, Difficulty, Mode, Round, RoundEntry, RoundSource, WordBank};
pub use score::{PopResult, stars_for, title_for};
pub use state::{
    Bubble, FloatingText, GameConfig, GameEvent, GamePhase, GameState, Hsla, Particle,
    ParticleKind, RunStats, ScoreBreakdown, SoundCue,
};
pub use tick::{handle_pointer, tick};
