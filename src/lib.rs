//! Word Ninja - a timed word-matching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rounds, layout, physics, scoring)
//! - `render`: Canvas 2D frame painter
//! - `achievements`: Medal wall with injected load/save store
//! - `audio`: Web Audio sound cue synthesis
//! - `settings`: Persisted player preferences

pub mod achievements;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use achievements::Achievements;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per wall-clock second
    pub const TICKS_PER_SEC: u64 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Bubble radius, fixed regardless of count or difficulty
    pub const BUBBLE_RADIUS: f32 = 70.0;
    /// Extra spacing beyond touching before repulsion kicks in
    pub const REPULSION_PADDING: f32 = 15.0;
    /// Fraction of the overlap applied as push per frame
    pub const REPULSION_STRENGTH: f32 = 0.08;
    /// Fraction of the remaining distance to the anchor covered per frame
    pub const SPRING_FACTOR: f32 = 0.03;
    /// Idle oscillation amplitude in layout units
    pub const WOBBLE_AMPLITUDE: f32 = 0.8;
    /// Global oscillation clock advance per frame
    pub const WOBBLE_CLOCK_STEP: f32 = 0.02;

    /// Vertical focal-point bias (leaves room for the HUD)
    pub const FOCAL_Y_FACTOR: f32 = 0.55;
    /// Layout ring radius as a fraction of the short viewport side
    pub const LAYOUT_RADIUS_FACTOR: f32 = 0.35;

    /// Particle life lost per frame (life runs 1.0 -> 0.0)
    pub const PARTICLE_LIFE_DECAY: f32 = 0.03;
    /// Downward acceleration applied to non-ring particles per frame
    pub const PARTICLE_GRAVITY: f32 = 0.25;
    /// Shockwave ring radius growth per frame
    pub const RING_GROWTH: f32 = 4.0;
    /// Glass shards per pop
    pub const SHARD_COUNT: usize = 8;
    /// Droplets per pop
    pub const DROPLET_COUNT: usize = 15;

    /// Floating score text starting life
    pub const TEXT_START_LIFE: f32 = 1.2;
    /// Floating text life lost per frame
    pub const TEXT_LIFE_DECAY: f32 = 0.02;
    /// Floating text upward drift per frame
    pub const TEXT_RISE_SPEED: f32 = 2.5;

    /// Points for popping the target word
    pub const BASE_POINTS: u32 = 100;
    /// Bonus for a pop within the speed window
    pub const SPEED_BONUS: u32 = 50;
    /// Speed-bonus window in ticks (1500 ms), measured from round visibility
    pub const SPEED_BONUS_WINDOW_TICKS: u64 = 90;
    /// Points lost for popping a non-target word
    pub const MISS_PENALTY: u32 = 50;
    /// Combo streak where the per-combo multiplier steps from 10 to 15
    pub const COMBO_TIER_MID: u32 = 6;
    /// Combo streak where the per-combo multiplier steps from 15 to 20
    pub const COMBO_TIER_HIGH: u32 = 11;
    /// Delay before the next round replaces a cleared one (400 ms)
    pub const NEXT_ROUND_DELAY_TICKS: u64 = 24;

    /// Selectable game durations in seconds
    pub const GAME_DURATIONS_SECS: [u32; 4] = [30, 60, 90, 120];
}
