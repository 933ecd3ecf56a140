//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::layout::Theme;
use super::round::{Category, Difficulty, Mode};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Settings screen, nothing simulated
    Menu,
    /// Async gate between "start" and the first laid-out round
    Loading,
    /// Active gameplay with a running countdown
    Playing,
    /// Run ended, summary shown
    GameOver,
}

/// HSLA color as assigned by the layout engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// CSS color string for the canvas API
    pub fn css(&self) -> String {
        format!("hsla({:.0}, {:.0}%, {:.0}%, {})", self.h, self.s, self.l, self.a)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// A floating word bubble
#[derive(Debug, Clone)]
pub struct Bubble {
    pub id: u32,
    pub text: String,
    /// Is this the word the player should pop this round
    pub is_target: bool,
    pub pos: Vec2,
    /// Resting position the spring pulls toward
    pub anchor: Vec2,
    pub radius: f32,
    pub color: Hsla,
    /// Popped bubbles are skipped by physics, repulsion and hit-testing
    /// but stay in the list until the round is replaced
    pub popped: bool,
    /// Randomized per bubble so idle motion is decorrelated
    pub phase_offset: f32,
}

/// Particle shapes spawned by a pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Expanding shockwave ring, grows instead of moving
    Ring,
    /// Rotating triangular shard
    Shard,
    /// Soft circle droplet
    Droplet,
}

/// A visual effect particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 -> 0.0, removed at <= 0
    pub life: f32,
    pub size: f32,
    pub color: Hsla,
    pub rotation: f32,
    pub rot_vel: f32,
}

/// Transient score label that rises and fades
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub color: &'static str,
    pub life: f32,
}

/// Score subtotals shown in the game-over breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub base: u32,
    pub combo: u32,
    pub speed: u32,
    pub penalty: u32,
}

/// Per-game counters, reset at game start and read at game over
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    /// Current streak of consecutive target hits
    pub combo: u32,
    pub max_combo: u32,
    pub hits: u32,
    pub misses: u32,
    pub speed_bonus_count: u32,
}

/// Sound cues consumed fire-and-forget by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Pop,
    Correct,
    Wrong,
    GameOver,
}

/// Events emitted by the sim for the host to drain each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
    /// A fresh round's bubbles are laid out and visible
    RoundStarted,
    /// Playing -> GameOver transition; evaluate achievements now
    GameOver,
}

/// Delayed round refresh with the epoch captured at scheduling time.
/// The refresh only applies while the phase is Playing and the epoch
/// still matches, so a pop racing the final countdown second can never
/// mutate bubbles after the game has ended.
#[derive(Debug, Clone, Copy)]
pub struct PendingRound {
    pub fire_tick: u64,
    pub epoch: u64,
}

/// One game's settings, chosen on the menu screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub category: Category,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub duration_secs: u32,
    pub theme: Theme,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            category: Category::Sports,
            difficulty: Difficulty::Normal,
            mode: Mode::FindIntruder,
            duration_secs: 60,
            theme: Theme::Classic,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Simulation tick counter, advances only while Playing
    pub time_ticks: u64,
    /// Countdown remaining, in ticks
    pub remaining_ticks: u64,
    /// Global clock driving idle oscillation
    pub anim_clock: f32,
    /// Tick at which the current round became visible
    pub round_started_tick: u64,
    /// Bumped on every transition out of Playing; guards delayed effects
    pub epoch: u64,
    pub pending_round: Option<PendingRound>,
    pub bubbles: Vec<Bubble>,
    pub particles: Vec<Particle>,
    pub floating_texts: Vec<FloatingText>,
    pub stats: RunStats,
    pub events: Vec<GameEvent>,
    /// Viewport size in layout units
    pub viewport: Vec2,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed, sitting on the menu
    pub fn new(seed: u64) -> Self {
        Self {
            config: GameConfig::default(),
            phase: GamePhase::Menu,
            time_ticks: 0,
            remaining_ticks: 0,
            anim_clock: 0.0,
            round_started_tick: 0,
            epoch: 0,
            pending_round: None,
            bubbles: Vec::new(),
            particles: Vec::new(),
            floating_texts: Vec::new(),
            stats: RunStats::default(),
            events: Vec::new(),
            viewport: Vec2::new(1280.0, 720.0),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new bubble ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Begin a new game: reset counters and enter the Loading gate.
    /// The first round is laid out by the next tick.
    pub fn start_game(&mut self, config: GameConfig) {
        self.config = config;
        self.stats = RunStats::default();
        self.remaining_ticks = config.duration_secs as u64 * TICKS_PER_SEC;
        self.bubbles.clear();
        self.particles.clear();
        self.floating_texts.clear();
        self.pending_round = None;
        self.epoch += 1;
        self.phase = GamePhase::Loading;
        self.events.push(GameEvent::Sound(SoundCue::Pop));
        log::info!(
            "Starting game: {:?} {:?} {:?} {}s",
            config.category,
            config.difficulty,
            config.mode,
            config.duration_secs
        );
    }

    /// Quit back to the menu, discarding the run
    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.epoch += 1;
        self.pending_round = None;
        self.bubbles.clear();
        self.particles.clear();
        self.floating_texts.clear();
    }

    /// Terminal transition; safe to call only from Playing
    pub(crate) fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.epoch += 1;
        self.pending_round = None;
        self.events.push(GameEvent::Sound(SoundCue::GameOver));
        self.events.push(GameEvent::GameOver);
        log::info!(
            "Game over: score={} max_combo={} hits={} misses={}",
            self.stats.score,
            self.stats.max_combo,
            self.stats.hits,
            self.stats.misses
        );
    }

    /// Take the events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whole seconds left on the countdown, for the HUD
    pub fn time_left_secs(&self) -> u64 {
        self.remaining_ticks.div_ceil(TICKS_PER_SEC)
    }

    /// Ticks since the current round became visible
    pub fn round_elapsed_ticks(&self) -> u64 {
        self.time_ticks - self.round_started_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_sits_on_menu() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.bubbles.is_empty());
        assert_eq!(state.stats.score, 0);
    }

    #[test]
    fn start_game_resets_run_and_enters_loading() {
        let mut state = GameState::new(7);
        state.stats.score = 500;
        state.stats.combo = 3;

        state.start_game(GameConfig {
            duration_secs: 30,
            ..GameConfig::default()
        });

        assert_eq!(state.phase, GamePhase::Loading);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.combo, 0);
        assert_eq!(state.remaining_ticks, 30 * TICKS_PER_SEC);
        assert_eq!(state.drain_events(), vec![GameEvent::Sound(SoundCue::Pop)]);
    }

    #[test]
    fn entity_ids_are_unique() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        let c = state.next_entity_id();
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn end_game_bumps_epoch_and_cancels_pending() {
        let mut state = GameState::new(7);
        state.phase = GamePhase::Playing;
        let epoch_before = state.epoch;
        state.pending_round = Some(PendingRound {
            fire_tick: 100,
            epoch: epoch_before,
        });

        state.end_game();

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.epoch, epoch_before + 1);
        assert!(state.pending_round.is_none());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn time_left_rounds_up_partial_seconds() {
        let mut state = GameState::new(7);
        state.remaining_ticks = TICKS_PER_SEC + 1;
        assert_eq!(state.time_left_secs(), 2);
        state.remaining_ticks = 1;
        assert_eq!(state.time_left_secs(), 1);
        state.remaining_ticks = 0;
        assert_eq!(state.time_left_secs(), 0);
    }

    #[test]
    fn hsla_css_format() {
        let c = Hsla::new(200.4, 75.0, 60.0, 0.6);
        assert_eq!(c.css(), "hsla(200, 75%, 60%, 0.6)");
        assert_eq!(c.with_alpha(0.85).css(), "hsla(200, 75%, 60%, 0.85)");
    }
}
