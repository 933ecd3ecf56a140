//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Pass order
//! within a frame: countdown, delayed round refresh, repulsion, spring,
//! oscillation, particles, floating text. Rendering is a separate read-only
//! pass over the same state.

use glam::Vec2;
use rand::Rng;

use super::layout;
use super::round::RoundSource;
use super::score::{self, PopResult};
use super::state::{
    FloatingText, GameEvent, GamePhase, GameState, Hsla, Particle, ParticleKind, PendingRound,
    SoundCue,
};
use crate::consts::*;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, source: &mut dyn RoundSource) {
    match state.phase {
        GamePhase::Menu => {}
        GamePhase::Loading => {
            // The async gate: the round laid out here becomes visible on
            // this tick, which also starts the speed-bonus clock
            start_round(state, source);
            state.phase = GamePhase::Playing;
        }
        GamePhase::Playing => {
            state.time_ticks += 1;
            state.anim_clock += WOBBLE_CLOCK_STEP;

            // Countdown runs before delayed effects so a refresh scheduled
            // by a pop in the final second is discarded, not applied
            state.remaining_ticks = state.remaining_ticks.saturating_sub(1);
            if state.remaining_ticks == 0 {
                state.end_game();
                update_particles(state);
                update_floating_texts(state);
                return;
            }

            fire_pending_round(state, source);

            repulsion_pass(state);
            spring_and_wobble_pass(state);
            update_particles(state);
            update_floating_texts(state);
        }
        GamePhase::GameOver => {
            // Let the last pop's effects finish animating under the summary
            update_particles(state);
            update_floating_texts(state);
        }
    }
}

/// Handle a press/tap at viewport coordinates.
///
/// Returns the pop result if a bubble was hit. Only active while Playing;
/// popped bubbles never re-dispatch, and empty space is a silent no-op.
pub fn handle_pointer(state: &mut GameState, x: f32, y: f32) -> Option<PopResult> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let idx = super::hit::hit_test(&state.bubbles, Vec2::new(x, y))?;
    let (pos, color, is_target) = {
        let bubble = &mut state.bubbles[idx];
        bubble.popped = true;
        (bubble.pos, bubble.color, bubble.is_target)
    };

    state.events.push(GameEvent::Sound(SoundCue::Pop));

    // Score effects are applied before the effect spawn reads the bubble's
    // color/position, and before the next-round timer is armed
    let elapsed = state.round_elapsed_ticks();
    let result = score::apply_pop(&mut state.stats, is_target, elapsed);

    if is_target {
        state.events.push(GameEvent::Sound(SoundCue::Correct));
    } else {
        state.events.push(GameEvent::Sound(SoundCue::Wrong));
    }

    spawn_pop_burst(state, pos, color);
    state.floating_texts.push(FloatingText {
        text: result.label.clone(),
        pos,
        color: result.color,
        life: TEXT_START_LIFE,
    });

    if is_target {
        state.pending_round = Some(PendingRound {
            fire_tick: state.time_ticks + NEXT_ROUND_DELAY_TICKS,
            epoch: state.epoch,
        });
    }

    Some(result)
}

/// Generate and lay out a fresh round, replacing the current bubbles
fn start_round(state: &mut GameState, source: &mut dyn RoundSource) {
    let round = source.generate(
        state.config.category,
        state.config.difficulty,
        state.config.mode,
        &mut state.rng,
    );
    layout::layout(state, &round);
    state.round_started_tick = state.time_ticks;
    state.events.push(GameEvent::RoundStarted);
}

/// Apply a due round refresh if its epoch still matches.
/// The epoch check (not timer cancellation) is what guarantees a stale
/// refresh can never mutate bubbles after leaving Playing.
fn fire_pending_round(state: &mut GameState, source: &mut dyn RoundSource) {
    let Some(pending) = state.pending_round else {
        return;
    };
    if state.time_ticks < pending.fire_tick {
        return;
    }
    state.pending_round = None;
    if pending.epoch == state.epoch {
        start_round(state, source);
    }
}

/// Push overlapping unpopped bubbles apart along the connecting line.
/// O(n^2) over at most five bubbles.
fn repulsion_pass(state: &mut GameState) {
    let bubbles = &mut state.bubbles;
    for i in 0..bubbles.len() {
        for j in i + 1..bubbles.len() {
            if bubbles[i].popped || bubbles[j].popped {
                continue;
            }
            let delta = bubbles[i].pos - bubbles[j].pos;
            let dist = delta.length();
            let min_dist = bubbles[i].radius + bubbles[j].radius + REPULSION_PADDING;
            if dist < min_dist && dist > 0.0 {
                let push = (min_dist - dist) * REPULSION_STRENGTH;
                let dir = delta / dist;
                bubbles[i].pos += dir * push;
                bubbles[j].pos -= dir * push;
            }
        }
    }
}

/// Spring toward the anchor, then add the idle wobble.
/// The spring step is a fraction of the remaining distance, so it never
/// overshoots; the wobble keeps bubbles from ever fully settling.
fn spring_and_wobble_pass(state: &mut GameState) {
    let clock = state.anim_clock;
    for bubble in state.bubbles.iter_mut().filter(|b| !b.popped) {
        bubble.pos += (bubble.anchor - bubble.pos) * SPRING_FACTOR;
        let t = clock + bubble.phase_offset;
        bubble.pos += Vec2::new(t.cos(), t.sin()) * WOBBLE_AMPLITUDE;
    }
}

/// Spawn the pop burst: one shockwave ring, eight shards, fifteen droplets
fn spawn_pop_burst(state: &mut GameState, pos: Vec2, color: Hsla) {
    state.particles.push(Particle {
        kind: ParticleKind::Ring,
        pos,
        vel: Vec2::ZERO,
        life: 1.0,
        size: BUBBLE_RADIUS,
        color,
        rotation: 0.0,
        rot_vel: 0.0,
    });

    for _ in 0..SHARD_COUNT {
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = 4.0 + state.rng.random_range(0.0..6.0);
        state.particles.push(Particle {
            kind: ParticleKind::Shard,
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            size: 4.0 + state.rng.random_range(0.0..8.0),
            color,
            rotation: state.rng.random_range(0.0..std::f32::consts::PI),
            rot_vel: state.rng.random_range(-0.2..0.2),
        });
    }

    for _ in 0..DROPLET_COUNT {
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = 2.0 + state.rng.random_range(0.0..8.0);
        state.particles.push(Particle {
            kind: ParticleKind::Droplet,
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            size: 2.0 + state.rng.random_range(0.0..5.0),
            color,
            rotation: 0.0,
            rot_vel: 0.0,
        });
    }
}

fn update_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        match particle.kind {
            ParticleKind::Ring => particle.size += RING_GROWTH,
            ParticleKind::Shard => {
                particle.vel.y += PARTICLE_GRAVITY;
                particle.rotation += particle.rot_vel;
            }
            ParticleKind::Droplet => particle.vel.y += PARTICLE_GRAVITY,
        }
        particle.life -= PARTICLE_LIFE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn update_floating_texts(state: &mut GameState) {
    for text in &mut state.floating_texts {
        text.pos.y -= TEXT_RISE_SPEED;
        text.life -= TEXT_LIFE_DECAY;
    }
    state.floating_texts.retain(|t| t.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::round::{Mode, Round, WordBank};
    use crate::sim::state::GameConfig;

    /// Round source that counts calls, for refresh-scheduling tests
    struct CountingSource {
        inner: WordBank,
        calls: u32,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                inner: WordBank,
                calls: 0,
            }
        }
    }

    impl RoundSource for CountingSource {
        fn generate(
            &mut self,
            category: crate::sim::Category,
            difficulty: crate::sim::Difficulty,
            mode: Mode,
            rng: &mut rand_pcg::Pcg32,
        ) -> Round {
            self.calls += 1;
            self.inner.generate(category, difficulty, mode, rng)
        }
    }

    /// Source whose generation "fails" internally and degrades to fallback
    struct FailingSource;

    impl RoundSource for FailingSource {
        fn generate(
            &mut self,
            _category: crate::sim::Category,
            _difficulty: crate::sim::Difficulty,
            _mode: Mode,
            _rng: &mut rand_pcg::Pcg32,
        ) -> Round {
            Round::fallback()
        }
    }

    /// A Playing state with the first round laid out and the bloom
    /// entrance settled, so bubbles sit apart at distinct positions
    fn playing_state(seed: u64) -> (GameState, WordBank) {
        let mut state = GameState::new(seed);
        state.set_viewport(1200.0, 800.0);
        let mut source = WordBank;
        state.start_game(GameConfig::default());
        tick(&mut state, &mut source); // Loading -> Playing, first round laid out
        for _ in 0..120 {
            tick(&mut state, &mut source);
        }
        state.drain_events();
        (state, source)
    }

    fn target_pos(state: &GameState) -> Vec2 {
        state.bubbles.iter().find(|b| b.is_target).unwrap().pos
    }

    fn decoy_pos(state: &GameState) -> Vec2 {
        state.bubbles.iter().find(|b| !b.is_target).unwrap().pos
    }

    #[test]
    fn loading_gate_lays_out_first_round() {
        let mut state = GameState::new(21);
        let mut source = WordBank;
        state.start_game(GameConfig::default());
        assert_eq!(state.phase, GamePhase::Loading);
        assert!(state.bubbles.is_empty());

        tick(&mut state, &mut source);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bubbles.len(), 4);
        assert!(state.drain_events().contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn spring_approaches_anchor_without_overshoot() {
        let (mut state, mut source) = playing_state(22);
        for _ in 0..600 {
            tick(&mut state, &mut source);
        }
        for bubble in &state.bubbles {
            // Settled to the wobble equilibrium near the anchor
            let dist = bubble.pos.distance(bubble.anchor);
            assert!(dist < 40.0, "bubble {} still {dist} from anchor", bubble.id);
        }
    }

    #[test]
    fn repulsion_separates_overlapping_bubbles() {
        let (mut state, mut source) = playing_state(23);
        // All bubbles start at the focal point, fully overlapping
        for _ in 0..300 {
            tick(&mut state, &mut source);
        }
        for i in 0..state.bubbles.len() {
            for j in i + 1..state.bubbles.len() {
                let dist = state.bubbles[i].pos.distance(state.bubbles[j].pos);
                assert!(dist > state.bubbles[i].radius, "bubbles {i} and {j} still stacked");
            }
        }
    }

    #[test]
    fn popped_bubbles_are_frozen() {
        let (mut state, mut source) = playing_state(24);
        let pos = decoy_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();
        let popped_pos = state
            .bubbles
            .iter()
            .find(|b| b.popped)
            .map(|b| b.pos)
            .unwrap();

        for _ in 0..30 {
            tick(&mut state, &mut source);
        }
        let after = state
            .bubbles
            .iter()
            .find(|b| b.popped)
            .map(|b| b.pos)
            .unwrap();
        assert_eq!(popped_pos, after);
    }

    #[test]
    fn pop_spawns_full_burst_and_label() {
        let (mut state, _) = playing_state(25);
        let pos = target_pos(&state);
        let result = handle_pointer(&mut state, pos.x, pos.y).unwrap();

        assert_eq!(state.particles.len(), 1 + SHARD_COUNT + DROPLET_COUNT);
        assert_eq!(
            state
                .particles
                .iter()
                .filter(|p| p.kind == ParticleKind::Ring)
                .count(),
            1
        );
        assert_eq!(state.floating_texts.len(), 1);
        assert_eq!(state.floating_texts[0].text, result.label);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::Pop)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::Correct)));
    }

    #[test]
    fn double_pop_is_a_no_op() {
        let (mut state, _) = playing_state(26);
        let pos = target_pos(&state);
        assert!(handle_pointer(&mut state, pos.x, pos.y).is_some());
        let score_after = state.stats.score;

        // Same spot: the popped bubble is transparent, nothing re-dispatches
        let second = handle_pointer(&mut state, pos.x, pos.y);
        assert!(second.is_none());
        assert_eq!(state.stats.score, score_after);
    }

    #[test]
    fn empty_space_is_not_a_scored_miss() {
        let (mut state, _) = playing_state(27);
        assert!(handle_pointer(&mut state, 5.0, 5.0).is_none());
        assert_eq!(state.stats.misses, 0);
        assert_eq!(state.stats.combo, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn target_hit_schedules_refresh_after_delay() {
        let (mut state, _) = playing_state(28);
        let mut source = CountingSource::new();

        let pos = target_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();
        let old_ids: Vec<u32> = state.bubbles.iter().map(|b| b.id).collect();

        // Not yet due
        for _ in 0..NEXT_ROUND_DELAY_TICKS - 1 {
            tick(&mut state, &mut source);
        }
        assert_eq!(source.calls, 0);

        tick(&mut state, &mut source);
        assert_eq!(source.calls, 1);
        let new_ids: Vec<u32> = state.bubbles.iter().map(|b| b.id).collect();
        assert!(old_ids.iter().all(|id| !new_ids.contains(id)), "bubbles were reused");
        assert_eq!(state.round_elapsed_ticks(), 0);
    }

    #[test]
    fn decoy_hit_does_not_schedule_refresh() {
        let (mut state, _) = playing_state(29);
        let mut source = CountingSource::new();

        let pos = decoy_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();
        assert!(state.pending_round.is_none());

        for _ in 0..NEXT_ROUND_DELAY_TICKS * 2 {
            tick(&mut state, &mut source);
        }
        assert_eq!(source.calls, 0);
    }

    #[test]
    fn countdown_expiry_enters_game_over_unconditionally() {
        let (mut state, mut source) = playing_state(30);
        state.remaining_ticks = 3;

        // A pop in the final moments arms a refresh that must never fire
        let pos = target_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();
        assert!(state.pending_round.is_some());

        for _ in 0..3 {
            tick(&mut state, &mut source);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.pending_round.is_none());

        let bubbles_at_end: Vec<u32> = state.bubbles.iter().map(|b| b.id).collect();
        for _ in 0..NEXT_ROUND_DELAY_TICKS * 2 {
            tick(&mut state, &mut source);
        }
        let bubbles_after: Vec<u32> = state.bubbles.iter().map(|b| b.id).collect();
        assert_eq!(bubbles_at_end, bubbles_after, "stale refresh mutated bubbles");

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver));
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));
    }

    #[test]
    fn stale_refresh_from_previous_game_never_fires() {
        let (mut state, _) = playing_state(31);
        let mut source = CountingSource::new();

        let pos = target_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();
        let stale = state.pending_round.unwrap();

        // Quit to menu, then immediately start a new game; even if the old
        // fire tick comes due, the epoch no longer matches
        state.return_to_menu();
        state.start_game(GameConfig::default());
        state.pending_round = Some(stale); // simulate a leaked timer
        tick(&mut state, &mut source); // Loading -> Playing
        let first_round_calls = source.calls;

        for _ in 0..NEXT_ROUND_DELAY_TICKS * 2 {
            tick(&mut state, &mut source);
        }
        assert_eq!(source.calls, first_round_calls, "stale epoch refresh fired");
    }

    #[test]
    fn pop_after_game_over_is_ignored() {
        let (mut state, mut source) = playing_state(32);
        state.remaining_ticks = 1;
        tick(&mut state, &mut source);
        assert_eq!(state.phase, GamePhase::GameOver);

        let pos = state.bubbles[0].pos;
        assert!(handle_pointer(&mut state, pos.x, pos.y).is_none());
        assert_eq!(state.stats.hits + state.stats.misses, 0);
    }

    #[test]
    fn particles_and_texts_decay_to_removal() {
        let (mut state, mut source) = playing_state(33);
        let pos = target_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();
        assert!(!state.particles.is_empty());
        assert!(!state.floating_texts.is_empty());

        // Life 1.0 at -0.03/frame is gone within 34 frames; text 1.2 at
        // -0.02 within 60. Refreshes keep arriving but spawn no effects.
        for _ in 0..70 {
            tick(&mut state, &mut source);
        }
        assert!(state.particles.is_empty());
        assert!(state.floating_texts.is_empty());
    }

    #[test]
    fn ring_grows_while_shards_fall() {
        let (mut state, mut source) = playing_state(34);
        let pos = target_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();

        let ring_size = |s: &GameState| {
            s.particles
                .iter()
                .find(|p| p.kind == ParticleKind::Ring)
                .map(|p| p.size)
                .unwrap()
        };
        let shard_vy = |s: &GameState| {
            s.particles
                .iter()
                .find(|p| p.kind == ParticleKind::Shard)
                .map(|p| p.vel.y)
                .unwrap()
        };

        let size_before = ring_size(&state);
        let vy_before = shard_vy(&state);
        tick(&mut state, &mut source);
        assert_eq!(ring_size(&state), size_before + RING_GROWTH);
        assert!((shard_vy(&state) - (vy_before + PARTICLE_GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn floating_text_rises_and_fades() {
        let (mut state, mut source) = playing_state(35);
        let pos = decoy_pos(&state);
        handle_pointer(&mut state, pos.x, pos.y).unwrap();

        let y_before = state.floating_texts[0].pos.y;
        let life_before = state.floating_texts[0].life;
        tick(&mut state, &mut source);
        assert_eq!(state.floating_texts[0].pos.y, y_before - TEXT_RISE_SPEED);
        assert!((state.floating_texts[0].life - (life_before - TEXT_LIFE_DECAY)).abs() < 1e-5);
    }

    #[test]
    fn failing_source_degrades_to_fallback_round() {
        let mut state = GameState::new(36);
        state.set_viewport(1200.0, 800.0);
        let mut source = FailingSource;
        state.start_game(GameConfig::default());
        tick(&mut state, &mut source);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bubbles.len(), 3);
        assert_eq!(state.bubbles.iter().filter(|b| b.is_target).count(), 1);
        assert!(state.bubbles.iter().any(|b| b.text == "Retry" && b.is_target));
    }

    #[test]
    fn menu_tick_is_inert() {
        let mut state = GameState::new(37);
        let mut source = WordBank;
        tick(&mut state, &mut source);
        assert_eq!(state.time_ticks, 0);
        assert!(state.bubbles.is_empty());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn full_game_smoke() {
        let mut state = GameState::new(38);
        state.set_viewport(1000.0, 700.0);
        let mut source = WordBank;
        state.start_game(GameConfig {
            duration_secs: 30,
            ..GameConfig::default()
        });

        let mut pops = 0;
        for _ in 0..(30 * TICKS_PER_SEC + 10) {
            tick(&mut state, &mut source);
            if state.phase == GamePhase::Playing
                && state.pending_round.is_none()
                && state.round_elapsed_ticks() > 30
            {
                let pos = target_pos(&state);
                if handle_pointer(&mut state, pos.x, pos.y).is_some() {
                    pops += 1;
                }
            }
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(pops > 0);
        assert_eq!(state.stats.hits, pops);
        assert!(state.stats.score > 0);
        assert_eq!(state.stats.max_combo as u64, pops as u64);
    }
}
