//! Scoring and combo rules
//!
//! Converts a pop into a score delta, label and color, and keeps the run
//! counters current. Purely numeric; effects and scheduling live in tick.

use super::state::RunStats;
use crate::consts::*;

/// Floating-text color for a target hit
pub const HIT_COLOR: &str = "#4ade80";
/// Floating-text color for a penalty
pub const MISS_COLOR: &str = "#ef4444";

/// Outcome of a pop, consumed by the effect spawner and the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopResult {
    pub score_delta: i32,
    pub label: String,
    pub color: &'static str,
}

/// Per-combo multiplier: sustained streaks escalate through tiers
fn combo_multiplier(combo: u32) -> u32 {
    if combo >= COMBO_TIER_HIGH {
        20
    } else if combo >= COMBO_TIER_MID {
        15
    } else {
        10
    }
}

/// Apply a pop to the run stats and produce its result.
///
/// `elapsed_ticks` is measured from the tick the round became visible,
/// not from first interactivity; the speed window is strict.
pub fn apply_pop(stats: &mut RunStats, is_target: bool, elapsed_ticks: u64) -> PopResult {
    if is_target {
        stats.combo += 1;
        stats.max_combo = stats.max_combo.max(stats.combo);
        stats.hits += 1;

        let combo_bonus = stats.combo * combo_multiplier(stats.combo);
        let speed_bonus = if elapsed_ticks < SPEED_BONUS_WINDOW_TICKS {
            stats.speed_bonus_count += 1;
            SPEED_BONUS
        } else {
            0
        };
        let total = BASE_POINTS + combo_bonus + speed_bonus;

        stats.score += total;
        stats.breakdown.base += BASE_POINTS;
        stats.breakdown.combo += combo_bonus;
        stats.breakdown.speed += speed_bonus;

        let mut label = format!("+{total}");
        if stats.combo > 1 {
            label.push_str(&format!(" Combo x{}!", stats.combo));
        }
        if speed_bonus > 0 {
            label.push_str(" ⚡");
        }

        PopResult {
            score_delta: total as i32,
            label,
            color: HIT_COLOR,
        }
    } else {
        stats.misses += 1;
        stats.combo = 0;
        stats.score = stats.score.saturating_sub(MISS_PENALTY);
        stats.breakdown.penalty += MISS_PENALTY;

        PopResult {
            score_delta: -(MISS_PENALTY as i32),
            label: format!("-{MISS_PENALTY}"),
            color: MISS_COLOR,
        }
    }
}

/// Star rating for the game-over panel
pub fn stars_for(score: u32) -> u32 {
    match score {
        2500.. => 3,
        1500.. => 2,
        800.. => 1,
        _ => 0,
    }
}

/// Rank title for the game-over panel
pub fn title_for(score: u32) -> &'static str {
    match score {
        2500.. => "传奇玩家 👑",
        2000.. => "百步穿杨 🎯",
        1500.. => "眼疾手快 ⚡",
        800.. => "初出茅庐 🌱",
        _ => "新手上路 🥚",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_tier_boundaries() {
        // combo 5 still uses the x10 tier, 6 steps to x15, 11 to x20
        let mut stats = RunStats {
            combo: 4,
            ..RunStats::default()
        };
        apply_pop(&mut stats, true, 1000);
        assert_eq!(stats.combo, 5);
        assert_eq!(stats.breakdown.combo, 50);

        let mut stats = RunStats {
            combo: 5,
            ..RunStats::default()
        };
        apply_pop(&mut stats, true, 1000);
        assert_eq!(stats.combo, 6);
        assert_eq!(stats.breakdown.combo, 90);

        let mut stats = RunStats {
            combo: 10,
            ..RunStats::default()
        };
        apply_pop(&mut stats, true, 1000);
        assert_eq!(stats.combo, 11);
        assert_eq!(stats.breakdown.combo, 220);
    }

    #[test]
    fn speed_bonus_is_strict() {
        let mut stats = RunStats::default();
        let result = apply_pop(&mut stats, true, SPEED_BONUS_WINDOW_TICKS - 1);
        assert_eq!(result.score_delta, 160);
        assert_eq!(stats.speed_bonus_count, 1);

        let mut stats = RunStats::default();
        let result = apply_pop(&mut stats, true, SPEED_BONUS_WINDOW_TICKS);
        assert_eq!(result.score_delta, 110);
        assert_eq!(stats.speed_bonus_count, 0);
        assert_eq!(stats.breakdown.speed, 0);
    }

    #[test]
    fn first_pop_at_500ms_scores_160_without_combo_suffix() {
        let mut stats = RunStats::default();
        // 500 ms = 30 ticks
        let result = apply_pop(&mut stats, true, 30);
        assert_eq!(result.score_delta, 160);
        assert_eq!(stats.score, 160);
        assert!(!result.label.contains("Combo"));
        assert!(result.label.contains('⚡'));
        assert_eq!(result.label, "+160 ⚡");
    }

    #[test]
    fn combo_seven_pop_at_2000ms_scores_205() {
        let mut stats = RunStats {
            combo: 6,
            ..RunStats::default()
        };
        // 2000 ms = 120 ticks, outside the speed window
        let result = apply_pop(&mut stats, true, 120);
        assert_eq!(result.score_delta, 205);
        assert_eq!(result.label, "+205 Combo x7!");
    }

    #[test]
    fn penalty_floors_score_at_zero_and_resets_combo() {
        let mut stats = RunStats {
            score: 30,
            combo: 8,
            max_combo: 8,
            ..RunStats::default()
        };
        let result = apply_pop(&mut stats, false, 100);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.max_combo, 8);
        assert_eq!(stats.misses, 1);
        assert_eq!(result.label, "-50");
        assert_eq!(result.color, MISS_COLOR);
        assert_eq!(result.score_delta, -50);
    }

    #[test]
    fn max_combo_tracks_peak() {
        let mut stats = RunStats::default();
        for _ in 0..3 {
            apply_pop(&mut stats, true, 1000);
        }
        apply_pop(&mut stats, false, 1000);
        apply_pop(&mut stats, true, 1000);
        assert_eq!(stats.combo, 1);
        assert_eq!(stats.max_combo, 3);
        assert_eq!(stats.hits, 4);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn stars_and_titles() {
        assert_eq!(stars_for(799), 0);
        assert_eq!(stars_for(800), 1);
        assert_eq!(stars_for(1500), 2);
        assert_eq!(stars_for(2500), 3);
        assert_eq!(title_for(2000), "百步穿杨 🎯");
        assert_eq!(title_for(0), "新手上路 🥚");
    }

    proptest::proptest! {
        #[test]
        fn score_floor_and_breakdown_consistency(
            pops in proptest::collection::vec(proptest::prelude::any::<bool>(), 0..200),
        ) {
            let mut stats = RunStats::default();
            for is_target in pops {
                let result = apply_pop(&mut stats, is_target, 1000);
                if !is_target {
                    proptest::prop_assert_eq!(stats.combo, 0);
                    proptest::prop_assert_eq!(result.score_delta, -50);
                }
                // The floor only ever absorbs penalty, never earnings
                let earned =
                    stats.breakdown.base + stats.breakdown.combo + stats.breakdown.speed;
                proptest::prop_assert!(stats.score <= earned);
                proptest::prop_assert!(
                    stats.score >= earned.saturating_sub(stats.breakdown.penalty)
                );
            }
        }
    }
}
