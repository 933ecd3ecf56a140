//! Layout engine: anchor placement and bubble styling
//!
//! Bubbles are arranged on a ring around a focal point biased below the
//! viewport center, and all spawn at the focal point so the spring pass
//! produces a bloom entrance. Visual order is shuffled independently of
//! generation order so the target never lands in a predictable slot.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::round::Round;
use super::state::{Bubble, GameState, Hsla};
use crate::consts::*;

/// Color palette applied to a round's bubbles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Any base hue, soft saturation
    #[default]
    Classic,
    /// High-contrast hues, near-full saturation
    Neon,
    /// Muted earth tones
    Earth,
}

/// Base hues for the fixed-hue palettes
const NEON_HUES: [f32; 5] = [180.0, 210.0, 300.0, 330.0, 90.0];
const EARTH_HUES: [f32; 5] = [15.0, 25.0, 35.0, 45.0, 90.0];

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Neon => "neon",
            Theme::Earth => "earth",
        }
    }

    pub fn from_name(s: &str) -> Option<Theme> {
        match s {
            "classic" => Some(Theme::Classic),
            "neon" => Some(Theme::Neon),
            "earth" => Some(Theme::Earth),
            _ => None,
        }
    }

    /// One base hue per round; per-bubble jitter is layered on top
    fn base_hue(self, rng: &mut rand_pcg::Pcg32) -> f32 {
        match self {
            Theme::Classic => rng.random_range(0.0..360.0),
            Theme::Neon => NEON_HUES[rng.random_range(0..NEON_HUES.len())],
            Theme::Earth => EARTH_HUES[rng.random_range(0..EARTH_HUES.len())],
        }
    }

    fn saturation(self, rng: &mut rand_pcg::Pcg32) -> f32 {
        match self {
            Theme::Classic => 70.0 + rng.random_range(0.0..20.0),
            Theme::Neon => 90.0 + rng.random_range(0.0..10.0),
            Theme::Earth => 40.0 + rng.random_range(0.0..15.0),
        }
    }

    fn lightness(self, rng: &mut rand_pcg::Pcg32) -> f32 {
        match self {
            Theme::Classic | Theme::Neon => 55.0 + rng.random_range(0.0..10.0),
            Theme::Earth => 45.0 + rng.random_range(0.0..10.0),
        }
    }
}

/// Focal point of the bubble ring: horizontally centered, biased below
/// the vertical center to leave room for the HUD
pub fn focal_point(width: f32, height: f32) -> Vec2 {
    Vec2::new(width / 2.0, height * FOCAL_Y_FACTOR)
}

/// Evenly spaced ring anchors starting at the top (-90 degrees)
pub fn anchor_positions(count: usize, width: f32, height: f32) -> Vec<Vec2> {
    let focal = focal_point(width, height);
    let radius = width.min(height) * LAYOUT_RADIUS_FACTOR;

    (0..count)
        .map(|i| {
            let angle =
                i as f32 * std::f32::consts::TAU / count as f32 - std::f32::consts::FRAC_PI_2;
            focal + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Replace the state's bubbles with a freshly laid-out round
pub fn layout(state: &mut GameState, round: &Round) {
    let mut entries: Vec<_> = round.entries.iter().collect();
    entries.shuffle(&mut state.rng);

    let width = state.viewport.x;
    let height = state.viewport.y;
    let focal = focal_point(width, height);
    let anchors = anchor_positions(entries.len(), width, height);
    let base_hue = state.config.theme.base_hue(&mut state.rng);
    let theme = state.config.theme;

    let mut bubbles = Vec::with_capacity(entries.len());
    for (entry, anchor) in entries.into_iter().zip(anchors) {
        let id = state.next_entity_id();
        let hue = (base_hue + state.rng.random_range(-15.0..15.0)).rem_euclid(360.0);
        let color = Hsla::new(
            hue,
            theme.saturation(&mut state.rng),
            theme.lightness(&mut state.rng),
            0.6,
        );
        bubbles.push(Bubble {
            id,
            text: entry.word.clone(),
            is_target: entry.is_target,
            pos: focal,
            anchor,
            radius: BUBBLE_RADIUS,
            color,
            popped: false,
            phase_offset: state.rng.random_range(0.0..std::f32::consts::TAU),
        });
    }
    state.bubbles = bubbles;
}
