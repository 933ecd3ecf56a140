//! Circular hit-testing for pointer/touch input

use glam::Vec2;

use super::state::Bubble;

/// Find the topmost unpopped bubble under the point.
///
/// Bubbles are tested from last-created (topmost) to first, skipping popped
/// ones; the first hit wins so overlapping circles never both respond to a
/// single input. `None` means the input landed on empty space, which is a
/// silent no-op rather than a scored miss.
pub fn hit_test(bubbles: &[Bubble], point: Vec2) -> Option<usize> {
    bubbles
        .iter()
        .enumerate()
        .rev()
        .find(|(_, bubble)| !bubble.popped && point.distance(bubble.pos) < bubble.radius)
        .map(|(idx, _)| idx)
}
