use eframe::egui::{Vec2, vec2};

use crate::config::ForceConstants;

fn direction_between(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let (low, high) = (from.min(to), from.max(to));
        let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
        let direction = vec2(angle.cos(), angle.sin());
        if from <= to { direction } else { -direction }
    }
}

/// Push on `from` away from `to`, where `delta = pos[from] - pos[to]`.
pub(super) fn repulsion_between(
    delta: Vec2,
    from: usize,
    to: usize,
    constants: &ForceConstants,
) -> Vec2 {
    let distance = delta.length();
    let direction = direction_between(delta, distance, from, to);

    let mut magnitude = 0.0;
    if distance < constants.min_distance {
        magnitude += (constants.min_distance - distance) * constants.separation_strength;
    }

    let safe_distance = distance.max(constants.min_repulsion_distance);
    magnitude += constants.repulsion / (safe_distance * safe_distance);

    direction * magnitude
}

pub(super) fn spring_between(source: Vec2, target: Vec2, attraction: f32) -> Vec2 {
    (target - source) * attraction
}

pub(super) fn centering(position: Vec2, center: Vec2, strength: f32) -> Vec2 {
    (center - position) * strength
}
