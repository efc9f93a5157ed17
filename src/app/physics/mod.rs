mod forces;

use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::config::ForceConstants;
use crate::util::stable_pair;

use forces::{centering, repulsion_between, spring_between};

const SEED_JITTER: f32 = 20.0;
const SEED_RADIUS_FRACTION: f32 = 0.3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct KinematicState {
    pub(in crate::app) x: f32,
    pub(in crate::app) y: f32,
    pub(in crate::app) vx: f32,
    pub(in crate::app) vy: f32,
    pub(in crate::app) fx: Option<f32>,
    pub(in crate::app) fy: Option<f32>,
}

impl KinematicState {
    pub(in crate::app) fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    fn apply_pin(&mut self) {
        if let Some(fx) = self.fx {
            self.x = fx;
            self.vx = 0.0;
        }
        if let Some(fy) = self.fy {
            self.y = fy;
            self.vy = 0.0;
        }
    }
}

/// `states[i]` belongs to node `i` of the graph it was built from, and `links`
/// only ever reference indices below `states.len()`.
pub(in crate::app) struct Simulator {
    constants: ForceConstants,
    viewport: Vec2,
    states: Vec<KinematicState>,
    links: Vec<(usize, usize)>,
    forces: Vec<Vec2>,
}

impl Simulator {
    pub(in crate::app) fn new<'a>(
        constants: ForceConstants,
        viewport: Vec2,
        node_ids: impl IntoIterator<Item = &'a str>,
        links: &[(usize, usize)],
    ) -> Self {
        let states = seed_states(node_ids, viewport);
        let node_count = states.len();
        let links = links
            .iter()
            .copied()
            .filter(|&(source, target)| source < node_count && target < node_count)
            .collect();

        Self {
            constants,
            viewport,
            states,
            links,
            forces: Vec::with_capacity(node_count),
        }
    }

    pub(in crate::app) fn reseeded<'a>(
        &self,
        node_ids: impl IntoIterator<Item = &'a str>,
        links: &[(usize, usize)],
    ) -> Self {
        Self::new(self.constants, self.viewport, node_ids, links)
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.states.len()
    }

    pub(in crate::app) fn states(&self) -> &[KinematicState] {
        &self.states
    }

    pub(in crate::app) fn state(&self, index: usize) -> Option<&KinematicState> {
        self.states.get(index)
    }

    pub(in crate::app) fn set_viewport(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.viewport = size;
        }
    }

    pub(in crate::app) fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(state) = self.states.get_mut(index) {
            state.fx = Some(position.x);
            state.fy = Some(position.y);
            state.apply_pin();
        }
    }

    pub(in crate::app) fn release(&mut self, index: usize) {
        if let Some(state) = self.states.get_mut(index) {
            state.fx = None;
            state.fy = None;
        }
    }

    pub(in crate::app) fn tick(&mut self) {
        let node_count = self.states.len();
        if node_count == 0 {
            return;
        }

        for state in &mut self.states {
            state.apply_pin();
        }

        let constants = self.constants;
        let forces = &mut self.forces;
        forces.clear();
        forces.resize(node_count, Vec2::ZERO);

        for (index, force) in forces.iter_mut().enumerate() {
            let position = self.states[index].position();
            for (other_index, other) in self.states.iter().enumerate() {
                if other_index == index {
                    continue;
                }
                *force += repulsion_between(
                    position - other.position(),
                    index,
                    other_index,
                    &constants,
                );
            }
        }

        let center = self.viewport * 0.5;
        for (state, force) in self.states.iter().zip(forces.iter_mut()) {
            *force += centering(state.position(), center, constants.center_force);
        }

        for &(source, target) in &self.links {
            if source == target {
                continue;
            }
            let pull = spring_between(
                self.states[source].position(),
                self.states[target].position(),
                constants.attraction,
            );
            forces[source] += pull;
            forces[target] -= pull;
        }

        let max_velocity = constants.max_velocity;
        for (state, force) in self.states.iter_mut().zip(forces.iter()) {
            if state.fx.is_none() {
                state.vx = ((state.vx + force.x) * constants.damping).clamp(-max_velocity, max_velocity);
                state.x += state.vx;
            }
            if state.fy.is_none() {
                state.vy = ((state.vy + force.y) * constants.damping).clamp(-max_velocity, max_velocity);
                state.y += state.vy;
            }
        }

        let (min_x, max_x) = inset_range(self.viewport.x, constants.boundary_inset);
        let (min_y, max_y) = inset_range(self.viewport.y, constants.boundary_inset);
        for state in &mut self.states {
            if state.fx.is_none() && !(min_x..=max_x).contains(&state.x) {
                state.x = state.x.clamp(min_x, max_x);
                state.vx = 0.0;
            }
            if state.fy.is_none() && !(min_y..=max_y).contains(&state.y) {
                state.y = state.y.clamp(min_y, max_y);
                state.vy = 0.0;
            }
        }
    }
}

fn inset_range(extent: f32, inset: f32) -> (f32, f32) {
    if extent > inset * 2.0 {
        (inset, extent - inset)
    } else {
        let middle = extent * 0.5;
        (middle, middle)
    }
}

fn seed_states<'a>(node_ids: impl IntoIterator<Item = &'a str>, viewport: Vec2) -> Vec<KinematicState> {
    let node_ids = node_ids.into_iter().collect::<Vec<_>>();
    let count = node_ids.len();
    let center = viewport * 0.5;
    let radius = viewport.x.min(viewport.y) * SEED_RADIUS_FRACTION;

    node_ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let angle = (index as f32 / count as f32) * TAU;
            let (jx, jy) = stable_pair(id);
            let position =
                center + vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * SEED_JITTER;
            KinematicState {
                x: position.x,
                y: position.y,
                ..Default::default()
            }
        })
        .collect()
}
