use eframe::egui::vec2;

use crate::config::EngineConfig;
use crate::entities::{EntityGraph, EntityType};

use super::super::frame_loop::FrameLoop;
use super::super::physics::Simulator;
use super::super::selection::SelectionState;
use super::super::transform::ViewTransform;
use super::super::GraphView;
use super::interaction::InteractionController;

impl GraphView {
    pub(in crate::app) fn new(graph: EntityGraph, config: &EngineConfig) -> Self {
        let [width, height] = config.view.initial_viewport;
        let simulator = Simulator::new(
            config.physics,
            vec2(width, height),
            graph.nodes.iter().map(|node| node.id.as_str()),
            &graph.links,
        );
        tracing::debug!(nodes = simulator.len(), "frame loop started");

        Self {
            graph,
            simulator,
            view: ViewTransform::new(&config.view),
            selection: SelectionState::default(),
            config: config.view,
            interaction: InteractionController::default(),
            frame_loop: FrameLoop::start(),
            surface: None,
            pointer_inside: false,
            last_frame: None,
            search: String::new(),
        }
    }

    pub(in crate::app) fn zoom_in(&mut self) {
        self.view.zoom_by(self.config.button_zoom_step, &self.config);
    }

    pub(in crate::app) fn zoom_out(&mut self) {
        self.view.zoom_by(1.0 / self.config.button_zoom_step, &self.config);
    }

    pub(in crate::app) fn reset(&mut self) {
        self.view.reset(&self.config);
        self.selection.reset();
        self.interaction = InteractionController::default();
        self.simulator = self
            .simulator
            .reseeded(self.graph.nodes.iter().map(|node| node.id.as_str()), &self.graph.links);
        tracing::debug!(nodes = self.simulator.len(), "layout reseeded");
    }

    pub(in crate::app) fn toggle_type(&mut self, entity_type: EntityType) {
        self.selection.toggle_type(entity_type);
    }

    pub(in crate::app) fn select(&mut self, id: Option<String>) {
        if id.as_deref().is_some_and(|id| self.graph.index_of(id).is_none()) {
            return;
        }
        self.selection.selected = id;
    }

    pub(in crate::app) fn close(&mut self) {
        self.frame_loop.stop();
    }
}

impl Drop for GraphView {
    fn drop(&mut self) {
        self.close();
    }
}
