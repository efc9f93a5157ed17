use eframe::egui::{self, CursorIcon, Pos2, Rect, Ui, Vec2};

use crate::config::ViewConfig;
use crate::entities::EntityGraph;

use super::super::GraphView;
use super::super::physics::Simulator;
use super::super::selection::SelectionState;
use super::super::transform::{DeviceTransform, Surface, ViewTransform};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum Gesture {
    #[default]
    Idle,
    /// `anchor` is in device pixels, `pan_origin` in logical pixels.
    PanDragging { anchor: Pos2, pan_origin: Vec2 },
    NodeDragging { index: usize },
}

pub(in crate::app) struct Targets<'a> {
    pub(in crate::app) graph: &'a EntityGraph,
    pub(in crate::app) simulator: &'a mut Simulator,
    pub(in crate::app) view: &'a mut ViewTransform,
    pub(in crate::app) selection: &'a mut SelectionState,
    pub(in crate::app) config: &'a ViewConfig,
    pub(in crate::app) surface: Surface,
}

impl Targets<'_> {
    fn to_model(&self, device: Pos2) -> Vec2 {
        DeviceTransform::new(&self.surface, *self.view).to_model(device)
    }

    /// Nearest node within the hit radius, measured in model units.
    fn hit_test(&self, device: Pos2) -> Option<usize> {
        let model = self.to_model(device);
        let radius = self.config.hit_radius;
        self.simulator
            .states()
            .iter()
            .enumerate()
            .map(|(index, state)| (index, (state.position() - model).length()))
            .filter(|&(_, distance)| distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    fn node_id(&self, index: usize) -> Option<String> {
        self.graph.nodes.get(index).map(|node| node.id.clone())
    }
}

/// Pointer and wheel gestures over the graph canvas. All positions are in
/// device pixels relative to the canvas origin.
#[derive(Debug, Default)]
pub(in crate::app) struct InteractionController {
    gesture: Gesture,
}

impl InteractionController {
    pub(in crate::app) fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub(in crate::app) fn pointer_down(&mut self, targets: &mut Targets<'_>, pointer: Pos2) {
        self.finish(targets);

        if let Some(index) = targets.hit_test(pointer) {
            if let Some(position) = targets.simulator.state(index).map(|state| state.position()) {
                targets.simulator.pin(index, position);
            }
            targets.selection.selected = targets.node_id(index);
            self.gesture = Gesture::NodeDragging { index };
        } else {
            self.gesture = Gesture::PanDragging {
                anchor: pointer,
                pan_origin: targets.view.pan,
            };
        }
        tracing::debug!(gesture = ?self.gesture, "gesture started");
    }

    pub(in crate::app) fn pointer_move(&mut self, targets: &mut Targets<'_>, pointer: Pos2) {
        match self.gesture {
            Gesture::Idle => {
                let hovered = targets.hit_test(pointer).and_then(|index| targets.node_id(index));
                targets.selection.hovered = hovered;
            }
            Gesture::PanDragging { anchor, pan_origin } => {
                let delta = (pointer - anchor) / targets.surface.dpr;
                targets.view.pan = pan_origin + delta;
            }
            Gesture::NodeDragging { index } => {
                let model = targets.to_model(pointer);
                targets.simulator.pin(index, model);
            }
        }
    }

    pub(in crate::app) fn pointer_up(&mut self, targets: &mut Targets<'_>) {
        self.finish(targets);
    }

    pub(in crate::app) fn pointer_leave(&mut self, targets: &mut Targets<'_>) {
        self.finish(targets);
        targets.selection.hovered = None;
    }

    pub(in crate::app) fn wheel(&mut self, targets: &mut Targets<'_>, delta_y: f32) {
        if delta_y > 0.0 {
            targets.view.zoom_by(targets.config.wheel_zoom_in, targets.config);
        } else if delta_y < 0.0 {
            targets.view.zoom_by(targets.config.wheel_zoom_out, targets.config);
        }
    }

    fn finish(&mut self, targets: &mut Targets<'_>) {
        match self.gesture {
            Gesture::Idle => return,
            Gesture::NodeDragging { index } => targets.simulator.release(index),
            Gesture::PanDragging { .. } => {}
        }
        tracing::debug!(gesture = ?self.gesture, "gesture ended");
        self.gesture = Gesture::Idle;
    }
}

impl GraphView {
    pub(in crate::app) fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let pixels_per_point = ui.ctx().pixels_per_point();
        let surface = Surface::new(rect.size(), pixels_per_point);
        if !surface.is_drawable() {
            return;
        }

        let (pressed, released, latest, scroll) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.latest_pos(),
                input.raw_scroll_delta.y,
            )
        });
        let inside = latest.is_some_and(|pos| rect.contains(pos)) && response.contains_pointer();
        let device = latest.map(|pos| ((pos - rect.min) * pixels_per_point).to_pos2());

        let mut targets = Targets {
            graph: &self.graph,
            simulator: &mut self.simulator,
            view: &mut self.view,
            selection: &mut self.selection,
            config: &self.config,
            surface,
        };
        let controller = &mut self.interaction;

        if self.pointer_inside && !inside {
            controller.pointer_leave(&mut targets);
        }
        self.pointer_inside = inside;

        if inside {
            if let Some(device) = device {
                if pressed {
                    controller.pointer_down(&mut targets, device);
                } else {
                    controller.pointer_move(&mut targets, device);
                }
            }
            if scroll.abs() > f32::EPSILON {
                controller.wheel(&mut targets, scroll);
            }
        }

        if released {
            controller.pointer_up(&mut targets);
        }

        let cursor = match controller.gesture() {
            Gesture::NodeDragging { .. } | Gesture::PanDragging { .. } => Some(CursorIcon::Grabbing),
            Gesture::Idle if inside && self.selection.hovered.is_some() => Some(CursorIcon::PointingHand),
            Gesture::Idle => None,
        };
        if let Some(cursor) = cursor {
            ui.ctx().set_cursor_icon(cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForceConstants;
    use crate::entities::{Edge, EntityType, GraphSnapshot, Node};
    use eframe::egui::{pos2, vec2};

    struct Fixture {
        graph: EntityGraph,
        simulator: Simulator,
        view: ViewTransform,
        selection: SelectionState,
        config: ViewConfig,
        surface: Surface,
    }

    impl Fixture {
        fn new() -> Self {
            let graph = EntityGraph::from_snapshot(GraphSnapshot {
                nodes: vec![
                    Node {
                        id: "party".to_owned(),
                        label: "Acme Holdings".to_owned(),
                        entity_type: EntityType::Party,
                        value: None,
                        normalized: None,
                    },
                    Node {
                        id: "date".to_owned(),
                        label: "March 3, 2024".to_owned(),
                        entity_type: EntityType::Date,
                        value: Some("2024-03-03".to_owned()),
                        normalized: None,
                    },
                ],
                edges: vec![Edge {
                    id: "e1".to_owned(),
                    source: "party".to_owned(),
                    target: "date".to_owned(),
                    relationship_type: "effective_on".to_owned(),
                    label: String::new(),
                }],
                ..Default::default()
            })
            .expect("valid graph");

            let mut simulator = Simulator::new(
                ForceConstants::default(),
                vec2(800.0, 600.0),
                graph.nodes.iter().map(|node| node.id.as_str()),
                &graph.links,
            );
            simulator.pin(0, vec2(100.0, 100.0));
            simulator.release(0);
            simulator.pin(1, vec2(300.0, 100.0));
            simulator.release(1);

            Self {
                graph,
                simulator,
                view: ViewTransform {
                    zoom: 1.0,
                    pan: Vec2::ZERO,
                },
                selection: SelectionState::default(),
                config: ViewConfig::default(),
                surface: Surface::new(vec2(800.0, 600.0), 2.0),
            }
        }

        fn targets(&mut self) -> Targets<'_> {
            Targets {
                graph: &self.graph,
                simulator: &mut self.simulator,
                view: &mut self.view,
                selection: &mut self.selection,
                config: &self.config,
                surface: self.surface,
            }
        }
    }

    #[test]
    fn pressing_a_node_pins_and_selects_it() {
        let mut fixture = Fixture::new();
        let mut controller = InteractionController::default();

        // 12 model units off the party at dpr 2.
        controller.pointer_down(&mut fixture.targets(), pos2(224.0, 200.0));

        assert_eq!(controller.gesture(), Gesture::NodeDragging { index: 0 });
        assert_eq!(fixture.selection.selected.as_deref(), Some("party"));
        let party = fixture.simulator.state(0).expect("party");
        assert_eq!((party.fx, party.fy), (Some(100.0), Some(100.0)));
    }

    #[test]
    fn dragging_follows_the_pointer_in_model_space() {
        let mut fixture = Fixture::new();
        fixture.view.zoom = 2.0;
        fixture.view.pan = vec2(-50.0, 0.0);
        let mut controller = InteractionController::default();

        // Party sits at logical (150, 200), device (300, 400).
        controller.pointer_down(&mut fixture.targets(), pos2(300.0, 400.0));
        controller.pointer_move(&mut fixture.targets(), pos2(500.0, 240.0));

        let party = fixture.simulator.state(0).expect("party");
        assert_eq!(party.position(), vec2(150.0, 60.0));

        fixture.simulator.tick();
        assert_eq!(fixture.simulator.state(0).expect("party").position(), vec2(150.0, 60.0));

        controller.pointer_up(&mut fixture.targets());
        assert_eq!(controller.gesture(), Gesture::Idle);
        assert_eq!(fixture.simulator.state(0).expect("party").fx, None);
    }

    #[test]
    fn pressing_empty_space_pans_by_the_logical_delta() {
        let mut fixture = Fixture::new();
        fixture.view.pan = vec2(10.0, 10.0);
        let mut controller = InteractionController::default();

        controller.pointer_down(&mut fixture.targets(), pos2(1000.0, 1000.0));
        assert!(matches!(controller.gesture(), Gesture::PanDragging { .. }));
        assert_eq!(fixture.selection.selected, None);

        controller.pointer_move(&mut fixture.targets(), pos2(1040.0, 980.0));
        assert_eq!(fixture.view.pan, vec2(30.0, 0.0));
        controller.pointer_move(&mut fixture.targets(), pos2(1000.0, 1000.0));
        assert_eq!(fixture.view.pan, vec2(10.0, 10.0));
        assert!(fixture.simulator.states().iter().all(|state| state.fx.is_none()));
    }

    #[test]
    fn leaving_releases_the_dragged_node() {
        let mut fixture = Fixture::new();
        let mut controller = InteractionController::default();

        controller.pointer_down(&mut fixture.targets(), pos2(600.0, 200.0));
        assert_eq!(controller.gesture(), Gesture::NodeDragging { index: 1 });
        controller.pointer_leave(&mut fixture.targets());

        assert_eq!(controller.gesture(), Gesture::Idle);
        assert_eq!(fixture.simulator.state(1).expect("date").fx, None);
        assert_eq!(fixture.selection.selected.as_deref(), Some("date"));
    }

    #[test]
    fn idle_moves_only_update_hover() {
        let mut fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let before = fixture.simulator.states().to_vec();

        controller.pointer_move(&mut fixture.targets(), pos2(610.0, 210.0));
        assert_eq!(fixture.selection.hovered.as_deref(), Some("date"));
        controller.pointer_move(&mut fixture.targets(), pos2(10.0, 10.0));
        assert_eq!(fixture.selection.hovered, None);

        assert_eq!(controller.gesture(), Gesture::Idle);
        assert_eq!(fixture.selection.selected, None);
        assert_eq!(fixture.view.pan, Vec2::ZERO);
        assert_eq!(fixture.simulator.states(), before.as_slice());
    }

    #[test]
    fn hit_radius_is_wider_than_the_drawn_node() {
        let mut fixture = Fixture::new();
        let mut controller = InteractionController::default();

        // 19 model units away: outside the 4 unit circle, inside the hit radius.
        controller.pointer_down(&mut fixture.targets(), pos2(238.0, 200.0));
        assert_eq!(controller.gesture(), Gesture::NodeDragging { index: 0 });
        controller.pointer_up(&mut fixture.targets());

        // 21 model units away misses.
        controller.pointer_down(&mut fixture.targets(), pos2(242.0, 200.0));
        assert!(matches!(controller.gesture(), Gesture::PanDragging { .. }));
    }

    #[test]
    fn wheel_steps_are_clamped() {
        let mut fixture = Fixture::new();
        let mut controller = InteractionController::default();

        controller.wheel(&mut fixture.targets(), 1.0);
        assert!((fixture.view.zoom - 1.1).abs() < 1e-6);
        controller.wheel(&mut fixture.targets(), -1.0);
        assert!((fixture.view.zoom - 0.99).abs() < 1e-6);

        for _ in 0..100 {
            controller.wheel(&mut fixture.targets(), -3.0);
        }
        assert_eq!(fixture.view.zoom, 0.3);
        for _ in 0..100 {
            controller.wheel(&mut fixture.targets(), 3.0);
        }
        assert_eq!(fixture.view.zoom, 3.0);
    }
}
