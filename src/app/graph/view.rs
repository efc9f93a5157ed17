use eframe::egui::{Align2, Sense, Ui, Vec2, vec2};

use crate::config::ViewConfig;
use crate::entities::EntityGraph;
use crate::util::truncate_label;

use super::super::GraphView;
use super::super::physics::KinematicState;
use super::super::render_utils::{
    BACKGROUND, EDGE_COLOR, EMPHASIS_PLATE, EMPHASIS_TEXT, LABEL_COLOR, SELECTED_RING,
    blend_color, dim_color, entity_color,
};
use super::super::selection::SelectionState;
use super::super::transform::{DeviceTransform, Surface, ViewTransform};
use super::canvas::{Canvas, EguiCanvas};

const EDGE_WIDTH: f32 = 1.0;
const LABEL_SIZE: f32 = 9.0;
const LABEL_GAP: f32 = 3.0;
const EMPHASIS_SIZE: f32 = 12.0;
const EMPHASIS_GAP: f32 = 6.0;
const RING_WIDTH: f32 = 1.5;

pub(in crate::app) struct Scene<'a> {
    pub(in crate::app) graph: &'a EntityGraph,
    pub(in crate::app) states: &'a [KinematicState],
    pub(in crate::app) view: ViewTransform,
    pub(in crate::app) selection: &'a SelectionState,
    pub(in crate::app) config: &'a ViewConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct FrameStats {
    pub(in crate::app) nodes_drawn: usize,
    pub(in crate::app) edges_drawn: usize,
}

/// Returns `None` when the canvas has no usable surface.
pub(in crate::app) fn render_frame(canvas: &mut impl Canvas, scene: &Scene<'_>) -> Option<FrameStats> {
    let surface = canvas.surface().filter(|surface| surface.is_drawable())?;
    let transform = DeviceTransform::new(&surface, scene.view);
    let scale = transform.scale();

    canvas.fill(BACKGROUND);

    let node_count = scene.graph.nodes.len().min(scene.states.len());
    let visible = scene.graph.nodes[..node_count]
        .iter()
        .map(|node| scene.selection.is_type_visible(node.entity_type))
        .collect::<Vec<_>>();

    let selected_index = scene
        .selection
        .selected
        .as_deref()
        .and_then(|id| scene.graph.index_of(id))
        .filter(|&index| index < node_count);
    let hovered_index = scene
        .selection
        .hovered
        .as_deref()
        .and_then(|id| scene.graph.index_of(id))
        .filter(|&index| index < node_count);

    let mut neighbors = vec![false; node_count];
    if let Some(selected) = selected_index {
        neighbors[selected] = true;
        for &(source, target) in &scene.graph.links {
            if source == selected && target < node_count {
                neighbors[target] = true;
            } else if target == selected && source < node_count {
                neighbors[source] = true;
            }
        }
    }

    let mut stats = FrameStats::default();

    for &(source, target) in &scene.graph.links {
        if source >= node_count || target >= node_count || !visible[source] || !visible[target] {
            continue;
        }

        let touches_selection =
            selected_index.is_some_and(|selected| source == selected || target == selected);
        let color = if touches_selection {
            blend_color(EDGE_COLOR, SELECTED_RING, 0.55)
        } else {
            EDGE_COLOR
        };

        canvas.line(
            transform.to_device(scene.states[source].position()),
            transform.to_device(scene.states[target].position()),
            EDGE_WIDTH * scale,
            color,
        );
        stats.edges_drawn += 1;
    }

    for (index, node) in scene.graph.nodes[..node_count].iter().enumerate() {
        if !visible[index] {
            continue;
        }

        let is_selected = selected_index == Some(index);
        let is_hovered = hovered_index == Some(index);
        let radius = if is_selected {
            scene.config.selected_node_radius
        } else {
            scene.config.node_radius
        };

        let base = entity_color(node.entity_type);
        let color = if selected_index.is_some() && !neighbors[index] {
            dim_color(base, 0.5)
        } else if is_hovered && !is_selected {
            blend_color(base, EMPHASIS_TEXT, 0.35)
        } else {
            base
        };
        let ring = is_selected.then_some((RING_WIDTH * scale, SELECTED_RING));

        canvas.circle(
            transform.to_device(scene.states[index].position()),
            radius * scale,
            color,
            ring,
        );
        stats.nodes_drawn += 1;
    }

    for (index, node) in scene.graph.nodes[..node_count].iter().enumerate() {
        if !visible[index] {
            continue;
        }

        let radius = if selected_index == Some(index) {
            scene.config.selected_node_radius
        } else {
            scene.config.node_radius
        };
        let anchor = scene.states[index].position() + vec2(0.0, radius + LABEL_GAP);
        canvas.text(
            transform.to_device(anchor),
            Align2::CENTER_TOP,
            &truncate_label(&node.label, scene.config.label_max_chars),
            LABEL_SIZE * scale,
            LABEL_COLOR,
        );
    }

    let emphasized = scene
        .selection
        .emphasized()
        .and_then(|id| scene.graph.index_of(id))
        .filter(|&index| index < node_count && visible[index]);
    if let Some(index) = emphasized {
        let radius = if selected_index == Some(index) {
            scene.config.selected_node_radius
        } else {
            scene.config.node_radius
        };
        let anchor = scene.states[index].position() - vec2(0.0, radius + EMPHASIS_GAP);
        canvas.plated_text(
            transform.to_device(anchor),
            Align2::CENTER_BOTTOM,
            &scene.graph.nodes[index].label,
            EMPHASIS_SIZE * scale,
            EMPHASIS_TEXT,
            EMPHASIS_PLATE,
        );
    }

    Some(stats)
}

impl GraphView {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let pixels_per_point = ui.ctx().pixels_per_point();
        self.measure_surface(rect.size(), pixels_per_point);

        self.handle_pointer(ui, rect, &response);

        if self.frame_loop.is_running() {
            self.simulator.tick();
        }

        let mut canvas = EguiCanvas::new(ui.painter_at(rect), rect, pixels_per_point);
        let scene = Scene {
            graph: &self.graph,
            states: self.simulator.states(),
            view: self.view,
            selection: &self.selection,
            config: &self.config,
        };
        self.last_frame = render_frame(&mut canvas, &scene);

        self.frame_loop.schedule(ui.ctx());
    }

    fn measure_surface(&mut self, logical: Vec2, pixels_per_point: f32) {
        let surface = Surface::new(logical, pixels_per_point);
        if self.surface != Some(surface) {
            tracing::debug!(
                width = logical.x,
                height = logical.y,
                dpr = pixels_per_point,
                "graph surface resized"
            );
            self.surface = Some(surface);
            if surface.is_drawable() {
                self.simulator.set_viewport(logical);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::graph::canvas::recording::{DrawOp, RecordingCanvas};
    use crate::app::physics::Simulator;
    use crate::config::ForceConstants;
    use crate::entities::{Edge, EntityType, GraphSnapshot, Node};
    use eframe::egui::pos2;

    fn node(id: &str, label: &str, entity_type: EntityType) -> Node {
        Node {
            id: id.to_owned(),
            label: label.to_owned(),
            entity_type,
            value: None,
            normalized: None,
        }
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            id: format!("{source}-{target}"),
            source: source.to_owned(),
            target: target.to_owned(),
            relationship_type: "party_to_contract".to_owned(),
            label: String::new(),
        }
    }

    fn graph() -> EntityGraph {
        EntityGraph::from_snapshot(GraphSnapshot {
            nodes: vec![
                node("p", "Acme Holdings LLC", EntityType::Party),
                node("d", "January 1, 2024", EntityType::Date),
                node("a", "$2,500,000", EntityType::Amount),
            ],
            edges: vec![edge("p", "d"), edge("p", "a"), edge("p", "missing")],
            ..Default::default()
        })
        .expect("valid graph")
    }

    fn states() -> Vec<KinematicState> {
        [(100.0, 100.0), (200.0, 100.0), (100.0, 200.0)]
            .into_iter()
            .map(|(x, y)| KinematicState {
                x,
                y,
                ..Default::default()
            })
            .collect()
    }

    fn render(
        canvas: &mut RecordingCanvas,
        graph: &EntityGraph,
        states: &[KinematicState],
        view: ViewTransform,
        selection: &SelectionState,
    ) -> Option<FrameStats> {
        let config = ViewConfig::default();
        render_frame(
            canvas,
            &Scene {
                graph,
                states,
                view,
                selection,
                config: &config,
            },
        )
    }

    fn identity() -> ViewTransform {
        ViewTransform {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    #[test]
    fn missing_or_empty_surface_skips_the_frame() {
        let graph = graph();
        let selection = SelectionState::default();

        let mut detached = RecordingCanvas::default();
        assert_eq!(render(&mut detached, &graph, &states(), identity(), &selection), None);
        assert!(detached.ops.is_empty());

        let mut collapsed = RecordingCanvas::with_surface(Surface::new(vec2(0.0, 0.0), 2.0));
        assert_eq!(render(&mut collapsed, &graph, &states(), identity(), &selection), None);
        assert!(collapsed.ops.is_empty());
    }

    #[test]
    fn passes_run_edges_then_nodes_then_labels() {
        let graph = graph();
        let mut canvas = RecordingCanvas::with_surface(Surface::new(vec2(400.0, 300.0), 1.0));
        let stats = render(
            &mut canvas,
            &graph,
            &states(),
            identity(),
            &SelectionState::default(),
        )
        .expect("drawn");

        assert_eq!(stats, FrameStats { nodes_drawn: 3, edges_drawn: 2 });
        let kinds = canvas
            .ops
            .iter()
            .map(|op| match op {
                DrawOp::Fill => 'f',
                DrawOp::Line => 'e',
                DrawOp::Circle { .. } => 'n',
                DrawOp::Text { .. } => 't',
                DrawOp::PlatedText { .. } => 'p',
            })
            .collect::<String>();
        assert_eq!(kinds, "feennnttt");
        assert!(canvas.plated().is_empty());
    }

    #[test]
    fn positions_follow_dpr_pan_then_zoom() {
        let graph = graph();
        let view = ViewTransform {
            zoom: 2.0,
            pan: vec2(10.0, 20.0),
        };
        let mut canvas = RecordingCanvas::with_surface(Surface::new(vec2(400.0, 300.0), 2.0));
        render(&mut canvas, &graph, &states(), view, &SelectionState::default());

        let circles = canvas.circles();
        assert_eq!(circles[0], (pos2((100.0 * 2.0 + 10.0) * 2.0, (100.0 * 2.0 + 20.0) * 2.0), 16.0));
        assert_eq!(circles[1].0, pos2((200.0 * 2.0 + 10.0) * 2.0, 440.0));
    }

    #[test]
    fn filtered_types_are_omitted_from_every_pass() {
        let graph = graph();
        let mut selection = SelectionState::default();
        selection.toggle_type(EntityType::Party);
        selection.toggle_type(EntityType::Date);
        selection.hovered = Some("a".to_owned());

        let mut canvas = RecordingCanvas::with_surface(Surface::new(vec2(400.0, 300.0), 1.0));
        let stats = render(&mut canvas, &graph, &states(), identity(), &selection).expect("drawn");

        assert_eq!(stats.nodes_drawn, 2);
        assert_eq!(stats.edges_drawn, 1);
        assert_eq!(canvas.lines(), 1);
        assert_eq!(canvas.texts(), vec!["Acme Holdings LLC", "January 1, 2024"]);
        assert!(canvas.plated().is_empty());
    }

    #[test]
    fn selection_wins_the_emphasized_label() {
        let graph = graph();
        let selection = SelectionState {
            selected: Some("d".to_owned()),
            hovered: Some("a".to_owned()),
            ..Default::default()
        };

        let mut canvas = RecordingCanvas::with_surface(Surface::new(vec2(400.0, 300.0), 1.0));
        render(&mut canvas, &graph, &states(), identity(), &selection);

        assert_eq!(canvas.plated(), vec!["January 1, 2024"]);
        let selected_circle = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Circle { center, radius, ringed, .. } if *center == pos2(200.0, 100.0) => {
                    Some((*radius, *ringed))
                }
                _ => None,
            })
            .expect("selected node drawn");
        assert_eq!(selected_circle, (6.0, true));
    }

    #[test]
    fn long_labels_are_truncated_beneath_nodes() {
        let graph = EntityGraph::from_snapshot(GraphSnapshot {
            nodes: vec![node(
                "t",
                "Initial term of thirty-six months from the effective date",
                EntityType::Term,
            )],
            ..Default::default()
        })
        .expect("valid graph");
        let states = vec![KinematicState {
            x: 50.0,
            y: 50.0,
            ..Default::default()
        }];

        let mut canvas = RecordingCanvas::with_surface(Surface::new(vec2(400.0, 300.0), 1.0));
        render(&mut canvas, &graph, &states, identity(), &SelectionState::default());

        let labels = canvas.texts();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].chars().count(), 18);
        assert!(labels[0].ends_with('…'));
    }

    #[test]
    fn filtering_never_changes_the_simulation() {
        let graph = graph();
        let ids = graph.nodes.iter().map(|node| node.id.as_str());
        let mut plain = Simulator::new(ForceConstants::default(), vec2(800.0, 600.0), ids, &graph.links);
        let ids = graph.nodes.iter().map(|node| node.id.as_str());
        let mut filtered = Simulator::new(ForceConstants::default(), vec2(800.0, 600.0), ids, &graph.links);

        let everything = SelectionState::default();
        let mut parties_only = SelectionState::default();
        parties_only.toggle_type(EntityType::Party);

        for _ in 0..200 {
            plain.tick();
            filtered.tick();
            let mut first = RecordingCanvas::with_surface(Surface::new(vec2(800.0, 600.0), 1.0));
            let mut second = RecordingCanvas::with_surface(Surface::new(vec2(800.0, 600.0), 1.0));
            render(&mut first, &graph, plain.states(), identity(), &everything);
            render(&mut second, &graph, filtered.states(), identity(), &parties_only);
            assert_eq!(second.circles().len(), 1);
        }

        assert_eq!(plain.states(), filtered.states());
    }
}
