use eframe::egui::{self, RichText, Ui};

use crate::entities::{Edge, EntityGraph, Node};

use super::super::GraphView;
use super::super::render_utils::entity_color;

impl GraphView {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selection.selected.clone() else {
            ui.label("Select an entity in the graph or from the search results.");
            return;
        };

        let Some(index) = self.graph.index_of(&selected_id) else {
            ui.label("The selected entity is not part of this graph.");
            return;
        };
        let node = &self.graph.nodes[index];

        ui.label(RichText::new(node.label.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Type:");
            ui.label(
                RichText::new(node.entity_type.label()).color(entity_color(node.entity_type)),
            );
        });
        if let Some(value) = &node.value {
            ui.label(format!("Value: {value}"));
        }
        if let Some(normalized) = &node.normalized {
            ui.label(format!("Normalized: {normalized}"));
        }
        ui.label(format!("Connections: {}", self.graph.degree(index)));

        if !self.selection.is_type_visible(node.entity_type) {
            ui.add_space(4.0);
            ui.label(RichText::new("Hidden by the current type filter.").weak());
        }

        ui.separator();
        ui.label(RichText::new("Relationships").strong());

        let rows = relationship_rows(&self.graph, index);
        let mut picked = None;
        if rows.is_empty() {
            ui.label("No relationships for this entity.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("relationships_scroll")
                .max_height(360.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for row in rows {
                        if ui.link(row.text).on_hover_text(row.hover).clicked() {
                            picked = Some(row.other_id);
                        }
                    }
                });
        }

        ui.add_space(6.0);
        if ui.button("Clear selection").clicked() {
            self.select(None);
        } else if picked.is_some() {
            self.select(picked);
        }
    }
}

struct RelationshipRow {
    text: String,
    hover: String,
    other_id: String,
}

fn relationship_rows(graph: &EntityGraph, index: usize) -> Vec<RelationshipRow> {
    graph
        .relationships_of(index)
        .map(|(edge, other)| RelationshipRow {
            text: relationship_text(edge, other),
            hover: format!("{} · {}", other.entity_type.label(), edge.id),
            other_id: other.id.clone(),
        })
        .collect()
}

fn relationship_text(edge: &Edge, other: &Node) -> String {
    let kind = if edge.label.is_empty() {
        edge.relationship_type.replace('_', " ")
    } else {
        edge.label.clone()
    };
    format!("{kind} → {}", other.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityType, GraphSnapshot};

    fn edge(label: &str) -> Edge {
        Edge {
            id: "e1".to_owned(),
            source: "p1".to_owned(),
            target: "d1".to_owned(),
            relationship_type: "effective_on".to_owned(),
            label: label.to_owned(),
        }
    }

    fn date() -> Node {
        Node {
            id: "d1".to_owned(),
            label: "May 5, 2025".to_owned(),
            entity_type: EntityType::Date,
            value: None,
            normalized: Some("2025-05-05".to_owned()),
        }
    }

    #[test]
    fn relationship_text_prefers_the_edge_label() {
        assert_eq!(relationship_text(&edge("takes effect"), &date()), "takes effect → May 5, 2025");
        assert_eq!(relationship_text(&edge(""), &date()), "effective on → May 5, 2025");
    }

    #[test]
    fn rows_link_to_the_far_endpoint() {
        let party = Node {
            id: "p1".to_owned(),
            label: "Acme".to_owned(),
            entity_type: EntityType::Party,
            value: None,
            normalized: None,
        };
        let graph = EntityGraph::from_snapshot(GraphSnapshot {
            nodes: vec![party, date()],
            edges: vec![edge("takes effect")],
            ..Default::default()
        })
        .expect("valid graph");

        let rows = relationship_rows(&graph, 0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "takes effect → May 5, 2025");
        assert_eq!(rows[0].hover, "Date · e1");
        assert_eq!(rows[0].other_id, "d1");
        assert_eq!(relationship_rows(&graph, 1)[0].other_id, "p1");
    }
}
