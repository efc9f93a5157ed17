use eframe::egui::{self, RichText, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::entities::{EntityType, Node};

use super::super::GraphView;
use super::super::render_utils::{dim_color, entity_color};

const SEARCH_RESULT_LIMIT: usize = 50;

impl GraphView {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Entities");
        ui.separator();
        ui.add_space(4.0);

        ui.label(RichText::new("Types").strong())
            .on_hover_text("Click a type to show only the selected types. No selection shows everything.");
        ui.add_space(2.0);

        for entity_type in self.legend_types() {
            let active = !self.selection.type_filter.is_empty()
                && self.selection.type_filter.contains(&entity_type);
            let visible = self.selection.is_type_visible(entity_type);
            let count = self.graph.type_count(entity_type);

            let clicked = ui
                .horizontal(|ui| {
                    let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                    let color = entity_color(entity_type);
                    ui.painter().circle_filled(
                        swatch.center(),
                        5.0,
                        if visible { color } else { dim_color(color, 0.35) },
                    );
                    ui.selectable_label(active, format!("{}  ({count})", entity_type.label()))
                        .clicked()
                })
                .inner;
            if clicked {
                self.toggle_type(entity_type);
            }
        }

        if !self.selection.type_filter.is_empty() && ui.small_button("Show all types").clicked() {
            self.selection.type_filter.clear();
        }

        let stats = &self.graph.stats;
        if !stats.relationship_types.is_empty() {
            ui.add_space(4.0);
            ui.collapsing("Relationship types", |ui| {
                for (kind, count) in &stats.relationship_types {
                    ui.label(format!("{}  ({count})", kind.replace('_', " ")));
                }
            });
        }
        if stats.total_entities > 0 || stats.total_relationships > 0 {
            ui.small(format!(
                "Extraction reported {} entities and {} relationships.",
                stats.total_entities, stats.total_relationships
            ));
        }

        ui.separator();
        ui.label("Search").on_hover_text("Fuzzy match on entity labels and values.");
        ui.text_edit_singleline(&mut self.search);

        let query = self.search.trim();
        if query.is_empty() {
            return;
        }

        let matches = rank_matches(&self.graph.nodes, query);
        if matches.is_empty() {
            ui.label("No matching entities.");
            return;
        }

        let mut picked = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for index in matches.into_iter().take(SEARCH_RESULT_LIMIT) {
                    let node = &self.graph.nodes[index];
                    let is_selected = self.selection.selected.as_deref() == Some(node.id.as_str());
                    let label = RichText::new(format!("{}  · {}", node.label, node.entity_type.label()))
                        .color(if self.selection.is_type_visible(node.entity_type) {
                            ui.visuals().text_color()
                        } else {
                            ui.visuals().weak_text_color()
                        });
                    if ui.selectable_label(is_selected, label).clicked() {
                        picked = Some(node.id.clone());
                    }
                }
            });

        if let Some(id) = picked {
            self.select(Some(id));
        }
    }

    fn legend_types(&self) -> Vec<EntityType> {
        let mut types = EntityType::ALL.to_vec();
        if self
            .graph
            .nodes
            .iter()
            .any(|node| node.entity_type == EntityType::Unknown)
        {
            types.push(EntityType::Unknown);
        }
        types
    }
}

/// Node indices matching `query`, best first. Ties keep graph order.
fn rank_matches(nodes: &[Node], query: &str) -> Vec<usize> {
    let matcher = SkimMatcherV2::default();
    let mut scored = nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let label_score = fuzzy_match_score(&matcher, &node.label, query);
            let value_score = node
                .value
                .as_deref()
                .and_then(|value| fuzzy_match_score(&matcher, value, query));
            label_score.max(value_score).map(|score| (index, score))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}
