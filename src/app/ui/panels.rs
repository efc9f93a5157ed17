use eframe::egui::{self, Align, Context, Layout};

use super::super::{GraphView, HostAction};

impl GraphView {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        origin: &str,
        is_loading: bool,
        can_extract: bool,
    ) -> Option<HostAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("contract-graph");
                    ui.separator();
                    let document = self.graph.document_id.as_deref().unwrap_or(origin);
                    ui.label(format!("document: {document}"));
                    ui.label(format!("entities: {}", self.graph.node_count()));
                    ui.label(format!("relationships: {}", self.graph.edge_count()));
                    if self.graph.dropped_edges > 0 {
                        ui.label(format!("({} skipped)", self.graph.dropped_edges))
                            .on_hover_text("Relationships whose endpoints are not in this graph");
                    }
                    ui.separator();

                    if ui.button("−").on_hover_text("Zoom out").clicked() {
                        self.zoom_out();
                    }
                    ui.label(format!("{}%", self.view.zoom_percent()));
                    if ui.button("+").on_hover_text("Zoom in").clicked() {
                        self.zoom_in();
                    }
                    if ui
                        .button("Reset")
                        .on_hover_text("Default zoom and pan, clear selection and filters")
                        .clicked()
                    {
                        self.reset();
                    }
                    ui.separator();

                    if ui
                        .add_enabled(!is_loading, egui::Button::new("Reload"))
                        .clicked()
                    {
                        action = Some(HostAction::Reload);
                    }
                    if can_extract
                        && ui
                            .add_enabled(!is_loading, egui::Button::new("Re-extract"))
                            .on_hover_text("Run entity extraction again and reload when done")
                            .clicked()
                    {
                        action = Some(HostAction::Reextract);
                    }
                    if is_loading {
                        ui.spinner();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(text) = self.visible_graph_text() {
                            ui.label(text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        action
    }

    fn visible_graph_text(&self) -> Option<String> {
        let stats = self.last_frame?;
        if stats.nodes_drawn == self.graph.node_count() {
            return None;
        }
        Some(format!(
            "showing {} of {} entities",
            stats.nodes_drawn,
            self.graph.node_count()
        ))
    }
}
