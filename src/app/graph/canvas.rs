use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, vec2};

use super::super::transform::Surface;

pub(in crate::app) trait Canvas {
    fn surface(&self) -> Option<Surface>;

    fn fill(&mut self, color: Color32);

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, ring: Option<(f32, Color32)>);

    fn text(&mut self, anchor: Pos2, align: Align2, text: &str, size: f32, color: Color32);

    fn plated_text(
        &mut self,
        anchor: Pos2,
        align: Align2,
        text: &str,
        size: f32,
        color: Color32,
        plate: Color32,
    );
}

/// Paints through egui, which works in points; device pixels are divided by
/// `pixels_per_point` on the way in.
pub(in crate::app) struct EguiCanvas {
    painter: Painter,
    rect: Rect,
    pixels_per_point: f32,
}

impl EguiCanvas {
    pub(in crate::app) fn new(painter: Painter, rect: Rect, pixels_per_point: f32) -> Self {
        Self {
            painter,
            rect,
            pixels_per_point,
        }
    }

    fn point(&self, device: Pos2) -> Pos2 {
        self.rect.min + device.to_vec2() / self.pixels_per_point
    }

    fn length(&self, device: f32) -> f32 {
        device / self.pixels_per_point
    }
}

impl Canvas for EguiCanvas {
    fn surface(&self) -> Option<Surface> {
        if !self.rect.is_finite() || self.pixels_per_point <= 0.0 {
            return None;
        }
        Some(Surface::new(self.rect.size(), self.pixels_per_point))
    }

    fn fill(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        self.painter.line_segment(
            [self.point(from), self.point(to)],
            Stroke::new(self.length(width), color),
        );
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, ring: Option<(f32, Color32)>) {
        let center = self.point(center);
        let radius = self.length(radius);
        self.painter.circle_filled(center, radius, fill);
        if let Some((width, color)) = ring {
            self.painter
                .circle_stroke(center, radius, Stroke::new(self.length(width), color));
        }
    }

    fn text(&mut self, anchor: Pos2, align: Align2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            self.point(anchor),
            align,
            text,
            FontId::proportional(self.length(size)),
            color,
        );
    }

    fn plated_text(
        &mut self,
        anchor: Pos2,
        align: Align2,
        text: &str,
        size: f32,
        color: Color32,
        plate: Color32,
    ) {
        let padding = vec2(5.0, 3.0);
        let galley = self.painter.layout_no_wrap(
            text.to_owned(),
            FontId::proportional(self.length(size)),
            color,
        );
        let plate_rect = align.anchor_size(self.point(anchor), galley.size() + padding * 2.0);
        self.painter.rect_filled(plate_rect, 3.0, plate);
        self.painter.galley(plate_rect.min + padding, galley, color);
    }
}

#[cfg(test)]
pub(in crate::app) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(in crate::app) enum DrawOp {
        Fill,
        Line,
        Circle { center: Pos2, radius: f32, ringed: bool },
        Text { text: String },
        PlatedText { text: String },
    }

    #[derive(Default)]
    pub(in crate::app) struct RecordingCanvas {
        pub(in crate::app) surface: Option<Surface>,
        pub(in crate::app) ops: Vec<DrawOp>,
    }

    impl RecordingCanvas {
        pub(in crate::app) fn with_surface(surface: Surface) -> Self {
            Self {
                surface: Some(surface),
                ops: Vec::new(),
            }
        }

        pub(in crate::app) fn circles(&self) -> Vec<(Pos2, f32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Circle { center, radius, .. } => Some((*center, *radius)),
                    _ => None,
                })
                .collect()
        }

        pub(in crate::app) fn lines(&self) -> usize {
            self.ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Line))
                .count()
        }

        pub(in crate::app) fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub(in crate::app) fn plated(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::PlatedText { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn surface(&self) -> Option<Surface> {
            self.surface
        }

        fn fill(&mut self, _color: Color32) {
            self.ops.push(DrawOp::Fill);
        }

        fn line(&mut self, _from: Pos2, _to: Pos2, _width: f32, _color: Color32) {
            self.ops.push(DrawOp::Line);
        }

        fn circle(&mut self, center: Pos2, radius: f32, _fill: Color32, ring: Option<(f32, Color32)>) {
            self.ops.push(DrawOp::Circle {
                center,
                radius,
                ringed: ring.is_some(),
            });
        }

        fn text(&mut self, _anchor: Pos2, _align: Align2, text: &str, _size: f32, _color: Color32) {
            self.ops.push(DrawOp::Text {
                text: text.to_owned(),
            });
        }

        fn plated_text(
            &mut self,
            _anchor: Pos2,
            _align: Align2,
            text: &str,
            _size: f32,
            _color: Color32,
            _plate: Color32,
        ) {
            self.ops.push(DrawOp::PlatedText {
                text: text.to_owned(),
            });
        }
    }
}
