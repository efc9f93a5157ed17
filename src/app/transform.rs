use eframe::egui::{Pos2, Vec2, pos2};

use crate::config::ViewConfig;

/// Pan and zoom of the graph view. `pan` is in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewTransform {
    pub(in crate::app) zoom: f32,
    pub(in crate::app) pan: Vec2,
}

impl ViewTransform {
    pub(in crate::app) fn new(config: &ViewConfig) -> Self {
        Self {
            zoom: config.default_zoom.clamp(config.min_zoom, config.max_zoom),
            pan: Vec2::ZERO,
        }
    }

    pub(in crate::app) fn reset(&mut self, config: &ViewConfig) {
        *self = Self::new(config);
    }

    pub(in crate::app) fn zoom_by(&mut self, factor: f32, config: &ViewConfig) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.zoom = (self.zoom * factor).clamp(config.min_zoom, config.max_zoom);
    }

    pub(in crate::app) fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub(in crate::app) fn model_to_logical(&self, model: Vec2) -> Vec2 {
        model * self.zoom + self.pan
    }

    pub(in crate::app) fn logical_to_model(&self, logical: Vec2) -> Vec2 {
        (logical - self.pan) / self.zoom
    }
}

/// Size of the drawing surface. Physical size is `logical * dpr`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Surface {
    pub(in crate::app) logical: Vec2,
    pub(in crate::app) dpr: f32,
}

impl Surface {
    pub(in crate::app) fn new(logical: Vec2, dpr: f32) -> Self {
        Self { logical, dpr }
    }

    pub(in crate::app) fn physical(&self) -> Vec2 {
        self.logical * self.dpr
    }

    pub(in crate::app) fn is_drawable(&self) -> bool {
        self.dpr > 0.0 && self.physical().x >= 1.0 && self.physical().y >= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct DeviceTransform {
    dpr: f32,
    view: ViewTransform,
}

impl DeviceTransform {
    pub(in crate::app) fn new(surface: &Surface, view: ViewTransform) -> Self {
        Self {
            dpr: surface.dpr,
            view,
        }
    }

    pub(in crate::app) fn to_device(&self, model: Vec2) -> Pos2 {
        let device = self.view.model_to_logical(model) * self.dpr;
        pos2(device.x, device.y)
    }

    pub(in crate::app) fn to_model(&self, device: Pos2) -> Vec2 {
        self.view.logical_to_model(device.to_vec2() / self.dpr)
    }

    pub(in crate::app) fn scale(&self) -> f32 {
        self.view.zoom * self.dpr
    }
}
