use eframe::egui::Color32;

use crate::entities::EntityType;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(38, 44, 52, 90);
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(186, 192, 201);
pub(super) const EMPHASIS_TEXT: Color32 = Color32::from_rgb(246, 246, 246);
pub(super) const EMPHASIS_PLATE: Color32 = Color32::from_rgba_premultiplied(10, 12, 16, 220);
pub(super) const SELECTED_RING: Color32 = Color32::from_rgb(245, 206, 93);

pub(super) fn entity_color(entity_type: EntityType) -> Color32 {
    match entity_type {
        EntityType::Party => Color32::from_rgb(59, 130, 246),
        EntityType::Person => Color32::from_rgb(139, 92, 246),
        EntityType::Date => Color32::from_rgb(16, 185, 129),
        EntityType::Amount => Color32::from_rgb(245, 158, 11),
        EntityType::Location => Color32::from_rgb(239, 68, 68),
        EntityType::Term => Color32::from_rgb(6, 182, 212),
        EntityType::Percentage => Color32::from_rgb(236, 72, 153),
        EntityType::Unknown => Color32::from_rgb(148, 163, 184),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}
