use eframe::egui::{self, Color32, Rounding, Stroke};

pub const BACKGROUND: Color32 = Color32::from_rgb(0x12, 0x12, 0x12);
pub const FIELD: Color32 = Color32::from_rgb(0x1e, 0x1e, 0x1e);
pub const BORDER: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
pub const BUTTON: Color32 = Color32::from_rgb(0x3f, 0x51, 0xb5);
pub const BUTTON_BORDER: Color32 = Color32::from_rgb(0x2c, 0x38, 0x7e);
pub const BUTTON_HOVER: Color32 = Color32::from_rgb(0x5c, 0x6b, 0xc0);
pub const BUTTON_HOVER_BORDER: Color32 = Color32::from_rgb(0x39, 0x49, 0xab);
pub const BUTTON_PRESSED: Color32 = Color32::from_rgb(0x28, 0x35, 0x93);
pub const BUTTON_PRESSED_BORDER: Color32 = Color32::from_rgb(0x1a, 0x23, 0x7e);

pub fn visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    let rounding = Rounding::same(5.0);
    v.override_text_color = Some(Color32::WHITE);
    v.panel_fill = BACKGROUND;
    v.window_fill = FIELD;
    v.extreme_bg_color = FIELD;
    v.window_rounding = rounding;
    v.selection.bg_fill = BUTTON;

    v.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER);
    v.widgets.inactive.weak_bg_fill = BUTTON;
    v.widgets.inactive.bg_fill = FIELD;
    v.widgets.inactive.bg_stroke = Stroke::new(2.0, BUTTON_BORDER);
    v.widgets.inactive.rounding = rounding;
    v.widgets.hovered.weak_bg_fill = BUTTON_HOVER;
    v.widgets.hovered.bg_stroke = Stroke::new(2.0, BUTTON_HOVER_BORDER);
    v.widgets.hovered.rounding = rounding;
    v.widgets.active.weak_bg_fill = BUTTON_PRESSED;
    v.widgets.active.bg_stroke = Stroke::new(2.0, BUTTON_PRESSED_BORDER);
    v.widgets.active.rounding = rounding;
    v
}

pub fn apply(ctx: &egui::Context) {
    ctx.set_visuals(visuals());
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
