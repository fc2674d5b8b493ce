use egui::{Color32, Context, Rounding, Stroke, Visuals};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Theme {
    Light,
    Dark,
}

/// Apply the selected theme
pub fn apply_theme(ctx: &Context, theme: Theme) {
    let mut visuals = match theme {
        Theme::Light => Visuals::light(),
        Theme::Dark => {
            // Use our custom theme
            let mut visuals = Visuals::dark();
            visuals.panel_fill = Color32::from_rgb(28, 28, 32);
            visuals
        }
    };

    // Selected entries and the label editor share the accent color
    visuals.selection.bg_fill = Color32::from_rgb(0, 92, 128);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(0, 140, 230));
    visuals.window_rounding = Rounding::same(4.0);

    ctx.set_visuals(visuals);
}
