//! Colour palettes for the three window themes.

use eframe::egui;
use egui::Color32;

use crate::config::Theme;

/// The five colours a theme is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color32,
    pub fg: Color32,
    pub button: Color32,
    pub highlight: Color32,
    pub frame: Color32,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color32::from_rgb(0xf0, 0xf0, 0xf0),
                fg: Color32::from_rgb(0x00, 0x00, 0x00),
                button: Color32::from_rgb(0xe0, 0xe0, 0xe0),
                highlight: Color32::from_rgb(0x00, 0x78, 0xd7),
                frame: Color32::from_rgb(0xe9, 0xe9, 0xe9),
            },
            Theme::Dark => Self {
                bg: Color32::from_rgb(0x2d, 0x2d, 0x2d),
                fg: Color32::from_rgb(0xff, 0xff, 0xff),
                button: Color32::from_rgb(0x3d, 0x3d, 0x3d),
                highlight: Color32::from_rgb(0x00, 0x78, 0xd7),
                frame: Color32::from_rgb(0x38, 0x38, 0x38),
            },
            Theme::Hacker => Self {
                bg: Color32::from_rgb(0x0a, 0x0a, 0x0a),
                fg: Color32::from_rgb(0x00, 0xff, 0x41),
                button: Color32::from_rgb(0x22, 0x22, 0x22),
                highlight: Color32::from_rgb(0x96, 0x00, 0xff),
                frame: Color32::from_rgb(0x1a, 0x1a, 0x1a),
            },
        }
    }
}

/// Build egui visuals for `theme`, starting from egui's light or dark base.
pub fn visuals(theme: Theme) -> egui::Visuals {
    let p = Palette::for_theme(theme);
    let mut v = match theme {
        Theme::Light => egui::Visuals::light(),
        Theme::Dark | Theme::Hacker => egui::Visuals::dark(),
    };

    v.override_text_color = Some(p.fg);
    v.panel_fill = p.bg;
    v.window_fill = p.bg;
    v.extreme_bg_color = p.frame;
    v.faint_bg_color = p.frame;
    v.hyperlink_color = p.highlight;
    v.selection.bg_fill = p.highlight;
    v.selection.stroke.color = p.fg;

    v.widgets.noninteractive.bg_fill = p.frame;
    v.widgets.noninteractive.bg_stroke.color = p.button;
    for w in [
        &mut v.widgets.inactive,
        &mut v.widgets.hovered,
        &mut v.widgets.active,
        &mut v.widgets.open,
    ] {
        w.bg_fill = p.button;
        w.weak_bg_fill = p.button;
        w.fg_stroke.color = p.fg;
    }
    v.widgets.hovered.bg_stroke.color = p.highlight;
    v.widgets.active.bg_fill = p.highlight;
    v.widgets.active.weak_bg_fill = p.highlight;
    v
}
