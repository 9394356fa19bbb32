//! Direction pad
//!
//! A square the user clicks to place the sound source. The blue dot marks the
//! listener at the centre, the green dot the last click.

use eframe::egui::{self, Color32, Pos2, Stroke, Vec2};

/// Display settings for the pad
#[derive(Clone)]
pub struct PadSettings {
    pub background: Color32,
    pub border: Color32,
    pub center_color: Color32,
    pub center_radius: f32,
    pub marker_color: Color32,
    pub marker_radius: f32,
    pub show_guides: bool,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            border: Color32::BLACK,
            center_color: Color32::from_rgb(0, 100, 255),
            center_radius: 8.0,
            marker_color: Color32::from_rgb(0, 255, 0),
            marker_radius: 10.0,
            show_guides: false,
        }
    }
}

/// A click on the pad, in pad-local coordinates (origin at the top left)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PadClick {
    pub pointer: (f64, f64),
    pub center: (f64, f64),
}

/// Square click pad widget
#[derive(Default)]
pub struct DirectionPad {
    pub settings: PadSettings,
    /// Last click, relative to the pad's top-left corner
    last_click: Option<Vec2>,
}

impl DirectionPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a `side` x `side` pad and report a click on it, if any
    pub fn show(&mut self, ui: &mut egui::Ui, side: f32) -> Option<PadClick> {
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), egui::Sense::click());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, self.settings.background);
        painter.rect_stroke(rect, 0.0, Stroke::new(2.0, self.settings.border));

        // Integer centre, like the pixel grid the clicks arrive on
        let local_center = Vec2::new((rect.width() as i32 / 2) as f32, (rect.height() as i32 / 2) as f32);
        let center = rect.min + local_center;

        if self.settings.show_guides {
            let guide = Stroke::new(0.5, Color32::from_gray(200));
            painter.line_segment([Pos2::new(center.x, rect.top()), Pos2::new(center.x, rect.bottom())], guide);
            painter.line_segment([Pos2::new(rect.left(), center.y), Pos2::new(rect.right(), center.y)], guide);
        }

        painter.circle_filled(center, self.settings.center_radius, self.settings.center_color);

        let mut click = None;
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = (pos - rect.min).floor();
                self.last_click = Some(local);
                click = Some(PadClick {
                    pointer: (local.x as f64, local.y as f64),
                    center: (local_center.x as f64, local_center.y as f64),
                });
            }
        }

        if let Some(local) = self.last_click {
            painter.circle_filled(rect.min + local, self.settings.marker_radius, self.settings.marker_color);
        }

        click
    }
}
