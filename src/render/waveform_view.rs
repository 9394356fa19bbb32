//! Waveform preview widget
//!
//! Paints a `WaveformTrace` computed by `dsp::waveform`. The trace is cached
//! per buffer revision and canvas size so long files are not rescanned on
//! every frame.

use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};

use crate::dsp::waveform::TracePoint;
use crate::dsp::{DspError, WaveformTrace};

/// Colors and stroke width for the preview
#[derive(Clone)]
pub struct WaveformSettings {
    pub background: Color32,
    pub centerline: Color32,
    pub color: Color32,
    pub line_width: f32,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            centerline: Color32::from_rgb(0, 100, 200),
            color: Color32::from_rgb(0, 120, 255),
            line_width: 1.0,
        }
    }
}

struct CachedTrace {
    revision: u64,
    width: i32,
    height: i32,
    trace: WaveformTrace,
}

/// Waveform preview widget
#[derive(Default)]
pub struct WaveformView {
    pub settings: WaveformSettings,
    cache: Option<CachedTrace>,
}

impl WaveformView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the preview into a `size` area
    ///
    /// `build` is only called when `revision` or the canvas size changed.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        size: Vec2,
        revision: u64,
        build: impl FnOnce(i32, i32) -> Result<WaveformTrace, DspError>,
    ) -> Result<egui::Response, DspError> {
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, self.settings.background);
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(204)));

        let width = rect.width() as i32;
        let height = rect.height() as i32;

        let stale = self
            .cache
            .as_ref()
            .map_or(true, |c| c.revision != revision || c.width != width || c.height != height);
        let mut result = Ok(());
        if stale {
            // A failed build is cached as empty so it is reported once
            let trace = build(width, height).unwrap_or_else(|e| {
                result = Err(e);
                WaveformTrace::default()
            });
            self.cache = Some(CachedTrace {
                revision,
                width,
                height,
                trace,
            });
        }

        if let Some(cached) = &self.cache {
            self.draw_trace(&painter, rect, &cached.trace);
        }

        result.map(|()| response)
    }

    fn draw_trace(&self, painter: &egui::Painter, rect: Rect, trace: &WaveformTrace) {
        if trace.is_empty() {
            return;
        }

        let to_screen = |p: TracePoint| Pos2::new(rect.left() + p.x, rect.top() + p.y);

        let (start, end) = trace.centerline();
        painter.line_segment(
            [to_screen(start), to_screen(end)],
            Stroke::new(self.settings.line_width, self.settings.centerline),
        );

        let stroke = Stroke::new(self.settings.line_width, self.settings.color);
        for (p1, p2) in trace.segments() {
            painter.line_segment([to_screen(p1), to_screen(p2)], stroke);
        }
    }
}
