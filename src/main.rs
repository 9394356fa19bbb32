#![allow(dead_code)]

//! binaural-pad - directional stereo from a mono source
//!
//! Load an audio file, click on the pad to place the source around the
//! listener, and transform the file into pseudo-binaural stereo using a
//! simple ITD/ILD model. The waveform preview follows the left channel
//! once the file has been transformed.

use std::sync::Arc;

use eframe::egui;

mod audio;
mod controller;
mod dsp;
mod render;
mod settings;

use audio::{AudioPlayer, PlaybackState};
use controller::Session;
use render::{DirectionPad, WaveformView};
use settings::AppSettings;

const WAVEFORM_SIZE: [f32; 2] = [750.0, 200.0];
const PAD_SIDE: f32 = 450.0;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting binaural-pad");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_title("binaural-pad"),
        ..Default::default()
    };

    eframe::run_native(
        "binaural-pad",
        options,
        Box::new(|cc| Ok(Box::new(BinauralApp::new(cc)))),
    )
}

struct BinauralApp {
    session: Session,
    player: AudioPlayer,
    waveform: WaveformView,
    pad: DirectionPad,
    last_directory: Option<std::path::PathBuf>,
}

impl BinauralApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            session: Session::new(),
            player: AudioPlayer::new(),
            waveform: WaveformView::new(),
            pad: DirectionPad::new(),
            last_directory: None,
        };
        AppSettings::load().apply(&mut app);
        app
    }

    fn save_settings(&self) {
        AppSettings::from_app(self).save();
    }

    fn open_file(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter(
            "Audio",
            &["wav", "mp3", "flac", "ogg", "m4a", "aac", "aiff"],
        );
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.pick_file() else {
            return;
        };

        self.last_directory = path.parent().map(|p| p.to_path_buf());
        self.save_settings();

        self.player.stop();
        match audio::load(&path) {
            Ok(loaded) => {
                log::info!("Loaded audio file: {:?}", path);
                self.session.set_audio(loaded);
            }
            Err(e) => {
                log::error!("Failed to load file: {}", e);
                self.session.status = format!("Error: {}", e);
            }
        }
    }

    fn play(&mut self) {
        let Some(buffer) = self.session.audio().map(Arc::clone) else {
            self.session.status = "No file loaded to play".to_string();
            return;
        };

        if let Err(e) = self.player.play(buffer) {
            log::error!("Playback error: {}", e);
            self.session.status = format!("Playback Error: {}", e);
        }
    }

    fn transform(&mut self) {
        // The player holds its own reference; the new buffer plays on next Play
        self.session.transform_and_report();
    }
}

impl eframe::App for BinauralApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.player.state() == PlaybackState::Playing {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("binaural-pad");
                ui.separator();

                if ui.button("📂 Load").clicked() {
                    self.open_file();
                }

                ui.separator();
                ui.label(&self.session.status);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let revision = self.session.revision();
                let session = &self.session;
                let result = self.waveform.show(
                    ui,
                    egui::vec2(WAVEFORM_SIZE[0], WAVEFORM_SIZE[1]),
                    revision,
                    |w, h| session.preview(w, h),
                );
                if let Err(e) = result {
                    log::error!("Waveform preview failed: {}", e);
                    self.session.status = format!("Error: {}", e);
                }

                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        let play_text = match self.player.state() {
                            PlaybackState::Playing => "⏸",
                            _ => "▶ Play",
                        };
                        if ui.button(play_text).clicked() {
                            match self.player.state() {
                                PlaybackState::Stopped => self.play(),
                                PlaybackState::Playing => self.player.pause(),
                                PlaybackState::Paused => self.player.resume(),
                            }
                        }

                        if ui.button("⏹").clicked() {
                            self.player.stop();
                        }
                    });

                    if ui.button("Transform").clicked() {
                        self.transform();
                    }

                    ui.add_space(8.0);
                    ui.label("Vol:");
                    let volume = ui.add(
                        egui::Slider::new(&mut self.player.volume, 0.0..=2.0).show_value(false),
                    );
                    if volume.changed() {
                        self.player.sync_volume();
                    }
                    if volume.drag_stopped() {
                        self.save_settings();
                    }
                });
            });

            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if let Some(click) = self.pad.show(ui, PAD_SIDE) {
                    self.session.click(click.pointer, click.center);
                }

                ui.vertical(|ui| {
                    if ui
                        .checkbox(&mut self.pad.settings.show_guides, "Show guides")
                        .changed()
                    {
                        self.save_settings();
                    }

                    ui.separator();
                    self.cue_readout(ui);
                });
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.horizontal(|ui| {
                    if let Some(audio) = self.session.audio() {
                        if let Some(name) = &self.session.filename {
                            ui.small(name);
                            ui.separator();
                        }
                        ui.small(format!(
                            "{} Hz | {} ch | {}",
                            audio.sample_rate(),
                            audio.channels(),
                            format_duration(audio.duration())
                        ));
                        ui.separator();
                        ui.small(format!(
                            "Position: {}",
                            format_duration(self.player.position_duration())
                        ));
                        ui.add(
                            egui::ProgressBar::new(self.player.position_fraction())
                                .desired_width(200.0),
                        );
                    }
                });
            });
        });
    }
}

impl BinauralApp {
    /// Current direction and the cues it will produce
    fn cue_readout(&self, ui: &mut egui::Ui) {
        let Some(cue) = self.session.cue() else {
            ui.label("Click the pad to place the source");
            return;
        };

        let (left_gain, right_gain) = dsp::spatializer::channel_gains(cue.angle_radians);
        ui.label(format!("Angle: {:.1}° ({:.4} turn)", cue.angle_degrees(), cue.angle_fraction()));
        ui.label(format!("Distance: {:.1} px", cue.distance));
        ui.label(format!(
            "ITD: {} samples",
            dsp::spatializer::itd_samples(cue.angle_radians)
        ));
        ui.label(format!("Gain L/R: {:.3} / {:.3}", left_gain, right_gain));
    }
}

/// Format a duration as MM:SS
fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    let mins = secs / 60;
    let secs = secs % 60;
    format!("{:02}:{:02}", mins, secs)
}
