// src/gui.rs
use anyhow::{Context, Result};
use eframe::egui;
use egui::{Color32, RichText, Rounding, Stroke};
use egui_plot::{Line, Plot, PlotPoints};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use crate::config::{DisplayConfig, ScopeConfig};
use crate::drivers::{
    adc_to_volts, decimal_digits, render_waveform_png, Acquisition, ByteSource, Measurements,
    PlotStyle, SpectrumBuilder,
};
use crate::types::*;

const TRACE_COLOR: Color32 = Color32::from_rgb(0, 200, 0);
const ACTIVE_FILL: Color32 = Color32::from_rgb(200, 200, 60);
const READOUT_COLOR: Color32 = Color32::from_rgb(200, 255, 200);

pub struct ScopeApp {
    acquisition: Acquisition,
    display: DisplayConfig,
    last_tick: Instant,
    show_spectrum: bool,

    // 界面日志
    log_messages: Vec<String>,
}

impl ScopeApp {
    pub fn new(config: ScopeConfig, source: Box<dyn ByteSource>) -> Self {
        let plot_width = config.display.plot_width_for(config.display.width);
        let acquisition = Acquisition::new(config.acquisition, config.simulation, source, plot_width);
        let ready = format!("Source: {}", acquisition.source_description());
        Self {
            acquisition,
            display: config.display,
            last_tick: Instant::now(),
            show_spectrum: false,
            log_messages: vec![ready],
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 4 { self.log_messages.remove(0); }
    }

    fn save_snapshot(&self, frame: &ScopeFrame) -> Result<PathBuf> {
        let png = render_waveform_png(frame, PlotStyle::default())?;
        let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let path = PathBuf::from(format!("scope_snapshot_{}.png", stamp));
        std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
        Ok(path)
    }

    // 按钮：激活时高亮
    fn toggle_button(ui: &mut egui::Ui, label: &str, active: bool) -> bool {
        let (fill, text) = if active { (ACTIVE_FILL, Color32::from_rgb(10, 10, 10)) } else { (Color32::from_rgb(60, 60, 60), Color32::from_rgb(220, 220, 220)) };
        let button = egui::Button::new(RichText::new(label).monospace().color(text))
            .fill(fill)
            .min_size(egui::vec2(70.0, 36.0));
        ui.add(button).clicked()
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UserAction>) {
        let state = self.acquisition.state();
        let timebase = self.acquisition.timebase();
        ui.horizontal(|ui| {
            for tb in Timebase::ALL {
                if Self::toggle_button(ui, tb.label(), tb == timebase) {
                    actions.push(UserAction::SelectTimebase(tb));
                }
            }
            ui.add_space(40.0);
            // 按钮文字表示下一步动作
            let stop_label = if state.stopped { "RUN" } else { "STOP" };
            if Self::toggle_button(ui, stop_label, state.stopped) {
                actions.push(UserAction::ToggleStop);
            }
            if Self::toggle_button(ui, "PAUSE", state.paused) {
                actions.push(UserAction::TogglePause);
            }
            ui.add_space(20.0);
            if Self::toggle_button(ui, "FFT", self.show_spectrum) {
                self.show_spectrum = !self.show_spectrum;
            }
            if Self::toggle_button(ui, "SNAP", false) {
                let frame = self.acquisition.frame();
                match self.save_snapshot(&frame) {
                    Ok(path) => self.log(&format!("Saved {}", path.display())),
                    Err(e) => {
                        log::warn!("Snapshot failed: {e:#}");
                        self.log(&format!("Snapshot failed: {e}"));
                    }
                }
            }
        });
    }

    fn draw_readout(&self, ui: &mut egui::Ui, frame: &ScopeFrame) {
        ui.horizontal(|ui| {
            egui::Frame::none()
                .fill(Color32::from_rgb(28, 28, 36))
                .stroke(Stroke::new(2.0, Color32::from_rgb(70, 70, 90)))
                .rounding(Rounding::same(6.0))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("ADC: {:03}", frame.current)).monospace().color(READOUT_COLOR));
                        ui.add_space(12.0);
                        for digit in decimal_digits(frame.current) {
                            ui.label(RichText::new(format!(" {} ", digit)).monospace().background_color(Color32::from_rgb(20, 20, 30)).color(Color32::from_rgb(200, 200, 255)));
                        }
                        ui.add_space(12.0);
                        ui.label(RichText::new(format!("{:.3} V", adc_to_volts(frame.current, frame.vref))).monospace().color(READOUT_COLOR));
                    });
                });
            ui.add_space(20.0);
            Self::draw_metrics(ui, &frame.measurements);
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Timebase: {}  (mul x{})  {:.0} S/s", frame.timebase.label(), frame.timebase.multiplier(), frame.sample_rate_hz)).color(Color32::from_rgb(220, 220, 180)));
            ui.add_space(20.0);
            let state_color = if frame.state.stopped { Color32::from_rgb(240, 180, 180) } else { Color32::from_rgb(180, 180, 180) };
            ui.label(RichText::new(frame.state.label()).small().color(state_color));
            ui.add_space(20.0);
            ui.label(RichText::new(&frame.source).small().color(Color32::GRAY));
        });
    }

    fn draw_metrics(ui: &mut egui::Ui, m: &Measurements) {
        let metrics = [
            format!("Vmax: {:.3} V", m.v_max),
            format!("Vmin: {:.3} V", m.v_min),
            format!("Vavg: {:.3} V", m.v_avg),
            format!("Vpp:  {:.3} V", m.v_pp),
            format!("Freq: {:.2} Hz", m.freq_hz),
        ];
        for label in metrics {
            egui::Frame::none()
                .fill(Color32::from_rgb(28, 28, 36))
                .stroke(Stroke::new(2.0, Color32::from_rgb(70, 70, 90)))
                .rounding(Rounding::same(6.0))
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(label).monospace().color(READOUT_COLOR));
                });
        }
    }

    fn draw_scope(&self, ui: &mut egui::Ui, frame: &ScopeFrame) {
        let points: Vec<[f64; 2]> = frame
            .samples
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, adc_to_volts(v, frame.vref)])
            .collect();
        let height = if self.show_spectrum { ui.available_height() * 0.65 } else { ui.available_height() };
        Plot::new("scope")
            .height(height)
            .include_x(0.0)
            .include_x(frame.samples.len() as f64)
            .include_y(0.0)
            .include_y(frame.vref)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(PlotPoints::new(points)).name("CH1").color(TRACE_COLOR));
            });

        if self.show_spectrum {
            let spectrum = SpectrumBuilder::fitting(frame.samples.len()).compute(&frame.samples, frame.vref, frame.sample_rate_hz as f32);
            ui.label(RichText::new(format!("FFT peak: {:.2} Hz", spectrum.dominant_frequency())).monospace().color(READOUT_COLOR));
            let bins: Vec<[f64; 2]> = spectrum
                .frequencies_hz
                .iter()
                .zip(&spectrum.magnitudes)
                .map(|(f, m)| [*f as f64, *m as f64])
                .collect();
            Plot::new("spectrum")
                .include_y(0.0)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(PlotPoints::new(bins)).name("|X(f)|").color(Color32::from_rgb(255, 0, 255)));
                });
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 输入：空格暂停，窗口宽度决定缓冲区长度
        let mut actions = Vec::new();
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) { actions.push(UserAction::TogglePause); }
        let plot_width = self.display.plot_width_for(ctx.screen_rect().width());
        if plot_width != self.acquisition.plot_width() { actions.push(UserAction::ResizePlot(plot_width)); }

        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = Color32::from_rgb(15, 15, 25);
        ctx.set_visuals(visuals);

        egui::TopBottomPanel::bottom("help").show(ctx, |ui| {
            ui.label(RichText::new("Click buttons to change speed. Space pauses. Pass --port to use hardware.").small().color(Color32::from_rgb(180, 180, 180)));
            for m in &self.log_messages { ui.monospace(m); }
        });
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            self.draw_controls(ui, &mut actions);
            ui.add_space(6.0);
        });

        // 2. 采集：每帧最多一次
        for action in actions { self.acquisition.apply(action); }
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.acquisition.tick(dt);
        let frame = self.acquisition.frame();

        // 3. 绘制
        egui::TopBottomPanel::bottom("readout").show(ctx, |ui| {
            ui.add_space(6.0);
            self.draw_readout(ui, &frame);
            ui.add_space(6.0);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_scope(ui, &frame);
        });

        let fps = self.display.fps.max(1) as f64;
        ctx.request_repaint_after(Duration::from_secs_f64(1.0 / fps));
    }
}
