// src/main.rs
mod config;
mod drivers;
mod gui;
mod sender;
mod types;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;
use config::ScopeConfig;

#[derive(Parser)]
#[command(name = "scopeview")]
#[command(about = "Serial oscilloscope viewer for 8-bit ADC byte streams")]
struct Cli {
    /// JSON configuration file; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the oscilloscope window (default)
    View {
        /// Serial port to read, e.g. COM3 or /dev/ttyUSB0
        #[arg(long)]
        port: Option<String>,

        #[arg(long)]
        baud: Option<u32>,

        /// ADC reference voltage
        #[arg(long)]
        vref: Option<f64>,

        /// Base sample rate (samples/s at 1x) used for pacing and frequency estimates
        #[arg(long)]
        sample_rate: Option<f64>,

        /// Skip the serial port and show the synthetic sine
        #[arg(long)]
        simulate: bool,
    },

    /// List serial ports visible on this machine
    Ports,

    /// Emit a sawtooth byte stream over serial for testing
    Sawtooth {
        #[arg(long)]
        port: Option<String>,

        #[arg(long)]
        baud: Option<u32>,

        /// Milliseconds between bytes
        #[arg(long, default_value = "10")]
        interval_ms: u64,

        /// Increment per byte (wraps at 256)
        #[arg(long, default_value = "5")]
        step: u8,

        /// Stop after this many bytes
        #[arg(long)]
        count: Option<u64>,

        /// Log the bytes instead of opening the port
        #[arg(long)]
        dry_run: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ScopeConfig> {
    match path {
        Some(path) => ScopeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ScopeConfig::default()),
    }
}

fn run_viewer(mut config: ScopeConfig, simulate: bool) -> Result<()> {
    config.validate()?;
    let source = drivers::open_source(&config.serial, &config.simulation, simulate);
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.display.width, config.display.height])
        .with_min_inner_size([config.display.min_width, config.display.min_height])
        .with_title("Oscilloscope - serial ADC");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    // 显示尺寸不能低于最小窗口
    config.display.width = config.display.width.max(config.display.min_width);
    eframe::run_native(
        "scopeview",
        options,
        Box::new(move |_cc| Box::new(gui::ScopeApp::new(config, source))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

// 入口函数
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        None => run_viewer(config, false),
        Some(Commands::View { port, baud, vref, sample_rate, simulate }) => {
            if port.is_some() { config.serial.port = port; }
            if let Some(baud) = baud { config.serial.baud_rate = baud; }
            if let Some(vref) = vref { config.acquisition.vref = vref; }
            if let Some(rate) = sample_rate { config.acquisition.base_sample_rate_hz = rate; }
            run_viewer(config, simulate)
        }
        Some(Commands::Ports) => {
            let ports = drivers::list_ports()?;
            if ports.is_empty() {
                println!("No serial ports found.");
            }
            for name in ports {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Sawtooth { port, baud, interval_ms, step, count, dry_run }) => {
            let port = port.or(config.serial.port).unwrap_or_else(|| "COM3".to_string());
            let options = sender::SenderOptions {
                port,
                baud_rate: baud.unwrap_or(config.serial.baud_rate),
                interval: Duration::from_millis(interval_ms),
                step,
                count,
                dry_run,
            };
            sender::run(&options)
        }
    }
}
