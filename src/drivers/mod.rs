// src/drivers/mod.rs
// 采集核心：缓冲区、字节源、测量与导出
pub mod buffer;
pub mod error;
pub mod fft;
pub mod metrics;
pub mod pacer;
pub mod pipeline;
pub mod plot;
pub mod sawtooth;
pub mod source;
// 公开导出常用类型，方便外部调用
pub use error::ScopeError;
pub use fft::SpectrumBuilder;
pub use metrics::{adc_to_volts, decimal_digits, Measurements};
pub use pipeline::Acquisition;
pub use plot::{render_waveform_png, PlotStyle};
pub use sawtooth::Sawtooth;
pub use source::{list_ports, open_source, ByteSource};
