// src/config.rs
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::drivers::ScopeError;
use crate::types::Timebase;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: Option<String>,
    pub baud_rate: u32,
    /// Read timeout handed to the driver. Reads are only issued for bytes
    /// already pending, so this never stalls a frame.
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: Some("COM3".to_string()),
            baud_rate: 19_200,
            timeout_ms: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Samples per second at the 1x timebase.
    pub base_sample_rate_hz: f64,
    /// ADC reference: a reading of 255 maps to this voltage.
    pub vref: f64,
    /// Neutral value used to fill a fresh buffer.
    pub fill_value: u8,
    pub timebase: Timebase,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            base_sample_rate_hz: 1000.0,
            vref: 5.0,
            fill_value: 128,
            timebase: Timebase::X1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub freq_hz: f64,
    /// Fraction of full scale, in (0, 1].
    pub amplitude: f64,
    /// Uniform noise amplitude as a fraction of full scale.
    pub noise: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            freq_hz: 5.0,
            amplitude: 1.0,
            noise: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub plot_margin_x: f32,
    pub min_plot_width: usize,
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            min_width: 600.0,
            min_height: 420.0,
            plot_margin_x: 40.0,
            min_plot_width: 200,
            fps: 60,
        }
    }
}

impl DisplayConfig {
    /// Plot width in pixels (one sample per column) for a window width.
    pub fn plot_width_for(&self, window_width: f32) -> usize {
        let usable = (window_width - 2.0 * self.plot_margin_x).max(0.0) as usize;
        usable.max(self.min_plot_width)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub serial: SerialConfig,
    pub acquisition: AcquisitionConfig,
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
}

impl ScopeConfig {
    pub fn load(path: &Path) -> Result<Self, ScopeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ScopeError> {
        let config: ScopeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        if !(self.acquisition.base_sample_rate_hz > 0.0) {
            return Err(ScopeError::InvalidSampleRate);
        }
        if !(self.acquisition.vref > 0.0) {
            return Err(ScopeError::InvalidConfig("vref must be positive".into()));
        }
        if self.serial.baud_rate == 0 {
            return Err(ScopeError::InvalidConfig("baud_rate must be non-zero".into()));
        }
        if !(self.simulation.amplitude > 0.0 && self.simulation.amplitude <= 1.0) {
            return Err(ScopeError::InvalidConfig(
                "simulation amplitude must be in (0, 1]".into(),
            ));
        }
        if self.simulation.noise < 0.0 {
            return Err(ScopeError::InvalidConfig("noise must not be negative".into()));
        }
        if self.display.fps == 0 {
            return Err(ScopeError::InvalidConfig("fps must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScopeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.serial.port.as_deref(), Some("COM3"));
        assert_eq!(config.serial.baud_rate, 19_200);
        assert_eq!(config.acquisition.fill_value, 128);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ScopeConfig::from_json(
            r#"{ "serial": { "port": "/dev/ttyUSB0" }, "acquisition": { "vref": 3.3, "timebase": "10x" } }"#,
        )
        .unwrap();
        assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.serial.baud_rate, 19_200);
        assert_eq!(config.acquisition.vref, 3.3);
        assert_eq!(config.acquisition.timebase, Timebase::X10);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let err = ScopeConfig::from_json(r#"{ "acquisition": { "base_sample_rate_hz": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ScopeError::InvalidSampleRate));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ScopeConfig::from_json("{ not json"),
            Err(ScopeError::ConfigParse(_))
        ));
    }

    #[test]
    fn plot_width_respects_margin_and_minimum() {
        let display = DisplayConfig::default();
        assert_eq!(display.plot_width_for(1000.0), 920);
        assert_eq!(display.plot_width_for(250.0), 200);
    }
}
