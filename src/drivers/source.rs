use std::f64::consts::PI;
use std::io::Read;
use std::time::Duration;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serialport::SerialPort;
use crate::config::{SerialConfig, SimulationConfig};
use crate::drivers::ScopeError;
/// Pacing context handed to a source when it has to fill idle time.
#[derive(Clone, Copy, Debug)]
pub struct SampleClock {
    pub sample_rate_hz: f64,
    pub multiplier: u32,
}
/// Anything that can hand over bytes without blocking.
///
/// `has_pending`/`read_available` follow a check-then-read pattern; neither may
/// block. When nothing is pending the acquisition loop paces its own samples
/// and asks the source for each one through `fill_sample`.
pub trait ByteSource {
    fn has_pending(&mut self) -> Result<bool, ScopeError>;
    fn read_available(&mut self) -> Result<Vec<u8>, ScopeError>;
    /// Value appended for one paced sample. Sources without a signal of
    /// their own hold the last reading.
    fn fill_sample(&mut self, held: u8, _clock: SampleClock) -> u8 {
        held
    }
    fn close(&mut self);
    fn describe(&self) -> String;
}
/// UART-backed source.
pub struct SerialSource {
    port: Option<Box<dyn SerialPort>>,
    name: String,
    baud_rate: u32,
}
impl SerialSource {
    pub fn open(config: &SerialConfig, port_name: &str) -> Result<Self, ScopeError> {
        let port = serialport::new(port_name, config.baud_rate)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()?;
        Ok(Self {
            port: Some(port),
            name: port_name.to_string(),
            baud_rate: config.baud_rate,
        })
    }
    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, ScopeError> {
        self.port.as_mut().ok_or(ScopeError::SourceClosed)
    }
}
impl ByteSource for SerialSource {
    fn has_pending(&mut self) -> Result<bool, ScopeError> {
        Ok(self.port()?.bytes_to_read()? > 0)
    }
    fn read_available(&mut self) -> Result<Vec<u8>, ScopeError> {
        let port = self.port()?;
        let pending = port.bytes_to_read()? as usize;
        let mut buf = vec![0u8; pending];
        let read = port.read(&mut buf)?;
        buf.truncate(read);
        Ok(buf)
    }
    fn close(&mut self) {
        if self.port.take().is_some() {
            log::info!("Closed serial port {}", self.name);
        }
    }
    fn describe(&self) -> String {
        format!("serial {} @ {} baud", self.name, self.baud_rate)
    }
}
impl Drop for SerialSource {
    fn drop(&mut self) {
        self.close();
    }
}
/// Synthetic sine generator used when no hardware is available.
///
/// The tone frequency scales with the timebase multiplier, the same way the
/// sample rate does.
pub struct SineSource {
    freq_hz: f64,
    amplitude: f64,
    noise: f64,
    t: f64,
    rng: StdRng,
}
impl SineSource {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            freq_hz: config.freq_hz,
            amplitude: config.amplitude,
            noise: config.noise,
            t: 0.0,
            rng: StdRng::from_entropy(),
        }
    }
    fn next_value(&mut self, clock: SampleClock) -> u8 {
        let freq = self.freq_hz * clock.multiplier as f64;
        let mut s = self.amplitude * (2.0 * PI * freq * self.t).sin();
        if self.noise > 0.0 {
            s += self.rng.gen_range(-self.noise..self.noise);
        }
        if clock.sample_rate_hz > 0.0 {
            self.t += 1.0 / clock.sample_rate_hz;
        }
        ((s + 1.0) / 2.0 * 255.0).round().clamp(0.0, 255.0) as u8
    }
}
impl ByteSource for SineSource {
    fn has_pending(&mut self) -> Result<bool, ScopeError> {
        Ok(false)
    }
    fn read_available(&mut self) -> Result<Vec<u8>, ScopeError> {
        Ok(Vec::new())
    }
    fn fill_sample(&mut self, _held: u8, clock: SampleClock) -> u8 {
        self.next_value(clock)
    }
    fn close(&mut self) {}
    fn describe(&self) -> String {
        format!("simulated sine {:.1} Hz", self.freq_hz)
    }
}
/// Opens the configured serial port, or falls back to the sine generator.
/// Never fails: an unavailable port is only logged.
pub fn open_source(
    serial: &SerialConfig,
    simulation: &SimulationConfig,
    force_simulation: bool,
) -> Box<dyn ByteSource> {
    if force_simulation {
        log::info!("Simulation requested, serial port not opened");
        return Box::new(SineSource::new(simulation));
    }
    let Some(port_name) = serial.port.as_deref() else {
        log::info!("No serial port configured, running in simulation mode");
        return Box::new(SineSource::new(simulation));
    };
    match SerialSource::open(serial, port_name) {
        Ok(source) => {
            log::info!("Serial port opened: {} @ {} baud", port_name, serial.baud_rate);
            Box::new(source)
        }
        Err(e) => {
            log::warn!("Could not open serial port {port_name}: {e}; running in simulation mode");
            Box::new(SineSource::new(simulation))
        }
    }
}
/// Names of the serial ports visible on this machine.
pub fn list_ports() -> Result<Vec<String>, ScopeError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}
/// Scripted source for tests: each poll consumes the next step.
#[cfg(test)]
pub struct ManualSource {
    steps: std::collections::VecDeque<ManualStep>,
}
#[cfg(test)]
#[derive(Clone, Debug)]
pub enum ManualStep {
    Bytes(Vec<u8>),
    Idle,
    Fail,
}
#[cfg(test)]
impl ManualSource {
    pub fn new(steps: impl IntoIterator<Item = ManualStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}
#[cfg(test)]
impl ByteSource for ManualSource {
    fn has_pending(&mut self) -> Result<bool, ScopeError> {
        match self.steps.front() {
            Some(ManualStep::Bytes(_)) => Ok(true),
            Some(ManualStep::Fail) => {
                self.steps.pop_front();
                Err(ScopeError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "device unplugged",
                )))
            }
            Some(ManualStep::Idle) => {
                self.steps.pop_front();
                Ok(false)
            }
            None => Ok(false),
        }
    }
    fn read_available(&mut self) -> Result<Vec<u8>, ScopeError> {
        match self.steps.pop_front() {
            Some(ManualStep::Bytes(bytes)) => Ok(bytes),
            _ => Ok(Vec::new()),
        }
    }
    fn close(&mut self) {
        self.steps.clear();
    }
    fn describe(&self) -> String {
        "manual".to_string()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn sim() -> SimulationConfig {
        SimulationConfig {
            freq_hz: 5.0,
            amplitude: 1.0,
            noise: 0.0,
        }
    }
    #[test]
    fn sine_starts_at_midscale_and_stays_in_range() {
        let mut source = SineSource::new(&sim());
        let clock = SampleClock {
            sample_rate_hz: 1000.0,
            multiplier: 1,
        };
        assert_eq!(source.fill_sample(0, clock), 128);
        let values: Vec<u8> = (0..200).map(|_| source.fill_sample(0, clock)).collect();
        assert_eq!(*values.iter().max().unwrap(), 255);
        assert_eq!(*values.iter().min().unwrap(), 0);
    }
    #[test]
    fn sine_never_reports_pending_bytes() {
        let mut source = SineSource::new(&sim());
        assert!(!source.has_pending().unwrap());
        assert!(source.read_available().unwrap().is_empty());
    }
    #[test]
    fn noisy_sine_is_clamped() {
        let config = SimulationConfig {
            noise: 0.5,
            ..sim()
        };
        let mut source = SineSource::new(&config);
        let clock = SampleClock {
            sample_rate_hz: 1000.0,
            multiplier: 2,
        };
        let values: Vec<u8> = (0..1000).map(|_| source.fill_sample(0, clock)).collect();
        assert!(values.iter().any(|&v| v == 0 || v == 255));
    }
    #[test]
    fn forced_simulation_skips_serial() {
        let serial = SerialConfig {
            port: Some("/dev/does-not-exist".into()),
            ..SerialConfig::default()
        };
        let source = open_source(&serial, &sim(), true);
        assert!(source.describe().starts_with("simulated"));
    }
    #[test]
    fn missing_port_falls_back_to_simulation() {
        let serial = SerialConfig {
            port: Some("/dev/scopeview-missing-port".into()),
            ..SerialConfig::default()
        };
        let source = open_source(&serial, &sim(), false);
        assert!(source.describe().starts_with("simulated"));
    }
}
