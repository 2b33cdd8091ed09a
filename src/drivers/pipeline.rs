use std::time::Duration;
use crate::config::{AcquisitionConfig, SimulationConfig};
use crate::drivers::buffer::SampleRing;
use crate::drivers::metrics::Measurements;
use crate::drivers::pacer::SamplePacer;
use crate::drivers::source::{ByteSource, SampleClock, SineSource};
use crate::drivers::ScopeError;
use crate::types::{AcquisitionState, ScopeFrame, Timebase, UserAction};
/// Acquisition core: owns the sample ring, the active byte source and the
/// pause/stop toggles, and exposes a fresh frame for display every tick.
pub struct Acquisition {
    source: Box<dyn ByteSource>,
    ring: SampleRing,
    pacer: SamplePacer,
    timebase: Timebase,
    state: AcquisitionState,
    current: u8,
    config: AcquisitionConfig,
    simulation: SimulationConfig,
}
impl Acquisition {
    pub fn new(
        config: AcquisitionConfig,
        simulation: SimulationConfig,
        source: Box<dyn ByteSource>,
        plot_width: usize,
    ) -> Self {
        Self {
            source,
            ring: SampleRing::filled(plot_width, config.fill_value),
            pacer: SamplePacer::new(),
            timebase: config.timebase,
            state: AcquisitionState::default(),
            current: config.fill_value,
            config,
            simulation,
        }
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.config.base_sample_rate_hz * self.timebase.multiplier() as f64
    }
    pub fn timebase(&self) -> Timebase {
        self.timebase
    }
    pub fn state(&self) -> AcquisitionState {
        self.state
    }
    pub fn current(&self) -> u8 {
        self.current
    }
    pub fn samples(&self) -> Vec<u8> {
        self.ring.to_vec()
    }
    pub fn plot_width(&self) -> usize {
        self.ring.len()
    }
    pub fn source_description(&self) -> String {
        self.source.describe()
    }
    pub fn apply(&mut self, action: UserAction) {
        match action {
            UserAction::SelectTimebase(timebase) => {
                if timebase != self.timebase {
                    log::debug!("Timebase {} -> {}", self.timebase.label(), timebase.label());
                    self.timebase = timebase;
                }
            }
            UserAction::TogglePause => {
                self.state.paused = !self.state.paused;
                log::info!("Acquisition {}", self.state.label());
            }
            UserAction::ToggleStop => {
                self.state.stopped = !self.state.stopped;
                log::info!("Acquisition {}", self.state.label());
            }
            UserAction::ResizePlot(width) => {
                if width != self.ring.len() {
                    log::debug!("Plot width {} -> {}", self.ring.len(), width);
                    self.ring.resize(width, self.current);
                }
            }
        }
    }
    /// One ingestion pass covering `elapsed` wall-clock time. Does nothing
    /// while paused or stopped; the pacer keeps its remainder for later.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.state.is_running() {
            return;
        }
        if let Err(e) = self.ingest(elapsed) {
            self.fall_back(e);
        }
    }
    fn ingest(&mut self, elapsed: Duration) -> Result<(), ScopeError> {
        if self.source.has_pending()? {
            let bytes = self.source.read_available()?;
            if let Some(&last) = bytes.last() {
                self.ring.extend_from_slice(&bytes);
                self.current = last;
            }
            return Ok(());
        }
        let clock = SampleClock {
            sample_rate_hz: self.sample_rate_hz(),
            multiplier: self.timebase.multiplier(),
        };
        let due = self.pacer.advance(elapsed, clock.sample_rate_hz);
        for _ in 0..due {
            let value = self.source.fill_sample(self.current, clock);
            self.ring.push(value);
            self.current = value;
        }
        Ok(())
    }
    // The failed source is dropped for the rest of the run.
    fn fall_back(&mut self, error: ScopeError) {
        log::warn!(
            "Byte source {} failed: {error}; switching to simulation",
            self.source.describe()
        );
        self.source.close();
        self.source = Box::new(SineSource::new(&self.simulation));
    }
    pub fn measurements(&self) -> Measurements {
        Measurements::compute(&self.ring.to_vec(), self.config.vref, self.sample_rate_hz())
    }
    pub fn frame(&self) -> ScopeFrame {
        ScopeFrame {
            samples: self.ring.to_vec(),
            measurements: self.measurements(),
            current: self.current,
            timebase: self.timebase,
            state: self.state,
            sample_rate_hz: self.sample_rate_hz(),
            vref: self.config.vref,
            source: self.source.describe(),
        }
    }
    pub fn close(&mut self) {
        self.source.close();
    }
}
impl Drop for Acquisition {
    fn drop(&mut self) {
        self.close();
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::source::{ManualSource, ManualStep};
    fn config() -> AcquisitionConfig {
        AcquisitionConfig {
            base_sample_rate_hz: 100.0,
            ..AcquisitionConfig::default()
        }
    }
    fn manual(steps: Vec<ManualStep>, width: usize) -> Acquisition {
        Acquisition::new(
            config(),
            SimulationConfig::default(),
            Box::new(ManualSource::new(steps)),
            width,
        )
    }
    const FRAME: Duration = Duration::from_millis(100);
    #[test]
    fn pending_bytes_are_all_consumed() {
        let mut acq = manual(vec![ManualStep::Bytes(vec![1, 2, 3])], 5);
        acq.tick(FRAME);
        assert_eq!(acq.samples(), vec![128, 128, 1, 2, 3]);
        assert_eq!(acq.current(), 3);
    }
    #[test]
    fn idle_live_source_repeats_current_value() {
        let mut acq = manual(vec![ManualStep::Bytes(vec![42]), ManualStep::Idle], 20);
        acq.tick(FRAME);
        // 100 ms at 100 S/s = 10 paced copies of the held value
        acq.tick(FRAME);
        let samples = acq.samples();
        assert_eq!(&samples[9..], &[42; 11]);
        assert_eq!(acq.current(), 42);
        assert_eq!(samples.len(), 20);
    }
    #[test]
    fn timebase_scales_paced_rate() {
        let mut acq = manual(vec![ManualStep::Bytes(vec![7]), ManualStep::Idle], 100);
        acq.apply(UserAction::SelectTimebase(Timebase::X5));
        assert_eq!(acq.sample_rate_hz(), 500.0);
        acq.tick(FRAME);
        acq.tick(FRAME);
        assert_eq!(acq.samples().iter().filter(|&&v| v == 7).count(), 51);
    }
    #[test]
    fn stopped_and_paused_freeze_everything() {
        for action in [UserAction::ToggleStop, UserAction::TogglePause] {
            let mut acq = manual(vec![ManualStep::Bytes(vec![9, 8, 7]); 5], 8);
            acq.tick(FRAME);
            let before = acq.samples();
            let current = acq.current();
            acq.apply(action);
            for _ in 0..10 {
                acq.tick(FRAME);
            }
            assert_eq!(acq.samples(), before);
            assert_eq!(acq.current(), current);
            acq.apply(action);
            acq.tick(FRAME);
            assert_eq!(acq.samples(), vec![128, 128, 9, 8, 7, 9, 8, 7]);
        }
    }
    #[test]
    fn pause_and_stop_are_independent() {
        let mut acq = manual(vec![], 4);
        acq.apply(UserAction::TogglePause);
        acq.apply(UserAction::ToggleStop);
        acq.apply(UserAction::TogglePause);
        assert!(acq.state().stopped);
        assert!(!acq.state().paused);
        assert!(!acq.state().is_running());
        acq.apply(UserAction::ToggleStop);
        assert!(acq.state().is_running());
    }
    #[test]
    fn resuming_keeps_pacer_remainder() {
        let mut acq = manual(vec![ManualStep::Bytes(vec![50])], 50);
        acq.tick(FRAME);
        // 125 ms at 100 S/s = 12.5 samples -> 12 now, 0.5 carried
        acq.tick(Duration::from_millis(125));
        acq.apply(UserAction::ToggleStop);
        acq.tick(Duration::from_secs(10));
        acq.apply(UserAction::ToggleStop);
        acq.tick(Duration::from_millis(125));
        let count = acq.samples().iter().filter(|&&v| v == 50).count();
        assert_eq!(count, 1 + 12 + 13);
    }
    #[test]
    fn read_failure_switches_to_simulation() {
        let mut acq = manual(vec![ManualStep::Bytes(vec![200]), ManualStep::Fail], 1000);
        acq.tick(FRAME);
        acq.tick(FRAME);
        assert!(acq.source_description().starts_with("simulated"));
        assert_eq!(acq.current(), 200);
        // the replacement generator keeps the trace moving
        acq.tick(Duration::from_secs(1));
        assert!(acq.samples().iter().any(|&v| v != 200 && v != 128));
    }
    #[test]
    fn resize_pads_and_measurements_follow() {
        let mut acq = manual(vec![ManualStep::Bytes(vec![10, 20, 30])], 3);
        acq.tick(FRAME);
        acq.apply(UserAction::ResizePlot(6));
        assert_eq!(acq.samples(), vec![10, 10, 10, 10, 20, 30]);
        acq.apply(UserAction::ResizePlot(2));
        assert_eq!(acq.samples(), vec![20, 30]);
        let frame = acq.frame();
        assert_eq!(frame.samples.len(), 2);
        assert_eq!(frame.measurements.min, 20);
        assert_eq!(frame.measurements.max, 30);
        assert_eq!(acq.measurements(), frame.measurements);
    }
    #[test]
    fn constant_buffer_measures_flat() {
        let acq = manual(vec![], 300);
        let m = acq.measurements();
        assert_eq!(m.v_pp, 0.0);
        assert_eq!(m.freq_hz, 0.0);
    }
    #[test]
    fn simulated_sine_frequency_is_estimated() {
        let sim = SimulationConfig::default();
        let mut acq = Acquisition::new(
            AcquisitionConfig::default(),
            sim.clone(),
            Box::new(SineSource::new(&sim)),
            920,
        );
        for _ in 0..60 {
            acq.tick(Duration::from_millis(16));
        }
        let freq = acq.measurements().freq_hz;
        assert!((freq - 5.0).abs() < 0.5, "estimated {freq} Hz");
        acq.apply(UserAction::SelectTimebase(Timebase::X2));
        for _ in 0..60 {
            acq.tick(Duration::from_millis(16));
        }
        let freq = acq.measurements().freq_hz;
        assert!((freq - 10.0).abs() < 1.0, "estimated {freq} Hz");
    }
}
