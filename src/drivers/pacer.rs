use std::time::Duration;
/// Converts wall-clock time into whole sample counts at a given rate.
///
/// The fractional remainder carries over between calls, so a caller that
/// stops advancing (while stopped or paused) resumes exactly where it left off.
#[derive(Clone, Copy, Debug, Default)]
pub struct SamplePacer {
    accumulator: f64,
}
impl SamplePacer {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds `elapsed * sample_rate_hz` sample units and returns how many whole
    /// samples are now due.
    pub fn advance(&mut self, elapsed: Duration, sample_rate_hz: f64) -> usize {
        if sample_rate_hz <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed.as_secs_f64() * sample_rate_hz;
        let due = self.accumulator.floor();
        self.accumulator -= due;
        due as usize
    }
    pub fn pending_fraction(&self) -> f64 {
        self.accumulator
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fractional_samples_carry_over() {
        let mut pacer = SamplePacer::new();
        // 10 S/s over 250 ms = 2.5 samples
        assert_eq!(pacer.advance(Duration::from_millis(250), 10.0), 2);
        assert!((pacer.pending_fraction() - 0.5).abs() < 1e-9);
        assert_eq!(pacer.advance(Duration::from_millis(250), 10.0), 3);
        assert!(pacer.pending_fraction().abs() < 1e-9);
    }
    #[test]
    fn total_matches_elapsed_time() {
        let mut pacer = SamplePacer::new();
        let total: usize = (0..60)
            .map(|_| pacer.advance(Duration::from_secs_f64(1.0 / 60.0), 2000.0))
            .sum();
        assert!((1999..=2000).contains(&total));
    }
    #[test]
    fn zero_rate_emits_nothing() {
        let mut pacer = SamplePacer::new();
        assert_eq!(pacer.advance(Duration::from_secs(1), 0.0), 0);
    }
}
