//! Per-frame waveform measurements.
//!
//! Everything here is computed from scratch over the whole visible buffer on
//! every call; nothing is carried between frames.
//!
//! - Voltages scale the 8-bit reading linearly: `0 -> 0 V`, `255 -> VREF`.
//! - Frequency comes from the mean spacing of ascending mid-level crossings,
//!   where the mid level is halfway between the buffer's min and max.
/// Full-scale ADC code.
pub const ADC_MAX: u8 = 255;
/// Converts an 8-bit ADC reading to volts for the given reference.
pub fn adc_to_volts(value: u8, vref: f64) -> f64 {
    value as f64 / ADC_MAX as f64 * vref
}
/// Splits a reading into its hundreds, tens and units digits.
pub fn decimal_digits(value: u8) -> [u8; 3] {
    [value / 100, (value / 10) % 10, value % 10]
}
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Measurements {
    pub min: u8,
    pub max: u8,
    pub v_min: f64,
    pub v_max: f64,
    pub v_avg: f64,
    pub v_pp: f64,
    pub freq_hz: f64,
}
impl Measurements {
    /// Measures `samples` taken at `sample_rate_hz` with reference `vref`.
    /// An empty buffer yields all zeros.
    pub fn compute(samples: &[u8], vref: f64, sample_rate_hz: f64) -> Self {
        let (Some(&min), Some(&max)) = (samples.iter().min(), samples.iter().max()) else {
            return Self::default();
        };
        let sum: f64 = samples.iter().map(|&v| adc_to_volts(v, vref)).sum();
        let v_min = adc_to_volts(min, vref);
        let v_max = adc_to_volts(max, vref);
        Self {
            min,
            max,
            v_min,
            v_max,
            v_avg: sum / samples.len() as f64,
            v_pp: v_max - v_min,
            freq_hz: estimate_frequency(samples, sample_rate_hz),
        }
    }
}
/// Indices `i` where `samples[i - 1] < mid <= samples[i]`.
pub fn rising_crossings(samples: &[u8]) -> Vec<usize> {
    let (Some(&min), Some(&max)) = (samples.iter().min(), samples.iter().max()) else {
        return Vec::new();
    };
    let mid = (min as f64 + max as f64) / 2.0;
    samples
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[0] as f64) < mid && (pair[1] as f64) >= mid)
        .map(|(i, _)| i + 1)
        .collect()
}
/// Estimated frequency in Hz, or zero with fewer than two rising crossings.
pub fn estimate_frequency(samples: &[u8], sample_rate_hz: f64) -> f64 {
    if sample_rate_hz <= 0.0 {
        return 0.0;
    }
    let crossings = rising_crossings(samples);
    if crossings.len() < 2 {
        return 0.0;
    }
    let span = (crossings[crossings.len() - 1] - crossings[0]) as f64;
    let mean_period_samples = span / (crossings.len() - 1) as f64;
    sample_rate_hz / mean_period_samples
}
