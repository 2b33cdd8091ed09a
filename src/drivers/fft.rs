use rustfft::{num_complex::Complex32, FftPlanner};
use crate::drivers::metrics::adc_to_volts;
/// Magnitude spectrum of the visible trace.
#[derive(Clone, Debug)]
pub struct FrequencySpectrum {
    pub sample_rate_hz: f32,
    pub frequencies_hz: Vec<f32>,
    pub magnitudes: Vec<f32>,
}
impl FrequencySpectrum {
    /// Frequency of the strongest non-DC bin, or zero for a flat trace.
    pub fn dominant_frequency(&self) -> f32 {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, m)| **m > 1e-6)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .and_then(|(k, _)| self.frequencies_hz.get(k).copied())
            .unwrap_or(0.0)
    }
}
/// Helper that computes FFTs for a given window size.
pub struct SpectrumBuilder {
    fft_size: usize,
}
impl SpectrumBuilder {
    pub fn with_size(fft_size: usize) -> Self {
        Self {
            fft_size: fft_size.max(2),
        }
    }
    /// Largest power of two that fits in `len` samples.
    pub fn fitting(len: usize) -> Self {
        let size = if len < 2 {
            2
        } else {
            1usize << (usize::BITS - 1 - len.leading_zeros())
        };
        Self::with_size(size)
    }
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
    /// Uses the newest `fft_size` samples, mean removed, zero-padded if short.
    pub fn compute(&self, samples: &[u8], vref: f64, sample_rate_hz: f32) -> FrequencySpectrum {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(self.fft_size);
        let bins = self.fft_size / 2;
        let frequencies_hz = (0..bins)
            .map(|k| k as f32 * (sample_rate_hz / self.fft_size as f32))
            .collect();
        let start = samples.len().saturating_sub(self.fft_size);
        let window = &samples[start..];
        let volts: Vec<f32> = window
            .iter()
            .map(|&v| adc_to_volts(v, vref) as f32)
            .collect();
        let mean = if volts.is_empty() {
            0.0
        } else {
            volts.iter().sum::<f32>() / volts.len() as f32
        };
        let mut buffer: Vec<Complex32> = volts
            .iter()
            .map(|v| Complex32::new(v - mean, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex32::ZERO);
        fft.process(&mut buffer);
        let magnitudes = buffer
            .iter()
            .take(bins)
            .map(|c| c.norm() / self.fft_size as f32)
            .collect();
        FrequencySpectrum {
            sample_rate_hz,
            frequencies_hz,
            magnitudes,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fitting_picks_power_of_two() {
        assert_eq!(SpectrumBuilder::fitting(920).fft_size(), 512);
        assert_eq!(SpectrumBuilder::fitting(1024).fft_size(), 1024);
        assert_eq!(SpectrumBuilder::fitting(0).fft_size(), 2);
    }
    #[test]
    fn dominant_bin_tracks_sine() {
        let rate = 1024.0;
        let samples: Vec<u8> = (0..1024)
            .map(|n| {
                let s = (2.0 * std::f64::consts::PI * 32.0 * n as f64 / rate).sin();
                ((s + 1.0) / 2.0 * 255.0).round() as u8
            })
            .collect();
        let spectrum = SpectrumBuilder::fitting(samples.len()).compute(&samples, 5.0, rate as f32);
        assert_eq!(spectrum.magnitudes.len(), 512);
        assert!((spectrum.dominant_frequency() - 32.0).abs() < 1.01);
    }
    #[test]
    fn flat_trace_has_no_dominant_frequency() {
        let spectrum = SpectrumBuilder::with_size(64).compute(&[128; 64], 5.0, 1000.0);
        assert_eq!(spectrum.dominant_frequency(), 0.0);
    }
}
