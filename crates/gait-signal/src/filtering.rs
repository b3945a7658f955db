//! Zero-phase Butterworth low-pass filtering for accelerometer axes.

/// Shortest input the recurrence is applied to; anything shorter passes through
pub const MIN_FILTER_LEN: usize = 4;

/// 2nd-order Butterworth low-pass section
///
/// Difference equation:
///
/// `y[i] = a0·x[i] + a1·x[i-1] + a2·x[i-2] − b1·y[i-1] − b2·y[i-2]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterworthLowPass {
    a0: f64,
    a1: f64,
    a2: f64,
    b1: f64,
    b2: f64,
}

impl ButterworthLowPass {
    /// Create a new low-pass section
    ///
    /// # Arguments
    /// * `cutoff_hz` - Cutoff frequency in Hz
    /// * `sampling_rate_hz` - Sampling rate in Hz
    pub fn new(cutoff_hz: f64, sampling_rate_hz: f64) -> Self {
        // Pre-warp the cutoff frequency
        let f = (std::f64::consts::PI * cutoff_hz / sampling_rate_hz).tan();
        let f2 = f * f;
        let sqrt2 = std::f64::consts::SQRT_2;

        let denom = 1.0 + sqrt2 * f + f2;

        let a0 = f2 / denom;
        Self {
            a0,
            a1: 2.0 * a0,
            a2: a0,
            b1: 2.0 * (f2 - 1.0) / denom,
            b2: (1.0 - sqrt2 * f + f2) / denom,
        }
    }

    /// Feed-forward coefficients `(a0, a1, a2)`
    pub fn feed_forward(&self) -> (f64, f64, f64) {
        (self.a0, self.a1, self.a2)
    }

    /// Feedback coefficients `(b1, b2)`
    pub fn feedback(&self) -> (f64, f64) {
        (self.b1, self.b2)
    }

    fn step(&self, x0: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
        self.a0 * x0 + self.a1 * x1 + self.a2 * x2 - self.b1 * y1 - self.b2 * y2
    }

    /// Causal pass, seeded with the first two inputs
    pub fn forward(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n < MIN_FILTER_LEN {
            return signal.to_vec();
        }

        let mut out = vec![0.0; n];
        out[0] = signal[0];
        out[1] = signal[1];
        for i in 2..n {
            out[i] = self.step(signal[i], signal[i - 1], signal[i - 2], out[i - 1], out[i - 2]);
        }
        out
    }

    /// Anti-causal pass, seeded with the last two inputs
    pub fn backward(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n < MIN_FILTER_LEN {
            return signal.to_vec();
        }

        let mut out = vec![0.0; n];
        out[n - 1] = signal[n - 1];
        out[n - 2] = signal[n - 2];
        for i in (0..n - 2).rev() {
            out[i] = self.step(signal[i], signal[i + 1], signal[i + 2], out[i + 1], out[i + 2]);
        }
        out
    }

    /// Forward then backward over the same coefficients (zero phase, 4th order)
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        if signal.len() < MIN_FILTER_LEN {
            return signal.to_vec();
        }
        self.backward(&self.forward(signal))
    }
}

/// Zero-phase low-pass filter a single channel.
///
/// Output has the same length as the input. Inputs shorter than
/// [`MIN_FILTER_LEN`] are returned unchanged.
pub fn low_pass_zero_phase(samples: &[f64], cutoff_hz: f64, sampling_rate_hz: f64) -> Vec<f64> {
    if samples.len() < MIN_FILTER_LEN {
        return samples.to_vec();
    }
    ButterworthLowPass::new(cutoff_hz, sampling_rate_hz).filtfilt(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn local_maxima(signal: &[f64], from: usize, to: usize) -> Vec<usize> {
        (from.max(1)..to.min(signal.len() - 1))
            .filter(|&i| signal[i] > signal[i - 1] && signal[i] >= signal[i + 1])
            .collect()
    }

    #[test]
    fn test_short_input_passthrough() {
        for input in [vec![], vec![1.0], vec![1.0, -2.0], vec![3.0, 0.5, 9.0]] {
            let out = low_pass_zero_phase(&input, 10.0, 50.0);
            assert_eq!(out, input);
        }
    }

    #[test]
    fn test_length_preserved() {
        let signal: Vec<f64> = (0..37).map(|i| (i as f64 * 0.3).sin()).collect();
        assert_eq!(low_pass_zero_phase(&signal, 10.0, 50.0).len(), signal.len());
    }

    #[test]
    fn test_butterworth_dc() {
        // Unity DC gain and DC seeding: a constant passes through untouched
        let dc_signal = vec![9.8; 200];
        let filtered = low_pass_zero_phase(&dc_signal, 10.0, 50.0);

        for v in filtered {
            assert!((v - 9.8).abs() < 1e-9, "DC should pass through, got {}", v);
        }
    }

    #[test]
    fn test_coefficients_dc_gain() {
        let filter = ButterworthLowPass::new(10.0, 50.0);
        let (a0, a1, a2) = filter.feed_forward();
        let (b1, b2) = filter.feedback();

        assert_eq!(a1, 2.0 * a0);
        assert_eq!(a2, a0);
        assert!(((a0 + a1 + a2) / (1.0 + b1 + b2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_phase_peaks() {
        let fs = 100.0;
        let signal: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * 1.0 * i as f64 / fs).sin())
            .collect();

        let filtered = low_pass_zero_phase(&signal, 10.0, fs);

        let input_peaks = local_maxima(&signal, 200, 800);
        let output_peaks = local_maxima(&filtered, 200, 800);

        assert_eq!(input_peaks.len(), output_peaks.len());
        for (a, b) in input_peaks.iter().zip(output_peaks.iter()) {
            assert!(
                (*a as i64 - *b as i64).abs() <= 1,
                "peak moved from {} to {}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_forward_only_lags() {
        // A single causal pass delays peaks; the backward pass removes that delay
        let fs = 100.0;
        let signal: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * 2.0 * i as f64 / fs).sin())
            .collect();

        let filter = ButterworthLowPass::new(5.0, fs);
        let forward = filter.forward(&signal);

        let input_peaks = local_maxima(&signal, 200, 800);
        let forward_peaks = local_maxima(&forward, 200, 800);
        assert!(forward_peaks[0] > input_peaks[0]);
    }

    #[test]
    fn test_stopband_attenuation() {
        let fs = 100.0;
        let signal: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * 20.0 * i as f64 / fs).sin())
            .collect();

        let filtered = low_pass_zero_phase(&signal, 5.0, fs);
        let interior_peak = filtered[200..800]
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));

        assert!(interior_peak < 0.05, "20 Hz should be suppressed, got {}", interior_peak);
    }
}
