use std::sync::Arc;

use once_cell::sync::Lazy;
use rustfft::num_complex::{Complex, Complex64};
use rustfft::num_traits::Zero;

/// Number of samples in a single analysis window.
pub(crate) const WINDOW_SIZE: usize = 2048;
/// Bins kept from each transform (half spectrum, Nyquist included).
pub(crate) const SPECTRUM_SIZE: usize = WINDOW_SIZE / 2 + 1;

const POWER_SCALE: f64 = (1 << 17) as f64;
const POWER_FLOOR: f64 = 1e-10;

/// Hanning window without the zero-valued edges, shared by every engine.
static HANNING_WINDOW: Lazy<Box<[f64]>> = Lazy::new(|| make_hanning_window(WINDOW_SIZE));

/// Power spectrum of one analysis window.
pub(crate) type Spectrum = Box<[f64]>;

/// Forward transform over a fixed power-of-two length with a cached plan.
pub struct FftEngine {
    fft_plan: Arc<dyn rustfft::Fft<f64>>,
    fft_buffer_complex: Box<[Complex64]>,
    fft_scratch: Box<[Complex64]>,
}

impl FftEngine {
    /// Plans a forward transform of `size` points. Panics unless `size` is a power of two.
    pub fn new(size: usize) -> Self {
        assert!(size.is_power_of_two());
        let fft_plan = rustfft::FftPlanner::new().plan_fft_forward(size);

        Self {
            fft_buffer_complex: vec![Complex64::zero(); size].into_boxed_slice(),
            fft_scratch: vec![Complex::zero(); fft_plan.get_inplace_scratch_len()].into_boxed_slice(),
            fft_plan,
        }
    }

    /// Transforms `buffer` in place; the output is unnormalized, bin `k` holding
    /// `sum(x[n] * e^(-2πikn/N))`.
    pub fn process(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.fft_buffer_complex.len());
        self.fft_plan.process_with_scratch(buffer, &mut self.fft_scratch);
    }

    /// Windows `samples` (oldest first), transforms them and returns the
    /// floored, scaled power of the first [`SPECTRUM_SIZE`] bins.
    pub(crate) fn power_spectrum(&mut self, samples: impl Iterator<Item = f64>) -> Spectrum {
        let window = &HANNING_WINDOW;
        assert_eq!(self.fft_buffer_complex.len(), window.len());

        let mut filled = 0;
        for ((output, input), weight) in self.fft_buffer_complex.iter_mut().zip(samples).zip(window.iter()) {
            output.re = input * weight;
            output.im = 0.0;
            filled += 1;
        }
        assert_eq!(filled, window.len());

        self.fft_plan.process_with_scratch(&mut self.fft_buffer_complex, &mut self.fft_scratch);

        self.fft_buffer_complex[..SPECTRUM_SIZE]
            .iter()
            .map(|bin| (bin.norm_sqr() / POWER_SCALE).max(POWER_FLOOR))
            .collect()
    }
}

/// Hanning window of `size + 2` points with both zero endpoints dropped.
fn make_hanning_window(size: usize) -> Box<[f64]> {
    let length = (size + 2) as f64;
    (1..=size)
        .map(|i| 0.5 - 0.5 * f64::cos(2.0 * std::f64::consts::PI * (i as f64) / (length - 1.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use rustfft::num_complex::Complex64;

    use crate::{assert_eq_float, assert_eq_float_slice};
    use crate::fft::{make_hanning_window, FftEngine, POWER_FLOOR, SPECTRUM_SIZE, WINDOW_SIZE};

    fn dominant_bin(buffer: &[Complex64]) -> usize {
        buffer[..buffer.len() / 2]
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm_sqr().total_cmp(&b.norm_sqr()))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn sine() {
        let size = 256;
        let bin = 19;
        let mut engine = FftEngine::new(size);

        let mut buffer = (0..size)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * (bin * i) as f64 / size as f64;
                Complex64::new(f64::sin(phase), 0.0)
            })
            .collect::<Vec<_>>();
        engine.process(&mut buffer);

        assert!(dominant_bin(&buffer).abs_diff(bin) <= 1);
        assert_eq_float!(buffer[bin].norm(), size as f64 / 2.0, 1e-6);
        assert!(buffer[bin + 3].norm() < 1e-6);
    }

    #[test]
    fn zeros() {
        let mut engine = FftEngine::new(64);
        let mut buffer = vec![Complex64::new(0.0, 0.0); 64];
        engine.process(&mut buffer);
        assert!(buffer.iter().all(|bin| bin.re == 0.0 && bin.im == 0.0));
    }

    #[test]
    fn dc() {
        let mut engine = FftEngine::new(32);
        let mut buffer = vec![Complex64::new(0.5, 0.0); 32];
        engine.process(&mut buffer);
        assert_eq_float!(buffer[0].re, 16.0);
        for bin in &buffer[1..] {
            assert_eq_float!(bin.norm(), 0.0);
        }
    }

    #[test]
    fn silent_window_hits_power_floor() {
        let mut engine = FftEngine::new(WINDOW_SIZE);
        let spectrum = engine.power_spectrum(std::iter::repeat(0.0).take(WINDOW_SIZE));
        assert_eq!(spectrum.len(), SPECTRUM_SIZE);
        assert!(spectrum.iter().all(|&power| power == POWER_FLOOR));
    }

    #[test]
    fn windowed_tone_peaks_at_its_bin() {
        let bin = 128;
        let mut engine = FftEngine::new(WINDOW_SIZE);
        let samples = (0..WINDOW_SIZE).map(|i| {
            8000.0 * f64::sin(2.0 * std::f64::consts::PI * (bin * i) as f64 / WINDOW_SIZE as f64)
        });
        let spectrum = engine.power_spectrum(samples);

        let loudest = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap();
        assert!(loudest.abs_diff(bin) <= 1);
        assert!(spectrum[bin - 1] < spectrum[bin]);
        assert!(spectrum[bin + 1] < spectrum[bin]);
    }

    #[test]
    fn hanning_window_has_no_zero_edges() {
        let window = make_hanning_window(WINDOW_SIZE);
        assert_eq!(window.len(), WINDOW_SIZE);
        assert!(window[0] > 0.0);
        assert!(window[WINDOW_SIZE - 1] > 0.0);
        assert_eq_float!(window[0], window[WINDOW_SIZE - 1], 1e-12);
        assert!(window.iter().all(|&w| w <= 1.0));
    }

    #[test]
    fn hanning_window_is_symmetric() {
        let window = make_hanning_window(WINDOW_SIZE);
        let reversed = window.iter().rev().copied().collect::<Vec<_>>();
        assert_eq_float_slice!(&window[..], &reversed[..], 1e-12);

        let expected = [1.0, 2.0, 3.0]
            .map(|n: f64| 0.5 - 0.5 * f64::cos(2.0 * std::f64::consts::PI * n / 2049.0));
        assert_eq_float_slice!(&window[..3], &expected[..], 1e-15);
    }
}
