//! FFT processor wrapping `rustfft`.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Arc;

/// Forward/inverse FFT pair planned for a fixed size.
///
/// The inverse transform applies the 1/N normalization, so a forward pass
/// followed by an inverse pass reproduces the input. Plans are `Arc`s into
/// `rustfft`'s cache and are safe to share across threads.
pub struct Fft {
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Plan a forward/inverse FFT pair for the given size.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero; callers validate input length first.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "FFT size must be non-zero");
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        Self { forward, inverse, size }
    }

    /// Get the planned FFT size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Zero-pad a real signal into a complex buffer of the planned size.
    pub fn complex_buffer(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> =
            input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        buffer
    }

    /// Perform forward FFT on a complex buffer (in-place).
    pub fn forward_complex(&self, buffer: &mut [Complex<f32>]) {
        self.forward.process(buffer);
    }

    /// Perform inverse FFT on a complex buffer (in-place), scaling by 1/N.
    pub fn inverse_complex(&self, buffer: &mut [Complex<f32>]) {
        self.inverse.process(buffer);

        let scale = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_fft_roundtrip() {
        let fft = Fft::new(256);

        let input: Vec<f32> = (0..256)
            .map(|i| (2.0 * PI * 10.0 * i as f32 / 256.0).sin())
            .collect();

        let mut buffer = fft.complex_buffer(&input);
        fft.forward_complex(&mut buffer);
        fft.inverse_complex(&mut buffer);

        for (a, b) in input.iter().zip(buffer.iter()) {
            assert!((a - b.re).abs() < 1e-4, "mismatch: {} vs {}", a, b.re);
        }
    }

    #[test]
    fn test_complex_buffer_pads_to_size() {
        let fft = Fft::new(64);
        let buffer = fft.complex_buffer(&[1.0, 2.0, 3.0]);

        assert_eq!(buffer.len(), 64);
        assert_eq!(buffer[0].re, 1.0);
        assert_eq!(buffer[2].re, 3.0);
        assert_eq!(buffer[3], Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_dc_detection() {
        let fft = Fft::new(256);

        let mut buffer = fft.complex_buffer(&vec![1.0; 256]);
        fft.forward_complex(&mut buffer);

        // DC bin should dominate
        let dc_mag = buffer[0].norm();
        let other_mag: f32 = buffer[1..].iter().map(|c| c.norm()).sum();
        assert!(dc_mag > other_mag * 10.0);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_size_panics() {
        let _ = Fft::new(0);
    }
}
