//! FIR kernel design and convolution
//!
//! The kernel is designed by frequency sampling: the band gains become a
//! piecewise-linear target magnitude curve, which is sampled on a uniform
//! grid, given a linear-phase shift, inverse transformed and windowed.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::debug;

use super::bands::GainVector;
use super::biquad::eval_delay_polynomial;
use crate::engine::AudioBuffer;
use crate::error::{EqError, Result};

/// Kernel length. Odd, so the kernel is a type I linear-phase filter with an
/// exact center tap.
pub const FIR_TAPS: usize = 513;

/// Breakpoints closer than this to their predecessor are dropped
const MIN_BREAKPOINT_SPACING_HZ: f64 = 1e-6;

/// Linear-phase FIR kernel of exactly [`FIR_TAPS`] taps
#[derive(Debug, Clone, PartialEq)]
pub struct FirKernel {
    taps: Vec<f64>,
}

impl FirKernel {
    /// Kernel that passes the signal through delayed by half its length,
    /// which "same" convolution compensates exactly
    pub fn unit_impulse() -> Self {
        let mut taps = vec![0.0; FIR_TAPS];
        taps[FIR_TAPS / 2] = 1.0;
        Self { taps }
    }

    /// Tap coefficients
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of taps (always [`FIR_TAPS`])
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether the kernel has no taps
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        (self.taps.len() - 1) / 2
    }

    pub fn is_unit_impulse(&self) -> bool {
        *self == Self::unit_impulse()
    }

    /// Complex response at normalized angular frequency `omega` (rad/sample)
    pub fn frequency_response(&self, omega: f64) -> Complex64 {
        eval_delay_polynomial(&self.taps, omega)
    }
}

/// Target magnitude curve as (frequency Hz, linear magnitude) pairs with
/// strictly increasing frequencies
pub fn fir_breakpoints(gains: &GainVector, sample_rate: u32) -> Vec<(f64, f64)> {
    let nyquist = sample_rate as f64 / 2.0;
    let upper = (nyquist - 1.0).max(1.0);

    let points: Vec<(f64, f64)> = gains
        .bands()
        .map(|(band, gain_db)| {
            (
                band.center_frequency.clamp(1.0, upper),
                10.0_f64.powf(gain_db / 20.0),
            )
        })
        .collect();

    let mut curve = Vec::with_capacity(2 * points.len() + 1);
    curve.push((0.0, points[0].1));
    for (i, &(freq, magnitude)) in points.iter().enumerate() {
        if i > 0 {
            let (prev_freq, prev_magnitude) = points[i - 1];
            // Band edge at the midpoint in log-frequency
            curve.push(((prev_freq * freq).sqrt(), (prev_magnitude + magnitude) / 2.0));
        }
        curve.push((freq, magnitude));
    }
    curve.push((nyquist, points[points.len() - 1].1));

    for point in &mut curve {
        point.0 = point.0.clamp(0.0, nyquist);
    }

    let mut kept = Vec::with_capacity(curve.len());
    kept.push(curve[0]);
    for pair in curve.windows(2) {
        if pair[1].0 - pair[0].0 > MIN_BREAKPOINT_SPACING_HZ {
            kept.push(pair[1]);
        }
    }
    kept
}

/// Design the equalizer's FIR kernel for `gains` at `sample_rate`
pub fn design_fir(gains: &GainVector, sample_rate: u32) -> Result<FirKernel> {
    if sample_rate == 0 {
        return Err(EqError::InvalidSampleRate { sample_rate });
    }
    if gains.is_flat() {
        debug!("flat gains, using unit impulse kernel");
        return Ok(FirKernel::unit_impulse());
    }

    let breakpoints = fir_breakpoints(gains, sample_rate);
    debug!(breakpoints = breakpoints.len(), sample_rate, "designing FIR kernel");

    let taps = frequency_sampling_design(FIR_TAPS, &breakpoints, sample_rate as f64 / 2.0);
    Ok(FirKernel { taps })
}

/// Windowed frequency-sampling design of an odd-length linear-phase filter.
///
/// `breakpoints` must have strictly increasing frequencies in `[0, nyquist]`.
fn frequency_sampling_design(num_taps: usize, breakpoints: &[(f64, f64)], nyquist: f64) -> Vec<f64> {
    let num_freqs = 1 + num_taps.next_power_of_two();
    let fft_len = 2 * (num_freqs - 1);
    let delay = (num_taps - 1) as f64 / 2.0;

    // Hermitian spectrum of the shifted target response
    let mut spectrum = vec![Complex64::new(0.0, 0.0); fft_len];
    for k in 0..num_freqs {
        let x = nyquist * k as f64 / (num_freqs - 1) as f64;
        let magnitude = interpolate(x, breakpoints);
        let bin = Complex64::from_polar(magnitude, -delay * PI * x / nyquist);
        spectrum[k] = bin;
        if k > 0 && k < num_freqs - 1 {
            spectrum[fft_len - k] = bin.conj();
        }
    }
    // DC and Nyquist bins of a real signal are real
    spectrum[0].im = 0.0;
    spectrum[num_freqs - 1].im = 0.0;

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(fft_len).process(&mut spectrum);

    let scale = 1.0 / fft_len as f64;
    spectrum[..num_taps]
        .iter()
        .enumerate()
        .map(|(n, bin)| bin.re * scale * hamming(n, num_taps))
        .collect()
}

/// Symmetric Hamming window
fn hamming(n: usize, len: usize) -> f64 {
    if len == 1 {
        return 1.0;
    }
    0.54 - 0.46 * (2.0 * PI * n as f64 / (len - 1) as f64).cos()
}

/// Piecewise-linear interpolation, holding the end values outside the range
fn interpolate(x: f64, points: &[(f64, f64)]) -> f64 {
    let (first_x, first_y) = points[0];
    let (last_x, last_y) = points[points.len() - 1];
    if x <= first_x {
        return first_y;
    }
    if x >= last_x {
        return last_y;
    }

    // First point strictly right of x; exists because x < last_x
    let upper = points.partition_point(|&(px, _)| px <= x);
    let (x0, y0) = points[upper - 1];
    let (x1, y1) = points[upper];
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Convolve every channel with `kernel` ("same" mode), then peak-normalize
pub fn apply_fir(buffer: &AudioBuffer, kernel: &FirKernel) -> AudioBuffer {
    if kernel.is_unit_impulse() || buffer.is_empty() {
        let mut output = buffer.clone();
        output.normalize_peak();
        return output;
    }

    let num_frames = buffer.num_frames();
    let fft_len = (num_frames + kernel.len() - 1).next_power_of_two();
    let offset = kernel.group_delay_samples();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut kernel_spectrum = to_complex(kernel.taps(), fft_len);
    forward.process(&mut kernel_spectrum);

    let scale = 1.0 / fft_len as f64;
    let channels: Vec<Vec<f64>> = (0..buffer.num_channels())
        .map(|ch| {
            let mut spectrum = to_complex(&buffer.channel_f64(ch), fft_len);
            forward.process(&mut spectrum);
            for (bin, k) in spectrum.iter_mut().zip(&kernel_spectrum) {
                *bin *= *k;
            }
            inverse.process(&mut spectrum);
            spectrum[offset..offset + num_frames]
                .iter()
                .map(|bin| bin.re * scale)
                .collect()
        })
        .collect();

    let mut output = buffer.with_channels_f64(&channels);
    output.normalize_peak();
    output
}

/// Design the kernel for `gains` and apply it at the buffer's sample rate
pub fn apply_fir_gains(buffer: &AudioBuffer, gains: &GainVector) -> Result<AudioBuffer> {
    let kernel = design_fir(gains, buffer.sample_rate())?;
    debug!(
        frames = buffer.num_frames(),
        channels = buffer.num_channels(),
        "applying FIR kernel"
    );
    Ok(apply_fir(buffer, &kernel))
}

/// Zero-padded complex copy of a real signal
fn to_complex(signal: &[f64], len: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); len];
    for (dst, &src) in out.iter_mut().zip(signal) {
        dst.re = src;
    }
    out
}
