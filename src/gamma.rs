//! Perceptual brightness correction
//!
//! LEDs respond linearly to their PWM duty while the eye does not, so raw
//! image channels are raised to a gamma power before being scaled by the
//! global brightness. The math runs once per channel value while frames are
//! built; playback only copies bytes.

use crate::color::Rgb;

/// Number of distinct 8-bit channel values
const LUT_SIZE: usize = 256;

/// Correct a single channel: `round(pow(raw / 255, gamma) * brightness * 255)`
///
/// Halves round up. The result is clamped to the 8-bit range, which only
/// matters for out-of-range brightness values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn correct_channel(raw: u8, gamma: f64, brightness: f64) -> u8 {
    let normalized = f64::from(raw) / 255.0;
    let scaled = libm::pow(normalized, gamma) * brightness * 255.0;
    libm::floor(scaled + 0.5).clamp(0.0, 255.0) as u8
}

/// Precomputed gamma and brightness curve for all channel values
#[derive(Debug, Clone)]
pub struct GammaTable {
    lut: [u8; LUT_SIZE],
}

impl GammaTable {
    /// Build the table for the given gamma and brightness
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(gamma: f64, brightness: f64) -> Self {
        let mut lut = [0; LUT_SIZE];
        for (raw, out) in lut.iter_mut().enumerate() {
            *out = correct_channel(raw as u8, gamma, brightness);
        }
        Self { lut }
    }

    /// Table that passes every value through unchanged
    pub fn identity() -> Self {
        Self::new(1.0, 1.0)
    }

    #[inline]
    pub const fn correct(&self, raw: u8) -> u8 {
        self.lut[raw as usize]
    }

    /// Correct all three channels of a color
    #[inline]
    pub const fn correct_rgb(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.correct(color.r),
            g: self.correct(color.g),
            b: self.correct(color.b),
        }
    }
}
