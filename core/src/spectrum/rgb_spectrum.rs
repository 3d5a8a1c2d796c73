//! RGB Spectrum

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Sub};

/// Number of RGB samples.
pub const RGB_SAMPLES: usize = 3;

/// Spectral weight stored as linear RGB coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// The RGB coefficients.
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Spectrum with all coefficients set to zero.
    pub const ZERO: Self = Self { c: [0.0; RGB_SAMPLES] };

    /// Spectrum with all coefficients set to one.
    pub const ONE: Self = Self { c: [1.0; RGB_SAMPLES] };

    /// Create a new `RGBSpectrum` with a constant value across all channels.
    ///
    /// * `v` - The constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a new `RGBSpectrum` from RGB coefficients.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the stored samples.
    pub fn samples(&self) -> &[Float] {
        &self.c
    }

    /// Sets all channels to a constant value.
    ///
    /// * `v` - The value.
    pub fn set(&mut self, v: Float) {
        self.c = [v; RGB_SAMPLES];
    }

    /// Returns true if either coefficient is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if the values are zero everywhere.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns the maximum coefficient.
    pub fn max_component_value(&self) -> Float {
        self.c[1..].iter().fold(self.c[0], |m, v| max(m, *v))
    }

    /// Returns the minimum coefficient.
    pub fn min_component_value(&self) -> Float {
        self.c[1..].iter().fold(self.c[0], |m, v| min(m, *v))
    }

    /// Returns the luminance (y-coefficient of XYZ colour).
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }

    /// Takes the square root of all coefficients.
    pub fn sqrt(&self) -> Self {
        self.map(|v| v.sqrt())
    }

    /// Clamps all coefficients to the given [low, high] interval.
    ///
    /// * `low`  - Low value.
    /// * `high` - High value.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        self.map(|v| clamp(v, low, high))
    }

    /// Clamps all coefficients to [0, 1].
    pub fn saturate(&self) -> Self {
        self.map(saturate)
    }

    /// Returns a new spectrum with a function applied to every coefficient.
    ///
    /// * `f` - The function.
    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self {
            c: [f(self.c[0]), f(self.c[1]), f(self.c[2])],
        }
    }

    /// Returns a new spectrum combining two spectra coefficient-wise.
    ///
    /// * `other` - The other spectrum.
    /// * `f`     - The combining function.
    pub fn zip_map<F: Fn(Float, Float) -> Float>(&self, other: &Self, f: F) -> Self {
        Self {
            c: [
                f(self.c[0], other.c[0]),
                f(self.c[1], other.c[1]),
                f(self.c[2], other.c[2]),
            ],
        }
    }
}

/// Multiply-add: `value += other * weight`.
///
/// * `value`  - The accumulator.
/// * `other`  - The spectrum to add.
/// * `weight` - The scalar weight.
#[inline]
pub fn madd(value: &mut RGBSpectrum, other: &RGBSpectrum, weight: Float) {
    *value += *other * weight;
}

impl From<Float> for RGBSpectrum {
    /// Create a constant `RGBSpectrum`.
    ///
    /// * `v` - The constant value.
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Adds the coefficients of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn add(self, other: Self) -> Self::Output {
        self.zip_map(&other, |a, b| a + b)
    }
}

impl AddAssign for RGBSpectrum {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The other spectrum.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    /// Subtracts the coefficients of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn sub(self, other: Self) -> Self::Output {
        self.zip_map(&other, |a, b| a - b)
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Multiplies the coefficients of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn mul(self, other: Self) -> Self::Output {
        self.zip_map(&other, |a, b| a * b)
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the coefficients.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self::Output {
        self.map(|v| v * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales the coefficients.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> Self::Output {
        s * self
    }
}

impl MulAssign for RGBSpectrum {
    /// Performs the `*=` operation.
    ///
    /// * `other` - The other spectrum.
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl MulAssign<Float> for RGBSpectrum {
    /// Performs the `*=` operation.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Divides the coefficients by those of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn div(self, other: Self) -> Self::Output {
        self.zip_map(&other, |a, b| a / b)
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the coefficients by 1/f.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Return a coefficient.
    ///
    /// * `i` - The channel index.
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    /// Return a mutable coefficient.
    ///
    /// * `i` - The channel index.
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl fmt::Display for RGBSpectrum {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}
