//! Scalar fields supported by the solvers.
//!
//! Every algorithm in this crate is written once against the [`Scalar`] trait and
//! instantiated for `f32`, `f64`, [`Complex32`] and [`Complex64`]. The trait extends
//! [`faer::traits::ComplexField`], so any `Scalar` can be stored in a [`faer::Mat`] and
//! fed to the backend's products and factorizations, and adds the plain arithmetic and
//! conversions that the iteration logic needs.

use faer::traits::ComplexField;
use num_complex::{Complex, Complex64};
use num_traits::Float;
use rand::Rng;
use std::fmt::{Debug, Display, LowerExp};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Uniform complex type in which eigenvalues are reported.
#[allow(non_camel_case_types)]
pub type c64 = Complex64;

/// A real or complex floating-point scalar.
pub trait Scalar:
    ComplexField
    + Copy
    + PartialEq
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Real type of magnitudes, norms and tolerances.
    type Magnitude: Float + Debug + Display + LowerExp + Send + Sync + 'static;

    /// `true` for complex fields.
    const IS_COMPLEX: bool;

    fn from_real_f64(value: f64) -> Self;

    /// Builds a scalar from real and imaginary parts. Real fields drop `im`.
    fn from_parts(re: f64, im: f64) -> Self;

    fn from_modulus(value: Self::Magnitude) -> Self;

    fn magnitude_from_f64(value: f64) -> Self::Magnitude;

    /// Absolute value (real) or modulus (complex).
    fn modulus(self) -> Self::Magnitude;

    fn modulus_squared(self) -> Self::Magnitude;

    /// Complex conjugate; the identity on real fields.
    fn conj_scalar(self) -> Self;

    fn is_finite_scalar(self) -> bool;

    /// Widens to the report type.
    fn to_c64(self) -> c64;

    /// Draws an entry of a random starting vector; every component is uniform in `[-1, 1)`.
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            type Magnitude = $t;
            const IS_COMPLEX: bool = false;

            #[inline]
            fn from_real_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn from_parts(re: f64, _im: f64) -> Self {
                re as $t
            }

            #[inline]
            fn from_modulus(value: $t) -> Self {
                value
            }

            #[inline]
            fn magnitude_from_f64(value: f64) -> $t {
                value as $t
            }

            #[inline]
            fn modulus(self) -> $t {
                self.abs()
            }

            #[inline]
            fn modulus_squared(self) -> $t {
                self * self
            }

            #[inline]
            fn conj_scalar(self) -> Self {
                self
            }

            #[inline]
            fn is_finite_scalar(self) -> bool {
                self.is_finite()
            }

            #[inline]
            fn to_c64(self) -> c64 {
                c64::new(self as f64, 0.0)
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                rng.random_range(-1.0..1.0)
            }
        }
    };
}

macro_rules! impl_complex_scalar {
    ($t:ty) => {
        impl Scalar for Complex<$t> {
            type Magnitude = $t;
            const IS_COMPLEX: bool = true;

            #[inline]
            fn from_real_f64(value: f64) -> Self {
                Complex::new(value as $t, 0.0)
            }

            #[inline]
            fn from_parts(re: f64, im: f64) -> Self {
                Complex::new(re as $t, im as $t)
            }

            #[inline]
            fn from_modulus(value: $t) -> Self {
                Complex::new(value, 0.0)
            }

            #[inline]
            fn magnitude_from_f64(value: f64) -> $t {
                value as $t
            }

            #[inline]
            fn modulus(self) -> $t {
                self.norm()
            }

            #[inline]
            fn modulus_squared(self) -> $t {
                self.norm_sqr()
            }

            #[inline]
            fn conj_scalar(self) -> Self {
                self.conj()
            }

            #[inline]
            fn is_finite_scalar(self) -> bool {
                self.re.is_finite() && self.im.is_finite()
            }

            #[inline]
            fn to_c64(self) -> c64 {
                c64::new(self.re as f64, self.im as f64)
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);
impl_complex_scalar!(f32);
impl_complex_scalar!(f64);

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex32;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_field_tags() {
        assert!(!f32::IS_COMPLEX);
        assert!(!f64::IS_COMPLEX);
        assert!(Complex32::IS_COMPLEX);
        assert!(c64::IS_COMPLEX);
    }

    #[test]
    fn test_real_field_drops_imaginary_part() {
        assert_eq!(f64::from_parts(1.5, 2.0), 1.5);
        assert_eq!(c64::from_parts(1.5, 2.0), c64::new(1.5, 2.0));
        assert_eq!((-2.0f32).to_c64(), c64::new(-2.0, 0.0));
    }

    #[test]
    fn test_modulus_and_conjugate() {
        let z = c64::new(3.0, -4.0);
        assert_eq!(z.modulus(), 5.0);
        assert_eq!(z.modulus_squared(), 25.0);
        assert_eq!(z.conj_scalar(), c64::new(3.0, 4.0));
        assert_eq!((-3.0f64).modulus(), 3.0);
        assert_eq!((-3.0f64).conj_scalar(), -3.0);
    }

    #[test]
    fn test_finiteness() {
        assert!(1.0f64.is_finite_scalar());
        assert!(!f64::NAN.is_finite_scalar());
        assert!(!c64::new(1.0, f64::INFINITY).is_finite_scalar());
    }

    #[test]
    fn test_samples_stay_in_unit_box() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let z = c64::sample(&mut rng);
            assert!((-1.0..1.0).contains(&z.re));
            assert!((-1.0..1.0).contains(&z.im));
            let x = f32::sample(&mut rng);
            assert!((-1.0..1.0).contains(&x));
        }
    }
}
