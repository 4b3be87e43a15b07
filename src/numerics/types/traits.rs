// src/numerics/types/traits.rs
// Scalar trait shared by all value types, plus the type classification traits.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::Pod;

/// Scalar type used when a value type is written without its parameter.
#[cfg(not(feature = "double-precision"))]
pub type Preferred = f32;

/// Scalar type used when a value type is written without its parameter.
#[cfg(feature = "double-precision")]
pub type Preferred = f64;

/// FloatingPoint is the scalar trait for every numerics type.
///
/// It is implemented for `f32` and `f64`. The `Pod` bound is what lets the
/// value types be reinterpreted as flat scalar arrays.
pub trait FloatingPoint:
Pod + Debug + PartialOrd
+ Add<Output = Self>
+ Sub<Output = Self>
+ Mul<Output = Self>
+ Div<Output = Self>
+ Neg<Output = Self>
+ AddAssign + SubAssign + MulAssign + DivAssign
{
    /// Default tolerance for `close` comparisons.
    const EPSILON: Self;

    fn zero() -> Self;
    fn one() -> Self;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn acos(self) -> Self;
    /// Four-quadrant arctangent of `self / x`.
    fn atan2(self, x: Self) -> Self;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;

    /// `self * self`
    #[inline]
    fn sq(self) -> Self {
        self * self
    }

    /// True if `self` and `other` differ by at most `epsilon`.
    #[inline]
    fn close(self, other: Self, epsilon: Self) -> bool {
        (self - other).abs() <= epsilon
    }
}

macro_rules! impl_floating_point {
    ($t:ident, $eps:expr) => {
        impl FloatingPoint for $t {
            const EPSILON: Self = $eps;

            #[inline]
            fn zero() -> Self { 0.0 }
            #[inline]
            fn one() -> Self { 1.0 }

            #[inline]
            fn sqrt(self) -> Self { $t::sqrt(self) }
            #[inline]
            fn sin(self) -> Self { $t::sin(self) }
            #[inline]
            fn cos(self) -> Self { $t::cos(self) }
            #[inline]
            fn acos(self) -> Self { $t::acos(self) }
            #[inline]
            fn atan2(self, x: Self) -> Self { $t::atan2(self, x) }
            #[inline]
            fn abs(self) -> Self { $t::abs(self) }
            #[inline]
            fn is_finite(self) -> bool { $t::is_finite(self) }

            #[inline]
            fn to_f64(self) -> f64 { self as f64 }
            #[inline]
            fn from_f64(value: f64) -> Self { value as $t }
        }
    };
}

impl_floating_point!(f32, 1e-5);
impl_floating_point!(f64, 1e-10);

/// Scalar `close` using the type's default tolerance.
#[inline]
pub fn close<T: FloatingPoint>(a: T, b: T) -> bool {
    a.close(b, T::EPSILON)
}

/// Implemented by every value type of this crate.
///
/// Generic code can bound on it to accept "any yama type" and read the flat
/// element count.
pub trait YamaType: Copy {
    type Scalar: FloatingPoint;

    /// Number of scalars in the flat layout.
    const VALUE_COUNT: usize;
}

/// Implemented by the matrix types.
pub trait MatrixType: YamaType {
    const ROWS: usize;
    const COLUMNS: usize;
}

/// Implemented by the vector-like types (vectors, quaternions).
pub trait VectorType: YamaType {
    const DIMENSION: usize;
}
