// src/numerics/types/vector.rs
// Vector3 generic implementation, the column type of Matrix3x3.
// Uses the FloatingPoint trait from super::traits.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, Neg, Sub, SubAssign};
use serde::{Serialize, Deserialize};

use bytemuck::{Pod, Zeroable};

use super::traits::{FloatingPoint, Preferred, VectorType, YamaType};
use crate::diagnostics::assert_warn;

/// Vector3 is a 3D vector over a floating point scalar.
///
/// `#[repr(C)]`: the layout is exactly `[T; 3]`, which is what lets a
/// matrix column be viewed as a vector in place.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Vector3<T: FloatingPoint = Preferred> {
    pub x: T,
    pub y: T,
    pub z: T,
}

unsafe impl<T: FloatingPoint> Zeroable for Vector3<T> {}
unsafe impl<T: FloatingPoint> Pod for Vector3<T> {}

// Conditional impls for serde
impl<T> Serialize for Vector3<T>
where
    T: FloatingPoint + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (&self.x, &self.y, &self.z).serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Vector3<T>
where
    T: FloatingPoint + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (x, y, z) = <(T, T, T)>::deserialize(deserializer)?;
        Ok(Vector3 { x, y, z })
    }
}

impl<T: FloatingPoint> Vector3<T> {
    /// Construct a new Vector3
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Same as `new`
    pub fn coord(x: T, y: T, z: T) -> Self {
        Self::new(x, y, z)
    }

    pub fn uniform(s: T) -> Self {
        Self::new(s, s, s)
    }

    /// Vector of all zeros
    pub fn zero() -> Self {
        Self::uniform(T::zero())
    }

    /// Vector of all ones
    pub fn one() -> Self {
        Self::uniform(T::one())
    }

    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero(), T::zero())
    }

    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one(), T::zero())
    }

    pub fn unit_z() -> Self {
        Self::new(T::zero(), T::zero(), T::one())
    }

    /// View three contiguous scalars as a vector.
    pub fn attach(array: &[T; 3]) -> &Self {
        bytemuck::cast_ref(array)
    }

    pub fn attach_mut(array: &mut [T; 3]) -> &mut Self {
        bytemuck::cast_mut(array)
    }

    pub fn as_array(&self) -> &[T; 3] {
        bytemuck::cast_ref(self)
    }

    /// Return the squared length (avoids sqrt)
    pub fn length_squared(&self) -> T {
        self.dot(self)
    }

    /// Return the Euclidean length
    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Unit vector with the same direction.
    ///
    /// Normalizing a zero vector yields NaNs.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        assert_warn!(len != T::zero(), "normalizing a zero vector");
        *self / len
    }

    /// True if the length is 1 within `T::EPSILON`
    pub fn is_normalized(&self) -> bool {
        self.length_squared().close(T::one(), T::EPSILON)
    }

    /// Some vector orthogonal to this one, not normalized.
    ///
    /// Picks the pair of components with the larger magnitude so that the
    /// result is never zero for a non-zero input.
    pub fn orthogonal(&self) -> Self {
        if self.x.abs() > self.z.abs() {
            Self::new(-self.y, self.x, T::zero())
        } else {
            Self::new(T::zero(), -self.z, self.y)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Element-wise approximate equality with an explicit tolerance
pub fn close_eps<T: FloatingPoint>(a: &Vector3<T>, b: &Vector3<T>, epsilon: T) -> bool {
    a.x.close(b.x, epsilon) && a.y.close(b.y, epsilon) && a.z.close(b.z, epsilon)
}

/// Element-wise approximate equality with `T::EPSILON`
pub fn close<T: FloatingPoint>(a: &Vector3<T>, b: &Vector3<T>) -> bool {
    close_eps(a, b, T::EPSILON)
}

impl<T: FloatingPoint> YamaType for Vector3<T> {
    type Scalar = T;
    const VALUE_COUNT: usize = 3;
}

impl<T: FloatingPoint> VectorType for Vector3<T> {
    const DIMENSION: usize = 3;
}

impl<T: FloatingPoint> Add for Vector3<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: FloatingPoint> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: FloatingPoint> AddAssign for Vector3<T> {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl<T: FloatingPoint> SubAssign for Vector3<T> {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl<T: FloatingPoint> Neg for Vector3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: FloatingPoint> Mul<T> for Vector3<T> {
    type Output = Self;

    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl<T: FloatingPoint> Div<T> for Vector3<T> {
    type Output = Self;

    fn div(self, s: T) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }
}

impl<T: FloatingPoint> DivAssign<T> for Vector3<T> {
    fn div_assign(&mut self, s: T) {
        self.x /= s;
        self.y /= s;
        self.z /= s;
    }
}

// Conversions between Vector3<T> and tuples

impl<T: FloatingPoint> From<(T, T, T)> for Vector3<T> {
    fn from(tuple: (T, T, T)) -> Self {
        Self {
            x: tuple.0,
            y: tuple.1,
            z: tuple.2,
        }
    }
}

impl<T: FloatingPoint> From<Vector3<T>> for (T, T, T) {
    fn from(v: Vector3<T>) -> Self {
        (v.x, v.y, v.z)
    }
}

// Conversions between Vector3<T> and arrays [T; 3]

impl<T: FloatingPoint> From<[T; 3]> for Vector3<T> {
    fn from(array: [T; 3]) -> Self {
        Self {
            x: array[0],
            y: array[1],
            z: array[2],
        }
    }
}

impl<T: FloatingPoint> From<Vector3<T>> for [T; 3] {
    fn from(v: Vector3<T>) -> Self {
        [v.x, v.y, v.z]
    }
}
