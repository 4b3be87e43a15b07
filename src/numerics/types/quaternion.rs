// src/numerics/types/quaternion.rs
// Rotation quaternion, consumed by Matrix3x3::rotation_quaternion.

use serde::{Deserialize, Serialize};

use bytemuck::{Pod, Zeroable};

use super::traits::{FloatingPoint, Preferred, VectorType, YamaType};
use super::vector::Vector3;
use crate::diagnostics::assert_bad;

/// A quaternion `w + xi + yj + zk`.
///
/// Stored as (x, y, z, w) where w is the scalar part.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion<T: FloatingPoint = Preferred> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

unsafe impl<T: FloatingPoint> Zeroable for Quaternion<T> {}
unsafe impl<T: FloatingPoint> Pod for Quaternion<T> {}

impl<T: FloatingPoint> Quaternion<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    /// Identity quaternion (no rotation)
    pub fn identity() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// Rotation of `radians` around `axis`. The axis must be normalized.
    pub fn rotation_axis(axis: &Vector3<T>, radians: T) -> Self {
        assert_bad!(axis.is_normalized(), "quaternion rotation axis should be normalized");

        let half = radians / T::from_f64(2.0);
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    pub fn length_sq(&self) -> T {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    pub fn length(&self) -> T {
        self.length_sq().sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    /// True if the length is 1 within `T::EPSILON`
    pub fn is_normalized(&self) -> bool {
        self.length_sq().close(T::one(), T::EPSILON)
    }
}

impl<T: FloatingPoint> YamaType for Quaternion<T> {
    type Scalar = T;
    const VALUE_COUNT: usize = 4;
}

impl<T: FloatingPoint> VectorType for Quaternion<T> {
    const DIMENSION: usize = 4;
}
