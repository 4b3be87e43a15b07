//! # yama
//!
//! Small, fixed-size linear algebra value types for graphics and physics
//! code: a column-major [`Matrix3x3`], plus the [`Vector3`] and
//! [`Quaternion`] types it works with.
//!
//! All types are plain `Copy` values generic over an `f32`/`f64` scalar, with
//! a guaranteed flat memory layout (`Matrix3x3<T>` is exactly a column-major
//! `[T; 9]`).
//!
//! ```
//! use yama::{matrix, Matrix3x3, Vector3};
//!
//! let r = Matrix3x3::<f64>::rotation_z(std::f64::consts::FRAC_PI_2);
//! let v = r * Vector3::unit_x();
//! assert!(yama::vector::close(&v, &Vector3::unit_y()));
//!
//! let (inv, det) = matrix::inverse_with_determinant(&r);
//! assert!(det.abs() > 0.5);
//! assert!(matrix::close(&(r * inv), &Matrix3x3::identity()));
//! ```
//!
//! Precondition checks are reported through `tracing`; see [`diagnostics`].

pub mod diagnostics;
pub mod error;
pub mod numerics;

pub use error::{Error, Result};
pub use numerics::types::{matrix, vector};
pub use numerics::{
    FloatingPoint, Matrix3, Matrix3x3, MatrixType, Preferred, Quaternion, Vector3, VectorType,
    YamaType,
};
