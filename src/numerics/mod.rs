// src/numerics/mod.rs
// Top-level numerics module. Exposes a `types` namespace with submodules.

pub mod types {
    // The submodules live in src/numerics/types/*.rs
    pub mod traits;
    pub mod vector;
    pub mod quaternion;
    pub mod matrix;
}

pub use types::matrix::{Matrix3, Matrix3x3};
pub use types::quaternion::Quaternion;
pub use types::traits::{FloatingPoint, MatrixType, Preferred, VectorType, YamaType};
pub use types::vector::Vector3;
