// src/numerics/types/matrix.rs
// Column-major 3x3 matrix, generic over the scalar type.

use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::quaternion::Quaternion;
use super::traits::{FloatingPoint, MatrixType, Preferred, YamaType};
use super::vector::{self, Vector3};
use crate::diagnostics::{assert_bad, assert_critical, assert_warn, critical};
use crate::error::{Error, Result};

/// A 3x3 matrix stored in column-major order.
///
/// Fields are named `m{row}{col}` and declared column by column, so the
/// struct is laid out exactly like a column-major `[T; 9]`: column `i`
/// occupies the flat elements `[3i, 3i + 3)`. That layout is relied on by
/// the attach functions and the column views.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Matrix3x3<T: FloatingPoint = Preferred> {
    pub m00: T,
    pub m10: T,
    pub m20: T,
    pub m01: T,
    pub m11: T,
    pub m21: T,
    pub m02: T,
    pub m12: T,
    pub m22: T,
}

/// Shorthand for [`Matrix3x3`].
pub type Matrix3<T = Preferred> = Matrix3x3<T>;

unsafe impl<T: FloatingPoint> Zeroable for Matrix3x3<T> {}
unsafe impl<T: FloatingPoint> Pod for Matrix3x3<T> {}

impl<T: FloatingPoint> Matrix3x3<T> {
    pub const ROWS_COUNT: usize = 3;
    pub const COLUMNS_COUNT: usize = 3;
    pub const VALUE_COUNT: usize = 9;

    ///////////////////////////////////////////////////////////////////////////
    // named constructors

    /// Construct from column-major values.
    #[allow(clippy::too_many_arguments)]
    pub fn columns(
        m00: T, m10: T, m20: T, // column 0
        m01: T, m11: T, m21: T, // column 1
        m02: T, m12: T, m22: T, // column 2
    ) -> Self {
        Self { m00, m10, m20, m01, m11, m21, m02, m12, m22 }
    }

    /// Construct from row-major values.
    #[allow(clippy::too_many_arguments)]
    pub fn rows(
        m00: T, m01: T, m02: T, // row 0
        m10: T, m11: T, m12: T, // row 1
        m20: T, m21: T, m22: T, // row 2
    ) -> Self {
        Self { m00, m10, m20, m01, m11, m21, m02, m12, m22 }
    }

    pub fn uniform(s: T) -> Self {
        Self::from_array([s; 9])
    }

    pub fn zero() -> Self {
        Self::uniform(T::zero())
    }

    pub fn identity() -> Self {
        let (o, z) = (T::one(), T::zero());
        Self::columns(
            o, z, z,
            z, o, z,
            z, z, o,
        )
    }

    /// Construct from 9 column-major values.
    pub fn from_array(values: [T; 9]) -> Self {
        bytemuck::cast(values)
    }

    /// Construct from a slice of exactly 9 column-major values.
    pub fn from_slice(values: &[T]) -> Result<Self> {
        let array: &[T; 9] = values.try_into().map_err(|_| Error::BufferSize {
            expected: Self::VALUE_COUNT,
            actual: values.len(),
        })?;
        Ok(Self::from_array(*array))
    }

    /// Read 9 contiguous column-major values.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 9 values of `T`. It need not be
    /// aligned. A null `ptr` is a critical failure.
    pub unsafe fn from_ptr(ptr: *const T) -> Self {
        assert_critical!(!ptr.is_null(), "constructing Matrix3x3 from a null pointer");
        // SAFETY: the caller guarantees 9 readable values at `ptr`
        Self::from_array(unsafe { ptr.cast::<[T; 9]>().read_unaligned() })
    }

    ///////////////////////////////////////////////////////////////////////////
    // transforms

    pub fn scaling_uniform(s: T) -> Self {
        assert_warn!(!s.close(T::zero(), T::EPSILON), "scale shouldn't be zero");
        let o = T::zero();
        Self::columns(
            s, o, o,
            o, s, o,
            o, o, s,
        )
    }

    pub fn scaling(x: T, y: T, z: T) -> Self {
        assert_warn!(!x.close(T::zero(), T::EPSILON), "scale shouldn't be zero");
        assert_warn!(!y.close(T::zero(), T::EPSILON), "scale shouldn't be zero");
        assert_warn!(!z.close(T::zero(), T::EPSILON), "scale shouldn't be zero");
        let o = T::zero();
        Self::columns(
            x, o, o,
            o, y, o,
            o, o, z,
        )
    }

    pub fn scaling_vector(s: &Vector3<T>) -> Self {
        Self::scaling(s.x, s.y, s.z)
    }

    /// Rotation around an axis which is already normalized.
    pub fn rotation_naxis(axis: &Vector3<T>, radians: T) -> Self {
        assert_bad!(axis.is_normalized(), "rotation axis should be normalized");

        let c = radians.cos();
        let s = radians.sin();
        let c1 = T::one() - c;
        let Vector3 { x, y, z } = *axis;

        Self::rows(
            c + c1 * x.sq(), c1 * y * x - s * z, c1 * z * x + s * y,
            c1 * x * y + s * z, c + c1 * y.sq(), c1 * z * y - s * x,
            c1 * x * z - s * y, c1 * y * z + s * x, c + c1 * z.sq(),
        )
    }

    pub fn rotation_axis(axis: &Vector3<T>, radians: T) -> Self {
        Self::rotation_naxis(&axis.normalize(), radians)
    }

    pub fn rotation_x(radians: T) -> Self {
        let c = radians.cos();
        let s = radians.sin();
        let (o, z) = (T::one(), T::zero());

        Self::rows(
            o, z, z,
            z, c, -s,
            z, s, c,
        )
    }

    pub fn rotation_y(radians: T) -> Self {
        let c = radians.cos();
        let s = radians.sin();
        let (o, z) = (T::one(), T::zero());

        Self::rows(
            c, z, s,
            z, o, z,
            -s, z, c,
        )
    }

    pub fn rotation_z(radians: T) -> Self {
        let c = radians.cos();
        let s = radians.sin();
        let (o, z) = (T::one(), T::zero());

        Self::rows(
            c, -s, z,
            s, c, z,
            z, z, o,
        )
    }

    /// Rotation which takes `src` onto `target`. Both must be normalized.
    ///
    /// When the vectors are opposite there is no unique rotation axis; the
    /// result is then a half turn around some axis orthogonal to `src`.
    pub fn rotation_vectors(src: &Vector3<T>, target: &Vector3<T>) -> Self {
        assert_bad!(src.is_normalized(), "source vector should be normalized");
        assert_bad!(target.is_normalized(), "target vector should be normalized");
        assert_warn!(!vector::close(src, &Vector3::zero()), "source vector shouldn't be zero");
        assert_warn!(!vector::close(target, &Vector3::zero()), "target vector shouldn't be zero");

        let axis = src.cross(target);
        let axis_length = axis.length();
        let cos = src.dot(target);

        if axis_length > T::EPSILON {
            // a rounded dot can leave [-1, 1], atan2 stays finite
            let angle = axis_length.atan2(cos);
            // cancellation leaves part of the cross product along `src`
            let axis = (axis - *src * axis.dot(src)).normalize();
            return Self::rotation_naxis(&axis, angle);
        }

        if cos > T::zero() {
            return Self::identity();
        }

        // opposite: 2 * o (x) o - I
        let o = src.orthogonal().normalize();
        let one = T::one();
        let two = one + one;
        Self::rows(
            two * o.x.sq() - one, two * o.y * o.x, two * o.z * o.x,
            two * o.x * o.y, two * o.y.sq() - one, two * o.z * o.y,
            two * o.x * o.z, two * o.y * o.z, two * o.z.sq() - one,
        )
    }

    pub fn rotation_quaternion(q: &Quaternion<T>) -> Self {
        assert_bad!(q.is_normalized(), "rotation with a non-normalized quaternion");
        assert_warn!(!q.length_sq().close(T::zero(), T::EPSILON), "rotating with a broken quaternion");

        let two = T::one() + T::one();
        let x2 = q.x.sq();
        let y2 = q.y.sq();
        let z2 = q.z.sq();
        let w2 = q.w.sq();
        let xy = two * q.x * q.y;
        let xz = two * q.x * q.z;
        let xw = two * q.x * q.w;
        let yz = two * q.y * q.z;
        let yw = two * q.y * q.w;
        let zw = two * q.z * q.w;

        Self::rows(
            w2 + x2 - y2 - z2, xy - zw, xz + yw,
            xy + zw, w2 - x2 + y2 - z2, yz - xw,
            xz - yw, yz + xw, w2 - x2 - y2 + z2,
        )
    }

    ///////////////////////////////////////////////////////////////////////////
    // attach

    /// View 9 column-major values as a matrix without copying.
    pub fn attach(values: &[T; 9]) -> &Self {
        bytemuck::cast_ref(values)
    }

    pub fn attach_mut(values: &mut [T; 9]) -> &mut Self {
        bytemuck::cast_mut(values)
    }

    /// View a buffer holding several matrices back to back.
    pub fn attach_slice(values: &[T]) -> Result<&[Self]> {
        assert_warn!(!values.is_empty(), "attaching Matrix3x3 to an empty buffer");
        Self::check_stride(values.len())?;
        Ok(bytemuck::cast_slice(values))
    }

    pub fn attach_slice_mut(values: &mut [T]) -> Result<&mut [Self]> {
        assert_warn!(!values.is_empty(), "attaching Matrix3x3 to an empty buffer");
        Self::check_stride(values.len())?;
        Ok(bytemuck::cast_slice_mut(values))
    }

    fn check_stride(len: usize) -> Result<()> {
        if len % Self::VALUE_COUNT != 0 {
            return Err(Error::BufferStride { len, stride: Self::VALUE_COUNT });
        }
        Ok(())
    }

    /// View raw memory as a matrix.
    ///
    /// # Safety
    ///
    /// `ptr` must be aligned for `T` and point to 9 initialized values which
    /// stay valid, and are not mutated elsewhere, for `'a`. A null `ptr` is a
    /// critical failure.
    pub unsafe fn attach_to_ptr<'a>(ptr: *const T) -> &'a Self {
        assert_critical!(!ptr.is_null(), "attaching Matrix3x3 to a null pointer");
        // SAFETY: same layout as [T; 9], the rest is on the caller
        unsafe { &*ptr.cast::<Self>() }
    }

    /// # Safety
    ///
    /// As [`Matrix3x3::attach_to_ptr`], and the memory must not be accessed
    /// through any other path for `'a`.
    pub unsafe fn attach_to_ptr_mut<'a>(ptr: *mut T) -> &'a mut Self {
        assert_critical!(!ptr.is_null(), "attaching Matrix3x3 to a null pointer");
        // SAFETY: same layout as [T; 9], the rest is on the caller
        unsafe { &mut *ptr.cast::<Self>() }
    }

    /// View raw memory holding `count` matrices back to back.
    ///
    /// A null `ptr` means "no data": it is reported as a warning and yields
    /// an empty view.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must be aligned for `T` and point to `9 * count`
    /// initialized values which stay valid, and are not mutated elsewhere,
    /// for `'a`.
    pub unsafe fn attach_to_array<'a>(ptr: *const T, count: usize) -> &'a [Self] {
        if ptr.is_null() {
            assert_warn!(false, "attaching Matrix3x3 array to a null pointer");
            return &[];
        }
        // SAFETY: same layout as [T; 9], the rest is on the caller
        unsafe { core::slice::from_raw_parts(ptr.cast::<Self>(), count) }
    }

    /// # Safety
    ///
    /// As [`Matrix3x3::attach_to_array`], and the memory must not be
    /// accessed through any other path for `'a`.
    pub unsafe fn attach_to_array_mut<'a>(ptr: *mut T, count: usize) -> &'a mut [Self] {
        if ptr.is_null() {
            assert_warn!(false, "attaching Matrix3x3 array to a null pointer");
            return &mut [];
        }
        // SAFETY: same layout as [T; 9], the rest is on the caller
        unsafe { core::slice::from_raw_parts_mut(ptr.cast::<Self>(), count) }
    }

    ///////////////////////////////////////////////////////////////////////////
    // access

    /// The 9 values in column-major order.
    pub fn as_array(&self) -> &[T; 9] {
        bytemuck::cast_ref(self)
    }

    pub fn as_array_mut(&mut self) -> &mut [T; 9] {
        bytemuck::cast_mut(self)
    }

    pub fn as_slice(&self) -> &[T] {
        self.as_array()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.as_array_mut()
    }

    pub fn as_ptr(&self) -> *const T {
        self.as_array().as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.as_array_mut().as_mut_ptr()
    }

    fn as_columns(&self) -> &[[T; 3]; 3] {
        bytemuck::cast_ref(self)
    }

    fn as_columns_mut(&mut self) -> &mut [[T; 3]; 3] {
        bytemuck::cast_mut(self)
    }

    /// Element at column-major index `i`.
    pub fn at(&self, i: usize) -> &T {
        self.as_array()
            .get(i)
            .unwrap_or_else(|| critical("Matrix3x3 index overflow"))
    }

    pub fn at_mut(&mut self, i: usize) -> &mut T {
        self.as_array_mut()
            .get_mut(i)
            .unwrap_or_else(|| critical("Matrix3x3 index overflow"))
    }

    /// Column `i`, borrowed from the matrix storage.
    pub fn column(&self, i: usize) -> &[T; 3] {
        self.as_columns()
            .get(i)
            .unwrap_or_else(|| critical("Matrix3x3 column index overflow"))
    }

    pub fn column_mut(&mut self, i: usize) -> &mut [T; 3] {
        self.as_columns_mut()
            .get_mut(i)
            .unwrap_or_else(|| critical("Matrix3x3 column index overflow"))
    }

    pub fn m(&self, row: usize, col: usize) -> T {
        self[(row, col)]
    }

    pub fn m_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self[(row, col)]
    }

    /// Column `col` viewed as a vector. Writes through
    /// [`Matrix3x3::column_vector_mut`] land in the matrix.
    pub fn column_vector(&self, col: usize) -> &Vector3<T> {
        Vector3::attach(self.column(col))
    }

    pub fn column_vector_mut(&mut self, col: usize) -> &mut Vector3<T> {
        Vector3::attach_mut(self.column_mut(col))
    }

    /// `D` consecutive values of column `col`, starting at row `offset`.
    pub fn column_part<const D: usize>(&self, col: usize, offset: usize) -> &[T; D] {
        self.column(col)
            .get(offset..)
            .and_then(|rest| rest.first_chunk::<D>())
            .unwrap_or_else(|| critical("Matrix3x3 column_part reaching end of column"))
    }

    pub fn column_part_mut<const D: usize>(&mut self, col: usize, offset: usize) -> &mut [T; D] {
        self.column_mut(col)
            .get_mut(offset..)
            .and_then(|rest| rest.first_chunk_mut::<D>())
            .unwrap_or_else(|| critical("Matrix3x3 column_part reaching end of column"))
    }

    /// Copy of row `row`. Rows are not contiguous so there is no view.
    pub fn row_vector(&self, row: usize) -> Vector3<T> {
        Vector3::new(self.m(row, 0), self.m(row, 1), self.m(row, 2))
    }

    /// Copy of `D` consecutive values of row `row`, starting at column `offset`.
    pub fn row_part<const D: usize>(&self, row: usize, offset: usize) -> [T; D] {
        assert_critical!(
            offset.checked_add(D).is_some_and(|end| end <= Self::COLUMNS_COUNT),
            "Matrix3x3 row_part reaching end of row"
        );
        core::array::from_fn(|i| self.m(row, offset + i))
    }

    pub fn main_diagonal(&self) -> Vector3<T> {
        Vector3::new(self.m00, self.m11, self.m22)
    }

    /// Copy of `D` consecutive diagonal values, starting at `(offset, offset)`.
    pub fn main_diagonal_part<const D: usize>(&self, offset: usize) -> [T; D] {
        assert_critical!(
            offset.checked_add(D).is_some_and(|end| end <= Self::ROWS_COUNT),
            "Matrix3x3 main_diagonal_part reaching end of diagonal"
        );
        core::array::from_fn(|i| self.m(offset + i, offset + i))
    }

    pub fn front(&self) -> &T {
        &self.m00
    }

    pub fn back(&self) -> &T {
        &self.m22
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_array().iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.as_array_mut().iter_mut()
    }

    ///////////////////////////////////////////////////////////////////////////
    // cast

    /// The same matrix with each element converted to `S`.
    pub fn cast<S: FloatingPoint>(&self) -> Matrix3x3<S> {
        Matrix3x3::from_array(self.as_array().map(|v| S::from_f64(v.to_f64())))
    }

    ///////////////////////////////////////////////////////////////////////////
    // arithmetic

    fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self::from_array(self.as_array().map(f))
    }

    fn zip_map(&self, b: &Self, f: impl Fn(T, T) -> T) -> Self {
        let (a, b) = (self.as_array(), b.as_array());
        Self::from_array(core::array::from_fn(|i| f(a[i], b[i])))
    }

    /// In-place element-wise multiplication.
    pub fn hadamard_mul(&mut self, b: &Self) -> &mut Self {
        *self = mul(self, b);
        self
    }

    /// In-place element-wise division.
    pub fn hadamard_div(&mut self, b: &Self) -> &mut Self {
        *self = div(self, b);
        self
    }

    pub fn transpose(&mut self) -> &mut Self {
        core::mem::swap(&mut self.m10, &mut self.m01);
        core::mem::swap(&mut self.m20, &mut self.m02);
        core::mem::swap(&mut self.m21, &mut self.m12);
        self
    }

    pub fn determinant(&self) -> T {
        -(self.m02 * self.m11 * self.m20) + self.m01 * self.m12 * self.m20 + self.m02 * self.m10 * self.m21
            - self.m00 * self.m12 * self.m21 - self.m01 * self.m10 * self.m22 + self.m00 * self.m11 * self.m22
    }

    fn adjugate(&self) -> Self {
        let Self { m00, m10, m20, m01, m11, m21, m02, m12, m22 } = *self;
        Self::columns(
            -m12 * m21 + m11 * m22,
            m12 * m20 - m10 * m22,
            -m11 * m20 + m10 * m21,
            m02 * m21 - m01 * m22,
            -m02 * m20 + m00 * m22,
            m01 * m20 - m00 * m21,
            -m02 * m11 + m01 * m12,
            m02 * m10 - m00 * m12,
            -m01 * m10 + m00 * m11,
        )
    }

    /// Invert in place and return the determinant that was divided by.
    ///
    /// There is no singularity check: a zero determinant leaves infinities
    /// or NaNs in the matrix. Callers check the returned value.
    pub fn inverse(&mut self) -> T {
        let (inverse, det) = inverse_with_determinant(self);
        *self = inverse;
        det
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }

    pub fn is_close(&self, other: &Self) -> bool {
        close(self, other)
    }

    pub fn is_close_eps(&self, other: &Self, epsilon: T) -> bool {
        close_eps(self, other, epsilon)
    }
}

///////////////////////////////////////////////////////////////////////////////
// free functions

/// Element-wise approximate equality with `T::EPSILON`.
pub fn close<T: FloatingPoint>(a: &Matrix3x3<T>, b: &Matrix3x3<T>) -> bool {
    close_eps(a, b, T::EPSILON)
}

/// Element-wise approximate equality with an explicit tolerance.
pub fn close_eps<T: FloatingPoint>(a: &Matrix3x3<T>, b: &Matrix3x3<T>, epsilon: T) -> bool {
    a.iter().zip(b.iter()).all(|(&x, &y)| x.close(y, epsilon))
}

pub fn abs<T: FloatingPoint>(a: &Matrix3x3<T>) -> Matrix3x3<T> {
    a.map(T::abs)
}

/// Element-wise (Hadamard) product.
pub fn mul<T: FloatingPoint>(a: &Matrix3x3<T>, b: &Matrix3x3<T>) -> Matrix3x3<T> {
    a.zip_map(b, |x, y| x * y)
}

/// Element-wise division.
pub fn div<T: FloatingPoint>(a: &Matrix3x3<T>, b: &Matrix3x3<T>) -> Matrix3x3<T> {
    a.zip_map(b, |x, y| x / y)
}

/// True iff no element is infinite or NaN.
pub fn is_finite<T: FloatingPoint>(a: &Matrix3x3<T>) -> bool {
    a.is_finite()
}

pub fn transpose<T: FloatingPoint>(a: &Matrix3x3<T>) -> Matrix3x3<T> {
    let mut t = *a;
    t.transpose();
    t
}

pub fn determinant<T: FloatingPoint>(a: &Matrix3x3<T>) -> T {
    a.determinant()
}

/// Inverse of `a` along with the determinant that was divided by.
///
/// The determinant is not checked; see [`Matrix3x3::inverse`].
pub fn inverse_with_determinant<T: FloatingPoint>(a: &Matrix3x3<T>) -> (Matrix3x3<T>, T) {
    let det = a.determinant();
    (a.adjugate().map(|v| v / det), det)
}

pub fn inverse<T: FloatingPoint>(a: &Matrix3x3<T>) -> Matrix3x3<T> {
    inverse_with_determinant(a).0
}

///////////////////////////////////////////////////////////////////////////////
// traits

impl<T: FloatingPoint> YamaType for Matrix3x3<T> {
    type Scalar = T;
    const VALUE_COUNT: usize = 9;
}

impl<T: FloatingPoint> MatrixType for Matrix3x3<T> {
    const ROWS: usize = 3;
    const COLUMNS: usize = 3;
}

impl<T: FloatingPoint> From<[T; 9]> for Matrix3x3<T> {
    fn from(values: [T; 9]) -> Self {
        Self::from_array(values)
    }
}

impl<T: FloatingPoint> From<Matrix3x3<T>> for [T; 9] {
    fn from(m: Matrix3x3<T>) -> Self {
        *m.as_array()
    }
}

impl<T: FloatingPoint> Index<usize> for Matrix3x3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        self.at(i)
    }
}

impl<T: FloatingPoint> IndexMut<usize> for Matrix3x3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        self.at_mut(i)
    }
}

impl<T: FloatingPoint> Index<(usize, usize)> for Matrix3x3<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.column(col)
            .get(row)
            .unwrap_or_else(|| critical("Matrix3x3 row index overflow"))
    }
}

impl<T: FloatingPoint> IndexMut<(usize, usize)> for Matrix3x3<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        self.column_mut(col)
            .get_mut(row)
            .unwrap_or_else(|| critical("Matrix3x3 row index overflow"))
    }
}

impl<'a, T: FloatingPoint> IntoIterator for &'a Matrix3x3<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: FloatingPoint> IntoIterator for &'a mut Matrix3x3<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: FloatingPoint> IntoIterator for Matrix3x3<T> {
    type Item = T;
    type IntoIter = core::array::IntoIter<T, 9>;

    fn into_iter(self) -> Self::IntoIter {
        <[T; 9]>::from(self).into_iter()
    }
}

// Serialized as the 9 column-major values.
impl<T> Serialize for Matrix3x3<T>
where
    T: FloatingPoint + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_array().serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Matrix3x3<T>
where
    T: FloatingPoint + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = <[T; 9]>::deserialize(deserializer)?;
        Ok(Matrix3x3::from_array(values))
    }
}

///////////////////////////////////////////////////////////////////////////////
// operators

impl<T: FloatingPoint> Neg for Matrix3x3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl<T: FloatingPoint> Add for Matrix3x3<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_map(&other, |a, b| a + b)
    }
}

impl<T: FloatingPoint> Sub for Matrix3x3<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_map(&other, |a, b| a - b)
    }
}

impl<T: FloatingPoint> AddAssign for Matrix3x3<T> {
    fn add_assign(&mut self, other: Self) {
        for (a, b) in self.iter_mut().zip(other) {
            *a += b;
        }
    }
}

impl<T: FloatingPoint> SubAssign for Matrix3x3<T> {
    fn sub_assign(&mut self, other: Self) {
        for (a, b) in self.iter_mut().zip(other) {
            *a -= b;
        }
    }
}

impl<T: FloatingPoint> Mul<T> for Matrix3x3<T> {
    type Output = Self;

    fn mul(self, scalar: T) -> Self {
        self.map(|v| v * scalar)
    }
}

impl<T: FloatingPoint> Div<T> for Matrix3x3<T> {
    type Output = Self;

    fn div(self, scalar: T) -> Self {
        self.map(|v| v / scalar)
    }
}

impl<T: FloatingPoint> MulAssign<T> for Matrix3x3<T> {
    fn mul_assign(&mut self, scalar: T) {
        for v in self.iter_mut() {
            *v *= scalar;
        }
    }
}

impl<T: FloatingPoint> DivAssign<T> for Matrix3x3<T> {
    fn div_assign(&mut self, scalar: T) {
        assert_warn!(scalar != T::zero(), "Matrix3x3 division by zero");
        for v in self.iter_mut() {
            *v /= scalar;
        }
    }
}

// scalar * matrix and scalar / matrix, element-wise
macro_rules! impl_scalar_lhs {
    ($($t:ty),*) => {$(
        impl Mul<Matrix3x3<$t>> for $t {
            type Output = Matrix3x3<$t>;

            fn mul(self, m: Matrix3x3<$t>) -> Matrix3x3<$t> {
                m.map(|v| self * v)
            }
        }

        impl Div<Matrix3x3<$t>> for $t {
            type Output = Matrix3x3<$t>;

            fn div(self, m: Matrix3x3<$t>) -> Matrix3x3<$t> {
                m.map(|v| self / v)
            }
        }
    )*};
}

impl_scalar_lhs!(f32, f64);

impl<T: FloatingPoint> Mul for Matrix3x3<T> {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::columns(
            a.m00 * b.m00 + a.m01 * b.m10 + a.m02 * b.m20,
            a.m10 * b.m00 + a.m11 * b.m10 + a.m12 * b.m20,
            a.m20 * b.m00 + a.m21 * b.m10 + a.m22 * b.m20,
            a.m00 * b.m01 + a.m01 * b.m11 + a.m02 * b.m21,
            a.m10 * b.m01 + a.m11 * b.m11 + a.m12 * b.m21,
            a.m20 * b.m01 + a.m21 * b.m11 + a.m22 * b.m21,
            a.m00 * b.m02 + a.m01 * b.m12 + a.m02 * b.m22,
            a.m10 * b.m02 + a.m11 * b.m12 + a.m12 * b.m22,
            a.m20 * b.m02 + a.m21 * b.m12 + a.m22 * b.m22,
        )
    }
}

impl<T: FloatingPoint> MulAssign for Matrix3x3<T> {
    fn mul_assign(&mut self, b: Self) {
        // self is both operand and destination
        let product = *self * b;
        *self = product;
    }
}

impl<T: FloatingPoint> Mul<Vector3<T>> for Matrix3x3<T> {
    type Output = Vector3<T>;

    fn mul(self, v: Vector3<T>) -> Vector3<T> {
        Vector3 {
            x: self.m00 * v.x + self.m01 * v.y + self.m02 * v.z,
            y: self.m10 * v.x + self.m11 * v.y + self.m12 * v.z,
            z: self.m20 * v.x + self.m21 * v.y + self.m22 * v.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn sample() -> Matrix3x3<f64> {
        Matrix3x3::rows(
            1.0, 2.0, 3.0,
            0.0, 1.0, 4.0,
            5.0, 6.0, 0.0,
        )
    }

    #[test]
    fn test_layout_matches_flat_array() {
        assert_eq!(core::mem::size_of::<Matrix3x3<f32>>(), 9 * core::mem::size_of::<f32>());
        assert_eq!(core::mem::size_of::<Matrix3x3<f64>>(), 9 * core::mem::size_of::<f64>());
        assert_eq!(core::mem::align_of::<Matrix3x3<f32>>(), core::mem::align_of::<f32>());

        let m = Matrix3x3::columns(0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0);
        assert_eq!(m.as_array(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(m.column(1), &[3.0, 4.0, 5.0]);
        assert_eq!(m.m(2, 1), 5.0);
    }

    #[test]
    fn test_matrix_constructors_and_accessors() {
        let m = Matrix3x3::rows(
            1.0f32, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );

        assert_eq!(m.m(0, 1), 2.0);
        assert_eq!(m.m(1, 0), 4.0);
        assert_eq!(m.row_vector(0), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(*m.column_vector(1), Vector3::new(2.0, 5.0, 8.0));
        assert_eq!(m.main_diagonal(), Vector3::new(1.0, 5.0, 9.0));
        assert_eq!(m[3], 2.0);
        assert_eq!(m[(2, 0)], 7.0);
        assert_eq!(*m.front(), 1.0);
        assert_eq!(*m.back(), 9.0);
    }

    #[test]
    fn test_matrix_zero_uniform_identity() {
        assert!(Matrix3x3::<f32>::zero().iter().all(|&v| v == 0.0));
        assert!(Matrix3x3::<f32>::uniform(2.5).iter().all(|&v| v == 2.5));

        let id = Matrix3x3::<f32>::identity();
        assert_eq!(id, Matrix3x3::columns(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        assert_eq!(id.determinant(), 1.0);
        assert_eq!(Matrix3x3::<f32>::zero().determinant(), 0.0);
    }

    #[test]
    fn test_from_slice() {
        let values = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let m = Matrix3x3::from_slice(&values).unwrap();
        assert_eq!(m.as_slice(), &values);

        let err = Matrix3x3::from_slice(&values[..4]).unwrap_err();
        assert_eq!(err, Error::BufferSize { expected: 9, actual: 4 });
    }

    #[test]
    fn test_column_part_and_row_part() {
        let mut m = sample();
        assert_eq!(m.column_part::<2>(0, 1), &[0.0, 5.0]);
        assert_eq!(m.column_part::<3>(2, 0), &[3.0, 4.0, 0.0]);
        assert_eq!(m.row_part::<2>(2, 1), [6.0, 0.0]);
        assert_eq!(m.main_diagonal_part::<2>(1), [1.0, 0.0]);

        *m.column_part_mut::<1>(1, 2) = [-6.0];
        assert_eq!(m.m(2, 1), -6.0);
    }

    #[test]
    #[should_panic(expected = "column_part reaching end of column")]
    fn test_column_part_overflow_panics() {
        let m = sample();
        let _ = m.column_part::<2>(0, 2);
    }

    #[test]
    #[should_panic(expected = "row_part reaching end of row")]
    fn test_row_part_huge_offset_panics() {
        let m = sample();
        let _ = m.row_part::<2>(0, usize::MAX);
    }

    #[test]
    #[should_panic(expected = "main_diagonal_part reaching end of diagonal")]
    fn test_main_diagonal_part_huge_offset_panics() {
        let m = sample();
        let _ = m.main_diagonal_part::<1>(usize::MAX);
    }

    #[test]
    #[should_panic(expected = "Matrix3x3 index overflow")]
    fn test_index_overflow_panics() {
        let m = sample();
        let _ = m[9];
    }

    #[test]
    #[should_panic(expected = "Matrix3x3 column index overflow")]
    fn test_column_overflow_panics() {
        let m = sample();
        let _ = m.column(3);
    }

    #[test]
    #[should_panic(expected = "Matrix3x3 row index overflow")]
    fn test_row_overflow_panics() {
        let m = sample();
        let _ = m.m(3, 0);
    }

    #[test]
    fn test_column_vector_mut_writes_through() {
        let mut m = Matrix3x3::<f32>::identity();
        {
            let c = m.column_vector_mut(2);
            c.x = 4.0;
            *c += Vector3::new(0.0, 1.0, 0.0);
        }
        assert_eq!(m.m(0, 2), 4.0);
        assert_eq!(m.m(1, 2), 1.0);
        assert_eq!(m.m22, 1.0);

        m.column_mut(0)[1] = 8.0;
        assert_eq!(m.m10, 8.0);
    }

    #[test]
    fn test_attach_views() {
        let mut raw = [1.0f64, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(*Matrix3x3::attach(&raw), Matrix3x3::identity());

        Matrix3x3::attach_mut(&mut raw).m01 = 3.0;
        assert_eq!(raw[3], 3.0);
    }

    #[test]
    fn test_attach_slice() {
        let mut raw = [0.0f32; 18];
        raw[9] = 1.0;
        let all = Matrix3x3::attach_slice(&raw).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].m00, 1.0);

        let all = Matrix3x3::attach_slice_mut(&mut raw).unwrap();
        all[0] = Matrix3x3::identity();
        assert_eq!(raw[4], 1.0);

        let err = Matrix3x3::attach_slice(&raw[..10]).unwrap_err();
        assert_eq!(err, Error::BufferStride { len: 10, stride: 9 });

        assert!(Matrix3x3::<f32>::attach_slice(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_attach_to_pointers() {
        let mut raw = [2.0f32; 9];
        let m = unsafe { Matrix3x3::attach_to_ptr(raw.as_ptr()) };
        assert_eq!(*m, Matrix3x3::uniform(2.0));

        let m = unsafe { Matrix3x3::attach_to_ptr_mut(raw.as_mut_ptr()) };
        m.m11 = 5.0;
        assert_eq!(raw[4], 5.0);

        let none = unsafe { Matrix3x3::<f32>::attach_to_array(core::ptr::null(), 3) };
        assert!(none.is_empty());
        let one = unsafe { Matrix3x3::attach_to_array(raw.as_ptr(), 1) };
        assert_eq!(one[0].m11, 5.0);
    }

    #[test]
    #[should_panic(expected = "null pointer")]
    fn test_from_null_ptr_panics() {
        let _ = unsafe { Matrix3x3::<f32>::from_ptr(core::ptr::null()) };
    }

    #[test]
    fn test_matrix_add_sub_mul() {
        let a = Matrix3x3::rows(1.0, 2.0, 3.0,
                                4.0, 5.0, 6.0,
                                7.0, 8.0, 9.0);
        let b = Matrix3x3::rows(9.0, 8.0, 7.0,
                                6.0, 5.0, 4.0,
                                3.0, 2.0, 1.0);

        let sum = a + b;
        assert_eq!(sum.row_vector(0), Vector3::new(10.0, 10.0, 10.0));

        let diff = a - b;
        assert_eq!(diff.row_vector(2), Vector3::new(4.0, 6.0, 8.0));

        let scaled = a * 2.0;
        assert_eq!(scaled.row_vector(1), Vector3::new(8.0, 10.0, 12.0));
        assert_eq!(2.0f64 * a, scaled);
        assert_eq!(scaled / 2.0, a);

        let mut c = a;
        c += b;
        assert_eq!(c, sum);
        c -= b;
        assert_eq!(c, a);
        c *= 2.0;
        assert_eq!(c, scaled);
        c /= 2.0;
        assert_eq!(c, a);

        assert_eq!(-a + a, Matrix3x3::zero());
    }

    #[test]
    fn test_scalar_divided_by_matrix() {
        let m = Matrix3x3::uniform(4.0f32);
        assert_eq!(2.0f32 / m, Matrix3x3::uniform(0.5));
    }

    #[test]
    fn test_matrix_vector_mul() {
        let m = Matrix3x3::rows(
            1.0f32, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );

        let v = Vector3::new(1.0f32, 1.0f32, 1.0f32);
        let result = m * v;

        // Row sums: [6, 15, 24]
        assert_eq!(result, Vector3::new(6.0, 15.0, 24.0));
    }

    #[test]
    fn test_matrix_matrix_mul() {
        let a = Matrix3x3::rows(
            1.0f32, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );

        let b = Matrix3x3::rows(
            9.0f32, 8.0, 7.0,
            6.0, 5.0, 4.0,
            3.0, 2.0, 1.0,
        );

        let c = a * b;

        assert_eq!(c.row_vector(0), Vector3::new(30.0, 24.0, 18.0));
        assert_eq!(c.row_vector(1), Vector3::new(84.0, 69.0, 54.0));
        assert_eq!(c.row_vector(2), Vector3::new(138.0, 114.0, 90.0));

        let mut d = a;
        d *= b;
        assert_eq!(d, c);

        // self-multiplication goes through temporaries
        let mut e = a;
        e *= e;
        assert_eq!(e, a * a);
    }

    #[test]
    fn test_hadamard() {
        let a = Matrix3x3::uniform(6.0f64);
        let b = Matrix3x3::rows(1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0);

        let p = mul(&a, &b);
        assert_eq!(p.row_vector(0), Vector3::new(6.0, 12.0, 18.0));
        assert_eq!(div(&p, &b), a);

        let mut c = a;
        c.hadamard_mul(&b).hadamard_div(&b);
        assert_eq!(c, a);
    }

    #[test]
    fn test_transpose() {
        let a = sample();
        let mut t = a;
        t.transpose();
        assert_eq!(t.row_vector(0), a.column_vector(0).to_owned());
        assert_eq!(t.main_diagonal(), a.main_diagonal());
        assert_eq!(transpose(&t), a);
    }

    #[test]
    fn test_determinant_and_inverse() {
        let a = sample();
        assert_eq!(a.determinant(), 1.0);

        let expected = Matrix3x3::rows(
            -24.0, 18.0, 5.0,
            20.0, -15.0, -4.0,
            -5.0, 4.0, 1.0,
        );
        assert!(close(&inverse(&a), &expected));

        let mut b = a;
        let det = b.inverse();
        assert_eq!(det, 1.0);
        assert!(close(&b, &expected));
        assert!(close(&(a * b), &Matrix3x3::identity()));
    }

    #[test]
    fn test_singular_inverse_reports_determinant() {
        // row 3 = row 1 + row 2
        let singular = Matrix3x3::rows(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 5.0, 7.0, 9.0);
        let (inv, det) = inverse_with_determinant(&singular);
        assert_eq!(det, 0.0);
        assert!(!inv.is_finite());
    }

    #[test]
    fn test_elementary_rotations() {
        let v = Matrix3x3::rotation_z(FRAC_PI_2) * Vector3::unit_x();
        assert!(vector::close(&v, &Vector3::unit_y()));

        let v = Matrix3x3::rotation_x(FRAC_PI_2) * Vector3::unit_y();
        assert!(vector::close(&v, &Vector3::unit_z()));

        let v = Matrix3x3::rotation_y(FRAC_PI_2) * Vector3::unit_z();
        assert!(vector::close(&v, &Vector3::unit_x()));

        assert!(close(&Matrix3x3::rotation_x(PI), &Matrix3x3::scaling(1.0, -1.0, -1.0)));
    }

    #[test]
    fn test_rotation_axis_normalizes() {
        let axis = Vector3::new(0.0f64, 0.0, 5.0);
        let r = Matrix3x3::rotation_axis(&axis, 0.3);
        assert!(close(&r, &Matrix3x3::rotation_z(0.3)));
    }

    #[test]
    fn test_rotation_vectors() {
        let src = Vector3::new(1.0f64, 2.0, 2.0).normalize();
        let target = Vector3::new(0.0, -3.0, 4.0).normalize();
        let r = Matrix3x3::rotation_vectors(&src, &target);
        assert!(vector::close(&(r * src), &target));
        assert!(r.determinant().close(1.0, 1e-9));
    }

    #[test]
    fn test_rotation_vectors_nearly_parallel_f32() {
        for k in 0..100 {
            let y = 0.3 + k as f32 * 0.01;
            let src = Vector3::new(1.0f32, y, -0.7).normalize();
            for j in 1..=40 {
                let target = Vector3::new(1.0f32, y + j as f32 * 1e-6, -0.7).normalize();
                let r = Matrix3x3::rotation_vectors(&src, &target);
                assert!(r.is_finite(), "src {:?} target {:?}", src, target);
                assert!(vector::close_eps(&(r * src), &target, 1e-4));
            }
        }
    }

    #[test]
    fn test_rotation_quaternion() {
        let axis = Vector3::new(1.0f64, -1.0, 0.5).normalize();
        let q = Quaternion::rotation_axis(&axis, 1.2);
        let from_q = Matrix3x3::rotation_quaternion(&q);
        let from_axis = Matrix3x3::rotation_naxis(&axis, 1.2);
        assert!(close(&from_q, &from_axis));

        assert_eq!(Matrix3x3::rotation_quaternion(&Quaternion::<f32>::identity()), Matrix3x3::identity());
    }

    #[test]
    fn test_scaling() {
        let s = Matrix3x3::scaling_vector(&Vector3::new(2.0f32, 3.0, 4.0));
        assert_eq!(s.main_diagonal(), Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(s.determinant(), 24.0);
        assert_eq!(Matrix3x3::scaling_uniform(2.0f32), Matrix3x3::scaling(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_abs_and_finite() {
        let m = -Matrix3x3::uniform(1.5f32);
        assert_eq!(abs(&m), Matrix3x3::uniform(1.5));
        assert!(is_finite(&m));

        let mut m = Matrix3x3::<f32>::identity();
        m[5] = f32::NAN;
        assert!(!is_finite(&m));
        m[5] = f32::NEG_INFINITY;
        assert!(!m.is_finite());
    }

    #[test]
    fn test_close_with_tolerance() {
        let a = Matrix3x3::<f64>::identity();
        let mut b = a;
        b.m21 = 0.01;
        assert!(!close(&a, &b));
        assert!(close_eps(&a, &b, 0.05));
        assert!(a.is_close_eps(&b, 0.01));
        assert!(!a.is_close(&b));
    }

    #[test]
    fn test_cast() {
        let m = Matrix3x3::rows(1.5f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.25);
        let d: Matrix3x3<f64> = m.cast();
        assert_eq!(d.m00, 1.5);
        assert_eq!(d.m22, 9.25);
        assert_eq!(d.cast::<f32>(), m);
    }

    #[test]
    fn test_iteration() {
        let mut m = Matrix3x3::<f32>::identity();
        for v in &mut m {
            *v += 1.0;
        }
        assert_eq!(m.iter().copied().sum::<f32>(), 12.0);
        let collected: Vec<f32> = m.into_iter().collect();
        assert_eq!(collected.len(), 9);
        assert_eq!(collected[4], 2.0);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let m = Matrix3x3::rows(
            1.0f32, 2.0f32, 3.0f32,
            4.0f32, 5.0f32, 6.0f32,
            7.0f32, 8.0f32, 9.0f32,
        );

        let config = bincode::config::standard();
        let encoded = bincode::serde::encode_to_vec(m, config).unwrap();
        let (decoded, _): (Matrix3x3<f32>, usize) = bincode::serde::decode_from_slice(&encoded, config).unwrap();

        assert_eq!(m, decoded);
    }
}
