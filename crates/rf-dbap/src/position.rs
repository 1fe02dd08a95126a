//! 3D position type and quaternion spin

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::{Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// 3D position in space
///
/// Layout generation treats Y as the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    /// X coordinate (left/right)
    pub x: f32,
    /// Y coordinate (down/up)
    pub y: f32,
    /// Z coordinate (front/back)
    pub z: f32,
}

impl Position3D {
    /// Create new position
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Origin position
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Squared magnitude
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Get magnitude (distance from origin)
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize to unit vector
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag < 1e-10 {
            return Self::origin();
        }
        Self::new(self.x / mag, self.y / mag, self.z / mag)
    }

    /// Linear interpolation
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }

    /// Squared distance to another point
    #[inline]
    pub fn distance_squared_to(&self, other: &Self) -> f32 {
        (*other - *self).magnitude_squared()
    }

    /// Distance to another point
    pub fn distance_to(&self, other: &Self) -> f32 {
        self.distance_squared_to(other).sqrt()
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// True when every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rotate by a unit quaternion (`q v q⁻¹`)
    pub fn spin(&self, q: &UnitQuaternion<f32>) -> Self {
        q.transform_vector(&Vector3::from(*self)).into()
    }
}

/// Build the rotation of `angle` radians about `axis`
///
/// A zero-length axis yields the identity rotation.
pub fn axis_angle(angle: f32, axis: Position3D) -> UnitQuaternion<f32> {
    match Unit::try_new(Vector3::from(axis), 1e-10) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
        None => UnitQuaternion::identity(),
    }
}

impl Default for Position3D {
    fn default() -> Self {
        Self::origin()
    }
}

impl Add for Position3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Position3D {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Position3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<Position3D> for Vector3<f32> {
    fn from(pos: Position3D) -> Self {
        Vector3::new(pos.x, pos.y, pos.z)
    }
}

impl From<Vector3<f32>> for Position3D {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Position3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}
