use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{HfError, HfResult};

/// A point (or displacement) on the ground plane.
///
/// The world is flat: every entity stands at ground level, so only the `x`
/// and `z` axes are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Position {
    /// The world origin, also used as the zero displacement.
    pub const ORIGIN: Self = Self { x: 0.0, z: 0.0 };

    /// Create a position from its two coordinates.
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Return the position unchanged if both coordinates are finite.
    pub fn validated(self) -> HfResult<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(HfError::InvalidPosition {
                x: self.x,
                z: self.z,
            })
        }
    }

    /// Return `true` if neither coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    /// Squared Euclidean distance. Prefer this for comparisons.
    pub fn distance_sq(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Euclidean distance.
    pub fn distance(&self, other: Position) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Return `true` if `other` lies strictly closer than `radius`.
    pub fn within(&self, other: Position, radius: f64) -> bool {
        self.distance_sq(other) < radius * radius
    }

    /// Length of this position read as a displacement.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 1e-9 {
            Self::new(self.x / len, self.z / len)
        } else {
            Self::ORIGIN
        }
    }

    /// Rescale to at most `max` length.
    pub fn clamp_length(&self, max: f64) -> Self {
        let len = self.length();
        if len > max && len > 0.0 {
            *self * (max / len)
        } else {
            *self
        }
    }

    /// Clamp both coordinates into the square `[-limit, limit]`.
    pub fn clamped(&self, limit: f64) -> Self {
        Self::new(self.x.clamp(-limit, limit), self.z.clamp(-limit, limit))
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.z += rhs.z;
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for Position {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.z)
    }
}
