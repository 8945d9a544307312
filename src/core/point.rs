//! Point and index types.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point (or vector) in 3D space, in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
}

impl Point3 {
    /// The origin
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new point
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from an `[x, y, z]` array
    #[inline]
    pub fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Point3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[inline]
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length
    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Distance to another point
    #[inline]
    pub fn distance(&self, other: &Point3) -> f32 {
        (*other - *self).length()
    }

    /// Unit vector in the same direction, or `None` for (near) zero vectors
    pub fn normalized(&self) -> Option<Point3> {
        let len = self.length();
        if len.is_finite() && len > 1e-6 {
            Some(*self * (1.0 / len))
        } else {
            None
        }
    }

    /// All components are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3 {
    type Output = Point3;

    #[inline]
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    #[inline]
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Point3;

    #[inline]
    fn mul(self, rhs: f32) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Integer voxel index in the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoord {
    /// X index
    pub x: i32,
    /// Y index
    pub y: i32,
    /// Z index
    pub z: i32,
}

impl VoxelCoord {
    /// Create a new voxel coordinate
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component by axis (0 = x, 1 = y, 2 = z)
    #[inline]
    pub fn axis(&self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Mutable component by axis
    #[inline]
    pub fn axis_mut(&mut self, axis: usize) -> &mut i32 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    /// Manhattan distance to another voxel
    #[inline]
    pub fn manhattan(&self, other: &VoxelCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

/// Index of a chunk of voxels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// X chunk index
    pub x: i32,
    /// Y chunk index
    pub y: i32,
    /// Z chunk index
    pub z: i32,
}

impl ChunkKey {
    /// Create a new chunk key
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}
