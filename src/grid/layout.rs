//! Fixed grid geometry: coordinate conversion and chunk addressing.

use crate::core::{ChunkKey, Point3, VoxelCoord};
use crate::grid::config::GridConfig;

/// Voxels per chunk edge.
pub const CHUNK_SIZE: i32 = 16;

/// Voxels per chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Largest chunk table a grid may need (2^20 chunks, 2^32 voxels).
pub const MAX_CHUNKS: usize = 1 << 20;

/// Geometry of the voxel grid.
///
/// The grid uses a coordinate system where:
/// - Voxel (0, 0, 0) has its minimum corner at `origin`
/// - Voxel (x, y, z) covers `origin + [x, x+1) * voxel_size` on each axis
/// - Only `[0, dimensions)` on every axis is addressable
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    voxel_size: f32,
    /// Pre-computed 1.0 / voxel_size for faster world-to-voxel conversion.
    inv_voxel_size: f32,
    origin: Point3,
    dimensions: [i32; 3],
    chunk_dimensions: [i32; 3],
}

impl GridLayout {
    /// Build from a (validated) grid configuration.
    pub fn new(config: &GridConfig) -> Self {
        let dimensions = config.dimensions.map(|d| d as i32);
        let chunk_dimensions = dimensions.map(|d| (d + CHUNK_SIZE - 1) / CHUNK_SIZE);
        Self {
            voxel_size: config.voxel_size,
            inv_voxel_size: 1.0 / config.voxel_size,
            origin: config.origin,
            dimensions,
            chunk_dimensions,
        }
    }

    /// Voxel edge length in meters.
    #[inline]
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// World coordinates of the minimum corner of the grid.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Grid size in voxels.
    #[inline]
    pub fn dimensions(&self) -> [i32; 3] {
        self.dimensions
    }

    /// Grid size in chunks.
    #[inline]
    pub fn chunk_dimensions(&self) -> [i32; 3] {
        self.chunk_dimensions
    }

    /// Number of chunks.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunk_dimensions.iter().map(|&d| d as usize).product()
    }

    /// Number of addressable voxels.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.dimensions.iter().map(|&d| d as usize).product()
    }

    /// World bounds: (min_point, max_point).
    pub fn bounds(&self) -> (Point3, Point3) {
        let max = Point3::new(
            self.origin.x + self.dimensions[0] as f32 * self.voxel_size,
            self.origin.y + self.dimensions[1] as f32 * self.voxel_size,
            self.origin.z + self.dimensions[2] as f32 * self.voxel_size,
        );
        (self.origin, max)
    }

    // === Coordinate Conversion ===

    /// Convert world coordinates to a voxel index (may be out of range).
    #[inline]
    pub fn world_to_voxel(&self, point: Point3) -> VoxelCoord {
        VoxelCoord::new(
            ((point.x - self.origin.x) * self.inv_voxel_size).floor() as i32,
            ((point.y - self.origin.y) * self.inv_voxel_size).floor() as i32,
            ((point.z - self.origin.z) * self.inv_voxel_size).floor() as i32,
        )
    }

    /// Convert a voxel index to world coordinates (voxel center).
    #[inline]
    pub fn voxel_center(&self, coord: VoxelCoord) -> Point3 {
        Point3::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.voxel_size,
            self.origin.y + (coord.y as f32 + 0.5) * self.voxel_size,
            self.origin.z + (coord.z as f32 + 0.5) * self.voxel_size,
        )
    }

    /// Check if a voxel index is addressable.
    #[inline]
    pub fn contains_voxel(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && coord.x < self.dimensions[0]
            && coord.y < self.dimensions[1]
            && coord.z < self.dimensions[2]
    }

    /// Check if a world point falls inside an addressable voxel.
    #[inline]
    pub fn contains_point(&self, point: Point3) -> bool {
        point.is_finite() && self.contains_voxel(self.world_to_voxel(point))
    }

    // === Chunk Addressing ===

    /// Chunk containing a voxel.
    #[inline]
    pub fn chunk_of(&self, coord: VoxelCoord) -> ChunkKey {
        ChunkKey::new(
            coord.x.div_euclid(CHUNK_SIZE),
            coord.y.div_euclid(CHUNK_SIZE),
            coord.z.div_euclid(CHUNK_SIZE),
        )
    }

    /// Flat index of a chunk, if it exists.
    #[inline]
    pub fn chunk_index(&self, key: ChunkKey) -> Option<usize> {
        let [cx, cy, cz] = self.chunk_dimensions;
        if key.x < 0 || key.y < 0 || key.z < 0 || key.x >= cx || key.y >= cy || key.z >= cz {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        Some((key.z as usize * cy + key.y as usize) * cx + key.x as usize)
    }

    /// Chunk key of a flat chunk index.
    #[inline]
    pub fn chunk_key(&self, index: usize) -> ChunkKey {
        let [cx, cy, _] = self.chunk_dimensions.map(|d| d as usize);
        ChunkKey::new(
            (index % cx) as i32,
            ((index / cx) % cy) as i32,
            (index / (cx * cy)) as i32,
        )
    }

    /// (chunk index, offset within chunk) for an addressable voxel.
    #[inline]
    pub fn locate(&self, coord: VoxelCoord) -> Option<(usize, usize)> {
        if !self.contains_voxel(coord) {
            return None;
        }
        let chunk = self.chunk_index(self.chunk_of(coord))?;
        let lx = coord.x.rem_euclid(CHUNK_SIZE);
        let ly = coord.y.rem_euclid(CHUNK_SIZE);
        let lz = coord.z.rem_euclid(CHUNK_SIZE);
        let offset = ((lz * CHUNK_SIZE + ly) * CHUNK_SIZE + lx) as usize;
        Some((chunk, offset))
    }

    /// Voxel index from chunk key and in-chunk offset.
    #[inline]
    pub fn voxel_of(&self, key: ChunkKey, offset: usize) -> VoxelCoord {
        let o = offset as i32;
        VoxelCoord::new(
            key.x * CHUNK_SIZE + o % CHUNK_SIZE,
            key.y * CHUNK_SIZE + (o / CHUNK_SIZE) % CHUNK_SIZE,
            key.z * CHUNK_SIZE + o / (CHUNK_SIZE * CHUNK_SIZE),
        )
    }
}
