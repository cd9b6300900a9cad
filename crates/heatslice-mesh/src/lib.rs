#![warn(missing_docs)]

//! Triangle meshes and plane cutting for heatslice.
//!
//! This crate is the mesh-provider side of a plane section: it owns the
//! triangle buffer format, axis-aligned bounds, and the primitive that cuts
//! a triangulated surface with a plane into raw polylines.
//!
//! # Example
//!
//! ```ignore
//! use heatslice_math::{Point3, Vec3};
//! use heatslice_mesh::{uv_sphere, SurfaceMesh};
//!
//! let sphere = uv_sphere(Point3::origin(), 1.0, 32, 17);
//! let cut = sphere.intersect(&Point3::origin(), &Vec3::z())?;
//! println!("{} polylines", cut.len());
//! ```

pub mod cut;
pub mod error;
pub mod polyline;
pub mod primitives;

pub use cut::cut_triangle;
pub use error::{MeshError, Result};
pub use polyline::PolylineSet;
pub use primitives::{cuboid, uv_sphere};

use heatslice_math::{Point3, Vec3};

/// Something that can be cut by a plane.
///
/// Implementations must be safe to read from several threads at once; the
/// slicer may cut many meshes in parallel against the same plane.
pub trait SurfaceMesh: Send + Sync {
    /// Axis-aligned bounds, or `None` when the mesh has no geometry.
    fn bounds(&self) -> Option<Aabb>;

    /// Intersect the surface with the plane through `origin` with `normal`.
    ///
    /// A plane that misses the surface yields an empty set, not an error.
    fn intersect(&self, origin: &Point3, normal: &Vec3) -> Result<PolylineSet>;

    /// Number of triangles, used to enforce size caps.
    fn triangle_count(&self) -> usize;
}

/// Output triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). May be empty.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Position of vertex `i` in f64.
    ///
    /// Panics if `i` is out of range; see [`TriangleMesh::validate`].
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[i * 3] as f64,
            self.vertices[i * 3 + 1] as f64,
            self.vertices[i * 3 + 2] as f64,
        )
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, p: Point3) -> u32 {
        let index = self.num_vertices() as u32;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        index
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Check that the mesh can be cut: non-empty, indices in range, finite
    /// coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.num_triangles() == 0 {
            return Err(MeshError::Empty);
        }
        let vertices = self.num_vertices();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(MeshError::IndexOutOfBounds { index, vertices });
        }
        if let Some(pos) = self.vertices.iter().position(|c| !c.is_finite()) {
            return Err(MeshError::NonFinite { vertex: pos / 3 });
        }
        Ok(())
    }

    /// Compute the axis-aligned bounds of the vertex buffer.
    pub fn aabb(&self) -> Option<Aabb> {
        if self.num_vertices() == 0 {
            return None;
        }
        let mut aabb = Aabb::empty();
        for i in 0..self.num_vertices() {
            aabb.include(&self.vertex(i));
        }
        Some(aabb)
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Create a box from two corners, in any order.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// An inverted box that any included point replaces.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True once at least one point has been included.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    /// Bounds as `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn to_bounds(&self) -> [f64; 6] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }

    /// Inverse of [`Aabb::to_bounds`].
    pub fn from_bounds(b: [f64; 6]) -> Self {
        Self::new(Point3::new(b[0], b[2], b[4]), Point3::new(b[1], b[3], b[5]))
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_extent(&self) -> f64 {
        self.extent().max()
    }

    /// Centre of the box.
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, b.z),
            Point3::new(a.x, b.y, b.z),
        ]
    }

    /// Whether the plane through `origin` with `normal` touches the box.
    ///
    /// Corners within `tol` of the plane count as touching.
    pub fn straddles(&self, origin: &Point3, normal: &Vec3, tol: f64) -> bool {
        let mut below = false;
        let mut above = false;
        for c in self.corners() {
            let d = normal.dot(&(c - origin));
            if d.abs() <= tol {
                return true;
            }
            below |= d < 0.0;
            above |= d > 0.0;
        }
        below && above
    }
}

impl SurfaceMesh for TriangleMesh {
    fn bounds(&self) -> Option<Aabb> {
        self.aabb()
    }

    fn intersect(&self, origin: &Point3, normal: &Vec3) -> Result<PolylineSet> {
        cut::intersect_mesh_with_plane(self, origin, normal)
    }

    fn triangle_count(&self) -> usize {
        self.num_triangles()
    }
}
