//! Oriented cutting planes and their 2D coordinate frames.

use heatslice_math::{try_direction, Dir3, Point2, Point3, Tolerance, Vec3};
use heatslice_mesh::{Aabb, PolylineSet, SurfaceMesh, TriangleMesh};
use nalgebra::Matrix3x2;

use crate::error::{GeometryError, Result};

/// Fraction of the largest mesh extent added to the display quad's side.
pub const QUAD_MARGIN: f64 = 1.0 / 3.0;

/// An oriented plane in 3D: origin, orthonormal in-plane axes and normal.
///
/// A `PlaneBasis` is validated on construction and immutable afterwards, so
/// it can be shared freely between slicing calls and threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneBasis {
    origin: Point3,
    u: Dir3,
    v: Dir3,
    normal: Dir3,
    basis: Matrix3x2<f64>,
}

impl PlaneBasis {
    /// Build a plane from its origin and two in-plane axes.
    ///
    /// The axes are normalized; they must already be orthogonal within
    /// [`Tolerance::DEFAULT`].
    ///
    /// # Errors
    ///
    /// - [`GeometryError::ZeroVector`] if an axis is zero or not finite
    /// - [`GeometryError::NonOrthogonal`] if `|u · v|` exceeds the tolerance
    pub fn new(origin: Point3, u: Vec3, v: Vec3) -> Result<Self> {
        Self::with_tolerance(origin, u, v, Tolerance::DEFAULT.orthogonality)
    }

    /// Like [`PlaneBasis::new`] with an explicit orthogonality tolerance.
    ///
    /// `eps` must be finite and in `[0, 1)`; a tolerance of 1 or more would
    /// accept parallel axes.
    pub fn with_tolerance(origin: Point3, u: Vec3, v: Vec3, eps: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&eps) {
            return Err(GeometryError::InvalidTolerance(eps));
        }
        if !origin.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::ZeroVector("origin"));
        }
        let u = try_direction(&u).ok_or(GeometryError::ZeroVector("u"))?;
        let v = try_direction(&v).ok_or(GeometryError::ZeroVector("v"))?;

        let dot = u.as_ref().dot(v.as_ref());
        if dot.abs() > eps {
            return Err(GeometryError::NonOrthogonal { dot });
        }

        let normal =
            try_direction(&u.cross(v.as_ref())).ok_or(GeometryError::NonOrthogonal { dot })?;
        let basis = Matrix3x2::from_columns(&[u.into_inner(), v.into_inner()]);

        Ok(Self {
            origin,
            u,
            v,
            normal,
            basis,
        })
    }

    /// Derive a plane from its origin and normal.
    ///
    /// The in-plane axes are chosen deterministically: with `m` the first
    /// axis on which the normal is non-zero and `n = (m + 1) % 3`, `u` takes
    /// `normal[m]` at `n` and `-normal[n]` at `m`, then `v = normal × u`. The
    /// same normal always yields the same axes, so plots keep their
    /// orientation between runs.
    ///
    /// # Errors
    ///
    /// [`GeometryError::ZeroNormal`] if `normal` is zero or not finite.
    pub fn from_normal(origin: Point3, normal: Vec3) -> Result<Self> {
        let normal = try_direction(&normal).ok_or(GeometryError::ZeroNormal)?;
        let m = normal
            .iter()
            .position(|&c| c != 0.0)
            .ok_or(GeometryError::ZeroNormal)?;
        let n = (m + 1) % 3;

        let mut u = Vec3::zeros();
        u[n] = normal[m];
        u[m] = -normal[n];
        let u = u.normalize();
        let v = normal.cross(&u);

        Self::new(origin, u, v)
    }

    /// The plane's reference point.
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Alias of [`PlaneBasis::origin`]; the plane's centre of mass.
    pub fn center(&self) -> Point3 {
        self.origin
    }

    /// First in-plane axis (plot x).
    pub fn u(&self) -> Dir3 {
        self.u
    }

    /// Second in-plane axis (plot y).
    pub fn v(&self) -> Dir3 {
        self.v
    }

    /// Unit normal, `u × v`.
    pub fn normal(&self) -> Dir3 {
        self.normal
    }

    /// 3×2 matrix with columns `u` and `v`.
    pub fn basis_matrix(&self) -> &Matrix3x2<f64> {
        &self.basis
    }

    /// Signed distance of `p` from the plane along the normal.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.as_ref().dot(&(p - self.origin))
    }

    /// Plane-local coordinates of a single point.
    pub fn project_point(&self, p: &Point3) -> Point2 {
        Point2::from(self.basis.tr_mul(&(p - self.origin)))
    }

    /// Map 3D points to plane-local 2D coordinates:
    /// `((p - origin) · u, (p - origin) · v)`.
    pub fn project_to_plane(&self, points: &[Point3]) -> Vec<Point2> {
        points.iter().map(|p| self.project_point(p)).collect()
    }

    /// Cut `mesh` with this plane.
    ///
    /// A plane that misses the mesh gives an empty set; only provider
    /// failures are errors.
    pub fn intersect_mesh(&self, mesh: &dyn SurfaceMesh) -> Result<PolylineSet> {
        Ok(mesh.intersect(&self.origin, self.normal.as_ref())?)
    }

    /// A square on this plane, centred on the origin, large enough to frame
    /// a mesh with the given bounds. Used for display only.
    pub fn to_bounding_quad(&self, bounds: &Aabb) -> BoundingQuad {
        let length = bounds.max_extent();
        BoundingQuad {
            center: self.origin,
            u: self.u,
            v: self.v,
            normal: self.normal,
            side: length + length * QUAD_MARGIN,
        }
    }
}

/// Square display quad lying in a cutting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingQuad {
    /// Centre of the square (the plane origin).
    pub center: Point3,
    /// Edge direction along plot x.
    pub u: Dir3,
    /// Edge direction along plot y.
    pub v: Dir3,
    /// Facing direction.
    pub normal: Dir3,
    /// Side length.
    pub side: f64,
}

impl BoundingQuad {
    /// Corners in counter-clockwise order seen from the normal side.
    pub fn corners(&self) -> [Point3; 4] {
        let h = self.side / 2.0;
        let (u, v) = (self.u.into_inner() * h, self.v.into_inner() * h);
        [
            self.center - u - v,
            self.center + u - v,
            self.center + u + v,
            self.center - u + v,
        ]
    }

    /// Two-triangle mesh of the quad, with per-vertex normals.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for c in self.corners() {
            mesh.push_vertex(c);
            mesh.normals.extend_from_slice(&[
                self.normal.x as f32,
                self.normal.y as f32,
                self.normal.z as f32,
            ]);
        }
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use heatslice_mesh::{cuboid, uv_sphere};

    fn assert_orthonormal(plane: &PlaneBasis) {
        let (u, v, n) = (
            plane.u().into_inner(),
            plane.v().into_inner(),
            plane.normal().into_inner(),
        );
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert!(u.dot(&v).abs() < 1e-9);
        assert!(u.dot(&n).abs() < 1e-9);
        assert!(v.dot(&n).abs() < 1e-9);
    }

    #[test]
    fn test_new_normalizes_axes() {
        let plane = PlaneBasis::new(
            Point3::new(1.0, 2.0, 3.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -5.0),
        )
        .unwrap();
        assert_orthonormal(&plane);
        assert_relative_eq!(plane.u().into_inner(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(plane.v().into_inner(), -Vec3::z(), epsilon = 1e-12);
        // x × -z = y
        assert_relative_eq!(plane.normal().into_inner(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_new_rejects_parallel_axes() {
        let err = PlaneBasis::new(Point3::origin(), Vec3::x(), Vec3::x()).unwrap_err();
        assert!(matches!(err, GeometryError::NonOrthogonal { dot } if (dot - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_new_rejects_zero_axis() {
        assert_eq!(
            PlaneBasis::new(Point3::origin(), Vec3::zeros(), Vec3::y()),
            Err(GeometryError::ZeroVector("u"))
        );
        assert_eq!(
            PlaneBasis::new(Point3::origin(), Vec3::x(), Vec3::new(0.0, f64::NAN, 0.0)),
            Err(GeometryError::ZeroVector("v"))
        );
    }

    #[test]
    fn test_with_tolerance_rejects_bad_eps() {
        let o = Point3::origin();
        for eps in [1.0, 2.0, -1e-3, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    PlaneBasis::with_tolerance(o, Vec3::x(), Vec3::x(), eps),
                    Err(GeometryError::InvalidTolerance(_))
                ),
                "eps = {eps} accepted"
            );
        }
        // Loose but valid tolerance: nearly parallel axes are accepted, yet
        // the normal is still a finite unit vector.
        let plane =
            PlaneBasis::with_tolerance(o, Vec3::x(), Vec3::new(1.0, 0.5, 0.0), 0.99).unwrap();
        assert_relative_eq!(plane.normal().into_inner(), Vec3::z(), epsilon = 1e-12);
        assert!(PlaneBasis::with_tolerance(o, Vec3::x(), Vec3::y(), 0.0).is_ok());
    }

    #[test]
    fn test_tolerance_is_applied_after_normalization() {
        // Long axes with a tiny relative skew stay within tolerance.
        let u = Vec3::new(1000.0, 0.0, 0.0);
        let v = Vec3::new(1e-4, 1000.0, 0.0);
        assert!(PlaneBasis::new(Point3::origin(), u, v).is_ok());
        assert!(PlaneBasis::with_tolerance(Point3::origin(), u, v, 1e-9).is_err());
    }

    #[test]
    fn test_from_normal_z() {
        let plane = PlaneBasis::from_normal(Point3::origin(), Vec3::new(0.0, 0.0, 3.0)).unwrap();
        assert_relative_eq!(plane.u().into_inner(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(plane.v().into_inner(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(plane.normal().into_inner(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_from_normal_axis_rule() {
        // m = 0, n = 1: u = (-ny, nx, 0)
        let normal = Vec3::new(1.0, 2.0, 2.0);
        let plane = PlaneBasis::from_normal(Point3::origin(), normal).unwrap();
        let expected_u = Vec3::new(-2.0, 1.0, 0.0).normalize();
        assert_relative_eq!(plane.u().into_inner(), expected_u, epsilon = 1e-12);
        assert_relative_eq!(plane.normal().into_inner(), normal.normalize(), epsilon = 1e-12);
        assert_orthonormal(&plane);
    }

    #[test]
    fn test_from_normal_is_deterministic() {
        let n = Vec3::new(-0.3, 0.7, 0.2);
        let a = PlaneBasis::from_normal(Point3::new(1.0, 1.0, 1.0), n).unwrap();
        let b = PlaneBasis::from_normal(Point3::new(1.0, 1.0, 1.0), n).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_normal_rejects_zero() {
        assert_eq!(
            PlaneBasis::from_normal(Point3::origin(), Vec3::zeros()),
            Err(GeometryError::ZeroNormal)
        );
        assert_eq!(
            PlaneBasis::from_normal(Point3::origin(), Vec3::new(f64::INFINITY, 0.0, 0.0)),
            Err(GeometryError::ZeroNormal)
        );
    }

    #[test]
    fn test_from_normal_matches_explicit_plane() {
        let axes = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
            (Vec3::new(3.0, -1.0, 2.0), Vec3::new(1.0, 1.0, -1.0)),
        ];
        for (u, v) in axes {
            let explicit = PlaneBasis::new(Point3::origin(), u, v).unwrap();
            let derived =
                PlaneBasis::from_normal(Point3::origin(), u.cross(&v).normalize()).unwrap();
            assert_orthonormal(&derived);
            assert_relative_eq!(
                explicit.normal().into_inner(),
                derived.normal().into_inner(),
                epsilon = 1e-12
            );
            // Same plane: the derived axes lie in the explicit plane.
            let n = explicit.normal().into_inner();
            assert!(derived.u().dot(&n).abs() < 1e-12);
            assert!(derived.v().dot(&n).abs() < 1e-12);
        }
    }

    #[test]
    fn test_project_origin_is_zero() {
        let plane =
            PlaneBasis::from_normal(Point3::new(4.0, -2.0, 7.0), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let projected = plane.project_to_plane(&[plane.origin()]);
        assert_eq!(projected.len(), 1);
        assert_relative_eq!(projected[0], Point2::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_project_in_plane_point() {
        let plane =
            PlaneBasis::from_normal(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.2, -0.5, 0.9)).unwrap();
        let (a, b) = (2.5, -1.25);
        let p = plane.origin() + plane.u().into_inner() * a + plane.v().into_inner() * b;
        let projected = plane.project_to_plane(&[p]);
        assert_relative_eq!(projected[0], Point2::new(a, b), epsilon = 1e-12);
    }

    #[test]
    fn test_project_ignores_normal_offset() {
        let plane = PlaneBasis::from_normal(Point3::origin(), Vec3::z()).unwrap();
        let projected = plane.project_to_plane(&[Point3::new(1.0, 2.0, 3.0), Point3::new(1.0, 2.0, -9.0)]);
        assert_relative_eq!(projected[0], Point2::new(1.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(projected[1], Point2::new(1.0, 2.0), epsilon = 1e-12);
        assert!(plane.project_to_plane(&[]).is_empty());
    }

    #[test]
    fn test_bounding_quad() {
        let mesh = cuboid(Point3::origin(), Point3::new(3.0, 6.0, 1.5));
        let plane = PlaneBasis::from_normal(Point3::new(1.5, 3.0, 0.75), Vec3::z()).unwrap();
        let quad = plane.to_bounding_quad(&mesh.bounds().unwrap());
        assert_relative_eq!(quad.side, 8.0, epsilon = 1e-12);

        let corners = quad.corners();
        for c in &corners {
            assert!(plane.signed_distance(c).abs() < 1e-12);
        }
        assert_relative_eq!((corners[1] - corners[0]).norm(), 8.0, epsilon = 1e-12);
        assert_relative_eq!((corners[3] - corners[0]).norm(), 8.0, epsilon = 1e-12);

        let quad_mesh = quad.to_mesh();
        assert_eq!(quad_mesh.num_triangles(), 2);
        assert_eq!(quad_mesh.normals.len(), quad_mesh.vertices.len());
    }

    #[test]
    fn test_intersect_mesh() {
        let plane = PlaneBasis::from_normal(Point3::origin(), Vec3::z()).unwrap();
        let sphere = uv_sphere(Point3::origin(), 1.0, 16, 9);
        assert!(!plane.intersect_mesh(&sphere).unwrap().is_empty());

        let far = uv_sphere(Point3::new(0.0, 0.0, 5.0), 1.0, 16, 9);
        assert!(plane.intersect_mesh(&far).unwrap().is_empty());

        assert!(matches!(
            plane.intersect_mesh(&TriangleMesh::new()),
            Err(GeometryError::Mesh(_))
        ));
    }
}
