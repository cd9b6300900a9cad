//! Simple closed meshes: boxes and UV spheres.

use std::f64::consts::PI;

use heatslice_math::Point3;

use crate::TriangleMesh;

/// Axis-aligned box between two corners, 8 vertices and 12 triangles.
pub fn cuboid(a: Point3, b: Point3) -> TriangleMesh {
    let (lo, hi) = (a.inf(&b), a.sup(&b));
    let mut mesh = TriangleMesh::new();
    for p in [
        Point3::new(lo.x, lo.y, lo.z),
        Point3::new(hi.x, lo.y, lo.z),
        Point3::new(hi.x, hi.y, lo.z),
        Point3::new(lo.x, hi.y, lo.z),
        Point3::new(lo.x, lo.y, hi.z),
        Point3::new(hi.x, lo.y, hi.z),
        Point3::new(hi.x, hi.y, hi.z),
        Point3::new(lo.x, hi.y, hi.z),
    ] {
        mesh.push_vertex(p);
    }

    #[rustfmt::skip]
    let indices: [u32; 36] = [
        // Bottom (-Z)
        0, 2, 1, 0, 3, 2,
        // Top (+Z)
        4, 5, 6, 4, 6, 7,
        // Front (-Y)
        0, 1, 5, 0, 5, 4,
        // Back (+Y)
        2, 3, 7, 2, 7, 6,
        // Left (-X)
        0, 4, 7, 0, 7, 3,
        // Right (+X)
        1, 2, 6, 1, 6, 5,
    ];
    mesh.indices.extend_from_slice(&indices);
    mesh
}

/// UV sphere with `n_lon` segments around the axis and `n_lat` bands from
/// pole to pole.
///
/// An odd `n_lat` keeps every vertex off the equator plane; an even one puts
/// a latitude ring exactly on it.
pub fn uv_sphere(center: Point3, radius: f64, n_lon: u32, n_lat: u32) -> TriangleMesh {
    let n_lon = n_lon.max(3) as usize;
    let n_lat = n_lat.max(2) as usize;
    let mut mesh = TriangleMesh::new();

    let at = |u: f64, v: f64| {
        Point3::new(
            center.x + radius * v.cos() * u.cos(),
            center.y + radius * v.cos() * u.sin(),
            center.z + radius * v.sin(),
        )
    };

    // South pole - single vertex (index 0)
    let south_idx = mesh.push_vertex(at(0.0, -PI / 2.0));

    // Latitude rings (j = 1 to n_lat - 1), seam vertex duplicated at i = n_lon
    for j in 1..n_lat {
        let v = -PI / 2.0 + PI * (j as f64 / n_lat as f64);
        for i in 0..=n_lon {
            let u = 2.0 * PI * (i as f64 / n_lon as f64);
            mesh.push_vertex(at(u, v));
        }
    }

    let north_idx = mesh.push_vertex(at(0.0, PI / 2.0));
    let stride = (n_lon + 1) as u32;

    let first_band_start = 1u32;
    for i in 0..n_lon as u32 {
        let v1 = first_band_start + i;
        let v2 = first_band_start + i + 1;
        mesh.indices.extend_from_slice(&[south_idx, v2, v1]);
    }

    for j in 0..(n_lat - 2) as u32 {
        let band_start = 1 + j * stride;
        let next_band_start = band_start + stride;
        for i in 0..n_lon as u32 {
            let bl = band_start + i;
            let br = band_start + i + 1;
            let tl = next_band_start + i;
            let tr = next_band_start + i + 1;
            mesh.indices.extend_from_slice(&[bl, br, tl]);
            mesh.indices.extend_from_slice(&[br, tr, tl]);
        }
    }

    let last_band_start = 1 + (n_lat - 2) as u32 * stride;
    for i in 0..n_lon as u32 {
        let v1 = last_band_start + i;
        let v2 = last_band_start + i + 1;
        mesh.indices.extend_from_slice(&[north_idx, v1, v2]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_corner_order() {
        let mesh = cuboid(Point3::new(2.0, 2.0, 2.0), Point3::origin());
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.vertex(0), Point3::origin());
        assert_eq!(mesh.vertex(6), Point3::new(2.0, 2.0, 2.0));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let center = Point3::new(1.0, -2.0, 0.5);
        let mesh = uv_sphere(center, 3.0, 24, 11);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.num_triangles(), 2 * 24 + 2 * 24 * (11 - 2));
        for i in 0..mesh.num_vertices() {
            assert_relative_eq!((mesh.vertex(i) - center).norm(), 3.0, epsilon = 1e-5);
        }
    }
}
