//! Plane/triangle intersection.
//!
//! Cuts every triangle of a mesh with a plane and collects the resulting
//! pieces into a [`PolylineSet`]. Each triangle contributes at most one
//! polyline:
//! - a two-point segment where the plane crosses it,
//! - a single point where the plane only touches one vertex,
//! - its closed boundary when the whole triangle lies in the plane.
//!
//! Where several triangles lie in the plane, edges shared by two of them are
//! interior to the face and are left out, so only the outline remains.

use std::collections::HashMap;

use heatslice_math::{try_direction, Point3, Tolerance, Vec3};

use crate::error::{MeshError, Result};
use crate::polyline::PolylineSet;
use crate::TriangleMesh;

/// A triangle vertex tagged with its mesh index, so shared edges can be
/// interpolated in a fixed direction.
#[derive(Debug, Clone, Copy)]
struct Corner {
    index: u32,
    point: Point3,
    dist: f64,
}

/// Intersect a single triangle with a plane.
///
/// `vertices` carry their mesh indices; `normal` must be unit length.
/// Returns 0 points (miss), 1 point (touching a vertex), 2 points (a cut
/// segment) or 4 points (closed boundary of a triangle lying in the plane).
pub fn cut_triangle(
    vertices: [(u32, Point3); 3],
    plane_origin: &Point3,
    plane_normal: &Vec3,
    tol: f64,
) -> Vec<Point3> {
    let corners = vertices.map(|(index, point)| Corner {
        index,
        point,
        dist: plane_normal.dot(&(point - plane_origin)),
    });

    let on: Vec<bool> = corners.iter().map(|c| c.dist.abs() <= tol).collect();

    if on.iter().all(|&o| o) {
        let [a, b, c] = corners.map(|c| c.point);
        return vec![a, b, c, a];
    }

    let mut points: Vec<Point3> = Vec::with_capacity(2);
    for (i, corner) in corners.iter().enumerate() {
        if on[i] {
            push_unique(&mut points, corner.point, tol);
        }
    }

    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        if on[a] || on[b] {
            continue;
        }
        let (ca, cb) = (corners[a], corners[b]);
        if (ca.dist > 0.0) != (cb.dist > 0.0) {
            push_unique(&mut points, crossing(ca, cb), tol);
        }
    }

    points.truncate(2);
    points
}

fn push_unique(points: &mut Vec<Point3>, p: Point3, tol: f64) {
    if !points.iter().any(|q| (q - p).norm() <= tol) {
        points.push(p);
    }
}

/// Where the edge `a`-`b` crosses the plane. Always interpolates from the
/// lower mesh index so both triangles sharing the edge agree bit for bit.
fn crossing(a: Corner, b: Corner) -> Point3 {
    let (p, q) = if a.index <= b.index { (a, b) } else { (b, a) };
    let t = p.dist / (p.dist - q.dist);
    p.point + (q.point - p.point) * t
}

/// Intersect a mesh with a plane, returning the raw polylines.
pub fn intersect_mesh_with_plane(
    mesh: &TriangleMesh,
    plane_origin: &Point3,
    plane_normal: &Vec3,
) -> Result<PolylineSet> {
    mesh.validate()?;
    let normal = try_direction(plane_normal).ok_or(MeshError::ZeroNormal)?;
    let tol = Tolerance::DEFAULT.linear;

    let mut set = PolylineSet::new();
    match mesh.aabb() {
        Some(aabb) if aabb.straddles(plane_origin, &normal, tol) => {}
        _ => return Ok(set),
    }

    let cuts: Vec<([u32; 3], Vec<Point3>)> = mesh
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let vertices = [
                (tri[0], mesh.vertex(tri[0] as usize)),
                (tri[1], mesh.vertex(tri[1] as usize)),
                (tri[2], mesh.vertex(tri[2] as usize)),
            ];
            let tri = [tri[0], tri[1], tri[2]];
            (tri, cut_triangle(vertices, plane_origin, &normal, tol))
        })
        .collect();

    // How many in-plane triangles use each edge.
    let mut in_plane_edges: HashMap<EdgeKey, u32> = HashMap::new();
    for (tri, points) in &cuts {
        if is_in_plane(points) {
            for (a, b) in triangle_edges(*tri) {
                *in_plane_edges.entry(edge_key(mesh, a, b)).or_default() += 1;
            }
        }
    }

    for (tri, points) in cuts {
        if !is_in_plane(&points) {
            set.push(points);
            continue;
        }
        for (a, b) in triangle_edges(tri) {
            if in_plane_edges.get(&edge_key(mesh, a, b)) == Some(&1) {
                set.push(vec![mesh.vertex(a as usize), mesh.vertex(b as usize)]);
            }
        }
    }

    Ok(set)
}

/// Undirected edge identified by its endpoint coordinates, so meshes that
/// duplicate vertices still match.
type EdgeKey = ([u32; 3], [u32; 3]);

fn edge_key(mesh: &TriangleMesh, a: u32, b: u32) -> EdgeKey {
    let bits = |i: u32| {
        let i = i as usize * 3;
        [
            mesh.vertices[i].to_bits(),
            mesh.vertices[i + 1].to_bits(),
            mesh.vertices[i + 2].to_bits(),
        ]
    };
    let (ka, kb) = (bits(a), bits(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

fn triangle_edges([a, b, c]: [u32; 3]) -> [(u32, u32); 3] {
    [(a, b), (b, c), (c, a)]
}

/// `cut_triangle` returns the closed boundary `[a, b, c, a]` only for a
/// triangle lying in the plane.
fn is_in_plane(points: &[Point3]) -> bool {
    points.len() == 4
}
