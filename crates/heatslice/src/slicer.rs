//! Slicing a set of named meshes with a plane and projecting the contours.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use heatslice_math::{Point2, Point3};
use heatslice_mesh::SurfaceMesh;

use crate::connectivity::split_connected;
use crate::error::{GeometryError, Result, SettingsError};
use crate::plane::PlaneBasis;
use crate::settings::{DegeneratePolicy, SliceSettings};

/// A named mesh to slice.
pub type NamedMesh<'a> = (&'a str, &'a dyn SurfaceMesh);

/// One connected contour of one mesh, in plane coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPiece {
    /// Output key, `"{mesh}_segment_{index}"`.
    pub key: String,
    /// Name of the mesh this piece was cut from.
    pub mesh: String,
    /// 0-based piece index within the mesh, in discovery order.
    pub index: usize,
    /// Ordered plane-local points.
    pub points: Vec<Point2>,
    /// The same points before projection.
    pub points_3d: Vec<Point3>,
    /// Whether the contour is a loop (last point repeats the first).
    pub closed: bool,
}

/// Output key for piece `index` of mesh `name`.
pub fn piece_key(name: &str, index: usize) -> String {
    format!("{name}_segment_{index}")
}

/// A mesh whose slice failed.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFailure {
    /// Name of the mesh.
    pub mesh: String,
    /// Why it failed.
    pub error: GeometryError,
}

#[derive(Serialize)]
struct PieceRecord<'a> {
    key: &'a str,
    mesh: &'a str,
    index: usize,
    closed: bool,
    points: Vec<[f64; 2]>,
}

/// Result of slicing a batch of meshes.
///
/// Pieces are ordered by mesh (input order), then by piece index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceOutput {
    pieces: Vec<ProjectedPiece>,
    failures: Vec<MeshFailure>,
}

impl SliceOutput {
    /// All emitted pieces.
    pub fn pieces(&self) -> &[ProjectedPiece] {
        &self.pieces
    }

    /// Meshes that could not be sliced.
    pub fn failures(&self) -> &[MeshFailure] {
        &self.failures
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True when no mesh produced a piece.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Look up a piece by key.
    pub fn get(&self, key: &str) -> Option<&ProjectedPiece> {
        self.pieces.iter().find(|p| p.key == key)
    }

    /// Keys in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.pieces.iter().map(|p| p.key.as_str())
    }

    /// Pieces cut from the named mesh.
    pub fn pieces_for<'a>(&'a self, mesh: &'a str) -> impl Iterator<Item = &'a ProjectedPiece> + 'a {
        self.pieces.iter().filter(move |p| p.mesh == mesh)
    }

    /// Key to 2D points, in output order.
    pub fn into_projections(self) -> Vec<(String, Vec<Point2>)> {
        self.pieces.into_iter().map(|p| (p.key, p.points)).collect()
    }

    /// Ordered JSON array of `{key, mesh, index, closed, points}` records.
    pub fn to_json(&self) -> Value {
        let records: Vec<PieceRecord<'_>> = self
            .pieces
            .iter()
            .map(|p| PieceRecord {
                key: &p.key,
                mesh: &p.mesh,
                index: p.index,
                closed: p.closed,
                points: p.points.iter().map(|q| [q.x, q.y]).collect(),
            })
            .collect();
        serde_json::json!(records)
    }
}

/// Cuts meshes with a plane and maps the contours to plane coordinates.
#[derive(Debug, Clone, Default)]
pub struct MeshSlicer {
    settings: SliceSettings,
}

impl MeshSlicer {
    /// Create a slicer with the given settings.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Invalid`] if the settings fail
    /// [`SliceSettings::validate`].
    pub fn new(settings: SliceSettings) -> std::result::Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// The active settings.
    pub fn settings(&self) -> &SliceSettings {
        &self.settings
    }

    /// Slice one mesh: intersect, split into connected pieces, project.
    ///
    /// A mesh the plane misses gives an empty vector.
    pub fn slice_mesh(
        &self,
        plane: &PlaneBasis,
        name: &str,
        mesh: &dyn SurfaceMesh,
    ) -> Result<Vec<ProjectedPiece>> {
        if let Some(limit) = self.settings.max_triangles {
            let triangles = mesh.triangle_count();
            if triangles > limit {
                return Err(GeometryError::MeshTooLarge { triangles, limit });
            }
        }

        let intersection = plane.intersect_mesh(mesh)?;
        if intersection.is_empty() {
            log::trace!("{name}: plane does not intersect mesh");
            return Ok(Vec::new());
        }

        let pieces = split_connected(&intersection, self.settings.weld_tolerance);
        log::debug!(
            "{name}: {} polylines joined into {} pieces",
            intersection.len(),
            pieces.len()
        );

        let projected = pieces
            .into_iter()
            .filter(|piece| {
                !piece.is_empty()
                    && (self.settings.degenerate_pieces == DegeneratePolicy::Keep
                        || !piece.is_degenerate())
            })
            .enumerate()
            .map(|(index, piece)| ProjectedPiece {
                key: piece_key(name, index),
                mesh: name.to_string(),
                index,
                points: plane.project_to_plane(&piece.points),
                points_3d: piece.points,
                closed: piece.closed,
            })
            .collect();

        Ok(projected)
    }

    fn slice_all(
        &self,
        plane: &PlaneBasis,
        meshes: &[NamedMesh<'_>],
    ) -> Vec<Result<Vec<ProjectedPiece>>> {
        if self.settings.parallel {
            meshes
                .par_iter()
                .map(|&(name, mesh)| self.slice_mesh(plane, name, mesh))
                .collect()
        } else {
            meshes
                .iter()
                .map(|&(name, mesh)| self.slice_mesh(plane, name, mesh))
                .collect()
        }
    }

    /// Slice every mesh and project its pieces.
    ///
    /// A mesh that fails is recorded in [`SliceOutput::failures`] and does
    /// not affect the others.
    pub fn slice_and_project(&self, plane: &PlaneBasis, meshes: &[NamedMesh<'_>]) -> SliceOutput {
        let mut output = SliceOutput::default();
        for (&(name, _), result) in meshes.iter().zip(self.slice_all(plane, meshes)) {
            match result {
                Ok(pieces) => output.pieces.extend(pieces),
                Err(error) => {
                    log::warn!("{name}: slice failed: {error}");
                    output.failures.push(MeshFailure {
                        mesh: name.to_string(),
                        error,
                    });
                }
            }
        }
        output
    }

    /// Like [`MeshSlicer::slice_and_project`], but the first failing mesh
    /// (in input order) aborts the batch.
    pub fn try_slice_and_project(
        &self,
        plane: &PlaneBasis,
        meshes: &[NamedMesh<'_>],
    ) -> Result<SliceOutput> {
        let mut output = SliceOutput::default();
        for result in self.slice_all(plane, meshes) {
            output.pieces.extend(result?);
        }
        Ok(output)
    }
}
