#![warn(missing_docs)]

//! Plane sections of 3D surface meshes, projected to 2D.
//!
//! Cuts a set of named meshes with an oriented plane, splits each cut into
//! its connected contours, and expresses every contour in the plane's own
//! 2D frame so it can be drawn as a flat heatmap outline.
//!
//! # Example
//!
//! ```ignore
//! use heatslice::{MeshSlicer, PlaneBasis, Point3, Vec3, uv_sphere};
//!
//! let sphere = uv_sphere(Point3::origin(), 1.0, 64, 33);
//! let plane = PlaneBasis::from_normal(Point3::origin(), Vec3::z())?;
//! let output = MeshSlicer::default().slice_and_project(&plane, &[("sphere", &sphere)]);
//!
//! for piece in output.pieces() {
//!     println!("{}: {} points", piece.key, piece.points.len());
//! }
//! ```

pub mod connectivity;
pub mod error;
pub mod plane;
pub mod report;
pub mod scene;
pub mod settings;
pub mod slicer;

pub use connectivity::{split_connected, ConnectedPiece};
pub use error::{GeometryError, Result, SceneError, SettingsError};
pub use plane::{BoundingQuad, PlaneBasis, QUAD_MARGIN};
pub use report::{LogReporter, Reporter, SliceSummary};
pub use scene::{Actor, ActorId, ActorKind, Scene};
pub use settings::{DegeneratePolicy, SliceSettings, DEFAULT_WELD_TOLERANCE};
pub use slicer::{piece_key, MeshFailure, MeshSlicer, NamedMesh, ProjectedPiece, SliceOutput};

pub use heatslice_math::{Dir3, Point2, Point3, Tolerance, Vec3};
pub use heatslice_mesh::{cuboid, uv_sphere, Aabb, MeshError, PolylineSet, SurfaceMesh, TriangleMesh};
