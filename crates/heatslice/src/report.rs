//! Progress reporting for batch slicing.

use std::fmt;

use crate::scene::Scene;
use crate::slicer::SliceOutput;

/// Receives summaries from orchestration code.
pub trait Reporter {
    /// Called once the scene to slice is assembled.
    fn scene(&self, scene: &Scene);

    /// Called after a batch has been sliced.
    fn slice(&self, output: &SliceOutput);
}

/// Counts describing a [`SliceOutput`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSummary {
    /// Pieces emitted.
    pub pieces: usize,
    /// Closed pieces among them.
    pub closed: usize,
    /// Distinct meshes that produced at least one piece.
    pub meshes: usize,
    /// Meshes that failed.
    pub failures: usize,
}

impl SliceSummary {
    /// Summarize an output.
    pub fn of(output: &SliceOutput) -> Self {
        let pieces = output.pieces();
        // Pieces of one mesh are contiguous.
        let meshes = pieces
            .iter()
            .enumerate()
            .filter(|(i, p)| *i == 0 || pieces[i - 1].mesh != p.mesh)
            .count();
        Self {
            pieces: pieces.len(),
            closed: pieces.iter().filter(|p| p.closed).count(),
            meshes,
            failures: output.failures().len(),
        }
    }
}

impl fmt::Display for SliceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pieces ({} closed) from {} meshes, {} failed",
            self.pieces, self.closed, self.meshes, self.failures
        )
    }
}

/// Reports through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn scene(&self, scene: &Scene) {
        log::info!("{scene}, {} sliceable", scene.surfaces().len());
    }

    fn slice(&self, output: &SliceOutput) {
        log::info!("{}", SliceSummary::of(output));
        for failure in output.failures() {
            log::info!("  {}: {}", failure.mesh, failure.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneBasis;
    use crate::scene::ActorKind;
    use crate::slicer::MeshSlicer;
    use heatslice_math::{Point3, Vec3};
    use heatslice_mesh::{cuboid, TriangleMesh};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        lines: RefCell<Vec<String>>,
    }

    impl Reporter for Recorder {
        fn scene(&self, scene: &Scene) {
            self.lines.borrow_mut().push(scene.to_string());
        }

        fn slice(&self, output: &SliceOutput) {
            self.lines
                .borrow_mut()
                .push(SliceSummary::of(output).to_string());
        }
    }

    fn run(reporter: &dyn Reporter) -> SliceOutput {
        let mut scene = Scene::new();
        let mut pair = cuboid(Point3::new(0.0, 0.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        pair.merge(&cuboid(Point3::new(3.0, 0.0, -1.0), Point3::new(4.0, 1.0, 1.0)));
        scene.add("pair", "region", ActorKind::SurfaceMesh(pair)).unwrap();
        scene
            .add("empty", "region", ActorKind::SurfaceMesh(TriangleMesh::new()))
            .unwrap();
        scene
            .add("label", "text", ActorKind::TextOverlay("pair".into()))
            .unwrap();
        reporter.scene(&scene);

        let plane = PlaneBasis::from_normal(Point3::origin(), Vec3::z()).unwrap();
        let output = MeshSlicer::default().slice_and_project(&plane, &scene.surfaces());
        reporter.slice(&output);
        output
    }

    #[test]
    fn test_summary_counts() {
        let output = run(&LogReporter);
        assert_eq!(
            SliceSummary::of(&output),
            SliceSummary {
                pieces: 2,
                closed: 2,
                meshes: 1,
                failures: 1,
            }
        );
        assert_eq!(SliceSummary::of(&SliceOutput::default()), SliceSummary::default());
    }

    #[test]
    fn test_reporter_receives_both_stages() {
        let recorder = Recorder::default();
        run(&recorder);
        assert_eq!(
            recorder.lines.into_inner(),
            vec![
                "scene with 3 actors".to_string(),
                "2 pieces (2 closed) from 1 meshes, 1 failed".to_string(),
            ]
        );
    }
}
