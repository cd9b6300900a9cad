//! Raw plane/mesh intersection output.

use heatslice_math::Point3;

/// An unordered collection of 3D polylines produced by cutting a mesh.
///
/// Polylines are neither guaranteed closed nor disjoint. A cut through a
/// shared mesh edge shows up twice, and a plane touching a single vertex
/// produces a one-point polyline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineSet {
    polylines: Vec<Vec<Point3>>,
}

impl PolylineSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a polyline. Empty point lists are ignored.
    pub fn push(&mut self, polyline: Vec<Point3>) {
        if !polyline.is_empty() {
            self.polylines.push(polyline);
        }
    }

    /// The polylines in insertion order.
    pub fn polylines(&self) -> &[Vec<Point3>] {
        &self.polylines
    }

    /// Number of polylines.
    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    /// Total number of points over all polylines.
    pub fn num_points(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }

    /// True when the plane missed the mesh.
    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// Iterate over every consecutive point pair of every polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        self.polylines
            .iter()
            .flat_map(|line| line.windows(2).map(|w| (w[0], w[1])))
    }
}

impl FromIterator<Vec<Point3>> for PolylineSet {
    fn from_iter<I: IntoIterator<Item = Vec<Point3>>>(iter: I) -> Self {
        let mut set = PolylineSet::new();
        for line in iter {
            set.push(line);
        }
        set
    }
}
