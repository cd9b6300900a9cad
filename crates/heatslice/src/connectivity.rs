//! Splitting raw intersection polylines into connected pieces.
//!
//! The plane/mesh cut produces one short polyline per triangle, in no
//! particular order and with shared endpoints repeated. This module welds
//! coincident points, finds the connected components of the resulting
//! segment graph, and walks each component into a single ordered point
//! sequence suitable for plotting.
//!
//! Hash maps are used for lookup only; every iteration runs over vectors in
//! first-seen order, so identical input always gives identical pieces.

use std::collections::{HashMap, HashSet};

use heatslice_math::Point3;
use heatslice_mesh::PolylineSet;

/// One connected contour of a plane section.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedPiece {
    /// Ordered points. For a closed piece the last point repeats the first.
    pub points: Vec<Point3>,
    /// Whether the contour forms a loop.
    pub closed: bool,
}

impl ConnectedPiece {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the piece has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A piece that cannot be drawn as a line (fewer than two points).
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// Merges points closer than a tolerance into shared vertex ids.
///
/// Points are bucketed on a grid with cell size equal to the tolerance, so a
/// match can only be in the same or a neighbouring cell. Cells are measured
/// from the first welded point and clamp at the `i64` range; clamped cells
/// only get more crowded, the distance check still decides.
struct Welder {
    tolerance: f64,
    anchor: Option<Point3>,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<Point3>,
}

impl Welder {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            anchor: None,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn cell(&mut self, p: &Point3) -> (i64, i64, i64) {
        let anchor = *self.anchor.get_or_insert(*p);
        let d = (p - anchor) / self.tolerance;
        // `as` saturates, and maps NaN to 0.
        (d.x.floor() as i64, d.y.floor() as i64, d.z.floor() as i64)
    }

    fn weld(&mut self, p: Point3) -> usize {
        let (cx, cy, cz) = self.cell(&p);
        for dx in -1..=1i64 {
            for dy in -1..=1i64 {
                for dz in -1..=1i64 {
                    let key = (
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    );
                    let Some(ids) = self.cells.get(&key) else {
                        continue;
                    };
                    if let Some(&id) = ids
                        .iter()
                        .find(|&&id| (self.points[id] - p).norm() <= self.tolerance)
                    {
                        return id;
                    }
                }
            }
        }

        let id = self.points.len();
        self.points.push(p);
        self.cells.entry((cx, cy, cz)).or_default().push(id);
        id
    }
}

/// Union-find over vertex ids.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the earlier vertex as root.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// The welded segment graph of a polyline set.
struct SegmentGraph {
    points: Vec<Point3>,
    edges: Vec<(usize, usize)>,
    /// Per vertex: `(edge index, neighbour)` in edge order.
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl SegmentGraph {
    fn build(set: &PolylineSet, tolerance: f64) -> Self {
        let mut welder = Welder::new(tolerance);
        let mut edges = Vec::new();
        let mut seen = HashSet::new();

        for line in set.polylines() {
            let ids: Vec<usize> = line.iter().map(|p| welder.weld(*p)).collect();
            for w in ids.windows(2) {
                let (a, b) = (w[0], w[1]);
                if a == b {
                    continue;
                }
                if seen.insert((a.min(b), a.max(b))) {
                    edges.push((a, b));
                }
            }
        }

        let mut adjacency = vec![Vec::new(); welder.points.len()];
        for (e, &(a, b)) in edges.iter().enumerate() {
            adjacency[a].push((e, b));
            adjacency[b].push((e, a));
        }

        Self {
            points: welder.points,
            edges,
            adjacency,
        }
    }

    /// Vertex ids of each connected component, components ordered by their
    /// first-seen vertex.
    fn components(&self) -> Vec<Vec<usize>> {
        let n = self.points.len();
        let mut sets = DisjointSet::new(n);
        for &(a, b) in &self.edges {
            sets.union(a, b);
        }

        let mut slot: Vec<Option<usize>> = vec![None; n];
        let mut components: Vec<Vec<usize>> = Vec::new();
        for v in 0..n {
            let root = sets.find(v);
            let index = match slot[root] {
                Some(index) => index,
                None => {
                    slot[root] = Some(components.len());
                    components.push(Vec::new());
                    components.len() - 1
                }
            };
            components[index].push(v);
        }
        components
    }

    /// Walk every edge of a component into one ordered vertex sequence.
    ///
    /// Starts at the first odd-degree vertex so open chains are walked end
    /// to end. When a walk gets stuck with edges left (a branching piece), it
    /// resumes from the next vertex that still has unused edges.
    fn join(&self, component: &[usize], used: &mut [bool]) -> ConnectedPiece {
        let start = component
            .iter()
            .copied()
            .find(|&v| self.adjacency[v].len() % 2 == 1)
            .or_else(|| {
                component
                    .iter()
                    .copied()
                    .find(|&v| !self.adjacency[v].is_empty())
            });

        let Some(start) = start else {
            // Isolated vertex: the plane only touched the mesh here.
            return ConnectedPiece {
                points: vec![self.points[component[0]]],
                closed: false,
            };
        };

        let mut sequence = vec![start];
        let mut current = start;
        let mut jumped = false;
        // Vertices before `resume` have no unused edges left.
        let mut resume = 0;
        loop {
            let next = self.adjacency[current]
                .iter()
                .copied()
                .find(|&(e, _)| !used[e]);
            match next {
                Some((e, v)) => {
                    used[e] = true;
                    sequence.push(v);
                    current = v;
                }
                None => {
                    while resume < component.len()
                        && self.adjacency[component[resume]].iter().all(|&(e, _)| used[e])
                    {
                        resume += 1;
                    }
                    let Some(&v) = component.get(resume) else {
                        break;
                    };
                    jumped = true;
                    sequence.push(v);
                    current = v;
                }
            }
        }
        sequence.dedup();

        let distinct = sequence.len() - usize::from(sequence.first() == sequence.last());
        let closed = !jumped && sequence.first() == sequence.last() && distinct >= 3;

        ConnectedPiece {
            points: sequence.iter().map(|&v| self.points[v]).collect(),
            closed,
        }
    }
}

/// Partition a polyline set into connected pieces.
///
/// Points within `weld_tolerance` of each other are treated as the same
/// vertex. Pieces are returned in discovery order (the order in which their
/// first point appears in `set`), each joined into one ordered point
/// sequence with consecutive duplicates removed.
pub fn split_connected(set: &PolylineSet, weld_tolerance: f64) -> Vec<ConnectedPiece> {
    if set.is_empty() {
        return Vec::new();
    }

    let graph = SegmentGraph::build(set, weld_tolerance);
    let mut used = vec![false; graph.edges.len()];
    graph
        .components()
        .iter()
        .map(|component| graph.join(component, &mut used))
        .collect()
}
