use std::collections::HashMap;

use itertools::Itertools;
use ndarray::{Array2, s};

use crate::geometry::polygon::signed_area;
use crate::geometry::primitives::{Edge, Point, Rect};

/// Coordinates closer than this are merged into a single grid line
const MERGE_TOLERANCE: f64 = 1e-9;

/// Closed rectilinear loop, as produced by [`construct_outlines`].
///
/// Occupied space always lies on the left-hand side of each directed edge.
/// Outer boundaries are therefore counter-clockwise, holes (free pockets enclosed by occupied space) clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub edges: Vec<Edge>,
}

impl Outline {
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.edges)
    }

    /// Outer boundary of occupied space
    pub fn is_outer(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Boundary of a free pocket inside occupied space
    pub fn is_hole(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.edges.iter().map(|e| e.start)
    }

    pub fn bbox(&self) -> Option<Rect> {
        Rect::bounding_points(self.vertices())
    }
}

/// Bounding box of a set of outlines
pub fn outlines_bbox(outlines: &[Outline]) -> Option<Rect> {
    outlines
        .iter()
        .filter_map(|o| o.bbox())
        .reduce(Rect::bounding_rect)
}

/// All edges of a set of outlines
pub fn outline_edges(outlines: &[Outline]) -> impl Iterator<Item = &Edge> {
    outlines.iter().flat_map(|o| o.edges.iter())
}

/// Computes the boundary of the union of a set of axis-aligned rectangles.
///
/// The rectangles are projected onto a coordinate-compressed grid,
/// every cell covered by at least one rectangle is marked as occupied and the boundary between
/// occupied and free cells is traced into closed loops.
/// Rectangles with zero width or height do not occupy any space and are ignored.
pub fn construct_outlines(rects: &[Rect]) -> Vec<Outline> {
    let rects = rects
        .iter()
        .filter(|r| r.width() > MERGE_TOLERANCE && r.height() > MERGE_TOLERANCE)
        .collect_vec();
    if rects.is_empty() {
        return vec![];
    }

    let xs = grid_lines(rects.iter().flat_map(|r| [r.x_min, r.x_max]));
    let ys = grid_lines(rects.iter().flat_map(|r| [r.y_min, r.y_max]));
    let (nx, ny) = (xs.len() - 1, ys.len() - 1);

    let mut occupied = Array2::from_elem((nx, ny), false);
    for r in &rects {
        let (i0, i1) = (grid_index(&xs, r.x_min), grid_index(&xs, r.x_max));
        let (j0, j1) = (grid_index(&ys, r.y_min), grid_index(&ys, r.y_max));
        occupied.slice_mut(s![i0..i1, j0..j1]).fill(true);
    }
    let is_occupied = |i: isize, j: isize| -> bool {
        i >= 0 && j >= 0 && (i as usize) < nx && (j as usize) < ny && occupied[[i as usize, j as usize]]
    };

    //unit edges between grid vertices, directed with the occupied cell on the left
    let mut unit_edges: Vec<GridEdge> = vec![];
    for i in 0..nx as isize {
        for j in 0..=ny as isize {
            let (below, above) = (is_occupied(i, j - 1), is_occupied(i, j));
            match (below, above) {
                (false, true) => unit_edges.push(GridEdge::new((i, j), Dir::East)),
                (true, false) => unit_edges.push(GridEdge::new((i + 1, j), Dir::West)),
                _ => {}
            }
        }
    }
    for i in 0..=nx as isize {
        for j in 0..ny as isize {
            let (left, right) = (is_occupied(i - 1, j), is_occupied(i, j));
            match (left, right) {
                (false, true) => unit_edges.push(GridEdge::new((i, j + 1), Dir::South)),
                (true, false) => unit_edges.push(GridEdge::new((i, j), Dir::North)),
                _ => {}
            }
        }
    }

    let mut outgoing: HashMap<(isize, isize), Vec<usize>> = HashMap::new();
    for (idx, e) in unit_edges.iter().enumerate() {
        outgoing.entry(e.from).or_default().push(idx);
    }

    let mut used = vec![false; unit_edges.len()];
    let mut outlines = vec![];
    for first in 0..unit_edges.len() {
        if used[first] {
            continue;
        }
        let mut chain = vec![first];
        used[first] = true;
        let origin = unit_edges[first].from;
        let mut current = first;
        while unit_edges[current].to() != origin {
            let incoming = unit_edges[current].dir;
            let next = outgoing
                .get(&unit_edges[current].to())
                .into_iter()
                .flatten()
                .copied()
                .filter(|&idx| !used[idx])
                .min_by_key(|&idx| incoming.turn_priority(unit_edges[idx].dir));
            match next {
                Some(next) => {
                    used[next] = true;
                    chain.push(next);
                    current = next;
                }
                //every grid vertex has as many incoming as outgoing edges, the loop always closes
                None => unreachable!("open chain while tracing outline"),
            }
        }
        outlines.push(chain_to_outline(&chain, &unit_edges, &xs, &ys));
    }
    outlines
}

/// Sorted grid coordinates with near-duplicates merged
fn grid_lines(coords: impl Iterator<Item = f64>) -> Vec<f64> {
    coords
        .sorted_by(|a, b| a.total_cmp(b))
        .dedup_by(|a, b| (a - b).abs() < MERGE_TOLERANCE)
        .collect_vec()
}

fn grid_index(lines: &[f64], v: f64) -> usize {
    lines
        .iter()
        .position(|l| (l - v).abs() < MERGE_TOLERANCE)
        .unwrap_or_else(|| lines.partition_point(|l| *l < v))
}

/// Converts a closed chain of unit grid edges into an [`Outline`], merging collinear runs.
fn chain_to_outline(chain: &[usize], unit_edges: &[GridEdge], xs: &[f64], ys: &[f64]) -> Outline {
    //keep only the vertices where the direction changes
    let n = chain.len();
    let corners = (0..n)
        .filter(|&k| {
            let prev = unit_edges[chain[(k + n - 1) % n]].dir;
            unit_edges[chain[k]].dir != prev
        })
        .map(|k| unit_edges[chain[k]].from)
        .collect_vec();

    let to_point = |(i, j): (isize, isize)| Point(xs[i as usize], ys[j as usize]);
    let edges = corners
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| Edge::new(to_point(*a), to_point(*b)))
        .collect_vec();
    Outline { edges }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    East,
    North,
    West,
    South,
}

impl Dir {
    fn delta(self) -> (isize, isize) {
        match self {
            Dir::East => (1, 0),
            Dir::North => (0, 1),
            Dir::West => (-1, 0),
            Dir::South => (0, -1),
        }
    }

    fn index(self) -> u8 {
        match self {
            Dir::East => 0,
            Dir::North => 1,
            Dir::West => 2,
            Dir::South => 3,
        }
    }

    /// Lower is preferred: left turn, straight, right turn.
    /// Taking the left turn at a pinch vertex keeps diagonally touching regions in separate loops.
    fn turn_priority(self, next: Dir) -> u8 {
        match (next.index() + 4 - self.index()) % 4 {
            1 => 0,
            0 => 1,
            3 => 2,
            _ => 3,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct GridEdge {
    from: (isize, isize),
    dir: Dir,
}

impl GridEdge {
    fn new(from: (isize, isize), dir: Dir) -> Self {
        GridEdge { from, dir }
    }

    fn to(&self) -> (isize, isize) {
        let (dx, dy) = self.dir.delta();
        (self.from.0 + dx, self.from.1 + dy)
    }
}
