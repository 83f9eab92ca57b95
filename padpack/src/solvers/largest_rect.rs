//! Largest axis-aligned rectangle lying outside a rectilinear outline and containing a given point.

use anyhow::Result;
use itertools::Itertools;
use log::debug;

use crate::geometry::primitives::{Edge, Point, Rect};
use crate::solvers::{Solver, SolverState};
use crate::util::Visualization;

/// Coordinates closer than this are considered equal
const COORD_TOLERANCE: f64 = 1e-9;
/// Shift applied to a slab's sample x when it coincides with a vertical edge
const SLAB_NUDGE: f64 = 1e-6;

#[derive(Clone, Copy, Debug)]
struct VerticalEdge {
    x: f64,
    y_min: f64,
    y_max: f64,
}

#[derive(Clone, Copy, Debug)]
struct HorizontalEdge {
    y: f64,
    x_min: f64,
    x_max: f64,
}

/// Vertical range of free space above and below the origin within a slab
#[derive(Clone, Copy, Debug)]
struct SlabSpan {
    bottom: f64,
    top: f64,
}

impl SlabSpan {
    const UNUSABLE: SlabSpan = SlabSpan {
        bottom: f64::INFINITY,
        top: f64::NEG_INFINITY,
    };
}

fn split_edges(edges: &[Edge]) -> (Vec<VerticalEdge>, Vec<HorizontalEdge>) {
    let mut verticals = vec![];
    let mut horizontals = vec![];
    for e in edges.iter().filter(|e| !e.is_degenerate()) {
        if e.is_vertical() {
            verticals.push(VerticalEdge {
                x: (e.start.0 + e.end.0) / 2.0,
                y_min: e.y_min(),
                y_max: e.y_max(),
            });
        } else if e.is_horizontal() {
            horizontals.push(HorizontalEdge {
                y: (e.start.1 + e.end.1) / 2.0,
                x_min: e.x_min(),
                x_max: e.x_max(),
            });
        }
    }
    (verticals, horizontals)
}

/// Free x-intervals at height `y` within `[x_lo, x_hi]`, following the even–odd rule
fn free_intervals_at(verticals: &[VerticalEdge], y: f64, x_lo: f64, x_hi: f64) -> Vec<(f64, f64)> {
    let crossings = verticals
        .iter()
        .filter(|v| v.y_min <= y && y < v.y_max)
        .map(|v| v.x)
        .sorted_by(|a, b| a.total_cmp(b))
        .collect_vec();

    let occupied = crossings
        .chunks_exact(2)
        .map(|c| (c[0].max(x_lo), c[1].min(x_hi)))
        .filter(|(a, b)| a < b)
        .collect_vec();

    let mut free = vec![];
    let mut cursor = x_lo;
    for (a, b) in occupied {
        if a > cursor {
            free.push((cursor, a));
        }
        cursor = cursor.max(b);
    }
    if cursor < x_hi {
        free.push((cursor, x_hi));
    }
    free
}

fn slab_span(x: f64, origin_y: f64, horizontals: &[HorizontalEdge], bounds: &Rect) -> SlabSpan {
    let mut top = bounds.y_max;
    let mut bottom = bounds.y_min;
    for h in horizontals.iter().filter(|h| h.x_min <= x && x <= h.x_max) {
        if h.y > origin_y {
            top = top.min(h.y);
        } else {
            bottom = bottom.max(h.y);
        }
    }
    match top > bottom {
        true => SlabSpan { bottom, top },
        false => SlabSpan::UNUSABLE,
    }
}

/// Computes the maximal-area axis-aligned rectangle containing `origin`, contained in `bounds`
/// and not overlapping the interior of the rectilinear outline formed by `edges`.
///
/// The edges may be given in any order, zero-length edges are ignored.
/// Returns `None` if `origin` lies inside the outline or outside `bounds`.
pub fn largest_rect_outside_outline(edges: &[Edge], origin: Point, bounds: Rect) -> Option<Rect> {
    let Point(ox, oy) = origin;
    if oy < bounds.y_min - COORD_TOLERANCE || oy > bounds.y_max + COORD_TOLERANCE {
        return None;
    }
    let (verticals, horizontals) = split_edges(edges);

    //free interval along the scanline through the origin
    let (x_l, x_r) = free_intervals_at(&verticals, oy, bounds.x_min, bounds.x_max)
        .into_iter()
        .find(|(a, b)| *a - COORD_TOLERANCE <= ox && ox <= *b + COORD_TOLERANCE)?;

    //partition the interval into slabs at every vertical edge within
    let boundaries = [x_l, x_r]
        .into_iter()
        .chain(
            verticals
                .iter()
                .map(|v| v.x)
                .filter(|x| *x > x_l + COORD_TOLERANCE && *x < x_r - COORD_TOLERANCE),
        )
        .sorted_by(|a, b| a.total_cmp(b))
        .dedup_by(|a, b| (a - b).abs() < COORD_TOLERANCE)
        .collect_vec();

    let spans = boundaries
        .iter()
        .tuple_windows()
        .map(|(a, b)| {
            let mut mid = (a + b) / 2.0;
            if verticals.iter().any(|v| (v.x - mid).abs() < COORD_TOLERANCE) {
                mid += SLAB_NUDGE;
            }
            slab_span(mid, oy, &horizontals, &bounds)
        })
        .collect_vec();

    //every contiguous run of slabs containing the origin's x
    let n = spans.len();
    let mut best: Option<Rect> = None;
    for i in (0..n).filter(|&i| boundaries[i] <= ox + COORD_TOLERANCE) {
        let (mut top, mut bottom) = (f64::INFINITY, f64::NEG_INFINITY);
        for j in i..n {
            top = top.min(spans[j].top);
            bottom = bottom.max(spans[j].bottom);
            if top - bottom <= 0.0 {
                //adding more slabs can only shrink the height further
                break;
            }
            if boundaries[j + 1] < ox - COORD_TOLERANCE {
                continue;
            }
            let candidate = Rect {
                x_min: boundaries[i],
                y_min: bottom,
                x_max: boundaries[j + 1],
                y_max: top,
            };
            if best.is_none_or(|b| candidate.area() > b.area()) {
                best = Some(candidate);
            }
        }
    }
    best
}

/// [`Solver`] wrapper around [`largest_rect_outside_outline`], computing the rectangle in a single step.
pub struct LargestRectSolver {
    state: SolverState,
    edges: Vec<Edge>,
    origin: Point,
    bounds: Rect,
    result: Option<Rect>,
}

impl LargestRectSolver {
    pub fn new(edges: Vec<Edge>, origin: Point, bounds: Rect) -> Self {
        LargestRectSolver {
            state: SolverState::default(),
            edges,
            origin,
            bounds,
            result: None,
        }
    }

    /// The largest rectangle, `None` until solved or if no rectangle exists
    pub fn result(&self) -> Option<Rect> {
        self.result
    }
}

impl Solver for LargestRectSolver {
    fn name(&self) -> &'static str {
        "LargestRectSolver"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn step_impl(&mut self) -> Result<()> {
        self.result = largest_rect_outside_outline(&self.edges, self.origin, self.bounds);
        if self.result.is_none() {
            debug!(
                "[RECT] no free rectangle around ({:.4}, {:.4})",
                self.origin.0, self.origin.1
            );
        }
        self.state.mark_solved();
        Ok(())
    }

    fn visualize(&self) -> Visualization {
        let mut vis = Visualization::with_title(self.name());
        for e in &self.edges {
            vis.add_edge(e, "black", false);
        }
        vis.add_rect(&self.bounds, None, Some("gray"), Some("bounds".to_string()));
        if let Some(r) = &self.result {
            vis.add_rect(r, Some("rgba(0,200,0,0.3)"), Some("green"), None);
        }
        vis.add_point(self.origin, "red", Some("origin".to_string()));
        vis
    }
}
