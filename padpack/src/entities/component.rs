use itertools::Itertools;

use crate::entities::Pad;
use crate::geometry::primitives::{Point, Rect};
use crate::geometry::rotation::{rotate_extents, rotate_point, rotate_rect};

/// Rotations used when a component does not specify any
pub const DEFAULT_ROTATIONS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Component to be placed: a rigid cluster of pads with an optional body footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub component_id: String,
    pub pads: Vec<Pad>,
    /// Counter-clockwise rotations (in degrees) the component may be placed in, never empty
    rotations: Vec<f64>,
    /// Body (silkscreen) footprint relative to the component's center, may exceed the pads
    pub body_bounds: Option<Rect>,
}

impl Component {
    pub fn new(
        component_id: impl Into<String>,
        pads: Vec<Pad>,
        rotations: Option<Vec<f64>>,
        body_bounds: Option<Rect>,
    ) -> Self {
        let rotations = match rotations {
            Some(r) if !r.is_empty() => r,
            _ => DEFAULT_ROTATIONS.to_vec(),
        };
        Component {
            component_id: component_id.into(),
            pads,
            rotations,
            body_bounds,
        }
    }

    /// Counter-clockwise rotations (in degrees) the component may be placed in.
    /// Never empty, the first one is the preferred rotation.
    pub fn rotations(&self) -> &[f64] {
        &self.rotations
    }

    /// Distinct networks of the component's pads, in order of first appearance
    pub fn networks(&self) -> Vec<&str> {
        self.pads
            .iter()
            .map(|p| p.network_id.as_str())
            .unique()
            .collect_vec()
    }

    /// Largest half-dimension over all pads, 0 for a component without pads
    pub fn max_pad_half_size(&self) -> f64 {
        self.pads
            .iter()
            .map(|p| p.max_half_size())
            .fold(0.0, f64::max)
    }

    /// Bounds of every pad and the body, relative to the center, after rotating by `rotation` degrees
    pub fn local_shape_rects(&self, rotation: f64) -> Vec<Rect> {
        let pads = self.pads.iter().map(|p| {
            let (w, h) = rotate_extents(p.width, p.height, rotation);
            Rect::from_center(rotate_point(p.offset, rotation), w, h)
        });
        let body = self.body_bounds.map(|b| rotate_rect(&b, rotation));
        pads.chain(body).collect_vec()
    }

    /// Bounding box of the pads and body relative to the center, after rotating by `rotation` degrees.
    /// A component without any shapes has a point-like footprint at its center.
    pub fn footprint(&self, rotation: f64) -> Rect {
        self.local_shape_rects(rotation)
            .into_iter()
            .reduce(Rect::bounding_rect)
            .unwrap_or(Rect::from_center(Point::ORIGIN, 0.0, 0.0))
    }

    /// Area of the unrotated footprint
    pub fn footprint_area(&self) -> f64 {
        self.footprint(0.0).area()
    }
}
