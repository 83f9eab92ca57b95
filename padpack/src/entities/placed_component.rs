use std::sync::Arc;

use itertools::Itertools;

use crate::entities::Component;
use crate::geometry::geo_traits::Translatable;
use crate::geometry::primitives::{Point, Rect};
use crate::geometry::rotation::{normalize_degrees, rotate_extents, rotate_point, rotate_rect};

/// A [`Pad`](crate::entities::Pad) of a placed component, with its absolute position derived from the component's placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPad {
    pub pad_id: String,
    pub network_id: String,
    /// Offset from the component's center, unrotated
    pub offset: Point,
    /// Width after rotation
    pub width: f64,
    /// Height after rotation
    pub height: f64,
    pub absolute_center: Point,
}

impl PlacedPad {
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.absolute_center, self.width, self.height)
    }
}

/// Represents a [`Component`] that has been placed at a specific center and rotation.
///
/// The pads' absolute centers and rotated dimensions are derived state,
/// they are recomputed whenever the center or rotation changes.
#[derive(Clone, Debug)]
pub struct PlacedComponent {
    component: Arc<Component>,
    center: Point,
    rotation: f64,
    pads: Vec<PlacedPad>,
    body_bounds: Option<Rect>,
}

impl PlacedComponent {
    pub fn new(component: Arc<Component>, center: Point, rotation: f64) -> Self {
        let mut pc = PlacedComponent {
            component,
            center,
            rotation: normalize_degrees(rotation),
            pads: vec![],
            body_bounds: None,
        };
        pc.recompute_pad_centers();
        pc
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn component_id(&self) -> &str {
        &self.component.component_id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Counter-clockwise rotation in degrees, within [0, 360)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn pads(&self) -> &[PlacedPad] {
        &self.pads
    }

    /// Absolute body bounds after rotation, if the component has a body
    pub fn body_bounds(&self) -> Option<Rect> {
        self.body_bounds
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
        self.recompute_pad_centers();
    }

    /// Clone of `self` moved to a new center
    pub fn moved_to(&self, center: Point) -> Self {
        let mut clone = self.clone();
        clone.set_center(center);
        clone
    }

    /// Re-derives the absolute pad centers, rotated pad dimensions and body bounds from the center and rotation.
    pub fn recompute_pad_centers(&mut self) {
        let (center, rotation) = (self.center, self.rotation);
        self.pads = self
            .component
            .pads
            .iter()
            .map(|p| {
                let (width, height) = rotate_extents(p.width, p.height, rotation);
                PlacedPad {
                    pad_id: p.pad_id.clone(),
                    network_id: p.network_id.clone(),
                    offset: p.offset,
                    width,
                    height,
                    absolute_center: center + rotate_point(p.offset, rotation),
                }
            })
            .collect_vec();
        self.body_bounds = self
            .component
            .body_bounds
            .map(|b| rotate_rect(&b, rotation).translate_clone(center));
    }

    /// Absolute bounds of every pad, followed by the body bounds if present
    pub fn shape_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.pads.iter().map(|p| p.bounds()).chain(self.body_bounds)
    }

    /// Absolute bounding box of all pads and the body
    pub fn footprint(&self) -> Rect {
        self.shape_rects()
            .reduce(Rect::bounding_rect)
            .unwrap_or(Rect::from_center(self.center, 0.0, 0.0))
    }

    /// `true` if any pad of the component is part of `network_id`
    pub fn has_network(&self, network_id: &str) -> bool {
        self.pads.iter().any(|p| p.network_id == network_id)
    }
}
