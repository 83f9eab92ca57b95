use crate::geometry::primitives::{Point, Rect};

/// Rectangular pad of a [`Component`](crate::entities::Component), defined relative to the component's center.
#[derive(Clone, Debug, PartialEq)]
pub struct Pad {
    pub pad_id: String,
    /// Electrical network of the pad, pads sharing a network should end up close together
    pub network_id: String,
    /// Offset of the pad's center from the component's center (unrotated)
    pub offset: Point,
    pub width: f64,
    pub height: f64,
}

impl Pad {
    /// Unrotated bounds of the pad, relative to the component's center
    pub fn local_bounds(&self) -> Rect {
        Rect::from_center(self.offset, self.width, self.height)
    }

    /// Half of the largest dimension of the pad
    pub fn max_half_size(&self) -> f64 {
        f64::max(self.width, self.height) / 2.0
    }
}
