use serde::{Deserialize, Serialize};

use crate::entities::{DisconnectedPackDirection, PackOrderStrategy, PackPlacementStrategy};

/// A point, or a two-dimensional size
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ExtPoint {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned box
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// External representation of a [`Pad`](crate::entities::Pad).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtPad {
    pub pad_id: String,
    pub network_id: String,
    /// Offset of the pad's center from the component's center
    pub offset: ExtPoint,
    pub size: ExtPoint,
}

/// External representation of a [`Component`](crate::entities::Component).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtComponent {
    pub component_id: String,
    pub pads: Vec<ExtPad>,
    /// Allowed counter-clockwise rotations in degrees, 0, 90, 180 and 270 if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_rotation_degrees: Option<Vec<f64>>,
    /// Body footprint relative to the component's center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_bounds: Option<ExtBounds>,
}

/// External representation of a [`PackInput`](crate::entities::PackInput).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtPackInput {
    pub components: Vec<ExtComponent>,
    #[serde(default)]
    pub min_gap: f64,
    #[serde(default)]
    pub pack_order_strategy: PackOrderStrategy,
    #[serde(default)]
    pub pack_placement_strategy: PackPlacementStrategy,
    #[serde(default)]
    pub disconnected_pack_direction: DisconnectedPackDirection,
    /// Ids of the components to be placed before all others
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pack_first: Vec<String>,
    /// Hard limit on where components may be placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<ExtBounds>,
}

/// External representation of a [`PlacedPad`](crate::entities::PlacedPad).
/// Its size is the rotated size of the pad.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtPlacedPad {
    #[serde(flatten)]
    pub pad: ExtPad,
    pub absolute_center: ExtPoint,
}

/// External representation of a [`PlacedComponent`](crate::entities::PlacedComponent).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtPlacedComponent {
    pub component_id: String,
    pub center: ExtPoint,
    pub ccw_rotation_offset: f64,
    pub pads: Vec<ExtPlacedPad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_rotation_degrees: Option<Vec<f64>>,
    /// Body footprint relative to the component's center, unrotated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_bounds: Option<ExtBounds>,
}

/// External representation of a [`PackOutput`](crate::entities::PackOutput).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtPackOutput {
    /// The placed components, in placement order
    pub components: Vec<ExtPlacedComponent>,
    /// Ids of the input components that could not be placed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<String>,
    pub min_gap: f64,
    pub pack_order_strategy: PackOrderStrategy,
    pub pack_placement_strategy: PackPlacementStrategy,
    pub disconnected_pack_direction: DisconnectedPackDirection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pack_first: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<ExtBounds>,
    pub iterations: usize,
    pub rejected_candidates: usize,
}
