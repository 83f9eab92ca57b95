use std::sync::Arc;

use crate::entities::{
    Component, DisconnectedPackDirection, PackOrderStrategy, PackPlacementStrategy,
};
use crate::geometry::primitives::Rect;

/// A packing problem: the components to place and the rules to place them by.
/// Read-only for the duration of a packing run.
#[derive(Clone, Debug)]
pub struct PackInput {
    pub components: Vec<Arc<Component>>,
    /// Minimum clearance between any two placed components
    pub min_gap: f64,
    pub order_strategy: PackOrderStrategy,
    pub placement_strategy: PackPlacementStrategy,
    pub disconnected_direction: DisconnectedPackDirection,
    /// Ids of components to place before all others, in this order
    pub pack_first: Vec<String>,
    /// Hard limit on where components may be placed
    pub bounds: Option<Rect>,
}

impl PackInput {
    pub fn new(components: Vec<Component>, min_gap: f64) -> Self {
        PackInput {
            components: components.into_iter().map(Arc::new).collect(),
            min_gap,
            order_strategy: PackOrderStrategy::default(),
            placement_strategy: PackPlacementStrategy::default(),
            disconnected_direction: DisconnectedPackDirection::default(),
            pack_first: vec![],
            bounds: None,
        }
    }

    pub fn component(&self, idx: usize) -> &Arc<Component> {
        &self.components[idx]
    }

    pub fn component_by_id(&self, id: &str) -> Option<&Arc<Component>> {
        self.components.iter().find(|c| c.component_id == id)
    }
}
