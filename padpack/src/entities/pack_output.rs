use crate::entities::{PackInput, PlacedComponent};

/// Result of a packing run: the input and the components placed so far, in placement order.
#[derive(Clone, Debug)]
pub struct PackOutput {
    pub input: PackInput,
    pub placed: Vec<PlacedComponent>,
    /// Total number of solver iterations used
    pub iterations: usize,
    /// Number of candidate placements that were evaluated and rejected
    pub n_rejected_candidates: usize,
}

impl PackOutput {
    pub fn placed_by_id(&self, id: &str) -> Option<&PlacedComponent> {
        self.placed.iter().find(|pc| pc.component_id() == id)
    }

    /// `true` if every input component has been placed
    pub fn is_complete(&self) -> bool {
        self.placed.len() == self.input.components.len()
    }
}
