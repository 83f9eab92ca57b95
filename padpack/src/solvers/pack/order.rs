use std::cmp::Reverse;

use itertools::Itertools;
use log::warn;
use ordered_float::OrderedFloat;

use crate::entities::{PackInput, PackOrderStrategy};

/// Indices of the input components in the order they will be placed.
///
/// Components listed in `pack_first` come first, in the listed order.
/// The remaining components follow the input's [`PackOrderStrategy`].
pub fn pack_order(input: &PackInput) -> Vec<usize> {
    let mut order = vec![];
    for id in &input.pack_first {
        match input.components.iter().position(|c| &c.component_id == id) {
            Some(idx) if !order.contains(&idx) => order.push(idx),
            Some(_) => warn!("[PACK] component {id} listed more than once to be packed first"),
            None => warn!("[PACK] component {id} listed to be packed first does not exist"),
        }
    }

    let remaining = (0..input.components.len()).filter(|idx| !order.contains(idx));
    let remaining = match input.order_strategy {
        PackOrderStrategy::FirstToLast => remaining.collect_vec(),
        PackOrderStrategy::LargestToSmallest => remaining
            .sorted_by_cached_key(|&idx| {
                let c = input.component(idx);
                Reverse((c.pads.len(), OrderedFloat(c.footprint_area())))
            })
            .collect_vec(),
    };
    order.extend(remaining);
    order
}
