use itertools::Itertools;

use crate::entities::{Component, PackInput, PackOutput, Pad, PlacedComponent};
use crate::geometry::primitives::{Point, Rect};
use crate::io::ext_repr::{
    ExtBounds, ExtComponent, ExtPackInput, ExtPackOutput, ExtPad, ExtPlacedComponent,
    ExtPlacedPad, ExtPoint,
};

impl From<Point> for ExtPoint {
    fn from(p: Point) -> Self {
        ExtPoint { x: p.0, y: p.1 }
    }
}

pub fn export_bounds(r: &Rect) -> ExtBounds {
    ExtBounds {
        min_x: r.x_min,
        max_x: r.x_max,
        min_y: r.y_min,
        max_y: r.y_max,
    }
}

pub fn export_pad(pad: &Pad) -> ExtPad {
    ExtPad {
        pad_id: pad.pad_id.clone(),
        network_id: pad.network_id.clone(),
        offset: pad.offset.into(),
        size: ExtPoint {
            x: pad.width,
            y: pad.height,
        },
    }
}

pub fn export_component(c: &Component) -> ExtComponent {
    ExtComponent {
        component_id: c.component_id.clone(),
        pads: c.pads.iter().map(export_pad).collect_vec(),
        available_rotation_degrees: Some(c.rotations().to_vec()),
        body_bounds: c.body_bounds.as_ref().map(export_bounds),
    }
}

pub fn export_pack_input(input: &PackInput) -> ExtPackInput {
    ExtPackInput {
        components: input
            .components
            .iter()
            .map(|c| export_component(c))
            .collect_vec(),
        min_gap: input.min_gap,
        pack_order_strategy: input.order_strategy,
        pack_placement_strategy: input.placement_strategy,
        disconnected_pack_direction: input.disconnected_direction,
        pack_first: input.pack_first.clone(),
        bounds: input.bounds.as_ref().map(export_bounds),
    }
}

/// Exports a placed component, every pad carrying its rotated size and absolute center.
pub fn export_placed_component(pc: &PlacedComponent) -> ExtPlacedComponent {
    let component = pc.component();
    ExtPlacedComponent {
        component_id: component.component_id.clone(),
        center: pc.center().into(),
        ccw_rotation_offset: pc.rotation(),
        pads: pc
            .pads()
            .iter()
            .map(|p| ExtPlacedPad {
                pad: ExtPad {
                    pad_id: p.pad_id.clone(),
                    network_id: p.network_id.clone(),
                    offset: p.offset.into(),
                    size: ExtPoint {
                        x: p.width,
                        y: p.height,
                    },
                },
                absolute_center: p.absolute_center.into(),
            })
            .collect_vec(),
        available_rotation_degrees: Some(component.rotations().to_vec()),
        body_bounds: component.body_bounds.as_ref().map(export_bounds),
    }
}

pub fn export_pack_output(output: &PackOutput) -> ExtPackOutput {
    let input = &output.input;
    let unplaced = input
        .components
        .iter()
        .map(|c| c.component_id.clone())
        .filter(|id| output.placed_by_id(id).is_none())
        .collect_vec();
    ExtPackOutput {
        components: output
            .placed
            .iter()
            .map(export_placed_component)
            .collect_vec(),
        unplaced,
        min_gap: input.min_gap,
        pack_order_strategy: input.order_strategy,
        pack_placement_strategy: input.placement_strategy,
        disconnected_pack_direction: input.disconnected_direction,
        pack_first: input.pack_first.clone(),
        bounds: input.bounds.as_ref().map(export_bounds),
        iterations: output.iterations,
        rejected_candidates: output.n_rejected_candidates,
    }
}
