use std::collections::HashSet;

use anyhow::{Context, Result, ensure};
use itertools::Itertools;

use crate::entities::{Component, PackInput, Pad};
use crate::geometry::primitives::{Point, Rect};
use crate::io::ext_repr::{ExtBounds, ExtComponent, ExtPackInput, ExtPad, ExtPoint};

impl From<ExtPoint> for Point {
    fn from(p: ExtPoint) -> Self {
        Point(p.x, p.y)
    }
}

pub fn import_bounds(ext: &ExtBounds) -> Result<Rect> {
    Rect::try_new(ext.min_x, ext.min_y, ext.max_x, ext.max_y)
}

pub fn import_pad(ext: &ExtPad) -> Result<Pad> {
    ensure!(
        ext.size.x >= 0.0 && ext.size.y >= 0.0,
        "pad {} has a negative size: {} x {}",
        ext.pad_id,
        ext.size.x,
        ext.size.y
    );
    ensure!(
        Point::from(ext.offset).is_finite(),
        "pad {} has a non-finite offset",
        ext.pad_id
    );
    Ok(Pad {
        pad_id: ext.pad_id.clone(),
        network_id: ext.network_id.clone(),
        offset: ext.offset.into(),
        width: ext.size.x,
        height: ext.size.y,
    })
}

pub fn import_component(ext: &ExtComponent) -> Result<Component> {
    let pads = ext
        .pads
        .iter()
        .map(import_pad)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid pad in component {}", ext.component_id))?;
    if let Some(rotations) = &ext.available_rotation_degrees {
        ensure!(
            !rotations.is_empty(),
            "component {} has an empty list of available rotations",
            ext.component_id
        );
        ensure!(
            rotations.iter().all(|r| r.is_finite()),
            "component {} has a non-finite rotation",
            ext.component_id
        );
    }
    let body_bounds = ext
        .body_bounds
        .as_ref()
        .map(import_bounds)
        .transpose()
        .with_context(|| format!("invalid body bounds of component {}", ext.component_id))?;
    Ok(Component::new(
        ext.component_id.clone(),
        pads,
        ext.available_rotation_degrees.clone(),
        body_bounds,
    ))
}

/// Validates and converts an external pack input into a [`PackInput`].
pub fn import_pack_input(ext: &ExtPackInput) -> Result<PackInput> {
    ensure!(
        ext.min_gap >= 0.0 && ext.min_gap.is_finite(),
        "minimum gap must be finite and non-negative, got {}",
        ext.min_gap
    );
    let duplicates = ext
        .components
        .iter()
        .map(|c| c.component_id.as_str())
        .duplicates()
        .collect_vec();
    ensure!(duplicates.is_empty(), "duplicate component ids: {duplicates:?}");

    let ids: HashSet<&str> = ext.components.iter().map(|c| c.component_id.as_str()).collect();
    for id in &ext.pack_first {
        ensure!(
            ids.contains(id.as_str()),
            "component {id} listed to be packed first does not exist"
        );
    }

    let components = ext
        .components
        .iter()
        .map(import_component)
        .collect::<Result<Vec<_>>>()?;
    let bounds = ext
        .bounds
        .as_ref()
        .map(import_bounds)
        .transpose()
        .context("invalid pack bounds")?;

    let mut input = PackInput::new(components, ext.min_gap);
    input.order_strategy = ext.pack_order_strategy;
    input.placement_strategy = ext.pack_placement_strategy;
    input.disconnected_direction = ext.disconnected_pack_direction;
    input.pack_first = ext.pack_first.clone();
    input.bounds = bounds;
    Ok(input)
}
