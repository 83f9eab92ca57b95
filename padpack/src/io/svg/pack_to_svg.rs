use itertools::Itertools;
use svg::Document;
use svg::node::element::{Group, Text, Title};

use crate::collision::find_overlap;
use crate::entities::PackOutput;
use crate::geometry::primitives::{Edge, Point, Rect};
use crate::io::svg::svg_util;
use crate::io::svg::svg_util::SvgDrawOptions;

/// Renders the placed components of a [`PackOutput`], pads colored per network.
pub fn pack_output_to_svg(output: &PackOutput, options: &SvgDrawOptions, title: &str) -> Document {
    let theme = &options.theme;
    let placed = &output.placed;

    let bbox = placed
        .iter()
        .map(|pc| pc.footprint())
        .chain(output.input.bounds)
        .reduce(Rect::bounding_rect)
        .unwrap_or(Rect::from_center(Point::ORIGIN, 1.0, 1.0));
    let vbox = svg_util::view_box(&bbox, 0.05);
    let stroke_width =
        f64::min(vbox.2, vbox.3) * 0.001 * theme.stroke_width_multiplier;
    let font_size = f64::min(vbox.2, vbox.3) * 0.02;

    let networks = placed
        .iter()
        .flat_map(|pc| pc.pads())
        .map(|p| p.network_id.as_str())
        .unique()
        .collect_vec();

    let background = svg_util::rect(
        &bbox,
        &[
            ("fill", &*format!("{}", theme.background_fill)),
            ("stroke", "none"),
        ],
    );

    let mut bounds_group = Group::new().set("id", "bounds");
    if let Some(bounds) = &output.input.bounds {
        bounds_group = bounds_group.add(svg_util::rect(
            bounds,
            &[
                ("fill", "none"),
                ("stroke", &*format!("{}", theme.body_stroke)),
                ("stroke-width", &*format!("{}", 2.0 * stroke_width)),
                ("stroke-dasharray", &*format!("{}", 5.0 * stroke_width)),
            ],
        ));
    }

    let mut components_group = Group::new().set("id", "components");
    for pc in placed {
        let mut group = Group::new()
            .set("id", format!("component_{}", pc.component_id()))
            .add(Title::new(format!(
                "component, id: {}, center: ({:.3}, {:.3}), rotation: {}°",
                pc.component_id(),
                pc.center().0,
                pc.center().1,
                pc.rotation()
            )));
        if options.draw_bodies {
            if let Some(body) = pc.body_bounds() {
                group = group.add(svg_util::rect(
                    &body,
                    &[
                        ("fill", "none"),
                        ("stroke", &*format!("{}", theme.body_stroke)),
                        ("stroke-width", &*format!("{stroke_width}")),
                    ],
                ));
            }
        }
        for pad in pc.pads() {
            let net_idx = networks
                .iter()
                .position(|n| *n == pad.network_id)
                .unwrap_or(0);
            let fill = theme.network_fill(net_idx);
            group = group.add(
                svg_util::rect(
                    &pad.bounds(),
                    &[
                        ("fill", &*format!("{fill}")),
                        ("stroke", &*format!("{}", svg_util::change_brightness(fill, 0.5))),
                        ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
                    ],
                )
                .add(Title::new(format!(
                    "pad, id: {}, network: {}",
                    pad.pad_id, pad.network_id
                ))),
            );
        }
        if options.draw_labels {
            group = group.add(
                Text::new(pc.component_id())
                    .set("x", pc.center().0)
                    .set("y", pc.center().1)
                    .set("font-size", font_size)
                    .set("font-family", "monospace")
                    .set("text-anchor", "middle")
                    .set("fill", format!("{}", theme.body_stroke)),
            );
        }
        components_group = components_group.add(group);
    }

    let mut connections_group = Group::new().set("id", "connections");
    if options.draw_connections {
        for (i, pc) in placed.iter().enumerate() {
            for pad in pc.pads() {
                let nearest = placed
                    .iter()
                    .take(i)
                    .flat_map(|other| other.pads())
                    .filter(|other| other.network_id == pad.network_id)
                    .min_by(|a, b| {
                        let da = a.absolute_center.sq_distance(&pad.absolute_center);
                        let db = b.absolute_center.sq_distance(&pad.absolute_center);
                        da.total_cmp(&db)
                    });
                if let Some(nearest) = nearest {
                    let edge = Edge::new(pad.absolute_center, nearest.absolute_center);
                    connections_group = connections_group.add(svg_util::line(
                        edge,
                        &[
                            ("stroke", &*format!("{}", theme.connection_stroke)),
                            ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
                            ("stroke-opacity", "0.7"),
                            (
                                "stroke-dasharray",
                                &*format!("{} {}", stroke_width, 2.0 * stroke_width),
                            ),
                        ],
                    ));
                }
            }
        }
    }

    let mut overlap_group = Group::new().set("id", "overlaps");
    if options.highlight_overlaps {
        for (i, pc) in placed.iter().enumerate() {
            if let Some(report) = find_overlap(pc, &placed[..i], output.input.min_gap) {
                let other = &placed[report.placed_idx];
                for fp in [pc.footprint(), other.footprint()] {
                    overlap_group = overlap_group.add(
                        svg_util::rect(
                            &fp,
                            &[
                                ("fill", "none"),
                                ("stroke", &*format!("{}", theme.overlap_highlight_color)),
                                ("stroke-width", &*format!("{}", 2.0 * stroke_width)),
                            ],
                        )
                        .add(Title::new(format!("{}: {report}", pc.component_id()))),
                    );
                }
            }
        }
    }

    let label = Text::new(format!(
        "{} | {}/{} components placed | min gap: {}",
        title,
        placed.len(),
        output.input.components.len(),
        output.input.min_gap
    ))
    .set("x", bbox.x_min)
    .set("y", bbox.y_min - 0.5 * font_size)
    .set("font-size", font_size)
    .set("font-family", "monospace")
    .set("font-weight", "500");

    Document::new()
        .set("viewBox", vbox)
        .add(background)
        .add(bounds_group)
        .add(components_group)
        .add(connections_group)
        .add(overlap_group)
        .add(label)
}
