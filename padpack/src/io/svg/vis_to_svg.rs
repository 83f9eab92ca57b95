use svg::Document;
use svg::node::element::{Group, Text, Title};

use crate::geometry::primitives::{Edge, Point, Rect};
use crate::io::svg::svg_util;
use crate::util::Visualization;

/// Renders a solver's diagnostic snapshot
pub fn visualization_to_svg(vis: &Visualization) -> Document {
    let bbox = vis
        .bbox()
        .unwrap_or(Rect::from_center(Point::ORIGIN, 1.0, 1.0));
    let vbox = svg_util::view_box(&bbox, 0.05);
    let stroke_width = f64::max(f64::min(vbox.2, vbox.3) * 0.002, 1e-3);
    let font_size = f64::min(vbox.2, vbox.3) * 0.02;

    let mut rects = Group::new().set("id", "rects");
    for r in &vis.rects {
        let rect = Rect {
            x_min: r.x_min,
            y_min: r.y_min,
            x_max: r.x_min + r.width,
            y_max: r.y_min + r.height,
        };
        let mut svg_rect = svg_util::rect(
            &rect,
            &[
                ("fill", r.fill.as_deref().unwrap_or("none")),
                ("stroke", r.stroke.as_deref().unwrap_or("none")),
                ("stroke-width", &*format!("{stroke_width}")),
            ],
        );
        if let Some(label) = &r.label {
            svg_rect = svg_rect.add(Title::new(label.as_str()));
        }
        rects = rects.add(svg_rect);
    }

    let mut lines = Group::new().set("id", "lines");
    for l in &vis.lines {
        let color = l.color.as_deref().unwrap_or("black");
        let dash = match l.dashed {
            true => format!("{} {}", 2.0 * stroke_width, 2.0 * stroke_width),
            false => "none".to_string(),
        };
        for (start, end) in l.points.iter().zip(l.points.iter().skip(1)) {
            let edge = Edge::new((*start).into(), (*end).into());
            lines = lines.add(svg_util::data_to_path(
                svg_util::edge_data(edge),
                &[
                    ("fill", "none"),
                    ("stroke", color),
                    ("stroke-width", &*format!("{stroke_width}")),
                    ("stroke-dasharray", &dash),
                    ("stroke-linecap", "round"),
                ],
            ));
        }
    }

    let mut circles = Group::new().set("id", "circles");
    for c in &vis.circles {
        circles = circles.add(svg_util::circle(
            c.center.into(),
            c.radius,
            &[
                ("fill", "none"),
                ("stroke", c.color.as_deref().unwrap_or("black")),
                ("stroke-width", &*format!("{stroke_width}")),
            ],
        ));
    }

    let mut points = Group::new().set("id", "points");
    for p in &vis.points {
        let mut svg_point =
            svg_util::point(p.position.into(), p.color.as_deref(), Some(3.0 * stroke_width));
        if let Some(label) = &p.label {
            svg_point = svg_point.add(Title::new(label.as_str()));
        }
        points = points.add(svg_point);
    }

    let mut labels = Group::new().set("id", "labels");
    for l in &vis.labels {
        labels = labels.add(
            Text::new(l.text.as_str())
                .set("x", l.position.0)
                .set("y", l.position.1)
                .set("font-size", font_size)
                .set("font-family", "monospace")
                .set("text-anchor", "middle"),
        );
    }

    let mut document = Document::new()
        .set("viewBox", vbox)
        .add(rects)
        .add(lines)
        .add(circles)
        .add(points)
        .add(labels);
    if let Some(title) = &vis.title {
        document = document.add(Title::new(title.as_str()));
    }
    document
}
