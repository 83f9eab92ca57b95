use serde::Serialize;

use crate::geometry::primitives::{Edge, Point, Rect};

/// Diagnostic snapshot of a solver, made of simple geometric primitives.
/// Purely observational: nothing in the library reads it back.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Visualization {
    pub title: Option<String>,
    pub lines: Vec<VisLine>,
    pub points: Vec<VisPoint>,
    pub rects: Vec<VisRect>,
    pub circles: Vec<VisCircle>,
    pub labels: Vec<Label>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VisLine {
    pub points: Vec<(f64, f64)>,
    pub color: Option<String>,
    pub dashed: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct VisPoint {
    pub position: (f64, f64),
    pub color: Option<String>,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VisRect {
    pub x_min: f64,
    pub y_min: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VisCircle {
    pub center: (f64, f64),
    pub radius: f64,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Label {
    pub position: (f64, f64),
    pub text: String,
}

impl Visualization {
    pub fn with_title(title: impl Into<String>) -> Self {
        Visualization {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn add_edge(&mut self, edge: &Edge, color: &str, dashed: bool) {
        self.lines.push(VisLine {
            points: vec![edge.start.into(), edge.end.into()],
            color: Some(color.to_string()),
            dashed,
        });
    }

    pub fn add_point(&mut self, p: Point, color: &str, label: Option<String>) {
        self.points.push(VisPoint {
            position: p.into(),
            color: Some(color.to_string()),
            label,
        });
    }

    pub fn add_rect(&mut self, r: &Rect, fill: Option<&str>, stroke: Option<&str>, label: Option<String>) {
        self.rects.push(VisRect {
            x_min: r.x_min,
            y_min: r.y_min,
            width: r.width(),
            height: r.height(),
            fill: fill.map(str::to_string),
            stroke: stroke.map(str::to_string),
            label,
        });
    }

    pub fn add_circle(&mut self, center: Point, radius: f64, color: &str) {
        self.circles.push(VisCircle {
            center: center.into(),
            radius,
            color: Some(color.to_string()),
        });
    }

    pub fn add_label(&mut self, p: Point, text: impl Into<String>) {
        self.labels.push(Label {
            position: p.into(),
            text: text.into(),
        });
    }

    /// Appends all primitives of `other` to `self`
    pub fn merge(&mut self, other: Visualization) {
        self.lines.extend(other.lines);
        self.points.extend(other.points);
        self.rects.extend(other.rects);
        self.circles.extend(other.circles);
        self.labels.extend(other.labels);
    }

    /// Bounding box of every primitive, `None` for an empty snapshot
    pub fn bbox(&self) -> Option<Rect> {
        let line_pts = self.lines.iter().flat_map(|l| l.points.iter().copied());
        let pts = self.points.iter().map(|p| p.position);
        let rect_pts = self
            .rects
            .iter()
            .flat_map(|r| [(r.x_min, r.y_min), (r.x_min + r.width, r.y_min + r.height)]);
        let circle_pts = self.circles.iter().flat_map(|c| {
            let (x, y) = c.center;
            [(x - c.radius, y - c.radius), (x + c.radius, y + c.radius)]
        });
        let label_pts = self.labels.iter().map(|l| l.position);
        Rect::bounding_points(
            line_pts
                .chain(pts)
                .chain(rect_pts)
                .chain(circle_pts)
                .chain(label_pts)
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(Point::from),
        )
    }
}
