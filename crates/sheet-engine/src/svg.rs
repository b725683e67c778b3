use crate::dxf::{Entity, ParsedDxf, Vertex};

/// SVG path data for the drawing, moved to the origin with the Y axis pointing down.
pub fn to_svg_path(parsed: &ParsedDxf) -> String {
    let frame = Frame {
        offsetX: parsed.bounding_box.min_x,
        offsetY: parsed.bounding_box.min_y,
        height: parsed.height,
    };

    parsed
        .entities
        .iter()
        .filter_map(|entity| frame.entity_path(entity))
        .collect::<Vec<_>>()
        .join(" ")
}

/// viewBox for a normalized path, padded by 5% of the larger side.
pub fn view_box(width: f64, height: f64) -> String {
    let padding = width.max(height) * 0.05;
    format!(
        "{} {} {} {}",
        -padding,
        -padding,
        width + padding * 2.0,
        height + padding * 2.0
    )
}

pub fn stroke_width(width: f64, height: f64) -> f64 {
    width.max(height) * 0.008
}

struct Frame {
    offsetX: f64,
    offsetY: f64,
    height: f64,
}

impl Frame {
    fn x(&self, x: f64) -> f64 {
        x - self.offsetX
    }

    fn y(&self, y: f64) -> f64 {
        self.height - (y - self.offsetY)
    }

    fn entity_path(&self, entity: &Entity) -> Option<String> {
        let path = match entity {
            Entity::Line { start, end } => format!(
                "M {} {} L {} {}",
                self.x(start.x),
                self.y(start.y),
                self.x(end.x),
                self.y(end.y)
            ),
            Entity::Circle { center, radius } => {
                let (cx, cy, r) = (self.x(center.x), self.y(center.y), *radius);
                format!(
                    "M {} {cy} A {r} {r} 0 1 0 {} {cy} A {r} {r} 0 1 0 {} {cy} Z",
                    cx - r,
                    cx + r,
                    cx - r
                )
            }
            Entity::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let r = *radius;
                let (sa, ea) = (start_angle.to_radians(), end_angle.to_radians());
                let mut sweep = end_angle - start_angle;
                if sweep < 0.0 {
                    sweep += 360.0;
                }
                let largeArc = u8::from(sweep > 180.0);
                // counter-clockwise in the drawing becomes clockwise once Y is flipped
                format!(
                    "M {} {} A {r} {r} 0 {largeArc} 1 {} {}",
                    self.x(center.x + r * sa.cos()),
                    self.y(center.y + r * sa.sin()),
                    self.x(center.x + r * ea.cos()),
                    self.y(center.y + r * ea.sin())
                )
            }
            Entity::Ellipse {
                center,
                major_axis,
                axis_ratio,
            } => {
                let (cx, cy) = (self.x(center.x), self.y(center.y));
                let major = major_axis.x.hypot(major_axis.y);
                let ratio = if *axis_ratio == 0.0 { 1.0 } else { *axis_ratio };
                let minor = major * ratio;
                let rotation = major_axis.y.atan2(major_axis.x).to_degrees();
                format!(
                    "M {} {cy} A {major} {minor} {rotation} 1 0 {} {cy} A {major} {minor} {rotation} 1 0 {} {cy} Z",
                    cx - major,
                    cx + major,
                    cx - major
                )
            }
            Entity::Polyline { vertices, .. } => self.polyline_path(vertices)?,
            Entity::Spline { control_points } => {
                if control_points.len() < 2 {
                    return None;
                }
                let pts: Vec<String> = control_points
                    .iter()
                    .map(|p| format!("{} {}", self.x(p.x), self.y(p.y)))
                    .collect();
                let mut parts = vec![format!("M {}", pts[0])];
                match pts.len() {
                    2 => parts.push(format!("L {}", pts[1])),
                    3 => parts.push(format!("Q {} {}", pts[1], pts[2])),
                    n => {
                        let mut i = 1;
                        while i < n - 2 {
                            let p2 = &pts[(i + 1).min(n - 1)];
                            let p3 = &pts[(i + 2).min(n - 1)];
                            parts.push(format!("C {} {p2} {p3}", pts[i]));
                            i += 3;
                        }
                    }
                }
                parts.join(" ")
            }
        };
        Some(path)
    }

    fn polyline_path(&self, vertices: &[Vertex]) -> Option<String> {
        let first = vertices.first()?;
        let mut parts = vec![format!("M {} {}", self.x(first.x), self.y(first.y))];

        for pair in vertices.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let (x, y) = (self.x(curr.x), self.y(curr.y));
            if prev.bulge == 0.0 {
                parts.push(format!("L {x} {y}"));
                continue;
            }
            let chord = prev.point().distance_to(&curr.point());
            let sagitta = prev.bulge.abs() * chord / 2.0;
            let r = if sagitta == 0.0 {
                0.0
            } else {
                chord * chord / (8.0 * sagitta) + sagitta / 2.0
            };
            let largeArc = u8::from(prev.bulge.abs() > 1.0);
            let sweep = u8::from(prev.bulge > 0.0);
            parts.push(format!("A {r} {r} 0 {largeArc} {sweep} {x} {y}"));
        }

        let last = vertices[vertices.len() - 1];
        if vertices.len() > 1 && first.x == last.x && first.y == last.y {
            parts.push("Z".to_string());
        }
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dxf::parse_dxf;
    use crate::dxf::tests::dxf;

    fn path(body: &str) -> String {
        to_svg_path(&parse_dxf(&dxf(body)).unwrap())
    }

    #[test]
    fn line_is_normalized_and_flipped() {
        assert_eq!(
            path("0\nLINE\n10\n10\n20\n10\n11\n20\n21\n30\n"),
            "M 0 20 L 10 0"
        );
    }

    #[test]
    fn circle_is_two_half_arcs() {
        assert_eq!(
            path("0\nCIRCLE\n10\n5\n20\n5\n40\n5\n"),
            "M 0 5 A 5 5 0 1 0 10 5 A 5 5 0 1 0 0 5 Z"
        );
    }

    #[test]
    fn closed_polyline_ends_with_z() {
        let svg = path("0\nLWPOLYLINE\n70\n1\n10\n0\n20\n0\n10\n10\n20\n0\n10\n10\n20\n10\n");
        assert_eq!(svg, "M 0 10 L 10 10 L 10 0 L 0 10 Z");
    }

    #[test]
    fn bulge_becomes_arc() {
        let svg = path("0\nLWPOLYLINE\n70\n0\n10\n0\n20\n0\n42\n1\n10\n10\n20\n0\n");
        assert!(svg.contains("A 5 5 0 0 1 10"), "{svg}");
    }

    #[test]
    fn view_box_pads_larger_side() {
        assert_eq!(view_box(200.0, 100.0), "-10 -10 220 120");
        assert_eq!(stroke_width(200.0, 100.0), 1.6);
    }
}
