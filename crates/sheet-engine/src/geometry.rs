use std::f64::consts::PI;

use crate::dxf::{Entity, ParsedDxf, Vertex};

/// Endpoints closer than this are treated as coincident.
pub const CLOSE_TOLERANCE: f64 = 0.001;

pub fn is_closed(vertices: &[Vertex]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let first = vertices[0];
    let last = vertices[vertices.len() - 1];
    (first.x - last.x).abs() < CLOSE_TOLERANCE && (first.y - last.y).abs() < CLOSE_TOLERANCE
}

/// Material area in mm²: the outer closed contour or circle if there is one, else the bounding box.
pub fn compute_area(parsed: &ParsedDxf) -> f64 {
    for entity in &parsed.entities {
        match entity {
            Entity::Polyline { vertices, .. } if is_closed(vertices) => {
                let area = shoelace_area(vertices);
                if area > 0.0 {
                    return area;
                }
            }
            Entity::Circle { radius, .. } => return PI * radius * radius,
            _ => {}
        }
    }
    parsed.width * parsed.height
}

fn shoelace_area(vertices: &[Vertex]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Total laser path length in mm.
pub fn compute_cut_length(parsed: &ParsedDxf) -> f64 {
    parsed.entities.iter().map(entity_length).sum()
}

fn entity_length(entity: &Entity) -> f64 {
    match entity {
        Entity::Line { start, end } => start.distance_to(end),
        Entity::Circle { radius, .. } => 2.0 * PI * radius,
        Entity::Arc {
            radius,
            start_angle,
            end_angle,
            ..
        } => {
            let mut sweep = end_angle - start_angle;
            if sweep < 0.0 {
                sweep += 360.0;
            }
            sweep / 360.0 * 2.0 * PI * radius
        }
        Entity::Ellipse {
            major_axis,
            axis_ratio,
            ..
        } => {
            let a = major_axis.x.hypot(major_axis.y);
            let b = a * if *axis_ratio == 0.0 { 1.0 } else { *axis_ratio };
            PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
        }
        Entity::Polyline { vertices, .. } => vertices
            .windows(2)
            .map(|pair| segment_length(&pair[0], &pair[1]))
            .sum(),
        Entity::Spline { control_points } => control_points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum(),
    }
}

/// Length of the segment leaving `from`, following its bulge arc when it has one.
pub fn segment_length(from: &Vertex, to: &Vertex) -> f64 {
    let chord = from.point().distance_to(&to.point());
    if from.bulge == 0.0 || chord == 0.0 {
        return chord;
    }
    let theta = 4.0 * from.bulge.abs().atan();
    chord * theta / (2.0 * (theta / 2.0).sin())
}
