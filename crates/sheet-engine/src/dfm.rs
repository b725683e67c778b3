//! Design-for-manufacturability checks against laser cutting limits.

use sheet_types::{DfmIssue, DfmIssueKind, DfmSeverity, DfmSummary, Point};

use crate::dxf::{Entity, ParsedDxf, Vertex};
use crate::geometry::is_closed;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DfmOptions {
    /// Material thickness in mm. Holes must be at least this wide.
    pub thickness: f64,
    pub min_feature_size: f64,
    /// Corners tighter than this many degrees need a relief cut.
    pub min_corner_angle: f64,
    pub max_aspect_ratio: f64,
}

impl DfmOptions {
    pub fn for_thickness(thickness: f64) -> Self {
        Self {
            thickness,
            min_feature_size: 0.5,
            min_corner_angle: 90.0,
            max_aspect_ratio: 10.0,
        }
    }
}

pub fn check_dfm(parsed: &ParsedDxf, options: &DfmOptions) -> Vec<DfmIssue> {
    let mut issues = Vec::new();

    for (index, entity) in parsed.entities.iter().enumerate() {
        issues.extend(check_hole_diameter(entity, index, options.thickness));
        issues.extend(check_min_feature_size(entity, index, options.min_feature_size));
        issues.extend(check_sharp_corners(entity, index, options.min_corner_angle));
        issues.extend(check_open_contour(entity, index));
    }
    issues.extend(check_aspect_ratio(parsed, options.max_aspect_ratio));

    issues
}

pub fn summarize(issues: &[DfmIssue]) -> DfmSummary {
    let errors = issues
        .iter()
        .filter(|i| i.severity == DfmSeverity::Error)
        .count();
    let warnings = issues
        .iter()
        .filter(|i| i.severity == DfmSeverity::Warning)
        .count();
    DfmSummary {
        errors,
        warnings,
        passed: errors == 0,
    }
}

fn warning(kind: DfmIssueKind, message: String) -> DfmIssue {
    DfmIssue {
        kind,
        severity: DfmSeverity::Warning,
        message,
        location: None,
        entity_index: None,
        value: None,
        limit: None,
    }
}

fn check_hole_diameter(entity: &Entity, index: usize, thickness: f64) -> Option<DfmIssue> {
    let Entity::Circle { center, radius } = entity else {
        return None;
    };
    let diameter = radius * 2.0;
    if diameter >= thickness {
        return None;
    }
    Some(DfmIssue {
        kind: DfmIssueKind::HoleTooSmall,
        severity: DfmSeverity::Error,
        message: format!(
            "Hole diameter ({diameter:.2}mm) is less than material thickness ({thickness}mm)"
        ),
        location: Some(*center),
        entity_index: Some(index),
        value: Some(diameter),
        limit: Some(thickness),
    })
}

fn check_min_feature_size(entity: &Entity, index: usize, minSize: f64) -> Vec<DfmIssue> {
    let small = |message: String, location: Point, value: f64| DfmIssue {
        location: Some(location),
        entity_index: Some(index),
        value: Some(value),
        limit: Some(minSize),
        ..warning(DfmIssueKind::FeatureTooSmall, message)
    };

    match entity {
        Entity::Circle { center, radius } if radius * 2.0 < minSize => {
            let diameter = radius * 2.0;
            vec![small(
                format!(
                    "Circle diameter ({diameter:.2}mm) is below minimum feature size ({minSize}mm)"
                ),
                *center,
                diameter,
            )]
        }
        Entity::Line { start, end } => {
            let length = start.distance_to(end);
            if length >= minSize {
                return Vec::new();
            }
            vec![small(
                format!("Line length ({length:.2}mm) is below minimum feature size ({minSize}mm)"),
                *start,
                length,
            )]
        }
        Entity::Polyline { vertices, .. } => vertices
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let length = pair[0].point().distance_to(&pair[1].point());
                (length > 0.0 && length < minSize).then(|| {
                    small(
                        format!(
                            "Polyline segment {} length ({length:.2}mm) is below minimum feature size ({minSize}mm)",
                            i + 1
                        ),
                        pair[0].point(),
                        length,
                    )
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn check_sharp_corners(entity: &Entity, index: usize, minAngle: f64) -> Vec<DfmIssue> {
    let Entity::Polyline { vertices, .. } = entity else {
        return Vec::new();
    };
    if vertices.len() < 3 {
        return Vec::new();
    }

    let sharp = |angle: f64, location: &Vertex, at: String| DfmIssue {
        location: Some(location.point()),
        entity_index: Some(index),
        value: Some(angle),
        limit: Some(minAngle),
        ..warning(
            DfmIssueKind::SharpCorner,
            format!("Sharp internal corner ({angle:.1}°) at {at}. Consider adding relief cut."),
        )
    };

    let mut issues = Vec::new();
    for (i, triple) in vertices.windows(3).enumerate() {
        let angle = corner_angle(&triple[0], &triple[1], &triple[2]);
        if angle < minAngle {
            issues.push(sharp(angle, &triple[1], format!("vertex {}", i + 2)));
        }
    }

    // The first vertex is also a corner once the contour wraps around.
    let n = vertices.len();
    if is_closed(vertices) && n >= 4 {
        let angle = corner_angle(&vertices[n - 2], &vertices[0], &vertices[1]);
        if angle < minAngle {
            issues.push(sharp(angle, &vertices[0], "closing vertex".to_string()));
        }
    }

    issues
}

fn check_open_contour(entity: &Entity, index: usize) -> Option<DfmIssue> {
    let Entity::Polyline { vertices, .. } = entity else {
        return None;
    };
    if vertices.len() < 3 || is_closed(vertices) {
        return None;
    }
    let first = vertices[0].point();
    let last = vertices[vertices.len() - 1].point();
    let gap = first.distance_to(&last);

    Some(DfmIssue {
        location: Some(last),
        entity_index: Some(index),
        value: Some(gap),
        ..warning(
            DfmIssueKind::OpenContour,
            format!("Polyline is not closed (gap: {gap:.2}mm). Part may not cut correctly."),
        )
    })
}

fn check_aspect_ratio(parsed: &ParsedDxf, maxRatio: f64) -> Option<DfmIssue> {
    if parsed.width == 0.0 || parsed.height == 0.0 {
        return None;
    }
    let ratio = (parsed.width / parsed.height).max(parsed.height / parsed.width);
    if ratio <= maxRatio {
        return None;
    }
    Some(DfmIssue {
        value: Some(ratio),
        limit: Some(maxRatio),
        ..warning(
            DfmIssueKind::HighAspectRatio,
            format!("High aspect ratio ({ratio:.1}:1) may cause heat warping. Consider splitting part."),
        )
    })
}

/// Angle at `b` between the segments to `a` and `c`, in degrees.
fn corner_angle(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    let (v1x, v1y) = (a.x - b.x, a.y - b.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);
    let mag1 = v1x.hypot(v1y);
    let mag2 = v2x.hypot(v2y);
    if mag1 == 0.0 || mag2 == 0.0 {
        return 180.0;
    }
    let cos = ((v1x * v2x + v1y * v2y) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dxf::parse_dxf;
    use crate::dxf::tests::dxf;

    fn issues(body: &str, thickness: f64) -> Vec<DfmIssue> {
        let parsed = parse_dxf(&dxf(body)).unwrap();
        check_dfm(&parsed, &DfmOptions::for_thickness(thickness))
    }

    fn lw(points: &[(f64, f64)], closed: bool) -> String {
        let mut body = format!("0\nLWPOLYLINE\n70\n{}\n", u8::from(closed));
        for (x, y) in points {
            body.push_str(&format!("10\n{x}\n20\n{y}\n"));
        }
        body
    }

    #[test]
    fn hole_smaller_than_thickness_is_an_error() {
        let found = issues("0\nCIRCLE\n10\n50\n20\n50\n40\n1\n", 3.0);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DfmIssueKind::HoleTooSmall);
        assert_eq!(found[0].severity, DfmSeverity::Error);
        assert_eq!(
            found[0].message,
            "Hole diameter (2.00mm) is less than material thickness (3mm)"
        );
        assert_eq!(found[0].location, Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn tiny_circle_is_both_error_and_small_feature() {
        let found = issues("0\nCIRCLE\n10\n0\n20\n0\n40\n0.1\n", 1.0);
        let kinds: Vec<_> = found.iter().map(|i| i.kind).collect();

        assert_eq!(kinds, vec![DfmIssueKind::HoleTooSmall, DfmIssueKind::FeatureTooSmall]);
        assert_eq!(summarize(&found), DfmSummary { errors: 1, warnings: 1, passed: false });
    }

    #[test]
    fn short_line_is_a_small_feature() {
        let found = issues("0\nLINE\n10\n0\n20\n0\n11\n0.3\n21\n0\n", 1.0);
        assert_eq!(found[0].kind, DfmIssueKind::FeatureTooSmall);
        assert!((found[0].value.unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn square_passes() {
        let found = issues(&lw(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)], true), 2.0);
        assert!(found.is_empty(), "{found:?}");
        assert!(summarize(&found).passed);
    }

    #[test]
    fn sharp_corner_is_reported() {
        let found = issues(&lw(&[(0.0, 0.0), (10.0, 0.0), (0.0, 2.0)], false), 1.0);
        let corner = found
            .iter()
            .find(|i| i.kind == DfmIssueKind::SharpCorner)
            .expect("corner issue");

        assert!(corner.value.unwrap() < 90.0);
        assert!(corner.message.contains("at vertex 2"));
    }

    #[test]
    fn closing_corner_of_closed_contour_is_checked() {
        // triangle whose only sharp corners include the start vertex
        let found = issues(&lw(&[(0.0, 0.0), (100.0, 10.0), (100.0, 0.0)], true), 1.0);
        assert!(found.iter().any(|i| i.message.contains("closing vertex")));
    }

    #[test]
    fn open_contour_reports_gap() {
        let found = issues(&lw(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (5.0, 5.0)], false), 1.0);
        let open = found
            .iter()
            .find(|i| i.kind == DfmIssueKind::OpenContour)
            .expect("open contour");

        assert!(open.message.contains("gap: 7.07mm"));
    }

    #[test]
    fn near_closed_contour_within_tolerance() {
        let found = issues(
            &lw(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0005, 0.0005)], false),
            1.0,
        );
        assert!(found.iter().all(|i| i.kind != DfmIssueKind::OpenContour));
    }

    #[test]
    fn long_thin_part_warns_about_aspect_ratio() {
        let found = issues("0\nLINE\n10\n0\n20\n0\n11\n500\n21\n20\n", 1.0);
        let aspect = found
            .iter()
            .find(|i| i.kind == DfmIssueKind::HighAspectRatio)
            .expect("aspect issue");

        assert_eq!(aspect.message, "High aspect ratio (25.0:1) may cause heat warping. Consider splitting part.");
    }
}
