use sheet_types::{BoundingBox, Point};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DxfError {
    #[error("No entities found in DXF file")]
    NoEntities,
    #[error("invalid group code {value:?} on line {line}")]
    InvalidGroupCode { line: usize, value: String },
    #[error("invalid number {value:?} for group code {code}")]
    InvalidNumber { code: i32, value: String },
    #[error("DXF file ends in the middle of a group")]
    Truncated,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl Vertex {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Drawing entities the storefront understands. Angles stay in degrees as the file stores them.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Line {
        start: Point,
        end: Point,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Ellipse {
        center: Point,
        major_axis: Point,
        axis_ratio: f64,
    },
    /// Closed polylines always repeat their first vertex at the end.
    Polyline {
        vertices: Vec<Vertex>,
        closed: bool,
    },
    Spline {
        control_points: Vec<Point>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedDxf {
    pub entities: Vec<Entity>,
    pub bounding_box: BoundingBox,
    pub width: f64,
    pub height: f64,
}

type Group = (i32, String);

pub fn parse_dxf(content: &str) -> Result<ParsedDxf, DxfError> {
    let groups = read_groups(content)?;
    let records = entity_records(&groups);

    let mut entities = Vec::new();
    let mut openPolyline: Option<(Vec<Vertex>, bool)> = None;

    for (kind, fields) in records {
        match kind {
            "POLYLINE" => {
                let flags = number(fields, 70)?.unwrap_or(0.0) as i64;
                openPolyline = Some((Vec::new(), flags & 1 == 1));
            }
            "VERTEX" => {
                if let Some((vertices, _)) = openPolyline.as_mut() {
                    vertices.push(Vertex {
                        x: number(fields, 10)?.unwrap_or(0.0),
                        y: number(fields, 20)?.unwrap_or(0.0),
                        bulge: number(fields, 42)?.unwrap_or(0.0),
                    });
                }
            }
            "SEQEND" => {
                if let Some((vertices, closed)) = openPolyline.take() {
                    entities.push(polyline(vertices, closed));
                }
            }
            other => {
                if let Some(entity) = simple_entity(other, fields)? {
                    entities.push(entity);
                }
            }
        }
    }

    if let Some((vertices, closed)) = openPolyline.take() {
        entities.push(polyline(vertices, closed));
    }

    if entities.is_empty() {
        return Err(DxfError::NoEntities);
    }

    let boundingBox = bounding_box(&entities);
    Ok(ParsedDxf {
        width: boundingBox.width(),
        height: boundingBox.height(),
        entities,
        bounding_box: boundingBox,
    })
}

fn read_groups(content: &str) -> Result<Vec<Group>, DxfError> {
    let mut lines = content.lines().enumerate();
    let mut groups = Vec::new();

    while let Some((index, codeLine)) = lines.next() {
        let codeText = codeLine.trim();
        if codeText.is_empty() {
            continue;
        }
        let code = codeText
            .parse::<i32>()
            .map_err(|_| DxfError::InvalidGroupCode {
                line: index + 1,
                value: codeText.to_string(),
            })?;
        let (_, value) = lines.next().ok_or(DxfError::Truncated)?;
        groups.push((code, value.trim().to_string()));
    }

    Ok(groups)
}

/// Splits the ENTITIES section into `(type, fields)` records.
fn entity_records(groups: &[Group]) -> Vec<(&str, &[Group])> {
    let mut records = Vec::new();
    let mut inEntities = false;
    let mut index = 0;

    while index < groups.len() {
        let (code, value) = &groups[index];

        if *code == 0 && value == "SECTION" {
            inEntities = matches!(groups.get(index + 1), Some((2, name)) if name == "ENTITIES");
            index += 1;
            continue;
        }
        if *code == 0 && (value == "ENDSEC" || value == "EOF") {
            inEntities = false;
            index += 1;
            continue;
        }
        if !inEntities || *code != 0 {
            index += 1;
            continue;
        }

        let start = index + 1;
        let mut end = start;
        while end < groups.len() && groups[end].0 != 0 {
            end += 1;
        }
        records.push((value.as_str(), &groups[start..end]));
        index = end;
    }

    records
}

fn number(fields: &[Group], code: i32) -> Result<Option<f64>, DxfError> {
    match fields.iter().find(|(c, _)| *c == code) {
        Some((_, value)) => parse_number(code, value).map(Some),
        None => Ok(None),
    }
}

fn parse_number(code: i32, value: &str) -> Result<f64, DxfError> {
    value.parse::<f64>().map_err(|_| DxfError::InvalidNumber {
        code,
        value: value.to_string(),
    })
}

fn point(fields: &[Group], xCode: i32, yCode: i32) -> Result<Point, DxfError> {
    Ok(Point::new(
        number(fields, xCode)?.unwrap_or(0.0),
        number(fields, yCode)?.unwrap_or(0.0),
    ))
}

fn simple_entity(kind: &str, fields: &[Group]) -> Result<Option<Entity>, DxfError> {
    let entity = match kind {
        "LINE" => Entity::Line {
            start: point(fields, 10, 20)?,
            end: point(fields, 11, 21)?,
        },
        "CIRCLE" => Entity::Circle {
            center: point(fields, 10, 20)?,
            radius: number(fields, 40)?.unwrap_or(0.0),
        },
        "ARC" => Entity::Arc {
            center: point(fields, 10, 20)?,
            radius: number(fields, 40)?.unwrap_or(0.0),
            start_angle: number(fields, 50)?.unwrap_or(0.0),
            end_angle: number(fields, 51)?.unwrap_or(360.0),
        },
        "ELLIPSE" => Entity::Ellipse {
            center: point(fields, 10, 20)?,
            major_axis: point(fields, 11, 21)?,
            axis_ratio: number(fields, 40)?.unwrap_or(1.0),
        },
        "LWPOLYLINE" => lw_polyline(fields)?,
        "SPLINE" => {
            let mut controlPoints: Vec<Point> = Vec::new();
            for (code, value) in fields {
                match code {
                    10 => controlPoints.push(Point::new(parse_number(10, value)?, 0.0)),
                    20 => {
                        if let Some(last) = controlPoints.last_mut() {
                            last.y = parse_number(20, value)?;
                        }
                    }
                    _ => {}
                }
            }
            Entity::Spline {
                control_points: controlPoints,
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(entity))
}

fn lw_polyline(fields: &[Group]) -> Result<Entity, DxfError> {
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut closed = false;

    for (code, value) in fields {
        match code {
            70 => closed = (parse_number(70, value)? as i64) & 1 == 1,
            10 => vertices.push(Vertex {
                x: parse_number(10, value)?,
                y: 0.0,
                bulge: 0.0,
            }),
            20 => {
                if let Some(last) = vertices.last_mut() {
                    last.y = parse_number(20, value)?;
                }
            }
            42 => {
                if let Some(last) = vertices.last_mut() {
                    last.bulge = parse_number(42, value)?;
                }
            }
            _ => {}
        }
    }

    Ok(polyline(vertices, closed))
}

fn polyline(mut vertices: Vec<Vertex>, closed: bool) -> Entity {
    if closed && vertices.len() >= 2 {
        let first = vertices[0];
        let last = vertices[vertices.len() - 1];
        if first.x != last.x || first.y != last.y {
            vertices.push(Vertex { bulge: 0.0, ..first });
        }
    }
    Entity::Polyline { vertices, closed }
}

fn bounding_box(entities: &[Entity]) -> BoundingBox {
    let mut bounds = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    let mut expand = |x: f64, y: f64| {
        bounds.min_x = bounds.min_x.min(x);
        bounds.min_y = bounds.min_y.min(y);
        bounds.max_x = bounds.max_x.max(x);
        bounds.max_y = bounds.max_y.max(y);
    };

    for entity in entities {
        match entity {
            Entity::Line { start, end } => {
                expand(start.x, start.y);
                expand(end.x, end.y);
            }
            Entity::Circle { center, radius } | Entity::Arc { center, radius, .. } => {
                expand(center.x - radius, center.y - radius);
                expand(center.x + radius, center.y + radius);
            }
            Entity::Ellipse {
                center, major_axis, ..
            } => {
                let major = major_axis.x.hypot(major_axis.y);
                expand(center.x - major, center.y - major);
                expand(center.x + major, center.y + major);
            }
            Entity::Polyline { vertices, .. } => {
                for v in vertices {
                    expand(v.x, v.y);
                }
            }
            Entity::Spline { control_points } => {
                for p in control_points {
                    expand(p.x, p.y);
                }
            }
        }
    }

    if !bounds.min_x.is_finite() {
        return BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        };
    }
    bounds
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Wraps entity groups in a minimal ENTITIES section.
    pub(crate) fn dxf(body: &str) -> String {
        format!("0\nSECTION\n2\nENTITIES\n{body}0\nENDSEC\n0\nEOF\n")
    }

    #[test]
    fn parses_lines_and_bounding_box() {
        let content = dxf("0\nLINE\n8\n0\n10\n-10\n20\n5\n11\n30\n21\n25\n");
        let parsed = parse_dxf(&content).unwrap();

        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.bounding_box.min_x, -10.0);
        assert_eq!(parsed.bounding_box.max_y, 25.0);
        assert_eq!(parsed.width, 40.0);
        assert_eq!(parsed.height, 20.0);
    }

    #[test]
    fn closed_lwpolyline_repeats_first_vertex() {
        let content = dxf(
            "0\nLWPOLYLINE\n90\n3\n70\n1\n10\n0\n20\n0\n10\n10\n20\n0\n42\n0.5\n10\n10\n20\n10\n",
        );
        let parsed = parse_dxf(&content).unwrap();

        match &parsed.entities[0] {
            Entity::Polyline { vertices, closed } => {
                assert!(closed);
                assert_eq!(vertices.len(), 4);
                assert_eq!(vertices[1].bulge, 0.5);
                assert_eq!((vertices[3].x, vertices[3].y), (0.0, 0.0));
            }
            other => panic!("unexpected entity {other:?}"),
        }
    }

    #[test]
    fn assembles_heavy_polyline_from_vertices() {
        let content = dxf(
            "0\nPOLYLINE\n66\n1\n70\n0\n0\nVERTEX\n10\n0\n20\n0\n0\nVERTEX\n10\n5\n20\n5\n0\nSEQEND\n",
        );
        let parsed = parse_dxf(&content).unwrap();

        assert_eq!(parsed.entities.len(), 1);
        assert!(matches!(
            &parsed.entities[0],
            Entity::Polyline { vertices, closed: false } if vertices.len() == 2
        ));
    }

    #[test]
    fn skips_unknown_entities_and_other_sections() {
        let content = format!(
            "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1015\n0\nENDSEC\n{}",
            dxf("0\nTEXT\n1\nhello\n0\nCIRCLE\n10\n5\n20\n5\n40\n2\n")
        );
        let parsed = parse_dxf(&content).unwrap();

        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.bounding_box.min_x, 3.0);
    }

    #[test]
    fn rejects_empty_drawings() {
        let err = parse_dxf(&dxf("0\nTEXT\n1\nonly text\n")).unwrap_err();
        assert_eq!(err, DxfError::NoEntities);
        assert_eq!(err.to_string(), "No entities found in DXF file");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_dxf("not a dxf\nfile\n"),
            Err(DxfError::InvalidGroupCode { line: 1, .. })
        ));
        assert!(matches!(
            parse_dxf(&dxf("0\nCIRCLE\n40\nwide\n")),
            Err(DxfError::InvalidNumber { code: 40, .. })
        ));
    }

    #[test]
    fn spline_without_points_uses_default_box() {
        let parsed = parse_dxf(&dxf("0\nSPLINE\n71\n3\n")).unwrap();
        assert_eq!(parsed.width, 100.0);
        assert_eq!(parsed.height, 100.0);
    }
}
