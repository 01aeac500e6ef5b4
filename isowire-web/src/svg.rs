/// SVG markup for draw lists
use std::fmt::{self, Write};

use isowire_core::{Curve, CurveKind, DrawList, Face, ViewBox};
use nalgebra::Point2;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const BORDER_STROKE: &str = "#0f172a";

/// Text placed next to a stack layer
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub anchor: Point2<f64>,
    pub text: String,
}

/// The `viewBox` attribute value for a view box
pub fn view_box_attr(view_box: &ViewBox) -> String {
    format!(
        "{} {} {} {}",
        view_box.min_x, view_box.min_y, view_box.width, view_box.height
    )
}

/// A complete `<svg>` element. Primitives appear in draw-list order so the
/// browser paints them back to front.
pub fn document(list: DrawList<'_>, view_box: &ViewBox, labels: &[Label]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_document(&mut out, list, view_box, labels);
    out
}

fn write_document(
    out: &mut String,
    list: DrawList<'_>,
    view_box: &ViewBox,
    labels: &[Label],
) -> fmt::Result {
    write!(
        out,
        r#"<svg xmlns="{}" viewBox="{}" preserveAspectRatio="xMidYMid meet">"#,
        SVG_NS,
        view_box_attr(view_box)
    )?;
    match list {
        DrawList::Curves(curves) => {
            let count = curves.len();
            for (rank, curve) in curves.iter().enumerate() {
                write_curve(out, curve, rank, count)?;
            }
        }
        DrawList::Faces(faces) => {
            for face in faces {
                write_face(out, face)?;
            }
        }
    }
    for label in labels {
        write!(
            out,
            r#"<text class="layer-label" x="{:.2}" y="{:.2}" dominant-baseline="middle">{}</text>"#,
            label.anchor.x,
            label.anchor.y,
            escape(&label.text)
        )?;
    }
    out.push_str("</svg>");
    Ok(())
}

/// Nearer curves get a stronger stroke
fn write_curve(out: &mut String, curve: &Curve, rank: usize, count: usize) -> fmt::Result {
    let Some((first, rest)) = curve.path.split_first() else {
        return Ok(());
    };
    let t = if count > 1 { rank as f64 / (count - 1) as f64 } else { 1.0 };
    let class = match curve.kind {
        CurveKind::Meridian => "meridian",
        CurveKind::Parallel => "parallel",
    };
    write!(out, r#"<path class="{}" d="M{:.2} {:.2}"#, class, first.x, first.y)?;
    for p in rest {
        write!(out, " L{:.2} {:.2}", p.x, p.y)?;
    }
    write!(
        out,
        r#"" fill="none" stroke="currentColor" stroke-opacity="{:.3}"/>"#,
        0.15 + 0.85 * t
    )
}

fn write_face(out: &mut String, face: &Face) -> fmt::Result {
    write!(out, r#"<polygon class="{}" points=""#, face.kind.class_name())?;
    for (i, p) in face.corners.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write!(out, "{:.2},{:.2}", p.x, p.y)?;
    }
    let stroke = if face.border { BORDER_STROKE } else { face.fill.as_str() };
    write!(
        out,
        r#"" fill="{}" stroke="{}" stroke-width="0.5"/>"#,
        escape(&face.fill),
        escape(stroke)
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use isowire_core::{FaceKind, RotationState, StackConfig, SurfaceConfig, TorusMesh};
    use nalgebra::Point3;

    #[test]
    fn test_view_box_attr() {
        assert_eq!(view_box_attr(&ViewBox::centered(400.0, 300.0)), "-200 -150 400 300");
    }

    #[test]
    fn test_curves_become_paths_in_order() {
        let mesh = TorusMesh::new(SurfaceConfig::new(3.0, 1.0, 4, 3));
        let curves = mesh.generate(&RotationState::zero());
        let svg = document(DrawList::Curves(&curves), &ViewBox::default(), &[]);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<path").count(), curves.len());
        let first_parallel = svg.find(r#"class="parallel""#).unwrap();
        let last_meridian = svg.rfind(r#"class="meridian""#).unwrap();
        assert!(last_meridian < first_parallel);
    }

    #[test]
    fn test_faces_become_polygons() {
        let faces = StackConfig::default().generate();
        let svg = document(DrawList::Faces(&faces), &ViewBox::default(), &[]);
        assert_eq!(svg.matches("<polygon").count(), faces.len());
        assert!(svg.contains(r#"class="face-top""#));
        assert!(svg.contains(&format!(r##"fill="{}""##, faces[0].fill)));
    }

    #[test]
    fn test_face_markup() {
        let face = Face {
            kind: FaceKind::Top,
            corners: [
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.5),
                Point2::new(0.0, 1.0),
                Point2::new(-1.0, 0.5),
            ],
            depth: 0.0,
            fill: "#60a5fa".to_string(),
            border: true,
            layer: 0,
            origin: Point3::origin(),
        };
        let mut out = String::new();
        write_face(&mut out, &face).unwrap();
        let expected = concat!(
            r#"<polygon class="face-top" points="0.00,0.00 1.00,0.50 0.00,1.00 -1.00,0.50""#,
            r##" fill="#60a5fa" stroke="#0f172a" stroke-width="0.5"/>"##,
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_labels_are_escaped() {
        let labels = [Label {
            anchor: Point2::new(10.0, -5.0),
            text: "cache <L2> & more".to_string(),
        }];
        let svg = document(DrawList::Faces(&[]), &ViewBox::default(), &labels);
        assert!(svg.contains(r#"x="10.00" y="-5.00""#));
        assert!(svg.contains("cache &lt;L2&gt; &amp; more"));
    }

    #[test]
    fn test_empty_curve_is_skipped() {
        let curve = Curve {
            kind: CurveKind::Meridian,
            path: Vec::new(),
            depth: 0.0,
        };
        let svg = document(DrawList::Curves(&[curve]), &ViewBox::default(), &[]);
        assert!(!svg.contains("<path"));
    }
}
