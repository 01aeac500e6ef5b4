/// Drawable primitives produced by the generators
use nalgebra::{Point2, Point3};

/// Which family of torus loops a curve belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// Loop around the tube at a fixed major angle
    Meridian,
    /// Loop around the main ring at a fixed minor angle
    Parallel,
}

/// A projected polyline with a single depth sample
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub kind: CurveKind,
    pub path: Vec<Point2<f64>>,
    pub depth: f64,
}

/// One side of an axis-aligned block.
///
/// Left and right are the two vertical faces turned toward the isometric
/// viewer (normals +y and +x). Back and front are their opposites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Bottom,
    Back,
    Front,
    Left,
    Right,
    Top,
}

impl FaceKind {
    /// Every face, hidden ones first
    pub const ALL: [FaceKind; 6] = [
        FaceKind::Bottom,
        FaceKind::Back,
        FaceKind::Front,
        FaceKind::Left,
        FaceKind::Right,
        FaceKind::Top,
    ];

    /// Faces that can be seen from the fixed isometric camera
    pub const VISIBLE: [FaceKind; 3] = [FaceKind::Left, FaceKind::Right, FaceKind::Top];

    /// Whether the face normal points toward the isometric viewer
    pub fn faces_viewer(self) -> bool {
        matches!(self, FaceKind::Left | FaceKind::Right | FaceKind::Top)
    }

    pub fn class_name(self) -> &'static str {
        match self {
            FaceKind::Bottom => "face-bottom",
            FaceKind::Back => "face-back",
            FaceKind::Front => "face-front",
            FaceKind::Left => "face-left",
            FaceKind::Right => "face-right",
            FaceKind::Top => "face-top",
        }
    }
}

/// A projected quadrilateral face of a block
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    pub corners: [Point2<f64>; 4],
    pub depth: f64,
    pub fill: String,
    /// Set when the block sits on the edge of its layer's grid and the
    /// layer draws borders
    pub border: bool,
    /// Index of the layer that produced this face
    pub layer: usize,
    /// Minimum corner of the owning block in object space
    pub origin: Point3<f64>,
}

/// Anything the renderer can draw
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Curve(Curve),
    Face(Face),
}

impl Primitive {
    pub fn points(&self) -> &[Point2<f64>] {
        match self {
            Primitive::Curve(curve) => &curve.path,
            Primitive::Face(face) => &face.corners,
        }
    }
}

impl From<Curve> for Primitive {
    fn from(curve: Curve) -> Self {
        Primitive::Curve(curve)
    }
}

impl From<Face> for Primitive {
    fn from(face: Face) -> Self {
        Primitive::Face(face)
    }
}

/// Screen-space bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds2 {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    fn include(&mut self, p: &Point2<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }
}

/// Calculate the bounding box of a set of primitives
pub fn bounds<'a, I>(primitives: I) -> Option<Bounds2>
where
    I: IntoIterator<Item = &'a Primitive>,
{
    let mut result: Option<Bounds2> = None;
    for point in primitives.into_iter().flat_map(|p| p.points()) {
        match result.as_mut() {
            Some(b) => b.include(point),
            None => {
                result = Some(Bounds2 {
                    min: *point,
                    max: *point,
                })
            }
        }
    }
    result
}
