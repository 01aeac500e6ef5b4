/// ASCII renderer that paints draw lists into a character grid
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use isowire_core::{Curve, CurveKind, DrawList, Face, FaceKind, ViewBox};
use nalgebra::Point2;
use std::io::Write;

/// Character luminosity ramp for depth shading (farthest to nearest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Size of one terminal cell in view pixels
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

/// Painter's-algorithm renderer: later primitives overwrite earlier ones
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Paint a draw list. `center` is the view-space point placed at the
    /// middle of the view box.
    pub fn render(&mut self, list: DrawList<'_>, view_box: &ViewBox, center: Point2<f64>) {
        let mapping = Mapping::new(view_box, center);
        match list {
            DrawList::Curves(curves) => {
                let count = curves.len();
                for (rank, curve) in curves.iter().enumerate() {
                    self.render_curve(curve, rank, count, &mapping);
                }
            }
            DrawList::Faces(faces) => {
                for face in faces {
                    self.render_face(face, &mapping);
                }
            }
        }
    }

    /// Curves arrive back to front, so their rank doubles as a depth cue
    fn render_curve(&mut self, curve: &Curve, rank: usize, count: usize, mapping: &Mapping) {
        let t = if count > 1 { rank as f64 / (count - 1) as f64 } else { 1.0 };
        let last = LUMINOSITY_RAMP.len() - 1;
        let index = ((t * last as f64).round() as usize).min(last);
        let character = LUMINOSITY_RAMP[index];
        let color = match curve.kind {
            CurveKind::Meridian => Color::Cyan,
            CurveKind::Parallel => Color::Blue,
        };
        for segment in curve.path.windows(2) {
            let (from, to) = (mapping.to_cell(&segment[0]), mapping.to_cell(&segment[1]));
            self.draw_line(from, to, character, color);
        }
    }

    fn render_face(&mut self, face: &Face, mapping: &Mapping) {
        let corners = face.corners.map(|c| mapping.to_cell(&c));
        let fill = match face.kind {
            FaceKind::Top => '#',
            FaceKind::Left | FaceKind::Front => '=',
            FaceKind::Right | FaceKind::Back => ':',
            FaceKind::Bottom => '.',
        };
        let color = parse_hex_color(&face.fill).unwrap_or(Color::White);
        self.fill_triangle([corners[0], corners[1], corners[2]], fill, color);
        self.fill_triangle([corners[0], corners[2], corners[3]], fill, color);

        let edge = if face.border { Color::White } else { Color::DarkGrey };
        for i in 0..4 {
            self.draw_line(corners[i], corners[(i + 1) % 4], '+', edge);
        }
    }

    fn plot(&mut self, x: i64, y: i64, character: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = character;
        self.color_buffer[idx] = color;
    }

    /// Bresenham line between two cell positions. The segment is clipped to
    /// the buffer first, so far-off or non-finite endpoints cost nothing.
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, character: char, color: Color) {
        let max = Point2::new(self.width as f64, self.height as f64);
        let Some((from, to)) = clip_segment(from, to, Point2::new(-1.0, -1.0), max) else {
            return;
        };
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, character, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_triangle(&mut self, v: [Point2<f64>; 3], character: char, color: Color) {
        // Bounding box, clipped to the screen
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor().max(0.0) as i64;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor().max(0.0) as i64;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil().min(self.height as f64 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f64, y as f64);
                if let Some((w0, w1, w2)) = barycentric(&v[0], &v[1], &v[2], &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, character, color);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// View space to cell space
struct Mapping {
    origin: Point2<f64>,
    center: Point2<f64>,
}

impl Mapping {
    fn new(view_box: &ViewBox, center: Point2<f64>) -> Self {
        Self {
            origin: Point2::new(-view_box.min_x, -view_box.min_y),
            center,
        }
    }

    fn to_cell(&self, p: &Point2<f64>) -> Point2<f64> {
        let local = p - self.center + self.origin.coords;
        Point2::new(local.x / CELL_WIDTH, local.y / CELL_HEIGHT)
    }
}

/// Liang-Barsky clip of a segment against the box `[min, max]`
fn clip_segment(
    from: Point2<f64>,
    to: Point2<f64>,
    min: Point2<f64>,
    max: Point2<f64>,
) -> Option<(Point2<f64>, Point2<f64>)> {
    if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
        return None;
    }
    let d = to - from;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, from.x - min.x),
        (d.x, max.x - from.x),
        (-d.y, from.y - min.y),
        (d.y, max.y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((from + d * t0, from + d * t1))
}

/// Parse `#rrggbb` or `#rgb` into a terminal colour
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').filter(|h| h.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 17);
            Some(Color::Rgb {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
            })
        }
        _ => None,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: &Point2<f64>,
    v1: &Point2<f64>,
    v2: &Point2<f64>,
    p: &Point2<f64>,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use isowire_core::{SceneConfig, View};

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb { r: 255, g: 128, b: 0 }));
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_line_between_cells() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.draw_line(Point2::new(0.0, 0.0), Point2::new(9.0, 0.0), '-', Color::White);
        assert!((0..10).all(|x| renderer.cell(x, 0) == Some('-')));
        assert_eq!(renderer.cell(0, 1), Some(' '));
    }

    #[test]
    fn test_unbounded_lines_are_clipped() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.draw_line(
            Point2::new(f64::NEG_INFINITY, 2.0),
            Point2::new(f64::INFINITY, 2.0),
            '#',
            Color::White,
        );
        renderer.draw_line(Point2::new(f64::NAN, 0.0), Point2::new(3.0, 3.0), '#', Color::White);
        assert!((0..10).all(|x| renderer.cell(x, 2) == Some(' ')));

        // Huge but finite endpoints still draw the visible part
        renderer.draw_line(Point2::new(-1e15, 1.0), Point2::new(1e15, 1.0), '-', Color::White);
        assert!((0..10).all(|x| renderer.cell(x, 1) == Some('-')));
        assert_eq!(renderer.cell(0, 0), Some(' '));

        // Entirely off screen
        renderer.draw_line(Point2::new(-1e12, -1e12), Point2::new(1e12, -1e12), '*', Color::White);
        assert!(!renderer.char_buffer.contains(&'*'));
    }

    #[test]
    fn test_later_primitives_overpaint() {
        let mut renderer = AsciiRenderer::new(8, 8);
        renderer.fill_triangle(
            [Point2::new(0.0, 0.0), Point2::new(7.0, 0.0), Point2::new(0.0, 7.0)],
            'a',
            Color::White,
        );
        renderer.fill_triangle(
            [Point2::new(0.0, 0.0), Point2::new(3.0, 0.0), Point2::new(0.0, 3.0)],
            'b',
            Color::White,
        );
        assert_eq!(renderer.cell(0, 0), Some('b'));
        assert_eq!(renderer.cell(5, 1), Some('a'));
        assert_eq!(renderer.cell(7, 7), Some(' '));
    }

    #[test]
    fn test_render_torus_view() {
        let width = 80;
        let height = 24;
        let mut view = View::torus(
            &SceneConfig::default(),
            width as f64 * CELL_WIDTH,
            height as f64 * CELL_HEIGHT,
        );
        let view_box = view.view_box();
        let mut renderer = AsciiRenderer::new(width, height);
        renderer.render(view.draw_list(), &view_box, Point2::origin());

        let painted = renderer.char_buffer.iter().filter(|c| **c != ' ').count();
        assert!(painted > 100);
        // The ring's hole leaves the centre cell empty
        assert_eq!(renderer.cell(width / 2, height / 2), Some(' '));
    }

    #[test]
    fn test_clear() {
        let mut renderer = AsciiRenderer::new(4, 4);
        renderer.plot(1, 1, '#', Color::Red);
        renderer.clear();
        assert_eq!(renderer.cell(1, 1), Some(' '));
    }
}
