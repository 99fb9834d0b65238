//! Procedural drawing of the GoToShell face: two chevron eyes and a mouth.
//!
//! Every measurement is expressed against a 1024 unit design canvas and scaled
//! linearly to the requested size, so the face looks the same at every size.

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Side length the face constants below are designed for.
pub const DESIGN_SIZE: u32 = 1024;

/// Default stroke color of the face, `#505050`.
#[allow(dead_code)]
pub const FACE_COLOR: Rgba<u8> = Rgba([80, 80, 80, 255]);

const LINE_WIDTH: f64 = 41.0;
const EYE_SIZE: f64 = 103.0;
const EYE_OFFSET_X: f64 = 172.0;
const EYE_OFFSET_Y: f64 = -46.0;
const MOUTH_OFFSET_Y: f64 = 150.0;
const MOUTH_HALF_WIDTH: f64 = 115.0;

pub type Point = (i32, i32);

/// A straight stroke between two pixel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Face measurements in whole pixels for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceGeometry {
    pub center: i32,
    pub line_width: i32,
    pub eye_size: i32,
    pub eye_offset_x: i32,
    pub eye_offset_y: i32,
    pub mouth_offset_y: i32,
    pub mouth_half_width: i32,
}

impl FaceGeometry {
    /// Scale the design constants to a `size`x`size` canvas.
    ///
    /// Scaled values are truncated toward zero; the stroke never gets thinner
    /// than one pixel.
    pub fn for_size(size: u32) -> Self {
        let s = f64::from(size) / f64::from(DESIGN_SIZE);
        let scaled = |value: f64| (value * s) as i32;

        Self {
            center: (size / 2) as i32,
            line_width: scaled(LINE_WIDTH).max(1),
            eye_size: scaled(EYE_SIZE),
            eye_offset_x: scaled(EYE_OFFSET_X),
            eye_offset_y: scaled(EYE_OFFSET_Y),
            mouth_offset_y: scaled(MOUTH_OFFSET_Y),
            mouth_half_width: scaled(MOUTH_HALF_WIDTH),
        }
    }

    /// Center of the left and right eye.
    pub fn eye_centers(&self) -> (Point, Point) {
        let y = self.center + self.eye_offset_y;
        (
            (self.center - self.eye_offset_x, y),
            (self.center + self.eye_offset_x, y),
        )
    }

    /// The `>` on the left, pointing right.
    pub fn left_eye(&self) -> [Segment; 2] {
        let ((x, y), _) = self.eye_centers();
        let e = self.eye_size;
        [
            Segment::new((x - e, y - e), (x + e, y)),
            Segment::new((x + e, y), (x - e, y + e)),
        ]
    }

    /// The `<` on the right, pointing left.
    pub fn right_eye(&self) -> [Segment; 2] {
        let (_, (x, y)) = self.eye_centers();
        let e = self.eye_size;
        [
            Segment::new((x + e, y - e), (x - e, y)),
            Segment::new((x - e, y), (x + e, y + e)),
        ]
    }

    pub fn mouth(&self) -> Segment {
        let y = self.center + self.mouth_offset_y;
        Segment::new(
            (self.center - self.mouth_half_width, y),
            (self.center + self.mouth_half_width, y),
        )
    }

    /// All strokes of the face in drawing order.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(5);
        segments.extend(self.left_eye());
        segments.extend(self.right_eye());
        segments.push(self.mouth());
        segments
    }
}

/// Render the face on a transparent `size`x`size` canvas.
///
/// Each segment is stroked on its own with butt caps, so chevron corners are
/// the plain overlap of two strokes.
pub fn render_face(size: u32, color: Rgba<u8>) -> Result<RgbaImage> {
    let geometry = FaceGeometry::for_size(size);
    let mut pixmap = Pixmap::new(size, size)
        .with_context(|| format!("Can't allocate a {size}x{size} canvas"))?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: geometry.line_width as f32,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };

    for segment in geometry.segments() {
        // Pixel (x, y) spans [x, x + 1), so strokes run through pixel centers.
        let mut pb = PathBuilder::new();
        pb.move_to(segment.from.0 as f32 + 0.5, segment.from.1 as f32 + 0.5);
        pb.line_to(segment.to.0 as f32 + 0.5, segment.to.1 as f32 + 0.5);

        // Tiny canvases collapse some strokes to a point.
        let Some(path) = pb.finish() else {
            continue;
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    Ok(pixmap_to_rgba(&pixmap))
}

/// Convert tiny-skia's premultiplied pixels to straight alpha.
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, source) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = source.demultiply();
        *pixel = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}
