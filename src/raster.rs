// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

//! Software rasterizer and PNG export.
//!
//! Coverage is estimated with a fixed 2x2 grid of samples per pixel. Strokes
//! are flattened to polylines and tested by distance to each segment.

use crate::constants::MAX_RASTER_SIDE;
use crate::genome::GenomeInput;
use crate::geometry::Point;
use crate::palette::GradientShape;
use crate::scene::{Layer, Paint, Scene, Shape};
use base64::Engine;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// PNG text chunk keyword holding the generation request.
pub const METADATA_KEYWORD: &str = "MorphlingAvatar";

const SUBSAMPLES: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
const CURVE_SEGMENTS: usize = 24;
const ARC_SEGMENTS: usize = 96;

/// What a PNG needs to be regenerated from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarMetadata {
    pub version: String,
    pub input: GenomeInput,
    pub size: f64,
    pub label: Option<String>,
}

impl AvatarMetadata {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            input: scene.input.clone(),
            size: scene.size,
            label: scene.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    fn of(points: impl IntoIterator<Item = Point>) -> Self {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    fn grow(self, by: f64) -> Self {
        Self {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Geometry prepared for point-in-shape queries.
enum Coverage {
    Polygon(Vec<Point>),
    Circle { center: Point, radius: f64 },
    Polyline { points: Vec<Point>, half_width: f64 },
}

impl Coverage {
    fn contains(&self, p: Point) -> bool {
        match self {
            Coverage::Polygon(points) => polygon_contains(points, p),
            Coverage::Circle { center, radius } => {
                let (dx, dy) = (p.x - center.x, p.y - center.y);
                dx * dx + dy * dy <= radius * radius
            }
            Coverage::Polyline { points, half_width } => points
                .windows(2)
                .any(|seg| segment_distance(p, seg[0], seg[1]) <= *half_width),
        }
    }
}

/// Even-odd rule.
fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + abx * t - p.x, a.y + aby * t - p.y);
    (cx * cx + cy * cy).sqrt()
}

/// Coverage for one paint operation plus the box gradients are measured against.
fn prepare(shape: &Shape, stroke_width: Option<f64>, scale: f64) -> (Coverage, Bounds) {
    let scaled = |p: Point| Point::new(p.x * scale, p.y * scale);

    let outline: Vec<Point> = match shape {
        Shape::Polygon { points } => points.iter().copied().map(scaled).collect(),
        Shape::Circle { center, radius } => {
            let c = scaled(*center);
            let r = radius * scale;
            let bounds = Bounds::of([Point::new(c.x - r, c.y - r), Point::new(c.x + r, c.y + r)]);
            let coverage = match stroke_width {
                // Only filled circles occur in practice; a stroked one is drawn as its outline.
                Some(w) => Coverage::Polyline {
                    points: (0..=ARC_SEGMENTS)
                        .map(|i| {
                            Point::polar(c, r, std::f64::consts::TAU * i as f64 / ARC_SEGMENTS as f64)
                        })
                        .collect(),
                    half_width: w * scale / 2.0,
                },
                None => Coverage::Circle { center: c, radius: r },
            };
            return (coverage, bounds);
        }
        Shape::Curve { curve } => curve.flatten(CURVE_SEGMENTS).into_iter().map(scaled).collect(),
        Shape::Arc { arc } => arc.flatten(ARC_SEGMENTS).into_iter().map(scaled).collect(),
    };

    let bounds = Bounds::of(outline.iter().copied());
    let coverage = match (shape, stroke_width) {
        (_, Some(w)) => Coverage::Polyline {
            points: outline,
            half_width: w * scale / 2.0,
        },
        (Shape::Polygon { .. }, None) => Coverage::Polygon(outline),
        // Open paths cannot be filled.
        (_, None) => Coverage::Polyline {
            points: Vec::new(),
            half_width: 0.0,
        },
    };
    (coverage, bounds)
}

fn sample_paint(scene: &Scene, paint: Paint, bounds: &Bounds, p: Point) -> ([u8; 3], f64) {
    match paint {
        Paint::Solid(color) => (color.to_rgb(), 1.0),
        Paint::Gradient(which) => {
            let gradient = scene.gradient(which);
            let (w, h) = (bounds.width().max(f64::EPSILON), bounds.height().max(f64::EPSILON));
            let u = (p.x - bounds.min.x) / w;
            let v = (p.y - bounds.min.y) / h;
            let t = match gradient.shape {
                GradientShape::Radial { cx, cy, r } => {
                    let (du, dv) = (u - cx, v - cy);
                    (du * du + dv * dv).sqrt() / r.max(f64::EPSILON)
                }
                GradientShape::Linear { x1, y1, x2, y2 } => {
                    let (dx, dy) = (x2 - x1, y2 - y1);
                    let len2 = (dx * dx + dy * dy).max(f64::EPSILON);
                    ((u - x1) * dx + (v - y1) * dy) / len2
                }
            };
            gradient.sample(t)
        }
    }
}

/// Source-over blend of `rgb` at `alpha` onto `dst`.
fn blend(dst: &mut Rgba<u8>, rgb: [u8; 3], alpha: f64) {
    if alpha <= 0.0 {
        return;
    }
    let alpha = alpha.min(1.0);
    let dst_a = f64::from(dst[3]) / 255.0;
    let out_a = alpha + dst_a * (1.0 - alpha);
    for i in 0..3 {
        let src = f64::from(rgb[i]) * alpha;
        let below = f64::from(dst[i]) * dst_a * (1.0 - alpha);
        dst[i] = ((src + below) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

fn paint_layer(img: &mut RgbaImage, scene: &Scene, layer: &Layer, scale: f64) {
    let mut ops: Vec<(Paint, Option<f64>)> = Vec::with_capacity(2);
    if let Some(fill) = layer.fill {
        ops.push((fill, None));
    }
    if let Some(stroke) = layer.stroke {
        ops.push((stroke.paint, Some(stroke.width)));
    }

    for (paint, stroke_width) in ops {
        let (coverage, shape_bounds) = prepare(&layer.shape, stroke_width, scale);
        let reach = stroke_width.map_or(0.0, |w| w * scale / 2.0);
        let area = shape_bounds.grow(reach + 1.0);

        let x0 = area.min.x.floor().max(0.0) as u32;
        let y0 = area.min.y.floor().max(0.0) as u32;
        let x1 = (area.max.x.ceil().max(0.0) as u32).min(img.width());
        let y1 = (area.max.y.ceil().max(0.0) as u32).min(img.height());

        for y in y0..y1 {
            for x in x0..x1 {
                let mut rgb_sum = [0.0f64; 3];
                let mut alpha_sum = 0.0;
                for (sx, sy) in SUBSAMPLES {
                    let p = Point::new(f64::from(x) + sx, f64::from(y) + sy);
                    if !coverage.contains(p) {
                        continue;
                    }
                    let (rgb, a) = sample_paint(scene, paint, &shape_bounds, p);
                    for i in 0..3 {
                        rgb_sum[i] += f64::from(rgb[i]) * a;
                    }
                    alpha_sum += a;
                }
                if alpha_sum <= 0.0 {
                    continue;
                }
                let rgb = rgb_sum.map(|c| (c / alpha_sum).round().clamp(0.0, 255.0) as u8);
                let alpha = alpha_sum / SUBSAMPLES.len() as f64 * layer.opacity;
                blend(img.get_pixel_mut(x, y), rgb, alpha);
            }
        }
    }
}

/// Canvas edge in pixels and the matching scene-to-pixel factor.
///
/// The edge never exceeds [`MAX_RASTER_SIDE`]; an oversized request is
/// shrunk to fit instead of allocating the full buffer.
fn raster_side(size: f64, scale: u32) -> (u32, f64) {
    let size = size.max(1.0);
    let scale = f64::from(scale.max(1));
    let requested = (size * scale).ceil();
    if requested <= f64::from(MAX_RASTER_SIDE) {
        return (requested as u32, scale);
    }
    log::warn!(
        "raster of {}px requested, capping at {}px",
        requested,
        MAX_RASTER_SIDE
    );
    (MAX_RASTER_SIDE, f64::from(MAX_RASTER_SIDE) / size)
}

/// Rasterizes `scene` onto a transparent square canvas of `size * scale`
/// pixels, capped at [`MAX_RASTER_SIDE`] per side.
///
/// Labels are left to the caller's text rendering.
pub fn rasterize(scene: &Scene, scale: u32) -> RgbaImage {
    let (side, pixel_scale) = raster_side(scene.size, scale);
    let mut img = RgbaImage::new(side, side);
    for layer in &scene.layers {
        paint_layer(&mut img, scene, layer, pixel_scale);
    }
    log::debug!("rasterized {} layers onto {}x{} pixels", scene.layers.len(), side, side);
    img
}

/// Writes `image` as a PNG with the scene's generation request embedded.
pub fn save_png(path: &Path, scene: &Scene, image: &RgbaImage) -> anyhow::Result<()> {
    let json = serde_json::to_string(&AvatarMetadata::from_scene(scene))?;
    let compressed = zstd::encode_all(json.as_bytes(), 3)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&compressed);

    let file = std::fs::File::create(path)?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.add_text_chunk(METADATA_KEYWORD.to_string(), encoded)?;

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    log::info!("saved avatar {}x{} to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// Reads back the generation request stored by [`save_png`].
pub fn load_png_metadata(path: &Path) -> anyhow::Result<AvatarMetadata> {
    let file = std::fs::File::open(path)?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder.read_info()?;

    for chunk in &reader.info().uncompressed_latin1_text {
        if chunk.keyword == METADATA_KEYWORD {
            let compressed = base64::engine::general_purpose::STANDARD.decode(&chunk.text)?;
            let json = zstd::decode_all(&compressed[..])?;
            let metadata: AvatarMetadata = serde_json::from_slice(&json)?;
            return Ok(metadata);
        }
    }

    anyhow::bail!("No {} metadata found in {}", METADATA_KEYWORD, path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::generate;

    #[test]
    fn polygon_rule_handles_a_square() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(polygon_contains(&square, Point::new(5.0, 5.0)));
        assert!(!polygon_contains(&square, Point::new(15.0, 5.0)));
        assert!(!polygon_contains(&[], Point::new(0.0, 0.0)));
    }

    #[test]
    fn segment_distance_projects_onto_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(Point::new(-4.0, 3.0), a, b), 5.0);
    }

    #[test]
    fn eyes_are_dark_and_corners_transparent() {
        let scene = generate(&GenomeInput::default(), 96.0, None).unwrap();
        let img = rasterize(&scene, 1);
        assert_eq!(img.dimensions(), (96, 96));
        assert_eq!(img.get_pixel(0, 0)[3], 0);

        let eye = scene.params.eye_radius;
        let ex = (48.0 - eye) as u32;
        let ey = (48.0 - eye / 2.0) as u32;
        let px = img.get_pixel(ex, ey);
        assert_eq!(px[3], 255);
        assert!(px[0] < 40 && px[1] < 40 && px[2] < 40);
    }

    #[test]
    fn scale_multiplies_canvas() {
        let scene = generate(&GenomeInput::default(), 32.0, None).unwrap();
        assert_eq!(rasterize(&scene, 3).dimensions(), (96, 96));
        assert_eq!(rasterize(&scene, 0).dimensions(), (32, 32));
    }

    #[test]
    fn oversized_canvas_is_capped() {
        assert_eq!(raster_side(4096.0, 8), (MAX_RASTER_SIDE, 1.0));
        assert_eq!(raster_side(1000.0, 8), (MAX_RASTER_SIDE, 4.096));
        assert_eq!(raster_side(f64::INFINITY, 1).0, MAX_RASTER_SIDE);
        assert_eq!(raster_side(512.0, 8), (4096, 8.0));
    }

    #[test]
    fn png_metadata_round_trips() {
        let input = GenomeInput::new("0x010203", "0xabc123456789abcd", 1, 0);
        let scene = generate(&input, 48.0, Some("Testudo")).unwrap();
        let img = rasterize(&scene, 1);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");

        save_png(&path, &scene, &img).unwrap();
        let meta = load_png_metadata(&path).unwrap();

        assert_eq!(meta.input, input);
        assert_eq!(meta.size, 48.0);
        assert_eq!(meta.label.as_deref(), Some("Testudo"));
    }
}
