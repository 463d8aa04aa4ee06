// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use crate::constants::*;
use crate::params::{Variant, VisualParameters};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Canvas coordinates: origin top-left, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` along `angle` (radians, clockwise on screen).
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self {
            x: center.x + angle.cos() * radius,
            y: center.y + angle.sin() * radius,
        }
    }

    /// `center + (dx, dy) * scale`.
    fn offset(center: Point, (dx, dy): (f64, f64), scale: f64) -> Self {
        Self {
            x: center.x + dx * scale,
            y: center.y + dy * scale,
        }
    }

    fn lerp(self, other: Point, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Quadratic Bézier stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadCurve {
    pub from: Point,
    pub control: Point,
    pub to: Point,
}

impl QuadCurve {
    pub fn point_at(&self, t: f64) -> Point {
        let a = self.from.lerp(self.control, t);
        let b = self.control.lerp(self.to, t);
        a.lerp(b, t)
    }

    /// Polyline approximation with `segments + 1` points.
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

/// Circular arc swept clockwise (screen space) from `start_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    pub fn start_point(&self) -> Point {
        Point::polar(self.center, self.radius, self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        Point::polar(self.center, self.radius, self.start_angle + self.sweep)
    }

    pub fn is_large(&self) -> bool {
        self.sweep > PI
    }

    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let angle = self.start_angle + self.sweep * (i as f64 / segments as f64);
                Point::polar(self.center, self.radius, angle)
            })
            .collect()
    }
}

/// Decoration drawn behind the body; exactly one per creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Ornament {
    Tentacles { strokes: Vec<QuadCurve> },
    Shell { outer: Arc, inner: Arc },
    Ears { left: [Point; 3], right: [Point; 3], tail: QuadCurve },
}

impl Ornament {
    pub fn variant(&self) -> Variant {
        match self {
            Ornament::Tentacles { .. } => Variant::Tentacles,
            Ornament::Shell { .. } => Variant::Shell,
            Ornament::Ears { .. } => Variant::Ears,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryScene {
    pub size: f64,
    pub center: Point,
    pub base_radius: f64,
    /// Closed polygon; the last vertex joins the first.
    pub silhouette: Vec<Point>,
    pub ornament: Ornament,
}

/// Spiky body outline. `spike_count` is at least [`SPIKE_MIN`] by construction.
fn silhouette(params: &VisualParameters, center: Point, base_radius: f64) -> Vec<Point> {
    let count = params.spike_count;
    let twist = f64::from(params.twist) * TWIST_ANGLE_SCALE;
    let wobble = f64::from(params.wobble);

    (0..count)
        .map(|i| {
            let angle = TAU * f64::from(i) / f64::from(count);
            let wave = ((angle + twist) * wobble).sin() * SILHOUETTE_WAVE;
            Point::polar(center, base_radius * (SILHOUETTE_RADIUS + wave), angle)
        })
        .collect()
}

fn tentacles(params: &VisualParameters, center: Point, base_radius: f64) -> Ornament {
    let strokes = (0..TENTACLE_COUNT)
        .map(|i| {
            let angle = TAU * i as f64 / TENTACLE_COUNT as f64;
            QuadCurve {
                from: Point::polar(center, base_radius * TENTACLE_INNER, angle),
                control: Point::polar(center, base_radius * params.tentacle_reach, angle),
                to: Point::polar(center, base_radius * TENTACLE_OUTER, angle),
            }
        })
        .collect();
    Ornament::Tentacles { strokes }
}

fn shell_ring(center: Point, radius: f64) -> Arc {
    let gap = if radius > 0.0 { (SHELL_GAP / radius).min(PI) } else { 0.0 };
    Arc {
        center,
        radius,
        start_angle: -PI / 2.0,
        sweep: TAU - gap,
    }
}

fn ears(center: Point, base_radius: f64) -> Ornament {
    let left = EAR_VERTICES.map(|v| Point::offset(center, v, base_radius));
    let right = EAR_VERTICES.map(|(dx, dy)| Point::offset(center, (-dx, dy), base_radius));
    let [from, control, to] = TAIL_CURVE.map(|v| Point::offset(center, v, base_radius));
    Ornament::Ears {
        left,
        right,
        tail: QuadCurve { from, control, to },
    }
}

/// Builds the body outline and the variant's ornament on a `size`-wide canvas.
pub fn synthesize_geometry(params: &VisualParameters, size: f64) -> GeometryScene {
    let center = Point::new(size / 2.0, size / 2.0);
    let base_radius = size * BASE_RADIUS_RATIO;

    let ornament = match params.variant {
        Variant::Tentacles => tentacles(params, center, base_radius),
        Variant::Shell => Ornament::Shell {
            outer: shell_ring(center, base_radius * SHELL_OUTER),
            inner: shell_ring(center, base_radius * SHELL_INNER),
        },
        Variant::Ears => ears(center, base_radius),
    };

    GeometryScene {
        size,
        center,
        base_radius,
        silhouette: silhouette(params, center, base_radius),
        ornament,
    }
}
