// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use crate::constants::*;
use crate::error::GenomeError;
use crate::genome::{decode_genome, GenomeInput, SeedPolicy};
use crate::geometry::{synthesize_geometry, Arc, GeometryScene, Ornament, Point, QuadCurve};
use crate::palette::{build_palette, Color, Gradient, PaletteScene};
use crate::params::{derive_parameters, VisualParameters};
use serde::{Deserialize, Serialize};

/// Which palette gradient a layer is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientRef {
    Body,
    Glow,
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paint {
    Solid(Color),
    Gradient(GradientRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    pub round_cap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Polygon { points: Vec<Point> },
    Circle { center: Point, radius: f64 },
    Curve { curve: QuadCurve },
    Arc { arc: Arc },
}

/// One drawable element. Layers are painted in order, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub shape: Shape,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
}

impl Layer {
    fn filled(shape: Shape, paint: Paint) -> Self {
        Self {
            shape,
            fill: Some(paint),
            stroke: None,
            opacity: 1.0,
        }
    }

    fn stroked(shape: Shape, paint: Paint, width: f64, round_cap: bool) -> Self {
        Self {
            shape,
            fill: None,
            stroke: Some(Stroke {
                paint,
                width,
                round_cap,
            }),
            opacity: 1.0,
        }
    }

    fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Fully computed, renderer-agnostic creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub input: GenomeInput,
    pub size: f64,
    pub params: VisualParameters,
    pub geometry: GeometryScene,
    pub palette: PaletteScene,
    pub label: Option<String>,
    pub layers: Vec<Layer>,
}

impl Scene {
    pub fn gradient(&self, which: GradientRef) -> &Gradient {
        match which {
            GradientRef::Body => &self.palette.body,
            GradientRef::Glow => &self.palette.glow,
            GradientRef::Shell => &self.palette.shell,
        }
    }
}

fn ornament_layers(geometry: &GeometryScene, palette: &PaletteScene) -> Vec<Layer> {
    let accents = &palette.accents;
    match &geometry.ornament {
        Ornament::Tentacles { strokes } => strokes
            .iter()
            .map(|&curve| {
                Layer::stroked(
                    Shape::Curve { curve },
                    Paint::Solid(accents.tentacle.into()),
                    TENTACLE_STROKE,
                    true,
                )
                .with_opacity(TENTACLE_OPACITY)
            })
            .collect(),
        Ornament::Shell { outer, inner } => vec![
            Layer::stroked(
                Shape::Arc { arc: *outer },
                Paint::Gradient(GradientRef::Shell),
                SHELL_OUTER_STROKE,
                false,
            )
            .with_opacity(SHELL_OPACITY),
            Layer::stroked(
                Shape::Arc { arc: *inner },
                Paint::Solid(accents.shell_inner.into()),
                SHELL_INNER_STROKE,
                false,
            )
            .with_opacity(SHELL_OPACITY),
        ],
        Ornament::Ears { left, right, tail } => vec![
            Layer::filled(
                Shape::Polygon { points: left.to_vec() },
                Paint::Solid(accents.ear.into()),
            )
            .with_opacity(EARS_OPACITY),
            Layer::filled(
                Shape::Polygon { points: right.to_vec() },
                Paint::Solid(accents.ear.into()),
            )
            .with_opacity(EARS_OPACITY),
            Layer::stroked(
                Shape::Curve { curve: *tail },
                Paint::Solid(accents.tail.into()),
                TAIL_STROKE,
                true,
            )
            .with_opacity(EARS_OPACITY),
        ],
    }
}

/// Paint order: ornament, glow, silhouette, body, core, eyes.
pub fn compose_layers(
    params: &VisualParameters,
    geometry: &GeometryScene,
    palette: &PaletteScene,
) -> Vec<Layer> {
    let center = geometry.center;
    let radius = geometry.base_radius;
    let eye = params.eye_radius;

    let mut layers = ornament_layers(geometry, palette);
    layers.push(Layer::filled(
        Shape::Circle {
            center,
            radius: radius + params.aura_radius * GLOW_AURA_SCALE,
        },
        Paint::Gradient(GradientRef::Glow),
    ));
    layers.push(
        Layer::filled(
            Shape::Polygon {
                points: geometry.silhouette.clone(),
            },
            Paint::Solid(palette.accents.silhouette.into()),
        )
        .with_opacity(SILHOUETTE_OPACITY),
    );
    layers.push(Layer::filled(
        Shape::Circle {
            center,
            radius: radius * BODY_RADIUS,
        },
        Paint::Gradient(GradientRef::Body),
    ));
    layers.push(Layer::filled(
        Shape::Circle {
            center,
            radius: params.core_radius,
        },
        Paint::Solid(palette.accents.core.into()),
    ));
    for side in [-1.0, 1.0] {
        layers.push(Layer::filled(
            Shape::Circle {
                center: Point::new(center.x + side * eye, center.y - eye / 2.0),
                radius: eye / 2.0,
            },
            Paint::Solid(palette.accents.eye),
        ));
    }
    layers
}

/// Runs the full pipeline: decode, derive, synthesize, color, compose.
///
/// Only a malformed genome (or, under [`SeedPolicy::Strict`], a malformed
/// seed) can fail; everything after decoding is total.
pub fn generate_with_policy(
    input: &GenomeInput,
    size: f64,
    label: Option<&str>,
    policy: SeedPolicy,
) -> Result<Scene, GenomeError> {
    let bytes = decode_genome(input, policy)?;
    let params = derive_parameters(&bytes, input.level, input.stage);
    let geometry = synthesize_geometry(&params, size);
    let palette = build_palette(&params);
    let layers = compose_layers(&params, &geometry, &palette);
    let label = label
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned);

    log::debug!(
        "generated {:?} creature: {} spikes, {} layers",
        params.variant,
        params.spike_count,
        layers.len()
    );

    Ok(Scene {
        input: input.clone(),
        size,
        params,
        geometry,
        palette,
        label,
        layers,
    })
}

/// [`generate_with_policy`] with the lenient seed policy.
pub fn generate(input: &GenomeInput, size: f64, label: Option<&str>) -> Result<Scene, GenomeError> {
    generate_with_policy(input, size, label, SeedPolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Variant;

    #[test]
    fn layers_end_with_body_core_and_eyes() {
        let scene = generate(&GenomeInput::default(), 96.0, None).unwrap();
        let n = scene.layers.len();
        // shell: two arcs, then glow, silhouette, body, core, two eyes
        assert_eq!(n, 2 + 6);
        assert_eq!(scene.layers[2].fill, Some(Paint::Gradient(GradientRef::Glow)));
        assert!(matches!(scene.layers[3].shape, Shape::Polygon { .. }));
        assert_eq!(scene.layers[4].fill, Some(Paint::Gradient(GradientRef::Body)));
        assert!(matches!(scene.layers[n - 1].shape, Shape::Circle { radius, .. } if radius == 2.0));
    }

    #[test]
    fn ornament_layer_counts_follow_variant() {
        for (genome, expected) in [("0x00", Variant::Shell), ("0x01", Variant::Ears), ("0x02", Variant::Tentacles)] {
            let input = GenomeInput::new(genome, "", 1, 0);
            let scene = generate(&input, 64.0, None).unwrap();
            assert_eq!(scene.params.variant, expected);
            assert_eq!(scene.geometry.ornament.variant(), expected);
            let ornament_layers = scene.layers.len() - 6;
            let want = match expected {
                Variant::Tentacles => 6,
                Variant::Shell => 2,
                Variant::Ears => 3,
            };
            assert_eq!(ornament_layers, want);
        }
    }

    #[test]
    fn blank_labels_are_dropped() {
        let input = GenomeInput::default();
        assert_eq!(generate(&input, 96.0, Some("   ")).unwrap().label, None);
        assert_eq!(
            generate(&input, 96.0, Some(" Blob ")).unwrap().label.as_deref(),
            Some("Blob")
        );
    }

    #[test]
    fn strict_policy_surfaces_bad_seed() {
        let input = GenomeInput::new("0x01", "0x123", 1, 0);
        assert!(generate(&input, 96.0, None).is_ok());
        assert!(generate_with_policy(&input, 96.0, None, SeedPolicy::Strict).is_err());
    }
}
