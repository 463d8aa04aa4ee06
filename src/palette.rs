// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use crate::constants::*;
use crate::params::VisualParameters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color in HSL space. `h` in degrees `[0, 360)`, `s`/`l` in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Hsl {
    pub const fn new(h: u16, (s, l): (u8, u8)) -> Self {
        Self { h, s, l }
    }

    /// Standard HSL to sRGB conversion.
    pub fn to_rgb(self) -> [u8; 3] {
        let h = f64::from(self.h % 360) / 60.0;
        let s = f64::from(self.s.min(100)) / 100.0;
        let l = f64::from(self.l.min(100)) / 100.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({} {}% {}%)", self.h, self.s, self.l)
    }
}

/// Flat color used by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Hsl(Hsl),
    Rgb([u8; 3]),
}

impl Color {
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Color::Hsl(hsl) => hsl.to_rgb(),
            Color::Rgb(rgb) => rgb,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hsl(hsl) => fmt::Display::fmt(hsl, f),
            Color::Rgb([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl From<Hsl> for Color {
    fn from(hsl: Hsl) -> Self {
        Color::Hsl(hsl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, `0.0..=1.0`.
    pub offset: f64,
    pub color: Hsl,
    pub opacity: f64,
}

impl GradientStop {
    fn solid(offset: f64, color: Hsl) -> Self {
        Self {
            offset,
            color,
            opacity: 1.0,
        }
    }
}

/// Gradient geometry, in fractions of the painted shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GradientShape {
    Radial { cx: f64, cy: f64, r: f64 },
    Linear { x1: f64, y1: f64, x2: f64, y2: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub shape: GradientShape,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Interpolated color and opacity at `t` along the gradient.
    pub fn sample(&self, t: f64) -> ([u8; 3], f64) {
        let Some(first) = self.stops.first() else {
            return ([0, 0, 0], 0.0);
        };
        if t <= first.offset {
            return (first.color.to_rgb(), first.opacity);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = (b.offset - a.offset).max(f64::EPSILON);
                let k = ((t - a.offset) / span).clamp(0.0, 1.0);
                let (ca, cb) = (a.color.to_rgb(), b.color.to_rgb());
                let mix = |i: usize| (f64::from(ca[i]) + (f64::from(cb[i]) - f64::from(ca[i])) * k).round() as u8;
                return ([mix(0), mix(1), mix(2)], a.opacity + (b.opacity - a.opacity) * k);
            }
        }
        let last = self.stops[self.stops.len() - 1];
        (last.color.to_rgb(), last.opacity)
    }
}

/// Fixed-lightness colors used outside the gradients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accents {
    pub tentacle: Hsl,
    pub shell_inner: Hsl,
    pub ear: Hsl,
    pub tail: Hsl,
    pub silhouette: Hsl,
    pub core: Hsl,
    pub eye: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteScene {
    /// Mid-toned body color.
    pub base: Hsl,
    pub highlight: Hsl,
    pub shadow: Hsl,
    /// Primary body fill.
    pub body: Gradient,
    /// Outer aura.
    pub glow: Gradient,
    /// Ornament shading.
    pub shell: Gradient,
    pub accents: Accents,
}

pub fn build_palette(params: &VisualParameters) -> PaletteScene {
    let (hue, hue2, hue3) = (params.hue, params.hue2, params.hue3);

    let base = Hsl::new(hue, BASE_SL);
    let highlight = Hsl::new(hue2, HIGHLIGHT_SL);
    let shadow = Hsl::new(hue3, SHADOW_SL);

    let body = Gradient {
        shape: GradientShape::Radial { cx: 0.4, cy: 0.35, r: 0.7 },
        stops: vec![
            GradientStop::solid(0.0, highlight),
            GradientStop::solid(0.6, base),
            GradientStop::solid(1.0, shadow),
        ],
    };

    let glow = Gradient {
        shape: GradientShape::Radial { cx: 0.5, cy: 0.5, r: 0.5 },
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Hsl::new(hue2, GLOW_INNER_SL),
                opacity: GLOW_INNER_ALPHA,
            },
            GradientStop {
                offset: 1.0,
                color: Hsl::new(hue3, GLOW_OUTER_SL),
                opacity: 0.0,
            },
        ],
    };

    let shell = Gradient {
        shape: GradientShape::Linear { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 },
        stops: vec![
            GradientStop::solid(0.0, Hsl::new(hue2, SHELL_LIGHT_SL)),
            GradientStop::solid(1.0, Hsl::new(hue3, SHELL_DARK_SL)),
        ],
    };

    let accents = Accents {
        tentacle: Hsl::new(hue2, TENTACLE_SL),
        shell_inner: Hsl::new(hue, SHELL_INNER_SL),
        ear: Hsl::new(hue3, EAR_SL),
        tail: Hsl::new(hue2, TAIL_SL),
        silhouette: Hsl::new(hue3, SILHOUETTE_SL),
        core: Hsl::new(hue2, CORE_SL),
        eye: Color::Rgb(EYE_RGB),
    };

    PaletteScene {
        base,
        highlight,
        shadow,
        body,
        glow,
        shell,
        accents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::derive_parameters;

    #[test]
    fn hsl_conversion_matches_known_values() {
        assert_eq!(Hsl { h: 0, s: 100, l: 50 }.to_rgb(), [255, 0, 0]);
        assert_eq!(Hsl { h: 120, s: 100, l: 50 }.to_rgb(), [0, 255, 0]);
        assert_eq!(Hsl { h: 240, s: 100, l: 50 }.to_rgb(), [0, 0, 255]);
        assert_eq!(Hsl { h: 77, s: 0, l: 100 }.to_rgb(), [255, 255, 255]);
        assert_eq!(Hsl { h: 200, s: 60, l: 0 }.to_rgb(), [0, 0, 0]);
    }

    #[test]
    fn colors_format_like_css() {
        assert_eq!(Hsl { h: 117, s: 70, l: 65 }.to_string(), "hsl(117 70% 65%)");
        assert_eq!(Color::Rgb(EYE_RGB).to_string(), "#0e1016");
    }

    #[test]
    fn only_hue_varies_between_creatures() {
        let a = build_palette(&derive_parameters(&[1, 2, 3], 1, 0));
        let b = build_palette(&derive_parameters(&[200, 100, 50, 9], 5, 2));
        assert_eq!((a.base.s, a.base.l), (b.base.s, b.base.l));
        assert_eq!((a.highlight.s, a.highlight.l), (b.highlight.s, b.highlight.l));
        assert_eq!((a.shadow.s, a.shadow.l), (b.shadow.s, b.shadow.l));
        assert_ne!(a.base.h, b.base.h);
    }

    #[test]
    fn body_gradient_runs_highlight_to_shadow() {
        let params = derive_parameters(&[], 1, 0);
        let palette = build_palette(&params);
        assert_eq!(palette.body.stops.len(), 3);
        assert_eq!(palette.body.stops[0].color, palette.highlight);
        assert_eq!(palette.body.stops[1].color, palette.base);
        assert_eq!(palette.body.stops[2].color, palette.shadow);
        assert_eq!(palette.base.h, params.hue);
        assert_eq!(palette.highlight.h, params.hue2);
        assert_eq!(palette.shadow.h, params.hue3);
    }

    #[test]
    fn gradient_sampling_clamps_and_fades() {
        let palette = build_palette(&derive_parameters(&[], 1, 0));
        let (_, inner) = palette.glow.sample(-1.0);
        let (_, outer) = palette.glow.sample(2.0);
        let (_, mid) = palette.glow.sample(0.5);
        assert!((inner - 0.7).abs() < 1e-9);
        assert_eq!(outer, 0.0);
        assert!((mid - 0.35).abs() < 1e-9);
    }
}
