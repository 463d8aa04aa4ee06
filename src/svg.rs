// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

//! Scene to standalone SVG document.

use crate::palette::{Gradient, GradientShape};
use crate::scene::{GradientRef, Layer, Paint, Scene, Shape};
use std::fmt::Write;

/// Height of the label band as a fraction of the avatar size.
const LABEL_BAND: f64 = 0.22;
const LABEL_FONT: f64 = 0.14;

/// Keeps `[A-Za-z0-9_-]`, the characters that are safe inside an element id.
fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Element id for one of the scene's gradients.
///
/// Several avatars usually share one page, so ids carry every generation
/// input: genome, seed, level, stage and size.
pub fn gradient_id(scene: &Scene, which: GradientRef) -> String {
    let prefix = match which {
        GradientRef::Body => "grad",
        GradientRef::Glow => "glow",
        GradientRef::Shell => "shell",
    };
    let input = &scene.input;
    sanitize_id(&format!(
        "{}-{}-{}-l{}s{}-{}",
        prefix, input.genome, input.seed, input.level, input.stage, scene.size
    ))
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn paint_attr(scene: &Scene, paint: Paint) -> String {
    match paint {
        Paint::Solid(color) => color.to_string(),
        Paint::Gradient(which) => format!("url(#{})", gradient_id(scene, which)),
    }
}

fn write_gradient(out: &mut String, id: &str, gradient: &Gradient) {
    let (tag, attrs) = match gradient.shape {
        GradientShape::Radial { cx, cy, r } => (
            "radialGradient",
            format!(r#"cx="{}%" cy="{}%" r="{}%""#, cx * 100.0, cy * 100.0, r * 100.0),
        ),
        GradientShape::Linear { x1, y1, x2, y2 } => (
            "linearGradient",
            format!(
                r#"x1="{}%" y1="{}%" x2="{}%" y2="{}%""#,
                x1 * 100.0,
                y1 * 100.0,
                x2 * 100.0,
                y2 * 100.0
            ),
        ),
    };
    let _ = writeln!(out, r#"<{tag} id="{id}" {attrs}>"#);
    for stop in &gradient.stops {
        let _ = write!(
            out,
            r#"<stop offset="{}%" stop-color="{}""#,
            stop.offset * 100.0,
            stop.color
        );
        if stop.opacity < 1.0 {
            let _ = write!(out, r#" stop-opacity="{}""#, stop.opacity);
        }
        out.push_str("/>\n");
    }
    let _ = writeln!(out, "</{tag}>");
}

fn write_layer(out: &mut String, scene: &Scene, layer: &Layer) {
    let mut style = String::new();
    match layer.fill {
        Some(paint) => {
            let _ = write!(style, r#" fill="{}""#, paint_attr(scene, paint));
        }
        None => style.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = layer.stroke {
        let _ = write!(
            style,
            r#" stroke="{}" stroke-width="{}""#,
            paint_attr(scene, stroke.paint),
            stroke.width
        );
        if stroke.round_cap {
            style.push_str(r#" stroke-linecap="round""#);
        }
    }
    if layer.opacity < 1.0 {
        let _ = write!(style, r#" opacity="{}""#, layer.opacity);
    }

    let _ = match &layer.shape {
        Shape::Polygon { points } => {
            let points = points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, r#"<polygon points="{points}"{style}/>"#)
        }
        Shape::Circle { center, radius } => writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}"{style}/>"#,
            center.x, center.y, radius
        ),
        Shape::Curve { curve } => writeln!(
            out,
            r#"<path d="M {} {} Q {} {} {} {}"{style}/>"#,
            curve.from.x, curve.from.y, curve.control.x, curve.control.y, curve.to.x, curve.to.y
        ),
        Shape::Arc { arc } => {
            let (start, end) = (arc.start_point(), arc.end_point());
            writeln!(
                out,
                r#"<path d="M {} {} A {} {} 0 {} 1 {} {}"{style}/>"#,
                start.x,
                start.y,
                arc.radius,
                arc.radius,
                u8::from(arc.is_large()),
                end.x,
                end.y
            )
        }
    };
}

/// Serializes `scene` into an SVG document.
pub fn render_svg(scene: &Scene) -> String {
    let size = scene.size;
    let height = match scene.label {
        Some(_) => size * (1.0 + LABEL_BAND),
        None => size,
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{height}" viewBox="0 0 {size} {height}">"#
    );

    out.push_str("<defs>\n");
    for which in [GradientRef::Body, GradientRef::Glow, GradientRef::Shell] {
        write_gradient(&mut out, &gradient_id(scene, which), scene.gradient(which));
    }
    out.push_str("</defs>\n");

    for layer in &scene.layers {
        write_layer(&mut out, scene, layer);
    }

    if let Some(label) = &scene.label {
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" fill="currentColor">{}</text>"#,
            size / 2.0,
            size * (1.0 + LABEL_BAND * 0.7),
            size * LABEL_FONT,
            escape_text(label)
        );
    }

    out.push_str("</svg>\n");
    out
}
