// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

//! Deterministic creature avatars from on-chain genomes.
//!
//! ```
//! use morphling::{generate, render_svg, GenomeInput};
//!
//! let input = GenomeInput::new("0x010203", "0xabc123456789abcd", 1, 0);
//! let scene = generate(&input, 96.0, Some("Blob")).unwrap();
//! assert!(render_svg(&scene).contains("<polygon"));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod genome;
pub mod geometry;
pub mod naming;
pub mod palette;
pub mod params;
pub mod raster;
pub mod scene;
pub mod svg;

pub use error::GenomeError;
pub use genome::{decode_genome, decode_hex, ByteSequence, GenomeInput, SeedPolicy};
pub use geometry::{synthesize_geometry, GeometryScene, Ornament, Point};
pub use naming::creature_name;
pub use palette::{build_palette, PaletteScene};
pub use params::{byte_at, derive_parameters, Variant, VisualParameters};
pub use raster::{load_png_metadata, rasterize, save_png, AvatarMetadata};
pub use scene::{generate, generate_with_policy, Layer, Scene};
pub use svg::render_svg;
