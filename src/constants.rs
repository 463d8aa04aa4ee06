// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

//! Visual identity constants.
//!
//! Every number that shapes how a creature looks lives here. Changing any of
//! them changes the appearance of every existing creature, so treat this file
//! as frozen once avatars are in the wild.

// ============================================================================
// GENOME SLOTS
// ============================================================================

/// Number of logical byte slots read from the genome.
pub const GENE_SLOTS: usize = 11;

/// Stand-in bytes used when the genome and seed are both empty.
/// Index `i` is the fallback for slot `b{i}`.
pub const FALLBACK_BYTES: [u8; GENE_SLOTS] = [90, 140, 200, 30, 220, 60, 180, 40, 210, 120, 15];

// ============================================================================
// PARAMETER DERIVATION
// ============================================================================

pub const HUE_TURN: i64 = 360;
pub const HUE_BYTE_SCALE: i64 = 3;
pub const PALETTE_SHIFT_SPAN: i64 = 60;
pub const PALETTE_SHIFT_CENTER: i64 = 30;
pub const HUE2_OFFSET: i64 = 90;
pub const HUE3_OFFSET: i64 = 180;
pub const HUE2_PER_LEVEL: i64 = 7;
pub const HUE3_PER_STAGE: i64 = 19;

pub const EYE_SPAN: u8 = 10;
pub const EYE_BASE: f64 = 4.0;
pub const EYE_MIN: f64 = 4.0;
pub const EYE_MAX: f64 = 12.0;

pub const CORE_SPAN: u8 = 18;
pub const CORE_BASE: f64 = 10.0;
pub const CORE_PER_LEVEL: f64 = 0.6;
pub const CORE_MIN: f64 = 10.0;
pub const CORE_MAX: f64 = 26.0;

pub const SPIKE_MIN: u32 = 7;
pub const SPIKE_SPAN: u8 = 9;

pub const TWIST_SPAN: u8 = 30;
pub const TWIST_CENTER: i32 = 15;
pub const TWIST_PER_STAGE: i32 = 3;

pub const WOBBLE_SPAN: u8 = 14;
pub const WOBBLE_BASE: u32 = 6;

pub const AURA_BASE: f64 = 18.0;
pub const AURA_SPAN: u8 = 30;
pub const AURA_MIN: f64 = 18.0;
pub const AURA_MAX: f64 = 42.0;

pub const VARIANT_COUNT: u32 = 3;

pub const TENTACLE_REACH_BASE: f64 = 1.15;
pub const TENTACLE_REACH_SPAN: u8 = 5;
pub const TENTACLE_REACH_STEP: f64 = 0.05;

// ============================================================================
// GEOMETRY (fractions of the base radius unless noted)
// ============================================================================

/// Base radius as a fraction of the canvas size.
pub const BASE_RADIUS_RATIO: f64 = 0.38;

pub const SILHOUETTE_RADIUS: f64 = 0.82;
pub const SILHOUETTE_WAVE: f64 = 0.18;
pub const TWIST_ANGLE_SCALE: f64 = 0.01;

pub const TENTACLE_COUNT: usize = 6;
pub const TENTACLE_INNER: f64 = 0.4;
pub const TENTACLE_OUTER: f64 = 1.05;

pub const SHELL_OUTER: f64 = 1.0;
pub const SHELL_INNER: f64 = 0.65;
/// Arc length (canvas units) left open in each shell ring.
pub const SHELL_GAP: f64 = 1.0;

/// Ear triangle for the left side; the right ear mirrors x.
pub const EAR_VERTICES: [(f64, f64); 3] = [(-0.35, -0.15), (-0.95, -0.9), (-0.2, -0.4)];
/// Tail curve: start, control, end.
pub const TAIL_CURVE: [(f64, f64); 3] = [(0.8, 0.6), (1.2, 1.1), (0.4, 1.1)];

pub const GLOW_AURA_SCALE: f64 = 0.15;
pub const BODY_RADIUS: f64 = 0.92;

// ============================================================================
// PALETTE (saturation, lightness)
// ============================================================================

pub const BASE_SL: (u8, u8) = (60, 45);
pub const HIGHLIGHT_SL: (u8, u8) = (70, 65);
pub const SHADOW_SL: (u8, u8) = (60, 25);

pub const GLOW_INNER_SL: (u8, u8) = (85, 75);
pub const GLOW_OUTER_SL: (u8, u8) = (60, 30);
pub const GLOW_INNER_ALPHA: f64 = 0.7;

pub const SHELL_LIGHT_SL: (u8, u8) = (55, 55);
pub const SHELL_DARK_SL: (u8, u8) = (45, 25);

pub const TENTACLE_SL: (u8, u8) = (60, 50);
pub const SHELL_INNER_SL: (u8, u8) = (35, 35);
pub const EAR_SL: (u8, u8) = (55, 30);
pub const TAIL_SL: (u8, u8) = (60, 45);
pub const SILHOUETTE_SL: (u8, u8) = (38, 22);
pub const CORE_SL: (u8, u8) = (80, 70);

pub const EYE_RGB: [u8; 3] = [0x0e, 0x10, 0x16];

// ============================================================================
// LAYERS
// ============================================================================

pub const TENTACLE_STROKE: f64 = 3.0;
pub const SHELL_OUTER_STROKE: f64 = 8.0;
pub const SHELL_INNER_STROKE: f64 = 5.0;
pub const TAIL_STROKE: f64 = 4.0;

pub const TENTACLE_OPACITY: f64 = 0.7;
pub const SHELL_OPACITY: f64 = 0.8;
pub const EARS_OPACITY: f64 = 0.9;
pub const SILHOUETTE_OPACITY: f64 = 0.65;

// ============================================================================
// RENDER DEFAULTS
// ============================================================================

pub const DEFAULT_SIZE: f64 = 96.0;
pub const MIN_SIZE: f64 = 16.0;
pub const MAX_SIZE: f64 = 4096.0;
/// Largest raster edge in pixels, whatever the size and scale.
pub const MAX_RASTER_SIDE: u32 = 4096;
pub const DEFAULT_LEVEL: u16 = 1;
pub const DEFAULT_STAGE: u16 = 0;
