// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Ornament style layered onto the body silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Tentacles,
    Shell,
    Ears,
}

impl Variant {
    pub fn from_index(index: u32) -> Self {
        match index % VARIANT_COUNT {
            0 => Variant::Tentacles,
            1 => Variant::Shell,
            _ => Variant::Ears,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Variant::Tentacles => 0,
            Variant::Shell => 1,
            Variant::Ears => 2,
        }
    }
}

/// Numeric description of one creature, derived from its genome bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualParameters {
    pub hue: u16,
    pub hue2: u16,
    pub hue3: u16,
    pub eye_radius: f64,
    pub core_radius: f64,
    pub spike_count: u32,
    pub twist: i32,
    pub wobble: u32,
    pub aura_radius: f64,
    pub variant: Variant,
    /// Tentacle control-point distance as a multiple of the base radius.
    pub tentacle_reach: f64,
}

/// Reads `bytes[index % len]`, or `fallback` when there are no bytes at all.
pub fn byte_at(bytes: &[u8], index: usize, fallback: u8) -> u8 {
    if bytes.is_empty() {
        return fallback;
    }
    bytes[index % bytes.len()]
}

fn wrap_hue(value: i64) -> u16 {
    value.rem_euclid(HUE_TURN) as u16
}

/// Maps genome bytes plus growth counters onto visual parameters.
///
/// Total over all inputs: an empty genome yields the default organism built
/// from [`FALLBACK_BYTES`].
pub fn derive_parameters(bytes: &[u8], level: u16, stage: u16) -> VisualParameters {
    let mut b = [0u8; GENE_SLOTS];
    for (slot, value) in b.iter_mut().enumerate() {
        *value = byte_at(bytes, slot, FALLBACK_BYTES[slot]);
    }

    let level_i = i64::from(level);
    let stage_i = i64::from(stage);

    let palette_shift = i64::from(b[9]) % PALETTE_SHIFT_SPAN - PALETTE_SHIFT_CENTER;
    let hue = wrap_hue(i64::from(b[0]) * HUE_BYTE_SCALE + palette_shift);
    let hue2 = wrap_hue(i64::from(hue) + HUE2_OFFSET + i64::from(b[1]) + level_i * HUE2_PER_LEVEL);
    let hue3 = wrap_hue(i64::from(hue) + HUE3_OFFSET + i64::from(b[2]) + stage_i * HUE3_PER_STAGE);

    let eye_radius = (f64::from(b[3] % EYE_SPAN) + EYE_BASE).clamp(EYE_MIN, EYE_MAX);
    let core_radius =
        (f64::from(b[4] % CORE_SPAN) + CORE_BASE + f64::from(level) * CORE_PER_LEVEL).clamp(CORE_MIN, CORE_MAX);
    let spike_count = SPIKE_MIN + u32::from(b[5] % SPIKE_SPAN) + u32::from(stage);
    let twist = i32::from(b[6] % TWIST_SPAN) - TWIST_CENTER + i32::from(stage) * TWIST_PER_STAGE;
    let wobble = u32::from(b[7] % WOBBLE_SPAN) + WOBBLE_BASE;
    let aura_radius = (AURA_BASE + f64::from(b[8] % AURA_SPAN)).clamp(AURA_MIN, AURA_MAX);
    let variant = Variant::from_index(u32::from(b[10]) + u32::from(level) + u32::from(stage));
    let tentacle_reach = TENTACLE_REACH_BASE + f64::from(b[7] % TENTACLE_REACH_SPAN) * TENTACLE_REACH_STEP;

    let params = VisualParameters {
        hue,
        hue2,
        hue3,
        eye_radius,
        core_radius,
        spike_count,
        twist,
        wobble,
        aura_radius,
        variant,
        tentacle_reach,
    };
    log::debug!("derived parameters from {} bytes: {:?}", bytes.len(), params);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_at_wraps_and_falls_back() {
        assert_eq!(byte_at(&[], 5, 42), 42);
        assert_eq!(byte_at(&[1, 2, 3], 4, 42), 2);
        assert_eq!(byte_at(&[7], 10, 42), 7);
    }

    #[test]
    fn empty_genome_is_the_default_organism() {
        let p = derive_parameters(&[], 1, 0);
        assert_eq!((p.hue, p.hue2, p.hue3), (240, 117, 260));
        assert_eq!(p.eye_radius, 4.0);
        assert!((p.core_radius - 14.6).abs() < 1e-9);
        assert_eq!(p.spike_count, 13);
        assert_eq!(p.twist, -15);
        assert_eq!(p.wobble, 18);
        assert_eq!(p.aura_radius, 18.0);
        assert_eq!(p.variant, Variant::Shell);
        assert!((p.tentacle_reach - 1.15).abs() < 1e-9);
    }

    #[test]
    fn low_hue_wraps_into_range() {
        // b0 = 0, b9 = 0 gives a raw hue of -30.
        let mut bytes = [0u8; GENE_SLOTS];
        bytes[9] = 0;
        let p = derive_parameters(&bytes, 0, 0);
        assert_eq!(p.hue, 330);
    }

    #[test]
    fn stage_adds_a_spike_and_rotates_hue3() {
        let bytes = [9u8, 8, 7, 6, 5, 4, 3, 2, 1, 0, 77];
        let a = derive_parameters(&bytes, 3, 2);
        let b = derive_parameters(&bytes, 3, 3);
        assert_eq!(b.spike_count, a.spike_count + 1);
        assert_eq!(b.hue3, (a.hue3 + 19) % 360);
        assert_eq!(b.twist, a.twist + 3);
        assert_eq!(b.hue, a.hue);
        assert_eq!(b.hue2, a.hue2);
    }

    #[test]
    fn level_rotates_hue2_and_grows_core() {
        let bytes = [9u8, 8, 7, 6, 0, 4, 3, 2, 1, 0, 77];
        let a = derive_parameters(&bytes, 1, 0);
        let b = derive_parameters(&bytes, 2, 0);
        assert_eq!(b.hue2, (a.hue2 + 7) % 360);
        assert!(b.core_radius > a.core_radius);
    }

    #[test]
    fn extreme_counters_stay_in_range() {
        let p = derive_parameters(&[255; 32], u16::MAX, u16::MAX);
        assert!(p.hue < 360 && p.hue2 < 360 && p.hue3 < 360);
        assert_eq!(p.core_radius, CORE_MAX);
        assert!(p.spike_count >= SPIKE_MIN);
    }
}
