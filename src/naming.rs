// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

//! Genus-species labels for creatures that were not given a name.
//!
//! Genus is a coarse, stable label picked from the ornament style and body
//! complexity. Species is picked from the remaining parameters with a little
//! hash jitter so neighbouring genomes don't all collapse onto one word.

use crate::params::{Variant, VisualParameters};

const SALT_GENUS: u32 = 0x51D1_7E02;
const SALT_SPECIES: u32 = 0x51D1_7E03;
const SALT_FAMILY_SPECIES: u32 = 0x51D1_7E12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GenusCategory {
    Drifter,
    Armored,
    Prowler,
    Elder,
}

// Kept as simple static slices, grouped into families so the same score can
// land in different word sets.

static GENUS_DRIFTER_FAMILIES: &[&[&str]] = &[
    &["Natans", "Fluitans", "Volitans", "Medusa", "Cirratus", "Tentaculus"],
    &["Polypus", "Flexilis", "Sinuatus", "Vagus", "Errans", "Undulatus"],
];

static GENUS_ARMORED_FAMILIES: &[&[&str]] = &[
    &["Loricatus", "Scutatus", "Testudo", "Conchifer", "Munitus", "Aegis"],
    &["Nautilus", "Spiralis", "Turbinatus", "Coriaceus", "Vallatus", "Firmus"],
];

static GENUS_PROWLER_FAMILIES: &[&[&str]] = &[
    &["Vulpes", "Felis", "Auritus", "Caudatus", "Venator", "Sagax"],
    &["Lupinus", "Lynceus", "Vigilans", "Celer", "Fugax", "Agilis"],
];

static GENUS_ELDER_FAMILIES: &[&[&str]] = &[
    &["Spinosus", "Echinus", "Asteroides", "Radiatus", "Multiformis", "Complexus"],
    &["Antiquus", "Venerabilis", "Magnus", "Immensus", "Titanicus", "Regalis"],
];

// Species tiers by score: low to high along each slice.
static SPECIES_CALM_FAMILIES: &[&[&str]] = &[
    &["placidus", "lenis", "mitis", "tranquillus", "serenus", "quietus"],
    &["languidus", "tardus", "lentus", "tacitus", "silens", "modestus"],
];

static SPECIES_VIVID_FAMILIES: &[&[&str]] = &[
    &["vividus", "lucidus", "clarus", "splendidus", "ardens", "fulgens"],
    &["fervens", "flammeus", "igneus", "radians", "candidus", "aureus"],
];

static SPECIES_WILD_FAMILIES: &[&[&str]] = &[
    &["turbidus", "procellosus", "ferox", "atrox", "vehemens", "furibundus"],
    &["torquatus", "contortus", "tortilis", "vertiginosus", "rotans", "cyclicus"],
];

fn lerp_index01(score01: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let t = score01.clamp(0.0, 1.0);
    ((t * (len as f64 - 1.0)).round() as usize).min(len - 1)
}

fn safe01(numer: f64, denom: f64) -> f64 {
    if denom <= 0.0 {
        return 0.0;
    }
    (numer / denom).clamp(0.0, 1.0)
}

fn mix32(mut x: u32) -> u32 {
    // A small non-cryptographic mixer (good enough for stable jitter).
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn jittered_index(score01: f64, len: usize, seed: u32, salt: u32) -> usize {
    if len <= 1 {
        return 0;
    }
    let base = lerp_index01(score01, len);

    // Only jitter within a small neighborhood.
    let window = (len / 4).max(1);
    let span = (window * 2 + 1) as u32;
    let h = mix32(seed ^ salt);
    let offset = (h % span) as i32 - window as i32;

    (base as i32 + offset).clamp(0, len as i32 - 1) as usize
}

fn fnv1a64_add_u32(mut hash: u64, value: u32) -> u64 {
    for b in value.to_le_bytes() {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(1099511628211u64);
    }
    hash
}

/// Folds both halves of an `f64` so integral values still vary the result.
fn fold_f64(value: f64) -> u32 {
    let bits = value.to_bits();
    (bits ^ (bits >> 32)) as u32
}

fn seed_from_params(params: &VisualParameters) -> u32 {
    let fields = [
        u32::from(params.hue),
        u32::from(params.hue2),
        u32::from(params.hue3),
        fold_f64(params.eye_radius),
        fold_f64(params.core_radius),
        params.spike_count,
        params.twist as u32,
        params.wobble,
        fold_f64(params.aura_radius),
        params.variant.index(),
        fold_f64(params.tentacle_reach),
    ];
    let fp = fields
        .iter()
        .fold(14695981039346656037u64, |h, &v| fnv1a64_add_u32(h, v));
    mix32((fp as u32) ^ ((fp >> 32) as u32) ^ 0xA55A_1234)
}

fn classify_genus(params: &VisualParameters) -> GenusCategory {
    // Many spikes reads as an older, more evolved creature regardless of ornament.
    if params.spike_count >= 20 {
        return GenusCategory::Elder;
    }
    match params.variant {
        Variant::Tentacles => GenusCategory::Drifter,
        Variant::Shell => GenusCategory::Armored,
        Variant::Ears => GenusCategory::Prowler,
    }
}

/// Deterministic `Genus-species` name for a parameter set.
pub fn creature_name(params: &VisualParameters) -> String {
    let category = classify_genus(params);
    let seed = seed_from_params(params);

    let genus_families: &[&[&str]] = match category {
        GenusCategory::Drifter => GENUS_DRIFTER_FAMILIES,
        GenusCategory::Armored => GENUS_ARMORED_FAMILIES,
        GenusCategory::Prowler => GENUS_PROWLER_FAMILIES,
        GenusCategory::Elder => GENUS_ELDER_FAMILIES,
    };
    // Coarse signature so small hue shifts don't change the genus.
    let gsig = params.variant.index() | ((params.spike_count / 4) << 2);
    let genus_seed = mix32(gsig ^ SALT_GENUS);
    let genus_family = genus_families[(genus_seed as usize) % genus_families.len()];
    let genus = genus_family[(mix32(genus_seed) as usize) % genus_family.len()];

    let wobble01 = safe01(f64::from(params.wobble) - 6.0, 13.0);
    let twist01 = safe01(f64::from(params.twist.unsigned_abs()), 30.0);
    let glow01 = safe01(params.aura_radius - 18.0, 24.0);

    let (species_families, score01) = if wobble01.max(twist01) > 0.6 {
        (SPECIES_WILD_FAMILIES, wobble01.max(twist01))
    } else if glow01 > 0.5 {
        (SPECIES_VIVID_FAMILIES, glow01)
    } else {
        (SPECIES_CALM_FAMILIES, 1.0 - wobble01)
    };

    let family_idx = (mix32(seed ^ SALT_FAMILY_SPECIES) as usize) % species_families.len();
    let family = species_families[family_idx];
    let species = family[jittered_index(score01, family.len(), seed, SALT_SPECIES)];

    format!("{}-{}", genus, species)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::derive_parameters;

    #[test]
    fn names_are_stable() {
        let params = derive_parameters(&[1, 2, 3, 4, 5], 2, 1);
        assert_eq!(creature_name(&params), creature_name(&params));
    }

    #[test]
    fn name_has_genus_and_species() {
        let name = creature_name(&derive_parameters(&[], 1, 0));
        let (genus, species) = name.split_once('-').unwrap();
        assert!(genus.chars().next().unwrap().is_uppercase());
        assert!(species.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn shelled_creatures_get_armored_genera() {
        let params = derive_parameters(&[], 1, 0);
        assert_eq!(params.variant, Variant::Shell);
        let genus = creature_name(&params).split('-').next().unwrap().to_string();
        assert!(GENUS_ARMORED_FAMILIES.iter().any(|family| family.contains(&genus.as_str())));
    }

    #[test]
    fn integral_radii_reach_the_fingerprint() {
        let base = derive_parameters(&[], 1, 0);
        let seed = seed_from_params(&base);

        let wider_eye = VisualParameters { eye_radius: 11.0, ..base };
        assert_ne!(seed_from_params(&wider_eye), seed);

        let wider_aura = VisualParameters { aura_radius: 41.0, ..base };
        assert_ne!(seed_from_params(&wider_aura), seed);

        let longer_reach = VisualParameters { tentacle_reach: 1.35, ..base };
        assert_ne!(seed_from_params(&longer_reach), seed);
    }

    #[test]
    fn jitter_stays_in_bounds() {
        for seed in 0..64 {
            assert!(jittered_index(1.0, 6, seed, SALT_SPECIES) < 6);
            assert!(jittered_index(0.0, 6, seed, SALT_SPECIES) < 6);
        }
        assert_eq!(jittered_index(0.5, 1, 7, 0), 0);
    }
}
