// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use crate::constants::{DEFAULT_LEVEL, DEFAULT_STAGE};
use crate::error::GenomeError;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Everything the generator reads about one creature.
///
/// `genome` and `seed` are hex strings as they come off the chain; `seed` is
/// usually the object id and only serves to pull apart creatures that share
/// a genome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeInput {
    pub genome: String,
    pub seed: String,
    pub level: u16,
    pub stage: u16,
}

impl Default for GenomeInput {
    fn default() -> Self {
        Self {
            genome: String::new(),
            seed: String::new(),
            level: DEFAULT_LEVEL,
            stage: DEFAULT_STAGE,
        }
    }
}

impl GenomeInput {
    pub fn new(genome: impl Into<String>, seed: impl Into<String>, level: u16, stage: u16) -> Self {
        Self {
            genome: genome.into(),
            seed: seed.into(),
            level,
            stage,
        }
    }
}

/// How a malformed seed string is treated.
///
/// The seed is cosmetic context rather than validated user input, so the
/// default drops it and carries on with the genome alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Flat, immutable byte view of a decoded genome (genome bytes, then seed bytes).
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct ByteSequence(Vec<u8>);

impl ByteSequence {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for ByteSequence {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteSequence {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Strips whitespace and an optional `0x`/`0X` prefix.
fn strip_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Decodes a hex string into bytes.
///
/// `""` and `"0x"` yield an empty sequence. Any character outside
/// `[0-9a-fA-F]` is a [`GenomeError::InvalidDigit`] indexed by character,
/// not byte. A valid but odd digit count is a [`GenomeError::MalformedHex`].
pub fn decode_hex(text: &str) -> Result<ByteSequence, GenomeError> {
    let digits = strip_prefix(text);
    if digits.is_empty() {
        return Ok(ByteSequence::default());
    }
    if let Some((index, ch)) = digits.chars().enumerate().find(|(_, ch)| !ch.is_ascii_hexdigit()) {
        return Err(GenomeError::InvalidDigit { ch, index });
    }
    // All ASCII from here on, so byte length is the digit count.
    if digits.len() % 2 != 0 {
        return Err(GenomeError::MalformedHex { digits: digits.len() });
    }

    match hex::decode(digits) {
        Ok(bytes) => Ok(ByteSequence(bytes)),
        Err(hex::FromHexError::InvalidHexCharacter { c, index }) => {
            Err(GenomeError::InvalidDigit { ch: c, index })
        }
        Err(hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength) => {
            Err(GenomeError::MalformedHex { digits: digits.len() })
        }
    }
}

/// Decodes genome and seed and concatenates them.
///
/// The genome is always validated. The seed follows `policy`.
pub fn decode_genome(input: &GenomeInput, policy: SeedPolicy) -> Result<ByteSequence, GenomeError> {
    let mut bytes = decode_hex(&input.genome)?.into_inner();

    let seed = match decode_hex(&input.seed) {
        Ok(seed) => seed,
        Err(err) if policy == SeedPolicy::Lenient => {
            log::warn!("ignoring malformed seed {:?}: {}", input.seed, err);
            ByteSequence::default()
        }
        Err(err) => return Err(err),
    };

    bytes.extend_from_slice(&seed);
    log::trace!("decoded {} genome bytes ({} from seed)", bytes.len(), seed.len());
    Ok(ByteSequence(bytes))
}
