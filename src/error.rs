// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use thiserror::Error;

/// Errors produced while decoding genome input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// The hex string has an odd number of digits once the `0x` prefix is gone.
    #[error("malformed hex: odd number of digits ({digits})")]
    MalformedHex { digits: usize },

    /// A character outside `[0-9a-fA-F]` was found. `index` counts digits after the prefix.
    #[error("invalid hex digit {ch:?} at position {index}")]
    InvalidDigit { ch: char, index: usize },
}
