//! Error types for block decoding.

use thiserror::Error;

/// Errors that can occur while decoding a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The requested block dimensions don't match any ASTC footprint.
    #[error("Unsupported ASTC footprint {width}x{height}")]
    UnsupportedFootprint {
        /// The requested block width
        width: u8,
        /// The requested block height
        height: u8,
    },

    /// The compressed block is not exactly 16 bytes long.
    #[error("Invalid block length: {0} bytes. Compressed blocks are always 16 bytes.")]
    InvalidBlockLength(usize),

    /// The output buffer doesn't hold exactly one tightly packed decoded block.
    #[error("Invalid output length: expected {expected} bytes, got {actual} bytes.")]
    InvalidOutputLength {
        /// The required size in bytes
        expected: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The output buffer is too small for a block written with the given pitch.
    #[error("Output buffer too small: need {needed} bytes, but only {actual} bytes available.")]
    OutputTooSmall {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The row pitch is smaller than one row of decoded pixels.
    #[error("Invalid pitch: {pitch} bytes is less than the {row_bytes} bytes of one block row.")]
    InvalidPitch {
        /// The requested pitch in bytes
        pitch: usize,
        /// The bytes of one decoded block row
        row_bytes: usize,
    },

    /// The decoder for this format was disabled at compile time.
    #[error("Support for {0} was not compiled in")]
    UnsupportedFormat(&'static str),

    /// The block content violates the format.
    #[error("Malformed block: {0}")]
    MalformedBlock(#[from] BlockError),
}

/// Structural violations found inside a compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BlockError {
    /// The ASTC block mode is one of the reserved encodings.
    #[error("reserved ASTC block mode")]
    ReservedBlockMode,

    /// A void-extent block with invalid reserved bits or extent coordinates.
    #[error("invalid ASTC void-extent block")]
    InvalidVoidExtent,

    /// A void-extent block with HDR color, which the LDR profile can't decode.
    #[error("HDR void-extent block")]
    HdrVoidExtent,

    /// The weight grid is larger than the block footprint.
    #[error("weight grid {grid_width}x{grid_height} exceeds the block footprint")]
    WeightGridTooLarge {
        /// Weight grid width
        grid_width: u8,
        /// Weight grid height
        grid_height: u8,
    },

    /// More than 64 weights, counting both planes of a dual plane block.
    #[error("too many weights: {0}")]
    InvalidWeightCount(u32),

    /// The weight data is outside the allowed range of 24 to 96 bits.
    #[error("weight data of {0} bits is outside 24..=96")]
    InvalidWeightBits(u32),

    /// Dual plane blocks are limited to three partitions.
    #[error("dual plane block with four partitions")]
    DualPlaneWithFourPartitions,

    /// The color endpoint modes need more than 18 integers.
    #[error("color endpoints need {0} integers, at most 18 are allowed")]
    TooManyColorValues(u32),

    /// There are not enough bits left to encode the color endpoints.
    #[error("not enough bits for the color endpoints")]
    InsufficientColorBits,

    /// HDR color endpoint modes can't be decoded in the LDR profile.
    #[error("HDR color endpoint mode {0}")]
    HdrEndpointMode(u8),

    /// The ASTC decoder refused a block that passed validation.
    #[error("block rejected by the ASTC decoder")]
    RejectedByDecoder,

    /// A BC7 block without a mode bit in its first byte.
    #[error("reserved BC7 mode")]
    ReservedBc7Mode,
}
