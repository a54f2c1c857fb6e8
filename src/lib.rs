//! # block_decompression
//!
//! Decoding of single ASTC and BC7 texture blocks into RGBA8 pixels.
//!
//! ## Supported block formats
//!
//!  * ASTC (LDR profile), all fourteen 2D footprints from 4x4 to 12x12
//!  * BC7
//!
//! Every entry point exists in two shapes. The `try_*` functions return a
//! [`DecodeError`] describing why a block could not be decoded and leave the
//! output untouched in that case. The plain functions never fail: whenever a
//! block can't be decoded they fill the output with [`ERROR_COLOR`] instead, so
//! a broken texture shows up as opaque magenta.
//!
//! ```
//! use block_decompression::decode::decode_bc7_block;
//!
//! let block = [0xFF; 16];
//! let mut pixels = [0u8; 64];
//! decode_bc7_block(&block, &mut pixels);
//! assert_eq!(&pixels[..4], &[255, 255, 255, 255]);
//! ```
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod decode;
mod error;
mod footprint;

pub use error::{BlockError, DecodeError};
pub use footprint::Footprint;

/// Size in bytes of one compressed block. ASTC uses 16 bytes for every
/// footprint and BC7 blocks are always 16 bytes.
pub const BLOCK_BYTE_SIZE: usize = 16;

/// The color written for every pixel of a block that couldn't be decoded.
pub const ERROR_COLOR: [u8; 4] = [0xFF, 0x00, 0xFF, 0xFF];

/// Block formats supported by this crate.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum BlockFormat {
    /// ASTC with the given block footprint (RGBA LDR)
    Astc(Footprint),
    /// BC7 (RGBA), always 4x4 pixels per block
    BC7,
}

impl BlockFormat {
    /// Returns the width and height in pixels of one decoded block.
    pub const fn block_dimensions(self) -> (usize, usize) {
        match self {
            BlockFormat::Astc(footprint) => {
                (footprint.width() as usize, footprint.height() as usize)
            }
            BlockFormat::BC7 => (4, 4),
        }
    }

    /// Returns the number of RGBA8 bytes one decoded block occupies when
    /// written with a tightly packed row pitch.
    pub const fn decoded_byte_size(self) -> usize {
        let (width, height) = self.block_dimensions();
        width * height * 4
    }

    /// Returns the bytes per row of one decoded block without padding.
    pub const fn row_byte_size(self) -> usize {
        self.block_dimensions().0 * 4
    }

    /// Returns the lowercase name of the format, as used in logs and
    /// [`DecodeError::UnsupportedFormat`].
    pub const fn name(self) -> &'static str {
        match self {
            BlockFormat::Astc(_) => "astc",
            BlockFormat::BC7 => "bc7",
        }
    }
}

impl From<Footprint> for BlockFormat {
    fn from(footprint: Footprint) -> Self {
        BlockFormat::Astc(footprint)
    }
}
