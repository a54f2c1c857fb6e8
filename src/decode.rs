//! Entry points for decoding single blocks.
//!
//! The `try_*` functions report failures as [`DecodeError`] and don't touch the
//! output when they fail. The other functions wrap them and fill the output with
//! [`ERROR_COLOR`] on failure, so every pixel of the requested block is written
//! on every call.
#[cfg(feature = "astc")]
mod astc;
#[cfg(feature = "bc7")]
mod bc7;

use tracing::debug;

use crate::{BlockError, BlockFormat, DecodeError, Footprint, BLOCK_BYTE_SIZE, ERROR_COLOR};

trait BlockDecoder {
    fn format(&self) -> BlockFormat;
    fn decode_block(
        &self,
        compressed: &[u8; BLOCK_BYTE_SIZE],
        decompressed: &mut [u8],
        pitch: usize,
    ) -> Result<(), BlockError>;
}

#[cfg(feature = "astc")]
struct AstcDecoder(Footprint);

#[cfg(feature = "bc7")]
struct BC7Decoder;

#[cfg(feature = "astc")]
impl BlockDecoder for AstcDecoder {
    fn format(&self) -> BlockFormat {
        BlockFormat::Astc(self.0)
    }

    #[inline(always)]
    fn decode_block(
        &self,
        compressed: &[u8; BLOCK_BYTE_SIZE],
        decompressed: &mut [u8],
        pitch: usize,
    ) -> Result<(), BlockError> {
        astc::decode_block_astc(compressed, self.0, decompressed, pitch)
    }
}

#[cfg(feature = "bc7")]
impl BlockDecoder for BC7Decoder {
    fn format(&self) -> BlockFormat {
        BlockFormat::BC7
    }

    #[inline(always)]
    fn decode_block(
        &self,
        compressed: &[u8; BLOCK_BYTE_SIZE],
        decompressed: &mut [u8],
        pitch: usize,
    ) -> Result<(), BlockError> {
        bc7::decode_block_bc7(compressed, decompressed, pitch)
    }
}

/// Validates the output region for `decoder`'s block and decodes into it.
fn decompress<D: BlockDecoder>(
    decoder: &D,
    compressed: &[u8],
    decompressed: &mut [u8],
    pitch: usize,
) -> Result<(), DecodeError> {
    let compressed: &[u8; BLOCK_BYTE_SIZE] = compressed
        .try_into()
        .map_err(|_| DecodeError::InvalidBlockLength(compressed.len()))?;

    let format = decoder.format();
    let (_, height) = format.block_dimensions();
    let row_bytes = format.row_byte_size();
    if pitch < row_bytes {
        return Err(DecodeError::InvalidPitch { pitch, row_bytes });
    }

    let needed = (height - 1)
        .checked_mul(pitch)
        .and_then(|rows| rows.checked_add(row_bytes))
        .unwrap_or(usize::MAX);
    if decompressed.len() < needed {
        return Err(DecodeError::OutputTooSmall {
            needed,
            actual: decompressed.len(),
        });
    }

    decoder.decode_block(compressed, decompressed, pitch)?;
    Ok(())
}

fn decompress_format(
    format: BlockFormat,
    compressed: &[u8],
    decompressed: &mut [u8],
    pitch: usize,
) -> Result<(), DecodeError> {
    match format {
        #[cfg(feature = "astc")]
        BlockFormat::Astc(footprint) => {
            decompress(&AstcDecoder(footprint), compressed, decompressed, pitch)
        }
        #[cfg(feature = "bc7")]
        BlockFormat::BC7 => decompress(&BC7Decoder, compressed, decompressed, pitch),
        #[allow(unreachable_patterns)]
        _ => Err(DecodeError::UnsupportedFormat(format.name())),
    }
}

/// Decodes one block of `format` into `decompressed`, which must hold exactly
/// one tightly packed RGBA8 block ([`BlockFormat::decoded_byte_size`] bytes).
pub fn try_decode_block(
    format: BlockFormat,
    compressed: &[u8],
    decompressed: &mut [u8],
) -> Result<(), DecodeError> {
    let expected = format.decoded_byte_size();
    if decompressed.len() != expected {
        return Err(DecodeError::InvalidOutputLength {
            expected,
            actual: decompressed.len(),
        });
    }

    decompress_format(format, compressed, decompressed, format.row_byte_size())
}

/// Decodes one block of `format` into `decompressed` with `pitch` many bytes per
/// output row, leaving the bytes between rows untouched.
///
/// This allows writing a block straight into its place inside a larger image.
pub fn try_decode_block_with_pitch(
    format: BlockFormat,
    compressed: &[u8],
    decompressed: &mut [u8],
    pitch: usize,
) -> Result<(), DecodeError> {
    decompress_format(format, compressed, decompressed, pitch)
}

/// Decodes one block of `format`, or fills the block with [`ERROR_COLOR`] if it
/// can't be decoded.
pub fn decode_block(format: BlockFormat, compressed: &[u8], decompressed: &mut [u8]) {
    if let Err(error) = try_decode_block(format, compressed, decompressed) {
        let (width, height) = format.block_dimensions();
        debug!(%error, format = format.name(), width, height, "Block decoding failed, writing error color");
        fill_error_with_pitch(width, height, decompressed, format.row_byte_size());
    }
}

/// Pitched variant of [`decode_block`]. On failure the error color is written
/// into the block's rows, as far as they fit into `decompressed`.
pub fn decode_block_with_pitch(
    format: BlockFormat,
    compressed: &[u8],
    decompressed: &mut [u8],
    pitch: usize,
) {
    if let Err(error) = try_decode_block_with_pitch(format, compressed, decompressed, pitch) {
        let (width, height) = format.block_dimensions();
        debug!(%error, format = format.name(), width, height, pitch, "Block decoding failed, writing error color");
        fill_error_with_pitch(width, height, decompressed, pitch);
    }
}

/// Decodes an ASTC block of `block_width` x `block_height` pixels into
/// `decompressed`, which must be `block_width * block_height * 4` bytes long.
pub fn try_decode_astc_block(
    compressed: &[u8],
    block_width: u8,
    block_height: u8,
    decompressed: &mut [u8],
) -> Result<(), DecodeError> {
    let footprint = Footprint::try_from((block_width, block_height))?;
    try_decode_block(BlockFormat::Astc(footprint), compressed, decompressed)
}

/// Decodes an ASTC block of `block_width` x `block_height` pixels into
/// `decompressed` as tightly packed RGBA8.
///
/// Unsupported footprints and malformed blocks produce a block filled with
/// [`ERROR_COLOR`].
pub fn decode_astc_block(
    compressed: &[u8],
    block_width: u8,
    block_height: u8,
    decompressed: &mut [u8],
) {
    if let Err(error) = try_decode_astc_block(compressed, block_width, block_height, decompressed)
    {
        debug!(%error, block_width, block_height, "ASTC block decoding failed, writing error color");
        fill_error(block_width, block_height, decompressed);
    }
}

/// Decodes a BC7 block into `decompressed`, which must be 64 bytes long.
pub fn try_decode_bc7_block(compressed: &[u8], decompressed: &mut [u8]) -> Result<(), DecodeError> {
    try_decode_block(BlockFormat::BC7, compressed, decompressed)
}

/// Decodes a BC7 block into the 4x4 RGBA8 pixels of `decompressed`.
///
/// Malformed blocks produce a block filled with [`ERROR_COLOR`].
pub fn decode_bc7_block(compressed: &[u8], decompressed: &mut [u8]) {
    if let Err(error) = try_decode_bc7_block(compressed, decompressed) {
        debug!(%error, "BC7 block decoding failed, writing error color");
        fill_error(4, 4, decompressed);
    }
}

/// Writes `width * height` pixels of [`ERROR_COLOR`] to the start of
/// `decompressed`. Pixels that don't fit into the slice are skipped.
pub fn fill_error(width: u8, height: u8, decompressed: &mut [u8]) {
    let pixel_count = width as usize * height as usize;
    let len = (pixel_count * 4).min(decompressed.len() & !3);
    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut decompressed[..len]);
    pixels.fill(ERROR_COLOR);
}

fn fill_error_with_pitch(width: usize, height: usize, decompressed: &mut [u8], pitch: usize) {
    for y in 0..height {
        let start = match y.checked_mul(pitch) {
            Some(start) if start < decompressed.len() => start,
            _ => break,
        };
        let end = start.saturating_add(width * 4).min(decompressed.len());
        decompressed[start..end]
            .chunks_exact_mut(4)
            .for_each(|pixel| pixel.copy_from_slice(&ERROR_COLOR));
    }
}
