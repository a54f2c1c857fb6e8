//! ASTC block decoding for the LDR profile.
//!
//! Blocks are validated here and decoded by `astc-decode`. All texels are
//! collected before anything is written, so a malformed block never writes a
//! pixel.
mod endpoints;
mod quantization;

use tracing::trace;

use self::quantization::{Quantization, MIN_COLOR_QUANTIZATION, QUANTIZATIONS};
use crate::{BlockError, Footprint, BLOCK_BYTE_SIZE};

const MAX_TEXELS: usize = 144;
const MAX_WEIGHTS: u32 = 64;
const MAX_COLOR_VALUES: u32 = 18;
const MAX_PARTITIONS: usize = 4;

/// Decodes an ASTC block from `compressed_block` and writes the RGBA8 data
/// into `decompressed_block` with `destination_pitch` many bytes per output row.
pub(crate) fn decode_block_astc(
    compressed_block: &[u8; BLOCK_BYTE_SIZE],
    footprint: Footprint,
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) -> Result<(), BlockError> {
    let texels = decode_texels(compressed_block, footprint)?;

    let width = usize::from(footprint.width());
    for (y, row) in texels[..footprint.pixel_count()].chunks_exact(width).enumerate() {
        let offset = y * destination_pitch;
        let destination = &mut decompressed_block[offset..offset + width * 4];
        destination.copy_from_slice(bytemuck::cast_slice(row));
    }

    Ok(())
}

/// Decodes all texels of a block in row-major order.
fn decode_texels(
    compressed_block: &[u8; BLOCK_BYTE_SIZE],
    footprint: Footprint,
) -> Result<[[u8; 4]; MAX_TEXELS], BlockError> {
    let block = u128::from_le_bytes(*compressed_block);
    if bits(block, 0, 9) == 0x1FC {
        check_void_extent(block)?;
    } else {
        let parameters = BlockParameters::parse(block, footprint)?;
        trace!(
            %footprint,
            grid_width = parameters.mode.grid_width,
            grid_height = parameters.mode.grid_height,
            weight_levels = parameters.mode.weight_quantization.levels,
            dual_plane_channel = ?parameters.dual_plane_channel,
            partitions = parameters.partition_count,
            endpoint_modes = ?&parameters.endpoint_modes[..parameters.partition_count as usize],
            color_levels = parameters.color_quantization.levels,
            "Decoding ASTC block"
        );
    }

    let width = usize::from(footprint.width());
    let mut texels = [[0u8; 4]; MAX_TEXELS];
    let decoded = astc_decode::astc_decode_block(
        compressed_block,
        astc_footprint(footprint),
        |x, y, rgba| {
            if let Some(texel) = texels.get_mut(y as usize * width + x as usize) {
                *texel = rgba;
            }
        },
    );
    if !decoded {
        return Err(BlockError::RejectedByDecoder);
    }

    Ok(texels)
}

fn astc_footprint(footprint: Footprint) -> astc_decode::Footprint {
    astc_decode::Footprint::new(u32::from(footprint.width()), u32::from(footprint.height()))
}

#[inline]
fn bits(block: u128, start: u32, count: u32) -> u32 {
    ((block >> start) & ((1u128 << count) - 1)) as u32
}

fn check_void_extent(block: u128) -> Result<(), BlockError> {
    if bits(block, 10, 2) != 0b11 {
        return Err(BlockError::InvalidVoidExtent);
    }
    if bits(block, 9, 1) != 0 {
        return Err(BlockError::HdrVoidExtent);
    }

    let low_s = bits(block, 12, 13);
    let high_s = bits(block, 25, 13);
    let low_t = bits(block, 38, 13);
    let high_t = bits(block, 51, 13);
    let all_ones = low_s == 0x1FFF && high_s == 0x1FFF && low_t == 0x1FFF && high_t == 0x1FFF;
    if !all_ones && (low_s >= high_s || low_t >= high_t) {
        return Err(BlockError::InvalidVoidExtent);
    }

    Ok(())
}

/// Weight grid layout stored in the 11 block mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockMode {
    grid_width: u32,
    grid_height: u32,
    dual_plane: bool,
    weight_quantization: Quantization,
}

impl BlockMode {
    fn parse(block: u128) -> Result<Self, BlockError> {
        let mode = bits(block, 0, 11);
        let bit = |index: u32| (mode >> index) & 1;
        let a = (mode >> 5) & 3;
        let b = (mode >> 7) & 3;

        if mode & 0xF == 0 || (mode & 3 == 0 && mode & 0x1C0 == 0x1C0) {
            return Err(BlockError::ReservedBlockMode);
        }

        let mut dual_plane = bit(10) == 1;
        let mut high_precision = bit(9) == 1;

        let (range, grid_width, grid_height) = if mode & 3 != 0 {
            let range = bit(4) | (mode & 3) << 1;
            let (width, height) = match (mode >> 2) & 3 {
                0 => (b + 4, a + 2),
                1 => (b + 8, a + 2),
                2 => (a + 2, b + 8),
                _ if bit(8) == 0 => (a + 2, (b & 1) + 6),
                _ => ((b & 1) + 2, a + 2),
            };
            (range, width, height)
        } else {
            let range = bit(4) | (mode & 0xC) >> 1;
            let (width, height) = match (mode >> 7) & 3 {
                0 => (12, a + 2),
                1 => (a + 2, 12),
                2 => {
                    dual_plane = false;
                    high_precision = false;
                    (a + 6, ((mode >> 9) & 3) + 6)
                }
                _ if bit(5) == 0 => (6, 10),
                _ => (10, 6),
            };
            (range, width, height)
        };

        let quantization_index = (range - 2) + if high_precision { 6 } else { 0 };
        Ok(BlockMode {
            grid_width,
            grid_height,
            dual_plane,
            weight_quantization: QUANTIZATIONS[quantization_index as usize],
        })
    }

    fn weight_count(&self) -> u32 {
        self.grid_width * self.grid_height * if self.dual_plane { 2 } else { 1 }
    }
}

/// The layout of a block that passed validation.
#[derive(Debug, Clone, Copy)]
struct BlockParameters {
    mode: BlockMode,
    partition_count: u32,
    endpoint_modes: [u8; MAX_PARTITIONS],
    color_quantization: Quantization,
    /// Channel that uses the second weight plane.
    dual_plane_channel: Option<usize>,
}

impl BlockParameters {
    fn parse(block: u128, footprint: Footprint) -> Result<Self, BlockError> {
        let mode = BlockMode::parse(block)?;

        if mode.grid_width > u32::from(footprint.width())
            || mode.grid_height > u32::from(footprint.height())
        {
            return Err(BlockError::WeightGridTooLarge {
                grid_width: mode.grid_width as u8,
                grid_height: mode.grid_height as u8,
            });
        }

        let weight_count = mode.weight_count();
        if weight_count > MAX_WEIGHTS {
            return Err(BlockError::InvalidWeightCount(weight_count));
        }

        let weight_bits = mode.weight_quantization.sequence_bits(weight_count);
        if !(24..=96).contains(&weight_bits) {
            return Err(BlockError::InvalidWeightBits(weight_bits));
        }

        let partition_count = bits(block, 11, 2) + 1;
        if mode.dual_plane && partition_count == 4 {
            return Err(BlockError::DualPlaneWithFourPartitions);
        }

        let mut below_weights = 128 - weight_bits;
        let mut endpoint_modes = [0u8; MAX_PARTITIONS];
        // The partition index sits in bits 13..23 of multi partition blocks.
        let color_start = if partition_count == 1 {
            endpoint_modes[0] = bits(block, 13, 4) as u8;
            17
        } else {
            let low = bits(block, 23, 6);
            if low & 3 == 0 {
                endpoint_modes.fill(((low >> 2) & 0xF) as u8);
            } else {
                let extra_bits = 3 * partition_count - 4;
                below_weights -= extra_bits;
                let encoded = low | bits(block, below_weights, extra_bits) << 6;
                let base_class = (encoded & 3) - 1;
                for (i, endpoint_mode) in endpoint_modes
                    .iter_mut()
                    .take(partition_count as usize)
                    .enumerate()
                {
                    let i = i as u32;
                    let class = base_class + ((encoded >> (2 + i)) & 1);
                    let m = (encoded >> (2 + partition_count + 2 * i)) & 3;
                    *endpoint_mode = (class << 2 | m) as u8;
                }
            }
            29
        };

        let dual_plane_channel = if mode.dual_plane {
            below_weights -= 2;
            Some(bits(block, below_weights, 2) as usize)
        } else {
            None
        };

        let mut color_value_count = 0;
        for &endpoint_mode in &endpoint_modes[..partition_count as usize] {
            endpoints::check_ldr(endpoint_mode)?;
            color_value_count += endpoints::value_count(endpoint_mode);
        }
        if color_value_count > MAX_COLOR_VALUES {
            return Err(BlockError::TooManyColorValues(color_value_count));
        }

        let color_bits = below_weights
            .checked_sub(color_start)
            .ok_or(BlockError::InsufficientColorBits)?;
        let color_quantization = QUANTIZATIONS[MIN_COLOR_QUANTIZATION..]
            .iter()
            .rev()
            .find(|quantization| quantization.sequence_bits(color_value_count) <= color_bits)
            .copied()
            .ok_or(BlockError::InsufficientColorBits)?;

        Ok(BlockParameters {
            mode,
            partition_count,
            endpoint_modes,
            color_quantization,
            dual_plane_channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// A 4x4 block with a 4x4 grid of 2 bit weights and RGB direct endpoints
    /// black and white. The lower half of the weights is at full strength.
    fn two_tone_block() -> u128 {
        let mut block = 0x42u128 | 8 << 13;
        for (i, value) in [0u128, 255, 0, 255, 0, 255].into_iter().enumerate() {
            block |= value << (17 + 8 * i);
        }
        // Weight i lives at bits 127 - 2i and 126 - 2i.
        for i in 8..16 {
            block |= 0b11 << (126 - 2 * i);
        }
        block
    }

    fn void_extent(r: u16, g: u16, b: u16, a: u16) -> u128 {
        let mut block = 0xDFCu128;
        block |= ((1u128 << 52) - 1) << 12;
        block |= u128::from(r) << 64 | u128::from(g) << 80 | u128::from(b) << 96 | u128::from(a) << 112;
        block
    }

    fn decode(block: u128, footprint: Footprint) -> Result<Vec<u8>, BlockError> {
        let mut decoded = vec![0u8; footprint.decoded_byte_size()];
        let row_bytes = usize::from(footprint.width()) * 4;
        decode_block_astc(&block.to_le_bytes(), footprint, &mut decoded, row_bytes)?;
        Ok(decoded)
    }

    #[test]
    fn test_two_tone_block() {
        let decoded = decode(two_tone_block(), Footprint::Astc4x4).unwrap();
        for (i, pixel) in decoded.chunks_exact(4).enumerate() {
            let expected = if i < 8 { [0, 0, 0, 255] } else { [255, 255, 255, 255] };
            assert_eq!(pixel, expected, "pixel {i}");
        }
    }

    #[test]
    fn test_block_mode_of_two_tone_block() {
        let mode = BlockMode::parse(two_tone_block()).unwrap();
        assert_eq!((mode.grid_width, mode.grid_height), (4, 4));
        assert!(!mode.dual_plane);
        assert_eq!(mode.weight_quantization.levels, 4);
    }

    #[test]
    fn test_two_partitions() {
        const RED: [u8; 4] = [255, 0, 0, 255];
        const BLUE: [u8; 4] = [0, 0, 255, 255];

        // 4x4 grid of trit weights (all zero), two partitions sharing RGB
        // direct endpoints, colors quantized to 6 bits.
        let mut both_used = false;
        for seed in 0..64u128 {
            let mut block = 0x51u128 | 1 << 11 | seed << 13 | (8 << 2) << 23;
            let values = [63u128, 63, 0, 0, 0, 0, 0, 0, 0, 0, 63, 63];
            for (i, value) in values.into_iter().enumerate() {
                block |= value << (29 + 6 * i);
            }

            let decoded = decode(block, Footprint::Astc4x4).unwrap();
            let pixels: Vec<&[u8]> = decoded.chunks_exact(4).collect();
            assert!(pixels.iter().all(|&p| p == RED || p == BLUE), "seed {seed}");
            both_used |= pixels.contains(&&RED[..]) && pixels.contains(&&BLUE[..]);
        }
        assert!(both_used);
    }

    #[test]
    fn test_dual_plane_red_channel() {
        // 4x4 grid with two planes of 2 bit weights and luminance endpoints
        // black and white. Red follows the second plane, which is all ones.
        let mut block = 0x42u128 | 1 << 10 | 255 << 25;
        for j in (1..32).step_by(2) {
            block |= 0b11 << (126 - 2 * j);
        }

        let parameters = BlockParameters::parse(block, Footprint::Astc4x4).unwrap();
        assert_eq!(parameters.dual_plane_channel, Some(0));
        assert_eq!(parameters.color_quantization.levels, 256);

        let decoded = decode(block, Footprint::Astc4x4).unwrap();
        for pixel in decoded.chunks_exact(4) {
            assert_eq!(pixel, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn test_void_extent() {
        let block = void_extent(0xFFFF, 0, 0x8080, 0xFFFF);
        let decoded = decode(block, Footprint::Astc6x5).unwrap();
        for pixel in decoded.chunks_exact(4) {
            assert_eq!(pixel, [255, 0, 128, 255]);
        }
    }

    #[test]
    fn test_void_extent_reserved_bits() {
        let block = void_extent(0, 0, 0, 0) & !(1 << 10);
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::InvalidVoidExtent)
        );
    }

    #[test]
    fn test_void_extent_hdr() {
        let block = void_extent(0, 0, 0, 0) | 1 << 9;
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::HdrVoidExtent)
        );
    }

    #[test]
    fn test_void_extent_coordinates() {
        // low_s = 0, high_s = 0
        let block = void_extent(0, 0, 0, 0) & !(((1u128 << 26) - 1) << 12);
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::InvalidVoidExtent)
        );

        // low_s = 0 < high_s, low_t = 0 < high_t
        let mut block = void_extent(0, 0, 0, 0);
        block &= !(0x1FFFu128 << 12);
        block &= !(0x1FFFu128 << 38);
        assert!(decode(block, Footprint::Astc4x4).is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(0x10)]
    #[case(0x1C0)]
    #[case(0x1C4)]
    #[case(0x5CC)]
    fn test_reserved_block_modes(#[case] mode: u128) {
        assert_eq!(
            decode(mode, Footprint::Astc12x12),
            Err(BlockError::ReservedBlockMode)
        );
    }

    #[test]
    fn test_weight_grid_larger_than_footprint() {
        // Layout 1 with A = 2, B = 0 is an 8x4 grid.
        let block = 0x45u128 | 8 << 13;
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::WeightGridTooLarge {
                grid_width: 8,
                grid_height: 4
            })
        );
    }

    #[test]
    fn test_too_many_weights() {
        // A = 3, B = 3 in the layout without dual plane gives a 9x9 grid.
        let block = 0x764u128;
        assert_eq!(
            decode(block, Footprint::Astc12x12),
            Err(BlockError::InvalidWeightCount(81))
        );
    }

    #[test]
    fn test_too_many_weight_bits() {
        // A 12x5 grid of 2 bit weights.
        let block = 0x68u128;
        assert_eq!(
            decode(block, Footprint::Astc12x12),
            Err(BlockError::InvalidWeightBits(120))
        );
    }

    #[test]
    fn test_too_few_weight_bits() {
        // A 4x4 grid of 1 bit weights.
        let block = 0x41u128 | 8 << 13;
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::InvalidWeightBits(16))
        );
    }

    #[test]
    fn test_dual_plane_with_four_partitions() {
        let block = two_tone_block() | 1 << 10 | 0b11 << 11;
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::DualPlaneWithFourPartitions)
        );
    }

    #[test]
    fn test_hdr_endpoint_mode() {
        let block = (two_tone_block() & !(0xF << 13)) | 7 << 13;
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::HdrEndpointMode(7))
        );
    }

    #[test]
    fn test_too_many_color_values() {
        // Four partitions with RGBA endpoints need 32 values.
        let block = 0x42u128 | 0b11 << 11 | (12 << 2) << 23;
        assert_eq!(
            decode(block, Footprint::Astc4x4),
            Err(BlockError::TooManyColorValues(32))
        );
    }

    #[test]
    fn test_void_extent_keeps_high_byte() {
        let block = void_extent(0x00FF, 0x01FF, 0x7FFF, 0x8000);
        let decoded = decode(block, Footprint::Astc4x4).unwrap();
        assert_eq!(&decoded[..4], &[0, 1, 127, 128]);
    }

    #[test]
    fn test_rejected_block_writes_nothing() {
        let mut decoded = [0x11u8; 64];
        let result = decode_block_astc(&[0; 16], Footprint::Astc4x4, &mut decoded, 16);
        assert_eq!(result, Err(BlockError::ReservedBlockMode));
        assert!(decoded.iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_every_footprint_converts() {
        for footprint in Footprint::ALL {
            let converted = astc_footprint(footprint);
            assert_eq!(converted.block_width(), u32::from(footprint.width()));
            assert_eq!(converted.block_height(), u32::from(footprint.height()));
        }
    }
}
