#![allow(dead_code)]

use block_decompression::{Footprint, ERROR_COLOR};
use rand::{Rng, RngCore, SeedableRng};

pub const POISON_A: u8 = 0xCD;
pub const POISON_B: u8 = 0x3C;

/// The same RNG seed on every run, so failures reproduce.
pub fn create_rng() -> impl Rng {
    rand_chacha::ChaChaRng::seed_from_u64(123456789)
}

pub fn random_block(rng: &mut impl RngCore) -> [u8; 16] {
    let mut block = [0u8; 16];
    rng.fill_bytes(&mut block);
    block
}

/// Runs `decode` on two buffers prefilled with different values and asserts
/// that both end up identical, i.e. every byte was written.
pub fn decode_fully<F>(len: usize, mut decode: F) -> Vec<u8>
where
    F: FnMut(&mut [u8]),
{
    let mut a = vec![POISON_A; len];
    let mut b = vec![POISON_B; len];
    decode(&mut a);
    decode(&mut b);
    assert_eq!(a, b, "decoder left bytes of the output untouched");
    a
}

pub fn is_error_block(pixels: &[u8]) -> bool {
    pixels.chunks_exact(4).all(|pixel| pixel == ERROR_COLOR)
}

pub fn assert_error_block(pixels: &[u8], pixel_count: usize) {
    assert_eq!(pixels.len(), pixel_count * 4);
    for (i, pixel) in pixels.chunks_exact(4).enumerate() {
        assert_eq!(pixel, ERROR_COLOR, "pixel {i} is not the error color");
    }
}

/// An LDR void-extent ASTC block of the given UNORM16 color.
pub fn astc_void_extent(r: u16, g: u16, b: u16, a: u16) -> [u8; 16] {
    let mut block = 0xDFCu128 | ((1u128 << 52) - 1) << 12;
    block |= u128::from(r) << 64 | u128::from(g) << 80 | u128::from(b) << 96 | u128::from(a) << 112;
    block.to_le_bytes()
}

/// A single partition ASTC block with a 4x4 grid of 2 bit weights and RGB
/// endpoints black and white. The weights of the lower two grid rows are one.
pub fn astc_two_tone() -> [u8; 16] {
    let mut block = 0x42u128 | 8 << 13;
    for (i, value) in [0u128, 255, 0, 255, 0, 255].into_iter().enumerate() {
        block |= value << (17 + 8 * i);
    }
    for i in 8..16 {
        block |= 0b11 << (126 - 2 * i);
    }
    block.to_le_bytes()
}

pub fn all_footprints() -> impl Iterator<Item = Footprint> {
    Footprint::ALL.into_iter()
}

/// Opaque BC7 mode 6 block and some of its decoded pixels as `(x, y, rgba)`.
pub const BC7_BLOCK_0: [u8; 16] = [
    0x40, 0xAF, 0xF6, 0x0B, 0xFD, 0x2E, 0xFF, 0xFF, 0x11, 0x71, 0x10, 0xA1, 0x21, 0xF2, 0x33, 0x73,
];
pub const BC7_BLOCK_0_PIXELS: [(usize, usize, [u8; 4]); 10] = [
    (0, 0, [0xBD, 0xBF, 0xBF, 0xFF]),
    (1, 0, [0xBD, 0xBD, 0xBD, 0xFF]),
    (0, 1, [0xBD, 0xBF, 0xBF, 0xFF]),
    (1, 1, [0xBD, 0xBD, 0xBD, 0xFF]),
    (0, 2, [0xBD, 0xBD, 0xBD, 0xFF]),
    (1, 2, [0xBC, 0xBB, 0xB9, 0xFF]),
    (0, 3, [0xBB, 0xB9, 0xB7, 0xFF]),
    (1, 3, [0xBB, 0xB9, 0xB7, 0xFF]),
    (2, 3, [0xBB, 0xB9, 0xB7, 0xFF]),
    (3, 3, [0xB9, 0xB1, 0xAC, 0xFF]),
];

/// BC7 mode 6 block with alpha just below one.
pub const BC7_BLOCK_1: [u8; 16] = [
    0xC0, 0x8C, 0xEF, 0xA2, 0xBB, 0xDC, 0xFE, 0x7F, 0x6C, 0x55, 0x6A, 0x34, 0x4F, 0x00, 0x5D, 0x00,
];
pub const BC7_BLOCK_1_PIXELS: [(usize, usize, [u8; 4]); 10] = [
    (0, 0, [0x50, 0x4A, 0x48, 0xFE]),
    (1, 0, [0x50, 0x4A, 0x48, 0xFE]),
    (0, 1, [0x64, 0x5D, 0x59, 0xFE]),
    (1, 1, [0x50, 0x4A, 0x48, 0xFE]),
    (0, 2, [0x7C, 0x74, 0x6E, 0xFE]),
    (1, 2, [0x46, 0x41, 0x3F, 0xFE]),
    (0, 3, [0x72, 0x6A, 0x65, 0xFE]),
    (1, 3, [0x4A, 0x45, 0x43, 0xFE]),
    (2, 3, [0x32, 0x2E, 0x2E, 0xFE]),
    (3, 3, [0x32, 0x2E, 0x2E, 0xFE]),
];

pub fn pixel(pixels: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let offset = (y * width + x) * 4;
    [
        pixels[offset],
        pixels[offset + 1],
        pixels[offset + 2],
        pixels[offset + 3],
    ]
}
