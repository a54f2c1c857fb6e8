#![no_main]

// Arbitrary blocks and footprints must never panic, every byte of the
// requested block must be written, and accepted blocks must match astc-decode.

use block_decompression::decode::{decode_astc_block, try_decode_astc_block};
use block_decompression::ERROR_COLOR;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct AstcBlock {
    pub bytes: [u8; 16],
    pub width: u8,
    pub height: u8,
}

fuzz_target!(|block: AstcBlock| {
    // Larger requests only ever hit the unsupported footprint path.
    let width = block.width % 16;
    let height = block.height % 16;
    let len = usize::from(width) * usize::from(height) * 4;

    let mut first = vec![0x00u8; len];
    let mut second = vec![0xFFu8; len];
    decode_astc_block(&block.bytes, width, height, &mut first);
    decode_astc_block(&block.bytes, width, height, &mut second);
    assert_eq!(first, second, "Decoder left pixels unwritten");

    let mut explicit = vec![0u8; len];
    match try_decode_astc_block(&block.bytes, width, height, &mut explicit) {
        Ok(()) => assert_eq!(first, explicit),
        Err(_) => {
            assert!(first.chunks_exact(4).all(|pixel| pixel == ERROR_COLOR));
            return;
        }
    }

    // Only supported footprints get this far.
    let footprint = astc_decode::Footprint::new(u32::from(width), u32::from(height));
    let mut reference = vec![0u8; len];
    let accepted = astc_decode::astc_decode_block(&block.bytes, footprint, |x, y, rgba| {
        let offset = (y as usize * usize::from(width) + x as usize) * 4;
        reference[offset..offset + 4].copy_from_slice(&rgba);
    });
    assert!(accepted, "Reference rejected a decoded block");
    assert_eq!(explicit, reference, "Decoded blocks don't match");
});
