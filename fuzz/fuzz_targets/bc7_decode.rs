#![no_main]

// This fuzz test compares our BC7 decoder against bcdec_rs.

use block_decompression::decode::{decode_bc7_block, try_decode_bc7_block};
use block_decompression::ERROR_COLOR;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Bc7Block {
    pub bytes: [u8; 16],
}

fuzz_target!(|block: Bc7Block| {
    let mut ours = [0u8; 64];
    decode_bc7_block(&block.bytes, &mut ours);

    // No mode bit set, bcdec_rs writes transparent black here.
    if block.bytes[0] == 0 {
        assert!(try_decode_bc7_block(&block.bytes, &mut [0u8; 64]).is_err());
        assert!(ours.chunks_exact(4).all(|pixel| pixel == ERROR_COLOR));
        return;
    }

    let mut expected = [0u8; 64];
    bcdec_rs::bc7(&block.bytes, &mut expected, 4 * 4);
    assert_eq!(ours, expected, "Decoded blocks don't match");
});
