//! BC7 block decoding, following the BPTC description of "bcdec.h".
//!
//! <https://github.com/iOrange/bcdec/blob/main/bcdec.h>
use crate::{BlockError, BLOCK_BYTE_SIZE};

#[derive(Clone, Copy, PartialEq, Eq)]
enum PBits {
    None,
    /// One p-bit per subset, shared by both endpoints.
    Shared,
    /// One p-bit per endpoint.
    Unique,
}

struct Mode {
    subsets: usize,
    partition_bits: u32,
    rotation_bits: u32,
    has_index_selection: bool,
    color_bits: u32,
    alpha_bits: u32,
    p_bits: PBits,
    index_bits: u32,
    /// Bits of the secondary index set, zero for modes with a single index set.
    secondary_index_bits: u32,
}

static MODES: [Mode; 8] = [
    Mode {
        subsets: 3,
        partition_bits: 4,
        rotation_bits: 0,
        has_index_selection: false,
        color_bits: 4,
        alpha_bits: 0,
        p_bits: PBits::Unique,
        index_bits: 3,
        secondary_index_bits: 0,
    },
    Mode {
        subsets: 2,
        partition_bits: 6,
        rotation_bits: 0,
        has_index_selection: false,
        color_bits: 6,
        alpha_bits: 0,
        p_bits: PBits::Shared,
        index_bits: 3,
        secondary_index_bits: 0,
    },
    Mode {
        subsets: 3,
        partition_bits: 6,
        rotation_bits: 0,
        has_index_selection: false,
        color_bits: 5,
        alpha_bits: 0,
        p_bits: PBits::None,
        index_bits: 2,
        secondary_index_bits: 0,
    },
    Mode {
        subsets: 2,
        partition_bits: 6,
        rotation_bits: 0,
        has_index_selection: false,
        color_bits: 7,
        alpha_bits: 0,
        p_bits: PBits::Unique,
        index_bits: 2,
        secondary_index_bits: 0,
    },
    Mode {
        subsets: 1,
        partition_bits: 0,
        rotation_bits: 2,
        has_index_selection: true,
        color_bits: 5,
        alpha_bits: 6,
        p_bits: PBits::None,
        index_bits: 2,
        secondary_index_bits: 3,
    },
    Mode {
        subsets: 1,
        partition_bits: 0,
        rotation_bits: 2,
        has_index_selection: false,
        color_bits: 7,
        alpha_bits: 8,
        p_bits: PBits::None,
        index_bits: 2,
        secondary_index_bits: 2,
    },
    Mode {
        subsets: 1,
        partition_bits: 0,
        rotation_bits: 0,
        has_index_selection: false,
        color_bits: 7,
        alpha_bits: 7,
        p_bits: PBits::Unique,
        index_bits: 4,
        secondary_index_bits: 0,
    },
    Mode {
        subsets: 2,
        partition_bits: 6,
        rotation_bits: 0,
        has_index_selection: false,
        color_bits: 5,
        alpha_bits: 5,
        p_bits: PBits::Unique,
        index_bits: 2,
        secondary_index_bits: 0,
    },
];

// Subset assignment of the 64 shapes for two and three subsets.
// Anchor pixels have the MSB set, the subset index is in the low two bits.
static PARTITION_SETS: [[[[u8; 4]; 4]; 64]; 2] = [
    [
        // Partition table for 2-subset BPTC
        [[128, 0, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 0, 1, 129]], //  0
        [[128, 0, 0, 1], [0, 0, 0, 1], [0, 0, 0, 1], [0, 0, 0, 129]], //  1
        [[128, 1, 1, 1], [0, 1, 1, 1], [0, 1, 1, 1], [0, 1, 1, 129]], //  2
        [[128, 0, 0, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 1, 1, 129]], //  3
        [[128, 0, 0, 0], [0, 0, 0, 1], [0, 0, 0, 1], [0, 0, 1, 129]], //  4
        [[128, 0, 1, 1], [0, 1, 1, 1], [0, 1, 1, 1], [1, 1, 1, 129]], //  5
        [[128, 0, 0, 1], [0, 0, 1, 1], [0, 1, 1, 1], [1, 1, 1, 129]], //  6
        [[128, 0, 0, 0], [0, 0, 0, 1], [0, 0, 1, 1], [0, 1, 1, 129]], //  7
        [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 1], [0, 0, 1, 129]], //  8
        [[128, 0, 1, 1], [0, 1, 1, 1], [1, 1, 1, 1], [1, 1, 1, 129]], //  9
        [[128, 0, 0, 0], [0, 0, 0, 1], [0, 1, 1, 1], [1, 1, 1, 129]], // 10
        [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 1], [0, 1, 1, 129]], // 11
        [[128, 0, 0, 1], [0, 1, 1, 1], [1, 1, 1, 1], [1, 1, 1, 129]], // 12
        [[128, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [1, 1, 1, 129]], // 13
        [[128, 0, 0, 0], [1, 1, 1, 1], [1, 1, 1, 1], [1, 1, 1, 129]], // 14
        [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 129]], // 15
        [[128, 0, 0, 0], [1, 0, 0, 0], [1, 1, 1, 0], [1, 1, 1, 129]], // 16
        [[128, 1, 129, 1], [0, 0, 0, 1], [0, 0, 0, 0], [0, 0, 0, 0]], // 17
        [[128, 0, 0, 0], [0, 0, 0, 0], [129, 0, 0, 0], [1, 1, 1, 0]], // 18
        [[128, 1, 129, 1], [0, 0, 1, 1], [0, 0, 0, 1], [0, 0, 0, 0]], // 19
        [[128, 0, 129, 1], [0, 0, 0, 1], [0, 0, 0, 0], [0, 0, 0, 0]], // 20
        [[128, 0, 0, 0], [1, 0, 0, 0], [129, 1, 0, 0], [1, 1, 1, 0]], // 21
        [[128, 0, 0, 0], [0, 0, 0, 0], [129, 0, 0, 0], [1, 1, 0, 0]], // 22
        [[128, 1, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1], [0, 0, 0, 129]], // 23
        [[128, 0, 129, 1], [0, 0, 0, 1], [0, 0, 0, 1], [0, 0, 0, 0]], // 24
        [[128, 0, 0, 0], [1, 0, 0, 0], [129, 0, 0, 0], [1, 1, 0, 0]], // 25
        [[128, 1, 129, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 1, 1, 0]], // 26
        [[128, 0, 129, 1], [0, 1, 1, 0], [0, 1, 1, 0], [1, 1, 0, 0]], // 27
        [[128, 0, 0, 1], [0, 1, 1, 1], [129, 1, 1, 0], [1, 0, 0, 0]], // 28
        [[128, 0, 0, 0], [1, 1, 1, 1], [129, 1, 1, 1], [0, 0, 0, 0]], // 29
        [[128, 1, 129, 1], [0, 0, 0, 1], [1, 0, 0, 0], [1, 1, 1, 0]], // 30
        [[128, 0, 129, 1], [1, 0, 0, 1], [1, 0, 0, 1], [1, 1, 0, 0]], // 31
        [[128, 1, 0, 1], [0, 1, 0, 1], [0, 1, 0, 1], [0, 1, 0, 129]], // 32
        [[128, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [1, 1, 1, 129]], // 33
        [[128, 1, 0, 1], [1, 0, 129, 0], [0, 1, 0, 1], [1, 0, 1, 0]], // 34
        [[128, 0, 1, 1], [0, 0, 1, 1], [129, 1, 0, 0], [1, 1, 0, 0]], // 35
        [[128, 0, 129, 1], [1, 1, 0, 0], [0, 0, 1, 1], [1, 1, 0, 0]], // 36
        [[128, 1, 0, 1], [0, 1, 0, 1], [129, 0, 1, 0], [1, 0, 1, 0]], // 37
        [[128, 1, 1, 0], [1, 0, 0, 1], [0, 1, 1, 0], [1, 0, 0, 129]], // 38
        [[128, 1, 0, 1], [1, 0, 1, 0], [1, 0, 1, 0], [0, 1, 0, 129]], // 39
        [[128, 1, 129, 1], [0, 0, 1, 1], [1, 1, 0, 0], [1, 1, 1, 0]], // 40
        [[128, 0, 0, 1], [0, 0, 1, 1], [129, 1, 0, 0], [1, 0, 0, 0]], // 41
        [[128, 0, 129, 1], [0, 0, 1, 0], [0, 1, 0, 0], [1, 1, 0, 0]], // 42
        [[128, 0, 129, 1], [1, 0, 1, 1], [1, 1, 0, 1], [1, 1, 0, 0]], // 43
        [[128, 1, 129, 0], [1, 0, 0, 1], [1, 0, 0, 1], [0, 1, 1, 0]], // 44
        [[128, 0, 1, 1], [1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 1, 129]], // 45
        [[128, 1, 1, 0], [0, 1, 1, 0], [1, 0, 0, 1], [1, 0, 0, 129]], // 46
        [[128, 0, 0, 0], [0, 1, 129, 0], [0, 1, 1, 0], [0, 0, 0, 0]], // 47
        [[128, 1, 0, 0], [1, 1, 129, 0], [0, 1, 0, 0], [0, 0, 0, 0]], // 48
        [[128, 0, 129, 0], [0, 1, 1, 1], [0, 0, 1, 0], [0, 0, 0, 0]], // 49
        [[128, 0, 0, 0], [0, 0, 129, 0], [0, 1, 1, 1], [0, 0, 1, 0]], // 50
        [[128, 0, 0, 0], [0, 1, 0, 0], [129, 1, 1, 0], [0, 1, 0, 0]], // 51
        [[128, 1, 1, 0], [1, 1, 0, 0], [1, 0, 0, 1], [0, 0, 1, 129]], // 52
        [[128, 0, 1, 1], [0, 1, 1, 0], [1, 1, 0, 0], [1, 0, 0, 129]], // 53
        [[128, 1, 129, 0], [0, 0, 1, 1], [1, 0, 0, 1], [1, 1, 0, 0]], // 54
        [[128, 0, 129, 1], [1, 0, 0, 1], [1, 1, 0, 0], [0, 1, 1, 0]], // 55
        [[128, 1, 1, 0], [1, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 129]], // 56
        [[128, 1, 1, 0], [0, 0, 1, 1], [0, 0, 1, 1], [1, 0, 0, 129]], // 57
        [[128, 1, 1, 1], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 129]], // 58
        [[128, 0, 0, 1], [1, 0, 0, 0], [1, 1, 1, 0], [0, 1, 1, 129]], // 59
        [[128, 0, 0, 0], [1, 1, 1, 1], [0, 0, 1, 1], [0, 0, 1, 129]], // 60
        [[128, 0, 129, 1], [0, 0, 1, 1], [1, 1, 1, 1], [0, 0, 0, 0]], // 61
        [[128, 0, 129, 0], [0, 0, 1, 0], [1, 1, 1, 0], [1, 1, 1, 0]], // 62
        [[128, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 1], [0, 1, 1, 129]], // 63
    ],
    [
        // Partition table for 3-subset BPTC
        [[128, 0, 1, 129], [0, 0, 1, 1], [0, 2, 2, 1], [2, 2, 2, 130]], //  0
        [[128, 0, 0, 129], [0, 0, 1, 1], [130, 2, 1, 1], [2, 2, 2, 1]], //  1
        [[128, 0, 0, 0], [2, 0, 0, 1], [130, 2, 1, 1], [2, 2, 1, 129]], //  2
        [[128, 2, 2, 130], [0, 0, 2, 2], [0, 0, 1, 1], [0, 1, 1, 129]], //  3
        [[128, 0, 0, 0], [0, 0, 0, 0], [129, 1, 2, 2], [1, 1, 2, 130]], //  4
        [[128, 0, 1, 129], [0, 0, 1, 1], [0, 0, 2, 2], [0, 0, 2, 130]], //  5
        [[128, 0, 2, 130], [0, 0, 2, 2], [1, 1, 1, 1], [1, 1, 1, 129]], //  6
        [[128, 0, 1, 1], [0, 0, 1, 1], [130, 2, 1, 1], [2, 2, 1, 129]], //  7
        [[128, 0, 0, 0], [0, 0, 0, 0], [129, 1, 1, 1], [2, 2, 2, 130]], //  8
        [[128, 0, 0, 0], [1, 1, 1, 1], [129, 1, 1, 1], [2, 2, 2, 130]], //  9
        [[128, 0, 0, 0], [1, 1, 129, 1], [2, 2, 2, 2], [2, 2, 2, 130]], // 10
        [[128, 0, 1, 2], [0, 0, 129, 2], [0, 0, 1, 2], [0, 0, 1, 130]], // 11
        [[128, 1, 1, 2], [0, 1, 129, 2], [0, 1, 1, 2], [0, 1, 1, 130]], // 12
        [[128, 1, 2, 2], [0, 129, 2, 2], [0, 1, 2, 2], [0, 1, 2, 130]], // 13
        [[128, 0, 1, 129], [0, 1, 1, 2], [1, 1, 2, 2], [1, 2, 2, 130]], // 14
        [[128, 0, 1, 129], [2, 0, 0, 1], [130, 2, 0, 0], [2, 2, 2, 0]], // 15
        [[128, 0, 0, 129], [0, 0, 1, 1], [0, 1, 1, 2], [1, 1, 2, 130]], // 16
        [[128, 1, 1, 129], [0, 0, 1, 1], [130, 0, 0, 1], [2, 2, 0, 0]], // 17
        [[128, 0, 0, 0], [1, 1, 2, 2], [129, 1, 2, 2], [1, 1, 2, 130]], // 18
        [[128, 0, 2, 130], [0, 0, 2, 2], [0, 0, 2, 2], [1, 1, 1, 129]], // 19
        [[128, 1, 1, 129], [0, 1, 1, 1], [0, 2, 2, 2], [0, 2, 2, 130]], // 20
        [[128, 0, 0, 129], [0, 0, 0, 1], [130, 2, 2, 1], [2, 2, 2, 1]], // 21
        [[128, 0, 0, 0], [0, 0, 129, 1], [0, 1, 2, 2], [0, 1, 2, 130]], // 22
        [[128, 0, 0, 0], [1, 1, 0, 0], [130, 2, 129, 0], [2, 2, 1, 0]], // 23
        [[128, 1, 2, 130], [0, 129, 2, 2], [0, 0, 1, 1], [0, 0, 0, 0]], // 24
        [[128, 0, 1, 2], [0, 0, 1, 2], [129, 1, 2, 2], [2, 2, 2, 130]], // 25
        [[128, 1, 1, 0], [1, 2, 130, 1], [129, 2, 2, 1], [0, 1, 1, 0]], // 26
        [[128, 0, 0, 0], [0, 1, 129, 0], [1, 2, 130, 1], [1, 2, 2, 1]], // 27
        [[128, 0, 2, 2], [1, 1, 0, 2], [129, 1, 0, 2], [0, 0, 2, 130]], // 28
        [[128, 1, 1, 0], [0, 129, 1, 0], [2, 0, 0, 2], [2, 2, 2, 130]], // 29
        [[128, 0, 1, 1], [0, 1, 2, 2], [0, 1, 130, 2], [0, 0, 1, 129]], // 30
        [[128, 0, 0, 0], [2, 0, 0, 0], [130, 2, 1, 1], [2, 2, 2, 129]], // 31
        [[128, 0, 0, 0], [0, 0, 0, 2], [129, 1, 2, 2], [1, 2, 2, 130]], // 32
        [[128, 2, 2, 130], [0, 0, 2, 2], [0, 0, 1, 2], [0, 0, 1, 129]], // 33
        [[128, 0, 1, 129], [0, 0, 1, 2], [0, 0, 2, 2], [0, 2, 2, 130]], // 34
        [[128, 1, 2, 0], [0, 129, 2, 0], [0, 1, 130, 0], [0, 1, 2, 0]], // 35
        [[128, 0, 0, 0], [1, 1, 129, 1], [2, 2, 130, 2], [0, 0, 0, 0]], // 36
        [[128, 1, 2, 0], [1, 2, 0, 1], [130, 0, 129, 2], [0, 1, 2, 0]], // 37
        [[128, 1, 2, 0], [2, 0, 1, 2], [129, 130, 0, 1], [0, 1, 2, 0]], // 38
        [[128, 0, 1, 1], [2, 2, 0, 0], [1, 1, 130, 2], [0, 0, 1, 129]], // 39
        [[128, 0, 1, 1], [1, 1, 130, 2], [2, 2, 0, 0], [0, 0, 1, 129]], // 40
        [[128, 1, 0, 129], [0, 1, 0, 1], [2, 2, 2, 2], [2, 2, 2, 130]], // 41
        [[128, 0, 0, 0], [0, 0, 0, 0], [130, 1, 2, 1], [2, 1, 2, 129]], // 42
        [[128, 0, 2, 2], [1, 129, 2, 2], [0, 0, 2, 2], [1, 1, 2, 130]], // 43
        [[128, 0, 2, 130], [0, 0, 1, 1], [0, 0, 2, 2], [0, 0, 1, 129]], // 44
        [[128, 2, 2, 0], [1, 2, 130, 1], [0, 2, 2, 0], [1, 2, 2, 129]], // 45
        [[128, 1, 0, 1], [2, 2, 130, 2], [2, 2, 2, 2], [0, 1, 0, 129]], // 46
        [[128, 0, 0, 0], [2, 1, 2, 1], [130, 1, 2, 1], [2, 1, 2, 129]], // 47
        [[128, 1, 0, 129], [0, 1, 0, 1], [0, 1, 0, 1], [2, 2, 2, 130]], // 48
        [[128, 2, 2, 130], [0, 1, 1, 1], [0, 2, 2, 2], [0, 1, 1, 129]], // 49
        [[128, 0, 0, 2], [1, 129, 1, 2], [0, 0, 0, 2], [1, 1, 1, 130]], // 50
        [[128, 0, 0, 0], [2, 129, 1, 2], [2, 1, 1, 2], [2, 1, 1, 130]], // 51
        [[128, 2, 2, 2], [0, 129, 1, 1], [0, 1, 1, 1], [0, 2, 2, 130]], // 52
        [[128, 0, 0, 2], [1, 1, 1, 2], [129, 1, 1, 2], [0, 0, 0, 130]], // 53
        [[128, 1, 1, 0], [0, 129, 1, 0], [0, 1, 1, 0], [2, 2, 2, 130]], // 54
        [[128, 0, 0, 0], [0, 0, 0, 0], [2, 1, 129, 2], [2, 1, 1, 130]], // 55
        [[128, 1, 1, 0], [0, 129, 1, 0], [2, 2, 2, 2], [2, 2, 2, 130]], // 56
        [[128, 0, 2, 2], [0, 0, 1, 1], [0, 0, 129, 1], [0, 0, 2, 130]], // 57
        [[128, 0, 2, 2], [1, 1, 2, 2], [129, 1, 2, 2], [0, 0, 2, 130]], // 58
        [[128, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [2, 129, 1, 130]], // 59
        [[128, 0, 0, 130], [0, 0, 0, 1], [0, 0, 0, 2], [0, 0, 0, 129]], // 60
        [[128, 2, 2, 2], [1, 2, 2, 2], [0, 2, 2, 2], [129, 2, 2, 130]], // 61
        [[128, 1, 0, 129], [2, 2, 2, 2], [2, 2, 2, 2], [2, 2, 2, 130]], // 62
        [[128, 1, 1, 129], [2, 0, 1, 1], [130, 2, 0, 1], [2, 2, 2, 0]], // 63
    ],
];

static WEIGHT2: [u32; 4] = [0, 21, 43, 64];
static WEIGHT3: [u32; 8] = [0, 9, 18, 27, 37, 46, 55, 64];
static WEIGHT4: [u32; 16] = [0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];

/// Decodes a BC7 block from `compressed_block` and writes the RGBA8 data into
/// `decompressed_block` with `destination_pitch` many bytes per output row.
///
/// Blocks without a mode bit in their first byte are reserved and rejected
/// before anything is written.
pub(crate) fn decode_block_bc7(
    compressed_block: &[u8; BLOCK_BYTE_SIZE],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) -> Result<(), BlockError> {
    let mode_index = compressed_block[0].trailing_zeros();
    if mode_index >= 8 {
        return Err(BlockError::ReservedBc7Mode);
    }
    let mode = &MODES[mode_index as usize];

    let mut bstream = BitStream::new(compressed_block);
    bstream.skip(mode_index + 1);

    let partition = bstream.read_bits(mode.partition_bits) as usize;
    let rotation = bstream.read_bits(mode.rotation_bits);
    let index_selection = mode.has_index_selection && bstream.read_bit() == 1;

    let endpoint_count = mode.subsets * 2;
    let mut endpoints = [[0u32; 4]; 6];

    for channel in 0..3 {
        for endpoint in endpoints.iter_mut().take(endpoint_count) {
            endpoint[channel] = bstream.read_bits(mode.color_bits);
        }
    }
    if mode.alpha_bits > 0 {
        for endpoint in endpoints.iter_mut().take(endpoint_count) {
            endpoint[3] = bstream.read_bits(mode.alpha_bits);
        }
    }

    match mode.p_bits {
        PBits::Shared => {
            for pair in endpoints.chunks_exact_mut(2).take(mode.subsets) {
                let p_bit = bstream.read_bit();
                for component in pair.iter_mut().flatten() {
                    *component = *component << 1 | p_bit;
                }
            }
        }
        PBits::Unique => {
            for endpoint in endpoints.iter_mut().take(endpoint_count) {
                let p_bit = bstream.read_bit();
                for component in endpoint.iter_mut() {
                    *component = *component << 1 | p_bit;
                }
            }
        }
        PBits::None => {}
    }

    let p_bit_count = u32::from(mode.p_bits != PBits::None);
    for endpoint in endpoints.iter_mut().take(endpoint_count) {
        for component in &mut endpoint[..3] {
            *component = expand(*component, mode.color_bits + p_bit_count);
        }
        endpoint[3] = if mode.alpha_bits == 0 {
            0xFF
        } else {
            expand(endpoint[3], mode.alpha_bits + p_bit_count)
        };
    }

    // All primary indices come first, then the secondary ones.
    let mut indices = [0u32; 16];
    for (pixel, index) in indices.iter_mut().enumerate() {
        let (_, anchor) = subset_of(mode, partition, pixel);
        *index = bstream.read_bits(mode.index_bits - u32::from(anchor));
    }

    let mut secondary_indices = indices;
    if mode.secondary_index_bits > 0 {
        for (pixel, index) in secondary_indices.iter_mut().enumerate() {
            *index = bstream.read_bits(mode.secondary_index_bits - u32::from(pixel == 0));
        }
    }

    let color_weights = weight_table(mode.index_bits);
    let alpha_weights = if mode.secondary_index_bits > 0 {
        weight_table(mode.secondary_index_bits)
    } else {
        color_weights
    };

    for pixel in 0..16 {
        let (subset, _) = subset_of(mode, partition, pixel);
        let low = &endpoints[subset * 2];
        let high = &endpoints[subset * 2 + 1];

        let mut color_weight = color_weights[indices[pixel] as usize];
        let mut alpha_weight = alpha_weights[secondary_indices[pixel] as usize];
        if index_selection {
            std::mem::swap(&mut color_weight, &mut alpha_weight);
        }

        let mut rgba = [
            interpolate(low[0], high[0], color_weight),
            interpolate(low[1], high[1], color_weight),
            interpolate(low[2], high[2], color_weight),
            interpolate(low[3], high[3], alpha_weight),
        ];

        // The rotation swaps alpha with one of the color channels.
        match rotation {
            1 => rgba.swap(0, 3),
            2 => rgba.swap(1, 3),
            3 => rgba.swap(2, 3),
            _ => {}
        }

        let offset = (pixel / 4) * destination_pitch + (pixel % 4) * 4;
        decompressed_block[offset..offset + 4].copy_from_slice(&rgba);
    }

    Ok(())
}

/// Returns the subset of `pixel` and whether it is the anchor of its subset.
#[inline]
fn subset_of(mode: &Mode, partition: usize, pixel: usize) -> (usize, bool) {
    if mode.subsets == 1 {
        return (0, pixel == 0);
    }
    let entry = PARTITION_SETS[mode.subsets - 2][partition][pixel / 4][pixel % 4];
    ((entry & 0x03) as usize, entry & 0x80 != 0)
}

#[inline]
fn weight_table(index_bits: u32) -> &'static [u32] {
    match index_bits {
        2 => &WEIGHT2,
        3 => &WEIGHT3,
        _ => &WEIGHT4,
    }
}

/// Moves the MSB of a `bits` wide value to bit 7 and replicates it into the
/// freed low bits.
#[inline]
fn expand(value: u32, bits: u32) -> u32 {
    let value = value << (8 - bits);
    value | value >> bits
}

#[inline]
fn interpolate(a: u32, b: u32, weight: u32) -> u8 {
    ((a * (64 - weight) + b * weight + 32) >> 6) as u8
}

/// Reads bits LSB first from the 128 bits of a block.
#[derive(Debug, Clone, Copy)]
struct BitStream {
    bits: u128,
}

impl BitStream {
    #[inline]
    fn new(data: &[u8; BLOCK_BYTE_SIZE]) -> Self {
        Self {
            bits: u128::from_le_bytes(*data),
        }
    }

    #[inline]
    fn skip(&mut self, num_bits: u32) {
        self.bits >>= num_bits;
    }

    #[inline]
    fn read_bit(&mut self) -> u32 {
        self.read_bits(1)
    }

    #[inline]
    fn read_bits(&mut self, num_bits: u32) -> u32 {
        let mask = (1u128 << num_bits) - 1;
        let bits = (self.bits & mask) as u32;
        self.bits >>= num_bits;
        bits
    }
}
