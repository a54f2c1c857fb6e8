//! Value ranges of the bounded integer sequence encoding (ISE).
//!
//! A range with `levels` values is stored either as plain bits, or as a base-3
//! (trit) or base-5 (quint) digit on top of a number of plain low bits. Five
//! trits are packed into 8 bits and three quints into 7 bits.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Encoding {
    Bits,
    Trit,
    Quint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Quantization {
    pub levels: u16,
    pub encoding: Encoding,
    /// Plain bits per value, on top of the trit or quint digit.
    pub bits: u32,
}

const fn quantization(levels: u16, encoding: Encoding, bits: u32) -> Quantization {
    Quantization {
        levels,
        encoding,
        bits,
    }
}

/// All ranges in increasing order. Weights use the first twelve entries.
pub(super) static QUANTIZATIONS: [Quantization; 21] = [
    quantization(2, Encoding::Bits, 1),
    quantization(3, Encoding::Trit, 0),
    quantization(4, Encoding::Bits, 2),
    quantization(5, Encoding::Quint, 0),
    quantization(6, Encoding::Trit, 1),
    quantization(8, Encoding::Bits, 3),
    quantization(10, Encoding::Quint, 1),
    quantization(12, Encoding::Trit, 2),
    quantization(16, Encoding::Bits, 4),
    quantization(20, Encoding::Quint, 2),
    quantization(24, Encoding::Trit, 3),
    quantization(32, Encoding::Bits, 5),
    quantization(40, Encoding::Quint, 3),
    quantization(48, Encoding::Trit, 4),
    quantization(64, Encoding::Bits, 6),
    quantization(80, Encoding::Quint, 4),
    quantization(96, Encoding::Trit, 5),
    quantization(128, Encoding::Bits, 7),
    quantization(160, Encoding::Quint, 5),
    quantization(192, Encoding::Trit, 6),
    quantization(256, Encoding::Bits, 8),
];

/// Index of the smallest range color endpoints may use.
pub(super) const MIN_COLOR_QUANTIZATION: usize = 4;

impl Quantization {
    /// Number of bits `count` values of this range occupy in a sequence.
    pub(super) const fn sequence_bits(self, count: u32) -> u32 {
        let plain = count * self.bits;
        match self.encoding {
            Encoding::Bits => plain,
            Encoding::Trit => plain + (8 * count + 4) / 5,
            Encoding::Quint => plain + (7 * count + 2) / 3,
        }
    }
}
