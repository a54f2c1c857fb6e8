use std::fmt;

use crate::DecodeError;

/// The 2D block footprints defined by ASTC.
///
/// The footprint is the size in pixels a single 16 byte ASTC block decodes to.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Footprint {
    /// 4x4 pixels (8.00 bits per pixel)
    Astc4x4,
    /// 5x4 pixels (6.40 bits per pixel)
    Astc5x4,
    /// 5x5 pixels (5.12 bits per pixel)
    Astc5x5,
    /// 6x5 pixels (4.27 bits per pixel)
    Astc6x5,
    /// 6x6 pixels (3.56 bits per pixel)
    Astc6x6,
    /// 8x5 pixels (3.20 bits per pixel)
    Astc8x5,
    /// 8x6 pixels (2.67 bits per pixel)
    Astc8x6,
    /// 10x5 pixels (2.56 bits per pixel)
    Astc10x5,
    /// 10x6 pixels (2.13 bits per pixel)
    Astc10x6,
    /// 8x8 pixels (2.00 bits per pixel)
    Astc8x8,
    /// 10x8 pixels (1.60 bits per pixel)
    Astc10x8,
    /// 10x10 pixels (1.28 bits per pixel)
    Astc10x10,
    /// 12x10 pixels (1.07 bits per pixel)
    Astc12x10,
    /// 12x12 pixels (0.89 bits per pixel)
    Astc12x12,
}

impl Footprint {
    /// All footprints, ordered by the number of pixels per block.
    pub const ALL: [Footprint; 14] = [
        Footprint::Astc4x4,
        Footprint::Astc5x4,
        Footprint::Astc5x5,
        Footprint::Astc6x5,
        Footprint::Astc6x6,
        Footprint::Astc8x5,
        Footprint::Astc8x6,
        Footprint::Astc10x5,
        Footprint::Astc10x6,
        Footprint::Astc8x8,
        Footprint::Astc10x8,
        Footprint::Astc10x10,
        Footprint::Astc12x10,
        Footprint::Astc12x12,
    ];

    /// Returns the footprint with exactly the given block dimensions, or `None`
    /// if ASTC doesn't define such a footprint.
    pub const fn from_dimensions(width: u8, height: u8) -> Option<Footprint> {
        let footprint = match (width, height) {
            (4, 4) => Footprint::Astc4x4,
            (5, 4) => Footprint::Astc5x4,
            (5, 5) => Footprint::Astc5x5,
            (6, 5) => Footprint::Astc6x5,
            (6, 6) => Footprint::Astc6x6,
            (8, 5) => Footprint::Astc8x5,
            (8, 6) => Footprint::Astc8x6,
            (10, 5) => Footprint::Astc10x5,
            (10, 6) => Footprint::Astc10x6,
            (8, 8) => Footprint::Astc8x8,
            (10, 8) => Footprint::Astc10x8,
            (10, 10) => Footprint::Astc10x10,
            (12, 10) => Footprint::Astc12x10,
            (12, 12) => Footprint::Astc12x12,
            _ => return None,
        };
        Some(footprint)
    }

    /// Block width in pixels.
    pub const fn width(self) -> u8 {
        self.dimensions().0
    }

    /// Block height in pixels.
    pub const fn height(self) -> u8 {
        self.dimensions().1
    }

    pub const fn dimensions(self) -> (u8, u8) {
        match self {
            Footprint::Astc4x4 => (4, 4),
            Footprint::Astc5x4 => (5, 4),
            Footprint::Astc5x5 => (5, 5),
            Footprint::Astc6x5 => (6, 5),
            Footprint::Astc6x6 => (6, 6),
            Footprint::Astc8x5 => (8, 5),
            Footprint::Astc8x6 => (8, 6),
            Footprint::Astc10x5 => (10, 5),
            Footprint::Astc10x6 => (10, 6),
            Footprint::Astc8x8 => (8, 8),
            Footprint::Astc10x8 => (10, 8),
            Footprint::Astc10x10 => (10, 10),
            Footprint::Astc12x10 => (12, 10),
            Footprint::Astc12x12 => (12, 12),
        }
    }

    /// Number of pixels in one block.
    pub const fn pixel_count(self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Returns the byte size of one block decoded to tightly packed RGBA8.
    pub const fn decoded_byte_size(self) -> usize {
        self.pixel_count() * 4
    }
}

impl TryFrom<(u8, u8)> for Footprint {
    type Error = DecodeError;

    fn try_from((width, height): (u8, u8)) -> Result<Self, Self::Error> {
        Footprint::from_dimensions(width, height)
            .ok_or(DecodeError::UnsupportedFootprint { width, height })
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}
