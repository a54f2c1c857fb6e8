//! Color endpoint modes.
use crate::BlockError;

/// Number of color values the endpoint mode `mode` consumes.
#[inline]
pub(super) const fn value_count(mode: u8) -> u32 {
    ((mode as u32 >> 2) + 1) * 2
}

/// Rejects the endpoint modes that only exist in the HDR profile.
pub(super) fn check_ldr(mode: u8) -> Result<(), BlockError> {
    match mode {
        2 | 3 | 7 | 11 | 14 | 15 => Err(BlockError::HdrEndpointMode(mode)),
        _ => Ok(()),
    }
}
