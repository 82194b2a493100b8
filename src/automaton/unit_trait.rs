use std::fmt::Debug;

use smallvec::SmallVec;

/// Trait for types that can serve as input units of a scanned text.
///
/// Every unit is fed to the automaton as one to four bytes, low byte
/// first. Bytes above the lowest are only fed when the value actually
/// needs them, so `0x41u16` and `0x41u8` produce the same transition.
///
/// - `u8`: exactly one byte
/// - `u16`: the low byte, then the high byte if the value exceeds `0xFF`
/// - `u32` and `char`: the low byte, then each higher byte while any bit
///   at or above it is set
///
/// For `u32` and `char` this minimal little-endian form replaces a rule
/// with fixed thresholds per byte (byte 1 only from `0x10000` up), under
/// which distinct values such as `0x1234` and `0x34` would collide.
pub trait InputUnit: Copy + Debug {
    /// Bytes this unit is fed to the automaton as.
    fn to_bytes(self) -> SmallVec<[u8; 4]>;
}

impl InputUnit for u8 {
    #[inline]
    fn to_bytes(self) -> SmallVec<[u8; 4]> {
        let mut out = SmallVec::new();
        out.push(self);
        out
    }
}

impl InputUnit for u16 {
    #[inline]
    fn to_bytes(self) -> SmallVec<[u8; 4]> {
        let mut out = SmallVec::new();
        out.push((self & 0xff) as u8);
        if self > 0x00ff {
            out.push((self >> 8) as u8);
        }
        out
    }
}

impl InputUnit for u32 {
    #[inline]
    fn to_bytes(self) -> SmallVec<[u8; 4]> {
        let mut out = SmallVec::new();
        out.push((self & 0xff) as u8);
        for shift in [8, 16, 24] {
            if self >> shift == 0 {
                break;
            }
            out.push(((self >> shift) & 0xff) as u8);
        }
        out
    }
}

impl InputUnit for char {
    #[inline]
    fn to_bytes(self) -> SmallVec<[u8; 4]> {
        u32::from(self).to_bytes()
    }
}
