//! Fixed-width ring code.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 12-bit ring code, read clockwise from the synchronization start.
///
/// Bit 0 is the first character of the string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingCode(u16);

/// Error parsing a [`RingCode`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRingCodeError {
    /// The string does not have exactly 12 characters.
    #[error("ring code must have {expected} characters, got {got}")]
    Length { expected: usize, got: usize },
    /// A character other than `0` or `1` was found.
    #[error("invalid ring code character {found:?} at {index}")]
    Character { index: usize, found: char },
}

impl RingCode {
    /// Number of bits (and ring segments).
    pub const BITS: usize = 12;
    /// All bits clear.
    pub const ZERO: Self = Self(0);
    /// All bits set.
    pub const ALL_ONES: Self = Self((1 << Self::BITS) - 1);
    /// Synchronization pattern `011111111111` carried by the outer ring.
    pub const SYNC: Self = Self(Self::ALL_ONES.0 & !1);

    /// Bit `index`, counted from the start of the ring.
    pub fn bit(self, index: usize) -> bool {
        index < Self::BITS && self.0 & (1 << index) != 0
    }

    /// Copy with bit `index` set to `value`; indices past the width are ignored.
    pub fn with_bit(self, index: usize, value: bool) -> Self {
        if index >= Self::BITS {
            return self;
        }
        let mask = 1u16 << index;
        if value {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    /// True if the first bit is `1`.
    pub fn starts_with_one(self) -> bool {
        self.bit(0)
    }

    /// True if every bit is `1`.
    pub fn is_all_ones(self) -> bool {
        self == Self::ALL_ONES
    }
}

impl fmt::Display for RingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..Self::BITS {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for RingCode {
    type Err = ParseRingCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count != Self::BITS {
            return Err(ParseRingCodeError::Length {
                expected: Self::BITS,
                got: count,
            });
        }
        s.chars()
            .enumerate()
            .try_fold(Self::ZERO, |code, (index, ch)| match ch {
                '0' => Ok(code),
                '1' => Ok(code.with_bit(index, true)),
                found => Err(ParseRingCodeError::Character { index, found }),
            })
    }
}
