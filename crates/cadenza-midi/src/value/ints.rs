//! Fixed-width unsigned integers used by MIDI fields.
//!
//! Construction with [`new`](U7::new) fails with [`RangeError`] when the value
//! does not fit. [`from_masked`](U7::from_masked) keeps only the low bits and
//! is meant for decoders that have already extracted a bit field.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RangeError;

macro_rules! small_uint {
    ($(#[$meta:meta])* $name:ident($inner:ty), $bits:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($inner);

        impl $name {
            pub const BITS: u32 = $bits;
            pub const MIN: Self = Self(0);
            pub const MAX: Self = Self(((1u64 << $bits) - 1) as $inner);
            pub const MIDPOINT: Self = Self((1u64 << ($bits - 1)) as $inner);

            #[inline]
            pub fn new(value: $inner) -> Result<Self, RangeError> {
                if value > Self::MAX.0 {
                    Err(RangeError::integer(value, $bits))
                } else {
                    Ok(Self(value))
                }
            }

            /// Keeps the low bits of `value`, discarding the rest.
            #[inline]
            pub const fn from_masked(value: $inner) -> Self {
                Self(value & Self::MAX.0)
            }

            #[inline]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = RangeError;

            fn try_from(value: $inner) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::LowerHex for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::LowerHex::fmt(&self.0, f)
            }
        }

        impl fmt::UpperHex for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::UpperHex::fmt(&self.0, f)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = <$inner>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

small_uint!(
    /// UMP group or MIDI channel (0-15).
    U4(u8),
    4
);
small_uint!(
    /// MIDI 1.0 data byte (0-127).
    U7(u8),
    7
);
small_uint!(
    /// Fractional part of a Pitch 7.9 note attribute.
    U9(u16),
    9
);
small_uint!(
    /// MIDI 1.0 14-bit value: pitch bend, song position, bank select.
    U14(u16),
    14
);
small_uint!(
    /// Fractional part of a Pitch 7.25 per-note controller value.
    U25(u32),
    25
);

impl U14 {
    /// Joins two data bytes, most significant first.
    #[inline]
    pub fn from_msb_lsb(msb: U7, lsb: U7) -> Self {
        Self(((msb.0 as u16) << 7) | lsb.0 as u16)
    }

    #[inline]
    pub fn msb(self) -> U7 {
        U7((self.0 >> 7) as u8)
    }

    #[inline]
    pub fn lsb(self) -> U7 {
        U7((self.0 & 0x7F) as u8)
    }
}
