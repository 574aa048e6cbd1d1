//! Cross-resolution scaling between MIDI 1.0 and MIDI 2.0 values.
//!
//! An `N`-bit value `v` scales to `M` bits as
//! `round(v * (2^M - 1) / (2^N - 1))`, rounding ties up, with one override:
//! the midpoint `2^(N-1)` maps to exactly `2^(M-1)`. Scaling up and then back
//! down is always the identity. Scaling down is a quantization using the same
//! formula.

use crate::error::RangeError;

use super::ints::{U14, U25, U7, U9};

/// Scales `value` from a `from_bits` wide range to a `to_bits` wide range.
/// Both widths are in `1..=32`; callers pass [`MidiValue::BITS`].
#[inline]
pub(crate) const fn scale(value: u32, from_bits: u32, to_bits: u32) -> u32 {
    debug_assert!(from_bits >= 1 && from_bits <= 32 && to_bits >= 1 && to_bits <= 32);
    if from_bits == to_bits {
        return value;
    }
    if value == 1 << (from_bits - 1) {
        return 1 << (to_bits - 1);
    }
    let from_max = (1u128 << from_bits) - 1;
    let to_max = (1u128 << to_bits) - 1;
    ((2 * value as u128 * to_max + from_max) / (2 * from_max)) as u32
}

#[inline]
pub(crate) fn max_for(bits: u32) -> u32 {
    ((1u64 << bits) - 1) as u32
}

#[inline]
pub(crate) fn midpoint_for(bits: u32) -> u32 {
    1 << (bits - 1)
}

/// `x` must already lie in `0.0..=1.0`.
#[inline]
pub(crate) fn raw_from_unit(x: f64, bits: u32) -> u32 {
    (x * max_for(bits) as f64).round() as u32
}

/// `x` must already lie in `-1.0..=1.0`.
#[inline]
pub(crate) fn raw_from_bipolar(x: f64, bits: u32) -> u32 {
    let mid = midpoint_for(bits);
    if x < 0.0 {
        ((x + 1.0) * mid as f64).round() as u32
    } else {
        mid + (x * (max_for(bits) - mid) as f64).round() as u32
    }
}

#[inline]
pub(crate) fn bipolar_from_raw(raw: u32, bits: u32) -> f64 {
    let mid = midpoint_for(bits) as f64;
    let max = max_for(bits) as f64;
    let v = raw as f64;
    if v < mid {
        (v - mid) / mid
    } else {
        (v - mid) / (max - mid)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::U7 {}
    impl Sealed for super::U9 {}
    impl Sealed for super::U14 {}
    impl Sealed for super::U25 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// An unsigned MIDI value of fixed resolution, between 1 and 32 bits wide.
///
/// Sealed: implemented for the MIDI field types, `u16` and `u32`.
pub trait MidiValue: sealed::Sealed + Copy {
    const BITS: u32;

    fn raw(self) -> u32;

    /// Builds a value from the low `BITS` bits of `raw`.
    fn from_raw_masked(raw: u32) -> Self;

    fn rescale<T: MidiValue>(self) -> T {
        T::from_raw_masked(scale(self.raw(), Self::BITS, T::BITS))
    }

    fn to_unit_interval(self) -> f64 {
        self.raw() as f64 / max_for(Self::BITS) as f64
    }

    fn from_unit_interval(x: f64) -> Result<Self, RangeError> {
        if !(0.0..=1.0).contains(&x) {
            return Err(RangeError::float(x, 0.0, 1.0));
        }
        Ok(Self::from_raw_masked(raw_from_unit(x, Self::BITS)))
    }

    /// Minimum maps to -1.0, midpoint to 0.0, maximum to 1.0.
    fn to_bipolar(self) -> f64 {
        bipolar_from_raw(self.raw(), Self::BITS)
    }

    fn from_bipolar(x: f64) -> Result<Self, RangeError> {
        if !(-1.0..=1.0).contains(&x) {
            return Err(RangeError::float(x, -1.0, 1.0));
        }
        Ok(Self::from_raw_masked(raw_from_bipolar(x, Self::BITS)))
    }
}

macro_rules! midi_value_newtype {
    ($name:ident, $inner:ty) => {
        impl MidiValue for $name {
            const BITS: u32 = $name::BITS;

            #[inline]
            fn raw(self) -> u32 {
                self.get() as u32
            }

            #[inline]
            fn from_raw_masked(raw: u32) -> Self {
                $name::from_masked(raw as $inner)
            }
        }
    };
}

midi_value_newtype!(U7, u8);
midi_value_newtype!(U9, u16);
midi_value_newtype!(U14, u16);
midi_value_newtype!(U25, u32);

impl MidiValue for u16 {
    const BITS: u32 = 16;

    #[inline]
    fn raw(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_raw_masked(raw: u32) -> Self {
        raw as u16
    }
}

impl MidiValue for u32 {
    const BITS: u32 = 32;

    #[inline]
    fn raw(self) -> u32 {
        self
    }

    #[inline]
    fn from_raw_masked(raw: u32) -> Self {
        raw
    }
}

impl U7 {
    #[inline]
    pub fn to_midi2(self) -> u32 {
        self.rescale()
    }

    #[inline]
    pub fn from_midi2(value: u32) -> Self {
        value.rescale()
    }
}

impl U14 {
    #[inline]
    pub fn to_midi2(self) -> u32 {
        self.rescale()
    }

    #[inline]
    pub fn from_midi2(value: u32) -> Self {
        value.rescale()
    }
}
