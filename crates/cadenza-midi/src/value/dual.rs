//! Channel voice values that can be expressed at either MIDI 1.0 or MIDI 2.0
//! resolution.
//!
//! Two values are equal when their MIDI 2.0 forms are equal. Upscaling is
//! injective, so `Midi1(v)` equals exactly `Midi2(v.rescale())`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::interval::{BipolarUnitInterval, UnitInterval};
use super::ints::{U14, U7};
use super::scale::MidiValue;

macro_rules! dual_resolution {
    (
        $(#[$meta:meta])*
        $name:ident {
            $float:ident($float_ty:ident) => $to_float:ident,
            midi1: $m1:ty,
            midi2: $m2:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
        pub enum $name {
            $float($float_ty),
            Midi1($m1),
            Midi2($m2),
        }

        impl $name {
            #[inline]
            pub fn midi1_value(self) -> $m1 {
                match self {
                    Self::$float(x) => x.to_value(),
                    Self::Midi1(v) => v,
                    Self::Midi2(v) => v.rescale(),
                }
            }

            #[inline]
            pub fn midi2_value(self) -> $m2 {
                match self {
                    Self::$float(x) => x.to_value(),
                    Self::Midi1(v) => v.rescale(),
                    Self::Midi2(v) => v,
                }
            }

            #[inline]
            pub fn $to_float(self) -> $float_ty {
                match self {
                    Self::$float(x) => x,
                    Self::Midi1(v) => $float_ty::from_value(v),
                    Self::Midi2(v) => $float_ty::from_value(v),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.midi2_value() == other.midi2_value()
            }
        }

        impl Eq for $name {}

        impl From<$m1> for $name {
            fn from(value: $m1) -> Self {
                Self::Midi1(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    Self::$float(x) => write!(f, "{x}"),
                    Self::Midi1(v) => write!(f, "{v}"),
                    Self::Midi2(v) => write!(f, "{v:#X}"),
                }
            }
        }
    };
}

dual_resolution!(
    /// Note On / Note Off velocity: 7-bit or 16-bit.
    NoteVelocity {
        UnitInterval(UnitInterval) => unit_interval,
        midi1: U7,
        midi2: u16,
    }
);

dual_resolution!(
    /// Controller value or pressure amount: 7-bit or 32-bit.
    ControllerValue {
        UnitInterval(UnitInterval) => unit_interval,
        midi1: U7,
        midi2: u32,
    }
);

dual_resolution!(
    /// Pitch bend: 14-bit or 32-bit, centered on the midpoint.
    PitchBendValue {
        Bipolar(BipolarUnitInterval) => bipolar,
        midi1: U14,
        midi2: u32,
    }
);

impl PitchBendValue {
    pub const NEUTRAL: Self = Self::Midi2(0x8000_0000);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_across_resolutions() {
        let v = U7::new(100).unwrap();
        assert_eq!(NoteVelocity::Midi1(v), NoteVelocity::Midi2(v.rescale()));
        assert_ne!(
            NoteVelocity::Midi1(v),
            NoteVelocity::Midi2(v.rescale::<u16>() + 1)
        );
        assert_eq!(
            PitchBendValue::Midi1(U14::MIDPOINT),
            PitchBendValue::Bipolar(BipolarUnitInterval::NEUTRAL)
        );
        assert_eq!(PitchBendValue::Midi1(U14::MIDPOINT), PitchBendValue::NEUTRAL);
    }

    #[test]
    fn test_downscaled_values() {
        let value = ControllerValue::Midi2(u32::MAX);
        assert_eq!(value.midi1_value(), U7::MAX);
        assert_eq!(value.unit_interval().get(), 1.0);

        let bend = PitchBendValue::Midi2(0);
        assert_eq!(bend.midi1_value().get(), 0);
        assert_eq!(bend.bipolar().get(), -1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(NoteVelocity::Midi1(U7::new(64).unwrap()).to_string(), "64");
        assert_eq!(NoteVelocity::Midi2(0x8000).to_string(), "0x8000");
        assert_eq!(
            ControllerValue::UnitInterval(UnitInterval::MAX).to_string(),
            "1.000"
        );
    }
}
