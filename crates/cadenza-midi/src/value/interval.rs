//! Validated floating point intervals.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RangeError;

use super::scale::{bipolar_from_raw, raw_from_bipolar, raw_from_unit, MidiValue};

/// A value in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct UnitInterval(f64);

impl UnitInterval {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    pub fn new(value: f64) -> Result<Self, RangeError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RangeError::float(value, 0.0, 1.0))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn to_value<T: MidiValue>(self) -> T {
        T::from_raw_masked(raw_from_unit(self.0, T::BITS))
    }

    #[inline]
    pub fn from_value<T: MidiValue>(value: T) -> Self {
        Self(value.to_unit_interval())
    }
}

/// A value in `-1.0..=1.0` where `0.0` is the exact midpoint.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct BipolarUnitInterval(f64);

impl BipolarUnitInterval {
    pub const MIN: Self = Self(-1.0);
    pub const NEUTRAL: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    pub fn new(value: f64) -> Result<Self, RangeError> {
        if (-1.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RangeError::float(value, -1.0, 1.0))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn to_value<T: MidiValue>(self) -> T {
        T::from_raw_masked(raw_from_bipolar(self.0, T::BITS))
    }

    #[inline]
    pub fn from_value<T: MidiValue>(value: T) -> Self {
        Self(bipolar_from_raw(value.raw(), T::BITS))
    }
}

macro_rules! float_serde {
    ($name:ident) => {
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
                let raw = f64::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.3}", self.0)
            }
        }
    };
}

float_serde!(UnitInterval);
float_serde!(BipolarUnitInterval);
