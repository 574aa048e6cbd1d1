//! Error types for the MIDI codec.

use thiserror::Error;

/// A value did not fit the bit width or interval of the type it was built into.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("value {value} does not fit in {bits} bits")]
    Integer { value: u64, bits: u32 },

    #[error("value {value} is outside {min}..={max}")]
    Float { value: f64, min: f64, max: f64 },
}

impl RangeError {
    pub(crate) fn integer(value: impl Into<u64>, bits: u32) -> Self {
        RangeError::Integer {
            value: value.into(),
            bits,
        }
    }

    pub(crate) fn float(value: f64, min: f64, max: f64) -> Self {
        RangeError::Float { value, min, max }
    }
}

/// Decoding or encoding failure for a MIDI 1.0 byte sequence or UMP word group.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unsupported message: {0}")]
    Unsupported(String),
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ParseError::Malformed(reason.into())
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        ParseError::Unsupported(reason.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
