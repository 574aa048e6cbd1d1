//! Centralized error type for the cadenza umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Midi(#[from] cadenza_midi::Error),

    #[cfg(feature = "io")]
    #[error("MIDI I/O: {0}")]
    Io(#[from] cadenza_midi_io::Error),
}

impl From<cadenza_midi::ParseError> for Error {
    fn from(e: cadenza_midi::ParseError) -> Self {
        Error::Midi(e.into())
    }
}

impl From<cadenza_midi::RangeError> for Error {
    fn from(e: cadenza_midi::RangeError) -> Self {
        Error::Midi(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
