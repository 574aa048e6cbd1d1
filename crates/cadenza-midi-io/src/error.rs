//! Error types for MIDI connections.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Midi(#[from] cadenza_midi::Error),

    #[error("connection '{0}' is closed")]
    ConnectionClosed(String),

    #[error("event receiver disconnected")]
    ReceiverDisconnected,

    #[error("connection '{name}' expects {expected} input")]
    TransportMismatch { name: String, expected: &'static str },
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
