//! Events tagged with the timestamp of the input buffer they arrived in.
//!
//! Timestamps are opaque monotonic values supplied by the caller. They are
//! passed through untouched; no timing arithmetic happens here.

use std::fmt;

use cadenza_midi::Event;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamped<T = Event> {
    pub timestamp: u64,
    pub event: T,
}

impl<T> Timestamped<T> {
    #[inline]
    pub fn new(timestamp: u64, event: T) -> Self {
        Self { timestamp, event }
    }

    #[inline]
    pub fn into_event(self) -> T {
        self.event
    }
}

impl<T: fmt::Display> fmt::Display for Timestamped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {}", self.timestamp, self.event)
    }
}
