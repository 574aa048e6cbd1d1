//! # Cadenza - MIDI 1.0 / MIDI 2.0 Event Codec
//!
//! Typed MIDI events with byte-exact MIDI 1.0 and Universal MIDI Packet
//! encoding, built from modular subsystems.
//!
//! ## Architecture
//!
//! Cadenza is an umbrella crate that coordinates:
//! - **cadenza-midi** - Value types, event model, MIDI 1.0 / UMP codec, stream parsers, filters
//! - **cadenza-midi-io** - Input connections, receivers, output encoding
//!
//! ## Quick Start
//!
//! ```
//! use cadenza::prelude::*;
//!
//! let mut parser = StreamParser::default();
//! let events = parser.feed(&[0x90, 0x3C, 0x64, 0x3D, 0x65]);
//! assert_eq!(events.len(), 2);
//!
//! let kept = filter_events(&events, &[EventFilter::Note(SetFilter::only([U7::new(60)?]))]);
//! assert_eq!(kept[0].description(), "Note On C4 vel=100 ch=0 grp=0");
//! # Ok::<(), cadenza::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Codec plus connection plumbing
//! - `io` - Input connections, receivers and output encoding

/// Re-export of cadenza-midi for direct access
pub use cadenza_midi as midi;

pub use cadenza_midi::{
    // Values
    BipolarUnitInterval, ControllerValue, MidiValue, NoteVelocity, PitchBendValue, UnitInterval,
    U14, U25, U4, U7, U9,

    // Events
    Controller, Event, EventCategory, ManufacturerId, UniversalType,

    // Codec
    MessageType, Protocol,

    // Parsing
    ParserConfig, StreamParser, UmpParser,

    // Filters
    filter_events, EventFilter, EventIteratorExt, SetFilter, TypeFilter,
};

#[cfg(feature = "io")]
pub use cadenza_midi_io as io;

#[cfg(feature = "io")]
pub use cadenza_midi_io::{
    EventReceiver, InputConnection, OutboundPacket, OutputEncoder, Timestamped, Transport,
};

pub mod error;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    // Values
    pub use crate::{ControllerValue, NoteVelocity, PitchBendValue, U14, U4, U7};

    // Events and codec
    pub use crate::{Controller, Event, Protocol};

    // Parsing and filtering
    pub use crate::{
        filter_events, EventFilter, EventIteratorExt, ParserConfig, SetFilter, StreamParser,
        TypeFilter, UmpParser,
    };

    // Connections
    #[cfg(feature = "io")]
    pub use crate::io::{InputConnection, OutputEncoder, Timestamped, Transport};
}
