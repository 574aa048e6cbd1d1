//! MIDI event codec for Cadenza.
//!
//! Provides typed MIDI 1.0 / MIDI 2.0 events, byte and Universal MIDI Packet
//! encoding, incremental stream parsing, and declarative event filters.
//!
//! # Features
//!
//! - **Value types**: range-checked 4/7/9/14/25-bit integers with lossless
//!   MIDI 1.0 to MIDI 2.0 scaling
//! - **Event model**: channel voice, system common, system real-time, SysEx7,
//!   SysEx8 and UMP utility messages
//! - **Codec**: MIDI 1.0 bytes and UMP words (message types 0x0-0x5)
//! - **Stream parsing**: running status, interleaved real-time, SysEx split
//!   across reads
//! - **Filters**: keep or drop events by category, type, channel, note, group
//!
//! # Example
//!
//! ```
//! use cadenza_midi::{Event, NoteVelocity, Protocol, StreamParser, U4, U7};
//!
//! let note_on = Event::note_on(U7::new(60)?, NoteVelocity::Midi1(U7::new(100)?), U4::MIN, U4::MIN);
//! assert_eq!(note_on.midi1_raw_bytes(), [0x90, 0x3C, 0x64]);
//! assert_eq!(note_on.ump_raw_words(Protocol::Midi1), [0x2090_3C64]);
//!
//! let mut parser = StreamParser::default();
//! assert_eq!(parser.feed(&[0x90, 0x3C, 0x64]), vec![note_on]);
//! # Ok::<(), cadenza_midi::Error>(())
//! ```

pub mod error;
pub use error::{Error, ParseError, RangeError, Result};

pub mod value;
pub use value::{
    BipolarUnitInterval, ControllerValue, MidiValue, NoteVelocity, PitchBendValue,
    UnitInterval, U14, U25, U4, U7, U9,
};

pub mod event;
pub use event::{
    Availability, Bank, Cc, ChanVoiceType, Controller, Event, EventCategory, EventKind,
    ManufacturerId, Note, NoteAttribute, NoteCc, NoteController, NoteManagement, NotePitchBend,
    NotePressure, ParameterNumber, PitchBend, Pitch7_25, Pressure, ProgramChange, SysEx7, SysEx8,
    SysExId, SysExType, SystemCommonType, SystemRealTimeType, UndefinedAttribute, UniversalSysEx7,
    UniversalSysEx8, UniversalType, UtilityType,
};

pub mod codec;
pub use codec::{packet_word_count, MessageType, Protocol};

pub mod parser;
pub use parser::{ParserConfig, ParserConfigBuilder, StreamParser, UmpParser};

pub mod filter;
pub use filter::{
    filter_events, matches_all, EventFilter, EventIteratorExt, FilterEvents, SetFilter,
    TypeFilter,
};

pub mod note;
