//! Incremental parsers for MIDI 1.0 byte streams and UMP word streams.
//!
//! Both parsers keep state across `feed` calls, so input may be split at any
//! byte or word boundary. Malformed input is reported and skipped; parsing
//! always resumes at the next status byte or packet.

mod config;
mod stream;
mod ump;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use stream::StreamParser;
pub use ump::UmpParser;

use tracing::{trace, warn};

use crate::codec::CompoundAssembler;
use crate::error::ParseError;
use crate::event::Event;

/// Hands a finished result on, through the CC run assembler when enabled.
fn deliver<F>(
    result: Result<Event, ParseError>,
    config: &ParserConfig,
    compound: &mut CompoundAssembler,
    on_result: &mut F,
) where
    F: FnMut(Result<Event, ParseError>),
{
    match finish(result, config) {
        Ok(event) if config.combine_cc_sequences => {
            compound.push(event, &mut |event| on_result(Ok(event)))
        }
        other => on_result(other),
    }
}

/// Applies config-driven rewrites and logs the outcome.
fn finish(
    result: Result<Event, ParseError>,
    config: &ParserConfig,
) -> Result<Event, ParseError> {
    match result {
        Ok(Event::NoteOn(note))
            if config.note_on_zero_velocity_as_note_off && note.velocity.midi2_value() == 0 =>
        {
            trace!(note = %note.note, "note on with zero velocity as note off");
            Ok(Event::NoteOff(note))
        }
        Ok(event) => {
            trace!(%event, "parsed");
            Ok(event)
        }
        Err(err) => {
            warn!(%err, "skipping malformed MIDI input");
            Err(err)
        }
    }
}
