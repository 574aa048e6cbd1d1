//! MIDI 1.0 byte and Universal MIDI Packet word encoding.
//!
//! Encoding is total for events the target protocol can carry. Decoding takes
//! exactly one event, which for RPN, NRPN and banked program changes spans
//! several MIDI 1.0 messages; use [`StreamParser`](crate::StreamParser) or
//! [`UmpParser`](crate::UmpParser) for continuous input.

mod compound;
mod midi1;
mod ump;

pub use ump::{packet_word_count, MessageType};

pub(crate) use compound::CompoundAssembler;
pub(crate) use midi1::{
    data_len, decode_channel_voice, decode_real_time, decode_system_common, undefined_status,
    SYSEX_END, SYSEX_START,
};
pub(crate) use ump::{decode_packet, Packet, SysExAssembler};

use serde::{Deserialize, Serialize};

/// UMP channel voice encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// MIDI 1.0 channel voice in UMP (message type 0x2).
    Midi1,
    /// MIDI 2.0 channel voice (message type 0x4).
    #[default]
    Midi2,
}
