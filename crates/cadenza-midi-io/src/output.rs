//! Turning events into transmit-ready bytes or words.

use cadenza_midi::{Event, Protocol};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;

/// How a connection carries MIDI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    /// MIDI 1.0 byte stream.
    Bytes,
    /// Universal MIDI Packets, with channel voice in the given protocol.
    Ump(Protocol),
}

impl Default for Transport {
    fn default() -> Self {
        Transport::Ump(Protocol::default())
    }
}

impl Transport {
    pub fn is_bytes(self) -> bool {
        matches!(self, Transport::Bytes)
    }

    pub(crate) fn input_kind(self) -> &'static str {
        match self {
            Transport::Bytes => "MIDI 1.0 byte",
            Transport::Ump(_) => "UMP word",
        }
    }
}

/// Encoded form of one or more events, ready for the platform layer to
/// wrap in its own packet structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPacket {
    Bytes(Vec<u8>),
    Words(Vec<u32>),
}

impl OutboundPacket {
    pub fn is_empty(&self) -> bool {
        match self {
            OutboundPacket::Bytes(bytes) => bytes.is_empty(),
            OutboundPacket::Words(words) => words.is_empty(),
        }
    }

    fn extend(&mut self, other: OutboundPacket) {
        match (self, other) {
            (OutboundPacket::Bytes(a), OutboundPacket::Bytes(b)) => a.extend(b),
            (OutboundPacket::Words(a), OutboundPacket::Words(b)) => a.extend(b),
            // An encoder only ever produces one kind.
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputEncoder {
    transport: Transport,
}

impl OutputEncoder {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Fails with an unsupported error when the transport cannot carry the
    /// event, e.g. per-note controllers on a byte stream.
    pub fn encode(&self, event: &Event) -> Result<OutboundPacket> {
        let packet = match self.transport {
            Transport::Bytes => OutboundPacket::Bytes(event.try_midi1_raw_bytes()?),
            Transport::Ump(protocol) => OutboundPacket::Words(event.try_ump_raw_words(protocol)?),
        };
        trace!(%event, ?packet, "encoded");
        Ok(packet)
    }

    /// Encodes a batch into one packet. Stops at the first event the
    /// transport cannot carry.
    pub fn encode_all<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<OutboundPacket> {
        let mut out = match self.transport {
            Transport::Bytes => OutboundPacket::Bytes(Vec::new()),
            Transport::Ump(_) => OutboundPacket::Words(Vec::new()),
        };
        for event in events {
            out.extend(self.encode(event)?);
        }
        Ok(out)
    }
}
