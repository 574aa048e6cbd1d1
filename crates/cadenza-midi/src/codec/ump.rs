//! Universal MIDI Packet encoding.
//!
//! Every packet starts with the message type in the top nibble of its first
//! word and the group in the next nibble. SysEx7 (message type 0x3) carries up
//! to 6 bytes per two-word packet; SysEx8 (0x5) carries a stream ID and up to
//! 13 bytes per four-word packet.

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::trace;

use crate::error::ParseError;
use crate::event::{
    sysex7_from_payload, sysex8_from_payload, Bank, Controller, Event, Note, NoteAttribute,
    NoteController,
};
use crate::value::{ControllerValue, NoteVelocity, PitchBendValue, U4, U7};

use super::midi1::{
    decode_channel_voice, decode_real_time, decode_system_common, short_messages,
};
use super::compound::CompoundAssembler;
use super::Protocol;

const SYSEX7_BYTES_PER_PACKET: usize = 6;
const SYSEX8_BYTES_PER_PACKET: usize = 13;

const STATUS_COMPLETE: u8 = 0x0;
const STATUS_START: u8 = 0x1;
const STATUS_CONTINUE: u8 = 0x2;
const STATUS_END: u8 = 0x3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    Utility,
    System,
    Midi1ChannelVoice,
    SysEx7,
    Midi2ChannelVoice,
    SysEx8,
    /// Message types this codec does not decode (0x6-0xF).
    Reserved(u8),
}

impl MessageType {
    pub fn from_word(word: u32) -> Self {
        match (word >> 28) as u8 {
            0x0 => MessageType::Utility,
            0x1 => MessageType::System,
            0x2 => MessageType::Midi1ChannelVoice,
            0x3 => MessageType::SysEx7,
            0x4 => MessageType::Midi2ChannelVoice,
            0x5 => MessageType::SysEx8,
            mt => MessageType::Reserved(mt),
        }
    }

    pub fn nibble(self) -> u8 {
        match self {
            MessageType::Utility => 0x0,
            MessageType::System => 0x1,
            MessageType::Midi1ChannelVoice => 0x2,
            MessageType::SysEx7 => 0x3,
            MessageType::Midi2ChannelVoice => 0x4,
            MessageType::SysEx8 => 0x5,
            MessageType::Reserved(mt) => mt & 0x0F,
        }
    }

    /// Packet size in 32-bit words.
    pub fn word_count(self) -> usize {
        match self.nibble() {
            0x0 | 0x1 | 0x2 | 0x6 | 0x7 => 1,
            0x3 | 0x4 | 0x8 | 0x9 | 0xA => 2,
            0xB | 0xC => 3,
            _ => 4,
        }
    }
}

/// Size in words of the packet that starts with `first_word`.
#[inline]
pub fn packet_word_count(first_word: u32) -> usize {
    MessageType::from_word(first_word).word_count()
}

#[inline]
fn header(mt: u8, group: U4) -> u32 {
    ((mt as u32) << 28) | ((group.get() as u32) << 24)
}

fn midi2_word(op: u8, channel: U4, group: U4, index1: u8, index2: u8) -> u32 {
    header(0x4, group)
        | ((op as u32) << 20)
        | ((channel.get() as u32) << 16)
        | ((index1 as u32) << 8)
        | index2 as u32
}

fn encode_midi2_channel_voice(event: &Event) -> Option<[u32; 2]> {
    let words = match event {
        Event::NoteOn(e) | Event::NoteOff(e) => {
            let op = if matches!(event, Event::NoteOn(_)) { 0x9 } else { 0x8 };
            let (kind, data) = e.attribute.to_raw();
            [
                midi2_word(op, e.channel, e.group, e.note.get(), kind),
                ((e.velocity.midi2_value() as u32) << 16) | data as u32,
            ]
        }
        Event::NotePressure(e) => [
            midi2_word(0xA, e.channel, e.group, e.note.get(), 0),
            e.amount.midi2_value(),
        ],
        Event::NoteCc(e) => {
            let op = match e.controller {
                NoteController::Registered(_) => 0x0,
                NoteController::Assignable(_) => 0x1,
            };
            [
                midi2_word(op, e.channel, e.group, e.note.get(), e.controller.index()),
                e.value,
            ]
        }
        Event::NotePitchBend(e) => [
            midi2_word(0x6, e.channel, e.group, e.note.get(), 0),
            e.value.midi2_value(),
        ],
        Event::NoteManagement(e) => {
            let flags = ((e.detach as u8) << 1) | e.reset as u8;
            [midi2_word(0xF, e.channel, e.group, e.note.get(), flags), 0]
        }
        Event::Cc(e) => [
            midi2_word(0xB, e.channel, e.group, e.controller.number().get(), 0),
            e.value.midi2_value(),
        ],
        Event::ProgramChange(e) => {
            let (valid, msb, lsb) = match e.bank {
                Some(bank) => (1, bank.msb.get(), bank.lsb.get()),
                None => (0, 0, 0),
            };
            [
                midi2_word(0xC, e.channel, e.group, 0, valid),
                ((e.program.get() as u32) << 24) | ((msb as u32) << 8) | lsb as u32,
            ]
        }
        Event::Pressure(e) => [
            midi2_word(0xD, e.channel, e.group, 0, 0),
            e.amount.midi2_value(),
        ],
        Event::PitchBend(e) => [
            midi2_word(0xE, e.channel, e.group, 0, 0),
            e.value.midi2_value(),
        ],
        Event::Rpn(e) => [
            midi2_word(0x2, e.channel, e.group, e.bank.get(), e.index.get()),
            e.value,
        ],
        Event::Nrpn(e) => [
            midi2_word(0x3, e.channel, e.group, e.bank.get(), e.index.get()),
            e.value,
        ],
        _ => return None,
    };
    Some(words)
}

fn chunk_status(index: usize, count: usize) -> u8 {
    match (index, count) {
        (_, 1) => STATUS_COMPLETE,
        (0, _) => STATUS_START,
        (i, n) if i + 1 == n => STATUS_END,
        _ => STATUS_CONTINUE,
    }
}

fn encode_sysex7(payload: &[u8], group: U4) -> Vec<u32> {
    let count = payload.len().div_ceil(SYSEX7_BYTES_PER_PACKET).max(1);
    let mut words = Vec::with_capacity(count * 2);
    for i in 0..count {
        let start = (i * SYSEX7_BYTES_PER_PACKET).min(payload.len());
        let end = (start + SYSEX7_BYTES_PER_PACKET).min(payload.len());
        let chunk = &payload[start..end];
        let mut bytes = [0u8; SYSEX7_BYTES_PER_PACKET];
        bytes[..chunk.len()].copy_from_slice(chunk);

        words.push(
            header(0x3, group)
                | ((chunk_status(i, count) as u32) << 20)
                | ((chunk.len() as u32) << 16)
                | ((bytes[0] as u32) << 8)
                | bytes[1] as u32,
        );
        words.push(u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]));
    }
    words
}

fn encode_sysex8(payload: &[u8], stream_id: u8, group: U4) -> Vec<u32> {
    let count = payload.len().div_ceil(SYSEX8_BYTES_PER_PACKET).max(1);
    let mut words = Vec::with_capacity(count * 4);
    for i in 0..count {
        let start = (i * SYSEX8_BYTES_PER_PACKET).min(payload.len());
        let end = (start + SYSEX8_BYTES_PER_PACKET).min(payload.len());
        let chunk = &payload[start..end];
        let mut bytes = [0u8; SYSEX8_BYTES_PER_PACKET];
        bytes[..chunk.len()].copy_from_slice(chunk);

        // The byte count includes the stream ID.
        words.push(
            header(0x5, group)
                | ((chunk_status(i, count) as u32) << 20)
                | (((chunk.len() + 1) as u32) << 16)
                | ((stream_id as u32) << 8)
                | bytes[0] as u32,
        );
        for word in bytes[1..].chunks_exact(4) {
            words.push(u32::from_be_bytes([word[0], word[1], word[2], word[3]]));
        }
    }
    words
}

impl Event {
    /// UMP words. Empty when `protocol` cannot carry the event.
    pub fn ump_raw_words(&self, protocol: Protocol) -> Vec<u32> {
        self.try_ump_raw_words(protocol).unwrap_or_default()
    }

    /// UMP words, or [`ParseError::Unsupported`] for MIDI 2.0-only channel
    /// voice events under [`Protocol::Midi1`].
    pub fn try_ump_raw_words(&self, protocol: Protocol) -> Result<Vec<u32>, ParseError> {
        let group = self.group();
        match self {
            Event::NoOp { .. } => return Ok(vec![header(0x0, group)]),
            Event::JrClock { time, .. } => {
                return Ok(vec![header(0x0, group) | (0x1 << 20) | *time as u32])
            }
            Event::JrTimestamp { time, .. } => {
                return Ok(vec![header(0x0, group) | (0x2 << 20) | *time as u32])
            }
            Event::SysEx7(sysex) => return Ok(encode_sysex7(&sysex.payload(), group)),
            Event::UniversalSysEx7(sysex) => return Ok(encode_sysex7(&sysex.payload(), group)),
            Event::SysEx8(sysex) => {
                return Ok(encode_sysex8(&sysex.payload(), sysex.stream_id, group))
            }
            Event::UniversalSysEx8(sysex) => {
                return Ok(encode_sysex8(&sysex.payload(), sysex.stream_id, group))
            }
            _ => {}
        }

        if protocol == Protocol::Midi2 {
            if let Some(words) = encode_midi2_channel_voice(self) {
                return Ok(words.to_vec());
            }
        }

        let mt = if self.channel().is_some() { 0x2 } else { 0x1 };
        let messages = short_messages(self).ok_or_else(|| {
            ParseError::unsupported(format!("{self} needs MIDI 2.0 channel voice packets"))
        })?;
        Ok(messages
            .iter()
            .map(|[status, d1, d2]| {
                header(mt, group) | ((*status as u32) << 16) | ((*d1 as u32) << 8) | *d2 as u32
            })
            .collect())
    }

    /// Decodes exactly one event from UMP words. A SysEx message may span
    /// several packets, as may the MIDI 1.0 protocol form of RPN, NRPN and
    /// banked program changes.
    pub fn from_ump_words(words: &[u32]) -> Result<Event, ParseError> {
        if words.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut assembler = SysExAssembler::default();
        let mut compound = CompoundAssembler::default();
        let mut events = Vec::new();
        let mut offset = 0;
        while offset < words.len() {
            let len = packet_word_count(words[offset]);
            let packet = words
                .get(offset..offset + len)
                .ok_or_else(|| ParseError::malformed("truncated packet"))?;
            offset += len;

            let mut results = Vec::new();
            match decode_packet(packet)? {
                Packet::Event(event) => results.push(Ok(event)),
                sysex => assembler.push(sysex, None, |r| results.push(r)),
            }
            for result in results {
                compound.push(result?, &mut |event| events.push(event));
            }
        }
        if assembler.is_accumulating() {
            return Err(ParseError::malformed("incomplete system exclusive"));
        }
        compound.flush(&mut |event| events.push(event));

        let mut events = events.into_iter();
        match (events.next(), events.next()) {
            (Some(event), None) => Ok(event),
            (None, _) => Err(ParseError::malformed("incomplete system exclusive")),
            _ => Err(ParseError::malformed("trailing words after message")),
        }
    }
}

/// One decoded UMP packet. SysEx packets still need reassembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Packet {
    Event(Event),
    SysEx7 {
        group: U4,
        status: u8,
        data: SmallVec<[u8; SYSEX7_BYTES_PER_PACKET]>,
    },
    SysEx8 {
        group: U4,
        stream_id: u8,
        status: u8,
        data: SmallVec<[u8; SYSEX8_BYTES_PER_PACKET]>,
    },
}

fn check_data(d1: u8, d2: u8) -> Result<(), ParseError> {
    if d1 > 0x7F || d2 > 0x7F {
        return Err(ParseError::malformed("data byte exceeds 7 bits"));
    }
    Ok(())
}

/// Decodes a single packet. `words` must hold exactly
/// [`packet_word_count`] words.
pub(crate) fn decode_packet(words: &[u32]) -> Result<Packet, ParseError> {
    let word0 = *words.first().ok_or(ParseError::Empty)?;
    let mt = MessageType::from_word(word0);
    if words.len() != mt.word_count() {
        return Err(ParseError::malformed(format!(
            "message type {:#X} takes {} words, got {}",
            mt.nibble(),
            mt.word_count(),
            words.len()
        )));
    }

    let group = U4::from_masked((word0 >> 24) as u8);
    let [_, b1, b2, b3] = word0.to_be_bytes();

    let event = match mt {
        MessageType::Utility => {
            let time = (word0 & 0xFFFF) as u16;
            match (word0 >> 20) & 0xF {
                0x0 => Event::no_op(group),
                0x1 => Event::jr_clock(time, group),
                0x2 => Event::jr_timestamp(time, group),
                status => {
                    return Err(ParseError::unsupported(format!(
                        "utility status {status:#X}"
                    )))
                }
            }
        }
        MessageType::System => {
            check_data(b2, b3)?;
            match b1 {
                0xF1..=0xF6 => decode_system_common(b1, b2, b3, group)?,
                0xF8..=0xFF => decode_real_time(b1, group)?,
                _ => {
                    return Err(ParseError::malformed(format!(
                        "{b1:#04X} is not a system status"
                    )))
                }
            }
        }
        MessageType::Midi1ChannelVoice => {
            if !(0x80..=0xEF).contains(&b1) {
                return Err(ParseError::malformed(format!(
                    "{b1:#04X} is not a channel voice status"
                )));
            }
            check_data(b2, b3)?;
            decode_channel_voice(b1, b2, b3, group)
        }
        MessageType::Midi2ChannelVoice => decode_midi2_channel_voice(word0, words[1], group)?,
        MessageType::SysEx7 => {
            let status = ((word0 >> 20) & 0xF) as u8;
            let len = ((word0 >> 16) & 0xF) as usize;
            if status > STATUS_END {
                return Err(ParseError::malformed(format!("SysEx7 status {status:#X}")));
            }
            if len > SYSEX7_BYTES_PER_PACKET {
                return Err(ParseError::malformed(format!("SysEx7 byte count {len}")));
            }
            let [c0, c1, c2, c3] = words[1].to_be_bytes();
            let bytes = [b2, b3, c0, c1, c2, c3];
            return Ok(Packet::SysEx7 {
                group,
                status,
                data: SmallVec::from_slice(&bytes[..len]),
            });
        }
        MessageType::SysEx8 => {
            let status = ((word0 >> 20) & 0xF) as u8;
            let len = ((word0 >> 16) & 0xF) as usize;
            if status == 0x8 || status == 0x9 {
                return Err(ParseError::unsupported("mixed data set"));
            }
            if status > STATUS_END {
                return Err(ParseError::malformed(format!("SysEx8 status {status:#X}")));
            }
            if len == 0 || len > SYSEX8_BYTES_PER_PACKET + 1 {
                return Err(ParseError::malformed(format!("SysEx8 byte count {len}")));
            }
            let mut bytes = SmallVec::<[u8; SYSEX8_BYTES_PER_PACKET]>::new();
            bytes.push(b3);
            for word in &words[1..] {
                bytes.extend_from_slice(&word.to_be_bytes());
            }
            bytes.truncate(len - 1);
            return Ok(Packet::SysEx8 {
                group,
                stream_id: b2,
                status,
                data: bytes,
            });
        }
        MessageType::Reserved(mt) => {
            return Err(ParseError::unsupported(format!(
                "reserved message type {mt:#X}"
            )))
        }
    };
    Ok(Packet::Event(event))
}

fn decode_midi2_channel_voice(word0: u32, word1: u32, group: U4) -> Result<Event, ParseError> {
    let [_, b1, index1, index2] = word0.to_be_bytes();
    let op = b1 >> 4;
    let channel = U4::from_masked(b1);
    let note = U7::from_masked(index1);

    let event = match op {
        0x8 | 0x9 => {
            let velocity = NoteVelocity::Midi2((word1 >> 16) as u16);
            let attribute = NoteAttribute::from_raw(index2, word1 as u16);
            let note = Note {
                note,
                velocity,
                attribute,
                channel,
                group,
            };
            if op == 0x9 {
                Event::NoteOn(note)
            } else {
                Event::NoteOff(note)
            }
        }
        0xA => Event::note_pressure(note, ControllerValue::Midi2(word1), channel, group),
        0x0 => Event::note_cc(note, NoteController::Registered(index2), word1, channel, group),
        0x1 => Event::note_cc(note, NoteController::Assignable(index2), word1, channel, group),
        0x2 => Event::rpn(note, U7::from_masked(index2), word1, channel, group),
        0x3 => Event::nrpn(note, U7::from_masked(index2), word1, channel, group),
        0x6 => Event::note_pitch_bend(note, PitchBendValue::Midi2(word1), channel, group),
        0xB => Event::cc(
            Controller(U7::from_masked(index1)),
            ControllerValue::Midi2(word1),
            channel,
            group,
        ),
        0xC => {
            let [program, _, msb, lsb] = word1.to_be_bytes();
            let bank = (index2 & 0x01 != 0).then(|| Bank {
                msb: U7::from_masked(msb),
                lsb: U7::from_masked(lsb),
            });
            Event::program_change(U7::from_masked(program), bank, channel, group)
        }
        0xD => Event::pressure(ControllerValue::Midi2(word1), channel, group),
        0xE => Event::pitch_bend(PitchBendValue::Midi2(word1), channel, group),
        0xF => Event::note_management(note, index2 & 0x02 != 0, index2 & 0x01 != 0, channel, group),
        op => {
            return Err(ParseError::unsupported(format!(
                "MIDI 2.0 channel voice opcode {op:#X}"
            )))
        }
    };
    Ok(event)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum StreamKey {
    SysEx7 { group: u8 },
    SysEx8 { group: u8, stream_id: u8 },
}

#[derive(Debug)]
enum Reassembly {
    Accumulating(Vec<u8>),
    /// Exceeded the length limit; remaining packets are dropped until End.
    Overflowed,
}

/// Reassembles multi-packet SysEx7 per group and SysEx8 per (group, stream).
#[derive(Debug, Default)]
pub(crate) struct SysExAssembler {
    streams: HashMap<StreamKey, Reassembly>,
}

impl SysExAssembler {
    /// Feeds one SysEx packet. Non-SysEx packets are passed through.
    pub(crate) fn push<F>(&mut self, packet: Packet, max_len: Option<usize>, mut emit: F)
    where
        F: FnMut(Result<Event, ParseError>),
    {
        let (key, status, data, group, stream_id) = match packet {
            Packet::Event(event) => {
                emit(Ok(event));
                return;
            }
            Packet::SysEx7 {
                group,
                status,
                data,
            } => (
                StreamKey::SysEx7 { group: group.get() },
                status,
                data.to_vec(),
                group,
                None,
            ),
            Packet::SysEx8 {
                group,
                stream_id,
                status,
                data,
            } => (
                StreamKey::SysEx8 {
                    group: group.get(),
                    stream_id,
                },
                status,
                data.to_vec(),
                group,
                Some(stream_id),
            ),
        };

        let finish = |payload: &[u8]| match stream_id {
            Some(stream_id) => sysex8_from_payload(payload, stream_id, group),
            None => sysex7_from_payload(payload, group),
        };

        match status {
            STATUS_COMPLETE | STATUS_START => {
                if self.streams.remove(&key).is_some() {
                    emit(Err(ParseError::malformed("unterminated system exclusive")));
                }
                if status == STATUS_COMPLETE {
                    emit(finish(&data));
                } else {
                    trace!(?key, "SysEx start");
                    self.streams.insert(key, Reassembly::Accumulating(data));
                }
            }
            _ => {
                let Some(state) = self.streams.get_mut(&key) else {
                    emit(Err(ParseError::malformed(
                        "system exclusive continuation without start",
                    )));
                    return;
                };
                let overflowed = match state {
                    Reassembly::Accumulating(buffer) => {
                        buffer.extend_from_slice(&data);
                        max_len.is_some_and(|max| buffer.len() > max)
                    }
                    Reassembly::Overflowed => false,
                };
                if overflowed {
                    *state = Reassembly::Overflowed;
                    emit(Err(ParseError::malformed(
                        "system exclusive exceeds maximum length",
                    )));
                }
                if status == STATUS_END {
                    if let Some(Reassembly::Accumulating(payload)) = self.streams.remove(&key) {
                        emit(finish(&payload));
                    }
                }
            }
        }
    }

    pub(crate) fn is_accumulating(&self) -> bool {
        !self.streams.is_empty()
    }

    pub(crate) fn reset(&mut self) {
        self.streams.clear();
    }
}
