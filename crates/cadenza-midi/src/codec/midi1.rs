//! MIDI 1.0 byte stream encoding.

use smallvec::{smallvec, SmallVec};

use crate::error::ParseError;
use crate::event::{sysex7_from_payload, Controller, Event};

use super::compound::CompoundAssembler;
use crate::value::{ControllerValue, NoteVelocity, PitchBendValue, U14, U4, U7};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const POLY_PRESSURE: u8 = 0xA0;
const CONTROL_CHANGE: u8 = 0xB0;
const PROGRAM_CHANGE: u8 = 0xC0;
const CHANNEL_PRESSURE: u8 = 0xD0;
const PITCH_BEND: u8 = 0xE0;

pub(crate) const SYSEX_START: u8 = 0xF0;
pub(crate) const SYSEX_END: u8 = 0xF7;

/// Status byte plus up to two data bytes. Unused data bytes are zero.
pub(crate) type ShortMessage = [u8; 3];

/// Number of data bytes following `status`, or `None` for SysEx framing
/// bytes and undefined status bytes.
pub(crate) fn data_len(status: u8) -> Option<usize> {
    match status {
        0xC0..=0xDF => Some(1),
        0x80..=0xEF => Some(2),
        0xF1 | 0xF3 => Some(1),
        0xF2 => Some(2),
        0xF6 | 0xF8 | 0xFA | 0xFB | 0xFC | 0xFE | 0xFF => Some(0),
        _ => None,
    }
}

/// Decodes a channel voice message. `status` must be in `0x80..=0xEF` and the
/// data bytes must already be 7-bit.
pub(crate) fn decode_channel_voice(status: u8, data1: u8, data2: u8, group: U4) -> Event {
    let channel = U4::from_masked(status);
    let d1 = U7::from_masked(data1);
    let d2 = U7::from_masked(data2);
    match status & 0xF0 {
        NOTE_OFF => Event::note_off(d1, NoteVelocity::Midi1(d2), channel, group),
        NOTE_ON => Event::note_on(d1, NoteVelocity::Midi1(d2), channel, group),
        POLY_PRESSURE => Event::note_pressure(d1, ControllerValue::Midi1(d2), channel, group),
        CONTROL_CHANGE => Event::cc(Controller(d1), ControllerValue::Midi1(d2), channel, group),
        PROGRAM_CHANGE => Event::program_change(d1, None, channel, group),
        CHANNEL_PRESSURE => Event::pressure(ControllerValue::Midi1(d1), channel, group),
        _ => Event::pitch_bend(
            PitchBendValue::Midi1(U14::from_msb_lsb(d2, d1)),
            channel,
            group,
        ),
    }
}

pub(crate) fn decode_system_common(
    status: u8,
    data1: u8,
    data2: u8,
    group: U4,
) -> Result<Event, ParseError> {
    let d1 = U7::from_masked(data1);
    let d2 = U7::from_masked(data2);
    match status {
        0xF1 => Ok(Event::timecode_quarter_frame(d1, group)),
        0xF2 => Ok(Event::song_position_pointer(U14::from_msb_lsb(d2, d1), group)),
        0xF3 => Ok(Event::song_select(d1, group)),
        0xF6 => Ok(Event::tune_request(group)),
        _ => Err(undefined_status(status)),
    }
}

pub(crate) fn decode_real_time(status: u8, group: U4) -> Result<Event, ParseError> {
    match status {
        0xF8 => Ok(Event::timing_clock(group)),
        0xFA => Ok(Event::start(group)),
        0xFB => Ok(Event::continue_(group)),
        0xFC => Ok(Event::stop(group)),
        0xFE => Ok(Event::active_sensing(group)),
        0xFF => Ok(Event::system_reset(group)),
        _ => Err(undefined_status(status)),
    }
}

pub(crate) fn undefined_status(status: u8) -> ParseError {
    ParseError::unsupported(format!("undefined status byte {status:#04X}"))
}

/// A MIDI 2.0 velocity that scales down to 0 would read as Note Off, so it
/// is sent as 1.
fn note_on_velocity(velocity: NoteVelocity) -> U7 {
    let value = velocity.midi1_value();
    if value.get() == 0 && velocity.midi2_value() > 0 {
        U7::from_masked(1)
    } else {
        value
    }
}

fn cc(channel: U4, controller: Controller, value: U7) -> ShortMessage {
    [CONTROL_CHANGE | channel.get(), controller.number().get(), value.get()]
}

/// The non-SysEx MIDI 1.0 messages that carry `event`, in send order.
///
/// Program changes with a bank and RPN/NRPN expand to several Control Change
/// messages. Returns `None` for SysEx and for events MIDI 1.0 cannot carry.
pub(crate) fn short_messages(event: &Event) -> Option<SmallVec<[ShortMessage; 4]>> {
    let messages = match event {
        Event::NoteOn(e) => smallvec![[
            NOTE_ON | e.channel.get(),
            e.note.get(),
            note_on_velocity(e.velocity).get()
        ]],
        Event::NoteOff(e) => smallvec![[
            NOTE_OFF | e.channel.get(),
            e.note.get(),
            e.velocity.midi1_value().get()
        ]],
        Event::NotePressure(e) => smallvec![[
            POLY_PRESSURE | e.channel.get(),
            e.note.get(),
            e.amount.midi1_value().get()
        ]],
        Event::Cc(e) => smallvec![cc(e.channel, e.controller, e.value.midi1_value())],
        Event::ProgramChange(e) => {
            let mut messages = SmallVec::new();
            if let Some(bank) = e.bank {
                messages.push(cc(e.channel, Controller::BANK_SELECT, bank.msb));
                messages.push(cc(e.channel, Controller::BANK_SELECT_LSB, bank.lsb));
            }
            messages.push([PROGRAM_CHANGE | e.channel.get(), e.program.get(), 0]);
            messages
        }
        Event::Pressure(e) => smallvec![[
            CHANNEL_PRESSURE | e.channel.get(),
            e.amount.midi1_value().get(),
            0
        ]],
        Event::PitchBend(e) => {
            let value = e.value.midi1_value();
            smallvec![[
                PITCH_BEND | e.channel.get(),
                value.lsb().get(),
                value.msb().get()
            ]]
        }
        Event::Rpn(e) | Event::Nrpn(e) => {
            let (msb, lsb) = match event {
                Event::Rpn(_) => (Controller::RPN_MSB, Controller::RPN_LSB),
                _ => (Controller::NRPN_MSB, Controller::NRPN_LSB),
            };
            let value = U14::from_midi2(e.value);
            smallvec![
                cc(e.channel, msb, e.bank),
                cc(e.channel, lsb, e.index),
                cc(e.channel, Controller::DATA_ENTRY, value.msb()),
                cc(e.channel, Controller::DATA_ENTRY_LSB, value.lsb()),
            ]
        }
        Event::TimecodeQuarterFrame { data_byte, .. } => smallvec![[0xF1, data_byte.get(), 0]],
        Event::SongPositionPointer { midi_beat, .. } => {
            smallvec![[0xF2, midi_beat.lsb().get(), midi_beat.msb().get()]]
        }
        Event::SongSelect { number, .. } => smallvec![[0xF3, number.get(), 0]],
        Event::TuneRequest { .. } => smallvec![[0xF6, 0, 0]],
        Event::TimingClock { .. } => smallvec![[0xF8, 0, 0]],
        Event::Start { .. } => smallvec![[0xFA, 0, 0]],
        Event::Continue { .. } => smallvec![[0xFB, 0, 0]],
        Event::Stop { .. } => smallvec![[0xFC, 0, 0]],
        Event::ActiveSensing { .. } => smallvec![[0xFE, 0, 0]],
        Event::SystemReset { .. } => smallvec![[0xFF, 0, 0]],
        _ => return None,
    };
    Some(messages)
}

fn framed_sysex(payload: Vec<u8>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 2);
    bytes.push(SYSEX_START);
    bytes.extend(payload);
    bytes.push(SYSEX_END);
    bytes
}

impl Event {
    /// MIDI 1.0 wire bytes. Empty for events only MIDI 2.0 can carry.
    pub fn midi1_raw_bytes(&self) -> Vec<u8> {
        self.try_midi1_raw_bytes().unwrap_or_default()
    }

    /// MIDI 1.0 wire bytes, or [`ParseError::Unsupported`] for events only
    /// MIDI 2.0 can carry.
    pub fn try_midi1_raw_bytes(&self) -> Result<Vec<u8>, ParseError> {
        match self {
            Event::SysEx7(sysex) => return Ok(framed_sysex(sysex.payload())),
            Event::UniversalSysEx7(sysex) => return Ok(framed_sysex(sysex.payload())),
            _ => {}
        }
        let messages = short_messages(self)
            .ok_or_else(|| ParseError::unsupported(format!("{self} has no MIDI 1.0 form")))?;

        let mut bytes = Vec::with_capacity(messages.len() * 3);
        for message in &messages {
            let len = data_len(message[0]).unwrap_or(0);
            bytes.extend_from_slice(&message[..=len]);
        }
        Ok(bytes)
    }

    /// Decodes exactly one event in group 0. RPN, NRPN and banked program
    /// changes are accepted as the Control Change run that carries them.
    pub fn from_midi1_bytes(bytes: &[u8]) -> Result<Event, ParseError> {
        Self::from_midi1_bytes_in_group(bytes, U4::MIN)
    }

    /// Like [`from_midi1_bytes`](Self::from_midi1_bytes), stamping `group`
    /// on the event.
    pub fn from_midi1_bytes_in_group(bytes: &[u8], group: U4) -> Result<Event, ParseError> {
        let (&status, data) = bytes.split_first().ok_or(ParseError::Empty)?;
        if status < 0x80 {
            return Err(ParseError::malformed(format!(
                "expected a status byte, found {status:#04X}"
            )));
        }

        match status {
            SYSEX_START => {
                let payload = match data.split_last() {
                    Some((&SYSEX_END, payload)) => payload,
                    _ => return Err(ParseError::malformed("missing end of exclusive")),
                };
                if payload.iter().any(|b| *b > 0x7F) {
                    return Err(ParseError::malformed(
                        "status byte inside system exclusive",
                    ));
                }
                return sysex7_from_payload(payload, group);
            }
            SYSEX_END => return Err(ParseError::malformed("end of exclusive without start")),
            _ => {}
        }

        let len = data_len(status).ok_or_else(|| undefined_status(status))?;
        if data.len() > len && status & 0xF0 == CONTROL_CHANGE {
            return decode_cc_run(bytes, group);
        }
        if data.len() != len {
            return Err(ParseError::malformed(format!(
                "status {status:#04X} takes {len} data bytes, got {}",
                data.len()
            )));
        }
        if let Some(byte) = data.iter().find(|b| **b > 0x7F) {
            return Err(ParseError::malformed(format!(
                "data byte {byte:#04X} exceeds 7 bits"
            )));
        }

        let data1 = data.first().copied().unwrap_or(0);
        let data2 = data.get(1).copied().unwrap_or(0);
        match status {
            0x80..=0xEF => Ok(decode_channel_voice(status, data1, data2, group)),
            0xF1..=0xF6 => decode_system_common(status, data1, data2, group),
            _ => decode_real_time(status, group),
        }
    }
}

/// Decodes back-to-back messages that must fold into a single event.
fn decode_cc_run(bytes: &[u8], group: U4) -> Result<Event, ParseError> {
    let mut assembler = CompoundAssembler::default();
    let mut events = Vec::new();
    let mut rest = bytes;
    while let Some(&status) = rest.first() {
        let len = data_len(status).map_or(rest.len(), |len| (len + 1).min(rest.len()));
        let (message, tail) = rest.split_at(len);
        let event = Event::from_midi1_bytes_in_group(message, group)?;
        assembler.push(event, &mut |event| events.push(event));
        rest = tail;
    }
    assembler.flush(&mut |event| events.push(event));

    let mut events = events.into_iter();
    match (events.next(), events.next()) {
        (Some(event), None) => Ok(event),
        _ => Err(ParseError::malformed(
            "several messages where one event was expected",
        )),
    }
}
