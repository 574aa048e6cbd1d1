//! The MIDI event model.
//!
//! [`Event`] is a closed set of variants covering MIDI 1.0 and MIDI 2.0
//! channel voice, system common, system real-time, System Exclusive and UMP
//! utility messages. Every variant carries its UMP group; MIDI 1.0 sources
//! stamp a configured group (0 by default).
//!
//! Encoding and decoding live in [`crate::codec`].

mod chan_voice;
mod controller;
mod display;
mod kind;
mod sysex;

pub use chan_voice::{
    Bank, Cc, Note, NoteAttribute, NoteCc, NoteController, NoteManagement, NotePitchBend,
    NotePressure, ParameterNumber, PitchBend, Pitch7_25, Pressure, ProgramChange,
    UndefinedAttribute,
};
pub use controller::Controller;
pub use kind::{
    Availability, ChanVoiceType, EventCategory, EventKind, SysExType, SystemCommonType,
    SystemRealTimeType, UtilityType,
};
pub use sysex::{
    ManufacturerId, SysEx7, SysEx8, SysExId, UniversalSysEx7, UniversalSysEx8, UniversalType,
};

pub(crate) use sysex::{check_7bit, sysex7_from_payload, sysex8_from_payload};

use serde::{Deserialize, Serialize};

use crate::error::RangeError;
use crate::value::{ControllerValue, NoteVelocity, PitchBendValue, U14, U4, U7};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Channel voice
    NoteOn(Note),
    NoteOff(Note),
    NoteCc(NoteCc),
    NotePitchBend(NotePitchBend),
    NotePressure(NotePressure),
    NoteManagement(NoteManagement),
    Cc(Cc),
    ProgramChange(ProgramChange),
    PitchBend(PitchBend),
    Pressure(Pressure),
    Rpn(ParameterNumber),
    Nrpn(ParameterNumber),

    // System Exclusive
    SysEx7(SysEx7),
    UniversalSysEx7(UniversalSysEx7),
    SysEx8(SysEx8),
    UniversalSysEx8(UniversalSysEx8),

    // System common
    TimecodeQuarterFrame { data_byte: U7, group: U4 },
    SongPositionPointer { midi_beat: U14, group: U4 },
    SongSelect { number: U7, group: U4 },
    TuneRequest { group: U4 },

    // System real-time
    TimingClock { group: U4 },
    Start { group: U4 },
    Continue { group: U4 },
    Stop { group: U4 },
    ActiveSensing { group: U4 },
    SystemReset { group: U4 },

    // Utility, UMP only
    NoOp { group: U4 },
    JrClock { time: u16, group: U4 },
    JrTimestamp { time: u16, group: U4 },
}

impl Event {
    // ==================== Constructors ====================

    pub fn note_on(note: U7, velocity: NoteVelocity, channel: U4, group: U4) -> Self {
        Event::NoteOn(Note {
            note,
            velocity,
            attribute: NoteAttribute::None,
            channel,
            group,
        })
    }

    pub fn note_off(note: U7, velocity: NoteVelocity, channel: U4, group: U4) -> Self {
        Event::NoteOff(Note {
            note,
            velocity,
            attribute: NoteAttribute::None,
            channel,
            group,
        })
    }

    pub fn note_cc(
        note: U7,
        controller: NoteController,
        value: u32,
        channel: U4,
        group: U4,
    ) -> Self {
        Event::NoteCc(NoteCc {
            note,
            controller,
            value,
            channel,
            group,
        })
    }

    pub fn note_pitch_bend(note: U7, value: PitchBendValue, channel: U4, group: U4) -> Self {
        Event::NotePitchBend(NotePitchBend {
            note,
            value,
            channel,
            group,
        })
    }

    pub fn note_pressure(note: U7, amount: ControllerValue, channel: U4, group: U4) -> Self {
        Event::NotePressure(NotePressure {
            note,
            amount,
            channel,
            group,
        })
    }

    pub fn note_management(note: U7, detach: bool, reset: bool, channel: U4, group: U4) -> Self {
        Event::NoteManagement(NoteManagement {
            note,
            detach,
            reset,
            channel,
            group,
        })
    }

    pub fn cc(controller: Controller, value: ControllerValue, channel: U4, group: U4) -> Self {
        Event::Cc(Cc {
            controller,
            value,
            channel,
            group,
        })
    }

    pub fn program_change(program: U7, bank: Option<Bank>, channel: U4, group: U4) -> Self {
        Event::ProgramChange(ProgramChange {
            program,
            bank,
            channel,
            group,
        })
    }

    pub fn pitch_bend(value: PitchBendValue, channel: U4, group: U4) -> Self {
        Event::PitchBend(PitchBend {
            value,
            channel,
            group,
        })
    }

    pub fn pressure(amount: ControllerValue, channel: U4, group: U4) -> Self {
        Event::Pressure(Pressure {
            amount,
            channel,
            group,
        })
    }

    pub fn rpn(bank: U7, index: U7, value: u32, channel: U4, group: U4) -> Self {
        Event::Rpn(ParameterNumber {
            bank,
            index,
            value,
            channel,
            group,
        })
    }

    pub fn nrpn(bank: U7, index: U7, value: u32, channel: U4, group: U4) -> Self {
        Event::Nrpn(ParameterNumber {
            bank,
            index,
            value,
            channel,
            group,
        })
    }

    /// Fails when a data byte does not fit in 7 bits.
    pub fn sysex7(
        manufacturer: ManufacturerId,
        data: impl Into<Vec<u8>>,
        group: U4,
    ) -> Result<Self, RangeError> {
        let data = data.into();
        check_7bit(&data)?;
        Ok(Event::SysEx7(SysEx7 {
            manufacturer,
            data,
            group,
        }))
    }

    /// Fails when a data byte does not fit in 7 bits.
    pub fn universal_sysex7(
        universal_type: UniversalType,
        device_id: U7,
        sub_id1: U7,
        sub_id2: U7,
        data: impl Into<Vec<u8>>,
        group: U4,
    ) -> Result<Self, RangeError> {
        let data = data.into();
        check_7bit(&data)?;
        Ok(Event::UniversalSysEx7(UniversalSysEx7 {
            universal_type,
            device_id,
            sub_id1,
            sub_id2,
            data,
            group,
        }))
    }

    pub fn sysex8(
        manufacturer: ManufacturerId,
        data: impl Into<Vec<u8>>,
        stream_id: u8,
        group: U4,
    ) -> Self {
        Event::SysEx8(SysEx8 {
            manufacturer,
            data: data.into(),
            stream_id,
            group,
        })
    }

    pub fn universal_sysex8(
        universal_type: UniversalType,
        device_id: U7,
        sub_id1: U7,
        sub_id2: U7,
        data: impl Into<Vec<u8>>,
        stream_id: u8,
        group: U4,
    ) -> Self {
        Event::UniversalSysEx8(UniversalSysEx8 {
            universal_type,
            device_id,
            sub_id1,
            sub_id2,
            data: data.into(),
            stream_id,
            group,
        })
    }

    pub fn timecode_quarter_frame(data_byte: U7, group: U4) -> Self {
        Event::TimecodeQuarterFrame { data_byte, group }
    }

    pub fn song_position_pointer(midi_beat: U14, group: U4) -> Self {
        Event::SongPositionPointer { midi_beat, group }
    }

    pub fn song_select(number: U7, group: U4) -> Self {
        Event::SongSelect { number, group }
    }

    pub fn tune_request(group: U4) -> Self {
        Event::TuneRequest { group }
    }

    pub fn timing_clock(group: U4) -> Self {
        Event::TimingClock { group }
    }

    pub fn start(group: U4) -> Self {
        Event::Start { group }
    }

    pub fn continue_(group: U4) -> Self {
        Event::Continue { group }
    }

    pub fn stop(group: U4) -> Self {
        Event::Stop { group }
    }

    pub fn active_sensing(group: U4) -> Self {
        Event::ActiveSensing { group }
    }

    pub fn system_reset(group: U4) -> Self {
        Event::SystemReset { group }
    }

    pub fn no_op(group: U4) -> Self {
        Event::NoOp { group }
    }

    pub fn jr_clock(time: u16, group: U4) -> Self {
        Event::JrClock { time, group }
    }

    pub fn jr_timestamp(time: u16, group: U4) -> Self {
        Event::JrTimestamp { time, group }
    }

    // ==================== Accessors ====================

    pub fn group(&self) -> U4 {
        match self {
            Event::NoteOn(e) | Event::NoteOff(e) => e.group,
            Event::NoteCc(e) => e.group,
            Event::NotePitchBend(e) => e.group,
            Event::NotePressure(e) => e.group,
            Event::NoteManagement(e) => e.group,
            Event::Cc(e) => e.group,
            Event::ProgramChange(e) => e.group,
            Event::PitchBend(e) => e.group,
            Event::Pressure(e) => e.group,
            Event::Rpn(e) | Event::Nrpn(e) => e.group,
            Event::SysEx7(e) => e.group,
            Event::UniversalSysEx7(e) => e.group,
            Event::SysEx8(e) => e.group,
            Event::UniversalSysEx8(e) => e.group,
            Event::TimecodeQuarterFrame { group, .. }
            | Event::SongPositionPointer { group, .. }
            | Event::SongSelect { group, .. }
            | Event::TuneRequest { group }
            | Event::TimingClock { group }
            | Event::Start { group }
            | Event::Continue { group }
            | Event::Stop { group }
            | Event::ActiveSensing { group }
            | Event::SystemReset { group }
            | Event::NoOp { group }
            | Event::JrClock { group, .. }
            | Event::JrTimestamp { group, .. } => *group,
        }
    }

    /// Channel of a channel voice event.
    pub fn channel(&self) -> Option<U4> {
        let channel = match self {
            Event::NoteOn(e) | Event::NoteOff(e) => e.channel,
            Event::NoteCc(e) => e.channel,
            Event::NotePitchBend(e) => e.channel,
            Event::NotePressure(e) => e.channel,
            Event::NoteManagement(e) => e.channel,
            Event::Cc(e) => e.channel,
            Event::ProgramChange(e) => e.channel,
            Event::PitchBend(e) => e.channel,
            Event::Pressure(e) => e.channel,
            Event::Rpn(e) | Event::Nrpn(e) => e.channel,
            _ => return None,
        };
        Some(channel)
    }

    /// Note number of a per-note event.
    pub fn note(&self) -> Option<U7> {
        let note = match self {
            Event::NoteOn(e) | Event::NoteOff(e) => e.note,
            Event::NoteCc(e) => e.note,
            Event::NotePitchBend(e) => e.note,
            Event::NotePressure(e) => e.note,
            Event::NoteManagement(e) => e.note,
            _ => return None,
        };
        Some(note)
    }

    pub fn category(&self) -> EventCategory {
        match self {
            Event::NoteOn(_)
            | Event::NoteOff(_)
            | Event::NoteCc(_)
            | Event::NotePitchBend(_)
            | Event::NotePressure(_)
            | Event::NoteManagement(_)
            | Event::Cc(_)
            | Event::ProgramChange(_)
            | Event::PitchBend(_)
            | Event::Pressure(_)
            | Event::Rpn(_)
            | Event::Nrpn(_) => EventCategory::ChanVoice,
            Event::SysEx7(_)
            | Event::UniversalSysEx7(_)
            | Event::SysEx8(_)
            | Event::UniversalSysEx8(_) => EventCategory::SysEx,
            Event::TimecodeQuarterFrame { .. }
            | Event::SongPositionPointer { .. }
            | Event::SongSelect { .. }
            | Event::TuneRequest { .. } => EventCategory::SystemCommon,
            Event::TimingClock { .. }
            | Event::Start { .. }
            | Event::Continue { .. }
            | Event::Stop { .. }
            | Event::ActiveSensing { .. }
            | Event::SystemReset { .. } => EventCategory::SystemRealTime,
            Event::NoOp { .. } | Event::JrClock { .. } | Event::JrTimestamp { .. } => {
                EventCategory::Utility
            }
        }
    }

    /// Per-note controllers, per-note pitch bend, per-note management,
    /// SysEx8 and utility messages exist only as UMP.
    pub fn availability(&self) -> Availability {
        match self {
            Event::NoteCc(_)
            | Event::NotePitchBend(_)
            | Event::NoteManagement(_)
            | Event::SysEx8(_)
            | Event::UniversalSysEx8(_)
            | Event::NoOp { .. }
            | Event::JrClock { .. }
            | Event::JrTimestamp { .. } => Availability::Midi2Only,
            _ => Availability::Both,
        }
    }

    #[inline]
    pub fn is_midi2_only(&self) -> bool {
        self.availability() == Availability::Midi2Only
    }

    /// Note On with velocity above zero.
    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, Event::NoteOn(e) if e.velocity.midi2_value() > 0)
    }

    /// Note Off, or Note On with zero velocity.
    #[inline]
    pub fn is_note_off(&self) -> bool {
        match self {
            Event::NoteOff(_) => true,
            Event::NoteOn(e) => e.velocity.midi2_value() == 0,
            _ => false,
        }
    }

    pub fn description(&self) -> String {
        self.to_string()
    }
}
