//! Event categories and per-category sub-types, used by filters.

use serde::{Deserialize, Serialize};

use super::Event;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    ChanVoice,
    SystemCommon,
    SystemRealTime,
    SysEx,
    Utility,
}

/// Which protocol generations can carry an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    Both,
    Midi2Only,
}

/// A closed set of event sub-types within one [`EventCategory`].
pub trait EventKind: Copy + Eq + std::hash::Hash {
    const CATEGORY: EventCategory;

    /// `None` when the event belongs to another category.
    fn of(event: &Event) -> Option<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanVoiceType {
    NoteOn,
    NoteOff,
    NoteCc,
    NotePitchBend,
    NotePressure,
    NoteManagement,
    Cc,
    ProgramChange,
    PitchBend,
    Pressure,
    Rpn,
    Nrpn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemCommonType {
    TimecodeQuarterFrame,
    SongPositionPointer,
    SongSelect,
    TuneRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemRealTimeType {
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    SystemReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SysExType {
    SysEx7,
    UniversalSysEx7,
    SysEx8,
    UniversalSysEx8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtilityType {
    NoOp,
    JrClock,
    JrTimestamp,
}

impl EventKind for ChanVoiceType {
    const CATEGORY: EventCategory = EventCategory::ChanVoice;

    fn of(event: &Event) -> Option<Self> {
        let kind = match event {
            Event::NoteOn(_) => ChanVoiceType::NoteOn,
            Event::NoteOff(_) => ChanVoiceType::NoteOff,
            Event::NoteCc(_) => ChanVoiceType::NoteCc,
            Event::NotePitchBend(_) => ChanVoiceType::NotePitchBend,
            Event::NotePressure(_) => ChanVoiceType::NotePressure,
            Event::NoteManagement(_) => ChanVoiceType::NoteManagement,
            Event::Cc(_) => ChanVoiceType::Cc,
            Event::ProgramChange(_) => ChanVoiceType::ProgramChange,
            Event::PitchBend(_) => ChanVoiceType::PitchBend,
            Event::Pressure(_) => ChanVoiceType::Pressure,
            Event::Rpn(_) => ChanVoiceType::Rpn,
            Event::Nrpn(_) => ChanVoiceType::Nrpn,
            _ => return None,
        };
        Some(kind)
    }
}

impl EventKind for SystemCommonType {
    const CATEGORY: EventCategory = EventCategory::SystemCommon;

    fn of(event: &Event) -> Option<Self> {
        let kind = match event {
            Event::TimecodeQuarterFrame { .. } => SystemCommonType::TimecodeQuarterFrame,
            Event::SongPositionPointer { .. } => SystemCommonType::SongPositionPointer,
            Event::SongSelect { .. } => SystemCommonType::SongSelect,
            Event::TuneRequest { .. } => SystemCommonType::TuneRequest,
            _ => return None,
        };
        Some(kind)
    }
}

impl EventKind for SystemRealTimeType {
    const CATEGORY: EventCategory = EventCategory::SystemRealTime;

    fn of(event: &Event) -> Option<Self> {
        let kind = match event {
            Event::TimingClock { .. } => SystemRealTimeType::TimingClock,
            Event::Start { .. } => SystemRealTimeType::Start,
            Event::Continue { .. } => SystemRealTimeType::Continue,
            Event::Stop { .. } => SystemRealTimeType::Stop,
            Event::ActiveSensing { .. } => SystemRealTimeType::ActiveSensing,
            Event::SystemReset { .. } => SystemRealTimeType::SystemReset,
            _ => return None,
        };
        Some(kind)
    }
}

impl EventKind for SysExType {
    const CATEGORY: EventCategory = EventCategory::SysEx;

    fn of(event: &Event) -> Option<Self> {
        let kind = match event {
            Event::SysEx7(_) => SysExType::SysEx7,
            Event::UniversalSysEx7(_) => SysExType::UniversalSysEx7,
            Event::SysEx8(_) => SysExType::SysEx8,
            Event::UniversalSysEx8(_) => SysExType::UniversalSysEx8,
            _ => return None,
        };
        Some(kind)
    }
}

impl EventKind for UtilityType {
    const CATEGORY: EventCategory = EventCategory::Utility;

    fn of(event: &Event) -> Option<Self> {
        let kind = match event {
            Event::NoOp { .. } => UtilityType::NoOp,
            Event::JrClock { .. } => UtilityType::JrClock,
            Event::JrTimestamp { .. } => UtilityType::JrTimestamp,
            _ => return None,
        };
        Some(kind)
    }
}
