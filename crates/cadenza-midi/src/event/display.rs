//! Human-readable event descriptions, used by logging receivers.

use std::fmt;

use crate::note::note_name;

use super::{Event, NoteController};

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::NoteOn(e) => write!(
                f,
                "Note On {} vel={} ch={} grp={}",
                note_name(e.note),
                e.velocity,
                e.channel,
                e.group
            ),
            Event::NoteOff(e) => write!(
                f,
                "Note Off {} vel={} ch={} grp={}",
                note_name(e.note),
                e.velocity,
                e.channel,
                e.group
            ),
            Event::NoteCc(e) => {
                let kind = match e.controller {
                    NoteController::Registered(_) => "Registered",
                    NoteController::Assignable(_) => "Assignable",
                };
                write!(
                    f,
                    "{kind} Per-Note CC {} {} value={:#X} ch={} grp={}",
                    e.controller.index(),
                    note_name(e.note),
                    e.value,
                    e.channel,
                    e.group
                )
            }
            Event::NotePitchBend(e) => write!(
                f,
                "Per-Note Pitch Bend {} value={} ch={} grp={}",
                note_name(e.note),
                e.value,
                e.channel,
                e.group
            ),
            Event::NotePressure(e) => write!(
                f,
                "Poly Pressure {} amount={} ch={} grp={}",
                note_name(e.note),
                e.amount,
                e.channel,
                e.group
            ),
            Event::NoteManagement(e) => write!(
                f,
                "Per-Note Management {} detach={} reset={} ch={} grp={}",
                note_name(e.note),
                e.detach,
                e.reset,
                e.channel,
                e.group
            ),
            Event::Cc(e) => write!(
                f,
                "CC {} value={} ch={} grp={}",
                e.controller, e.value, e.channel, e.group
            ),
            Event::ProgramChange(e) => {
                write!(f, "Program Change {}", e.program)?;
                if let Some(bank) = e.bank {
                    write!(f, " bank={}:{}", bank.msb, bank.lsb)?;
                }
                write!(f, " ch={} grp={}", e.channel, e.group)
            }
            Event::PitchBend(e) => write!(
                f,
                "Pitch Bend value={} ch={} grp={}",
                e.value, e.channel, e.group
            ),
            Event::Pressure(e) => write!(
                f,
                "Channel Pressure amount={} ch={} grp={}",
                e.amount, e.channel, e.group
            ),
            Event::Rpn(e) => write!(
                f,
                "RPN {}:{} value={:#X} ch={} grp={}",
                e.bank, e.index, e.value, e.channel, e.group
            ),
            Event::Nrpn(e) => write!(
                f,
                "NRPN {}:{} value={:#X} ch={} grp={}",
                e.bank, e.index, e.value, e.channel, e.group
            ),
            Event::SysEx7(e) => write!(
                f,
                "SysEx7 {} len={} grp={}",
                e.manufacturer,
                e.data.len(),
                e.group
            ),
            Event::UniversalSysEx7(e) => write!(
                f,
                "Universal SysEx7 {:?} dev={} sub={:02X}/{:02X} len={} grp={}",
                e.universal_type,
                e.device_id,
                e.sub_id1,
                e.sub_id2,
                e.data.len(),
                e.group
            ),
            Event::SysEx8(e) => write!(
                f,
                "SysEx8 {} stream={} len={} grp={}",
                e.manufacturer,
                e.stream_id,
                e.data.len(),
                e.group
            ),
            Event::UniversalSysEx8(e) => write!(
                f,
                "Universal SysEx8 {:?} dev={} sub={:02X}/{:02X} stream={} len={} grp={}",
                e.universal_type,
                e.device_id,
                e.sub_id1,
                e.sub_id2,
                e.stream_id,
                e.data.len(),
                e.group
            ),
            Event::TimecodeQuarterFrame { data_byte, group } => {
                write!(f, "MTC Quarter Frame {data_byte:#04X} grp={group}")
            }
            Event::SongPositionPointer { midi_beat, group } => {
                write!(f, "Song Position {midi_beat} grp={group}")
            }
            Event::SongSelect { number, group } => write!(f, "Song Select {number} grp={group}"),
            Event::TuneRequest { group } => write!(f, "Tune Request grp={group}"),
            Event::TimingClock { group } => write!(f, "Timing Clock grp={group}"),
            Event::Start { group } => write!(f, "Start grp={group}"),
            Event::Continue { group } => write!(f, "Continue grp={group}"),
            Event::Stop { group } => write!(f, "Stop grp={group}"),
            Event::ActiveSensing { group } => write!(f, "Active Sensing grp={group}"),
            Event::SystemReset { group } => write!(f, "System Reset grp={group}"),
            Event::NoOp { group } => write!(f, "NOOP grp={group}"),
            Event::JrClock { time, group } => write!(f, "JR Clock {time} grp={group}"),
            Event::JrTimestamp { time, group } => write!(f, "JR Timestamp {time} grp={group}"),
        }
    }
}
