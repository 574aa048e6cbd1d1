//! Channel voice message payloads.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::value::{ControllerValue, NoteVelocity, PitchBendValue, U25, U4, U7, U9};

use super::controller::Controller;

/// Note On / Note Off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note: U7,
    pub velocity: NoteVelocity,
    /// MIDI 2.0 only. Dropped when encoding to MIDI 1.0.
    pub attribute: NoteAttribute,
    pub channel: U4,
    pub group: U4,
}

/// MIDI 2.0 note attribute carried in Note On / Note Off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteAttribute {
    #[default]
    None,
    ManufacturerSpecific(u16),
    ProfileSpecific(u16),
    /// Pitch in semitones (7 bits) plus a 9-bit fraction.
    Pitch7_9 { coarse: U7, fine: U9 },
    Undefined(UndefinedAttribute),
}

impl NoteAttribute {
    /// `(attribute type, attribute data)` as laid out in the UMP.
    pub fn to_raw(self) -> (u8, u16) {
        match self {
            NoteAttribute::None => (0x00, 0),
            NoteAttribute::ManufacturerSpecific(data) => (0x01, data),
            NoteAttribute::ProfileSpecific(data) => (0x02, data),
            NoteAttribute::Pitch7_9 { coarse, fine } => {
                (0x03, ((coarse.get() as u16) << 9) | fine.get())
            }
            NoteAttribute::Undefined(attr) => (attr.kind, attr.data),
        }
    }

    pub fn from_raw(kind: u8, data: u16) -> Self {
        match kind {
            0x00 => NoteAttribute::None,
            0x01 => NoteAttribute::ManufacturerSpecific(data),
            0x02 => NoteAttribute::ProfileSpecific(data),
            0x03 => NoteAttribute::Pitch7_9 {
                coarse: U7::from_masked((data >> 9) as u8),
                fine: U9::from_masked(data),
            },
            kind => NoteAttribute::Undefined(UndefinedAttribute { kind, data }),
        }
    }
}

/// Attribute of a type this crate does not interpret. Types 0 to 3 are
/// always decoded into their own [`NoteAttribute`] variant, so they are
/// rejected here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u16)", into = "(u8, u16)")]
pub struct UndefinedAttribute {
    kind: u8,
    data: u16,
}

impl UndefinedAttribute {
    pub fn new(kind: u8, data: u16) -> Result<Self, ParseError> {
        if kind <= 0x03 {
            return Err(ParseError::malformed(format!(
                "note attribute type {kind:#04x} is defined"
            )));
        }
        Ok(UndefinedAttribute { kind, data })
    }

    pub fn kind(self) -> u8 {
        self.kind
    }

    pub fn data(self) -> u16 {
        self.data
    }
}

impl TryFrom<(u8, u16)> for UndefinedAttribute {
    type Error = ParseError;

    fn try_from((kind, data): (u8, u16)) -> Result<Self, ParseError> {
        UndefinedAttribute::new(kind, data)
    }
}

impl From<UndefinedAttribute> for (u8, u16) {
    fn from(attr: UndefinedAttribute) -> Self {
        (attr.kind, attr.data)
    }
}

/// Per-note controller, MIDI 2.0 only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCc {
    pub note: U7,
    pub controller: NoteController,
    pub value: u32,
    pub channel: U4,
    pub group: U4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteController {
    Registered(u8),
    Assignable(u8),
}

impl NoteController {
    pub const MODULATION: Self = Self::Registered(1);
    pub const BREATH: Self = Self::Registered(2);
    /// Value is a [`Pitch7_25`].
    pub const PITCH_7_25: Self = Self::Registered(3);
    pub const VOLUME: Self = Self::Registered(7);
    pub const BALANCE: Self = Self::Registered(8);
    pub const PAN: Self = Self::Registered(10);
    pub const EXPRESSION: Self = Self::Registered(11);

    #[inline]
    pub fn index(self) -> u8 {
        match self {
            NoteController::Registered(index) | NoteController::Assignable(index) => index,
        }
    }
}

/// Absolute pitch for registered per-note controller #3: 7-bit semitone plus
/// a 25-bit fraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch7_25 {
    pub coarse: U7,
    pub fine: U25,
}

impl Pitch7_25 {
    #[inline]
    pub fn to_word(self) -> u32 {
        ((self.coarse.get() as u32) << 25) | self.fine.get()
    }

    #[inline]
    pub fn from_word(word: u32) -> Self {
        Self {
            coarse: U7::from_masked((word >> 25) as u8),
            fine: U25::from_masked(word),
        }
    }

    /// Fractional MIDI note number.
    pub fn semitones(self) -> f64 {
        self.coarse.get() as f64 + self.fine.get() as f64 / (1u32 << 25) as f64
    }
}

/// Per-note pitch bend, MIDI 2.0 only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePitchBend {
    pub note: U7,
    pub value: PitchBendValue,
    pub channel: U4,
    pub group: U4,
}

/// Polyphonic key pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePressure {
    pub note: U7,
    pub amount: ControllerValue,
    pub channel: U4,
    pub group: U4,
}

/// Per-note management, MIDI 2.0 only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteManagement {
    pub note: U7,
    /// Detach per-note controllers from previously received notes.
    pub detach: bool,
    /// Reset per-note controllers to their defaults.
    pub reset: bool,
    pub channel: U4,
    pub group: U4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cc {
    pub controller: Controller,
    pub value: ControllerValue,
    pub channel: U4,
    pub group: U4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bank {
    pub msb: U7,
    pub lsb: U7,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramChange {
    pub program: U7,
    /// MIDI 1.0 sends this as Bank Select CC 0 / CC 32 ahead of the program change.
    pub bank: Option<Bank>,
    pub channel: U4,
    pub group: U4,
}

/// Channel pressure (aftertouch).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pressure {
    pub amount: ControllerValue,
    pub channel: U4,
    pub group: U4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchBend {
    pub value: PitchBendValue,
    pub channel: U4,
    pub group: U4,
}

/// Registered (RPN) or assignable (NRPN) controller.
///
/// MIDI 1.0 sends this as the CC sequence parameter MSB, parameter LSB, Data
/// Entry MSB, Data Entry LSB, with the value downscaled to 14 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterNumber {
    pub bank: U7,
    pub index: U7,
    pub value: u32,
    pub channel: U4,
    pub group: U4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_attribute_raw() {
        let attr = NoteAttribute::Pitch7_9 {
            coarse: U7::new(60).unwrap(),
            fine: U9::new(256).unwrap(),
        };
        assert_eq!(attr.to_raw(), (0x03, (60 << 9) | 256));
        assert_eq!(NoteAttribute::from_raw(0x03, (60 << 9) | 256), attr);
        assert_eq!(NoteAttribute::from_raw(0x00, 0), NoteAttribute::None);
        assert_eq!(
            NoteAttribute::from_raw(0x42, 7),
            NoteAttribute::Undefined(UndefinedAttribute::new(0x42, 7).unwrap())
        );
    }

    #[test]
    fn test_undefined_attribute_cannot_alias_defined_types() {
        for kind in 0x00..=0x03 {
            assert!(UndefinedAttribute::new(kind, 1).is_err());
            assert!(serde_json::from_str::<UndefinedAttribute>(&format!("[{kind},1]")).is_err());
        }
        let attr = UndefinedAttribute::new(0x04, 9).unwrap();
        let round = NoteAttribute::Undefined(attr).to_raw();
        assert_eq!(NoteAttribute::from_raw(round.0, round.1), NoteAttribute::Undefined(attr));
        assert_eq!(serde_json::to_string(&attr).unwrap(), "[4,9]");
    }

    #[test]
    fn test_pitch_7_25() {
        let pitch = Pitch7_25 {
            coarse: U7::new(69).unwrap(),
            fine: U25::new(1 << 24).unwrap(),
        };
        assert_eq!(Pitch7_25::from_word(pitch.to_word()), pitch);
        assert_eq!(pitch.semitones(), 69.5);
    }
}
