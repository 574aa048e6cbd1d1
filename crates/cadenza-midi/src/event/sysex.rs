//! System Exclusive payloads and ID resolution.
//!
//! MIDI 1.0 / SysEx7 IDs are one byte (`0x01..=0x7D`), three bytes
//! (`0x00 b1 b2`), or a universal type (`0x7E` non-real-time, `0x7F`
//! real-time). SysEx8 packs the same IDs into 16 bits: `0x00ii` for one-byte
//! IDs, `0x80|b1 b2` for three-byte IDs and `0x007E` / `0x007F` for universal
//! messages.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::{smallvec, SmallVec};

use crate::error::{ParseError, RangeError};
use crate::value::{U4, U7};

use super::Event;

/// Registered manufacturer names, keyed by their SysEx7 ID bytes.
static MANUFACTURERS: &[(&[u8], &str)] = &[
    (&[0x01], "Sequential Circuits"),
    (&[0x04], "Moog"),
    (&[0x06], "Lexicon"),
    (&[0x07], "Kurzweil"),
    (&[0x0F], "Ensoniq"),
    (&[0x10], "Oberheim"),
    (&[0x18], "E-mu"),
    (&[0x3E], "Waldorf"),
    (&[0x40], "Kawai"),
    (&[0x41], "Roland"),
    (&[0x42], "Korg"),
    (&[0x43], "Yamaha"),
    (&[0x44], "Casio"),
    (&[0x47], "Akai"),
    (&[0x4C], "Sony"),
    (&[0x52], "Zoom"),
    (&[0x00, 0x00, 0x0E], "Alesis"),
    (&[0x00, 0x00, 0x66], "Mackie"),
    (&[0x00, 0x01, 0x05], "M-Audio"),
    (&[0x00, 0x20, 0x29], "Focusrite/Novation"),
    (&[0x00, 0x20, 0x32], "Behringer"),
    (&[0x00, 0x20, 0x33], "Access Music"),
    (&[0x00, 0x20, 0x3C], "Elektron"),
    (&[0x00, 0x20, 0x6B], "Arturia"),
    (&[0x00, 0x21, 0x09], "Native Instruments"),
];

/// A registered manufacturer ID.
///
/// Only built through [`one_byte`](Self::one_byte),
/// [`three_byte`](Self::three_byte) or
/// [`from_sysex7_bytes`](Self::from_sysex7_bytes), so it never holds a
/// universal ID, a reserved ID or a byte above `0x7F`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ManufacturerId(Id);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Id {
    OneByte(u8),
    /// The two bytes following the leading `0x00`.
    ThreeByte(u8, u8),
}

impl ManufacturerId {
    pub fn one_byte(id: u8) -> Result<Self, ParseError> {
        match id {
            0x01..=0x7D => Ok(ManufacturerId(Id::OneByte(id))),
            _ => Err(ParseError::malformed(format!(
                "{id:#04X} is not a one-byte manufacturer ID"
            ))),
        }
    }

    /// `byte2` and `byte3` are the bytes after the leading `0x00`.
    pub fn three_byte(byte2: u8, byte3: u8) -> Result<Self, ParseError> {
        if byte2 > 0x7F || byte3 > 0x7F || (byte2 == 0 && byte3 == 0) {
            return Err(ParseError::malformed(format!(
                "00 {byte2:02X} {byte3:02X} is not a three-byte manufacturer ID"
            )));
        }
        Ok(ManufacturerId(Id::ThreeByte(byte2, byte3)))
    }

    /// Parses the one- or three-byte SysEx7 form.
    pub fn from_sysex7_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        match *bytes {
            [id] => Self::one_byte(id),
            [0x00, b2, b3] => Self::three_byte(b2, b3),
            _ => Err(ParseError::malformed(format!(
                "{bytes:02X?} is not a manufacturer ID"
            ))),
        }
    }

    #[inline]
    pub fn is_three_byte(self) -> bool {
        matches!(self.0, Id::ThreeByte(..))
    }

    pub fn sysex7_bytes(self) -> SmallVec<[u8; 3]> {
        match self.0 {
            Id::OneByte(id) => smallvec![id],
            Id::ThreeByte(b2, b3) => smallvec![0x00, b2, b3],
        }
    }

    pub fn sysex8_bytes(self) -> [u8; 2] {
        match self.0 {
            Id::OneByte(id) => [0x00, id],
            Id::ThreeByte(b2, b3) => [0x80 | b2, b3],
        }
    }

    pub fn name(self) -> Option<&'static str> {
        let bytes = self.sysex7_bytes();
        MANUFACTURERS
            .iter()
            .find(|(id, _)| *id == bytes.as_slice())
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        match self.0 {
            Id::OneByte(id) => write!(f, "{id:02X}"),
            Id::ThreeByte(b2, b3) => write!(f, "00 {b2:02X} {b3:02X}"),
        }
    }
}

/// Serialized as its SysEx7 bytes; deserializing validates them.
impl Serialize for ManufacturerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.sysex7_bytes().as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ManufacturerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Self::from_sysex7_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversalType {
    NonRealTime,
    RealTime,
}

impl UniversalType {
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            UniversalType::NonRealTime => 0x7E,
            UniversalType::RealTime => 0x7F,
        }
    }

    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x7E => Some(UniversalType::NonRealTime),
            0x7F => Some(UniversalType::RealTime),
            _ => None,
        }
    }
}

/// The identifier that follows `F0` (SysEx7) or leads a SysEx8 payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SysExId {
    Manufacturer(ManufacturerId),
    Universal(UniversalType),
}

impl SysExId {
    /// Resolves a one- or three-byte SysEx7 ID.
    pub fn from_sysex7_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        match *bytes {
            [] => Err(ParseError::Empty),
            [byte] => match UniversalType::from_byte(byte) {
                Some(kind) => Ok(SysExId::Universal(kind)),
                None => ManufacturerId::one_byte(byte).map(SysExId::Manufacturer),
            },
            [0x00, _, _] => ManufacturerId::from_sysex7_bytes(bytes).map(SysExId::Manufacturer),
            _ => Err(ParseError::malformed(format!(
                "{bytes:02X?} is not a SysEx7 ID"
            ))),
        }
    }

    /// Resolves a two-byte SysEx8 ID.
    pub fn from_sysex8_bytes(bytes: [u8; 2]) -> Result<Self, ParseError> {
        match bytes {
            [0x00, byte] => match UniversalType::from_byte(byte) {
                Some(kind) => Ok(SysExId::Universal(kind)),
                None => ManufacturerId::one_byte(byte).map(SysExId::Manufacturer),
            },
            [hi, lo] if hi & 0x80 != 0 => {
                ManufacturerId::three_byte(hi & 0x7F, lo).map(SysExId::Manufacturer)
            }
            _ => Err(ParseError::malformed(format!(
                "{:02X} {:02X} is not a SysEx8 ID",
                bytes[0], bytes[1]
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysEx7 {
    pub manufacturer: ManufacturerId,
    /// 7-bit data bytes, without the ID, `F0` or `F7`.
    pub data: Vec<u8>,
    pub group: U4,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversalSysEx7 {
    pub universal_type: UniversalType,
    pub device_id: U7,
    pub sub_id1: U7,
    pub sub_id2: U7,
    pub data: Vec<u8>,
    pub group: U4,
}

/// 8-bit System Exclusive, UMP only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysEx8 {
    pub manufacturer: ManufacturerId,
    pub data: Vec<u8>,
    pub stream_id: u8,
    pub group: U4,
}

/// 8-bit universal System Exclusive, UMP only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversalSysEx8 {
    pub universal_type: UniversalType,
    pub device_id: U7,
    pub sub_id1: U7,
    pub sub_id2: U7,
    pub data: Vec<u8>,
    pub stream_id: u8,
    pub group: U4,
}

impl SysEx7 {
    /// ID and data, as carried between `F0` and `F7` or in SysEx7 packets.
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(3 + self.data.len());
        payload.extend_from_slice(&self.manufacturer.sysex7_bytes());
        payload.extend_from_slice(&self.data);
        payload
    }
}

impl UniversalSysEx7 {
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(4 + self.data.len());
        payload.extend_from_slice(&[
            self.universal_type.byte(),
            self.device_id.get(),
            self.sub_id1.get(),
            self.sub_id2.get(),
        ]);
        payload.extend_from_slice(&self.data);
        payload
    }
}

impl SysEx8 {
    /// ID and data, as carried in SysEx8 packets after the stream ID.
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(2 + self.data.len());
        payload.extend_from_slice(&self.manufacturer.sysex8_bytes());
        payload.extend_from_slice(&self.data);
        payload
    }
}

impl UniversalSysEx8 {
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(5 + self.data.len());
        payload.extend_from_slice(&[
            0x00,
            self.universal_type.byte(),
            self.device_id.get(),
            self.sub_id1.get(),
            self.sub_id2.get(),
        ]);
        payload.extend_from_slice(&self.data);
        payload
    }
}

pub(crate) fn check_7bit(data: &[u8]) -> Result<(), RangeError> {
    match data.iter().find(|b| **b > 0x7F) {
        Some(b) => Err(RangeError::integer(*b, 7)),
        None => Ok(()),
    }
}

fn universal_header(bytes: &[u8]) -> Result<(U7, U7, U7), ParseError> {
    match *bytes {
        [device, sub1, sub2] => Ok((
            U7::new(device).map_err(|_| ParseError::malformed("device ID exceeds 7 bits"))?,
            U7::new(sub1).map_err(|_| ParseError::malformed("sub-ID #1 exceeds 7 bits"))?,
            U7::new(sub2).map_err(|_| ParseError::malformed("sub-ID #2 exceeds 7 bits"))?,
        )),
        _ => Err(ParseError::malformed("truncated universal SysEx header")),
    }
}

/// Builds a SysEx7 event from the bytes between `F0` and `F7`.
pub(crate) fn sysex7_from_payload(payload: &[u8], group: U4) -> Result<Event, ParseError> {
    let first = *payload.first().ok_or_else(|| ParseError::malformed("SysEx without ID"))?;
    let id_len = if first == 0x00 { 3 } else { 1 };
    if payload.len() < id_len {
        return Err(ParseError::malformed("truncated SysEx manufacturer ID"));
    }
    check_7bit(payload).map_err(|_| ParseError::malformed("SysEx7 byte exceeds 7 bits"))?;

    match SysExId::from_sysex7_bytes(&payload[..id_len])? {
        SysExId::Manufacturer(manufacturer) => Ok(Event::SysEx7(SysEx7 {
            manufacturer,
            data: payload[id_len..].to_vec(),
            group,
        })),
        SysExId::Universal(universal_type) => {
            let header = payload.get(1..4).unwrap_or(&[]);
            let (device_id, sub_id1, sub_id2) = universal_header(header)?;
            Ok(Event::UniversalSysEx7(UniversalSysEx7 {
                universal_type,
                device_id,
                sub_id1,
                sub_id2,
                data: payload[4..].to_vec(),
                group,
            }))
        }
    }
}

/// Builds a SysEx8 event from a reassembled SysEx8 payload.
pub(crate) fn sysex8_from_payload(
    payload: &[u8],
    stream_id: u8,
    group: U4,
) -> Result<Event, ParseError> {
    let id = match *payload {
        [hi, lo, ..] => SysExId::from_sysex8_bytes([hi, lo])?,
        _ => return Err(ParseError::malformed("truncated SysEx8 ID")),
    };
    match id {
        SysExId::Manufacturer(manufacturer) => Ok(Event::SysEx8(SysEx8 {
            manufacturer,
            data: payload[2..].to_vec(),
            stream_id,
            group,
        })),
        SysExId::Universal(universal_type) => {
            let header = payload.get(2..5).unwrap_or(&[]);
            let (device_id, sub_id1, sub_id2) = universal_header(header)?;
            Ok(Event::UniversalSysEx8(UniversalSysEx8 {
                universal_type,
                device_id,
                sub_id1,
                sub_id2,
                data: payload[5..].to_vec(),
                stream_id,
                group,
            }))
        }
    }
}
