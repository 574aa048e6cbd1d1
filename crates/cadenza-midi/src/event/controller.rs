//! Control Change controller numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::U7;

/// A MIDI 1.0 / MIDI 2.0 controller number (0-127).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Controller(pub U7);

impl Controller {
    pub const BANK_SELECT: Self = Self::from_number(0);
    pub const MOD_WHEEL: Self = Self::from_number(1);
    pub const BREATH: Self = Self::from_number(2);
    pub const FOOT: Self = Self::from_number(4);
    pub const PORTAMENTO_TIME: Self = Self::from_number(5);
    pub const DATA_ENTRY: Self = Self::from_number(6);
    pub const VOLUME: Self = Self::from_number(7);
    pub const BALANCE: Self = Self::from_number(8);
    pub const PAN: Self = Self::from_number(10);
    pub const EXPRESSION: Self = Self::from_number(11);
    pub const BANK_SELECT_LSB: Self = Self::from_number(32);
    pub const DATA_ENTRY_LSB: Self = Self::from_number(38);
    pub const SUSTAIN: Self = Self::from_number(64);
    pub const PORTAMENTO: Self = Self::from_number(65);
    pub const SOSTENUTO: Self = Self::from_number(66);
    pub const SOFT_PEDAL: Self = Self::from_number(67);
    pub const LEGATO: Self = Self::from_number(68);
    pub const HOLD_2: Self = Self::from_number(69);
    pub const DATA_INCREMENT: Self = Self::from_number(96);
    pub const DATA_DECREMENT: Self = Self::from_number(97);
    pub const NRPN_LSB: Self = Self::from_number(98);
    pub const NRPN_MSB: Self = Self::from_number(99);
    pub const RPN_LSB: Self = Self::from_number(100);
    pub const RPN_MSB: Self = Self::from_number(101);
    pub const ALL_SOUND_OFF: Self = Self::from_number(120);
    pub const RESET_ALL_CONTROLLERS: Self = Self::from_number(121);
    pub const LOCAL_CONTROL: Self = Self::from_number(122);
    pub const ALL_NOTES_OFF: Self = Self::from_number(123);
    pub const OMNI_OFF: Self = Self::from_number(124);
    pub const OMNI_ON: Self = Self::from_number(125);
    pub const MONO_ON: Self = Self::from_number(126);
    pub const POLY_ON: Self = Self::from_number(127);

    const fn from_number(number: u8) -> Self {
        Self(U7::from_masked(number))
    }

    #[inline]
    pub fn number(self) -> U7 {
        self.0
    }

    /// Controllers 120-127 are Channel Mode messages.
    #[inline]
    pub fn is_channel_mode(self) -> bool {
        self.0.get() >= 120
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self.0.get() {
            0 => "Bank Select",
            1 => "Mod Wheel",
            2 => "Breath",
            4 => "Foot",
            5 => "Portamento Time",
            6 => "Data Entry",
            7 => "Volume",
            8 => "Balance",
            10 => "Pan",
            11 => "Expression",
            32 => "Bank Select LSB",
            38 => "Data Entry LSB",
            64 => "Sustain",
            65 => "Portamento",
            66 => "Sostenuto",
            67 => "Soft Pedal",
            68 => "Legato",
            69 => "Hold 2",
            96 => "Data Increment",
            97 => "Data Decrement",
            98 => "NRPN LSB",
            99 => "NRPN MSB",
            100 => "RPN LSB",
            101 => "RPN MSB",
            120 => "All Sound Off",
            121 => "Reset All Controllers",
            122 => "Local Control",
            123 => "All Notes Off",
            124 => "Omni Off",
            125 => "Omni On",
            126 => "Mono On",
            127 => "Poly On",
            _ => return None,
        };
        Some(name)
    }
}

impl From<U7> for Controller {
    fn from(number: U7) -> Self {
        Self(number)
    }
}

impl fmt::Display for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} {}", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}
