//! Parser configuration.

use serde::{Deserialize, Serialize};

use crate::value::U4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// UMP group stamped onto events parsed from MIDI 1.0 bytes.
    pub group: U4,
    /// Report Note On with zero velocity as Note Off.
    pub note_on_zero_velocity_as_note_off: bool,
    /// Longest SysEx payload accepted, in bytes. `None` is unbounded.
    pub max_sysex_len: Option<usize>,
    /// Fold the Control Change runs of RPN, NRPN and bank select plus program
    /// change into single events. Held CCs are released when the run breaks
    /// or on `flush`.
    pub combine_cc_sequences: bool,
}

impl ParserConfig {
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    pub fn group(mut self, group: U4) -> Self {
        self.config.group = group;
        self
    }

    pub fn note_off_on_zero_velocity(mut self) -> Self {
        self.config.note_on_zero_velocity_as_note_off = true;
        self
    }

    pub fn combine_cc_sequences(mut self) -> Self {
        self.config.combine_cc_sequences = true;
        self
    }

    pub fn max_sysex_len(mut self, len: usize) -> Self {
        self.config.max_sysex_len = Some(len);
        self
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}
