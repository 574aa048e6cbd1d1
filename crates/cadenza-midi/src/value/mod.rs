//! MIDI value types.
//!
//! - [`U4`], [`U7`], [`U9`], [`U14`], [`U25`]: range-checked fixed-width integers
//! - [`MidiValue`]: unit interval, bipolar and cross-resolution conversions
//! - [`NoteVelocity`], [`ControllerValue`], [`PitchBendValue`]: values carried
//!   at MIDI 1.0 or MIDI 2.0 resolution

mod dual;
mod interval;
mod ints;
mod scale;

pub use dual::{ControllerValue, NoteVelocity, PitchBendValue};
pub use interval::{BipolarUnitInterval, UnitInterval};
pub use ints::{U14, U25, U4, U7, U9};
pub use scale::MidiValue;
