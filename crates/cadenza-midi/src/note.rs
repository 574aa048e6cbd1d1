//! Note number helpers.
//!
//! Names use scientific pitch notation with sharps. Middle C (MIDI 60) is
//! `C4`, concert A (440 Hz, MIDI 69) is `A4`.

use crate::value::U7;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub const MIDDLE_C: U7 = U7::from_masked(60);
pub const CONCERT_A: U7 = U7::from_masked(69);

/// Returns -1 to 9.
pub const fn octave(note: U7) -> i8 {
    (note.get() / 12) as i8 - 1
}

/// 0-11, where 0 = C.
pub const fn pitch_class(note: U7) -> u8 {
    note.get() % 12
}

pub fn note_name(note: U7) -> String {
    format!(
        "{}{}",
        PITCH_CLASSES[pitch_class(note) as usize],
        octave(note)
    )
}

/// Frequency in Hz (A4 = 440 Hz, equal temperament).
pub fn frequency(note: U7) -> f64 {
    440.0 * 2f64.powf((note.get() as f64 - 69.0) / 12.0)
}

/// Returns `None` if the result would leave 0-127.
pub fn transpose(note: U7, semitones: i8) -> Option<U7> {
    let shifted = note.get() as i16 + semitones as i16;
    u8::try_from(shifted).ok().and_then(|n| U7::new(n).ok())
}
