//! MIDI 1.0 byte stream parser.

use smallvec::SmallVec;

use crate::codec::{
    data_len, CompoundAssembler, decode_channel_voice, decode_real_time, decode_system_common, undefined_status,
    SYSEX_END, SYSEX_START,
};
use crate::error::ParseError;
use crate::event::{sysex7_from_payload, Event};

use super::{deliver, ParserConfig};

#[derive(Debug, Default)]
enum SysExState {
    #[default]
    Idle,
    Accumulating(Vec<u8>),
    /// Over `max_sysex_len`; bytes are dropped until the next status byte.
    Overflowed,
}

/// Turns a MIDI 1.0 byte stream into [`Event`]s.
///
/// Handles running status, system real-time bytes interleaved anywhere
/// (including inside SysEx and between data bytes), and SysEx split across
/// any number of `feed` calls.
///
/// # Example
/// ```
/// use cadenza_midi::{Event, StreamParser};
///
/// let mut parser = StreamParser::default();
/// let events = parser.feed(&[0x90, 0x3C, 0x64, 0x3D, 0x65]);
/// assert_eq!(events.len(), 2);
/// assert!(events.iter().all(Event::is_note_on));
/// ```
#[derive(Debug, Default)]
pub struct StreamParser {
    config: ParserConfig,
    running_status: Option<u8>,
    /// Status of the message whose data bytes are being collected.
    pending: Option<u8>,
    data: SmallVec<[u8; 2]>,
    sysex: SysExState,
    stray_reported: bool,
    compound: CompoundAssembler,
}

impl StreamParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `bytes`, returning complete events. Errors are logged and
    /// skipped; use [`feed_with`](Self::feed_with) to observe them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();
        self.feed_with(bytes, |result| {
            if let Ok(event) = result {
                events.push(event);
            }
        });
        events
    }

    /// Parses `bytes`, passing each event or recovered error to `on_result`
    /// in stream order.
    pub fn feed_with<F>(&mut self, bytes: &[u8], mut on_result: F)
    where
        F: FnMut(Result<Event, ParseError>),
    {
        let config = self.config;
        let mut compound = std::mem::take(&mut self.compound);
        for &byte in bytes {
            self.process(byte, &mut |result| {
                deliver(result, &config, &mut compound, &mut on_result)
            });
        }
        self.compound = compound;
    }

    /// Releases Control Change events held while waiting for the rest of an
    /// RPN, NRPN or bank select run. Always empty unless
    /// [`ParserConfig::combine_cc_sequences`] is set.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.compound.flush(&mut |event| events.push(event));
        events
    }

    /// Drops running status, partial messages and any SysEx in progress.
    pub fn reset(&mut self) {
        self.running_status = None;
        self.pending = None;
        self.data.clear();
        self.sysex = SysExState::Idle;
        self.stray_reported = false;
        self.compound.reset();
    }

    pub fn is_accumulating_sysex(&self) -> bool {
        !matches!(self.sysex, SysExState::Idle)
    }

    /// The channel voice status byte reused for status-less data bytes.
    pub fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    fn process<F>(&mut self, byte: u8, emit: &mut F)
    where
        F: FnMut(Result<Event, ParseError>),
    {
        let group = self.config.group;

        // Real-time bytes never disturb the surrounding message.
        if byte >= 0xF8 {
            emit(decode_real_time(byte, group));
            return;
        }

        match &mut self.sysex {
            SysExState::Idle => {}
            SysExState::Accumulating(buffer) => {
                if byte < 0x80 {
                    buffer.push(byte);
                    if self
                        .config
                        .max_sysex_len
                        .is_some_and(|max| buffer.len() > max)
                    {
                        self.sysex = SysExState::Overflowed;
                        emit(Err(ParseError::malformed(
                            "system exclusive exceeds maximum length",
                        )));
                    }
                    return;
                }
                let payload = std::mem::take(buffer);
                self.sysex = SysExState::Idle;
                if byte == SYSEX_END {
                    emit(sysex7_from_payload(&payload, group));
                    return;
                }
                emit(Err(ParseError::malformed("unterminated system exclusive")));
            }
            SysExState::Overflowed => {
                if byte < 0x80 {
                    return;
                }
                self.sysex = SysExState::Idle;
                if byte == SYSEX_END {
                    return;
                }
            }
        }

        if byte < 0x80 {
            self.data_byte(byte, emit);
        } else {
            self.status_byte(byte, emit);
        }
    }

    fn data_byte<F>(&mut self, byte: u8, emit: &mut F)
    where
        F: FnMut(Result<Event, ParseError>),
    {
        let Some(status) = self.pending.or(self.running_status) else {
            if !self.stray_reported {
                self.stray_reported = true;
                emit(Err(ParseError::malformed(format!(
                    "data byte {byte:#04X} without status"
                ))));
            }
            return;
        };

        self.pending = Some(status);
        self.data.push(byte);
        if self.data.len() < data_len(status).unwrap_or(0) {
            return;
        }

        let data1 = self.data.first().copied().unwrap_or(0);
        let data2 = self.data.get(1).copied().unwrap_or(0);
        self.data.clear();
        self.pending = None;

        let group = self.config.group;
        let result = match status {
            0x80..=0xEF => Ok(decode_channel_voice(status, data1, data2, group)),
            _ => decode_system_common(status, data1, data2, group),
        };
        emit(result);
    }

    fn status_byte<F>(&mut self, byte: u8, emit: &mut F)
    where
        F: FnMut(Result<Event, ParseError>),
    {
        self.stray_reported = false;
        if let Some(status) = self.pending.take() {
            self.data.clear();
            emit(Err(ParseError::malformed(format!(
                "message {status:#04X} interrupted by {byte:#04X}"
            ))));
        }

        match byte {
            0x80..=0xEF => {
                self.running_status = Some(byte);
                self.pending = Some(byte);
            }
            SYSEX_START => self.sysex = SysExState::Accumulating(Vec::new()),
            SYSEX_END => emit(Err(ParseError::malformed(
                "end of exclusive without start",
            ))),
            0xF6 => {
                self.running_status = None;
                emit(decode_system_common(byte, 0, 0, self.config.group));
            }
            0xF1..=0xF3 => {
                self.running_status = None;
                self.pending = Some(byte);
            }
            _ => {
                self.running_status = None;
                emit(Err(undefined_status(byte)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ManufacturerId;
    use crate::value::{NoteVelocity, U4, U7};

    fn u7(v: u8) -> U7 {
        U7::new(v).unwrap()
    }

    fn note_on(note: u8, velocity: u8) -> Event {
        Event::note_on(u7(note), NoteVelocity::Midi1(u7(velocity)), U4::MIN, U4::MIN)
    }

    fn collect(parser: &mut StreamParser, bytes: &[u8]) -> Vec<Result<Event, ParseError>> {
        let mut results = Vec::new();
        parser.feed_with(bytes, |r| results.push(r));
        results
    }

    #[test]
    fn test_running_status() {
        let mut parser = StreamParser::default();
        let events = parser.feed(&[0x90, 0x3C, 0x64, 0x3D, 0x65]);
        assert_eq!(events, vec![note_on(0x3C, 0x64), note_on(0x3D, 0x65)]);
        assert_eq!(parser.running_status(), Some(0x90));
    }

    #[test]
    fn test_realtime_inside_sysex() {
        let mut parser = StreamParser::default();
        let events = parser.feed(&[0xF0, 0x01, 0xF8, 0x02, 0xF7]);
        assert_eq!(
            events,
            vec![
                Event::timing_clock(U4::MIN),
                Event::sysex7(ManufacturerId::one_byte(0x01).unwrap(), vec![0x02], U4::MIN).unwrap(),
            ]
        );
    }

    #[test]
    fn test_realtime_between_data_bytes() {
        let mut parser = StreamParser::default();
        let events = parser.feed(&[0x90, 0x3C, 0xFE, 0x64]);
        assert_eq!(events, vec![Event::active_sensing(U4::MIN), note_on(0x3C, 0x64)]);
    }

    #[test]
    fn test_unterminated_sysex_resyncs() {
        let mut parser = StreamParser::default();
        assert!(parser.feed(&[0xF0, 0x01, 0x02]).is_empty());
        assert!(parser.is_accumulating_sysex());

        let results = collect(&mut parser, &[0x90, 0x3C, 0x64, 0xF7]);
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(ParseError::Malformed(_))));
        assert_eq!(results[1], Ok(note_on(0x3C, 0x64)));
        assert!(matches!(results[2], Err(ParseError::Malformed(_))));
        assert!(!parser.is_accumulating_sysex());
    }

    #[test]
    fn test_stray_data_reported_once() {
        let mut parser = StreamParser::default();
        let results = collect(&mut parser, &[0x3C, 0x64, 0x10, 0xF8]);
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(ParseError::Malformed(_))));
        assert_eq!(results[1], Ok(Event::timing_clock(U4::MIN)));
    }

    #[test]
    fn test_system_common_clears_running_status() {
        let mut parser = StreamParser::default();
        let results = collect(&mut parser, &[0x90, 0x3C, 0x64, 0xF3, 0x05, 0x3D]);
        assert_eq!(results[0], Ok(note_on(0x3C, 0x64)));
        assert_eq!(results[1], Ok(Event::song_select(u7(5), U4::MIN)));
        assert!(matches!(results[2], Err(ParseError::Malformed(_))));
        assert_eq!(parser.running_status(), None);
    }

    #[test]
    fn test_interrupted_message() {
        let mut parser = StreamParser::default();
        let results = collect(&mut parser, &[0x90, 0x3C, 0x80, 0x3C, 0x00]);
        assert!(matches!(results[0], Err(ParseError::Malformed(_))));
        assert_eq!(
            results[1],
            Ok(Event::note_off(u7(0x3C), NoteVelocity::Midi1(u7(0)), U4::MIN, U4::MIN))
        );
    }

    #[test]
    fn test_undefined_status_bytes() {
        let mut parser = StreamParser::default();
        let results = collect(&mut parser, &[0x90, 0xF9, 0x3C, 0x64, 0xF4, 0x3C]);
        assert!(matches!(results[0], Err(ParseError::Unsupported(_))));
        assert_eq!(results[1], Ok(note_on(0x3C, 0x64)));
        assert!(matches!(results[2], Err(ParseError::Unsupported(_))));
        assert!(matches!(results[3], Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_zero_velocity_as_note_off() {
        let config = ParserConfig::builder().note_off_on_zero_velocity().build();
        let mut parser = StreamParser::new(config);
        let events = parser.feed(&[0x91, 0x3C, 0x00]);
        assert_eq!(
            events,
            vec![Event::note_off(u7(0x3C), NoteVelocity::Midi1(u7(0)), U4::new(1).unwrap(), U4::MIN)]
        );

        let mut parser = StreamParser::default();
        assert!(matches!(parser.feed(&[0x91, 0x3C, 0x00])[0], Event::NoteOn(_)));
    }

    #[test]
    fn test_sysex_overflow() {
        let config = ParserConfig::builder().max_sysex_len(3).build();
        let mut parser = StreamParser::new(config);
        let results = collect(&mut parser, &[0xF0, 0x41, 0x01, 0x02, 0x03, 0x04, 0xF7, 0xF8]);
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(ParseError::Malformed(_))));
        assert_eq!(results[1], Ok(Event::timing_clock(U4::MIN)));
        assert!(!parser.is_accumulating_sysex());
    }

    #[test]
    fn test_reset() {
        let mut parser = StreamParser::default();
        parser.feed(&[0x90, 0x3C, 0x64, 0xF0, 0x41]);
        parser.reset();
        assert_eq!(parser.running_status(), None);
        assert!(!parser.is_accumulating_sysex());
        assert!(parser.feed(&[0x3C, 0x64]).is_empty());
    }
}
