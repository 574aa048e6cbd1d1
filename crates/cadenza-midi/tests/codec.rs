//! Integration tests for the MIDI 1.0 and UMP codecs.

use cadenza_midi::{
    Bank, Controller, ControllerValue, Event, ManufacturerId, NoteAttribute, NoteController,
    NoteVelocity, ParseError, PitchBendValue, Protocol, UniversalType, U14, U4, U7, U9,
};
use midi_msg::{Channel, ChannelVoiceMsg, ControlChange, MidiMsg, SystemCommonMsg, SystemRealTimeMsg};

fn u4(v: u8) -> U4 {
    U4::new(v).unwrap()
}

fn u7(v: u8) -> U7 {
    U7::new(v).unwrap()
}

/// Every variant MIDI 1.0 can carry as a single message.
fn midi1_events(group: U4) -> Vec<Event> {
    let ch = u4(9);
    vec![
        Event::note_on(u7(60), NoteVelocity::Midi1(u7(100)), ch, group),
        Event::note_off(u7(60), NoteVelocity::Midi1(u7(0)), ch, group),
        Event::note_pressure(u7(61), ControllerValue::Midi1(u7(33)), ch, group),
        Event::cc(Controller::VOLUME, ControllerValue::Midi1(u7(127)), ch, group),
        Event::program_change(u7(12), None, ch, group),
        Event::program_change(u7(13), Some(Bank { msb: u7(1), lsb: u7(0x7F) }), ch, group),
        Event::rpn(u7(0), u7(2), U14::new(0x1234).unwrap().to_midi2(), ch, group),
        Event::nrpn(u7(0x10), u7(0x7F), U14::MAX.to_midi2(), ch, group),
        Event::pressure(ControllerValue::Midi1(u7(5)), ch, group),
        Event::pitch_bend(PitchBendValue::Midi1(U14::new(0x1FFF).unwrap()), ch, group),
        Event::sysex7(ManufacturerId::one_byte(0x41).unwrap(), vec![0x10, 0x42, 0x12], group).unwrap(),
        Event::sysex7(ManufacturerId::three_byte(0x20, 0x29).unwrap(), vec![], group).unwrap(),
        Event::universal_sysex7(UniversalType::RealTime, u7(0x7F), u7(0x04), u7(0x01), vec![0x00, 0x40], group)
            .unwrap(),
        Event::timecode_quarter_frame(u7(0x35), group),
        Event::song_position_pointer(U14::new(1000).unwrap(), group),
        Event::song_select(u7(3), group),
        Event::tune_request(group),
        Event::timing_clock(group),
        Event::start(group),
        Event::continue_(group),
        Event::stop(group),
        Event::active_sensing(group),
        Event::system_reset(group),
    ]
}

/// Variants only UMP can carry, plus MIDI 2.0 resolution channel voice.
fn midi2_events() -> Vec<Event> {
    let ch = u4(3);
    let group = u4(5);
    let note = u7(64);
    vec![
        Event::NoteOn(cadenza_midi::Note {
            note,
            velocity: NoteVelocity::Midi2(0x1234),
            attribute: NoteAttribute::Pitch7_9 {
                coarse: u7(64),
                fine: U9::new(100).unwrap(),
            },
            channel: ch,
            group,
        }),
        Event::note_off(note, NoteVelocity::Midi2(0xFFFF), ch, group),
        Event::note_cc(note, NoteController::PITCH_7_25, 0x8000_0001, ch, group),
        Event::note_cc(note, NoteController::Assignable(200), 42, ch, group),
        Event::note_pitch_bend(note, PitchBendValue::Midi2(0x7FFF_FFFF), ch, group),
        Event::note_pressure(note, ControllerValue::Midi2(0xDEAD_BEEF), ch, group),
        Event::note_management(note, true, true, ch, group),
        Event::cc(Controller::PAN, ControllerValue::Midi2(0x4000_0000), ch, group),
        Event::program_change(u7(1), Some(Bank { msb: u7(0x10), lsb: u7(0x20) }), ch, group),
        Event::pressure(ControllerValue::Midi2(1), ch, group),
        Event::pitch_bend(PitchBendValue::NEUTRAL, ch, group),
        Event::rpn(u7(0), u7(1), 0x1234_5678, ch, group),
        Event::nrpn(u7(10), u7(20), u32::MAX, ch, group),
        Event::sysex8(ManufacturerId::one_byte(0x43).unwrap(), vec![0xFF; 30], 7, group),
        Event::sysex8(ManufacturerId::three_byte(0x21, 0x09).unwrap(), vec![], 0, group),
        Event::universal_sysex8(UniversalType::NonRealTime, u7(1), u7(2), u7(3), vec![0x80], 9, group),
        Event::no_op(group),
        Event::jr_clock(0xFFFF, group),
        Event::jr_timestamp(0, group),
    ]
}

// ---------------------------------------------------------------------------
// 1. Round-trip identity
// ---------------------------------------------------------------------------

#[test]
fn test_midi1_roundtrip_every_variant() {
    for event in midi1_events(U4::MIN) {
        let bytes = event.try_midi1_raw_bytes().unwrap();
        assert_eq!(Event::from_midi1_bytes(&bytes), Ok(event.clone()), "{bytes:02X?}");
    }
}

#[test]
fn test_ump_roundtrip_every_variant() {
    for event in midi1_events(u4(2)) {
        for protocol in [Protocol::Midi1, Protocol::Midi2] {
            let words = event.try_ump_raw_words(protocol).unwrap();
            assert_eq!(
                Event::from_ump_words(&words),
                Ok(event.clone()),
                "{protocol:?} {words:08X?}"
            );
        }
    }

    for event in midi2_events() {
        let words = event.try_ump_raw_words(Protocol::Midi2).unwrap();
        assert_eq!(Event::from_ump_words(&words), Ok(event.clone()), "{words:08X?}");
    }
}

#[test]
fn test_midi2_only_rejected_by_midi1_protocol() {
    for event in midi2_events().into_iter().filter(Event::is_midi2_only) {
        if event.channel().is_none() {
            // SysEx8 and utility messages are UMP-native under either protocol.
            assert!(event.try_ump_raw_words(Protocol::Midi1).is_ok(), "{event}");
            continue;
        }
        assert!(
            matches!(event.try_ump_raw_words(Protocol::Midi1), Err(ParseError::Unsupported(_))),
            "{event}"
        );
        assert!(event.midi1_raw_bytes().is_empty());
    }
}

#[test]
fn test_midi1_values_survive_midi2_upscaling() {
    for v in 0..=127 {
        let event = Event::cc(Controller::MOD_WHEEL, ControllerValue::Midi1(u7(v)), U4::MIN, U4::MIN);
        let words = event.ump_raw_words(Protocol::Midi2);
        let decoded = Event::from_ump_words(&words).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.midi1_raw_bytes(), event.midi1_raw_bytes());
    }
}

#[test]
fn test_multi_message_encodings_decode_as_one() {
    let event = Event::program_change(u7(1), Some(Bank { msb: u7(2), lsb: u7(3) }), U4::MIN, U4::MIN);
    let bytes = event.midi1_raw_bytes();
    assert_eq!(bytes.len(), 8);
    assert_eq!(Event::from_midi1_bytes(&bytes), Ok(event.clone()));

    let words = event.ump_raw_words(Protocol::Midi1);
    assert_eq!(words.len(), 3);
    assert_eq!(Event::from_ump_words(&words), Ok(event));

    // Two unrelated controllers are still two messages.
    let volume = Event::cc(Controller::VOLUME, ControllerValue::Midi1(u7(1)), U4::MIN, U4::MIN);
    let mut words = volume.ump_raw_words(Protocol::Midi1);
    words.extend(volume.ump_raw_words(Protocol::Midi1));
    assert!(matches!(Event::from_ump_words(&words), Err(ParseError::Malformed(_))));
}

/// Every registered one-byte ID survives both SysEx encodings unchanged.
#[test]
fn test_manufacturer_ids_round_trip() {
    for id in 0x01..=0x7D {
        let manufacturer = ManufacturerId::one_byte(id).unwrap();
        let sysex7 = Event::sysex7(manufacturer, vec![1, 2, 3], U4::MIN).unwrap();
        assert_eq!(Event::from_midi1_bytes(&sysex7.midi1_raw_bytes()), Ok(sysex7.clone()));
        assert_eq!(Event::from_ump_words(&sysex7.ump_raw_words(Protocol::Midi2)), Ok(sysex7));

        let sysex8 = Event::sysex8(manufacturer, vec![0xFF], 1, U4::MIN);
        assert_eq!(Event::from_ump_words(&sysex8.ump_raw_words(Protocol::Midi2)), Ok(sysex8));
    }
    assert!(ManufacturerId::one_byte(0x7E).is_err());
    assert!(ManufacturerId::one_byte(0x80).is_err());
    assert!(ManufacturerId::three_byte(0x7F, 0x7F).is_ok());
    assert!(ManufacturerId::three_byte(0xFF, 0x01).is_err());
}

// ---------------------------------------------------------------------------
// 2. Cross-check against midi-msg
// ---------------------------------------------------------------------------

#[test]
fn test_channel_voice_bytes_match_midi_msg() {
    let cases = [
        (
            Event::note_on(u7(60), NoteVelocity::Midi1(u7(100)), U4::MIN, U4::MIN),
            ChannelVoiceMsg::NoteOn { note: 60, velocity: 100 },
        ),
        (
            Event::note_off(u7(61), NoteVelocity::Midi1(u7(10)), U4::MIN, U4::MIN),
            ChannelVoiceMsg::NoteOff { note: 61, velocity: 10 },
        ),
        (
            Event::note_pressure(u7(62), ControllerValue::Midi1(u7(20)), U4::MIN, U4::MIN),
            ChannelVoiceMsg::PolyPressure { note: 62, pressure: 20 },
        ),
        (
            Event::cc(Controller::from(u7(74)), ControllerValue::Midi1(u7(90)), U4::MIN, U4::MIN),
            ChannelVoiceMsg::ControlChange {
                control: ControlChange::CC { control: 74, value: 90 },
            },
        ),
        (
            Event::program_change(u7(42), None, U4::MIN, U4::MIN),
            ChannelVoiceMsg::ProgramChange { program: 42 },
        ),
        (
            Event::pressure(ControllerValue::Midi1(u7(77)), U4::MIN, U4::MIN),
            ChannelVoiceMsg::ChannelPressure { pressure: 77 },
        ),
        (
            Event::pitch_bend(PitchBendValue::Midi1(U14::new(12345).unwrap()), U4::MIN, U4::MIN),
            ChannelVoiceMsg::PitchBend { bend: 12345 },
        ),
    ];

    for (event, msg) in cases {
        let expected = MidiMsg::ChannelVoice {
            channel: Channel::Ch1,
            msg,
        }
        .to_midi();
        assert_eq!(event.midi1_raw_bytes(), expected, "{event}");
    }
}

#[test]
fn test_system_bytes_match_midi_msg() {
    let cases = [
        (
            Event::song_position_pointer(U14::new(4321).unwrap(), U4::MIN),
            MidiMsg::SystemCommon {
                msg: SystemCommonMsg::SongPosition(4321),
            },
        ),
        (
            Event::song_select(u7(9), U4::MIN),
            MidiMsg::SystemCommon {
                msg: SystemCommonMsg::SongSelect(9),
            },
        ),
        (
            Event::tune_request(U4::MIN),
            MidiMsg::SystemCommon {
                msg: SystemCommonMsg::TuneRequest,
            },
        ),
        (
            Event::timing_clock(U4::MIN),
            MidiMsg::SystemRealTime {
                msg: SystemRealTimeMsg::TimingClock,
            },
        ),
        (
            Event::stop(U4::MIN),
            MidiMsg::SystemRealTime {
                msg: SystemRealTimeMsg::Stop,
            },
        ),
        (
            Event::system_reset(U4::MIN),
            MidiMsg::SystemRealTime {
                msg: SystemRealTimeMsg::SystemReset,
            },
        ),
    ];

    for (event, msg) in cases {
        assert_eq!(event.midi1_raw_bytes(), msg.to_midi(), "{event}");
    }
}

// ---------------------------------------------------------------------------
// 3. UMP wire layout
// ---------------------------------------------------------------------------

#[test]
fn test_midi2_cc_words() {
    let event = Event::cc(Controller::VOLUME, ControllerValue::Midi1(u7(100)), u4(1), u4(2));
    // 100 in 7 bits is 3381864012 in 32 bits.
    assert_eq!(event.ump_raw_words(Protocol::Midi2), vec![0x42B1_0700, 3_381_864_012]);
    assert_eq!(event.ump_raw_words(Protocol::Midi1), vec![0x22B1_0764]);
}

#[test]
fn test_rpn_under_midi1_protocol() {
    let event = Event::rpn(u7(0), u7(2), U14::new(0x2000).unwrap().to_midi2(), U4::MIN, U4::MIN);
    assert_eq!(
        event.ump_raw_words(Protocol::Midi1),
        vec![0x20B0_6500, 0x20B0_6402, 0x20B0_0640, 0x20B0_2600]
    );
}

#[test]
fn test_sysex7_packet_boundaries() {
    // Payload of exactly 6 bytes fits one complete packet.
    let event = Event::sysex7(ManufacturerId::one_byte(0x7D).unwrap(), vec![1, 2, 3, 4, 5], U4::MIN).unwrap();
    assert_eq!(event.ump_raw_words(Protocol::Midi2), vec![0x3006_7D01, 0x0203_0405]);

    // Seven bytes need a start and an end packet.
    let event = Event::sysex7(ManufacturerId::one_byte(0x7D).unwrap(), vec![1, 2, 3, 4, 5, 6], U4::MIN).unwrap();
    assert_eq!(
        event.ump_raw_words(Protocol::Midi2),
        vec![0x3016_7D01, 0x0203_0405, 0x3031_0600, 0x0000_0000]
    );

    // Three packets: start, continue, end.
    let event = Event::sysex7(ManufacturerId::one_byte(0x7D).unwrap(), vec![0; 12], U4::MIN).unwrap();
    let words = event.ump_raw_words(Protocol::Midi2);
    let statuses: Vec<u32> = words.iter().step_by(2).map(|w| (w >> 20) & 0xF).collect();
    assert_eq!(statuses, vec![1, 2, 3]);
}

// ---------------------------------------------------------------------------
// 4. Descriptions
// ---------------------------------------------------------------------------

#[test]
fn test_descriptions() {
    let lines: Vec<String> = [
        Event::note_on(u7(69), NoteVelocity::Midi2(0xFFFF), u4(0), u4(1)),
        Event::cc(Controller::SUSTAIN, ControllerValue::Midi1(u7(127)), u4(2), U4::MIN),
        Event::program_change(u7(5), Some(Bank { msb: u7(1), lsb: u7(2) }), u4(0), U4::MIN),
        Event::sysex7(ManufacturerId::one_byte(0x41).unwrap(), vec![1, 2, 3], U4::MIN).unwrap(),
        Event::song_position_pointer(U14::new(96).unwrap(), U4::MIN),
        Event::jr_timestamp(31250, u4(3)),
    ]
    .iter()
    .map(Event::description)
    .collect();

    insta::assert_snapshot!(lines.join("\n"), @r###"
    Note On A4 vel=0xFFFF ch=0 grp=1
    CC 64 Sustain value=127 ch=2 grp=0
    Program Change 5 bank=1:2 ch=0 grp=0
    SysEx7 Roland len=3 grp=0
    Song Position 96 grp=0
    JR Timestamp 31250 grp=3
    "###);
}

/// Events are stored in binary session files; the encoding must be lossless.
#[test]
fn test_events_survive_bincode() {
    let mut events = midi1_events(u4(5));
    events.extend(midi2_events());
    let encoded = bincode::serialize(&events).unwrap();
    let decoded: Vec<Event> = bincode::deserialize(&encoded).unwrap();
    assert_eq!(decoded, events);
}
