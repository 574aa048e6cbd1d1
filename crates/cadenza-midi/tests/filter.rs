//! Integration tests for event filters.

use cadenza_midi::{
    filter_events, matches_all, ChanVoiceType, Controller, ControllerValue, Event,
    EventCategory, EventFilter, EventIteratorExt, ManufacturerId, NoteController, NoteVelocity,
    SetFilter, SysExType, SystemRealTimeType, TypeFilter, UtilityType, U4, U7,
};

fn u4(v: u8) -> U4 {
    U4::new(v).unwrap()
}

fn u7(v: u8) -> U7 {
    U7::new(v).unwrap()
}

/// One or more events from every category, on assorted channels and groups.
fn corpus() -> Vec<Event> {
    let mut events = Vec::new();
    for group in [0, 3] {
        let g = u4(group);
        events.extend([
            Event::no_op(g),
            Event::jr_clock(1000, g),
            Event::jr_timestamp(2000, g),
            Event::note_on(u7(60), NoteVelocity::Midi1(u7(100)), u4(0), g),
            Event::note_off(u7(60), NoteVelocity::Midi1(u7(0)), u4(0), g),
            Event::note_on(u7(72), NoteVelocity::Midi2(0x8000), u4(9), g),
            Event::cc(Controller::SUSTAIN, ControllerValue::Midi1(u7(127)), u4(1), g),
            Event::cc(Controller::VOLUME, ControllerValue::Midi1(u7(90)), u4(1), g),
            Event::note_cc(u7(72), NoteController::Assignable(7), 1, u4(9), g),
            Event::sysex7(ManufacturerId::one_byte(0x41).unwrap(), vec![1, 2], g).unwrap(),
            Event::sysex8(ManufacturerId::one_byte(0x41).unwrap(), vec![1, 2], 0, g),
            Event::song_select(u7(2), g),
            Event::timing_clock(g),
            Event::start(g),
        ]);
    }
    events
}

fn is_utility(event: &Event) -> bool {
    event.category() == EventCategory::Utility
}

// ---------------------------------------------------------------------------
// 1. Type filters
// ---------------------------------------------------------------------------

#[test]
fn test_utility_drop_removes_exactly_utility() {
    let events = corpus();
    let kept = EventFilter::Utility(TypeFilter::Drop).apply(&events);
    let expected: Vec<Event> = events.iter().filter(|e| !is_utility(e)).cloned().collect();
    assert_eq!(kept, expected);
}

#[test]
fn test_utility_keep_no_op() {
    let events = corpus();
    let kept = EventFilter::from(TypeFilter::KeepType(UtilityType::NoOp)).apply(&events);
    for event in &events {
        let expect_kept = !is_utility(event) || matches!(event, Event::NoOp { .. });
        assert_eq!(kept.contains(event), expect_kept, "{event}");
    }
}

#[test]
fn test_only_types_removes_other_categories() {
    let events = corpus();
    let filter = TypeFilter::only_types([ChanVoiceType::NoteOn, ChanVoiceType::NoteOff]);
    let kept = EventFilter::from(filter).apply(&events);
    assert_eq!(kept.len(), 6);
    assert!(kept.iter().all(|e| e.is_note_on() || e.is_note_off()));
}

#[test]
fn test_sysex_and_realtime_filters() {
    let events = corpus();
    let kept = EventFilter::from(TypeFilter::DropType(SysExType::SysEx8)).apply(&events);
    assert_eq!(kept.len(), events.len() - 2);
    assert!(!kept.iter().any(|e| matches!(e, Event::SysEx8(_))));

    let clocks = EventFilter::from(TypeFilter::OnlyType(SystemRealTimeType::TimingClock)).apply(&events);
    assert_eq!(clocks, vec![Event::timing_clock(u4(0)), Event::timing_clock(u4(3))]);
}

// ---------------------------------------------------------------------------
// 2. Set filters and chains
// ---------------------------------------------------------------------------

#[test]
fn test_channel_and_note_filters_pass_channelless_events() {
    let events = corpus();
    let kept = EventFilter::Channel(SetFilter::keep([u4(0)])).apply(&events);
    assert!(kept.iter().all(|e| e.channel().is_none_or(|c| c == u4(0))));
    assert!(kept.contains(&Event::start(u4(3))));

    let only = EventFilter::Channel(SetFilter::only([u4(0)])).apply(&events);
    assert!(only.iter().all(|e| e.channel() == Some(u4(0))));

    let notes = EventFilter::Note(SetFilter::drop([u7(72)])).apply(&events);
    assert!(notes.iter().all(|e| e.note() != Some(u7(72))));
}

#[test]
fn test_controller_filter() {
    let events = corpus();
    let filters = [
        EventFilter::from(TypeFilter::OnlyType(ChanVoiceType::Cc)),
        EventFilter::Controller(SetFilter::only([Controller::SUSTAIN])),
    ];
    let kept = filter_events(&events, &filters);
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|e| matches!(e, Event::Cc(cc) if cc.controller == Controller::SUSTAIN)));
}

#[test]
fn test_chain_is_intersection_in_order() {
    let events = corpus();
    let filters = [
        EventFilter::Group(SetFilter::only([u4(3)])),
        EventFilter::Utility(TypeFilter::Drop),
        EventFilter::SystemRealTime(TypeFilter::Drop),
    ];
    let kept = filter_events(&events, &filters);
    let expected: Vec<Event> = events
        .iter()
        .filter(|e| filters.iter().all(|f| f.matches(e)))
        .cloned()
        .collect();
    assert_eq!(kept, expected);
    assert!(kept.iter().all(|e| e.group() == u4(3) && matches_all(e, &filters)));

    let streamed: Vec<Event> = events.into_iter().filter_events(&filters).collect();
    assert_eq!(streamed, kept);
}

#[test]
fn test_empty_chain_keeps_everything() {
    let events = corpus();
    assert_eq!(filter_events(&events, &[]), events);
}

// ---------------------------------------------------------------------------
// 3. Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_filter_chain_json() {
    let filters = vec![
        EventFilter::Utility(TypeFilter::KeepType(UtilityType::NoOp)),
        EventFilter::Channel(SetFilter::only([u4(1)])),
    ];
    let json = serde_json::to_string(&filters).unwrap();
    insta::assert_snapshot!(json, @r#"[{"Utility":{"KeepType":"NoOp"}},{"Channel":{"Only":[1]}}]"#);

    let back: Vec<EventFilter> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, filters);
}
