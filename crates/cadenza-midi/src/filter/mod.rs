//! Declarative event filters.
//!
//! A [`TypeFilter`] selects within one event category; a [`SetFilter`]
//! selects on a key such as channel or note number. [`EventFilter`] wraps
//! either so a chain of filters can be stored and applied in order.
//!
//! ```
//! use cadenza_midi::{filter_events, Event, EventFilter, TypeFilter, UtilityType, U4};
//!
//! let events = vec![
//!     Event::no_op(U4::MIN),
//!     Event::jr_clock(100, U4::MIN),
//!     Event::start(U4::MIN),
//! ];
//! let filters = [EventFilter::Utility(TypeFilter::KeepType(UtilityType::NoOp))];
//! let kept = filter_events(&events, &filters);
//! assert_eq!(kept, vec![Event::no_op(U4::MIN), Event::start(U4::MIN)]);
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::event::{
    ChanVoiceType, Controller, Event, EventKind, SysExType, SystemCommonType, SystemRealTimeType,
    UtilityType,
};
use crate::value::{U4, U7};

/// Selection within the category of `T`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFilter<T: EventKind> {
    /// Keep only events of this category.
    Only,
    /// Keep only events of this sub-type.
    OnlyType(T),
    OnlyTypes(HashSet<T>),
    /// Keep this sub-type and every event outside the category.
    KeepType(T),
    KeepTypes(HashSet<T>),
    /// Remove every event of this category.
    Drop,
    /// Remove events of this sub-type.
    DropType(T),
    DropTypes(HashSet<T>),
}

impl<T: EventKind> TypeFilter<T> {
    pub fn only_types(types: impl IntoIterator<Item = T>) -> Self {
        TypeFilter::OnlyTypes(types.into_iter().collect())
    }

    pub fn keep_types(types: impl IntoIterator<Item = T>) -> Self {
        TypeFilter::KeepTypes(types.into_iter().collect())
    }

    pub fn drop_types(types: impl IntoIterator<Item = T>) -> Self {
        TypeFilter::DropTypes(types.into_iter().collect())
    }

    pub fn matches(&self, event: &Event) -> bool {
        let kind = T::of(event);
        match self {
            TypeFilter::Only => kind.is_some(),
            TypeFilter::OnlyType(t) => kind == Some(*t),
            TypeFilter::OnlyTypes(set) => kind.is_some_and(|k| set.contains(&k)),
            TypeFilter::KeepType(t) => kind.is_none_or(|k| k == *t),
            TypeFilter::KeepTypes(set) => kind.is_none_or(|k| set.contains(&k)),
            TypeFilter::Drop => kind.is_none(),
            TypeFilter::DropType(t) => kind != Some(*t),
            TypeFilter::DropTypes(set) => kind.is_none_or(|k| !set.contains(&k)),
        }
    }
}

/// Selection on a key extracted from each event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetFilter<K: Eq + Hash> {
    /// Keep only events whose key is in the set. Events without the key are
    /// removed.
    Only(HashSet<K>),
    /// Keep events whose key is in the set and events without the key.
    Keep(HashSet<K>),
    /// Remove events whose key is in the set.
    Drop(HashSet<K>),
}

impl<K: Eq + Hash> SetFilter<K> {
    pub fn only(keys: impl IntoIterator<Item = K>) -> Self {
        SetFilter::Only(keys.into_iter().collect())
    }

    pub fn keep(keys: impl IntoIterator<Item = K>) -> Self {
        SetFilter::Keep(keys.into_iter().collect())
    }

    pub fn drop(keys: impl IntoIterator<Item = K>) -> Self {
        SetFilter::Drop(keys.into_iter().collect())
    }

    fn matches_key(&self, key: Option<K>) -> bool {
        match self {
            SetFilter::Only(set) => key.is_some_and(|k| set.contains(&k)),
            SetFilter::Keep(set) => key.is_none_or(|k| set.contains(&k)),
            SetFilter::Drop(set) => key.is_none_or(|k| !set.contains(&k)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFilter {
    ChanVoice(TypeFilter<ChanVoiceType>),
    SystemCommon(TypeFilter<SystemCommonType>),
    SystemRealTime(TypeFilter<SystemRealTimeType>),
    SysEx(TypeFilter<SysExType>),
    Utility(TypeFilter<UtilityType>),
    Channel(SetFilter<U4>),
    /// Keyed on the controller of [`Event::Cc`].
    Controller(SetFilter<Controller>),
    Note(SetFilter<U7>),
    Group(SetFilter<U4>),
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::ChanVoice(f) => f.matches(event),
            EventFilter::SystemCommon(f) => f.matches(event),
            EventFilter::SystemRealTime(f) => f.matches(event),
            EventFilter::SysEx(f) => f.matches(event),
            EventFilter::Utility(f) => f.matches(event),
            EventFilter::Channel(f) => f.matches_key(event.channel()),
            EventFilter::Controller(f) => f.matches_key(match event {
                Event::Cc(cc) => Some(cc.controller),
                _ => None,
            }),
            EventFilter::Note(f) => f.matches_key(event.note()),
            EventFilter::Group(f) => f.matches_key(Some(event.group())),
        }
    }

    /// Events that pass this filter, in their original order.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

macro_rules! impl_from_type_filter {
    ($($kind:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<TypeFilter<$kind>> for EventFilter {
                fn from(filter: TypeFilter<$kind>) -> Self {
                    EventFilter::$variant(filter)
                }
            }
        )*
    };
}

impl_from_type_filter!(
    ChanVoiceType => ChanVoice,
    SystemCommonType => SystemCommon,
    SystemRealTimeType => SystemRealTime,
    SysExType => SysEx,
    UtilityType => Utility,
);

/// Whether `event` passes every filter in `filters`.
pub fn matches_all(event: &Event, filters: &[EventFilter]) -> bool {
    filters.iter().all(|f| f.matches(event))
}

/// Applies `filters` left to right, keeping the original order.
pub fn filter_events(events: &[Event], filters: &[EventFilter]) -> Vec<Event> {
    events
        .iter()
        .filter(|e| matches_all(e, filters))
        .cloned()
        .collect()
}

/// Iterator adaptor returned by [`EventIteratorExt::filter_events`].
pub struct FilterEvents<'a, I> {
    inner: I,
    filters: &'a [EventFilter],
}

impl<I> Iterator for FilterEvents<'_, I>
where
    I: Iterator,
    I::Item: Borrow<Event>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filters = self.filters;
        self.inner
            .find(|e| matches_all(<I::Item as Borrow<Event>>::borrow(e), filters))
    }
}

pub trait EventIteratorExt: Iterator + Sized
where
    Self::Item: Borrow<Event>,
{
    fn filter_events(self, filters: &[EventFilter]) -> FilterEvents<'_, Self> {
        FilterEvents {
            inner: self,
            filters,
        }
    }
}

impl<I> EventIteratorExt for I
where
    I: Iterator,
    I::Item: Borrow<Event>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ControllerValue, NoteVelocity};

    fn u4(v: u8) -> U4 {
        U4::new(v).unwrap()
    }

    fn u7(v: u8) -> U7 {
        U7::new(v).unwrap()
    }

    fn mixed() -> Vec<Event> {
        vec![
            Event::no_op(U4::MIN),
            Event::note_on(u7(60), NoteVelocity::Midi1(u7(90)), u4(0), U4::MIN),
            Event::jr_clock(10, U4::MIN),
            Event::timing_clock(U4::MIN),
            Event::jr_timestamp(20, u4(1)),
            Event::cc(Controller::SUSTAIN, ControllerValue::Midi1(u7(127)), u4(2), U4::MIN),
            Event::no_op(u4(1)),
        ]
    }

    #[test]
    fn test_utility_drop() {
        let events = mixed();
        let kept = EventFilter::Utility(TypeFilter::Drop).apply(&events);
        assert_eq!(kept, vec![events[1].clone(), events[3].clone(), events[5].clone()]);
    }

    #[test]
    fn test_utility_keep_type() {
        let events = mixed();
        let kept = EventFilter::from(TypeFilter::KeepType(UtilityType::NoOp)).apply(&events);
        assert_eq!(
            kept,
            vec![
                events[0].clone(),
                events[1].clone(),
                events[3].clone(),
                events[5].clone(),
                events[6].clone(),
            ]
        );
    }

    #[test]
    fn test_only_and_only_types() {
        let events = mixed();
        assert_eq!(EventFilter::Utility(TypeFilter::Only).apply(&events).len(), 4);
        let filter = TypeFilter::only_types([UtilityType::JrClock, UtilityType::JrTimestamp]);
        assert_eq!(
            EventFilter::from(filter).apply(&events),
            vec![events[2].clone(), events[4].clone()]
        );
    }

    #[test]
    fn test_drop_types_keeps_other_categories() {
        let events = mixed();
        let filter = TypeFilter::<ChanVoiceType>::drop_types([ChanVoiceType::NoteOn]);
        let kept = EventFilter::from(filter).apply(&events);
        assert_eq!(kept.len(), events.len() - 1);
        assert!(!kept.iter().any(Event::is_note_on));
    }

    #[test]
    fn test_set_filters() {
        let events = mixed();
        let by_channel = EventFilter::Channel(SetFilter::only([u4(2)]));
        assert_eq!(by_channel.apply(&events), vec![events[5].clone()]);

        let by_group = EventFilter::Group(SetFilter::drop([u4(1)]));
        assert_eq!(by_group.apply(&events).len(), 5);

        let by_controller = EventFilter::Controller(SetFilter::keep([Controller::VOLUME]));
        assert_eq!(by_controller.apply(&events).len(), events.len() - 1);
    }

    #[test]
    fn test_chain_and_iterator() {
        let events = mixed();
        let filters = [
            EventFilter::Utility(TypeFilter::Drop),
            EventFilter::SystemRealTime(TypeFilter::Drop),
        ];
        let chained = filter_events(&events, &filters);
        assert_eq!(chained, vec![events[1].clone(), events[5].clone()]);

        let by_ref: Vec<&Event> = events.iter().filter_events(&filters).collect();
        assert_eq!(by_ref, vec![&events[1], &events[5]]);
    }

    #[test]
    fn test_filter_serde() {
        let filters = vec![
            EventFilter::Utility(TypeFilter::KeepType(UtilityType::NoOp)),
            EventFilter::Note(SetFilter::only([u7(60)])),
        ];
        let json = serde_json::to_string(&filters).unwrap();
        let back: Vec<EventFilter> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filters);
    }
}
