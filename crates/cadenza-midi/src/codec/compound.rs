//! Control Change runs that MIDI 1.0 uses to carry a single event.
//!
//! RPN and NRPN go out as CC 101/100 (99/98 for NRPN) followed by data entry
//! CC 6 and CC 38. A program change with a bank goes out as CC 0, CC 32 and
//! then the program change itself.

use smallvec::SmallVec;

use crate::event::{Bank, Controller, Event};
use crate::value::{ControllerValue, U14, U4, U7};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Compound {
    BankedProgram,
    Rpn,
    Nrpn,
}

impl Compound {
    fn starting_with(controller: Controller) -> Option<Self> {
        match controller {
            Controller::BANK_SELECT => Some(Compound::BankedProgram),
            Controller::RPN_MSB => Some(Compound::Rpn),
            Controller::NRPN_MSB => Some(Compound::Nrpn),
            _ => None,
        }
    }

    fn controllers(self) -> &'static [Controller] {
        match self {
            Compound::BankedProgram => &[Controller::BANK_SELECT, Controller::BANK_SELECT_LSB],
            Compound::Rpn => &[
                Controller::RPN_MSB,
                Controller::RPN_LSB,
                Controller::DATA_ENTRY,
                Controller::DATA_ENTRY_LSB,
            ],
            Compound::Nrpn => &[
                Controller::NRPN_MSB,
                Controller::NRPN_LSB,
                Controller::DATA_ENTRY,
                Controller::DATA_ENTRY_LSB,
            ],
        }
    }
}

/// A Control Change at MIDI 1.0 resolution.
#[derive(Clone, Copy, Debug)]
struct Midi1Cc {
    controller: Controller,
    value: U7,
    channel: U4,
    group: U4,
}

impl Midi1Cc {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Cc(e) => match e.value {
                ControllerValue::Midi1(value) => Some(Midi1Cc {
                    controller: e.controller,
                    value,
                    channel: e.channel,
                    group: e.group,
                }),
                _ => None,
            },
            _ => None,
        }
    }

    fn into_event(self) -> Event {
        Event::cc(
            self.controller,
            ControllerValue::Midi1(self.value),
            self.channel,
            self.group,
        )
    }
}

/// Folds CC runs back into [`Event::Rpn`], [`Event::Nrpn`] and banked
/// [`Event::ProgramChange`].
///
/// Only MIDI 1.0 resolution CCs on one channel and group are combined. Any
/// event that does not continue the run releases the held CCs unchanged, in
/// their original order, ahead of it.
#[derive(Clone, Debug, Default)]
pub(crate) struct CompoundAssembler {
    pending: Option<(Compound, SmallVec<[Midi1Cc; 4]>)>,
}

impl CompoundAssembler {
    pub(crate) fn push<F>(&mut self, event: Event, emit: &mut F)
    where
        F: FnMut(Event),
    {
        if let Some(event) = self.continue_with(event, emit) {
            self.flush(emit);
            self.start_or_emit(event, emit);
        }
    }

    /// Releases held CCs as plain Control Change events.
    pub(crate) fn flush<F>(&mut self, emit: &mut F)
    where
        F: FnMut(Event),
    {
        if let Some((_, held)) = self.pending.take() {
            for cc in held {
                emit(cc.into_event());
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.pending = None;
    }

    pub(crate) fn is_holding(&self) -> bool {
        self.pending.is_some()
    }

    fn start_or_emit<F>(&mut self, event: Event, emit: &mut F)
    where
        F: FnMut(Event),
    {
        let started = Midi1Cc::from_event(&event)
            .and_then(|cc| Compound::starting_with(cc.controller).map(|kind| (kind, cc)));
        match started {
            Some((kind, cc)) => {
                let mut held = SmallVec::new();
                held.push(cc);
                self.pending = Some((kind, held));
            }
            None => emit(event),
        }
    }

    /// Returns `event` when it does not continue the held run.
    fn continue_with<F>(&mut self, event: Event, emit: &mut F) -> Option<Event>
    where
        F: FnMut(Event),
    {
        let Some((kind, held)) = &mut self.pending else {
            return Some(event);
        };
        let first = held[0];
        if event.channel() != Some(first.channel) || event.group() != first.group {
            return Some(event);
        }

        let controllers = kind.controllers();
        if held.len() < controllers.len() {
            match Midi1Cc::from_event(&event) {
                Some(cc) if cc.controller == controllers[held.len()] => held.push(cc),
                _ => return Some(event),
            }
            if held.len() == controllers.len() && *kind != Compound::BankedProgram {
                let value = U14::from_msb_lsb(held[2].value, held[3].value).to_midi2();
                let (bank, index) = (held[0].value, held[1].value);
                let done = match kind {
                    Compound::Rpn => Event::rpn(bank, index, value, first.channel, first.group),
                    _ => Event::nrpn(bank, index, value, first.channel, first.group),
                };
                self.pending = None;
                emit(done);
            }
            return None;
        }

        // A complete bank select waits for its program change.
        match event {
            Event::ProgramChange(pc) if pc.bank.is_none() => {
                let bank = Bank {
                    msb: held[0].value,
                    lsb: held[1].value,
                };
                self.pending = None;
                emit(Event::program_change(pc.program, Some(bank), pc.channel, pc.group));
                None
            }
            other => Some(other),
        }
    }
}
