//! UMP word stream parser.

use smallvec::SmallVec;

use crate::codec::{decode_packet, packet_word_count, CompoundAssembler, SysExAssembler};
use crate::error::ParseError;
use crate::event::Event;

use super::{deliver, ParserConfig};

/// Turns a stream of UMP words into [`Event`]s.
///
/// Partial packets are buffered across calls. Multi-packet SysEx7 is
/// reassembled per group and SysEx8 per group and stream ID. Packets of
/// unsupported message types are reported and skipped whole.
#[derive(Debug, Default)]
pub struct UmpParser {
    config: ParserConfig,
    packet: SmallVec<[u32; 4]>,
    assembler: SysExAssembler,
    compound: CompoundAssembler,
}

impl UmpParser {
    /// `config.group` is ignored; UMP carries its own groups.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn feed(&mut self, words: &[u32]) -> Vec<Event> {
        let mut events = Vec::new();
        self.feed_with(words, |result| {
            if let Ok(event) = result {
                events.push(event);
            }
        });
        events
    }

    pub fn feed_with<F>(&mut self, words: &[u32], mut on_result: F)
    where
        F: FnMut(Result<Event, ParseError>),
    {
        let config = self.config;
        let compound = &mut self.compound;
        for &word in words {
            self.packet.push(word);
            if self.packet.len() < packet_word_count(self.packet[0]) {
                continue;
            }

            let decoded = decode_packet(&self.packet);
            self.packet.clear();
            match decoded {
                Ok(packet) => self.assembler.push(packet, config.max_sysex_len, |result| {
                    deliver(result, &config, compound, &mut on_result)
                }),
                Err(err) => deliver(Err(err), &config, compound, &mut on_result),
            }
        }
    }

    /// Releases Control Change events held back by
    /// [`ParserConfig::combine_cc_sequences`].
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.compound.flush(&mut |event| events.push(event));
        events
    }

    pub fn reset(&mut self) {
        self.packet.clear();
        self.assembler.reset();
        self.compound.reset();
    }

    pub fn is_accumulating_sysex(&self) -> bool {
        self.assembler.is_accumulating()
    }

    /// Whether words of an incomplete packet are buffered.
    pub fn has_partial_packet(&self) -> bool {
        !self.packet.is_empty()
    }
}
