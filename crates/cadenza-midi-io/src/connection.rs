//! Logical input connections.
//!
//! An [`InputConnection`] owns the parser state for one physical or virtual
//! source. Whatever thread receives data from the platform calls
//! [`feed`](InputConnection::feed) or [`feed_words`](InputConnection::feed_words);
//! the connection parses, applies its filter chain and hands each surviving
//! event to its receiver.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use cadenza_midi::{Event, EventFilter, EventIteratorExt, ParserConfig, StreamParser, UmpParser};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::event::Timestamped;
use crate::output::{OutputEncoder, Transport};
use crate::receiver::EventReceiver;
use crate::shared::Shared;

#[derive(Debug)]
enum ConnectionParser {
    Bytes(StreamParser),
    Words(UmpParser),
}

impl ConnectionParser {
    fn new(transport: Transport, config: ParserConfig) -> Self {
        match transport {
            Transport::Bytes => ConnectionParser::Bytes(StreamParser::new(config)),
            Transport::Ump(_) => ConnectionParser::Words(UmpParser::new(config)),
        }
    }

    fn reset(&mut self) {
        match self {
            ConnectionParser::Bytes(parser) => parser.reset(),
            ConnectionParser::Words(parser) => parser.reset(),
        }
    }
}

type ReceiverSlot = Box<dyn EventReceiver>;

pub struct InputConnection {
    name: String,
    transport: Transport,
    parser: Mutex<ConnectionParser>,
    filters: Shared<Vec<EventFilter>>,
    receiver: ArcSwapOption<ReceiverSlot>,
    closed: AtomicBool,
}

impl InputConnection {
    pub fn builder() -> InputConnectionBuilder {
        InputConnectionBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Parses a buffer from a MIDI 1.0 byte source.
    ///
    /// Every event parsed from `bytes` carries `timestamp`. Returns the
    /// events that passed the filter chain, after they were delivered to the
    /// receiver. Malformed input and receiver failures are logged and never
    /// fail the call; a receiver whose channel is gone is detached.
    pub fn feed(&self, timestamp: u64, bytes: &[u8]) -> Result<Vec<Timestamped>> {
        self.ensure_open()?;
        let events = match &mut *self.parser.lock() {
            ConnectionParser::Bytes(parser) => parser.feed(bytes),
            ConnectionParser::Words(_) => return Err(self.mismatch()),
        };
        self.dispatch(timestamp, events)
    }

    /// Parses a buffer of UMP words. Partial packets are kept for the next call.
    pub fn feed_words(&self, timestamp: u64, words: &[u32]) -> Result<Vec<Timestamped>> {
        self.ensure_open()?;
        let events = match &mut *self.parser.lock() {
            ConnectionParser::Words(parser) => parser.feed(words),
            ConnectionParser::Bytes(_) => return Err(self.mismatch()),
        };
        self.dispatch(timestamp, events)
    }

    fn dispatch(&self, timestamp: u64, events: Vec<Event>) -> Result<Vec<Timestamped>> {
        let delivered: Vec<Timestamped> = {
            let filters = self.filters.read();
            events
                .into_iter()
                .filter_events(&filters)
                .map(|event| Timestamped::new(timestamp, event))
                .collect()
        };

        if let Some(receiver) = self.receiver.load_full() {
            let mut disconnected = false;
            for event in &delivered {
                match receiver.receive(event) {
                    Ok(()) => {}
                    Err(Error::ReceiverDisconnected) => disconnected = true,
                    Err(err) => warn!(name = %self.name, %err, %event, "event receiver failed"),
                }
            }
            if disconnected {
                self.detach(&receiver);
            }
        }
        Ok(delivered)
    }

    /// Drops `receiver` unless it was already replaced.
    fn detach(&self, receiver: &Arc<ReceiverSlot>) {
        let current = self.receiver.load_full();
        if current.is_some_and(|current| Arc::ptr_eq(&current, receiver)) {
            self.receiver.store(None);
            warn!(name = %self.name, "event receiver disconnected, detaching");
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(Error::ConnectionClosed(self.name.clone()))
        } else {
            Ok(())
        }
    }

    fn mismatch(&self) -> Error {
        Error::TransportMismatch {
            name: self.name.clone(),
            expected: self.transport.input_kind(),
        }
    }

    /// Replaces the receiver. Takes effect from the next `feed`.
    pub fn set_receiver(&self, receiver: impl EventReceiver + 'static) {
        self.receiver.store(Some(Arc::new(Box::new(receiver))));
    }

    pub fn clear_receiver(&self) {
        self.receiver.store(None);
    }

    pub fn has_receiver(&self) -> bool {
        self.receiver.load().is_some()
    }

    pub fn filters(&self) -> Vec<EventFilter> {
        self.filters.get()
    }

    pub fn set_filters(&self, filters: Vec<EventFilter>) {
        self.filters.set(filters);
    }

    /// Appends a filter to the end of the chain.
    pub fn add_filter(&self, filter: impl Into<EventFilter>) {
        let filter = filter.into();
        self.filters.update(|filters| filters.push(filter));
    }

    pub fn clear_filters(&self) {
        self.filters.update(Vec::clear);
    }

    /// Encoder for replies on this connection's transport.
    pub fn reply_encoder(&self) -> OutputEncoder {
        OutputEncoder::new(self.transport)
    }

    /// Drops parser state such as running status and partial SysEx.
    pub fn reset(&self) {
        self.parser.lock().reset();
        debug!(name = %self.name, "MIDI input connection reset");
    }

    /// Discards parser state and refuses further input.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.parser.lock().reset();
        self.receiver.store(None);
        debug!(name = %self.name, "MIDI input connection closed");
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for InputConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputConnection")
            .field("name", &self.name)
            .field("transport", &self.transport)
            .field("filters", &self.filters)
            .field("has_receiver", &self.has_receiver())
            .field("open", &self.is_open())
            .finish()
    }
}

#[derive(Default)]
pub struct InputConnectionBuilder {
    name: Option<String>,
    transport: Transport,
    parser_config: ParserConfig,
    filters: Vec<EventFilter>,
    receiver: Option<ReceiverSlot>,
}

impl InputConnectionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// Appends a filter; filters apply in the order they are added.
    pub fn filter(mut self, filter: impl Into<EventFilter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn receiver(mut self, receiver: impl EventReceiver + 'static) -> Self {
        self.receiver = Some(Box::new(receiver));
        self
    }

    pub fn build(self) -> InputConnection {
        let name = self.name.unwrap_or_else(|| "MIDI In".to_string());
        debug!(%name, transport = ?self.transport, "MIDI input connection opened");
        InputConnection {
            parser: Mutex::new(ConnectionParser::new(self.transport, self.parser_config)),
            name,
            transport: self.transport,
            filters: Shared::new(self.filters),
            receiver: ArcSwapOption::new(self.receiver.map(Arc::new)),
            closed: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_midi::{Protocol, TypeFilter, UtilityType, U4};

    #[test]
    fn test_feed_bytes() {
        let connection = InputConnection::builder()
            .name("keys")
            .transport(Transport::Bytes)
            .build();
        let events = connection.feed(42, &[0x90, 0x3C, 0x64, 0xF8]).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.timestamp == 42));
        assert!(events[0].event.is_note_on());
    }

    #[test]
    fn test_transport_mismatch() {
        let bytes = InputConnection::builder().transport(Transport::Bytes).build();
        assert!(matches!(
            bytes.feed_words(0, &[0x10F8_0000]),
            Err(Error::TransportMismatch { .. })
        ));

        let ump = InputConnection::builder()
            .transport(Transport::Ump(Protocol::Midi2))
            .build();
        assert!(matches!(ump.feed(0, &[0xF8]), Err(Error::TransportMismatch { .. })));
        assert_eq!(ump.feed_words(0, &[0x10F8_0000]).unwrap().len(), 1);
    }

    #[test]
    fn test_close() {
        let connection = InputConnection::builder()
            .transport(Transport::Bytes)
            .receiver(|_: &Timestamped| {})
            .build();
        connection.feed(0, &[0xF0, 0x41]).unwrap();
        connection.close();
        assert!(!connection.is_open());
        assert!(!connection.has_receiver());
        assert!(matches!(connection.feed(1, &[0xF7]), Err(Error::ConnectionClosed(_))));
    }

    #[test]
    fn test_filters_are_live() {
        let connection = InputConnection::builder()
            .transport(Transport::Ump(Protocol::Midi2))
            .build();
        let no_op = Event::no_op(U4::MIN).ump_raw_words(Protocol::Midi2);

        assert_eq!(connection.feed_words(0, &no_op).unwrap().len(), 1);
        connection.add_filter(TypeFilter::<UtilityType>::Drop);
        assert!(connection.feed_words(1, &no_op).unwrap().is_empty());
        connection.clear_filters();
        assert_eq!(connection.filters(), vec![]);
        assert_eq!(connection.feed_words(2, &no_op).unwrap().len(), 1);
    }

    #[test]
    fn test_reset_drops_running_status() {
        let connection = InputConnection::builder().transport(Transport::Bytes).build();
        assert_eq!(connection.feed(0, &[0x90, 0x3C, 0x64]).unwrap().len(), 1);
        connection.reset();
        assert!(connection.feed(1, &[0x3D, 0x64]).unwrap().is_empty());
    }
}
