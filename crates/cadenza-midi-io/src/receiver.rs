//! Destinations for events delivered by an input connection.

use crossbeam_channel::{Sender, TrySendError};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::Timestamped;

/// Receives filtered events from an [`InputConnection`](crate::InputConnection).
///
/// Called on whichever thread feeds the connection, once per event in
/// stream order. Implementations must not block for long.
pub trait EventReceiver: Send + Sync {
    fn receive(&self, event: &Timestamped) -> Result<()>;
}

impl<F> EventReceiver for F
where
    F: Fn(&Timestamped) + Send + Sync,
{
    fn receive(&self, event: &Timestamped) -> Result<()> {
        self(event);
        Ok(())
    }
}

/// Forwards into a channel. A full bounded channel drops the event with a
/// log line; a dropped receiving end is an error.
impl EventReceiver for Sender<Timestamped> {
    fn receive(&self, event: &Timestamped) -> Result<()> {
        match self.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                debug!(event = %dropped, "event channel full, dropping");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::ReceiverDisconnected),
        }
    }
}

/// Logs each event at debug level under the connection's name.
#[derive(Debug, Clone)]
pub struct LoggingReceiver {
    label: String,
}

impl LoggingReceiver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EventReceiver for LoggingReceiver {
    fn receive(&self, event: &Timestamped) -> Result<()> {
        debug!(
            label = %self.label,
            timestamp = event.timestamp,
            event = %event.event,
            "MIDI in"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_midi::{Event, U4};
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn stamped() -> Timestamped {
        Timestamped::new(5, Event::timing_clock(U4::MIN))
    }

    #[test]
    fn test_closure_receiver() {
        let count = AtomicUsize::new(0);
        let receiver = |_: &Timestamped| {
            count.fetch_add(1, Ordering::Relaxed);
        };
        receiver.receive(&stamped()).unwrap();
        receiver.receive(&stamped()).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_channel_receiver() {
        let (tx, rx) = unbounded();
        tx.receive(&stamped()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), stamped());

        drop(rx);
        assert!(matches!(tx.receive(&stamped()), Err(Error::ReceiverDisconnected)));
    }

    #[test]
    fn test_full_channel_drops() {
        let (tx, rx) = bounded(1);
        tx.receive(&stamped()).unwrap();
        tx.receive(&stamped()).unwrap();
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_logging_receiver() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
        LoggingReceiver::new("keys").receive(&stamped()).unwrap();
    }
}
