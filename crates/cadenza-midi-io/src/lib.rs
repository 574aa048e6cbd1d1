//! MIDI connection plumbing for Cadenza.
//!
//! Sits between a platform MIDI layer and the codec in `cadenza-midi`:
//! input connections that parse, filter and deliver events, and an output
//! encoder that produces the bytes or words to transmit. No OS bindings live
//! here; the platform layer calls [`InputConnection::feed`] from its input
//! callback and sends whatever [`OutputEncoder::encode`] returns.
//!
//! # Example
//!
//! ```
//! use cadenza_midi_io::{InputConnection, Transport};
//! use cadenza_midi::{TypeFilter, SystemRealTimeType};
//!
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let keys = InputConnection::builder()
//!     .name("Keys")
//!     .transport(Transport::Bytes)
//!     .filter(TypeFilter::DropType(SystemRealTimeType::ActiveSensing))
//!     .receiver(tx)
//!     .build();
//!
//! keys.feed(1_000, &[0xFE, 0x90, 0x3C, 0x64])?;
//! let received = rx.try_recv().unwrap();
//! assert_eq!(received.timestamp, 1_000);
//! assert!(received.event.is_note_on());
//! # Ok::<(), cadenza_midi_io::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

mod event;
pub use event::Timestamped;

mod shared;
pub use shared::Shared;

mod receiver;
pub use receiver::{EventReceiver, LoggingReceiver};

mod output;
pub use output::{OutboundPacket, OutputEncoder, Transport};

mod connection;
pub use connection::{InputConnection, InputConnectionBuilder};
