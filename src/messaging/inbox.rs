//! Bounded hand-off queue between the MQTT receive thread and the main loop.
//!
//! ```text
//!  mqtt-rx thread ──push()──▶ ┌──────────────┐ ──drain()──▶ main loop
//!                             │  Inbox (8)   │              (Dispatcher)
//!                             └──────────────┘
//! ```
//!
//! The transport only copies raw topic/payload bytes in; decoding and every
//! engine mutation happen on the loop thread, so the engine needs no lock.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::error::{CommandError, CommsError, Error};

/// Longest topic the inbox stores.
pub const MAX_TOPIC_LEN: usize = 64;
/// Longest payload the inbox stores.  Every valid command is far shorter.
pub const MAX_PAYLOAD_LEN: usize = 32;
/// Messages buffered between two loop iterations.
pub const INBOX_CAPACITY: usize = 8;

/// One raw message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: heapless::String<MAX_TOPIC_LEN>,
    pub payload: heapless::Vec<u8, MAX_PAYLOAD_LEN>,
}

impl InboundMessage {
    /// Copy `topic` and `payload` into fixed-capacity buffers.
    pub fn new(topic: &str, payload: &[u8]) -> Result<Self, CommandError> {
        let mut owned = heapless::String::new();
        owned
            .push_str(topic)
            .map_err(|_| CommandError::PayloadTooLong)?;
        let topic = owned;
        let payload =
            heapless::Vec::from_slice(payload).map_err(|_| CommandError::PayloadTooLong)?;
        Ok(Self { topic, payload })
    }
}

/// Multi-producer, single-consumer inbound queue.  Usable from a `static`.
pub struct Inbox {
    queue: Channel<CriticalSectionRawMutex, InboundMessage, INBOX_CAPACITY>,
    dropped: AtomicU32,
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue a message.  Never blocks: oversize messages and messages
    /// arriving while the queue is full are dropped and counted.
    pub fn push(&self, topic: &str, payload: &[u8]) -> Result<(), Error> {
        let msg = match InboundMessage::new(topic, payload) {
            Ok(m) => m,
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Inbox: dropping message on '{}': {}", topic, e);
                return Err(e.into());
            }
        };
        if self.queue.try_send(msg).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!("Inbox: full, dropping message on '{}'", topic);
            return Err(CommsError::InboxFull.into());
        }
        Ok(())
    }

    /// Take the oldest pending message, if any.
    pub fn pop(&self) -> Option<InboundMessage> {
        self.queue.try_receive().ok()
    }

    /// Hand every pending message to `handler` in arrival order.
    pub fn drain(&self, mut handler: impl FnMut(InboundMessage)) {
        while let Some(msg) = self.pop() {
            handler(msg);
        }
    }

    /// Messages refused since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}
