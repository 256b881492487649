//! Panel transport abstraction.
//!
//! The engine hands outbound messages to a transport and moves on: sends
//! never block on the panel and failed sends are not retried.

use crate::error::{EngineError, EngineResult};
use crate::protocol::PanelMessage;
use tokio::sync::mpsc;

/// Delivers messages to the observing panel.
pub trait PanelTransport: Send + Sync {
    /// Queues a message for the panel.
    fn send(&self, message: PanelMessage) -> EngineResult<()>;
}

/// Transport over an unbounded tokio channel.
///
/// The receiving half is typically drained by a task that forwards messages
/// to the panel's webview or, for the host binary, to stdout.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<PanelMessage>,
}

impl ChannelTransport {
    /// Creates a transport and the receiver the panel side drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PanelMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PanelTransport for ChannelTransport {
    fn send(&self, message: PanelMessage) -> EngineResult<()> {
        self.tx.send(message).map_err(|_| EngineError::TransportClosed)
    }
}

/// A recording transport for testing.
pub mod mock {
    use super::*;
    use crate::protocol::Snapshot;
    use std::sync::Mutex;

    /// Keeps every message it is given.
    #[derive(Debug, Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<PanelMessage>>,
        closed: Mutex<bool>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent sends fail as if the panel went away.
        pub fn close(&self) {
            *self.closed.lock().unwrap_or_else(|e| e.into_inner()) = true;
        }

        /// All messages sent so far.
        pub fn sent(&self) -> Vec<PanelMessage> {
            self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// Payloads of the `metadata` messages sent so far.
        pub fn metadata(&self) -> Vec<Option<Snapshot>> {
            self.sent()
                .into_iter()
                .filter_map(|m| match m {
                    PanelMessage::Metadata(snapshot) => Some(snapshot),
                    _ => None,
                })
                .collect()
        }

        /// The most recent `metadata` payload.
        pub fn last_metadata(&self) -> Option<Option<Snapshot>> {
            self.metadata().pop()
        }

        pub fn clear(&self) {
            self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
        }
    }

    impl PanelTransport for RecordingTransport {
        fn send(&self, message: PanelMessage) -> EngineResult<()> {
            if *self.closed.lock().unwrap_or_else(|e| e.into_inner()) {
                return Err(EngineError::TransportClosed);
            }
            self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(message);
            Ok(())
        }
    }
}
