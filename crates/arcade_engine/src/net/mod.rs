//! Cross-thread hand-off for remotely produced events
//!
//! A network client (or any other producer thread) holds a [`RemoteSender`];
//! the engine owns the [`RemoteInbox`] and drains it once per frame at the
//! start of the input phase, emitting each event on the bus. Entity state is
//! never touched from another thread.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use thiserror::Error;

/// Remote hand-off errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteError {
    /// The engine side of the channel has been dropped
    #[error("Remote inbox closed")]
    Disconnected,
}

/// Producer handle, cloneable and sendable to other threads
#[derive(Debug)]
pub struct RemoteSender<E> {
    tx: Sender<E>,
}

impl<E> Clone for RemoteSender<E> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<E> RemoteSender<E> {
    /// Queue an event for the next frame
    pub fn send(&self, event: E) -> Result<(), RemoteError> {
        self.tx.send(event).map_err(|_| RemoteError::Disconnected)
    }
}

/// Engine-side end of the hand-off queue
#[derive(Debug)]
pub struct RemoteInbox<E> {
    rx: Receiver<E>,
    tx: Sender<E>,
    max_per_frame: usize,
}

impl<E> Default for RemoteInbox<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RemoteInbox<E> {
    /// Events drained per frame before the rest waits for the next one
    pub const DEFAULT_MAX_PER_FRAME: usize = 256;

    /// Create an empty inbox
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            tx,
            max_per_frame: Self::DEFAULT_MAX_PER_FRAME,
        }
    }

    /// Cap the number of events drained per frame
    pub fn with_max_per_frame(mut self, max: usize) -> Self {
        self.max_per_frame = max.max(1);
        self
    }

    /// New producer handle
    pub fn sender(&self) -> RemoteSender<E> {
        RemoteSender { tx: self.tx.clone() }
    }

    /// Take queued events in arrival order, up to the per-frame cap
    pub fn drain(&self) -> Vec<E> {
        let mut events = Vec::new();
        while events.len() < self.max_per_frame {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_events_cross_threads_in_order() {
        let inbox = RemoteInbox::<u32>::new();
        let sender = inbox.sender();
        let producer = thread::spawn(move || {
            for i in 0..5 {
                sender.send(i).unwrap();
            }
        });
        producer.join().unwrap();
        assert_eq!(inbox.drain(), vec![0, 1, 2, 3, 4]);
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn test_drain_respects_cap() {
        let inbox = RemoteInbox::<u32>::new().with_max_per_frame(2);
        let sender = inbox.sender();
        for i in 0..3 {
            sender.send(i).unwrap();
        }
        assert_eq!(inbox.drain(), vec![0, 1]);
        assert_eq!(inbox.drain(), vec![2]);
    }

    #[test]
    fn test_send_after_inbox_dropped() {
        let inbox = RemoteInbox::<u32>::new();
        let sender = inbox.sender();
        drop(inbox);
        assert_eq!(sender.send(1), Err(RemoteError::Disconnected));
    }
}
