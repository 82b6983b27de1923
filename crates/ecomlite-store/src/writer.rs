//! # Write-Behind Slot
//!
//! Wraps a slot so that writes leave the caller's thread immediately and
//! are applied in order by a single background worker.
//!
//! ## Processing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Write-Behind Processing                              │
//! │                                                                         │
//! │  CartStore (mutation thread)          Worker thread                    │
//! │  ───────────────────────────          ─────────────                    │
//! │  write(k, v1) ──┐                                                      │
//! │  write(k, v2) ──┼──► channel (FIFO) ──► inner.write(k, v1)             │
//! │  remove(k)   ───┘                      inner.write(k, v2)              │
//! │                                        inner.remove(k)                 │
//! │                                          │                             │
//! │                                          └─ failure → warn!, continue  │
//! │                                                                         │
//! │  flush() ──────────► Flush(ack) ──────► ack once everything before    │
//! │                                         it has been applied            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The last write to a key always wins because there is exactly one worker.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::slot::KeyValueSlot;

/// Work items for the background writer.
enum Command {
    Write { key: String, value: String },
    Remove { key: String },
    Flush(Sender<()>),
}

/// A slot whose writes and removals are applied asynchronously.
///
/// Writes report success once queued. Failures from the inner slot are
/// logged by the worker and never reach the caller, so the caller's
/// in-memory state is unaffected by a failing disk.
///
/// Reads drain the queue first, so a read after a write sees that write.
pub struct WriteBehindSlot<S: KeyValueSlot + 'static> {
    inner: Arc<S>,
    sender: Option<Mutex<Sender<Command>>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: KeyValueSlot + 'static> WriteBehindSlot<S> {
    /// Starts the worker thread for `inner`.
    pub fn spawn(inner: S) -> StoreResult<Self> {
        let inner = Arc::new(inner);
        let (sender, receiver) = mpsc::channel();

        let worker_slot = Arc::clone(&inner);
        let worker = thread::Builder::new()
            .name("ecomlite-writer".to_string())
            .spawn(move || run_worker(worker_slot, receiver))
            .map_err(|e| StoreError::io("writer", e))?;

        info!("Write-behind worker started");

        Ok(WriteBehindSlot {
            inner,
            sender: Some(Mutex::new(sender)),
            worker: Some(worker),
        })
    }

    /// Blocks until every queued command has been applied.
    pub fn flush(&self) -> StoreResult<()> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.send(Command::Flush(ack_tx))?;
        ack_rx.recv().map_err(|_| StoreError::WriterStopped)
    }

    /// The wrapped slot.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn send(&self, command: Command) -> StoreResult<()> {
        let sender = self.sender.as_ref().ok_or(StoreError::WriterStopped)?;
        sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(command)
            .map_err(|_| StoreError::WriterStopped)
    }
}

impl<S: KeyValueSlot + 'static> KeyValueSlot for WriteBehindSlot<S> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        self.flush()?;
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.send(Command::Write {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.send(Command::Remove {
            key: key.to_string(),
        })
    }
}

impl<S: KeyValueSlot + 'static> Drop for WriteBehindSlot<S> {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Write-behind worker panicked");
            }
        }
    }
}

fn run_worker<S: KeyValueSlot>(slot: Arc<S>, receiver: Receiver<Command>) {
    for command in receiver {
        match command {
            Command::Write { key, value } => {
                if let Err(e) = slot.write(&key, &value) {
                    warn!(key = %key, error = %e, "Background write failed");
                }
            }
            Command::Remove { key } => {
                if let Err(e) = slot.remove(&key) {
                    warn!(key = %key, error = %e, "Background remove failed");
                }
            }
            Command::Flush(ack) => {
                // The flusher may have given up waiting.
                let _ = ack.send(());
            }
        }
    }
    debug!("Write-behind worker stopped");
}

// =============================================================================
// Unit Tests
// =============================================================================
