//! Delta debouncing
//!
//! Deltas often arrive in bursts. The debouncer buffers them, restarts a
//! quiet-window timer on every arrival, and flushes the whole buffer (in
//! arrival order) through a single callback once the window elapses or
//! `flush()` is called. `cancel()` discards the buffer without flushing.
//!
//! The worker runs on its own thread; the buffer never blocks the
//! thread that feeds it.

use crate::op::Delta;
use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Configuration for the delta debouncer
#[derive(Debug, Clone)]
pub struct DebouncerConfig {
    /// Quiet window that must elapse after the last delta before a flush
    pub debounce_duration: Duration,
}

impl Default for DebouncerConfig {
    fn default() -> Self {
        Self {
            debounce_duration: Duration::from_millis(50),
        }
    }
}

enum Command {
    Add(Delta),
    Flush,
    Cancel,
    Shutdown,
}

/// Buffers incoming deltas behind a quiet window
pub struct DeltaDebouncer {
    sender: Sender<Command>,
    pending: Arc<AtomicUsize>,
    worker: Option<JoinHandle<()>>,
}

impl DeltaDebouncer {
    /// Create a debouncer that delivers batches to `on_batch`
    ///
    /// The callback runs on the debouncer's worker thread.
    pub fn new<F>(config: DebouncerConfig, on_batch: F) -> Self
    where
        F: Fn(Vec<Delta>) + Send + 'static,
    {
        let (sender, receiver) = unbounded();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = Arc::clone(&pending);
        let window = config.debounce_duration;

        let worker = std::thread::spawn(move || {
            let mut buffer: Vec<Delta> = Vec::new();
            let mut deadline = Instant::now();

            loop {
                // Block indefinitely while idle; race the deadline while
                // a batch is building
                let received = if buffer.is_empty() {
                    receiver.recv().map_err(|_| RecvTimeoutError::Disconnected)
                } else {
                    receiver.recv_deadline(deadline)
                };

                match received {
                    Ok(Command::Add(delta)) => {
                        buffer.push(delta);
                        worker_pending.store(buffer.len(), Ordering::Release);
                        deadline = Instant::now() + window;
                    }
                    Ok(Command::Flush) | Err(RecvTimeoutError::Timeout) => {
                        if !buffer.is_empty() {
                            let batch = std::mem::take(&mut buffer);
                            worker_pending.store(0, Ordering::Release);
                            on_batch(batch);
                        }
                    }
                    Ok(Command::Cancel) => {
                        buffer.clear();
                        worker_pending.store(0, Ordering::Release);
                    }
                    Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                        // Buffered deltas are dropped; shutdown is not a flush
                        worker_pending.store(0, Ordering::Release);
                        break;
                    }
                }
            }
        });

        Self {
            sender,
            pending,
            worker: Some(worker),
        }
    }

    /// Buffer a delta and restart the quiet window
    pub fn add_delta(&self, delta: Delta) {
        let _ = self.sender.send(Command::Add(delta));
    }

    /// Flush the buffered batch immediately
    pub fn flush(&self) {
        let _ = self.sender.send(Command::Flush);
    }

    /// Discard buffered deltas without flushing
    pub fn cancel(&self) {
        let _ = self.sender.send(Command::Cancel);
    }

    /// Number of deltas currently buffered
    ///
    /// Observational only; the count may change concurrently.
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

impl Drop for DeltaDebouncer {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
