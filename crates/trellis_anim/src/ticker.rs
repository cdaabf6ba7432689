//! Periodic driving of the animation runtime
//!
//! The ticker owns a thread that advances a shared runtime at a fixed
//! interval with measured wall-clock deltas. Stopping is explicit and
//! immediate; no callback outlives the ticker.

use crate::runtime::AnimationRuntime;
use crossbeam_channel::{bounded, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Drives [`AnimationRuntime::advance`] on a background thread
pub struct AnimationTicker {
    stop: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl AnimationTicker {
    /// Default frame interval (~60 fps)
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

    /// Start ticking the runtime at the given interval
    pub fn start(runtime: Arc<AnimationRuntime>, interval: Duration) -> Self {
        let (stop, stop_rx) = bounded::<()>(1);

        let worker = std::thread::spawn(move || {
            let ticks = crossbeam_channel::tick(interval);
            let mut last = Instant::now();

            loop {
                crossbeam_channel::select! {
                    recv(ticks) -> _ => {
                        let now = Instant::now();
                        runtime.advance(now - last);
                        last = now;
                    }
                    recv(stop_rx) -> _ => break,
                }
            }
        });

        log::debug!("Animation ticker started ({:?} interval)", interval);

        Self {
            stop,
            worker: Some(worker),
        }
    }

    /// Start with the default frame interval
    pub fn start_default(runtime: Arc<AnimationRuntime>) -> Self {
        Self::start(runtime, Self::DEFAULT_INTERVAL)
    }

    /// Stop the ticker, joining its thread
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop.try_send(());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            log::debug!("Animation ticker stopped");
        }
    }
}

impl Drop for AnimationTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
