//! Pass Scheduler
//!
//! Drives sync passes from a fixed-interval timer. The first pass fires
//! immediately. Passes never overlap: a tick that arrives while a pass is
//! still running is dropped and counted.
//!
//! State machine:
//!
//! ```text
//! Idle --tick--> Running --pass done--> Idle
//! Idle | Running --stop--> Stopping (terminal)
//! ```

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Work performed on every accepted tick.
#[async_trait]
pub trait PassHandler: Send + Sync + 'static {
    /// Run one pass. `cancel` is raised when the scheduler stops.
    async fn run_pass(&self, cancel: CancellationToken);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopping,
}

/// Tick accounting, mainly for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub passes_started: u64,
    pub passes_completed: u64,
    pub ticks_skipped: u64,
}

#[derive(Default)]
struct Counters {
    started: AtomicU64,
    completed: AtomicU64,
    skipped: AtomicU64,
}

struct Shared {
    state: Mutex<SchedulerState>,
    counters: Counters,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    /// Idle -> Running. Returns false when the tick must be dropped.
    fn try_begin_pass(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            SchedulerState::Idle => {
                *state = SchedulerState::Running;
                true
            }
            SchedulerState::Running | SchedulerState::Stopping => false,
        }
    }

    /// Running -> Idle, unless a stop arrived meanwhile.
    fn finish_pass(&self) {
        let mut state = self.state.lock();
        if *state == SchedulerState::Running {
            *state = SchedulerState::Idle;
        }
    }
}

/// Fixed-interval pass scheduler with overlap guard and cooperative stop.
pub struct Scheduler {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState::Idle),
                counters: Counters::default(),
                in_flight: Mutex::new(None),
            }),
            cancel: CancellationToken::new(),
            ticker: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.shared.state.lock()
    }

    pub fn stats(&self) -> SchedulerStats {
        let counters = &self.shared.counters;
        SchedulerStats {
            passes_started: counters.started.load(Ordering::SeqCst),
            passes_completed: counters.completed.load(Ordering::SeqCst),
            ticks_skipped: counters.skipped.load(Ordering::SeqCst),
        }
    }

    /// Start ticking: one pass now, then one every `period`.
    ///
    /// Must be called from within a Tokio runtime. Fails if the scheduler was
    /// already started or has been stopped.
    pub fn start(&self, period: Duration, handler: Arc<dyn PassHandler>) -> SyncResult<()> {
        if period.is_zero() {
            return Err(SyncError::Scheduler(
                "interval must be greater than zero".to_string(),
            ));
        }
        let mut ticker = self.ticker.lock();
        if ticker.is_some() || self.cancel.is_cancelled() {
            return Err(SyncError::Scheduler(
                "scheduler already started or stopped".to_string(),
            ));
        }

        let shared = Arc::clone(&self.shared);
        let cancel = self.cancel.clone();
        *ticker = Some(tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = timer.tick() => on_tick(&shared, &handler, &cancel),
                }
            }
            debug!("Scheduler tick loop exited");
        }));

        info!(interval_secs = period.as_secs_f64(), "Scheduler started");
        Ok(())
    }

    /// Stop ticking, cancel the in-flight pass and wait for it to return.
    ///
    /// Cancellation is cooperative: file operations already underway finish.
    pub async fn stop(&self) {
        *self.shared.state.lock() = SchedulerState::Stopping;
        self.cancel.cancel();

        let ticker = self.ticker.lock().take();
        if let Some(handle) = ticker {
            if let Err(err) = handle.await {
                warn!(error = %err, "Scheduler tick loop ended abnormally");
            }
        }
        let in_flight = self.shared.in_flight.lock().take();
        if let Some(handle) = in_flight {
            if let Err(err) = handle.await {
                warn!(error = %err, "In-flight pass ended abnormally");
            }
        }
        info!("Scheduler stopped");
    }
}

fn on_tick(shared: &Arc<Shared>, handler: &Arc<dyn PassHandler>, cancel: &CancellationToken) {
    if !shared.try_begin_pass() {
        shared.counters.skipped.fetch_add(1, Ordering::SeqCst);
        warn!("Previous sync pass still running, skipping this tick");
        return;
    }

    shared.counters.started.fetch_add(1, Ordering::SeqCst);
    let pass_shared = Arc::clone(shared);
    let handler = Arc::clone(handler);
    let pass_cancel = cancel.child_token();
    let handle = tokio::spawn(async move {
        handler.run_pass(pass_cancel).await;
        pass_shared.counters.completed.fetch_add(1, Ordering::SeqCst);
        pass_shared.finish_pass();
    });
    *shared.in_flight.lock() = Some(handle);
}
