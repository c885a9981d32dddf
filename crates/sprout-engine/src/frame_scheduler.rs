//! Idle Scheduling
//!
//! Idle-period budgeting and idle callback bookkeeping. The engine registers
//! its render loop as a repeating idle callback; every idle period hands each
//! armed callback an [`IdleDeadline`] it can poll.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use sprout_core::Deadline;

/// Frame budget allocation
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget {
    /// Whole frame (ms)
    pub frame_ms: f64,
    /// Share of the frame left for idle work (ms)
    pub idle_ms: f64,
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self::for_60fps()
    }
}

impl FrameBudget {
    /// Budget for 60 FPS (16.67ms per frame)
    pub fn for_60fps() -> Self {
        Self { frame_ms: 16.67, idle_ms: 2.67 }
    }

    /// Budget for 30 FPS
    pub fn for_30fps() -> Self {
        Self { frame_ms: 33.33, idle_ms: 5.33 }
    }

    /// Idle share as a duration
    pub fn idle(&self) -> Duration {
        Duration::from_secs_f64(self.idle_ms.max(0.0) / 1000.0)
    }
}

/// Idle deadline info
#[derive(Debug, Clone, Copy)]
pub struct IdleDeadline {
    start: Instant,
    budget: Duration,
}

impl IdleDeadline {
    pub fn new(budget: Duration) -> Self {
        Self { start: Instant::now(), budget }
    }

    pub fn time_remaining_ms(&self) -> f64 {
        self.time_remaining().as_secs_f64() * 1000.0
    }

    /// Whole budget spent
    pub fn did_timeout(&self) -> bool {
        self.time_remaining().is_zero()
    }
}

impl Deadline for IdleDeadline {
    fn time_remaining(&self) -> Duration {
        self.budget.saturating_sub(self.start.elapsed())
    }
}

/// Idle callback
#[derive(Debug, Clone, Copy)]
struct IdleCallback {
    id: u64,
    repeating: bool,
}

/// Idle statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleStats {
    pub periods: u64,
    pub callbacks_run: u64,
    pub overruns: u64,
}

/// Idle callback scheduler
#[derive(Debug)]
pub struct IdleScheduler {
    budget: FrameBudget,
    callbacks: VecDeque<IdleCallback>,
    next_id: u64,
    stats: IdleStats,
}

impl Default for IdleScheduler {
    fn default() -> Self {
        Self::new(FrameBudget::default())
    }
}

impl IdleScheduler {
    pub fn new(budget: FrameBudget) -> Self {
        Self {
            budget,
            callbacks: VecDeque::new(),
            next_id: 1,
            stats: IdleStats::default(),
        }
    }

    pub fn set_budget(&mut self, budget: FrameBudget) {
        self.budget = budget;
    }

    pub fn budget(&self) -> FrameBudget {
        self.budget
    }

    /// Request idle callback. A repeating callback is re-armed after every run.
    pub fn request_idle_callback(&mut self, repeating: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push_back(IdleCallback { id, repeating });
        id
    }

    /// Cancel a pending callback. Returns `false` if it was not armed.
    pub fn cancel_idle_callback(&mut self, id: u64) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|cb| cb.id != id);
        self.callbacks.len() != before
    }

    pub fn is_armed(&self, id: u64) -> bool {
        self.callbacks.iter().any(|cb| cb.id == id)
    }

    pub fn pending(&self) -> usize {
        self.callbacks.len()
    }

    /// Open a new idle period
    pub fn begin_idle_period(&mut self) -> IdleDeadline {
        self.stats.periods += 1;
        IdleDeadline::new(self.budget.idle())
    }

    /// Run every callback armed at the start of this idle period, in request
    /// order. One-shot callbacks are disarmed before they run.
    pub fn run_idle_callbacks<F>(&mut self, mut callback: F)
    where
        F: FnMut(u64, &IdleDeadline),
    {
        let deadline = self.begin_idle_period();
        let due: Vec<IdleCallback> = self.callbacks.drain(..).collect();
        for cb in &due {
            if cb.repeating {
                self.callbacks.push_back(*cb);
            }
        }
        for cb in due {
            callback(cb.id, &deadline);
            self.stats.callbacks_run += 1;
        }
        if deadline.did_timeout() {
            self.stats.overruns += 1;
            tracing::trace!("Idle period overran its {:.2}ms budget", self.budget.idle_ms);
        }
    }

    pub fn stats(&self) -> &IdleStats {
        &self.stats
    }
}
