use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for the session clock
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Production time source backed by the monotonic system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time source that only moves when told to. Clones share the same offset.
#[derive(Clone, Debug)]
pub struct ManualTimeSource {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// Identity of one running interval. A new handle is issued on every start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug)]
struct ActiveTimer {
    handle: TimerHandle,
    last_mark: Instant,
}

/// Accumulates elapsed time across running intervals only.
///
/// Time is folded in on every `tick` while a timer is active, and the partial
/// interval since the last tick is folded in by `pause`, so a pause/resume
/// pair never drops accrued time.
#[derive(Debug, Default)]
pub struct SessionClock {
    accrued: Duration,
    active: Option<ActiveTimer>,
    issued: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin accruing from `now`. Starting an already running clock keeps the
    /// current timer.
    pub fn start(&mut self, now: Instant) -> TimerHandle {
        if let Some(active) = self.active {
            return active.handle;
        }
        self.issued += 1;
        let handle = TimerHandle(self.issued);
        self.active = Some(ActiveTimer {
            handle,
            last_mark: now,
        });
        handle
    }

    /// Stop accruing. No-op when not running.
    pub fn pause(&mut self, now: Instant) {
        if let Some(active) = self.active.take() {
            self.accrued += now.saturating_duration_since(active.last_mark);
        }
    }

    /// Recurring timer callback: add the delta since the previous mark.
    /// Ticks carrying a cancelled or superseded handle are ignored.
    pub fn tick(&mut self, handle: TimerHandle, now: Instant) {
        if let Some(active) = self.active.as_mut().filter(|a| a.handle == handle) {
            self.accrued += now.saturating_duration_since(active.last_mark);
            active.last_mark = now;
        }
    }

    /// Drop the active timer without accruing the pending partial interval.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.active.take().map(|a| a.handle)
    }

    pub fn reset(&mut self) {
        self.cancel();
        self.accrued = Duration::ZERO;
    }

    pub fn elapsed(&self) -> Duration {
        self.accrued
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.accrued.as_secs_f64()
    }
}
