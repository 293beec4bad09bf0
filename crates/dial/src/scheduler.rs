use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of recurring callbacks for the brake loop.
///
/// The scheduler only owns the clock. Whatever it fires must end up calling
/// [`DialEngine::brake_tick`](crate::DialEngine::brake_tick) on the same thread
/// that handles touch input.
pub trait Scheduler {
    type Timer: Timer;

    fn schedule_repeating(&mut self, interval: Duration) -> Self::Timer;
}

pub trait Timer {
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Scheduler without a clock: ticks are delivered by calling `brake_tick` by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    scheduled: Rc<Cell<usize>>,
    live: Rc<Cell<usize>>,
    last_interval: Rc<Cell<Option<Duration>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total timers ever scheduled.
    pub fn scheduled(&self) -> usize {
        self.scheduled.get()
    }

    /// Timers scheduled and not yet cancelled.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub fn last_interval(&self) -> Option<Duration> {
        self.last_interval.get()
    }
}

impl Scheduler for ManualScheduler {
    type Timer = ManualTimer;

    fn schedule_repeating(&mut self, interval: Duration) -> ManualTimer {
        self.scheduled.set(self.scheduled.get() + 1);
        self.live.set(self.live.get() + 1);
        self.last_interval.set(Some(interval));
        ManualTimer {
            active: true,
            live: self.live.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ManualTimer {
    active: bool,
    live: Rc<Cell<usize>>,
}

impl Timer for ManualTimer {
    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.live.set(self.live.get() - 1);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
