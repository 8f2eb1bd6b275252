use std::{cell::Cell, rc::Rc, thread, time::Duration};

/// Fixed-period timer that drives the garden's tick commands.
///
/// Once cancelled the heartbeat never yields another tick. Dropping the
/// heartbeat cancels it.
#[derive(Debug)]
pub(crate) struct Heartbeat {
    period: Duration,
    realtime: bool,
    cancelled: Rc<Cell<bool>>,
}

impl Heartbeat {
    /// Creates a heartbeat that advances simulated time without waiting.
    pub(crate) fn simulated(period: Duration) -> Self {
        Self::with_pacing(period, false)
    }

    /// Creates a heartbeat that sleeps for one period before every tick.
    pub(crate) fn realtime(period: Duration) -> Self {
        Self::with_pacing(period, true)
    }

    fn with_pacing(period: Duration, realtime: bool) -> Self {
        Self {
            period,
            realtime,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    /// Waits for the next beat and returns the elapsed time, or `None` once cancelled.
    pub(crate) fn next_beat(&mut self) -> Option<Duration> {
        if self.cancelled.get() {
            return None;
        }
        if self.realtime {
            thread::sleep(self.period);
        }
        Some(self.period)
    }

    /// Stops the heartbeat permanently.
    pub(crate) fn cancel(&mut self) {
        if !self.cancelled.replace(true) {
            log::debug!("heartbeat cancelled");
        }
    }

    /// Flag that stays readable after the heartbeat is gone.
    #[cfg(test)]
    pub(crate) fn cancellation(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.cancelled)
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.cancel();
    }
}
