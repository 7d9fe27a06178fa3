//! crates/birthday_card_core/src/timer.rs
//!
//! A component-owned set of virtual timers.
//!
//! Every animated component keeps its own `TimerQueue` instead of relying on
//! ambient intervals. Time is an explicit `Duration` measured from an
//! arbitrary origin chosen by the host (usually page mount), so tests can
//! drive the queue deterministically.

use std::collections::BTreeMap;
use std::time::Duration;

/// A disposable handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    deadline: Duration,
    period: Option<Duration>,
    event: E,
}

/// A timer that came due during [`TimerQueue::pop_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    pub id: TimerId,
    /// The instant the timer was scheduled to fire, which is never later than
    /// the `now` passed to `pop_due`.
    pub at: Duration,
    pub event: E,
}

/// One-shot and repeating timers, drained in (deadline, scheduling order).
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    next_id: u64,
    timers: BTreeMap<TimerId, Timer<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `event` once, `delay` after `now`.
    pub fn schedule_once(&mut self, now: Duration, delay: Duration, event: E) -> TimerId {
        self.insert(now + delay, None, event)
    }

    /// Fires `event` every `period`, first at `now + period`.
    ///
    /// A zero period is clamped to one millisecond so a repeating timer can
    /// never spin forever inside a single `pop_due` drain.
    pub fn schedule_every(&mut self, now: Duration, period: Duration, event: E) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(now + period, Some(period), event)
    }

    /// Cancels a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Cancels every outstanding timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }

    /// Removes and returns the earliest timer due at or before `now`.
    ///
    /// Repeating timers are re-armed at `deadline + period`, so a large jump
    /// in `now` yields every missed period in order.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<E>> {
        let id = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(id, t)| (t.deadline, **id))
            .map(|(id, _)| *id)?;

        let timer = self.timers.remove(&id)?;
        let fired = Fired {
            id,
            at: timer.deadline,
            event: timer.event.clone(),
        };
        if let Some(period) = timer.period {
            self.timers.insert(
                id,
                Timer {
                    deadline: timer.deadline + period,
                    ..timer
                },
            );
        }
        Some(fired)
    }

    fn insert(&mut self, deadline: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                deadline,
                period,
                event,
            },
        );
        id
    }
}
