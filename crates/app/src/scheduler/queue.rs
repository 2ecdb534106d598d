//! Timer queue — one min-heap of one-shot and recurring jobs ordered by the
//! instant they next fire.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use tokio::time::Instant;

/// Shortest period a recurring job is re-queued with.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Longest delay honoured; anything beyond fires after roughly 30 years.
pub const MAX_DELAY: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + delay`, with `delay` capped at [`MAX_DELAY`] so the addition
/// cannot overflow.
#[must_use]
pub fn deadline_after(now: Instant, delay: Duration) -> Instant {
    now + delay.min(MAX_DELAY)
}

/// How a queued job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fire once, then forget the job.
    OneShot,
    /// Fire, then re-queue `interval` after the moment it fired.
    Recurring(Duration),
}

struct Entry<J> {
    fire_at: Instant,
    seq: u64,
    trigger: Trigger,
    job: J,
}

impl<J> PartialEq for Entry<J> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<J> Eq for Entry<J> {}

impl<J> PartialOrd for Entry<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<J> Ord for Entry<J> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Jobs waiting for their fire instant.
///
/// Pure data structure: time only enters through the `now` arguments, so it
/// can be exercised without a runtime or real waits. Jobs with the same fire
/// instant come out in insertion order.
pub struct JobQueue<J> {
    heap: BinaryHeap<Reverse<Entry<J>>>,
    next_seq: u64,
}

impl<J> Default for JobQueue<J> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<J: Clone> JobQueue<J> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fire_at: Instant, trigger: Trigger, job: J) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            fire_at,
            seq,
            trigger,
            job,
        }));
    }

    /// Instant of the earliest queued job.
    #[must_use]
    pub fn next_fire_at(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(entry)| entry.fire_at)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Take the earliest job due at `now`, if any.
    ///
    /// A recurring job is re-queued at `now + interval` (never less than one
    /// millisecond ahead) before being returned, so a late wake-up does not
    /// produce a burst of catch-up runs.
    pub fn pop_due(&mut self, now: Instant) -> Option<J> {
        if self.next_fire_at()? > now {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        if let Trigger::Recurring(interval) = entry.trigger {
            self.push(
                deadline_after(now, interval.max(MIN_INTERVAL)),
                entry.trigger,
                entry.job.clone(),
            );
        }
        Some(entry.job)
    }

    /// Take every job due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Instant) -> Vec<J> {
        let mut due = Vec::new();
        while let Some(job) = self.pop_due(now) {
            due.push(job);
        }
        due
    }
}
