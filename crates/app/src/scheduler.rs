//! Background scheduler — runs jobs now, after a delay, or at a fixed interval.
//!
//! Every job runs in its own tokio task, so jobs run concurrently with each
//! other and with the code that submitted them. A supervising task watches
//! each run: an `Err` or a panic is logged and swallowed, and never stops
//! later jobs, including the next occurrences of a failing recurring job.
//!
//! Delayed and recurring jobs share one [`JobQueue`] driven by a dispatcher
//! task on the tokio timer. Under `#[tokio::test(start_paused = true)]` the
//! whole scheduler runs on tokio's virtual clock.
//!
//! There is no cancellation: queued jobs live as long as the runtime.

mod queue;

pub use queue::{JobQueue, MAX_DELAY, Trigger, deadline_after};

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use aarlo_domain::error::AarloError;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{Instrument, Span};

/// Future produced by one run of a job.
pub type JobFuture = Pin<Box<dyn Future<Output = Result<(), AarloError>> + Send + 'static>>;

struct Job {
    name: &'static str,
    task: Box<dyn Fn() -> JobFuture + Send + Sync>,
    running: AtomicBool,
}

struct Inner {
    queue: Mutex<JobQueue<Arc<Job>>>,
    wake: Notify,
    span: Span,
}

/// Handle on the background scheduler. Cheap to clone.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Start the dispatcher on the current tokio runtime.
    ///
    /// Every job future is instrumented with `span`, so their logs carry
    /// the owner's context.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    #[must_use]
    pub fn start(span: Span) -> Self {
        let inner = Arc::new(Inner {
            queue: Mutex::new(JobQueue::new()),
            wake: Notify::new(),
            span,
        });
        let dispatcher = dispatch_loop(Arc::clone(&inner)).instrument(inner.span.clone());
        tokio::spawn(dispatcher);
        Self { inner }
    }

    /// Run `job` right away in the background.
    pub fn run<F>(&self, name: &'static str, job: F)
    where
        F: Future<Output = Result<(), AarloError>> + Send + 'static,
    {
        supervise(name, Box::pin(job), &self.inner.span, || {});
    }

    /// Run `job` once, no earlier than `delay` from now.
    ///
    /// Delays longer than [`MAX_DELAY`] are capped.
    pub fn run_in<F, Fut>(&self, name: &'static str, delay: Duration, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AarloError>> + Send + 'static,
    {
        self.enqueue(
            name,
            deadline_after(Instant::now(), delay),
            Trigger::OneShot,
            job,
        );
    }

    /// Run `job` every `interval`, first `interval` from now.
    ///
    /// A run still in flight when the next occurrence fires causes that
    /// occurrence to be skipped, so runs of the same job never overlap.
    pub fn run_every<F, Fut>(&self, name: &'static str, interval: Duration, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AarloError>> + Send + 'static,
    {
        self.enqueue(
            name,
            deadline_after(Instant::now(), interval),
            Trigger::Recurring(interval),
            job,
        );
    }

    /// Number of delayed and recurring jobs waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock_queue().len()
    }

    fn enqueue<F, Fut>(&self, name: &'static str, fire_at: Instant, trigger: Trigger, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AarloError>> + Send + 'static,
    {
        let job = Arc::new(Job {
            name,
            task: Box::new(move || Box::pin(job()) as JobFuture),
            running: AtomicBool::new(false),
        });
        tracing::debug!(job = name, ?trigger, "job queued");
        self.lock_queue().push(fire_at, trigger, job);
        self.inner.wake.notify_one();
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, JobQueue<Arc<Job>>> {
        self.inner
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pop due jobs, dispatch them, sleep until the next one or a new submission.
async fn dispatch_loop(inner: Arc<Inner>) {
    loop {
        let (due, next) = {
            let mut queue = inner.queue.lock().unwrap_or_else(PoisonError::into_inner);
            let due = queue.drain_due(Instant::now());
            (due, queue.next_fire_at())
        };

        for job in due {
            dispatch(job, &inner.span);
        }

        match next {
            Some(fire_at) => {
                tokio::select! {
                    () = tokio::time::sleep_until(fire_at) => {}
                    () = inner.wake.notified() => {}
                }
            }
            None => inner.wake.notified().await,
        }
    }
}

fn dispatch(job: Arc<Job>, span: &Span) {
    if job.running.swap(true, Ordering::AcqRel) {
        tracing::debug!(job = job.name, "previous run still in flight, skipping");
        return;
    }
    let future = (job.task)();
    let name = job.name;
    supervise(name, future, span, move || {
        job.running.store(false, Ordering::Release);
    });
}

/// Spawn `future` and log how it ended, then call `on_done`.
fn supervise<D>(name: &'static str, future: JobFuture, span: &Span, on_done: D)
where
    D: FnOnce() + Send + 'static,
{
    let handle = tokio::spawn(future.instrument(span.clone()));
    let watcher = async move {
        match handle.await {
            Ok(Ok(())) => tracing::trace!(job = name, "job finished"),
            Ok(Err(err)) => tracing::warn!(job = name, error = %err, "job failed"),
            Err(err) if err.is_panic() => tracing::error!(job = name, "job panicked"),
            Err(err) => tracing::warn!(job = name, error = %err, "job aborted"),
        }
        on_done();
    };
    tokio::spawn(watcher.instrument(span.clone()));
}
