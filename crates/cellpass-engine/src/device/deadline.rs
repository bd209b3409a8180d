use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::{Duration, Instant};

/// Returned when a [`Deadline`] expires before its job completes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Elapsed(pub Duration);

struct Slot<T> {
    result: Option<thread::Result<T>>,
    waker: Option<Waker>,
}

fn lock<T>(slot: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `job` on a worker thread and resolves with its result, or with
/// [`Elapsed`] once `limit` passes.
///
/// The job may block (wgpu resolves adapter and device requests synchronously
/// on native), so it never runs on the polling thread. An expired job is
/// detached; whatever it returns later is dropped.
pub(crate) fn spawn_with_deadline<T, F>(job: F, limit: Option<Duration>) -> Deadline<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let slot = Arc::new(Mutex::new(Slot {
        result: None,
        waker: None,
    }));

    let worker_slot = Arc::clone(&slot);
    thread::spawn(move || {
        let out = panic::catch_unwind(AssertUnwindSafe(job));
        let mut slot = lock(&worker_slot);
        slot.result = Some(out);
        if let Some(waker) = slot.waker.take() {
            waker.wake();
        }
    });

    Deadline {
        slot,
        limit,
        started: Instant::now(),
        timer_armed: false,
    }
}

pub(crate) struct Deadline<T> {
    slot: Arc<Mutex<Slot<T>>>,
    limit: Option<Duration>,
    started: Instant,
    timer_armed: bool,
}

impl<T> Future for Deadline<T> {
    type Output = Result<T, Elapsed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        {
            let mut slot = lock(&self.slot);
            match slot.result.take() {
                Some(Ok(out)) => return Poll::Ready(Ok(out)),
                Some(Err(payload)) => panic::resume_unwind(payload),
                None => slot.waker = Some(cx.waker().clone()),
            }
        }

        let Some(limit) = self.limit else {
            return Poll::Pending;
        };

        let elapsed = self.started.elapsed();
        if elapsed >= limit {
            return Poll::Ready(Err(Elapsed(limit)));
        }

        if !self.timer_armed {
            self.timer_armed = true;
            let remaining = limit - elapsed;
            let waker = cx.waker().clone();
            thread::spawn(move || {
                thread::sleep(remaining);
                waker.wake();
            });
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_job_passes_through() {
        let out = pollster::block_on(spawn_with_deadline(|| 7, Some(Duration::from_secs(5))));
        assert_eq!(out, Ok(7));
    }

    #[test]
    fn blocking_job_expires_on_time() {
        let limit = Duration::from_millis(20);
        let started = Instant::now();

        let out = pollster::block_on(spawn_with_deadline(
            || thread::sleep(Duration::from_secs(2)),
            Some(limit),
        ));

        assert_eq!(out, Err(Elapsed(limit)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn no_limit_waits_for_completion() {
        let out = pollster::block_on(spawn_with_deadline(
            || {
                thread::sleep(Duration::from_millis(30));
                "done"
            },
            None,
        ));
        assert_eq!(out, Ok("done"));
    }

    #[test]
    #[should_panic(expected = "adapter exploded")]
    fn job_panic_reaches_the_caller() {
        let _ = pollster::block_on(spawn_with_deadline(
            || -> () { panic!("adapter exploded") },
            Some(Duration::from_secs(5)),
        ));
    }
}
