//! Cancellable scheduled tasks.
//!
//! Autoplay ticks, the resize debounce and the initial layout settle are all
//! units of work that may be rescheduled or cancelled at any time. Each one
//! is a tokio task owned through a [`TaskHandle`]; dropping the handle
//! cancels the task.
//!
//! # Example
//!
//! ```ignore
//! let mut handle = timer::spawn_interval(Duration::from_secs(2), || {
//!     carousel.next();
//!     ControlFlow::Continue(())
//! })?;
//!
//! handle.cancel(); // idempotent
//! handle.cancel();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use crate::error::{Error, Result};

// ============================================================================
// TaskHandle
// ============================================================================

/// Owner of a scheduled task.
///
/// Cancelling is idempotent and also happens on drop.
pub struct TaskHandle {
    /// Short name used in logs.
    label: &'static str,

    /// Underlying task; `None` once cancelled.
    task: Option<JoinHandle<()>>,
}

impl TaskHandle {
    fn new(label: &'static str, task: JoinHandle<()>) -> Self {
        Self {
            label,
            task: Some(task),
        }
    }

    /// Cancels the task. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            trace!(label = self.label, "Cancelling scheduled task");
            task.abort();
        }
    }

    /// Returns `true` while the task is scheduled and not finished.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Name given at spawn time.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Spawning
// ============================================================================

/// Runs `tick` every `period`, first one a full period from now.
///
/// The task stops when `tick` returns [`ControlFlow::Break`] or the handle
/// is cancelled.
///
/// # Errors
///
/// - [`Error::NoRuntime`] if called outside a tokio runtime
/// - [`Error::Config`] if `period` is zero
pub fn spawn_interval<F>(label: &'static str, period: Duration, mut tick: F) -> Result<TaskHandle>
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    if period.is_zero() {
        return Err(Error::config(format!("{label}: interval period must be non-zero")));
    }
    let runtime = Handle::try_current().map_err(|_| Error::no_runtime(label))?;
    let start = Instant::now() + period;

    let task = runtime.spawn(async move {
        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tick().is_break() {
                break;
            }
        }
    });

    Ok(TaskHandle::new(label, task))
}

/// Runs `task` once after `delay`.
///
/// # Errors
///
/// - [`Error::NoRuntime`] if called outside a tokio runtime
pub fn spawn_timeout<F>(label: &'static str, delay: Duration, task: F) -> Result<TaskHandle>
where
    F: FnOnce() + Send + 'static,
{
    let runtime = Handle::try_current().map_err(|_| Error::no_runtime(label))?;
    let deadline = Instant::now() + delay;

    let task = runtime.spawn(async move {
        time::sleep_until(deadline).await;
        task();
    });

    Ok(TaskHandle::new(label, task))
}

// ============================================================================
// Tests
// ============================================================================
