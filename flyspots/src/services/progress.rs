//! Stepped progress for scripted long-running actions.
//!
//! Landscape analysis and the offline download both walk through a fixed list of
//! timed stages before producing a result. [`SteppedTask`] models that as an
//! explicit state machine (`Idle -> Running -> Complete`) that only moves when it
//! is polled against a [`Clock`]. Production code polls against [`SystemClock`];
//! tests advance a [`VirtualClock`] and never sleep.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall-clock backed [`Clock`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven [`Clock`] for tests and replays.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Mutex<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn advance_ms(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

/// One timed step of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub label: String,
    pub duration: Duration,
}

impl Stage {
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }

    pub fn millis(label: impl Into<String>, millis: u64) -> Self {
        Self::new(label, Duration::from_millis(millis))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProgressState<T> {
    Idle,
    Running {
        /// Index of the stage currently in progress.
        step: usize,
        label: String,
        /// Share of stages already finished, 0 to 100.
        percent: f64,
    },
    Complete {
        result: T,
    },
}

impl<T> ProgressState<T> {
    pub fn percent(&self) -> f64 {
        match self {
            ProgressState::Idle => 0.0,
            ProgressState::Running { percent, .. } => *percent,
            ProgressState::Complete { .. } => 100.0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ProgressState::Running { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("Task {0} is already running")]
    AlreadyRunning(Uuid),
}

/// A scripted task that runs its stages back to back.
#[derive(Debug)]
pub struct SteppedTask<T> {
    id: Uuid,
    stages: Vec<Stage>,
    started_at: Option<Duration>,
    /// Stages already handed out by [`SteppedTask::poll`].
    reported: usize,
    pending: Option<T>,
    state: ProgressState<T>,
}

impl<T> SteppedTask<T> {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stages,
            started_at: None,
            reported: 0,
            pending: None,
            state: ProgressState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn state(&self) -> &ProgressState<T> {
        &self.state
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Begin running. `result` is what the task yields once every stage is done.
    ///
    /// Starting a completed task runs it again; starting a running one is refused.
    pub fn start(&mut self, clock: &dyn Clock, result: T) -> Result<(), ProgressError> {
        if self.state.is_running() {
            return Err(ProgressError::AlreadyRunning(self.id));
        }

        self.started_at = Some(clock.now());
        self.reported = 0;
        self.pending = Some(result);
        self.state = self.running_state(0);
        log::debug!("Task {} started with {} stages", self.id, self.stages.len());
        Ok(())
    }

    /// Drop back to `Idle`, discarding any pending result.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.reported = 0;
        self.pending = None;
        self.state = ProgressState::Idle;
    }

    /// Number of stages whose full duration has elapsed on `clock`.
    fn finished_stages(&self, clock: &dyn Clock) -> usize {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let elapsed = clock.now().saturating_sub(started_at);

        let mut boundary = Duration::ZERO;
        let mut finished = 0;
        for stage in &self.stages {
            boundary += stage.duration;
            if elapsed < boundary {
                break;
            }
            finished += 1;
        }
        finished
    }

    fn running_state(&self, finished: usize) -> ProgressState<T> {
        let percent = if self.stages.is_empty() {
            100.0
        } else {
            finished as f64 / self.stages.len() as f64 * 100.0
        };
        ProgressState::Running {
            step: finished,
            label: self
                .stages
                .get(finished)
                .map(|s| s.label.clone())
                .unwrap_or_default(),
            percent,
        }
    }

    /// Bring the state up to date with `clock`.
    ///
    /// Returns the indices of stages that finished since the previous poll, in
    /// order, so callers can act once per stage.
    pub fn poll(&mut self, clock: &dyn Clock) -> Vec<usize> {
        if !self.state.is_running() {
            return Vec::new();
        }

        let finished = self.finished_stages(clock);
        let newly_finished: Vec<usize> = (self.reported..finished).collect();
        self.reported = finished;

        if finished >= self.stages.len() {
            if let Some(result) = self.pending.take() {
                log::debug!("Task {} complete", self.id);
                self.state = ProgressState::Complete { result };
            }
        } else {
            self.state = self.running_state(finished);
        }

        newly_finished
    }
}
