//! Cron-based task scheduler for recurring tasks
//!
//! Drives the periodic METAR refresh. Each task records execution
//! statistics (success and failure counts, last error, average duration)
//! that the server logs on shutdown.
//!
//! Uses `tokio-cron-scheduler` for cron-based scheduling.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use cron::Schedule;
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// A task with this name is already scheduled
    #[error("Task already scheduled: {0}")]
    DuplicateTask(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Parse a 6-field cron expression
///
/// # Errors
///
/// Returns `SchedulerError::InvalidCronExpression` if the expression does not parse.
pub fn validate_cron(cron_expression: &str) -> Result<Schedule, SchedulerError> {
    cron_expression
        .parse::<Schedule>()
        .map_err(|e| SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}")))
}

/// Statistics for a scheduled task
#[derive(Debug, Clone)]
pub struct TaskStats {
    /// Task name
    pub name: String,
    /// Cron expression
    pub cron_expression: String,
    /// Number of successful executions
    pub success_count: u64,
    /// Number of failed executions
    pub failure_count: u64,
    /// Last execution time
    pub last_run: Option<DateTime<Utc>>,
    /// Last successful execution time
    pub last_success: Option<DateTime<Utc>>,
    /// Last error message
    pub last_error: Option<String>,
    /// Next scheduled run
    pub next_run: Option<DateTime<Utc>>,
    /// Average execution duration in milliseconds
    pub avg_duration_ms: u64,
}

/// Internal task metadata
struct TaskMetadata {
    name: String,
    cron_expression: String,
    schedule: Schedule,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    last_success: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
    total_duration_ms: AtomicU64,
}

impl TaskMetadata {
    fn new(name: String, cron_expression: String, schedule: Schedule) -> Self {
        Self {
            name,
            cron_expression,
            schedule,
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: RwLock::new(None),
            last_success: RwLock::new(None),
            last_error: RwLock::new(None),
            total_duration_ms: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> TaskStats {
        let success = self.success_count.load(Ordering::Relaxed);
        let failure = self.failure_count.load(Ordering::Relaxed);
        let total = success + failure;
        let avg_duration = if total > 0 {
            self.total_duration_ms.load(Ordering::Relaxed) / total
        } else {
            0
        };

        TaskStats {
            name: self.name.clone(),
            cron_expression: self.cron_expression.clone(),
            success_count: success,
            failure_count: failure,
            last_run: *self.last_run.read(),
            last_success: *self.last_success.read(),
            last_error: self.last_error.read().clone(),
            next_run: self.schedule.upcoming(Utc).next(),
            avg_duration_ms: avg_duration,
        }
    }

    fn record_success(&self, duration_ms: u64) {
        let now = Utc::now();
        self.success_count.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.last_run.write() = Some(now);
        *self.last_success.write() = Some(now);
    }

    fn record_failure(&self, error: String, duration_ms: u64) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.last_run.write() = Some(Utc::now());
        *self.last_error.write() = Some(error);
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Whether to start the scheduler immediately
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

/// Predefined cron expressions for common schedules
pub mod schedules {
    /// Every 5 minutes
    pub const EVERY_5_MINUTES: &str = "0 */5 * * * *";
}

/// Task scheduler for recurring background tasks
pub struct TaskScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    tasks: Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>,
    running: AtomicBool,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("task_count", &self.tasks.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    /// Create a new task scheduler
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;

        let instance = Self {
            scheduler: AsyncMutex::new(scheduler),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            running: AtomicBool::new(false),
        };

        if config.auto_start {
            instance.start().await?;
        }

        info!("Task scheduler initialized");
        Ok(instance)
    }

    /// Start the scheduler
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.is_running() {
            debug!("Scheduler already running");
            return Ok(());
        }

        self.scheduler.lock().await.start().await?;
        self.running.store(true, Ordering::Relaxed);
        info!("Task scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// A stopped scheduler cannot be restarted; create a new one instead.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.is_running() {
            debug!("Scheduler already stopped");
            return Ok(());
        }

        self.scheduler.lock().await.shutdown().await?;
        self.running.store(false, Ordering::Relaxed);
        info!("Task scheduler stopped");
        Ok(())
    }

    /// Check if the scheduler is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Add a scheduled task
    ///
    /// # Arguments
    /// * `name` - Unique task name
    /// * `cron_expression` - Cron expression (6 fields: sec min hour day month weekday)
    /// * `task` - Async task function; an `Err` is recorded as a failed run
    ///
    /// # Cron Format
    /// ```text
    /// ┌──────────── second (0-59)
    /// │ ┌────────── minute (0-59)
    /// │ │ ┌──────── hour (0-23)
    /// │ │ │ ┌────── day of month (1-31)
    /// │ │ │ │ ┌──── month (1-12)
    /// │ │ │ │ │ ┌── day of week (0-6, Sunday=0)
    /// │ │ │ │ │ │
    /// * * * * * *
    /// ```
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        let schedule = validate_cron(cron_expression)?;

        if self.tasks.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        // Registered before the job so the first run already has somewhere to record to
        let metadata = Arc::new(TaskMetadata::new(
            name.to_string(),
            cron_expression.to_string(),
            schedule,
        ));
        self.tasks
            .write()
            .insert(name.to_string(), Arc::clone(&metadata));

        let job_metadata = Arc::clone(&metadata);
        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let metadata = Arc::clone(&job_metadata);
            let task_future = task();

            Box::pin(async move {
                debug!(task = %metadata.name, "Starting scheduled task");
                let start = Instant::now();
                let result = task_future.await;
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match result {
                    Ok(()) => {
                        metadata.record_success(duration_ms);
                        debug!(task = %metadata.name, duration_ms, "Task completed successfully");
                    },
                    Err(e) => {
                        error!(task = %metadata.name, error = %e, duration_ms, "Task failed");
                        metadata.record_failure(e, duration_ms);
                    },
                }
            })
        });

        let registered = match job {
            Ok(job) => self
                .scheduler
                .lock()
                .await
                .add(job)
                .await
                .map(|_| ())
                .map_err(SchedulerError::from),
            Err(e) => Err(SchedulerError::InvalidCronExpression(e.to_string())),
        };

        match registered {
            Ok(()) => {
                info!(task = %name, cron = %cron_expression, "Task scheduled");
                Ok(())
            },
            Err(e) => {
                self.tasks.write().remove(name);
                Err(e)
            },
        }
    }

    /// Get statistics for all tasks
    #[must_use]
    pub fn get_all_stats(&self) -> Vec<TaskStats> {
        self.tasks.read().values().map(|m| m.to_stats()).collect()
    }
}
