//! Cron scheduler for periodic maintenance sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use helpdesk_core::config::WorkerConfig;
use helpdesk_core::error::AppError;
use helpdesk_service::NotificationService;

/// Cron-based scheduler for the periodic maintenance sweeps.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Notification service that owns the state being swept
    notifier: Arc<NotificationService>,
    /// Cron expressions for each sweep
    config: WorkerConfig,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler
    pub async fn new(
        notifier: Arc<NotificationService>,
        config: WorkerConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            notifier,
            config,
        })
    }

    /// Register all maintenance sweeps
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_retry_drain().await?;
        self.register_cache_sweep().await?;
        self.register_retention().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler shut down");
        Ok(())
    }

    /// Retry queue drain, every 30 seconds
    async fn register_retry_drain(&self) -> Result<(), AppError> {
        let notifier = Arc::clone(&self.notifier);
        let job = CronJob::new_async(
            self.config.retry_drain_schedule.as_str(),
            move |_uuid, _lock| {
                let notifier = Arc::clone(&notifier);
                Box::pin(async move {
                    let processed = notifier.drain_retries().await;
                    if processed > 0 {
                        tracing::debug!(processed, "Retry drain sweep finished");
                    }
                })
            },
        )
        .map_err(|e| {
            AppError::internal(format!("Failed to create retry_drain schedule: {}", e))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add retry_drain schedule: {}", e)))?;

        tracing::info!(
            schedule = %self.config.retry_drain_schedule,
            "Registered: retry_drain"
        );
        Ok(())
    }

    /// Directory cache and rate limiter sweep, every 10 minutes
    async fn register_cache_sweep(&self) -> Result<(), AppError> {
        let notifier = Arc::clone(&self.notifier);
        let job = CronJob::new_async(
            self.config.cache_sweep_schedule.as_str(),
            move |_uuid, _lock| {
                let notifier = Arc::clone(&notifier);
                Box::pin(async move {
                    notifier.sweep_caches();
                })
            },
        )
        .map_err(|e| {
            AppError::internal(format!("Failed to create cache_sweep schedule: {}", e))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add cache_sweep schedule: {}", e)))?;

        tracing::info!(
            schedule = %self.config.cache_sweep_schedule,
            "Registered: cache_sweep"
        );
        Ok(())
    }

    /// Stored-notification retention, daily
    async fn register_retention(&self) -> Result<(), AppError> {
        let notifier = Arc::clone(&self.notifier);
        let job = CronJob::new_async(
            self.config.retention_schedule.as_str(),
            move |_uuid, _lock| {
                let notifier = Arc::clone(&notifier);
                Box::pin(async move {
                    if let Err(e) = notifier.apply_retention().await {
                        tracing::error!("Notification retention sweep failed: {}", e);
                    }
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create retention schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add retention schedule: {}", e)))?;

        tracing::info!(
            schedule = %self.config.retention_schedule,
            "Registered: retention"
        );
        Ok(())
    }
}
