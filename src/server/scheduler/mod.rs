//! Scheduler for periodic maintenance tasks.
//!
//! This module provides a job scheduler that runs housekeeping in the background while the
//! server is up. Its only job today sweeps expired client windows out of the rate limiters so
//! clients that stopped sending requests don't keep occupying memory.

use std::{future::Future, sync::Arc, time::Duration};

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, middleware::rate_limit::RateLimiters};

pub mod config;


/// Job scheduler for background maintenance tasks.
pub struct Scheduler {
    limiters: RateLimiters,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(limiters: RateLimiters) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { limiters, sched })
    }

    /// Registers all jobs and starts the scheduler.
    ///
    /// The following jobs are registered:
    /// - Rate limiter sweep, every [`config::rate_limit::SWEEP_INTERVAL`]
    ///
    /// # Returns
    /// - `Ok(JobScheduler)` - Handle of the running scheduler, used to shut it down
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(mut self) -> Result<JobScheduler, Error> {
        self.schedule_repeated(
            config::rate_limit::SWEEP_INTERVAL,
            "rate limiter sweep",
            sweep_rate_limiters,
        )
        .await?;

        self.sched.start().await?;

        Ok(self.sched)
    }

    /// Schedules a job running `function` every `interval`.
    ///
    /// # Arguments
    /// - `interval` - Time between runs, the first run happens one interval after start
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async function receiving the rate limiters and returning the number of
    ///   entries it processed
    pub async fn schedule_repeated<F, Fut>(
        &mut self,
        interval: Duration,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(RateLimiters) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let limiters = self.limiters.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_repeated_async(interval, move |_, _| {
                let limiters = limiters.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(limiters).await {
                        Ok(count) => tracing::debug!("Ran {}, {} entries processed", name, count),
                        Err(e) => tracing::error!("Error running {}: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}

/// Removes expired client windows from every rate limiter.
pub async fn sweep_rate_limiters(limiters: RateLimiters) -> Result<usize, Error> {
    let removed = limiters.sweep_expired();

    if removed > 0 {
        tracing::info!("Swept {} expired rate limit window(s)", removed);
    }

    Ok(removed)
}
