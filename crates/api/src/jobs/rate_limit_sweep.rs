//! Drops expired rate-limit windows so the limiter map stays bounded.

use std::sync::Arc;

use super::scheduler::{Job, JobError, JobFrequency};
use crate::middleware::FixedWindowLimiter;

pub struct RateLimitSweepJob {
    limiter: Arc<FixedWindowLimiter>,
}

impl RateLimitSweepJob {
    pub fn new(limiter: Arc<FixedWindowLimiter>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitSweepJob {
    fn name(&self) -> &'static str {
        "rate_limit_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), JobError> {
        let removed = self.limiter.sweep_expired();
        let remaining = self.limiter.len();
        metrics::gauge!("rate_limit_windows").set(remaining as f64);
        if removed > 0 {
            tracing::debug!(removed, remaining, "Swept expired rate-limit windows");
        }
        Ok(())
    }
}
