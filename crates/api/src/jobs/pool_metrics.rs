//! Background job to record connection pool metrics.

use std::sync::Arc;

use persistence::PgStore;

use super::scheduler::{Job, JobError, JobFrequency};

/// Records pool gauges for the Postgres-backed store.
pub struct PoolMetricsJob {
    store: Arc<PgStore>,
}

impl PoolMetricsJob {
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(10)
    }

    async fn execute(&self) -> Result<(), JobError> {
        persistence::metrics::record_pool_metrics(self.store.pool());
        Ok(())
    }
}
