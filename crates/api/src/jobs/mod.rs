//! Background job scheduler and job implementations.

mod pool_metrics;
mod rate_limit_sweep;
mod scheduler;
mod theme_resync;

pub use pool_metrics::PoolMetricsJob;
pub use rate_limit_sweep::RateLimitSweepJob;
pub use scheduler::{Job, JobError, JobFrequency, JobScheduler};
pub use theme_resync::ThemeResyncJob;
