//! HTTP middleware components.

pub mod client_ip;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security_headers;
pub mod session;
pub mod trace_id;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, FixedWindowLimiter, RateLimitPolicy, RateLimitScope};
pub use security_headers::{security_headers_middleware, SecurityHeaderOptions};
pub use session::{require_admin_api, require_admin_page, AdminSession};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
