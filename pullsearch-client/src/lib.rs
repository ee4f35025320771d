pub mod api;
pub mod metrics;
pub mod session;


pub use api::PullPushClient;
pub use metrics::{ApiMetrics, MetricsCollector};
pub use session::{SearchBackend, SearchSession};
