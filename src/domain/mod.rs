pub mod batch;
pub mod channel;
pub mod host;
pub mod metrics;

pub use batch::{partition, BATCH_LIMIT};
pub use channel::{Channel, ChannelSnapshot};
pub use host::{Host, HostFilter, HostId, HostInterface};
pub use metrics::{HostMetrics, LatestMetrics, MetricPoint};
