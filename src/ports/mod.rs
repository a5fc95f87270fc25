pub mod channel_source;
pub mod channel_store;
pub mod confirm;
pub mod host_registry;
pub mod metric_source;

pub use channel_source::ChannelSource;
pub use channel_store::ChannelStore;
pub use confirm::Confirm;
pub use host_registry::HostRegistry;
pub use metric_source::MetricSource;

/// Error type shared by all ports
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
