use async_trait::async_trait;

use super::PortError;
use crate::domain::{HostId, LatestMetrics};

/// Port for fetching latest metric values from the monitoring service
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch the latest values of `names` for every host in `hosts` in one request
    async fn fetch_latest(&self, hosts: &[HostId], names: &[String]) -> Result<LatestMetrics, PortError>;
}
