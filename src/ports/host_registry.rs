use async_trait::async_trait;

use super::PortError;
use crate::domain::{Host, HostFilter, HostId};

/// Port for host inventory operations
#[async_trait]
pub trait HostRegistry: Send + Sync {
    /// List hosts matching the filter
    async fn list_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>, PortError>;

    /// Get a single host
    async fn get_host(&self, id: &HostId) -> Result<Host, PortError>;

    /// Retire a host. Irreversible.
    async fn retire_host(&self, id: &HostId) -> Result<(), PortError>;
}
