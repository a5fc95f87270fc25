use std::sync::Arc;

use crate::domain::{Host, HostFilter, HostId};
use crate::ports::{HostRegistry, PortError};

/// Read-only host queries
pub struct InventoryService {
    host_registry: Arc<dyn HostRegistry>,
}

impl InventoryService {
    pub fn new(host_registry: Arc<dyn HostRegistry>) -> Self {
        Self { host_registry }
    }

    /// List hosts matching `filter`, sorted by name
    pub async fn list_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>, PortError> {
        let mut hosts = self.host_registry.list_hosts(filter).await?;
        hosts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(hosts)
    }

    pub async fn get_host(&self, id: &HostId) -> Result<Host, PortError> {
        self.host_registry.get_host(id).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FixedRegistry(Vec<Host>);

    #[async_trait]
    impl HostRegistry for FixedRegistry {
        async fn list_hosts(&self, _filter: &HostFilter) -> Result<Vec<Host>, PortError> {
            Ok(self.0.clone())
        }

        async fn get_host(&self, id: &HostId) -> Result<Host, PortError> {
            self.0
                .iter()
                .find(|h| &h.id == id)
                .cloned()
                .ok_or_else(|| format!("host {} not found", id).into())
        }

        async fn retire_host(&self, _id: &HostId) -> Result<(), PortError> {
            Err("read-only".into())
        }
    }

    fn registry() -> Arc<FixedRegistry> {
        Arc::new(FixedRegistry(vec![
            Host::new("h1", "web").with_status("working"),
            Host::new("h2", "db").with_status("standby"),
        ]))
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let service = InventoryService::new(registry());
        let hosts = service.list_hosts(&HostFilter::default()).await.unwrap();
        let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["db", "web"]);
    }

    #[tokio::test]
    async fn test_get_host_not_found() {
        let service = InventoryService::new(registry());
        assert!(service.get_host(&HostId::from("nope")).await.is_err());
        assert_eq!(service.get_host(&HostId::from("h1")).await.unwrap().name, "web");
    }
}
