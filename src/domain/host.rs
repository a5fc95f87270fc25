use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a host registered with the monitoring service
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for HostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Network interface as reported by the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Host entity
///
/// Fields the client does not interpret (agent meta, checks, ...) are kept in
/// `extra` so a host round-trips without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: HostId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub is_retired: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub interfaces: Vec<HostInterface>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Host {
    pub fn new(id: impl Into<HostId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: None,
            status: String::new(),
            memo: String::new(),
            roles: BTreeMap::new(),
            is_retired: false,
            created_at: 0,
            interfaces: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_role(mut self, service: impl Into<String>, role: impl Into<String>) -> Self {
        self.roles.entry(service.into()).or_default().push(role.into());
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Roles as `service:role` strings
    pub fn role_fullnames(&self) -> Vec<String> {
        self.roles
            .iter()
            .flat_map(|(service, roles)| roles.iter().map(move |role| format!("{}:{}", service, role)))
            .collect()
    }

    /// Interface name to IP address, for interfaces that report one
    pub fn ip_addresses(&self) -> BTreeMap<String, String> {
        self.interfaces
            .iter()
            .filter_map(|i| i.ip_address.as_ref().map(|ip| (i.name.clone(), ip.clone())))
            .collect()
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.created_at, 0)
    }
}

/// Query filter for listing hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFilter {
    pub name: Option<String>,
    pub service: Option<String>,
    pub roles: Vec<String>,
    pub statuses: Vec<String>,
}

impl HostFilter {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Query pairs understood by `GET /api/v0/hosts`
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.as_str()));
        }
        if let Some(service) = &self.service {
            pairs.push(("service", service.as_str()));
            // roles are only meaningful within a service
            pairs.extend(self.roles.iter().map(|r| ("role", r.as_str())));
        }
        pairs.extend(self.statuses.iter().map(|s| ("status", s.as_str())));
        pairs
    }
}
