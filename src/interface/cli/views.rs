use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Host;

/// Host as printed by `hosts` and `status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub status: String,
    pub memo: String,
    pub role_fullnames: Vec<String>,
    pub is_retired: bool,
    pub created_at: String,
    pub ip_addresses: BTreeMap<String, String>,
}

impl From<&Host> for HostView {
    fn from(host: &Host) -> Self {
        Self {
            id: host.id.to_string(),
            name: host.name.clone(),
            display_name: host.display_name.clone(),
            status: host.status.clone(),
            memo: host.memo.clone(),
            role_fullnames: host.role_fullnames(),
            is_retired: host.is_retired,
            created_at: host
                .created_at_utc()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            ip_addresses: host.ip_addresses(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_view_fields() {
        let host = Host::new("h1", "web-01")
            .with_status("working")
            .with_role("shop", "app")
            .with_created_at(1_500_000_000);

        let view = serde_json::to_value(HostView::from(&host)).unwrap();

        assert_eq!(view["id"], "h1");
        assert_eq!(view["roleFullnames"], serde_json::json!(["shop:app"]));
        assert_eq!(view["createdAt"], "2017-07-14T02:40:00+00:00");
        assert!(view.get("displayName").is_none());
    }
}
