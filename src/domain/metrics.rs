use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::HostId;

/// Latest value of a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub time: i64,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Metric name to latest point. `None` when the host has no data for the metric.
pub type HostMetrics = BTreeMap<String, Option<MetricPoint>>;

/// Latest metric values keyed by host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatestMetrics(BTreeMap<HostId, HostMetrics>);

impl LatestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host: impl Into<HostId>, metrics: HostMetrics) {
        self.0.insert(host.into(), metrics);
    }

    /// Fold `incoming` into `self`. A host already present is replaced by the
    /// incoming entry (last write wins).
    pub fn merge(&mut self, incoming: LatestMetrics) {
        self.0.extend(incoming.0);
    }

    pub fn get(&self, host: &HostId) -> Option<&HostMetrics> {
        self.0.get(host)
    }

    pub fn contains(&self, host: &HostId) -> bool {
        self.0.contains_key(host)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &HostId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(HostId, HostMetrics)> for LatestMetrics {
    fn from_iter<I: IntoIterator<Item = (HostId, HostMetrics)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(host: &str, name: &str, value: f64) -> LatestMetrics {
        let mut metrics = HostMetrics::new();
        metrics.insert(name.to_string(), Some(MetricPoint::new(1_700_000_000, value)));
        let mut latest = LatestMetrics::new();
        latest.insert(host, metrics);
        latest
    }

    #[test]
    fn test_merge_disjoint_is_commutative() {
        let a = single("h1", "loadavg5", 0.5);
        let b = single("h2", "loadavg5", 1.5);

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 2);
        assert!(ab.contains(&HostId::from("h1")));
        assert!(ab.contains(&HostId::from("h2")));
    }

    #[test]
    fn test_merge_collision_last_write_wins() {
        let mut acc = single("h1", "loadavg5", 0.5);
        acc.merge(single("h1", "loadavg5", 9.0));

        assert_eq!(acc.len(), 1);
        let point = acc.get(&HostId::from("h1")).unwrap()["loadavg5"].as_ref().unwrap();
        assert_eq!(point.value, 9.0);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut acc = LatestMetrics::new();
        acc.merge(LatestMetrics::new());
        assert!(acc.is_empty());

        acc.merge(single("h1", "memory.used", 1024.0));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_deserialize_with_missing_values() {
        let json = r#"{
            "h1": {"loadavg5": {"time": 1700000000, "value": 0.25}},
            "h2": {"loadavg5": null}
        }"#;
        let latest: LatestMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(latest.len(), 2);
        assert!(latest.get(&HostId::from("h2")).unwrap()["loadavg5"].is_none());

        let back = serde_json::to_value(&latest).unwrap();
        assert_eq!(back["h1"]["loadavg5"]["value"], 0.25);
        assert!(back["h2"]["loadavg5"].is_null());
    }
}
