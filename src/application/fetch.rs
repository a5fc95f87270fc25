use std::pin::pin;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{partition, HostId, LatestMetrics, BATCH_LIMIT};
use crate::ports::{MetricSource, PortError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("at least one metric name is required")]
    NoMetricNames,

    #[error("batch {} of {total} failed (hosts: {}): {source}", index + 1, join_ids(hosts))]
    Batch {
        index: usize,
        total: usize,
        hosts: Vec<HostId>,
        source: PortError,
    },
}

fn join_ids(hosts: &[HostId]) -> String {
    hosts.iter().map(HostId::as_str).collect::<Vec<_>>().join(", ")
}

/// Fetches latest metric values for any number of hosts, one request per batch
pub struct FetchService {
    metric_source: Arc<dyn MetricSource>,
    concurrency: usize,
}

impl FetchService {
    pub fn new(metric_source: Arc<dyn MetricSource>) -> Self {
        Self {
            metric_source,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` batch requests in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch `names` for every host in `hosts`.
    ///
    /// Batches are merged in batch order whatever the concurrency, so the
    /// result is the same as a sequential run. The first failing batch fails
    /// the whole call and no partial result is returned.
    pub async fn fetch_all(&self, hosts: &[HostId], names: &[String]) -> Result<LatestMetrics, FetchError> {
        if names.is_empty() {
            return Err(FetchError::NoMetricNames);
        }

        let batches = partition(hosts, BATCH_LIMIT);
        let total = batches.len();
        debug!(hosts = hosts.len(), batches = total, "Fetching latest metrics");

        let metric_source = &self.metric_source;
        let mut results = pin!(stream::iter(batches.into_iter().enumerate())
            .map(|(index, batch)| async move {
                match metric_source.fetch_latest(&batch, names).await {
                    Ok(latest) => {
                        debug!(batch = index + 1, total, hosts = batch.len(), "Fetched batch");
                        Ok(latest)
                    }
                    Err(source) => {
                        warn!(batch = index + 1, total, "Batch request failed: {}", source);
                        Err(FetchError::Batch {
                            index,
                            total,
                            hosts: batch,
                            source,
                        })
                    }
                }
            })
            .buffered(self.concurrency));

        let mut merged = LatestMetrics::new();
        while let Some(latest) = results.try_next().await? {
            merged.merge(latest);
        }

        Ok(merged)
    }
}
