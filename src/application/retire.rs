use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domain::HostId;
use crate::ports::{Confirm, HostRegistry, PortError};

#[derive(Debug, Error)]
pub enum RetireError {
    #[error("no hosts to retire")]
    NoTargets,

    #[error("confirmation failed: {0}")]
    Confirm(#[source] PortError),

    #[error("failed to retire host {host_id}: {source}")]
    Failed {
        host_id: HostId,
        retired: Vec<HostId>,
        source: PortError,
    },

    #[error("retirement interrupted after {} of {total} hosts", retired.len())]
    Interrupted { retired: Vec<HostId>, total: usize },
}

impl RetireError {
    /// Hosts retired before the run stopped. These are not rolled back.
    pub fn retired(&self) -> &[HostId] {
        match self {
            Self::Failed { retired, .. } | Self::Interrupted { retired, .. } => retired,
            Self::NoTargets | Self::Confirm(_) => &[],
        }
    }
}

/// Result of a retirement run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetireOutcome {
    /// The operator answered no; nothing was touched
    Declined,
    /// Every host was retired, in this order
    Retired(Vec<HostId>),
}

/// Prompt listing every target, one per line
pub fn confirmation_prompt(hosts: &[HostId]) -> String {
    let listed: Vec<&str> = hosts.iter().map(HostId::as_str).collect();
    format!("Retire following hosts.\n  {}\nAre you sure?", listed.join("\n  "))
}

/// Retires hosts one by one after confirmation, stopping at the first failure
pub struct RetireService {
    host_registry: Arc<dyn HostRegistry>,
    confirm: Arc<dyn Confirm>,
}

impl RetireService {
    pub fn new(host_registry: Arc<dyn HostRegistry>, confirm: Arc<dyn Confirm>) -> Self {
        Self { host_registry, confirm }
    }

    /// Retire every host in `hosts`, in order.
    ///
    /// Unless `force` is set the operator is asked first (default yes). One
    /// request is issued per host; duplicates are retired twice. The first
    /// failure ends the run and later hosts are never attempted. A cancelled
    /// `cancel` token stops the run before the next host is started.
    pub async fn retire_all(
        &self,
        hosts: &[HostId],
        force: bool,
        cancel: &CancellationToken,
    ) -> Result<RetireOutcome, RetireError> {
        if hosts.is_empty() {
            return Err(RetireError::NoTargets);
        }

        if !force {
            let accepted = self
                .confirm
                .confirm(&confirmation_prompt(hosts), true)
                .map_err(RetireError::Confirm)?;
            if !accepted {
                info!("retirement is canceled.");
                return Ok(RetireOutcome::Declined);
            }
        }

        let mut retired = Vec::with_capacity(hosts.len());
        for host_id in hosts {
            if cancel.is_cancelled() {
                warn!(retired = retired.len(), remaining = hosts.len() - retired.len(), "Retirement interrupted");
                return Err(RetireError::Interrupted {
                    retired,
                    total: hosts.len(),
                });
            }

            match self.host_registry.retire_host(host_id).await {
                Ok(()) => {
                    info!("retired {}", host_id);
                    retired.push(host_id.clone());
                }
                Err(source) => {
                    error!(host_id = %host_id, retired = retired.len(), "Failed to retire host: {}", source);
                    return Err(RetireError::Failed {
                        host_id: host_id.clone(),
                        retired,
                        source,
                    });
                }
            }
        }

        Ok(RetireOutcome::Retired(retired))
    }
}
