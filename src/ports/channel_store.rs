use std::path::Path;

use super::PortError;
use crate::domain::ChannelSnapshot;

/// Port for persisting channel snapshots
pub trait ChannelStore: Send + Sync {
    /// Write the snapshot to `path`, replacing any existing content
    fn save(&self, snapshot: &ChannelSnapshot, path: &Path) -> Result<(), PortError>;
}
