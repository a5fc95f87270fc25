use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::domain::ChannelSnapshot;
use crate::json;
use crate::ports::{ChannelStore, PortError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes channel snapshots as pretty JSON files
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileStore;

impl JsonFileStore {
    pub fn new() -> Self {
        Self
    }

    fn write(&self, snapshot: &ChannelSnapshot, path: &Path) -> Result<(), StoreError> {
        let data = json::to_pretty_string(snapshot)?;
        fs::write(path, data)?;
        debug!(path = %path.display(), channels = snapshot.len(), "Wrote channel snapshot");
        Ok(())
    }
}

impl ChannelStore for JsonFileStore {
    fn save(&self, snapshot: &ChannelSnapshot, path: &Path) -> Result<(), PortError> {
        Ok(self.write(snapshot, path)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::Channel;

    #[test]
    fn test_save_writes_wrapped_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.json");
        let snapshot = ChannelSnapshot::new(vec![
            Channel::new("c1", "ops mail", "email").with_setting("emails", json!(["ops@example.com"]))
        ]);

        JsonFileStore::new().save(&snapshot, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n    \"channels\": [\n"));
        assert!(written.ends_with("}\n"));
        let back: ChannelSnapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.json");
        fs::write(&path, "stale content that is longer than the new snapshot ...").unwrap();

        JsonFileStore::new().save(&ChannelSnapshot::new(Vec::new()), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n    \"channels\": []\n}\n");
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("channels.json");
        assert!(JsonFileStore::new().save(&ChannelSnapshot::new(Vec::new()), &path).is_err());
    }
}
