use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::{Channel, ChannelSnapshot};
use crate::ports::{ChannelSource, ChannelStore, PortError};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to fetch channels: {0}")]
    Fetch(#[source] PortError),

    #[error("failed to save channels to '{}': {source}", path.display())]
    Save { path: PathBuf, source: PortError },
}

/// Lists channels and pulls them into a local snapshot file
pub struct ChannelService {
    channel_source: Arc<dyn ChannelSource>,
    channel_store: Arc<dyn ChannelStore>,
}

impl ChannelService {
    pub fn new(channel_source: Arc<dyn ChannelSource>, channel_store: Arc<dyn ChannelStore>) -> Self {
        Self {
            channel_source,
            channel_store,
        }
    }

    pub async fn list_channels(&self) -> Result<Vec<Channel>, ChannelError> {
        self.channel_source.list_channels().await.map_err(ChannelError::Fetch)
    }

    /// Fetch all channels and write them to `path`
    pub async fn pull(&self, path: &Path) -> Result<ChannelSnapshot, ChannelError> {
        let snapshot = ChannelSnapshot::new(self.list_channels().await?);

        self.channel_store
            .save(&snapshot, path)
            .map_err(|source| ChannelError::Save {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Channels are saved to '{}' ({} rules).", path.display(), snapshot.len());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct FixedSource(Result<Vec<Channel>, String>);

    #[async_trait]
    impl ChannelSource for FixedSource {
        async fn list_channels(&self) -> Result<Vec<Channel>, PortError> {
            self.0.clone().map_err(Into::into)
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<(PathBuf, ChannelSnapshot)>>,
        fail: bool,
    }

    impl ChannelStore for RecordingStore {
        fn save(&self, snapshot: &ChannelSnapshot, path: &Path) -> Result<(), PortError> {
            if self.fail {
                return Err("permission denied".into());
            }
            self.saved.lock().unwrap().push((path.to_path_buf(), snapshot.clone()));
            Ok(())
        }
    }

    fn channels() -> Vec<Channel> {
        vec![
            Channel::new("c1", "ops mail", "email"),
            Channel::new("c2", "ops slack", "slack"),
        ]
    }

    #[tokio::test]
    async fn test_pull_saves_snapshot() {
        let store = Arc::new(RecordingStore::default());
        let service = ChannelService::new(Arc::new(FixedSource(Ok(channels()))), store.clone());

        let snapshot = service.pull(Path::new("channels.json")).await.unwrap();

        assert_eq!(snapshot.len(), 2);
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, PathBuf::from("channels.json"));
        assert_eq!(saved[0].1, snapshot);
    }

    #[tokio::test]
    async fn test_pull_fetch_failure_writes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let service = ChannelService::new(Arc::new(FixedSource(Err("timeout".to_string()))), store.clone());

        let err = service.pull(Path::new("channels.json")).await.unwrap_err();

        assert!(matches!(err, ChannelError::Fetch(_)));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pull_save_failure_names_path() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let service = ChannelService::new(Arc::new(FixedSource(Ok(channels()))), store);

        let err = service.pull(Path::new("/ro/channels.json")).await.unwrap_err();

        assert_eq!(err.to_string(), "failed to save channels to '/ro/channels.json': permission denied");
    }
}
