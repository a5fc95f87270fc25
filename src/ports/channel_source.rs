use async_trait::async_trait;

use super::PortError;
use crate::domain::Channel;

/// Port for reading notification channels
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn list_channels(&self) -> Result<Vec<Channel>, PortError>;
}
