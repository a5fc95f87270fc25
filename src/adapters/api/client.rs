use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use super::{ApiConfig, ApiError};
use crate::domain::{Channel, Host, HostFilter, HostId, LatestMetrics};
use crate::ports::{ChannelSource, HostRegistry, MetricSource, PortError};

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Deserialize)]
struct HostsResponse {
    hosts: Vec<Host>,
}

#[derive(Deserialize)]
struct HostResponse {
    host: Host,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestResponse {
    tsdb_latest: LatestMetrics,
}

#[derive(Deserialize)]
struct ChannelsResponse {
    channels: Vec<Channel>,
}

/// HTTP adapter for the monitoring API (`/api/v0`)
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mkctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })
    }

    fn hosts_url(&self, filter: &HostFilter) -> Result<Url, ApiError> {
        let mut url = self.url("api/v0/hosts")?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn host_url(&self, id: &HostId, suffix: &str) -> Result<Url, ApiError> {
        let mut url = self.url("api/v0/hosts")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .push(id.as_str())
            .extend(suffix.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn latest_url(&self, hosts: &[HostId], names: &[String]) -> Result<Url, ApiError> {
        let mut url = self.url("api/v0/tsdb/latest")?;
        {
            let mut query = url.query_pairs_mut();
            for host in hosts {
                query.append_pair("hostId", host.as_str());
            }
            for name in names {
                query.append_pair("name", name);
            }
        }
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url.path());
        trace!("GET {}", url);
        let response = self.http.get(url).header(API_KEY_HEADER, &self.api_key).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_empty(&self, url: Url) -> Result<(), ApiError> {
        debug!("POST {}", url.path());
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Parse the base URL so relative API paths join below it
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl MetricSource for ApiClient {
    async fn fetch_latest(&self, hosts: &[HostId], names: &[String]) -> Result<LatestMetrics, PortError> {
        let url = self.latest_url(hosts, names)?;
        let response: LatestResponse = self.get(url).await?;
        Ok(response.tsdb_latest)
    }
}

#[async_trait]
impl HostRegistry for ApiClient {
    async fn list_hosts(&self, filter: &HostFilter) -> Result<Vec<Host>, PortError> {
        let response: HostsResponse = self.get(self.hosts_url(filter)?).await?;
        Ok(response.hosts)
    }

    async fn get_host(&self, id: &HostId) -> Result<Host, PortError> {
        let response: HostResponse = self.get(self.host_url(id, "")?).await?;
        Ok(response.host)
    }

    async fn retire_host(&self, id: &HostId) -> Result<(), PortError> {
        self.post_empty(self.host_url(id, "retire")?).await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelSource for ApiClient {
    async fn list_channels(&self) -> Result<Vec<Channel>, PortError> {
        let response: ChannelsResponse = self.get(self.url("api/v0/channels")?).await?;
        Ok(response.channels)
    }
}
