use std::future::Future;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::args::{ChannelCommands, Cli, Commands, FetchArgs, HostsArgs, RetireArgs};
use super::views::HostView;
use crate::adapters::{ApiClient, ApiError, JsonFileStore, TerminalConfirm};
use crate::application::{
    ChannelError, ChannelService, FetchError, FetchService, InventoryService, RetireError, RetireOutcome,
    RetireService,
};
use crate::config::{AgentConfig, Config, ConfigError};
use crate::domain::HostId;
use crate::json;
use crate::ports::{ChannelSource, ChannelStore, Confirm, HostRegistry, MetricSource, PortError};

/// Errors surfaced to the process exit path
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Retire(#[from] RetireError),

    #[error("{0}")]
    Channel(#[from] ChannelError),

    #[error("request failed: {0}")]
    Request(#[source] PortError),

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),

    #[error("interrupted")]
    Interrupted,
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Output(serde_json::Error::io(err))
    }
}

/// Services wired to their ports, one per command family
pub struct App {
    inventory: InventoryService,
    fetch: FetchService,
    retire: RetireService,
    channels: ChannelService,
    agent: AgentConfig,
}

impl App {
    pub fn new(
        host_registry: Arc<dyn HostRegistry>,
        metric_source: Arc<dyn MetricSource>,
        channel_source: Arc<dyn ChannelSource>,
        channel_store: Arc<dyn ChannelStore>,
        confirm: Arc<dyn Confirm>,
        agent: AgentConfig,
    ) -> Self {
        Self {
            inventory: InventoryService::new(host_registry.clone()),
            fetch: FetchService::new(metric_source),
            retire: RetireService::new(host_registry, confirm),
            channels: ChannelService::new(channel_source, channel_store),
            agent,
        }
    }

    /// Wire every port to the HTTP client and the local terminal/filesystem
    pub fn with_api(api: Arc<ApiClient>, agent: AgentConfig) -> Self {
        Self::new(
            api.clone(),
            api.clone(),
            api,
            Arc::new(JsonFileStore::new()),
            Arc::new(TerminalConfirm),
            agent,
        )
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch = self.fetch.with_concurrency(concurrency);
        self
    }

    /// Run `command`, writing its output to `out`.
    ///
    /// Retirement checks `cancel` between hosts; every other command is
    /// abandoned as soon as `cancel` fires.
    pub async fn execute<W: Write>(
        &self,
        command: Commands,
        out: &mut W,
        cancel: &CancellationToken,
    ) -> Result<(), CliError> {
        match command {
            Commands::Retire(args) => self.retire(args, cancel).await,
            Commands::Hosts(args) => interruptible(self.hosts(&args, out), cancel).await,
            Commands::Status { host_id, verbose } => {
                interruptible(self.status(&HostId::new(host_id), verbose, out), cancel).await
            }
            Commands::Fetch(args) => interruptible(self.fetch(args, out), cancel).await,
            Commands::Channels { command } => match command.unwrap_or(ChannelCommands::List) {
                ChannelCommands::List => interruptible(self.list_channels(out), cancel).await,
                ChannelCommands::Pull { file_path, verbose } => {
                    interruptible(self.pull_channels(&file_path, verbose, out), cancel).await
                }
            },
        }
    }

    async fn hosts<W: Write>(&self, args: &HostsArgs, out: &mut W) -> Result<(), CliError> {
        let hosts = self
            .inventory
            .list_hosts(&args.filter())
            .await
            .map_err(CliError::Request)?;
        let views: Vec<HostView> = hosts.iter().map(HostView::from).collect();
        print_json(out, &views)
    }

    async fn status<W: Write>(&self, id: &HostId, verbose: bool, out: &mut W) -> Result<(), CliError> {
        let host = self.inventory.get_host(id).await.map_err(CliError::Request)?;
        if verbose {
            print_json(out, &host)
        } else {
            print_json(out, &HostView::from(&host))
        }
    }

    async fn fetch<W: Write>(&self, args: FetchArgs, out: &mut W) -> Result<(), CliError> {
        let hosts: Vec<HostId> = args.host_ids.into_iter().map(HostId::from).collect();
        let latest = self.fetch.fetch_all(&hosts, &args.names).await?;
        print_json(out, &latest)
    }

    async fn retire(&self, args: RetireArgs, cancel: &CancellationToken) -> Result<(), CliError> {
        let hosts = if args.host_ids.is_empty() {
            let local = self.agent.local_host_id()?.ok_or_else(|| {
                CliError::Usage("retire requires at least one host ID (no local agent host ID found)".to_string())
            })?;
            debug!(host_id = %local, "Retiring the local agent host");
            vec![local]
        } else {
            args.host_ids.into_iter().map(HostId::from).collect()
        };

        match self.retire.retire_all(&hosts, args.force, cancel).await {
            Ok(RetireOutcome::Declined) | Ok(RetireOutcome::Retired(_)) => Ok(()),
            Err(err) => {
                if !err.retired().is_empty() {
                    let retired: Vec<&str> = err.retired().iter().map(HostId::as_str).collect();
                    warn!("Already retired before the failure: {}", retired.join(", "));
                }
                Err(err.into())
            }
        }
    }

    async fn list_channels<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        let channels = self.channels.list_channels().await?;
        print_json(out, &channels)
    }

    async fn pull_channels<W: Write>(&self, path: &Path, verbose: bool, out: &mut W) -> Result<(), CliError> {
        let snapshot = self.channels.pull(path).await?;
        if verbose {
            print_json(out, &snapshot.channels)?;
        }
        Ok(())
    }
}

async fn interruptible<F>(command: F, cancel: &CancellationToken) -> Result<(), CliError>
where
    F: Future<Output = Result<(), CliError>>,
{
    tokio::select! {
        result = command => result,
        _ = cancel.cancelled() => Err(CliError::Interrupted),
    }
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    json::write_pretty(out, value)?;
    out.flush()?;
    Ok(())
}

/// Build the application from parsed arguments and run the selected command
pub async fn run(cli: Cli, config: &Config, cancel: &CancellationToken) -> Result<(), CliError> {
    let agent = AgentConfig::load(&cli.conf)?;
    let api_config = agent.api_config(cli.apikey.as_deref(), cli.apibase.as_deref(), config.request_timeout)?;
    debug!(base_url = %api_config.base_url, "Using monitoring API");

    let api = Arc::new(ApiClient::new(api_config)?);
    let app = App::with_api(api, agent).with_fetch_concurrency(config.fetch_concurrency);

    let mut stdout = io::stdout();
    app.execute(cli.command, &mut stdout, cancel).await
}
