//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_AGENT_CONF;
use crate::domain::HostFilter;

/// Manage hosts, metrics and channels on the monitoring service.
#[derive(Parser, Debug, Clone)]
#[command(name = "mkctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Agent configuration file to read the API key, API base and agent root from.
    #[arg(short, long, global = true, env = "MKCTL_CONF", default_value = DEFAULT_AGENT_CONF)]
    pub conf: PathBuf,

    /// API base URL.
    #[arg(long, global = true, env = "MACKEREL_APIBASE")]
    pub apibase: Option<String>,

    /// API key.
    #[arg(long, global = true, env = "MACKEREL_APIKEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List hosts.
    Hosts(HostsArgs),

    /// Show the status of a host.
    Status {
        /// Host ID to inspect.
        host_id: String,

        /// Print every field the service returns.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Fetch latest metric values.
    ///
    /// Requests are split into batches of 100 hosts.
    Fetch(FetchArgs),

    /// Retire hosts.
    ///
    /// Be careful: retirement is irreversible. Hosts are retired one by one
    /// and the run stops at the first failure.
    Retire(RetireArgs),

    /// Notification channels. Lists channels when no subcommand is given.
    Channels {
        /// Channels subcommand to execute.
        #[command(subcommand)]
        command: Option<ChannelCommands>,
    },
}

/// Arguments for the hosts command.
#[derive(Args, Debug, Clone, Default)]
pub struct HostsArgs {
    /// Show hosts with this name.
    #[arg(long)]
    pub name: Option<String>,

    /// Show hosts belonging to this service.
    #[arg(short, long)]
    pub service: Option<String>,

    /// Show hosts with this role (requires --service). Repeatable.
    #[arg(short, long = "role")]
    pub roles: Vec<String>,

    /// Show hosts with this status. Repeatable.
    #[arg(long = "status")]
    pub statuses: Vec<String>,
}

impl HostsArgs {
    pub fn filter(&self) -> HostFilter {
        HostFilter {
            name: self.name.clone(),
            service: self.service.clone(),
            roles: self.roles.clone(),
            statuses: self.statuses.clone(),
        }
    }
}

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Metric name to fetch. Repeatable.
    #[arg(short = 'n', long = "name", required = true)]
    pub names: Vec<String>,

    /// Hosts to fetch metrics for.
    #[arg(required = true)]
    pub host_ids: Vec<String>,
}

/// Arguments for the retire command.
#[derive(Args, Debug, Clone)]
pub struct RetireArgs {
    /// Retire without asking for confirmation.
    #[arg(long)]
    pub force: bool,

    /// Hosts to retire. Defaults to the local agent's host.
    pub host_ids: Vec<String>,
}

/// Channels subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ChannelCommands {
    /// List channels.
    List,

    /// Save channels to a local JSON file.
    Pull {
        /// File to write.
        #[arg(short = 'F', long, default_value = "channels.json")]
        file_path: PathBuf,

        /// Also print the channels.
        #[arg(short, long)]
        verbose: bool,
    },
}
