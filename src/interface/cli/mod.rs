mod args;
mod commands;
mod views;

pub use args::{ChannelCommands, Cli, Commands, FetchArgs, HostsArgs, RetireArgs};
pub use commands::{run, App, CliError};
pub use views::HostView;
