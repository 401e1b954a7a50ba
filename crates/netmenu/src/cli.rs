//! Clap derive structures for the `netmenu` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netmenu -- all-sites listing service and client
#[derive(Debug, Parser)]
#[command(
    name = "netmenu",
    version,
    about = "Serve and browse the network-wide all-sites menu",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Verbose logging (debug level)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the listing server
    Serve(ServeArgs),
    /// Fetch the full listing from a running server and print it
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Path to a netmenu.toml configuration file
    #[arg(long, short = 'c', env = "NETMENU_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Server root URL
    #[arg(
        long,
        short = 'u',
        env = "NETMENU_URL",
        default_value = "http://127.0.0.1:8787"
    )]
    pub url: Url,

    /// Bearer token holding network-management privilege
    #[arg(long, short = 't', env = "NETMENU_TOKEN", hide_env = true)]
    pub token: String,

    /// Case-insensitive substring filter over canonical site names
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Where to persist the local site index between runs
    #[arg(long)]
    pub index_file: Option<PathBuf>,
}
