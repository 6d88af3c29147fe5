pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dates;

#[derive(Parser)]
#[command(name = "rss-checker", version)]
#[command(about = "Watch RSS feeds for items matching patterns", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a single feed, once or on an interval
    Check(CheckArgs),
    /// Check every host from the config file until interrupted
    Daemon {
        /// Config file (default: ~/.config/rss-checker/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Site to check, e.g. "fly4free.pl" or "https://example.com/rss.xml"
    pub site: String,

    /// Case-insensitive regular expression searched in titles and categories
    #[arg(short, long = "pattern", required = true)]
    pub patterns: Vec<String>,

    /// Send matches to this address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Ignore items published before this (e.g. "2 hours ago", "2024-01-01")
    #[arg(short, long, default_value = "1 day ago")]
    pub from_date: String,

    /// Repeat the check on this interval (e.g. "90", "30m", "1h"); 0 checks once
    #[arg(short, long, default_value = "0", value_parser = dates::parse_interval)]
    pub interval: u64,

    /// Don't print matches to the console
    #[arg(short, long)]
    pub quiet: bool,

    #[arg(long, default_value = "localhost")]
    pub smtp_host: String,

    #[arg(long, default_value_t = 25)]
    pub smtp_port: u16,
}
