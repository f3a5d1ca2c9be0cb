//! # crashcatcher CLI
//!
//! Locate and read crash reports written by the crashcatcher handler.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;

use crashcatcher::config::{Config, StorageConfig};
use crashcatcher::logging::{init_logging, Component, LogLevel};
use crashcatcher::path::{resolve_cache_root, resolve_crash_log_directory_named};
use crashcatcher::{HostContext, PackageInfo};

mod reports;

/// crashcatcher - crash report locator
#[derive(Parser)]
#[command(name = "crashcatcher")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Application name; scopes the default internal cache dir
    #[arg(long, default_value = "crashcatcher", env = "CRASHCATCHER_APP")]
    app: String,

    /// Internal cache root (overrides config)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// External cache root (overrides config)
    #[arg(long, value_name = "DIR")]
    external_cache_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the directory crash reports are written to
    Path,

    /// List crash reports, oldest first
    List,

    /// Print one crash report
    Show {
        /// Report file name, or "latest"
        #[arg(value_name = "NAME", default_value = "latest")]
        name: String,
    },

    /// Configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print config file locations
    Path,
    /// Print the effective config as TOML
    Show,
    /// Print the default config as TOML
    Default,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn });

    let config = Config::load()?;
    tracing::debug!(component = Component::CLI, app = %cli.app, "Config loaded");

    let ctx = host_context(&cli.app, &config, cli.cache_dir, cli.external_cache_dir);
    let dir = resolve_crash_log_directory_named(&ctx, &config.report.dir_name);

    match cli.command {
        Commands::Path => {
            eprintln!("{} {}", style("Cache root:").dim(), resolve_cache_root(&ctx).display());
            println!("{}", dir.display());
        }
        Commands::List => reports::cmd_list(&dir, &config)?,
        Commands::Show { name } => reports::cmd_show(&dir, &config, &name)?,
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                match Config::global_config_path() {
                    Some(p) => println!("Global:  {}", p.display()),
                    None => println!("Global:  (no home directory)"),
                }
                println!("Project: .crashcatcher/config.toml");
            }
            ConfigCommands::Show => print!("{}", config.to_toml()?),
            ConfigCommands::Default => print!("{}", Config::default_toml()),
        },
    }

    Ok(())
}

fn host_context(
    app: &str,
    config: &Config,
    cache_dir: Option<PathBuf>,
    external_cache_dir: Option<PathBuf>,
) -> HostContext {
    let mut storage: StorageConfig = config.storage.clone();
    if cache_dir.is_some() {
        storage.cache_dir = cache_dir;
    }
    if external_cache_dir.is_some() {
        storage.external_cache_dir = external_cache_dir;
    }
    HostContext::with_storage(app, PackageInfo::new(env!("CARGO_PKG_VERSION"), 0), storage)
}
