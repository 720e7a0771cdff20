mod login;
mod perms;
mod serve;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::PathSet;
use crate::logs;

#[async_trait(?Send)]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// The config directory. Default: $ORGDASH_CONFIG, /etc/orgdash for root,
    /// otherwise ~/.config/orgdash
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// The data directory. Default: $ORGDASH_DATA, /var/lib/orgdash for root,
    /// otherwise ~/.local/share/orgdash
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level for client commands, one of "error", "warn", "info", "debug".
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl LogArgs {
    pub fn init(&self) -> Result<()> {
        logs::init(&self.log_level)
    }
}

#[derive(Parser)]
#[command(author, about, version = env!("ORGDASH_VERSION"))]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Serve(serve::ServeArgs),
    Login(login::LoginArgs),
    Perms(perms::PermsCommand),
}

#[async_trait(?Send)]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Serve(args) => args.run().await,
            Commands::Login(args) => args.run().await,
            Commands::Perms(args) => args.run().await,
        }
    }
}

pub fn pretty_json<T: Serialize>(value: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[tokio::test]
    async fn test_app_run_serve_print_config() {
        let root = PathBuf::from("_test_cmd_serve");
        let app = App {
            command: Commands::Serve(serve::ServeArgs {
                print_config: true,
                config: ConfigArgs {
                    config_path: Some(root.join("config")),
                    data_path: Some(root.join("data")),
                },
            }),
        };

        app.run().await.unwrap();
        assert!(root.join("config").join("pki").is_dir());

        fs::remove_dir_all(&root).unwrap();
    }
}
