use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use log::info;

use crate::config::CommonConfig;
use crate::logs;
use crate::server::config::ServerConfig;
use crate::server::factory::ServerFactory;

use super::{pretty_json, ConfigArgs, RunCommand};

/// Start the dashboard HTTP/HTTPS server.
#[derive(Args)]
pub struct ServeArgs {
    /// Print server configuration data (JSON) and exit.
    #[arg(long)]
    pub print_config: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait(?Send)]
impl RunCommand for ServeArgs {
    async fn run(&self) -> Result<()> {
        let ps = self.config.build_path_set()?;
        let cfg: ServerConfig = ps.load_config("server", ServerConfig::default)?;

        if self.print_config {
            return pretty_json(cfg);
        }

        logs::init(&cfg.logs.level)?;
        info!("Starting orgdash {}", env!("ORGDASH_VERSION"));

        let factory = ServerFactory::new(cfg)?;
        let srv = factory.build_server()?;
        srv.run().await.context("run restful server")?;

        info!("Server exited by user");
        Ok(())
    }
}
