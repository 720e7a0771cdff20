use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::client::factory::ClientFactory;

use super::{pretty_json, ConfigArgs, LogArgs, RunCommand};

/// Log in with the account from client.toml, cache the session token and print
/// who the server thinks you are.
#[derive(Args)]
pub struct LoginArgs {
    /// Keep a cached token instead of logging in again.
    #[arg(long)]
    pub reuse: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[async_trait(?Send)]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        self.log.init()?;
        let ps = self.config.build_path_set()?;

        let factory = ClientFactory::load(&ps)?;
        if !self.reuse {
            factory.token_file().remove()?;
        }
        let client = factory.build_client_with_token_file().await?;

        let user = client.whoami().await?;
        pretty_json(user)
    }
}
