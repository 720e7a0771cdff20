use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::client::board::PermissionBoard;
use crate::client::factory::ClientFactory;
use crate::client::Client;
use crate::types::permission::ActionKey;

use super::{pretty_json, ConfigArgs, LogArgs, RunCommand};

/// Inspect and edit the role permission table.
#[derive(Args)]
pub struct PermsCommand {
    #[command(subcommand)]
    pub command: PermsCommands,
}

#[derive(Subcommand)]
pub enum PermsCommands {
    List(ListArgs),
    Toggle(ToggleArgs),
    Cani(CaniArgs),
}

#[async_trait(?Send)]
impl RunCommand for PermsCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            PermsCommands::List(args) => args.run().await,
            PermsCommands::Toggle(args) => args.run().await,
            PermsCommands::Cani(args) => args.run().await,
        }
    }
}

/// Show the allowed roles of every action. Actions without a stored rule are
/// open to the superuser roles only.
#[derive(Args)]
pub struct ListArgs {
    /// Print the raw rules as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[async_trait(?Send)]
impl RunCommand for ListArgs {
    async fn run(&self) -> Result<()> {
        let mut board = connect_board(&self.config, &self.log).await?;
        let rules = board.rules().await?;

        if self.json {
            return pretty_json(rules);
        }

        for key in ActionKey::ALL {
            let roles = match rules.get(key.as_str()) {
                Some(roles) if !roles.is_empty() => {
                    roles.iter().cloned().collect::<Vec<_>>().join(", ")
                }
                _ => String::from("<none>"),
            };
            println!("{:<22} {roles}", key.as_str());
        }
        Ok(())
    }
}

/// Grant a role an action if it lacks it, revoke it otherwise.
#[derive(Args)]
pub struct ToggleArgs {
    /// The action key, e.g. "delete_events".
    pub action: String,

    /// The role to flip. Compared case-insensitively.
    pub role: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[async_trait(?Send)]
impl RunCommand for ToggleArgs {
    async fn run(&self) -> Result<()> {
        let action: ActionKey = self.action.parse()?;
        if action == ActionKey::ManagePermissions {
            bail!("manage_permissions is fixed to the superuser roles");
        }

        let mut board = connect_board(&self.config, &self.log).await?;
        let enabled = match board.toggle(action.as_str(), &self.role).await {
            Ok(enabled) => enabled,
            Err(err) if err.is_forbidden() => {
                bail!("editing permissions requires the chair or admin role")
            }
            Err(err) => return Err(err.into()),
        };

        let verb = if enabled { "granted" } else { "revoked" };
        println!("'{}' {verb} for '{action}'", self.role.trim());
        Ok(())
    }
}

/// Ask the server whether the logged in account may perform an action.
#[derive(Args)]
pub struct CaniArgs {
    pub action: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[async_trait(?Send)]
impl RunCommand for CaniArgs {
    async fn run(&self) -> Result<()> {
        let action: ActionKey = self.action.parse()?;

        self.log.init()?;
        let ps = self.config.build_path_set()?;
        let client = ClientFactory::load(&ps)?
            .build_client_with_token_file()
            .await?;

        if client.cani(action.as_str()).await? {
            println!("yes");
        } else {
            println!("no");
        }
        Ok(())
    }
}

async fn connect_board(config: &ConfigArgs, log: &LogArgs) -> Result<PermissionBoard<Client>> {
    log.init()?;
    let ps = config.build_path_set()?;
    let client = ClientFactory::load(&ps)?
        .build_client_with_token_file()
        .await?;
    Ok(PermissionBoard::new(client))
}
