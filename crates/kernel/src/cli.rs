//! Command-line interface.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::models::{Admin, AdminInput};
use crate::store::{AdminRepository, StoreError};

/// Copsewood Aviaries web server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Create an administrator account.
    CreateAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },
}

/// Create an admin account, failing if the username exists.
pub async fn cmd_create_admin(
    admins: &dyn AdminRepository,
    username: &str,
    password: &str,
) -> Result<Admin> {
    let input = AdminInput {
        username: username.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    };
    let fields = match input.validate() {
        Ok(fields) => fields,
        Err(errors) => bail!("{errors}"),
    };

    let admin = Admin::new(&fields.username, &fields.password, None)?;
    match admins.save(&admin).await {
        Ok(()) => {}
        Err(StoreError::Conflict(_)) => bail!("admin '{}' already exists", fields.username),
        Err(e) => return Err(e).context("failed to save admin"),
    }

    info!(admin_id = %admin.id, username = %admin.username, "admin created");
    Ok(admin)
}
