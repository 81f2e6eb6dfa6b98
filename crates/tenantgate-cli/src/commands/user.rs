//! User management commands.

use clap::{Args, Subcommand};

use tenantgate_core::error::AppError;
use tenantgate_database::{IdentityStore, PgIdentityStore};

use crate::output;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Deactivate a user. The account and its password hash are kept.
    Deactivate {
        /// Email
        email: String,
    },
}

/// Execute user commands
pub async fn execute(args: &UserArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let store = PgIdentityStore::new(db.clone());

    match &args.command {
        UserCommand::Deactivate { email } => {
            let user = store
                .find_user_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            store.deactivate_user(user.user_id).await?;
            output::print_success(&format!("User '{}' deactivated", user.email));
        }
    }

    db.close().await;
    Ok(())
}
