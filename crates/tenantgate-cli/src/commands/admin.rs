//! Super-admin bootstrap commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use tenantgate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an active super-admin with a password
    CreateSuperAdmin {
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct CreatedAdmin {
    user_id: i64,
    user_uuid: String,
    email: String,
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        AdminCommand::CreateSuperAdmin { email, password } => {
            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Super admin email")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let db = super::create_db_pool(&config).await?;
            let identity = super::identity_service(&config, db.clone())?;
            let user = identity.bootstrap_super_admin(&email, &password).await?;
            db.close().await;

            let created = CreatedAdmin {
                user_id: user.user_id,
                user_uuid: user.user_uuid.to_string(),
                email: user.email,
            };
            match format {
                OutputFormat::Json => output::print_item(&created, format),
                OutputFormat::Table => {
                    output::print_success("Super admin created");
                    output::print_kv("User ID", &created.user_id.to_string());
                    output::print_kv("UUID", &created.user_uuid);
                    output::print_kv("Email", &created.email);
                }
            }
        }
    }

    Ok(())
}
