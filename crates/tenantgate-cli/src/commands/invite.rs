//! Invite commands.

use clap::{Args, Subcommand};

use tenantgate_auth::delivery::invite_link;
use tenantgate_core::error::AppError;
use tenantgate_database::IdentityStore;
use tenantgate_entity::invite::InvitePurpose;

use crate::output::{self, OutputFormat};

/// Arguments for invite commands
#[derive(Debug, Args)]
pub struct InviteArgs {
    /// Invite subcommand
    #[command(subcommand)]
    pub command: InviteCommand,
}

/// Invite subcommands
#[derive(Debug, Subcommand)]
pub enum InviteCommand {
    /// Issue a fresh password-setup invite and print its link.
    /// Any earlier open invite for the user stops working.
    Issue {
        /// Email of a user that has not completed onboarding
        email: String,
    },
}

/// Execute invite commands
pub async fn execute(
    args: &InviteArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let identity = super::identity_service(&config, db.clone())?;

    match &args.command {
        InviteCommand::Issue { email } => {
            let user = identity
                .store()
                .find_user_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            let issued = identity
                .issue_invite(user.user_id, InvitePurpose::SetPassword, None)
                .await?;
            let link = invite_link(&config.invite.link_base_url, issued.raw_token.expose());

            match format {
                OutputFormat::Json => output::print_item(
                    &serde_json::json!({
                        "user_id": issued.user_id,
                        "expires_at": issued.expires_at,
                        "link": link,
                    }),
                    format,
                ),
                OutputFormat::Table => {
                    output::print_success(&format!("Invite issued for '{}'", user.email));
                    output::print_kv("Expires", &issued.expires_at.to_rfc3339());
                    output::print_kv("Link", &link);
                }
            }
        }
    }

    db.close().await;
    Ok(())
}
