//! Configuration checks.

use clap::{Args, Subcommand};

use tenantgate_core::error::AppError;
use tenantgate_database::connection::redact_url;

use crate::output;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Validate the configuration and print a summary without secrets
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config_path: &str) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Server", &config.server.bind_address());
                output::print_kv("Database", &redact_url(&config.database.url));
                output::print_kv("JWT algorithm", &config.auth.jwt_algorithm);
                output::print_kv(
                    "Session TTL",
                    &format!("{} min", config.auth.access_ttl_minutes),
                );
                output::print_kv("Invite TTL", &format!("{} h", config.invite.ttl_hours));
                output::print_kv(
                    "Invite secret",
                    if config.invite.token_secret.is_some() {
                        "dedicated"
                    } else {
                        "shared with sessions"
                    },
                );
                output::print_kv("Invite links", &config.invite.link_base_url);
                let delivery = match config.invite.smtp_relay() {
                    Some(relay) => format!("smtp://{}:{}", relay.host, relay.port),
                    None => "log only".to_string(),
                };
                output::print_kv("Invite delivery", &delivery);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
