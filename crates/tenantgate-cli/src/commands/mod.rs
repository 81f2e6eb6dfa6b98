//! CLI command definitions and dispatch.

pub mod admin;
pub mod config;
pub mod invite;
pub mod migrate;
pub mod org;
pub mod serve;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use tenantgate_auth::delivery::LogDelivery;
use tenantgate_core::config::AppConfig;
use tenantgate_core::error::AppError;
use tenantgate_database::{DatabasePool, PgIdentityStore};
use tenantgate_service::IdentityService;

use crate::output::OutputFormat;

/// TenantGate: multi-tenant identity and access administration
#[derive(Debug, Parser)]
#[command(name = "tenantgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the TenantGate server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Super-admin bootstrap
    Admin(admin::AdminArgs),
    /// Invite issuance
    Invite(invite::InviteArgs),
    /// Organization management
    Org(org::OrgArgs),
    /// User management
    User(user::UserArgs),
    /// Configuration checks
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Admin(args) => admin::execute(args, &self.config, self.format).await,
            Commands::Org(args) => org::execute(args, &self.config, self.format).await,
            Commands::Invite(args) => invite::execute(args, &self.config, self.format).await,
            Commands::User(args) => user::execute(args, &self.config).await,
            Commands::Config(args) => config::execute(args, &self.config),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: identity service over Postgres. Commands print invite links
/// themselves, so delivery only logs.
pub fn identity_service(config: &AppConfig, db: DatabasePool) -> Result<IdentityService, AppError> {
    IdentityService::new(
        config,
        Arc::new(PgIdentityStore::new(db)),
        Arc::new(LogDelivery::new(config.invite.email_from.clone())),
    )
}
