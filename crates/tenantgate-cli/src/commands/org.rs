//! Organization management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tenantgate_core::error::AppError;
use tenantgate_database::IdentityStore;
use tenantgate_database::PgIdentityStore;
use tenantgate_entity::organization::Organization;

use crate::output::{self, OutputFormat};

/// Arguments for org commands
#[derive(Debug, Args)]
pub struct OrgArgs {
    /// Org subcommand
    #[command(subcommand)]
    pub command: OrgCommand,
}

/// Org subcommands
#[derive(Debug, Subcommand)]
pub enum OrgCommand {
    /// List all organizations
    List,
    /// Create an organization
    Create {
        /// Unique name
        #[arg(short, long)]
        name: String,
    },
}

/// Organization display row for table output
#[derive(Debug, Serialize, Tabled)]
struct OrgRow {
    /// Org ID
    id: i64,
    /// Name
    name: String,
    /// Metadata
    metadata: String,
    /// Created at
    created_at: String,
}

impl From<Organization> for OrgRow {
    fn from(org: Organization) -> Self {
        Self {
            id: org.org_id,
            name: org.name,
            metadata: org.metadata.to_string(),
            created_at: org.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute org commands
pub async fn execute(
    args: &OrgArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let store = PgIdentityStore::new(db.clone());

    match &args.command {
        OrgCommand::List => {
            let rows: Vec<OrgRow> = store
                .list_organizations(None)
                .await?
                .into_iter()
                .map(OrgRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        OrgCommand::Create { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Organization name is required"));
            }
            let org = store
                .create_organization(name, &serde_json::json!({}))
                .await?;
            output::print_success(&format!("Organization '{}' created (id {})", org.name, org.org_id));
        }
    }

    db.close().await;
    Ok(())
}
