//! Folder sharing commands.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use nuvem_core::types::FolderId;
use nuvem_core::ApiResult;
use nuvem_entity::SharePermission;

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Permission levels assignable from the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PermissionArg {
    /// View only
    ReadOnly,
    /// Edit, delete, and re-share
    Editor,
}

impl From<PermissionArg> for SharePermission {
    fn from(arg: PermissionArg) -> Self {
        match arg {
            PermissionArg::ReadOnly => SharePermission::ReadOnly,
            PermissionArg::Editor => SharePermission::Editor,
        }
    }
}

/// Arguments for `share`
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Folder ID
    pub folder_id: FolderId,
    /// Grantee e-mail address
    pub email: String,
    /// Permission level
    #[arg(short, long, value_enum, default_value = "read-only")]
    pub permission: PermissionArg,
}

/// Arguments for `unshare`
#[derive(Debug, Args)]
pub struct UnshareArgs {
    /// Folder ID
    pub folder_id: FolderId,
    /// Grantee e-mail address
    pub email: String,
}

/// Arguments for `shares`
#[derive(Debug, Args)]
pub struct SharesArgs {
    /// Folder ID
    pub folder_id: FolderId,
}

/// Share grant display row
#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    /// Grantee
    grantee: String,
    /// Permission
    permission: String,
}

pub async fn share(app: &App, args: &ShareArgs) -> ApiResult<()> {
    let grant = app
        .coordinator
        .share_folder(args.folder_id, &args.email, args.permission.into())
        .await?;
    output::print_success(&format!(
        "Shared with {} ({})",
        grant.grantee_email, grant.permission
    ));
    Ok(())
}

pub async fn unshare(app: &App, args: &UnshareArgs) -> ApiResult<()> {
    app.coordinator
        .unshare_folder(args.folder_id, &args.email)
        .await?;
    output::print_success(&format!("Share for {} revoked", args.email));
    Ok(())
}

pub async fn list(app: &App, args: &SharesArgs, format: OutputFormat) -> ApiResult<()> {
    let grants = app.coordinator.refresh_shares(args.folder_id).await?;
    let rows: Vec<GrantRow> = grants
        .iter()
        .map(|g| GrantRow {
            grantee: g.grantee_email.clone(),
            permission: g.permission.to_string(),
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
