//! CLI command definitions and dispatch.

pub mod account;
pub mod file;
pub mod folder;
pub mod share;

use clap::{Parser, Subcommand};

use nuvem_core::config::AppConfig;
use nuvem_core::ApiResult;

use crate::app::{self, App};
use crate::output::OutputFormat;

/// Nuvem Drive — personal cloud storage
#[derive(Debug, Parser)]
#[command(name = "nuvem", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (merges config/{env}.toml over defaults)
    #[arg(short, long, default_value = "default")]
    pub env: String,

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
    /// List a folder's contents (root when no id is given)
    Ls(folder::LsArgs),
    /// Create a folder
    Mkdir(folder::MkdirArgs),
    /// Rename a folder
    RenameFolder(folder::RenameFolderArgs),
    /// Delete a folder (soft delete)
    RmFolder(folder::RmFolderArgs),
    /// Upload a file
    Upload(file::UploadArgs),
    /// Download a file
    Download(file::DownloadArgs),
    /// Show a file's metadata without downloading it
    Preview(file::PreviewArgs),
    /// Rename a file
    RenameFile(file::RenameFileArgs),
    /// Delete a file
    RmFile(file::RmFileArgs),
    /// Toggle a file's public visibility
    Visibility(file::VisibilityArgs),
    /// Create an expiring public link for a file
    Link(file::LinkArgs),
    /// Share a folder with another user
    Share(share::ShareArgs),
    /// Revoke a folder share
    Unshare(share::UnshareArgs),
    /// List a folder's share grants
    Shares(share::SharesArgs),
    /// Show storage usage against the quota
    Usage,
    /// Clear the stored session
    Logout,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> ApiResult<()> {
        // Logout only touches the vault; no session prompt, no network.
        if matches!(self.command, Commands::Logout) {
            return app::logout(&config);
        }

        let app = App::init(config).await?;
        let result = match &self.command {
            Commands::Ls(args) => folder::ls(&app, args, self.format).await,
            Commands::Mkdir(args) => folder::mkdir(&app, args).await,
            Commands::RenameFolder(args) => folder::rename(&app, args).await,
            Commands::RmFolder(args) => folder::remove(&app, args).await,
            Commands::Upload(args) => file::upload(&app, args).await,
            Commands::Download(args) => file::download(&app, args).await,
            Commands::Preview(args) => file::preview(&app, args).await,
            Commands::RenameFile(args) => file::rename(&app, args).await,
            Commands::RmFile(args) => file::remove(&app, args).await,
            Commands::Visibility(args) => file::visibility(&app, args).await,
            Commands::Link(args) => file::link(&app, args).await,
            Commands::Share(args) => share::share(&app, args).await,
            Commands::Unshare(args) => share::unshare(&app, args).await,
            Commands::Shares(args) => share::list(&app, args, self.format).await,
            Commands::Usage => account::usage(&app).await,
            Commands::Logout => Ok(()),
        };

        if let Err(err) = &result {
            app.handle_session_expiry(err);
        }
        result
    }
}
