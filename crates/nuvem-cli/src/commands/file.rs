//! File management commands.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Args, ValueEnum};

use nuvem_core::types::{FileId, FolderId};
use nuvem_core::{ApiError, ApiResult};
use nuvem_entity::quota::format_bytes;
use nuvem_entity::UploadRequest;
use nuvem_model::DriveTransport;

use crate::app::App;
use crate::commands::folder::confirm;
use crate::output;

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local path of the file to upload
    pub path: PathBuf,
    /// Target folder ID (omit for the root)
    #[arg(short, long)]
    pub folder: Option<FolderId>,
    /// Make the file public
    #[arg(long)]
    pub public: bool,
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// MIME type (omitted when unknown)
    #[arg(long)]
    pub mime: Option<String>,
}

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File ID
    pub id: FileId,
    /// Output path (defaults to the server-provided file name)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `rename-file`
#[derive(Debug, Args)]
pub struct RenameFileArgs {
    /// File ID
    pub id: FileId,
    /// New name
    pub new_name: String,
    /// Allow the rename to change the file extension
    #[arg(long)]
    pub allow_extension_change: bool,
}

/// Arguments for `rm-file`
#[derive(Debug, Args)]
pub struct RmFileArgs {
    /// File ID
    pub id: FileId,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `preview`
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// File ID
    pub id: FileId,
}

/// Visibility states
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VisibilityState {
    /// Anyone with the link can access
    Public,
    /// Owner and grantees only
    Private,
}

/// Arguments for `visibility`
#[derive(Debug, Args)]
pub struct VisibilityArgs {
    /// File ID
    pub id: FileId,
    /// Target state
    #[arg(value_enum)]
    pub state: VisibilityState,
}

/// Arguments for `link`
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// File ID
    pub id: FileId,
    /// Link lifetime in seconds (omit for no expiry)
    #[arg(long)]
    pub expires_in: Option<u64>,
    /// Maximum number of accesses (omit for unlimited)
    #[arg(long)]
    pub max_access: Option<u32>,
}

pub async fn upload(app: &App, args: &UploadArgs) -> ApiResult<()> {
    let bytes = tokio::fs::read(&args.path).await?;
    let file_name = file_name_of(&args.path)?;

    let file = app
        .coordinator
        .upload(UploadRequest {
            file_name,
            bytes: Bytes::from(bytes),
            mime_type: args.mime.clone(),
            is_public: args.public,
            tags: args.tags.clone(),
            description: args.description.clone(),
            folder_id: args.folder,
        })
        .await?;

    output::print_success(&format!(
        "Uploaded '{}' ({}) (id: {})",
        file.name,
        format_bytes(file.size_bytes),
        file.id
    ));
    Ok(())
}

pub async fn download(app: &App, args: &DownloadArgs) -> ApiResult<()> {
    let download = app.coordinator.download(args.id).await?;
    let out = match &args.out {
        Some(path) => path.clone(),
        None => PathBuf::from(
            download
                .file_name
                .clone()
                .unwrap_or_else(|| args.id.to_string()),
        ),
    };
    tokio::fs::write(&out, &download.bytes).await?;
    output::print_success(&format!(
        "Downloaded {} to {}",
        format_bytes(download.bytes.len() as u64),
        out.display()
    ));
    Ok(())
}

pub async fn rename(app: &App, args: &RenameFileArgs) -> ApiResult<()> {
    let file = app
        .coordinator
        .rename_file(args.id, &args.new_name, !args.allow_extension_change)
        .await?;
    output::print_success(&format!("File renamed to '{}'", file.name));
    Ok(())
}

pub async fn remove(app: &App, args: &RmFileArgs) -> ApiResult<()> {
    if !args.yes && !confirm(&format!("Delete file {}?", args.id))? {
        output::print_warning("Aborted.");
        return Ok(());
    }
    app.coordinator.delete_file(args.id).await?;
    output::print_success("File deleted.");
    Ok(())
}

pub async fn preview(app: &App, args: &PreviewArgs) -> ApiResult<()> {
    let file = app.transport.file_preview(args.id).await?;
    println!("{}", file.name);
    output::print_kv("Size", &format_bytes(file.size_bytes));
    output::print_kv("Type", file.mime_type.as_deref().unwrap_or("unknown"));
    output::print_kv("Public", if file.is_public { "yes" } else { "no" });
    output::print_kv(
        "Uploaded",
        &file.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    Ok(())
}

pub async fn visibility(app: &App, args: &VisibilityArgs) -> ApiResult<()> {
    let is_public = matches!(args.state, VisibilityState::Public);
    let file = app.coordinator.set_file_visibility(args.id, is_public).await?;
    output::print_success(&format!(
        "'{}' is now {}",
        file.name,
        if file.is_public { "public" } else { "private" }
    ));
    Ok(())
}

pub async fn link(app: &App, args: &LinkArgs) -> ApiResult<()> {
    let link = app
        .coordinator
        .create_file_link(args.id, args.expires_in, args.max_access)
        .await?;
    println!("{}", link.share_url);
    if let Some(expires_at) = link.expires_at {
        output::print_kv("Expires", &expires_at.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    if let Some(max_access) = link.max_access {
        output::print_kv("Max accesses", &max_access.to_string());
    }
    Ok(())
}

fn file_name_of(path: &Path) -> ApiResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::invalid_name(format!("Not a file path: {}", path.display())))
}
