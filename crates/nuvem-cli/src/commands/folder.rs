//! Folder navigation and management commands.

use clap::Args;
use dialoguer::Confirm;
use serde::Serialize;
use tabled::Tabled;

use nuvem_core::types::FolderId;
use nuvem_core::{ApiError, ApiResult};
use nuvem_entity::quota::format_bytes;
use nuvem_model::{classify_files_by_kind, FileKind, LoadOutcome};

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder ID (omit for the root)
    pub folder_id: Option<FolderId>,
}

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Name of the new folder
    pub name: String,
    /// Parent folder ID (omit for the root)
    #[arg(short, long)]
    pub parent: Option<FolderId>,
}

/// Arguments for `rename-folder`
#[derive(Debug, Args)]
pub struct RenameFolderArgs {
    /// Folder ID
    pub id: FolderId,
    /// New name
    pub new_name: String,
}

/// Arguments for `rm-folder`
#[derive(Debug, Args)]
pub struct RmFolderArgs {
    /// Folder ID
    pub id: FolderId,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Subfolder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Shared
    shared: String,
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// Name
    name: String,
    /// Size
    size: String,
    /// Public
    public: String,
}

pub async fn ls(app: &App, args: &LsArgs, format: OutputFormat) -> ApiResult<()> {
    let view = match app.hierarchy.load_folder_content(args.folder_id).await? {
        LoadOutcome::Applied(view) => view,
        // Single-shot CLI invocations never race their own navigation.
        LoadOutcome::Superseded => return Ok(()),
    };

    let breadcrumb: Vec<&str> = view.path.iter().map(|s| s.name.as_str()).collect();
    println!("{}", breadcrumb.join(" > "));
    println!();

    if !view.subfolders.is_empty() {
        println!("Folders");
        let rows: Vec<FolderRow> = view
            .subfolders
            .iter()
            .map(|f| FolderRow {
                id: f.id.to_string(),
                name: f.name.clone(),
                shared: share_label(f.is_shared_direct, f.is_shared_inherited),
            })
            .collect();
        output::print_list(&rows, format);
        println!();
    }

    let buckets = classify_files_by_kind(&view.files);
    for kind in FileKind::ALL {
        let files = buckets.bucket(kind);
        if files.is_empty() {
            continue;
        }
        println!("{}", kind.label());
        let rows: Vec<FileRow> = files
            .iter()
            .map(|f| FileRow {
                id: f.id.to_string(),
                name: f.name.clone(),
                size: format_bytes(f.size_bytes),
                public: if f.is_public { "yes" } else { "no" }.to_string(),
            })
            .collect();
        output::print_list(&rows, format);
        println!();
    }

    if view.subfolders.is_empty() && view.files.is_empty() {
        println!("This folder is empty.");
    }
    Ok(())
}

pub async fn mkdir(app: &App, args: &MkdirArgs) -> ApiResult<()> {
    let folder = app.coordinator.create_folder(&args.name, args.parent).await?;
    output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
    Ok(())
}

pub async fn rename(app: &App, args: &RenameFolderArgs) -> ApiResult<()> {
    let folder = app.coordinator.rename_folder(args.id, &args.new_name).await?;
    output::print_success(&format!("Folder renamed to '{}'", folder.name));
    Ok(())
}

pub async fn remove(app: &App, args: &RmFolderArgs) -> ApiResult<()> {
    if !args.yes && !confirm(&format!("Delete folder {}?", args.id))? {
        output::print_warning("Aborted.");
        return Ok(());
    }
    app.coordinator.delete_folder(args.id).await?;
    output::print_success("Folder deleted.");
    Ok(())
}

fn share_label(direct: bool, inherited: bool) -> String {
    match (direct, inherited) {
        (true, _) => "direct".to_string(),
        (false, true) => "inherited".to_string(),
        (false, false) => "-".to_string(),
    }
}

pub(crate) fn confirm(prompt: &str) -> ApiResult<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ApiError::configuration(format!("Could not read confirmation: {e}")))
}
