//! Folder and file mutation flows through the coordinator.

mod helpers;

use std::sync::atomic::Ordering;

use bytes::Bytes;
use nuvem_core::ErrorKind;
use nuvem_entity::UploadRequest;
use nuvem_model::{MutationKind, MutationState};

use helpers::{file_in, folder_listing, folder_under, root_listing, TestStack, TEST_QUOTA};

#[tokio::test]
async fn test_create_folder_appears_exactly_once() {
    let stack = TestStack::new();
    stack.backend.seed_listing(None, root_listing(vec![], vec![]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    let created = stack
        .coordinator
        .create_folder("Reports", None)
        .await
        .expect("create folder");
    assert_eq!(created.name, "Reports");

    let view = stack.hierarchy.current_view().await;
    let count = view
        .subfolders
        .iter()
        .filter(|f| f.name == "Reports")
        .count();
    assert_eq!(count, 1);
    assert_eq!(
        stack.coordinator.last_transition().await,
        (MutationKind::CreateFolder, MutationState::Applied)
    );
}

#[tokio::test]
async fn test_create_folder_elsewhere_leaves_view_untouched() {
    let stack = TestStack::new();
    stack.backend.seed_listing(None, root_listing(vec![], vec![]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    let elsewhere = folder_under("archive", None);
    stack
        .coordinator
        .create_folder("Reports", Some(elsewhere.id))
        .await
        .expect("create folder");

    let view = stack.hierarchy.current_view().await;
    assert!(view.subfolders.is_empty());
}

#[tokio::test]
async fn test_blank_folder_name_rejected_before_request() {
    let stack = TestStack::new();
    let err = stack
        .coordinator
        .create_folder("   ", None)
        .await
        .expect_err("blank name");
    assert_eq!(err.kind, ErrorKind::InvalidName);
    assert_eq!(
        stack.coordinator.last_transition().await,
        (MutationKind::CreateFolder, MutationState::Rejected)
    );
}

#[tokio::test]
async fn test_rename_folder_patches_name_and_breadcrumb() {
    let stack = TestStack::new();
    let reports = folder_under("reports", None);
    stack.backend.seed_listing(
        Some(reports.id),
        folder_listing(reports.clone(), vec![], vec![]),
    );
    stack
        .hierarchy
        .load_folder_content(Some(reports.id))
        .await
        .expect("folder load");

    // The server canonicalizes the typed name by trimming it.
    stack
        .coordinator
        .rename_folder(reports.id, "  Quarterly  ")
        .await
        .expect("rename folder");

    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.folder.as_ref().map(|f| f.name.as_str()), Some("Quarterly"));
    assert_eq!(
        view.terminal_segment().map(|s| s.name.as_str()),
        Some("Quarterly")
    );
}

#[tokio::test]
async fn test_rename_file_keep_extension_preserves_original_extension() {
    let stack = TestStack::new();
    let report = file_in("report.pdf", None, 1024);
    stack.backend.seed_file(report.clone());
    stack
        .backend
        .seed_listing(None, root_listing(vec![], vec![report.clone()]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    // Typed name carries a different extension; only the stem is sent.
    let renamed = stack
        .coordinator
        .rename_file(report.id, "summary.txt", true)
        .await
        .expect("rename file");
    assert_eq!(renamed.name, "summary.pdf");

    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.files[0].name, "summary.pdf");
}

#[tokio::test]
async fn test_rename_file_without_keep_extension_sends_full_name() {
    let stack = TestStack::new();
    let report = file_in("report.pdf", None, 1024);
    stack.backend.seed_file(report.clone());
    stack
        .backend
        .seed_listing(None, root_listing(vec![], vec![report.clone()]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    let renamed = stack
        .coordinator
        .rename_file(report.id, "summary.txt", false)
        .await
        .expect("rename file");
    assert_eq!(renamed.name, "summary.txt");
}

#[tokio::test]
async fn test_delete_file_removes_it_from_view() {
    let stack = TestStack::new();
    let report = file_in("report.pdf", None, 1024);
    stack.backend.seed_file(report.clone());
    stack
        .backend
        .seed_listing(None, root_listing(vec![], vec![report.clone()]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    stack
        .coordinator
        .delete_file(report.id)
        .await
        .expect("delete file");
    assert!(stack.hierarchy.current_view().await.files.is_empty());

    // Deleting again surfaces the server's not-found.
    let err = stack
        .coordinator
        .delete_file(report.id)
        .await
        .expect_err("already deleted");
    assert_eq!(err.kind, ErrorKind::FileNotFound);
}

#[tokio::test]
async fn test_forbidden_folder_delete_leaves_listing_unchanged() {
    let stack = TestStack::new();
    let shared = folder_under("shared-with-me", None);
    stack
        .backend
        .seed_listing(None, root_listing(vec![shared.clone()], vec![]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    stack
        .backend
        .fail_delete_folder(nuvem_core::ApiError::forbidden(
            "Only the owner can delete this folder",
        ));
    let err = stack
        .coordinator
        .delete_folder(shared.id)
        .await
        .expect_err("forbidden delete");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.subfolders.len(), 1);
    assert_eq!(view.subfolders[0].name, "shared-with-me");
    assert_eq!(
        stack.coordinator.last_transition().await,
        (MutationKind::DeleteFolder, MutationState::Rejected)
    );
}

#[tokio::test]
async fn test_delete_folder_reloads_current_view() {
    let stack = TestStack::new();
    let docs = folder_under("docs", None);
    stack
        .backend
        .seed_listing(None, root_listing(vec![docs.clone()], vec![]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    // The post-delete reload sees the server state without the folder.
    stack.backend.seed_listing(None, root_listing(vec![], vec![]));
    stack
        .coordinator
        .delete_folder(docs.id)
        .await
        .expect("delete folder");

    assert!(stack.hierarchy.current_view().await.subfolders.is_empty());
}

#[tokio::test]
async fn test_upload_quota_preflight_skips_network() {
    let stack = TestStack::new();
    stack.backend.set_usage(TEST_QUOTA - 10, TEST_QUOTA);

    let err = stack
        .coordinator
        .upload(UploadRequest {
            file_name: "big.bin".to_string(),
            bytes: Bytes::from(vec![0u8; 100]),
            mime_type: None,
            is_public: false,
            tags: vec![],
            description: None,
            folder_id: None,
        })
        .await
        .expect_err("over quota");

    assert_eq!(err.kind, ErrorKind::QuotaExceeded);
    assert_eq!(err.available_bytes(), Some(10));
    assert_eq!(stack.backend.upload_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_appends_to_displayed_folder() {
    let stack = TestStack::new();
    stack.backend.seed_listing(None, root_listing(vec![], vec![]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    let file = stack
        .coordinator
        .upload(UploadRequest {
            file_name: "notes.txt".to_string(),
            bytes: Bytes::from_static(b"hello"),
            mime_type: Some("text/plain".to_string()),
            is_public: false,
            tags: vec![],
            description: None,
            folder_id: None,
        })
        .await
        .expect("upload");
    assert_eq!(file.size_bytes, 5);

    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.files.len(), 1);
    assert_eq!(view.files[0].name, "notes.txt");
    assert_eq!(stack.backend.upload_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_visibility_toggle_patches_view() {
    let stack = TestStack::new();
    let report = file_in("report.pdf", None, 1024);
    stack.backend.seed_file(report.clone());
    stack
        .backend
        .seed_listing(None, root_listing(vec![], vec![report.clone()]));
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    stack
        .coordinator
        .set_file_visibility(report.id, true)
        .await
        .expect("make public");
    assert!(stack.hierarchy.current_view().await.files[0].is_public);
}

#[tokio::test]
async fn test_download_returns_content_and_name() {
    let stack = TestStack::new();
    let report = file_in("report.pdf", None, 4);
    stack.backend.seed_file(report.clone());
    stack
        .backend
        .seed_file_content(report.id, Bytes::from_static(b"%PDF"));

    let download = stack
        .coordinator
        .download(report.id)
        .await
        .expect("download");
    assert_eq!(download.file_name.as_deref(), Some("report.pdf"));
    assert_eq!(&download.bytes[..], b"%PDF");
}
