//! Navigation and view-materialization behavior of the hierarchy model.

mod helpers;

use std::sync::atomic::Ordering;

use nuvem_core::ErrorKind;
use nuvem_model::LoadOutcome;

use helpers::{folder_listing, folder_under, file_in, root_listing, TestStack};

#[tokio::test]
async fn test_load_root_materializes_view() {
    let stack = TestStack::new();
    let docs = folder_under("docs", None);
    let readme = file_in("README.md", None, 42);
    stack
        .backend
        .seed_listing(None, root_listing(vec![docs.clone()], vec![readme.clone()]));

    let outcome = stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");
    let LoadOutcome::Applied(view) = outcome else {
        panic!("expected applied outcome");
    };

    assert_eq!(view.folder_id(), None);
    assert_eq!(view.subfolders.len(), 1);
    assert_eq!(view.subfolders[0].name, "docs");
    assert_eq!(view.files.len(), 1);
    assert_eq!(view.files[0].name, "README.md");
    // At root the breadcrumb is the single root sentinel, not navigable.
    assert_eq!(view.path.len(), 1);
    assert_eq!(view.path[0].name, "Raiz");
    assert!(view.navigable_segments().is_empty());
}

#[tokio::test]
async fn test_breadcrumb_terminal_segment_is_current_folder() {
    let stack = TestStack::new();
    let reports = folder_under("reports", None);
    stack
        .backend
        .seed_listing(Some(reports.id), folder_listing(reports.clone(), vec![], vec![]));

    stack
        .hierarchy
        .load_folder_content(Some(reports.id))
        .await
        .expect("folder load");
    let view = stack.hierarchy.current_view().await;

    let navigable = view.navigable_segments();
    assert_eq!(navigable.len(), 1);
    assert_eq!(navigable[0].name, "Raiz");
    assert_eq!(navigable[0].id, None);
    let terminal = view.terminal_segment().expect("terminal segment");
    assert_eq!(terminal.id, Some(reports.id));
    assert_eq!(terminal.name, "reports");
}

#[tokio::test]
async fn test_failed_load_preserves_previous_view() {
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

    // The second navigation targets a folder the server does not know.
    let missing = folder_under("ghost", None);
    let err = stack
        .hierarchy
        .load_folder_content(Some(missing.id))
        .await
        .expect_err("missing folder");
    assert_eq!(err.kind, ErrorKind::FolderNotFound);

    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.folder_id(), None);
    assert_eq!(view.subfolders[0].name, "docs");
    assert_eq!(
        stack.hierarchy.last_error().await.map(|e| e.kind),
        Some(ErrorKind::FolderNotFound)
    );
}

#[tokio::test]
async fn test_successful_load_clears_last_error() {
    let stack = TestStack::new();
    stack.backend.seed_listing(None, root_listing(vec![], vec![]));

    let missing = folder_under("ghost", None);
    let _ = stack.hierarchy.load_folder_content(Some(missing.id)).await;
    assert!(stack.hierarchy.last_error().await.is_some());

    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");
    assert!(stack.hierarchy.last_error().await.is_none());
}

#[tokio::test]
async fn test_inconsistent_breadcrumb_is_rejected() {
    let stack = TestStack::new();
    let reports = folder_under("reports", None);
    // Path truncated to the root sentinel only: does not end at the folder.
    let mut listing = folder_listing(reports.clone(), vec![], vec![]);
    listing.path.pop();
    stack.backend.seed_listing(Some(reports.id), listing);

    let err = stack
        .hierarchy
        .load_folder_content(Some(reports.id))
        .await
        .expect_err("inconsistent listing");
    assert_eq!(err.kind, ErrorKind::UnknownApi);

    // The bad listing never reached the view.
    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.folder_id(), None);
    assert!(view.subfolders.is_empty());
}

#[tokio::test]
async fn test_stale_listing_is_discarded() {
    let stack = TestStack::new();
    let slow_folder = folder_under("slow", None);
    stack.backend.seed_listing(
        Some(slow_folder.id),
        folder_listing(slow_folder.clone(), vec![], vec![]),
    );
    stack
        .backend
        .seed_listing(None, root_listing(vec![slow_folder.clone()], vec![]));

    let gate = stack.backend.hold_next_fetch(Some(slow_folder.id));
    let hierarchy = stack.hierarchy.clone();
    let slow_id = slow_folder.id;
    let slow_load =
        tokio::spawn(async move { hierarchy.load_folder_content(Some(slow_id)).await });

    // Wait until the slow fetch is actually in flight.
    while stack.backend.fetch_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    // A newer navigation completes while the first is still blocked.
    stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("root load");

    gate.notify_one();
    let outcome = slow_load.await.expect("join").expect("slow load");
    assert!(matches!(outcome, LoadOutcome::Superseded));

    // The stale response never overwrote the newer view.
    let view = stack.hierarchy.current_view().await;
    assert_eq!(view.folder_id(), None);
    assert_eq!(view.subfolders[0].name, "slow");
}

#[tokio::test]
async fn test_offline_serves_cached_listing() {
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

    stack
        .backend
        .fail_fetches(nuvem_core::ApiError::from_kind(ErrorKind::Network));
    stack.offline.send(true).expect("offline flag");

    let outcome = stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect("cached listing");
    let LoadOutcome::Applied(view) = outcome else {
        panic!("expected cached view");
    };
    assert_eq!(view.subfolders[0].name, "docs");
}

#[tokio::test]
async fn test_offline_without_cache_surfaces_error() {
    let stack = TestStack::new();
    stack
        .backend
        .fail_fetches(nuvem_core::ApiError::from_kind(ErrorKind::Network));
    stack.offline.send(true).expect("offline flag");

    let err = stack
        .hierarchy
        .load_folder_content(None)
        .await
        .expect_err("nothing cached");
    assert_eq!(err.kind, ErrorKind::Network);
}
