//! End-to-end tests for a browsing session over the in-memory store.

mod helpers;

use chrono::{TimeZone, Utc};
use serde_json::json;

use dropzone_core::config::{AppConfig, BrowserConfig};
use dropzone_core::error::ErrorKind;
use dropzone_core::types::{SortBy, ViewMode};
use dropzone_entity::file::FileInput;
use dropzone_entity::folder::FolderInput;
use dropzone_store::StoreOp;

use helpers::{TestApp, draft};

#[tokio::test]
async fn test_create_folder_fills_defaults() {
    let app = TestApp::new();

    let docs = app.folders.create(FolderInput::named("Docs")).await.unwrap();

    assert_eq!(docs.name, "Docs");
    assert_eq!(docs.file_count, 0);
    assert!(!docs.is_public);
    assert_eq!(docs.parent_id, None);
    assert_eq!(
        docs.created_date,
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(app.store.calls_of(StoreOp::Create).len(), 1);
}

#[tokio::test]
async fn test_root_listing_excludes_nested_folders() {
    let app = TestApp::new();
    let a = app.folders.create(FolderInput::named("A")).await.unwrap();
    app.folders
        .create(FolderInput::named("B").under(Some(a.id)))
        .await
        .unwrap();

    let root = app.folders.list(None, None).await.unwrap();
    let names: Vec<_> = root.into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["A"]);

    let children = app.folders.list(Some(a.id), None).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "B");
}

#[tokio::test]
async fn test_batch_delete_leaves_the_rest() {
    let app = TestApp::new();
    let a = app.files.create(FileInput::named("a.txt")).await.unwrap();
    let b = app.files.create(FileInput::named("b.txt")).await.unwrap();
    app.files.create(FileInput::named("c.txt")).await.unwrap();

    assert!(app.files.delete(vec![a.id, b.id]).await.unwrap());

    let left: Vec<_> = app
        .files
        .list(None, None)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(left, vec!["c.txt"]);
}

#[tokio::test]
async fn test_load_reads_existing_tree_without_seeding() {
    let app = TestApp::new();
    let work = app.folders.create(FolderInput::named("Work")).await.unwrap();
    let reports = app
        .folders
        .create(FolderInput::named("Reports").under(Some(work.id)))
        .await
        .unwrap();
    app.files
        .create(FileInput::named("q1.pdf").in_folder(Some(reports.id)))
        .await
        .unwrap();

    let mut browser = app.browser();
    browser.load().await.unwrap();

    let root: Vec<_> = browser.visible_folders().into_iter().map(|f| f.name).collect();
    assert_eq!(root, vec!["Work"]);

    browser.open(work.id).unwrap();
    browser.open(reports.id).unwrap();
    let files: Vec<_> = browser.visible_files().into_iter().map(|f| f.name).collect();
    assert_eq!(files, vec!["q1.pdf"]);
    assert_eq!(
        browser.breadcrumbs().await.unwrap().to_string(),
        "Home > Work > Reports"
    );
    assert_eq!(app.store.records("folder1").len(), 2);
}

#[tokio::test]
async fn test_load_tolerates_rows_written_by_other_clients() {
    let app = TestApp::new();
    let work = app.folders.create(FolderInput::named("Work")).await.unwrap();
    let foreign = json!({
        "Id": "42",
        "Name": "imported.csv",
        "upload_date": "2024-01-01T00:00:00Z",
        "last_modified": "2024-01-01T00:00:00Z",
        "folder_id": work.id.to_string()
    });
    let serde_json::Value::Object(foreign) = foreign else {
        panic!("not an object");
    };
    app.store.seed("file1", [foreign]);
    app.files
        .create(FileInput::named("plan.md").in_folder(Some(work.id)))
        .await
        .unwrap();

    let mut browser = app.browser();
    browser.load().await.unwrap();

    browser.open(work.id).unwrap();
    let files: Vec<_> = browser.visible_files().into_iter().map(|f| f.name).collect();
    assert_eq!(files, vec!["plan.md"]);
}

#[tokio::test]
async fn test_load_seeds_configured_folders() {
    let app = TestApp::new();
    let mut browser = app.browser_with(BrowserConfig {
        default_folders: vec!["Inbox".into(), "Archive".into()],
        ..BrowserConfig::default()
    });

    browser.load().await.unwrap();

    let names: Vec<_> = browser.visible_folders().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Archive", "Inbox"]);
    assert_eq!(browser.summary(), "0 files • 2 folders");
}

#[tokio::test(start_paused = true)]
async fn test_upload_select_and_delete() {
    let app = TestApp::new();
    let mut browser = app.browser();
    browser.load().await.unwrap();
    let docs = browser.folder_named("Documents").unwrap();
    browser.open(docs.id).unwrap();

    browser.upload([draft("a.txt", 100), draft("b.txt", 300), draft("c.txt", 200)]);
    assert_eq!(browser.uploads().len(), 3);
    browser.wait_for_uploads().await;
    assert!(browser.uploads().is_empty());

    let messages = app.messages();
    assert!(messages.contains(&"b.txt uploaded successfully!".to_string()));
    assert_eq!(browser.current_folder_info().unwrap().file_count, 3);
    assert_eq!(browser.storage_usage().used, 600);

    browser.set_sort(SortBy::Size);
    let order: Vec<_> = browser.visible_files().into_iter().map(|f| f.name).collect();
    assert_eq!(order, vec!["b.txt", "c.txt", "a.txt"]);

    for name in ["a.txt", "b.txt"] {
        let file = browser.file_named(name).unwrap();
        browser.toggle_selection(file.id);
    }
    assert_eq!(browser.delete_selected().await.unwrap(), 2);
    assert_eq!(app.messages(), vec!["2 file(s) deleted successfully!"]);

    let left: Vec<_> = browser.visible_files().into_iter().map(|f| f.name).collect();
    assert_eq!(left, vec!["c.txt"]);
    assert_eq!(browser.current_folder_info().unwrap().file_count, 1);

    let stored = app.folders.get_by_id(docs.id).await.unwrap().unwrap();
    assert_eq!(stored.file_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_empty_folder_survives_delete() {
    let app = TestApp::new();
    let mut browser = app.browser();
    browser.load().await.unwrap();
    let images = browser.folder_named("Images").unwrap();
    browser.open(images.id).unwrap();
    browser.upload([draft("cat.png", 10)]);
    browser.wait_for_uploads().await;
    app.messages();

    let err = browser.delete_folder(images.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(browser.current_folder(), Some(images.id));
    assert!(app.messages()[0].starts_with("Cannot delete \"Images\""));

    browser.go_home();
    let projects = browser.folder_named("Projects").unwrap();
    browser.delete_folder(projects.id).await.unwrap();
    assert!(browser.folder_named("Projects").is_none());
    assert_eq!(
        app.messages(),
        vec!["Folder \"Projects\" deleted successfully!"]
    );
}

#[tokio::test]
async fn test_rejected_writes_keep_local_state() {
    let app = TestApp::new();
    let mut browser = app.browser();
    browser.load().await.unwrap();
    app.messages();
    app.store.set_reject_writes(true);

    assert!(browser.create_folder("Music").await.is_err());
    assert!(browser.folder_named("Music").is_none());
    assert_eq!(browser.visible_folders().len(), 3);
    assert_eq!(app.messages().len(), 1);
}

#[tokio::test]
async fn test_view_state_survives_navigation() {
    let app = TestApp::new();
    let mut browser = app.browser();
    browser.load().await.unwrap();

    assert_eq!(browser.view_mode(), ViewMode::Grid);
    browser.toggle_view_mode();
    browser.set_search("pro");
    let names: Vec<_> = browser.visible_folders().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Documents", "Images", "Projects"]);

    let projects = browser.folder_named("Projects").unwrap();
    browser.open(projects.id).unwrap();
    assert_eq!(browser.title(), "Projects");
    assert_eq!(browser.view_mode(), ViewMode::List);
    assert_eq!(browser.search(), "pro");
}

#[test]
fn test_shipped_config_matches_defaults() {
    let config = AppConfig::load_file("config/default.toml").unwrap();
    assert_eq!(config.upload, AppConfig::default().upload);
    assert_eq!(config.browser, AppConfig::default().browser);
    assert_eq!(config.logging.level, "warn");
    assert!(!config.backend.is_configured());
}
