mod common;

use branding_service::common::error::AppError;
use branding_service::models::assets::MAX_LOGO_SIZE;
use branding_service::models::notifications::NotificationKind;
use branding_service::models::settings::{ConfigSnapshot, SettingKey};
use branding_service::repositories::assets::AssetStore;
use branding_service::repositories::settings::SettingsStore;
use branding_service::usecases::settings_editor::{EditorState, SettingsEditor};
use common::{TestBed, image};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_defaults_without_any_rows() {
    let bed = TestBed::new();
    let snapshot = bed.state.config.refresh().await;
    assert_eq!(
        *snapshot,
        ConfigSnapshot {
            logo_url: None,
            system_name: "Party Member Management System".to_string(),
            primary_color: "#2563eb".to_string(),
            secondary_color: "#64748b".to_string(),
        }
    );
    assert_eq!(*bed.state.config.current(), *snapshot);
}

#[tokio::test]
async fn test_acme_scenario_writes_all_four_keys() {
    let bed = TestBed::new();
    let mut editor = SettingsEditor::open(&bed.state);
    editor.set_system_name("ACME");
    editor.set_primary_color("#ff0000");
    editor.set_secondary_color("#00ff00");

    let notification = editor.commit(&bed.state).await;
    assert_eq!(notification.kind, NotificationKind::Success);

    let entries = bed.settings.fetch_all().await.unwrap();
    assert_eq!(entries.len(), 4);
    let value = |key: SettingKey| {
        entries
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.value.clone())
    };
    assert_eq!(value(SettingKey::LogoUrl), None);
    assert_eq!(value(SettingKey::SystemName).as_deref(), Some("ACME"));
    assert_eq!(value(SettingKey::PrimaryColor).as_deref(), Some("#ff0000"));
    assert_eq!(value(SettingKey::SecondaryColor).as_deref(), Some("#00ff00"));
    assert_eq!(bed.state.config.current().system_name, "ACME");
}

#[tokio::test]
async fn test_saved_snapshot_survives_refresh() {
    let bed = TestBed::new();
    let drafts = [
        ("ACME", "#ff0000", "#00ff00"),
        ("Ünïcode Party", "#000000", "#ffffff"),
        ("x", "rgb(1, 2, 3)", "#abc"),
    ];
    for (name, primary, secondary) in drafts {
        let mut editor = SettingsEditor::open(&bed.state);
        editor.set_system_name(name);
        editor.set_primary_color(primary);
        editor.set_secondary_color(secondary);
        editor.commit(&bed.state).await;
        let saved = editor.draft().clone();

        let refreshed = bed.state.config.refresh().await;
        assert_eq!(*refreshed, saved);
        assert_eq!(*bed.state.config.refresh().await, *refreshed);
    }
}

#[tokio::test]
async fn test_sequential_saves_last_writer_wins() {
    let bed = TestBed::new();
    for color in ["#111111", "#222222"] {
        let mut editor = SettingsEditor::open(&bed.state);
        editor.set_primary_color(color);
        editor.commit(&bed.state).await;
    }
    assert_eq!(bed.state.config.current().primary_color, "#222222");
}

#[tokio::test]
async fn test_concurrent_editors_clobber_each_other() {
    let bed = TestBed::new();
    let mut first = SettingsEditor::open(&bed.state);
    let mut second = SettingsEditor::open(&bed.state);
    first.set_system_name("First");
    second.set_primary_color("#333333");

    first.commit(&bed.state).await;
    second.commit(&bed.state).await;

    // the second draft was seeded before the first save and overwrites its name
    let current = bed.state.config.current();
    assert_eq!(current.system_name, ConfigSnapshot::default().system_name);
    assert_eq!(current.primary_color, "#333333");
}

#[tokio::test]
async fn test_replacing_logo_leaves_only_new_object() {
    let bed = TestBed::new();
    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("a.png", "image/png", 0xAA, 32))
        .unwrap();
    editor.commit(&bed.state).await;
    let first_url = bed.state.config.current().logo_url.clone().unwrap();
    assert!(first_url.ends_with("/assets/system/system/logo.png"));

    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("b.jpg", "image/jpeg", 0xBB, 64))
        .unwrap();
    editor.commit(&bed.state).await;

    assert_eq!(bed.assets.list().await.unwrap(), vec!["system/logo.jpg"]);
    assert!(bed.assets.fetch("system/logo.png").await.unwrap().is_none());
    let current = bed.state.config.current();
    assert!(current.logo_url.as_deref().unwrap().ends_with("system/logo.jpg"));
}

#[tokio::test]
async fn test_replacing_logo_with_same_extension_overwrites() {
    let bed = TestBed::new();
    for fill in [1u8, 2u8] {
        let mut editor = SettingsEditor::open(&bed.state);
        editor
            .stage_logo(image("logo.png", "image/png", fill, 8))
            .unwrap();
        editor.commit(&bed.state).await;
    }
    assert_eq!(bed.assets.list().await.unwrap(), vec!["system/logo.png"]);
    let stored = bed.assets.fetch("system/logo.png").await.unwrap().unwrap();
    assert_eq!(stored.bytes, vec![2u8; 8]);
}

#[tokio::test]
async fn test_oversized_or_non_image_logo_is_rejected() {
    let bed = TestBed::new();
    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("logo.png", "image/png", 0, 16))
        .unwrap();
    editor.commit(&bed.state).await;
    let logo_url = bed.state.config.current().logo_url.clone();
    assert!(logo_url.is_some());

    let mut editor = SettingsEditor::open(&bed.state);
    let too_big = image("big.png", "image/png", 0, 6 * 1024 * 1024);
    let err = editor.stage_logo(too_big).unwrap_err();
    assert!(err.is_invalid_asset());
    let text = image("notes.txt", "text/plain", b'a', 16);
    let err = editor.stage_logo(text).unwrap_err();
    assert_eq!(err, AppError::AssetsInvalidContentType);

    editor.commit(&bed.state).await;
    assert_eq!(bed.state.config.current().logo_url, logo_url);
    assert_eq!(bed.assets.list().await.unwrap(), vec!["system/logo.png"]);
}

#[tokio::test]
async fn test_removing_logo_clears_url_and_object() {
    let bed = TestBed::new();
    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("logo.gif", "image/gif", 7, 8))
        .unwrap();
    editor.commit(&bed.state).await;

    let mut editor = SettingsEditor::open(&bed.state);
    editor.request_logo_removal();
    let notification = editor.commit(&bed.state).await;

    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(bed.state.config.current().logo_url, None);
    assert!(bed.assets.list().await.unwrap().is_empty());
    let entry = bed.settings.inner.get(SettingKey::LogoUrl).await.unwrap();
    assert_eq!(entry.value, None);
}

#[tokio::test]
async fn test_cleanup_failure_does_not_block_upload() {
    let bed = TestBed::new();
    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("logo.png", "image/png", 1, 8))
        .unwrap();
    editor.commit(&bed.state).await;

    bed.assets.fail_removals(true);
    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("logo.svg", "image/svg+xml", 2, 8))
        .unwrap();
    let notification = editor.commit(&bed.state).await;

    assert_eq!(notification.kind, NotificationKind::Success);
    let current = bed.state.config.current();
    assert!(current.logo_url.as_deref().unwrap().ends_with("system/logo.svg"));
    // the superseded object is leaked, not fatal
    assert_eq!(
        bed.assets.list().await.unwrap(),
        vec!["system/logo.png", "system/logo.svg"]
    );
}

#[tokio::test]
async fn test_upload_failure_aborts_save() {
    let bed = TestBed::new();
    bed.assets.fail_uploads(true);
    let mut editor = SettingsEditor::open(&bed.state);
    editor.set_system_name("ACME");
    editor
        .stage_logo(image("logo.png", "image/png", 1, 8))
        .unwrap();

    let notification = editor.commit(&bed.state).await;

    assert!(notification.is_error());
    assert_eq!(notification.message, "Failed to upload logo");
    assert_eq!(editor.state(), EditorState::Editing);
    assert_eq!(editor.failure(), Some(&AppError::AssetsStoreUnavailable));
    assert!(editor.staged_logo().is_some());
    assert_eq!(editor.draft().system_name, "ACME");
    assert_eq!(bed.settings.inner.len().await, 0);
    assert_eq!(*bed.state.config.current(), ConfigSnapshot::default());
}

#[tokio::test]
async fn test_partial_commit_is_reported_generically() {
    let bed = TestBed::new();
    bed.settings.fail_writes_after(2);
    let mut editor = SettingsEditor::open(&bed.state);
    editor.set_system_name("ACME");
    editor.set_primary_color("#ff0000");
    editor.set_secondary_color("#00ff00");

    let notification = editor.commit(&bed.state).await;

    assert_eq!(notification.message, "Failed to save settings");
    assert_eq!(editor.failure(), Some(&AppError::SettingsPartiallyCommitted));
    assert_eq!(editor.state(), EditorState::Editing);
    // logo_url and system_name made it, the colors did not
    assert_eq!(bed.settings.inner.len().await, 2);
    assert_eq!(*bed.state.config.current(), ConfigSnapshot::default());

    // the next refresh exposes the mixed state
    let mixed = bed.state.config.refresh().await;
    assert_eq!(mixed.system_name, "ACME");
    assert_eq!(mixed.primary_color, ConfigSnapshot::default().primary_color);

    // retrying the same draft completes the save
    bed.settings.fail_writes_after(usize::MAX);
    let notification = editor.commit(&bed.state).await;
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(bed.state.config.current().primary_color, "#ff0000");
}

#[tokio::test]
async fn test_unreachable_settings_store() {
    let bed = TestBed::new();
    bed.settings.fail_writes_after(0);
    let mut editor = SettingsEditor::open(&bed.state);
    editor.set_system_name("ACME");

    let notification = editor.commit(&bed.state).await;

    assert_eq!(notification.message, "Failed to save settings");
    assert_eq!(editor.failure(), Some(&AppError::SettingsStoreUnavailable));
    assert_eq!(bed.settings.inner.len().await, 0);
}

#[tokio::test]
async fn test_refresh_failure_after_write_surfaces_error() {
    let bed = TestBed::new();
    bed.settings.fail_reads(true);
    let mut editor = SettingsEditor::open(&bed.state);
    editor.set_system_name("ACME");

    let notification = editor.commit(&bed.state).await;

    assert!(notification.is_error());
    assert_eq!(editor.state(), EditorState::Editing);
    // written, but not yet visible to readers
    assert_eq!(bed.settings.inner.len().await, 4);
    assert_eq!(*bed.state.config.current(), ConfigSnapshot::default());

    bed.settings.fail_reads(false);
    assert_eq!(bed.state.config.refresh().await.system_name, "ACME");
}

#[tokio::test]
async fn test_save_notifies_every_subscriber() {
    let bed = TestBed::new();
    let header = Arc::new(Mutex::new(None));
    let sidebar = Arc::new(Mutex::new(None));
    for sink in [header.clone(), sidebar.clone()] {
        bed.state.config.subscribe(move |snapshot| {
            *sink.lock().unwrap() = Some(snapshot.system_name.clone());
        });
    }

    let mut editor = SettingsEditor::open(&bed.state);
    editor.set_system_name("ACME");
    editor.commit(&bed.state).await;

    assert_eq!(header.lock().unwrap().as_deref(), Some("ACME"));
    assert_eq!(sidebar.lock().unwrap().as_deref(), Some("ACME"));
}

#[tokio::test]
async fn test_size_limit_is_inclusive() {
    let bed = TestBed::new();
    let mut editor = SettingsEditor::open(&bed.state);
    editor
        .stage_logo(image("logo.png", "image/png", 0, MAX_LOGO_SIZE))
        .unwrap();
    let notification = editor.commit(&bed.state).await;
    assert_eq!(notification.kind, NotificationKind::Success);
}
