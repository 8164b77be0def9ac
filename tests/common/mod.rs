#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use branding_service::common::state::AppState;
use branding_service::models::assets::{Asset, AssetLocator, LOGO_BUCKET, LogoFile};
use branding_service::models::settings::SettingEntry;
use branding_service::repositories::assets::AssetStore;
use branding_service::repositories::memory::{InMemoryAssetStore, InMemorySettingsStore};
use branding_service::repositories::settings::{SettingsStore, UpsertFailure};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const BASE_URL: &str = "https://branding.test";

/// In-memory settings that can be told to fail reads, or to fail writes
/// after a number of entries.
pub struct FlakySettingsStore {
    pub inner: InMemorySettingsStore,
    fail_reads: AtomicBool,
    /// `usize::MAX` means writes never fail
    writes_before_failure: AtomicUsize,
}

impl FlakySettingsStore {
    pub fn new() -> Self {
        Self {
            inner: InMemorySettingsStore::new(),
            fail_reads: AtomicBool::new(false),
            writes_before_failure: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes_after(&self, written: usize) {
        self.writes_before_failure.store(written, Ordering::SeqCst);
    }
}

#[async_trait]
impl SettingsStore for FlakySettingsStore {
    async fn fetch_all(&self) -> anyhow::Result<Vec<SettingEntry>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("settings table unreachable");
        }
        self.inner.fetch_all().await
    }

    async fn upsert_many(&self, entries: &[SettingEntry]) -> Result<(), UpsertFailure> {
        let limit = self.writes_before_failure.load(Ordering::SeqCst);
        if entries.len() <= limit {
            return self.inner.upsert_many(entries).await;
        }
        self.inner.upsert_many(&entries[..limit]).await?;
        Err(UpsertFailure {
            written: limit,
            error: anyhow::anyhow!("connection reset"),
        })
    }
}

pub struct FlakyAssetStore {
    pub inner: InMemoryAssetStore,
    fail_uploads: AtomicBool,
    fail_removals: AtomicBool,
}

impl FlakyAssetStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryAssetStore::new(AssetLocator::new(BASE_URL, LOGO_BUCKET)),
            fail_uploads: AtomicBool::new(false),
            fail_removals: AtomicBool::new(false),
        }
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetStore for FlakyAssetStore {
    fn locator(&self) -> &AssetLocator {
        self.inner.locator()
    }

    async fn upload(&self, asset: &Asset, upsert: bool) -> anyhow::Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            anyhow::bail!("bucket unreachable");
        }
        self.inner.upload(asset, upsert).await
    }

    async fn fetch(&self, path: &str) -> anyhow::Result<Option<Asset>> {
        self.inner.fetch(path).await
    }

    async fn uploaded_at(&self, path: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        self.inner.uploaded_at(path).await
    }

    async fn remove(&self, paths: &[String]) -> anyhow::Result<()> {
        if self.fail_removals.load(Ordering::SeqCst) {
            anyhow::bail!("bucket unreachable");
        }
        self.inner.remove(paths).await
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        self.inner.list().await
    }
}

pub struct TestBed {
    pub state: AppState,
    pub settings: Arc<FlakySettingsStore>,
    pub assets: Arc<FlakyAssetStore>,
}

impl TestBed {
    pub fn new() -> Self {
        let settings = Arc::new(FlakySettingsStore::new());
        let assets = Arc::new(FlakyAssetStore::new());
        let state = AppState::new(settings.clone(), assets.clone());
        Self {
            state,
            settings,
            assets,
        }
    }
}

pub fn image(name: &str, content_type: &str, fill: u8, size: usize) -> LogoFile {
    LogoFile::new(name, content_type, vec![fill; size])
}
