//! Draft-and-commit editing of the branding settings.
//!
//! An editor is seeded from the cache's current snapshot. Edits stay local
//! until [`SettingsEditor::commit`], which writes the logo (if any), then every
//! setting key, then refreshes the cache so all subscribers see the result.
//! Failures never escape: they are logged and turned into a [`Notification`].

use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::models::assets::LogoFile;
use crate::models::notifications::Notification;
use crate::models::settings::ConfigSnapshot;
use crate::usecases::logo::{self, CleanupStatus};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Editing,
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogoChange {
    Unchanged,
    Replace(LogoFile),
    Remove,
}

pub struct SettingsEditor {
    state: EditorState,
    draft: ConfigSnapshot,
    logo_change: LogoChange,
    notification: Option<Notification>,
    failure: Option<AppError>,
}

impl SettingsEditor {
    pub fn open<C: Context>(ctx: &C) -> Self {
        Self::seeded(ctx.config().current())
    }

    /// Like [`SettingsEditor::open`], but loads the cache first if no refresh
    /// has succeeded yet, so a draft is never seeded from the defaults while
    /// the store holds saved values.
    pub async fn open_loaded<C: Context>(ctx: &C) -> ServiceResult<Self> {
        if ctx.config().is_loaded() {
            return Ok(Self::open(ctx));
        }
        let snapshot = ctx.config().try_refresh().await?;
        Ok(Self::seeded(snapshot))
    }

    fn seeded(snapshot: Arc<ConfigSnapshot>) -> Self {
        Self {
            state: EditorState::Idle,
            draft: ConfigSnapshot::clone(&snapshot),
            logo_change: LogoChange::Unchanged,
            notification: None,
            failure: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &ConfigSnapshot {
        &self.draft
    }

    pub fn staged_logo(&self) -> Option<&LogoFile> {
        match &self.logo_change {
            LogoChange::Replace(file) => Some(file),
            _ => None,
        }
    }

    pub fn logo_removal_requested(&self) -> bool {
        self.logo_change == LogoChange::Remove
    }

    /// The last notification, while it is still meant to be displayed.
    pub fn notification(&self) -> Option<&Notification> {
        let now = Utc::now();
        self.notification
            .as_ref()
            .filter(|notification| notification.is_visible_at(now))
    }

    /// Why the last commit failed, if it did.
    pub fn failure(&self) -> Option<&AppError> {
        self.failure.as_ref()
    }

    pub fn set_system_name(&mut self, system_name: impl Into<String>) {
        self.draft.system_name = system_name.into();
        self.touch();
    }

    pub fn set_primary_color(&mut self, primary_color: impl Into<String>) {
        self.draft.primary_color = primary_color.into();
        self.touch();
    }

    pub fn set_secondary_color(&mut self, secondary_color: impl Into<String>) {
        self.draft.secondary_color = secondary_color.into();
        self.touch();
    }

    /// Stages `file` to replace the logo on commit, cancelling a pending
    /// removal. A file that fails validation is not staged.
    pub fn stage_logo(&mut self, file: LogoFile) -> ServiceResult<()> {
        if let Err(e) = logo::validate(&file) {
            self.notify_failure(&e);
            return Err(e);
        }
        self.logo_change = LogoChange::Replace(file);
        self.touch();
        Ok(())
    }

    /// Requests the logo be removed on commit, discarding any staged file.
    pub fn request_logo_removal(&mut self) {
        self.logo_change = match self.draft.logo_url {
            Some(_) => LogoChange::Remove,
            None => LogoChange::Unchanged,
        };
        self.touch();
    }

    /// Discards all local edits and re-seeds from the cache.
    pub fn reset<C: Context>(&mut self, ctx: &C) {
        *self = Self::open(ctx);
    }

    /// Saves the draft. Returns the notification raised for the outcome.
    pub async fn commit<C: Context>(&mut self, ctx: &C) -> Notification {
        self.state = EditorState::Saving;
        self.failure = None;

        let notification = match self.save(ctx).await {
            Ok(snapshot) => {
                info!(system_name = %snapshot.system_name, "Settings saved");
                *self = Self::seeded(snapshot);
                Notification::success("Settings saved successfully")
            }
            Err(e) => {
                self.state = EditorState::Editing;
                let notification = Notification::error(&e);
                self.failure = Some(e);
                notification
            }
        };
        if let Some(e) = &self.failure {
            error!("Error saving settings: {}", e.code());
        }
        self.notification = Some(notification.clone());
        notification
    }

    async fn save<C: Context>(&mut self, ctx: &C) -> ServiceResult<Arc<ConfigSnapshot>> {
        match std::mem::replace(&mut self.logo_change, LogoChange::Unchanged) {
            LogoChange::Unchanged => {}
            LogoChange::Replace(file) => {
                match logo::upload(ctx, file.clone(), self.draft.logo_url.as_deref()).await {
                    Ok(uploaded) => {
                        log_cleanup(&uploaded.cleanup);
                        self.draft.logo_url = Some(uploaded.locator);
                    }
                    Err(e) => {
                        self.logo_change = LogoChange::Replace(file);
                        return Err(e);
                    }
                }
            }
            LogoChange::Remove => {
                let cleanup = logo::remove(ctx, self.draft.logo_url.as_deref()).await;
                log_cleanup(&cleanup);
                self.draft.logo_url = None;
            }
        }

        let entries = self.draft.to_entries(Utc::now());
        if let Err(failure) = ctx.settings_store().upsert_many(&entries).await {
            error!(
                written = failure.written,
                total = entries.len(),
                "Settings store write failed: {:?}",
                failure.error
            );
            return match failure.is_partial() {
                true => Err(AppError::SettingsPartiallyCommitted),
                false => Err(AppError::SettingsStoreUnavailable),
            };
        }

        ctx.config().try_refresh().await
    }

    fn touch(&mut self) {
        if self.state == EditorState::Idle {
            self.state = EditorState::Editing;
        }
    }

    fn notify_failure(&mut self, e: &AppError) {
        warn!("Rejected logo: {}", e.code());
        self.notification = Some(Notification::error(e));
    }
}

fn log_cleanup(cleanup: &CleanupStatus) {
    match cleanup {
        CleanupStatus::Skipped => {}
        CleanupStatus::Removed(path) => info!(path = %path, "Removed previous logo"),
        CleanupStatus::Failed(path) => warn!(path = %path, "Previous logo left in storage"),
    }
}
