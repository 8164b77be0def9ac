use chrono::{DateTime, Utc};
use std::fmt::{Debug, Formatter};

pub const LOGO_BUCKET: &str = "system";
pub const LOGO_DIRECTORY: &str = "system";
pub const LOGO_STEM: &str = "logo";
pub const LOGO_PATH_PREFIX: &str = const_str::concat!(LOGO_DIRECTORY, "/", LOGO_STEM, ".");
pub const MAX_LOGO_SIZE: usize = 5 * 1024 * 1024;
/// Logo objects younger than this are never swept as orphans; a save writes
/// the object before it writes `logo_url`.
pub const ORPHAN_GRACE_PERIOD_MINUTES: i64 = 10;
const FALLBACK_EXTENSION: &str = "bin";

#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Debug for Asset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Asset")
            .field("path", &self.path)
            .field("size", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("uploaded_at", &self.uploaded_at)
            .finish()
    }
}

/// A file picked by the user, not yet stored anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Debug for LogoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl LogoFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Extension of the file name, or the content subtype when the name has none.
    /// `image/svg+xml` yields `svg`. Anything but ascii alphanumerics yields `bin`.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim())
            .filter(|ext| !ext.is_empty());
        let ext = match from_name {
            Some(ext) => Some(ext),
            None => self
                .content_type
                .split_once('/')
                .map(|(_, subtype)| subtype)
                .and_then(|subtype| subtype.split(['+', ';']).next())
                .map(str::trim),
        };
        match ext.filter(|ext| is_valid_extension(ext)) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => FALLBACK_EXTENSION.to_string(),
        }
    }

    /// `system/logo.<ext>`
    pub fn storage_path(&self) -> String {
        format!("{LOGO_PATH_PREFIX}{}", self.extension())
    }

    pub fn into_asset(self) -> Asset {
        let path = self.storage_path();
        Asset {
            path,
            bytes: self.bytes,
            content_type: self.content_type,
            uploaded_at: Utc::now(),
        }
    }
}

fn is_valid_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub fn is_logo_path(path: &str) -> bool {
    path.strip_prefix(LOGO_PATH_PREFIX)
        .is_some_and(is_valid_extension)
}

/// Maps object paths in one bucket to public URLs and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    base_url: String,
    bucket: String,
}

impl AssetLocator {
    pub fn new(base_url: &str, bucket: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/assets/{}/{path}", self.base_url, self.bucket)
    }

    /// Recovers the object path from a URL produced by [`AssetLocator::public_url`].
    /// Foreign URLs are mapped by their last segment into the logo directory.
    pub fn path_of(&self, url: &str) -> Option<String> {
        let prefix = self.public_url("");
        if let Some(path) = url.strip_prefix(&prefix) {
            let path = strip_query(path);
            return (!path.is_empty()).then(|| path.to_string());
        }
        strip_query(url)
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(|name| format!("{LOGO_DIRECTORY}/{name}"))
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
