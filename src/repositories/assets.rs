use crate::common::redis_pool::RedisPool;
use crate::entities::assets::{
    BYTES_FIELD, CONTENT_TYPE_FIELD, StoredObject, UPLOADED_AT_FIELD, uploaded_at_from_millis,
};
use crate::models::assets::{Asset, AssetLocator};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use std::ops::DerefMut;

/// Blob storage scoped to a single bucket.
#[async_trait]
pub trait AssetStore: Send + Sync {
    fn locator(&self) -> &AssetLocator;

    /// Writes the object at `asset.path`. With `upsert` unset, an existing
    /// object at that path is an error.
    async fn upload(&self, asset: &Asset, upsert: bool) -> anyhow::Result<()>;

    async fn fetch(&self, path: &str) -> anyhow::Result<Option<Asset>>;

    /// When the object at `path` was last written, without reading its bytes.
    async fn uploaded_at(&self, path: &str) -> anyhow::Result<Option<DateTime<Utc>>>;

    async fn remove(&self, paths: &[String]) -> anyhow::Result<()>;

    /// All object paths in the bucket, sorted.
    async fn list(&self) -> anyhow::Result<Vec<String>>;

    fn public_url(&self, path: &str) -> String {
        self.locator().public_url(path)
    }
}

const BASE_KEY: &str = "branding:assets";

fn make_object_key(bucket: &str, path: &str) -> String {
    format!("{BASE_KEY}:{bucket}:objects:{path}")
}

fn make_index_key(bucket: &str) -> String {
    format!("{BASE_KEY}:{bucket}:index")
}

pub struct RedisAssetStore {
    redis: RedisPool,
    locator: AssetLocator,
}

impl RedisAssetStore {
    pub fn new(redis: RedisPool, locator: AssetLocator) -> Self {
        Self { redis, locator }
    }

    fn bucket(&self) -> &str {
        self.locator.bucket()
    }
}

#[async_trait]
impl AssetStore for RedisAssetStore {
    fn locator(&self) -> &AssetLocator {
        &self.locator
    }

    async fn upload(&self, asset: &Asset, upsert: bool) -> anyhow::Result<()> {
        let mut redis = self.redis.get().await?;
        let key = make_object_key(self.bucket(), &asset.path);
        if !upsert {
            let exists: bool = redis.exists(&key).await?;
            if exists {
                anyhow::bail!("asset already exists: {}", asset.path);
            }
        }
        redis::pipe()
            .atomic()
            .del(&key)
            .ignore()
            .hset(&key, CONTENT_TYPE_FIELD, &asset.content_type)
            .ignore()
            .hset(&key, BYTES_FIELD, asset.bytes.as_slice())
            .ignore()
            .hset(&key, UPLOADED_AT_FIELD, asset.uploaded_at.timestamp_millis())
            .ignore()
            .sadd(make_index_key(self.bucket()), &asset.path)
            .ignore()
            .exec_async(redis.deref_mut())
            .await?;
        Ok(())
    }

    async fn fetch(&self, path: &str) -> anyhow::Result<Option<Asset>> {
        let mut redis = self.redis.get().await?;
        let key = make_object_key(self.bucket(), path);
        let (content_type, bytes, uploaded_at): (Option<String>, Option<Vec<u8>>, Option<i64>) =
            redis::cmd("HMGET")
                .arg(key)
                .arg(CONTENT_TYPE_FIELD)
                .arg(BYTES_FIELD)
                .arg(UPLOADED_AT_FIELD)
                .query_async(redis.deref_mut())
                .await?;
        let object = StoredObject {
            content_type,
            bytes,
            uploaded_at,
        };
        Ok(object.into_asset(path))
    }

    async fn uploaded_at(&self, path: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        let mut redis = self.redis.get().await?;
        let key = make_object_key(self.bucket(), path);
        let (exists, uploaded_at): (bool, Option<i64>) = redis::pipe()
            .exists(&key)
            .hget(&key, UPLOADED_AT_FIELD)
            .query_async(redis.deref_mut())
            .await?;
        Ok(exists.then(|| uploaded_at_from_millis(uploaded_at)))
    }

    async fn remove(&self, paths: &[String]) -> anyhow::Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut redis = self.redis.get().await?;
        let index_key = make_index_key(self.bucket());
        let mut pipe = redis::pipe();
        pipe.atomic();
        for path in paths {
            pipe.del(make_object_key(self.bucket(), path))
                .ignore()
                .srem(&index_key, path)
                .ignore();
        }
        pipe.exec_async(redis.deref_mut()).await?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut redis = self.redis.get().await?;
        let mut paths: Vec<String> = redis.smembers(make_index_key(self.bucket())).await?;
        paths.sort();
        Ok(paths)
    }
}
