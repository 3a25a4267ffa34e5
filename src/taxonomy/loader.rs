use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::node::Taxonomy;
use super::wire::decode;
use super::TaxonomyError;
use crate::cache::{CacheEntry, CacheError, CacheStore, DiskCache, DEFAULT_MAX_AGE_SECS};
use crate::types::CacheKey;

/// Published English taxonomy document.
pub const DEFAULT_TAXONOMY_URL: &str =
    "https://raw.githubusercontent.com/Shopify/product-taxonomy/refs/heads/main/dist/en/taxonomy.json";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub cache_max_age_secs: u64,
    /// Whole-request timeout for network fetches. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_max_age_secs: DEFAULT_MAX_AGE_SECS,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LoaderConfig {
    fn max_age(&self) -> chrono::Duration {
        // chrono panics past i64::MAX milliseconds
        let secs = self.cache_max_age_secs.min(i64::MAX as u64 / 1000);
        chrono::Duration::seconds(secs as i64)
    }
}

/// Per-call fetch switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip both the cache lookup and the cache write.
    pub disable_cache: bool,
}

impl FetchOptions {
    pub fn cache_disabled() -> Self {
        Self {
            disable_cache: true,
        }
    }
}

enum Source {
    Remote(Url),
    Local(PathBuf),
}

impl Source {
    fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Remote(url),
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .unwrap_or_else(|_| PathBuf::from(url.path()));
                Source::Local(path)
            }
            _ => Source::Local(PathBuf::from(source)),
        }
    }
}

/// Resolves a taxonomy document from a URL or a local path.
///
/// Network sources go through the cache unless disabled per call; local
/// sources are read directly and never cached.
pub struct TaxonomyLoader {
    config: LoaderConfig,
    client: reqwest::Client,
    cache: Option<Arc<dyn CacheStore>>,
}

impl TaxonomyLoader {
    /// Loader backed by the platform cache directory, or uncached when the
    /// platform has none.
    pub fn new(config: LoaderConfig) -> Result<Self, TaxonomyError> {
        let cache: Option<Arc<dyn CacheStore>> = match DiskCache::platform_default() {
            Ok(disk) => Some(Arc::new(disk)),
            Err(err) => {
                debug!("Taxonomy cache unavailable: {}", err);
                None
            }
        };
        Self::build(config, cache)
    }

    pub fn with_cache(config: LoaderConfig, cache: Arc<dyn CacheStore>) -> Result<Self, TaxonomyError> {
        Self::build(config, Some(cache))
    }

    pub fn without_cache(config: LoaderConfig) -> Result<Self, TaxonomyError> {
        Self::build(config, None)
    }

    fn build(config: LoaderConfig, cache: Option<Arc<dyn CacheStore>>) -> Result<Self, TaxonomyError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(TaxonomyError::Client)?;
        Ok(Self {
            config,
            client,
            cache,
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub async fn fetch(&self, source: &str, options: FetchOptions) -> Result<Taxonomy, TaxonomyError> {
        if source.is_empty() {
            return Err(TaxonomyError::EmptySource);
        }
        match Source::parse(source) {
            Source::Remote(url) => self.fetch_remote(source, url, options).await,
            Source::Local(path) => {
                debug!("Reading taxonomy from {}", path.display());
                let read = tokio::fs::read(&path).await;
                match read {
                    Ok(bytes) => decode(&bytes),
                    Err(error) => Err(TaxonomyError::Io { path, error }),
                }
            }
        }
    }

    async fn fetch_remote(
        &self,
        source: &str,
        url: Url,
        options: FetchOptions,
    ) -> Result<Taxonomy, TaxonomyError> {
        let key = CacheKey::from_source(source);
        let cache = self.cache.clone().filter(|_| !options.disable_cache);

        if let Some(cache) = &cache {
            let (store, lookup) = (Arc::clone(cache), key.clone());
            let loaded = match tokio::task::spawn_blocking(move || store.get(&lookup)).await {
                Ok(loaded) => loaded,
                Err(err) => {
                    debug!("Taxonomy cache read task failed, treating as miss: {}", err);
                    Ok(None)
                }
            };
            if let Some(taxonomy) = self.load_cached(loaded, &key) {
                return Ok(taxonomy);
            }
        }

        debug!("Fetching taxonomy from {}", source);
        let fetch_error = |error: reqwest::Error| TaxonomyError::Fetch {
            location: source.to_string(),
            error,
        };
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        if response.status() != StatusCode::OK {
            return Err(TaxonomyError::Status {
                location: source.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(fetch_error)?;
        let taxonomy = decode(&bytes)?;

        if let Some(cache) = cache {
            let stored = key.clone();
            let written = tokio::task::spawn_blocking(move || cache.put(&stored, &bytes)).await;
            match written {
                Ok(Ok(())) => debug!("Cached taxonomy under {}", key.as_str()),
                Ok(Err(err)) => debug!("Ignoring taxonomy cache write failure: {}", err),
                Err(err) => debug!("Taxonomy cache write task failed: {}", err),
            }
        }
        Ok(taxonomy)
    }

    fn load_cached(
        &self,
        loaded: Result<Option<CacheEntry>, CacheError>,
        key: &CacheKey,
    ) -> Option<Taxonomy> {
        let entry = match loaded {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("Taxonomy cache miss for {}", key.as_str());
                return None;
            }
            Err(err) => {
                debug!("Taxonomy cache read failed, treating as miss: {}", err);
                return None;
            }
        };
        if !entry.is_fresh(Utc::now(), self.config.max_age()) {
            debug!("Taxonomy cache entry {} expired at {}", key.as_str(), entry.written_at);
            return None;
        }
        match decode(&entry.bytes) {
            Ok(taxonomy) => {
                debug!("Taxonomy cache hit for {}", key.as_str());
                Some(taxonomy)
            }
            Err(err) => {
                debug!("Taxonomy cache entry {} is corrupt: {}", key.as_str(), err);
                None
            }
        }
    }
}
