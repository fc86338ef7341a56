//! Disk-based cache for the static part of the directory.
//!
//! Line and station listings change rarely, so they are kept in a JSON file
//! between process runs. Distance estimates and line orderings are always
//! fetched from the inner provider.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{LineCode, StationCode};

use super::error::DirectoryError;
use super::{DirectoryProvider, LineRecord, StationRecord};

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached directory listings with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedListings {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    pub lines: Vec<LineRecord>,
    pub stations: Vec<StationRecord>,
}

/// Configuration for the directory disk cache.
#[derive(Debug, Clone)]
pub struct DirectoryCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache remains valid.
    pub ttl: Duration,
}

impl DirectoryCacheConfig {
    /// Create a new cache config with the given path and default TTL (24 hours).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for DirectoryCacheConfig {
    fn default() -> Self {
        Self::new("metro_directory_cache.json")
    }
}

/// Disk cache for line and station listings.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    config: DirectoryCacheConfig,
}

impl DirectoryCache {
    /// Create a new directory cache with the given config.
    pub fn new(config: DirectoryCacheConfig) -> Self {
        Self { config }
    }

    /// Try to load listings from the cache.
    ///
    /// Returns `None` if the cache doesn't exist, is invalid, or has expired.
    pub fn load(&self) -> Option<CachedListings> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let cached: CachedListings = serde_json::from_str(&contents).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        let age_secs = now.saturating_sub(cached.cached_at_secs);
        if age_secs >= self.config.ttl.as_secs() {
            return None;
        }

        Some(cached)
    }

    /// Save listings to the cache.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(
        &self,
        lines: &[LineRecord],
        stations: &[StationRecord],
    ) -> Result<(), DirectoryError> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| DirectoryError::Cache {
                message: "system time before unix epoch".to_string(),
            })?
            .as_secs();

        let cached = CachedListings {
            cached_at_secs: now,
            lines: lines.to_vec(),
            stations: stations.to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| DirectoryError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(&cached).map_err(|e| DirectoryError::Cache {
            message: format!("failed to serialize cache: {}", e),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| DirectoryError::Cache {
            message: format!("failed to write cache file: {}", e),
        })?;

        Ok(())
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

/// A provider whose line and station listings are served from a disk cache.
pub struct CachingDirectory<P> {
    inner: P,
    cache: DirectoryCache,
}

impl<P: DirectoryProvider + Sync> CachingDirectory<P> {
    /// Wrap `inner` with a disk cache.
    pub fn new(inner: P, cache: DirectoryCache) -> Self {
        Self { inner, cache }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Load listings from disk, or fetch both from the inner provider and store them.
    async fn listings(&self) -> Result<CachedListings, DirectoryError> {
        if let Some(cached) = self.cache.load() {
            debug!(path = %self.cache.path().display(), "directory listings served from cache");
            return Ok(cached);
        }

        let lines = self.inner.list_lines().await?;
        let stations = self.inner.list_stations().await?;
        self.cache.save(&lines, &stations)?;
        debug!(
            path = %self.cache.path().display(),
            lines = lines.len(),
            stations = stations.len(),
            "directory listings cached"
        );

        Ok(CachedListings {
            cached_at_secs: 0,
            lines,
            stations,
        })
    }
}

impl<P: DirectoryProvider + Sync> DirectoryProvider for CachingDirectory<P> {
    async fn list_lines(&self) -> Result<Vec<LineRecord>, DirectoryError> {
        Ok(self.listings().await?.lines)
    }

    async fn list_stations(&self) -> Result<Vec<StationRecord>, DirectoryError> {
        Ok(self.listings().await?.stations)
    }

    async fn average_speed(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Option<f64>, DirectoryError> {
        self.inner.average_speed(line, start, end).await
    }

    async fn ordered_stations(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Vec<StationCode>, DirectoryError> {
        self.inner.ordered_stations(line, start, end).await
    }

    async fn distances_to(
        &self,
        destination: &StationCode,
    ) -> Result<HashMap<StationCode, f64>, DirectoryError> {
        self.inner.distances_to(destination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticDirectory;
    use tempfile::tempdir;

    fn sample_lines() -> Vec<LineRecord> {
        vec![LineRecord {
            code: LineCode::parse("RD").unwrap(),
            display_name: "Red".to_string(),
            start: StationCode::parse("A15").unwrap(),
            end: StationCode::parse("B11").unwrap(),
        }]
    }

    fn sample_stations() -> Vec<StationRecord> {
        vec![
            StationRecord {
                name: "Metro Center".to_string(),
                code: StationCode::parse("A01").unwrap(),
                lines: vec![LineCode::parse("RD").unwrap()],
                together: vec![StationCode::parse("C01").unwrap()],
            },
            StationRecord {
                name: "Farragut North".to_string(),
                code: StationCode::parse("A02").unwrap(),
                lines: vec![LineCode::parse("RD").unwrap()],
                together: vec![],
            },
        ]
    }

    #[test]
    fn save_and_load_cache() {
        let dir = tempdir().unwrap();
        let cache = DirectoryCache::new(DirectoryCacheConfig::new(dir.path().join("dir.json")));

        cache.save(&sample_lines(), &sample_stations()).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.lines, sample_lines());
        assert_eq!(loaded.stations.len(), 2);
        assert_eq!(loaded.stations[0].name, "Metro Center");
        assert_eq!(loaded.stations[0].together[0].as_str(), "C01");
    }

    #[test]
    fn expired_cache_returns_none() {
        let dir = tempdir().unwrap();
        let config =
            DirectoryCacheConfig::new(dir.path().join("dir.json")).with_ttl(Duration::from_secs(0));
        let cache = DirectoryCache::new(config);

        cache.save(&sample_lines(), &sample_stations()).unwrap();

        // With 0 TTL, cache should immediately be expired
        assert!(cache.load().is_none());
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = DirectoryCache::new(DirectoryCacheConfig::new("/nonexistent/path/dir.json"));
        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dir.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cache = DirectoryCache::new(DirectoryCacheConfig::new(&path));
        assert!(cache.load().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("dir.json");
        let cache = DirectoryCache::new(DirectoryCacheConfig::new(&path));

        cache.save(&sample_lines(), &sample_stations()).unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn caching_directory_fetches_listings_once() {
        let dir = tempdir().unwrap();
        let cache = DirectoryCache::new(DirectoryCacheConfig::new(dir.path().join("dir.json")));
        let inner = StaticDirectory::from_fixture(crate::directory::memory::tests::cross_fixture());
        let provider = CachingDirectory::new(inner, cache);

        let lines = provider.list_lines().await.unwrap();
        let stations = provider.list_stations().await.unwrap();
        let lines_again = provider.list_lines().await.unwrap();

        assert_eq!(lines, lines_again);
        assert!(!stations.is_empty());

        let calls = provider.inner().calls();
        assert_eq!(calls.list_lines, 1);
        assert_eq!(calls.list_stations, 1);
    }

    #[tokio::test]
    async fn caching_directory_always_forwards_distances() {
        let dir = tempdir().unwrap();
        let cache = DirectoryCache::new(DirectoryCacheConfig::new(dir.path().join("dir.json")));
        let inner = StaticDirectory::from_fixture(crate::directory::memory::tests::cross_fixture());
        let provider = CachingDirectory::new(inner, cache);

        let dest = StationCode::parse("R04").unwrap();
        provider.distances_to(&dest).await.unwrap();
        provider.distances_to(&dest).await.unwrap();

        assert_eq!(provider.inner().calls().distances_to, 2);
    }
}
