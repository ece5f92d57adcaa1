//! Storage manager: routes operations to the provider for each storage area.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use vidvault_core::config::storage::StorageConfig;
use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::traits::storage::StorageProvider;

use crate::providers::LocalStorageProvider;

/// The two places media ends up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// Downloaded media files.
    Videos,
    /// Generated preview images.
    Previews,
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Videos => f.write_str("videos"),
            Self::Previews => f.write_str("previews"),
        }
    }
}

/// Central storage manager that holds the provider for every area.
#[derive(Debug, Clone, Default)]
pub struct StorageManager {
    providers: Arc<RwLock<HashMap<StorageArea, Arc<dyn StorageProvider>>>>,
}

impl StorageManager {
    /// Create a new empty storage manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with local providers at the configured roots.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let manager = Self::new();
        manager
            .register(
                StorageArea::Videos,
                Arc::new(LocalStorageProvider::new(&config.video_root).await?),
            )
            .await;
        manager
            .register(
                StorageArea::Previews,
                Arc::new(LocalStorageProvider::new(&config.preview_root).await?),
            )
            .await;
        info!(
            video_root = %config.video_root,
            preview_root = %config.preview_root,
            "Storage areas ready"
        );
        Ok(manager)
    }

    /// Register (or replace) the provider for an area.
    pub async fn register(&self, area: StorageArea, provider: Arc<dyn StorageProvider>) {
        let mut providers = self.providers.write().await;
        providers.insert(area, provider);
    }

    /// Get the provider for an area.
    pub async fn get(&self, area: StorageArea) -> AppResult<Arc<dyn StorageProvider>> {
        let providers = self.providers.read().await;
        providers
            .get(&area)
            .cloned()
            .ok_or_else(|| AppError::configuration(format!("No storage registered for {area}")))
    }

    /// Check health of all registered providers.
    pub async fn health_check_all(&self) -> HashMap<StorageArea, bool> {
        let providers = self.providers.read().await;
        let mut results = HashMap::new();
        for (area, provider) in providers.iter() {
            let healthy = provider.health_check().await.unwrap_or(false);
            results.insert(*area, healthy);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_registers_both_areas() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            video_root: dir.path().join("videos").display().to_string(),
            preview_root: dir.path().join("previews").display().to_string(),
        };

        let manager = StorageManager::from_config(&config).await.unwrap();
        let health = manager.health_check_all().await;
        assert_eq!(health.len(), 2);
        assert!(health.values().all(|ok| *ok));
        assert!(dir.path().join("previews").is_dir());
    }

    #[tokio::test]
    async fn test_missing_area_is_configuration_error() {
        let manager = StorageManager::new();
        let err = manager.get(StorageArea::Videos).await.unwrap_err();
        assert_eq!(err.kind, vidvault_core::error::ErrorKind::Configuration);
    }
}
