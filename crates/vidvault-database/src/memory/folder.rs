//! In-memory folder store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::types::FolderId;
use vidvault_entity::folder::{CreateFolder, Folder};

use crate::store::FolderStore;

/// Folder records keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryFolderStore {
    folders: Arc<RwLock<HashMap<FolderId, Folder>>>,
}

impl MemoryFolderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(
    folders: &HashMap<FolderId, Folder>,
    name: &str,
    parent_id: Option<FolderId>,
    except: Option<FolderId>,
) -> bool {
    folders
        .values()
        .any(|f| f.parent_id == parent_id && f.name == name && Some(f.id) != except)
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        if name_taken(&folders, &data.name, data.parent_id, None) {
            return Err(AppError::conflict(format!(
                "Folder '{}' already exists",
                data.name
            )));
        }

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            name: data.name.clone(),
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
        };
        folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.folders.read().await.get(&id).cloned())
    }

    async fn exists_by_name(&self, name: &str, parent_id: Option<FolderId>) -> AppResult<bool> {
        Ok(name_taken(&*self.folders.read().await, name, parent_id, None))
    }

    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        let parent_id = folders
            .get(&id)
            .map(|f| f.parent_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if name_taken(&folders, name, parent_id, Some(id)) {
            return Err(AppError::conflict(format!("Folder '{name}' already exists")));
        }

        let folder = folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.name = name.to_string();
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn move_to(&self, id: FolderId, parent_id: FolderId) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        let name = folders
            .get(&id)
            .map(|f| f.name.clone())
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if name_taken(&folders, &name, Some(parent_id), Some(id)) {
            return Err(AppError::conflict(format!(
                "Folder '{name}' already exists in {parent_id}"
            )));
        }

        let folder = folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.parent_id = Some(parent_id);
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn children_of(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>> {
        let folders = self.folders.read().await;
        let mut children: Vec<Folder> = folders
            .values()
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn delete_many(&self, ids: &[FolderId]) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        Ok(ids.iter().filter(|id| folders.remove(*id).is_some()).count() as u64)
    }
}
