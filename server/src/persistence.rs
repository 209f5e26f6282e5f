//
// Copyright 2025-2026 Hearthvale Project Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Profile persistence.
//!
//! The engine is format-agnostic: it only needs `load_all` at startup
//! and eventual `save` after meaningful mutations, both behind the
//! [`ProfileStore`] capability. [`ProfileManager`] adds dirty tracking
//! and a periodic auto-save task on top of whatever store is wired in.

use crate::agent::{AgentId, AgentProfile, AgentRegistry};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failures from the persistence layer
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable storage of agent profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load every stored profile
    async fn load_all(&self) -> Result<Vec<AgentProfile>, PersistenceError>;

    /// Write one profile
    async fn save(&self, profile: &AgentProfile) -> Result<(), PersistenceError>;

    /// Delete one profile; deleting an unknown id is not an error
    async fn delete(&self, id: AgentId) -> Result<(), PersistenceError>;
}

/// One pretty-printed JSON document per agent under a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`; the directory is created lazily
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: AgentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<AgentProfile>, PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut profiles = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<AgentProfile>(&text) {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    // A corrupt file loses one agent, not the whole load
                    tracing::warn!("Skipping unreadable profile {:?}: {}", path, e);
                }
            }
        }

        tracing::info!("Loaded {} agent profiles from {:?}", profiles.len(), self.dir);
        Ok(profiles)
    }

    async fn save(&self, profile: &AgentProfile) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(profile)?;
        tokio::fs::write(self.path_for(profile.id), json).await?;
        Ok(())
    }

    async fn delete(&self, id: AgentId) -> Result<(), PersistenceError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral worlds
#[derive(Default)]
pub struct MemoryStore {
    profiles: DashMap<AgentId, AgentProfile>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of profiles held
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Direct read of a stored profile
    pub fn get(&self, id: AgentId) -> Option<AgentProfile> {
        self.profiles.get(&id).map(|p| p.clone())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<AgentProfile>, PersistenceError> {
        Ok(self.profiles.iter().map(|p| p.clone()).collect())
    }

    async fn save(&self, profile: &AgentProfile) -> Result<(), PersistenceError> {
        self.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn delete(&self, id: AgentId) -> Result<(), PersistenceError> {
        self.profiles.remove(&id);
        Ok(())
    }
}

/// Dirty tracking and auto-save over a [`ProfileStore`].
pub struct ProfileManager {
    store: Arc<dyn ProfileStore>,
    dirty: DashSet<AgentId>,
    auto_save_interval: u64,
}

impl ProfileManager {
    /// Create a manager saving dirty profiles every `auto_save_interval`
    /// seconds once the auto-save task is started
    pub fn new(store: Arc<dyn ProfileStore>, auto_save_interval: u64) -> Self {
        Self {
            store,
            dirty: DashSet::new(),
            auto_save_interval,
        }
    }

    /// Load every stored profile
    pub async fn load_all(&self) -> Result<Vec<AgentProfile>, PersistenceError> {
        self.store.load_all().await
    }

    /// Mark an agent's profile as needing a save
    pub fn mark_dirty(&self, id: AgentId) {
        self.dirty.insert(id);
    }

    /// Whether an agent's profile is awaiting a save
    pub fn is_dirty(&self, id: AgentId) -> bool {
        self.dirty.contains(&id)
    }

    /// Number of profiles awaiting a save
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Drop all pending saves without writing
    pub fn clear_dirty(&self) {
        self.dirty.clear();
    }

    /// Save every dirty profile, returning how many were written.
    /// A failed write logs and leaves the profile dirty for next time.
    pub async fn flush(&self, registry: &AgentRegistry) -> usize {
        let ids: Vec<AgentId> = self.dirty.iter().map(|id| *id).collect();
        let mut saved = 0;

        for id in ids {
            self.dirty.remove(&id);
            let Some(profile_arc) = registry.profile(id) else {
                // Removed since it was marked; nothing to write
                continue;
            };
            let snapshot = profile_arc.read().await.clone();
            match self.store.save(&snapshot).await {
                Ok(()) => saved += 1,
                Err(e) => {
                    tracing::error!("Failed to save profile {}: {}", id, e);
                    self.dirty.insert(id);
                }
            }
        }

        saved
    }

    /// Save one profile immediately
    pub async fn save_now(
        &self,
        registry: &AgentRegistry,
        id: AgentId,
    ) -> Result<(), PersistenceError> {
        if let Some(profile_arc) = registry.profile(id) {
            let snapshot = profile_arc.read().await.clone();
            self.store.save(&snapshot).await?;
            self.dirty.remove(&id);
        }
        Ok(())
    }

    /// Delete an agent's stored profile
    pub async fn delete(&self, id: AgentId) -> Result<(), PersistenceError> {
        self.dirty.remove(&id);
        self.store.delete(id).await
    }

    /// Spawn the periodic auto-save task
    pub fn start_auto_save_task(self: Arc<Self>, registry: Arc<AgentRegistry>) {
        let interval = self.auto_save_interval;

        tokio::spawn(async move {
            let mut interval_timer =
                tokio::time::interval(tokio::time::Duration::from_secs(interval));

            loop {
                interval_timer.tick().await;

                let saved = self.flush(&registry).await;
                if saved > 0 {
                    tracing::debug!("Auto-saved {} agent profiles", saved);
                }
            }
        });

        tracing::info!("Auto-save task started (interval: {}s)", interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let profile = AgentProfile::new(Uuid::new_v4(), "Edda", "villager");

        store.save(&profile).await.unwrap();
        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Edda");

        store.delete(profile.id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut profile = AgentProfile::new(Uuid::new_v4(), "Bram", "merchant");
        profile.traits.set("friendliness", 0.42);
        profile.add_history("Said to Edda: fine morning");
        store.save(&profile).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Bram");
        assert_eq!(loaded[0].traits.value("friendliness"), 0.42);
        assert_eq!(loaded[0].conversation_history, profile.conversation_history);
    }

    #[tokio::test]
    async fn test_json_store_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let profile = AgentProfile::new(Uuid::new_v4(), "Bram", "merchant");
        store.save(&profile).await.unwrap();
        tokio::fs::write(dir.path().join("garbage.json"), "{not json")
            .await
            .unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn test_json_store_delete_unknown_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.delete(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_manager_dirty_tracking_and_flush() {
        let registry = AgentRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);
        let id = Uuid::new_v4();
        registry.enter(id, "Edda", "villager", &mut rng);

        let store = Arc::new(MemoryStore::new());
        let manager = ProfileManager::new(store.clone(), 60);

        manager.mark_dirty(id);
        assert!(manager.is_dirty(id));
        assert_eq!(manager.dirty_count(), 1);

        let saved = manager.flush(&registry).await;
        assert_eq!(saved, 1);
        assert_eq!(manager.dirty_count(), 0);
        assert_eq!(store.get(id).unwrap().name, "Edda");
    }

    #[tokio::test]
    async fn test_manager_flush_skips_removed_agents() {
        let registry = AgentRegistry::new();
        let store = Arc::new(MemoryStore::new());
        let manager = ProfileManager::new(store.clone(), 60);

        manager.mark_dirty(Uuid::new_v4());
        let saved = manager.flush(&registry).await;
        assert_eq!(saved, 0);
        assert_eq!(manager.dirty_count(), 0);
    }
}
