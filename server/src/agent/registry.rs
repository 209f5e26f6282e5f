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

//! Agent registry: profiles and live state, keyed by agent identifier.
//!
//! An explicitly constructed service object — callers hold it behind an
//! `Arc` and pass it where needed; there is no global instance. The two
//! maps are sharded (`DashMap`), so operations on different agents never
//! contend; per-agent exclusion comes from the `RwLock`/`Mutex` wrapped
//! around each entry's value, shared by the tick loop and completion
//! handlers alike.

use crate::agent::{AgentId, AgentProfile, AgentState};
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Registry of all known agents.
///
/// `profiles` holds every agent ever hydrated or created this run —
/// durable data. `live` holds transient behavior state for agents that
/// are currently in the world; membership in `live` is the liveness test
/// completion handlers must pass before mutating anything.
#[derive(Default)]
pub struct AgentRegistry {
    profiles: DashMap<AgentId, Arc<RwLock<AgentProfile>>>,
    live: DashMap<AgentId, Arc<Mutex<AgentState>>>,
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert hydrated profiles, e.g. from the profile store at startup.
    /// Does not mark any agent live.
    pub fn hydrate(&self, profiles: Vec<AgentProfile>) {
        for profile in profiles {
            self.profiles
                .insert(profile.id, Arc::new(RwLock::new(profile)));
        }
    }

    /// Look up an agent's profile
    pub fn profile(&self, id: AgentId) -> Option<Arc<RwLock<AgentProfile>>> {
        self.profiles.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Look up an agent's live behavior state
    pub fn state(&self, id: AgentId) -> Option<Arc<Mutex<AgentState>>> {
        self.live.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Mark an agent live, creating a profile if none exists yet.
    /// Returns false when the agent was already live.
    pub fn enter(
        &self,
        id: AgentId,
        name: &str,
        kind: &str,
        rng: &mut impl Rng,
    ) -> bool {
        self.profiles
            .entry(id)
            .or_insert_with(|| Arc::new(RwLock::new(AgentProfile::new(id, name, kind))));

        match self.live.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(AgentState::new(rng))));
                true
            }
        }
    }

    /// Insert a fully built profile and mark the agent live
    pub fn spawn(&self, profile: AgentProfile, rng: &mut impl Rng) -> AgentId {
        let id = profile.id;
        self.profiles.insert(id, Arc::new(RwLock::new(profile)));
        self.live
            .insert(id, Arc::new(Mutex::new(AgentState::new(rng))));
        id
    }

    /// Transient unload: drop behavior state, keep the profile.
    /// Returns true when the agent was live.
    pub fn unload(&self, id: AgentId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Permanent removal: drop both state and profile
    pub fn remove(&self, id: AgentId) {
        self.live.remove(&id);
        self.profiles.remove(&id);
    }

    /// Whether the agent is currently live in the world
    pub fn is_live(&self, id: AgentId) -> bool {
        self.live.contains_key(&id)
    }

    /// Whether a profile exists for the agent
    pub fn has_profile(&self, id: AgentId) -> bool {
        self.profiles.contains_key(&id)
    }

    /// Identifiers of all live agents
    pub fn live_ids(&self) -> Vec<AgentId> {
        self.live.iter().map(|entry| *entry.key()).collect()
    }

    /// Identifiers of all known agents, live or not
    pub fn known_ids(&self) -> Vec<AgentId> {
        self.profiles.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of live agents
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of known profiles
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}
