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

//! Simulation engine: owns every service object and drives the tick loop.
//!
//! One `Simulation` wires together the agent registry, relationship
//! graph, request coordinator, behavior system, and profile manager —
//! all explicitly constructed, shared behind `Arc`s, with no global
//! state. The tick loop is synchronous over agents and never waits on
//! the network; dialogue requests complete on the worker pool and merge
//! back through the coordinator.

use crate::agent::{AgentId, AgentRegistry};
use crate::behavior::{BehaviorConfig, BehaviorSystem};
use crate::config::SimulationConfig;
use crate::dialogue::{DialogueProvider, RequestCoordinator, VoiceSink};
use crate::persistence::{PersistenceError, ProfileManager, ProfileStore};
use crate::social::RelationshipGraph;
use crate::world::{EnvironmentQuery, MovementActuator};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// The assembled simulation engine
pub struct Simulation {
    config: SimulationConfig,
    registry: Arc<AgentRegistry>,
    graph: Arc<RelationshipGraph>,
    coordinator: Arc<RequestCoordinator>,
    behavior: BehaviorSystem,
    profiles: Arc<ProfileManager>,
    movement: Arc<dyn MovementActuator>,
    tick: AtomicU64,
    rng: Mutex<StdRng>,
}

impl Simulation {
    /// Assemble an engine over the given capabilities
    pub async fn new(
        config: SimulationConfig,
        store: Arc<dyn ProfileStore>,
        auto_save_interval_secs: u64,
        movement: Arc<dyn MovementActuator>,
        environment: Arc<dyn EnvironmentQuery>,
    ) -> Self {
        let registry = Arc::new(AgentRegistry::new());
        let graph = Arc::new(RelationshipGraph::new());

        let coordinator = if config.dialogue_workers == 0 {
            Arc::new(RequestCoordinator::new(
                Arc::clone(&registry),
                Arc::clone(&graph),
            ))
        } else {
            Arc::new(RequestCoordinator::with_workers(
                Arc::clone(&registry),
                Arc::clone(&graph),
                config.dialogue_workers,
            ))
        };

        let profiles = Arc::new(ProfileManager::new(store, auto_save_interval_secs));
        coordinator.set_profile_manager(Arc::clone(&profiles)).await;

        let behavior = BehaviorSystem::new(
            Arc::clone(&registry),
            Arc::clone(&coordinator),
            Arc::clone(&movement),
            Arc::clone(&environment),
            BehaviorConfig {
                decision_interval: config.decision_interval_ticks,
                interaction_radius: config.interaction_radius,
            },
        );

        Self {
            config,
            registry,
            graph,
            coordinator,
            behavior,
            profiles,
            movement,
            tick: AtomicU64::new(0),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// The agent registry
    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// The relationship graph
    pub fn graph(&self) -> &Arc<RelationshipGraph> {
        &self.graph
    }

    /// The request coordinator
    pub fn coordinator(&self) -> &Arc<RequestCoordinator> {
        &self.coordinator
    }

    /// The profile manager
    pub fn profiles(&self) -> &Arc<ProfileManager> {
        &self.profiles
    }

    /// The behavior system
    pub fn behavior(&self) -> &BehaviorSystem {
        &self.behavior
    }

    /// Wire in a dialogue backend
    pub async fn set_dialogue_provider(&self, provider: Arc<dyn DialogueProvider>) {
        self.coordinator.set_provider(provider).await;
    }

    /// Wire in a voice sink
    pub async fn set_voice(&self, voice: Arc<dyn VoiceSink>) {
        self.coordinator.set_voice(voice).await;
    }

    /// Hydrate every stored profile into the registry.
    /// Returns how many profiles were loaded.
    pub async fn load(&self) -> Result<usize, PersistenceError> {
        let profiles = self.profiles.load_all().await?;
        let count = profiles.len();
        self.registry.hydrate(profiles);
        Ok(count)
    }

    /// An agent entered the world. Creates a profile when none exists,
    /// spawns fresh behavior state, and reports whether the agent was
    /// newly marked live.
    pub async fn agent_entered(&self, id: AgentId, name: &str, kind: &str) -> bool {
        let is_new_profile = !self.registry.has_profile(id);
        let mut rng = self.rng.lock().await;
        let entered = self.registry.enter(id, name, kind, &mut *rng);
        drop(rng);

        if is_new_profile {
            self.profiles.mark_dirty(id);
        }
        if entered {
            tracing::info!("Agent {} ({}) entered the world", name, id);
        }
        entered
    }

    /// Transient unload: the agent leaves the world but its profile
    /// survives. Any in-flight dialogue request is cancelled; position
    /// bookkeeping is captured for the next load.
    pub async fn agent_unloaded(&self, id: AgentId) {
        self.coordinator.cancel(id);

        if let Some(profile) = self.registry.profile(id) {
            if let Some(position) = self.movement.current_position(id) {
                profile.write().await.last_position = Some(position);
                self.profiles.mark_dirty(id);
            }
        }

        if self.registry.unload(id) {
            tracing::info!("Agent {} unloaded", id);
        }
    }

    /// Permanent removal: cancel any in-flight request, purge every
    /// relationship edge touching the agent, drop the profile, and
    /// delete it from the store.
    pub async fn agent_removed(&self, id: AgentId) {
        self.coordinator.cancel(id);
        self.graph.remove(id);
        self.registry.remove(id);

        if let Err(e) = self.profiles.delete(id).await {
            tracing::error!("Failed to delete stored profile {}: {}", id, e);
        }
        tracing::info!("Agent {} permanently removed", id);
    }

    /// Run one tick batch: advance every live agent, then periodic
    /// decay sweeps on their cadence.
    pub async fn step(&self) {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed) + 1;

        for id in self.registry.live_ids() {
            self.behavior.process(id).await;
        }

        if tick % self.config.mood_decay_interval_ticks.max(1) == 0 {
            let now = Utc::now();
            for id in self.registry.live_ids() {
                if let Some(profile) = self.registry.profile(id) {
                    profile.write().await.mood.decay(now);
                }
            }
        }

        if tick % self.config.relationship_decay_interval_ticks.max(1) == 0 {
            self.graph.decay_all(Utc::now());
        }
    }

    /// Ticks executed so far
    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }

    /// Start the periodic auto-save task
    pub fn start_auto_save(&self) {
        Arc::clone(&self.profiles).start_auto_save_task(Arc::clone(&self.registry));
    }

    /// Drive tick batches forever at the configured interval
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(
            self.config.tick_interval_ms,
        ));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            "Simulation running ({}ms per tick batch)",
            self.config.tick_interval_ms
        );

        loop {
            interval.tick().await;
            self.step().await;
        }
    }

    /// Cancel all in-flight work and flush dirty profiles
    pub async fn shutdown(&self) {
        self.coordinator.cancel_all();
        let saved = self.profiles.flush(&self.registry).await;
        tracing::info!("Simulation shut down ({} profiles flushed)", saved);
    }
}
