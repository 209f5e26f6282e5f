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

//! Dialogue request lifecycle.
//!
//! At most one request is ever in flight per speaker. Each pending entry
//! carries a unique request id; both the completion path and `cancel`
//! race to remove the entry, and only the winner may touch agent state.
//! That single atomic claim is what makes cancellation safe: a late
//! completion for a removed agent finds its entry gone and walks away
//! without mutating anything.

use crate::agent::{AgentId, AgentRegistry, BehaviorMode};
use crate::dialogue::provider::{DialogueProvider, ProviderError};
use crate::dialogue::voice::VoiceSink;
use crate::personality::{self, MemoryKind};
use crate::persistence::ProfileManager;
use crate::social::{InteractionQuality, RelationshipGraph, RelationshipType};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, Semaphore};
use tokio::task::JoinHandle;
use uuid::Uuid;

const FRIENDLY_TOPICS: &[&str] = &["their day", "shared memories", "plans", "friendly gossip"];
const HOSTILE_TOPICS: &[&str] = &["disagreements", "competitive matters", "defensive remarks"];
const NEUTRAL_TOPICS: &[&str] = &[
    "the weather",
    "casual greetings",
    "nearby events",
    "local rumors",
];

const POSITIVE_TONES: &[&str] = &[
    "good", "great", "love", "friend", "happy", "thank", "pleasure", "wonderful",
];
const NEGATIVE_TONES: &[&str] = &["hate", "stupid", "annoying", "go away", "leave", "terrible"];

/// Bucket a reply into an interaction quality by keyword tone
pub fn classify_reply(reply: &str) -> InteractionQuality {
    let lower = reply.to_lowercase();
    if POSITIVE_TONES.iter().any(|w| lower.contains(w)) {
        InteractionQuality::Positive
    } else if NEGATIVE_TONES.iter().any(|w| lower.contains(w)) {
        InteractionQuality::Negative
    } else {
        InteractionQuality::Neutral
    }
}

struct PendingRequest {
    request_id: Uuid,
    listener: AgentId,
    issued_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

struct Inner {
    registry: Arc<AgentRegistry>,
    graph: Arc<RelationshipGraph>,
    provider: RwLock<Option<Arc<dyn DialogueProvider>>>,
    voice: RwLock<Option<Arc<dyn VoiceSink>>>,
    profiles: RwLock<Option<Arc<ProfileManager>>>,
    pending: DashMap<AgentId, PendingRequest>,
    permits: Arc<Semaphore>,
    rng: Mutex<StdRng>,
}

/// Tracks and completes asynchronous dialogue requests.
///
/// Cheap to clone; clones share the same pending map and worker pool.
#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

impl RequestCoordinator {
    /// Create a coordinator with a worker pool sized to the hardware
    pub fn new(registry: Arc<AgentRegistry>, graph: Arc<RelationshipGraph>) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::with_workers(registry, graph, workers)
    }

    /// Create a coordinator with an explicit worker cap
    pub fn with_workers(
        registry: Arc<AgentRegistry>,
        graph: Arc<RelationshipGraph>,
        workers: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                graph,
                provider: RwLock::new(None),
                voice: RwLock::new(None),
                profiles: RwLock::new(None),
                pending: DashMap::new(),
                permits: Arc::new(Semaphore::new(workers.max(1))),
                rng: Mutex::new(StdRng::from_os_rng()),
            }),
        }
    }

    /// Reseed the topic/evolution rng for deterministic tests
    pub async fn reseed(&self, seed: u64) {
        *self.inner.rng.lock().await = StdRng::seed_from_u64(seed);
    }

    /// Wire in a dialogue backend
    pub async fn set_provider(&self, provider: Arc<dyn DialogueProvider>) {
        *self.inner.provider.write().await = Some(provider);
    }

    /// Wire in a voice sink
    pub async fn set_voice(&self, voice: Arc<dyn VoiceSink>) {
        *self.inner.voice.write().await = Some(voice);
    }

    /// Wire in the profile manager for dirty marking
    pub async fn set_profile_manager(&self, manager: Arc<ProfileManager>) {
        *self.inner.profiles.write().await = Some(manager);
    }

    /// Whether a request is in flight for `agent`
    pub fn has_pending(&self, agent: AgentId) -> bool {
        self.inner.pending.contains_key(&agent)
    }

    /// Number of requests currently in flight
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    /// Start a conversation from `speaker` to `listener`.
    ///
    /// Refuses (returns false) when the speaker already has a request in
    /// flight or no ready provider is configured. On acceptance both
    /// agents switch to Conversing and the request runs on the bounded
    /// worker pool; the tick loop never waits on it.
    pub async fn initiate(&self, speaker: AgentId, listener: AgentId) -> bool {
        let inner = &self.inner;

        if inner.pending.contains_key(&speaker) {
            tracing::trace!("{} already has a dialogue request in flight", speaker);
            return false;
        }

        let provider = inner.provider.read().await.clone();
        let Some(provider) = provider else {
            tracing::debug!("No dialogue provider configured; skipping conversation");
            return false;
        };
        if !provider.is_ready() {
            tracing::debug!("Dialogue provider not ready; skipping conversation");
            return false;
        }

        let Some(speaker_profile) = inner.registry.profile(speaker) else {
            return false;
        };
        let Some(listener_profile) = inner.registry.profile(listener) else {
            return false;
        };

        let (speaker_name, system_prompt, history) = {
            let p = speaker_profile.read().await;
            (
                p.name.clone(),
                personality::prompt_context(&p),
                p.conversation_history.clone(),
            )
        };
        let listener_name = listener_profile.read().await.name.clone();

        let relation = inner.graph.describe(speaker, listener, &listener_name);
        let topic = {
            let pool = match inner.graph.get(speaker, listener).relationship_type {
                RelationshipType::Friend | RelationshipType::Family => FRIENDLY_TOPICS,
                RelationshipType::Enemy => HOSTILE_TOPICS,
                _ => NEUTRAL_TOPICS,
            };
            let mut rng = inner.rng.lock().await;
            pool[rng.random_range(0..pool.len())]
        };

        let prompt = format!(
            "You are {} talking to {}. Your relationship: {} \
             Start a brief, natural conversation about {}. Keep it to 1-2 sentences. \
             Stay in character based on your relationship.",
            speaker_name, listener_name, relation, topic
        );

        if let Some(state) = inner.registry.state(speaker) {
            let mut state = state.lock().await;
            state.set_mode(BehaviorMode::Conversing);
            state.target_agent = Some(listener);
        }
        if let Some(state) = inner.registry.state(listener) {
            state.lock().await.set_mode(BehaviorMode::Conversing);
        }

        let request_id = Uuid::new_v4();

        // The entry guard is held across the spawn, so the task's claim
        // cannot observe the map before this entry lands in it.
        let lost_to = match inner.pending.entry(speaker) {
            dashmap::mapref::entry::Entry::Occupied(entry) => Some(entry.get().listener),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let task_inner = Arc::clone(inner);
                let handle = tokio::spawn(async move {
                    let _permit = task_inner.permits.clone().acquire_owned().await.ok();
                    let result = provider.generate(&system_prompt, &prompt, &history).await;
                    task_inner
                        .finish(speaker, listener, request_id, result)
                        .await;
                });

                slot.insert(PendingRequest {
                    request_id,
                    listener,
                    issued_at: Utc::now(),
                    handle,
                });
                None
            }
        };

        if let Some(winner_listener) = lost_to {
            // A concurrent initiation won the slot. The speaker really is
            // conversing (with the winner's listener); only undo the mode
            // mark on our listener if it isn't part of that conversation.
            if winner_listener != listener {
                inner.reset_mode(listener).await;
            }
            return false;
        }

        tracing::debug!(
            "{} started a conversation with {} about {}",
            speaker_name,
            listener_name,
            topic
        );
        true
    }

    /// Cancel any in-flight request for `agent`. Idempotent; safe to call
    /// when nothing is pending.
    pub fn cancel(&self, agent: AgentId) {
        if let Some((_, request)) = self.inner.pending.remove(&agent) {
            request.handle.abort();
            tracing::debug!(
                "Cancelled dialogue request {} ({} -> {}, issued {})",
                request.request_id,
                agent,
                request.listener,
                request.issued_at
            );
        }
    }

    /// Cancel every in-flight request; used at shutdown
    pub fn cancel_all(&self) {
        let speakers: Vec<AgentId> = self.inner.pending.iter().map(|e| *e.key()).collect();
        for speaker in speakers {
            self.cancel(speaker);
        }
    }
}

impl Inner {
    /// Completion entry point for the spawned request task
    async fn finish(
        self: Arc<Self>,
        speaker: AgentId,
        listener: AgentId,
        request_id: Uuid,
        result: Result<String, ProviderError>,
    ) {
        // Atomic claim: whoever removes the entry owns the completion.
        // Losing the race (cancel got there first, or a newer request
        // replaced this one) means this task must not touch any state.
        let claimed = self
            .pending
            .remove_if(&speaker, |_, request| request.request_id == request_id)
            .is_some();
        if !claimed {
            tracing::debug!(
                "Dialogue request {} was cancelled; discarding result",
                request_id
            );
            return;
        }

        match result {
            Ok(reply) => self.apply_reply(speaker, listener, reply).await,
            Err(e) => {
                tracing::error!("Dialogue request for {} failed: {}", speaker, e);
                self.reset_mode(speaker).await;
            }
        }
    }

    /// Fold a successful reply back into agent and social state
    async fn apply_reply(&self, speaker: AgentId, listener: AgentId, reply: String) {
        // Liveness check: an unload or removal between claim and here
        // must not be resurrected by this completion.
        if !self.registry.is_live(speaker) || !self.registry.is_live(listener) {
            tracing::debug!(
                "Conversation participant left before completion ({} -> {})",
                speaker,
                listener
            );
            self.reset_mode(speaker).await;
            self.reset_mode(listener).await;
            return;
        }

        let Some(speaker_profile) = self.registry.profile(speaker) else {
            return;
        };
        let Some(listener_profile) = self.registry.profile(listener) else {
            return;
        };

        let quality = classify_reply(&reply);
        self.graph.record_interaction(speaker, listener, quality);

        let listener_name = listener_profile.read().await.name.clone();

        let (speaker_name, voice_enabled) = {
            let mut p = speaker_profile.write().await;
            p.add_history(&format!("Said to {}: {}", listener_name, reply));
            match quality {
                InteractionQuality::Positive | InteractionQuality::VeryPositive => {
                    p.memories.record(
                        Some(listener),
                        MemoryKind::PositiveInteraction,
                        format!("Had a pleasant talk with {}", listener_name),
                        0.5,
                    );
                }
                InteractionQuality::Negative | InteractionQuality::VeryNegative => {
                    p.memories.record(
                        Some(listener),
                        MemoryKind::NegativeInteraction,
                        format!("Had a tense exchange with {}", listener_name),
                        0.5,
                    );
                }
                InteractionQuality::Neutral => {}
            }
            let mut rng = self.rng.lock().await;
            personality::evolve(
                &mut *p,
                &format!("talking to {}", listener_name),
                &reply,
                &mut *rng,
            );
            (p.name.clone(), p.voice_enabled)
        };

        {
            let mut p = listener_profile.write().await;
            p.add_history(&format!("Heard from {}: {}", speaker_name, reply));
        }

        self.reset_mode(speaker).await;
        self.reset_mode(listener).await;

        if voice_enabled {
            if let Some(voice) = self.voice.read().await.clone() {
                voice.speak(speaker, &reply);
            }
        }

        if let Some(profiles) = self.profiles.read().await.clone() {
            profiles.mark_dirty(speaker);
            profiles.mark_dirty(listener);
        }

        tracing::info!("{} said to {}: \"{}\"", speaker_name, listener_name, reply);
    }

    /// Return an agent to Idle if it is still live
    async fn reset_mode(&self, agent: AgentId) {
        if let Some(state) = self.registry.state(agent) {
            state.lock().await.set_mode(BehaviorMode::Idle);
        }
    }
}
