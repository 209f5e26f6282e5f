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

//! Social graph: directional relationship records between agents.
//!
//! Edges are keyed by ordered `(owner, target)` pairs in a sharded map;
//! every read-modify-write goes through the entry API, so mutation of one
//! edge is atomic with respect to concurrent completion handlers. The
//! graph is an explicitly constructed service object shared behind an
//! `Arc`, never a global.

use crate::agent::AgentId;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Coarse classification of how a conversational exchange went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionQuality {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl InteractionQuality {
    /// Affection delta this quality applies to both edges of a pair
    pub fn affection_delta(self) -> f64 {
        match self {
            InteractionQuality::VeryPositive => 0.10,
            InteractionQuality::Positive => 0.05,
            InteractionQuality::Neutral => 0.01,
            InteractionQuality::Negative => -0.05,
            InteractionQuality::VeryNegative => -0.10,
        }
    }
}

/// Relationship categories. `Family` and `Mentor` are sticky: score-based
/// reclassification never overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    Neutral,
    Friend,
    Family,
    Enemy,
    Rival,
    Mentor,
    Student,
}

impl RelationshipType {
    fn is_sticky(self) -> bool {
        matches!(self, RelationshipType::Family | RelationshipType::Mentor)
    }
}

/// One agent's disposition toward another.
///
/// Directional: `(a, b)` and `(b, a)` are distinct records that may hold
/// different values, though interaction recording moves both by the same
/// deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub owner: AgentId,
    pub target: AgentId,
    /// -1 (hate) to 1 (love)
    affection: f64,
    /// 0 (none) to 1 (high respect)
    respect: f64,
    /// 0 (none) to 1 (complete trust)
    trust: f64,
    pub interaction_count: u64,
    pub last_interaction: DateTime<Utc>,
    pub relationship_type: RelationshipType,
}

impl Relationship {
    /// Create a fresh neutral relationship
    pub fn new(owner: AgentId, target: AgentId) -> Self {
        Self {
            owner,
            target,
            affection: 0.0,
            respect: 0.5,
            trust: 0.3,
            interaction_count: 0,
            last_interaction: Utc::now(),
            relationship_type: RelationshipType::Neutral,
        }
    }

    pub fn affection(&self) -> f64 {
        self.affection
    }

    pub fn respect(&self) -> f64 {
        self.respect
    }

    pub fn trust(&self) -> f64 {
        self.trust
    }

    /// Set affection, clamped to `[-1, 1]`
    pub fn set_affection(&mut self, value: f64) {
        self.affection = value.clamp(-1.0, 1.0);
    }

    /// Set respect, clamped to `[0, 1]`
    pub fn set_respect(&mut self, value: f64) {
        self.respect = value.clamp(0.0, 1.0);
    }

    /// Set trust, clamped to `[0, 1]`
    pub fn set_trust(&mut self, value: f64) {
        self.trust = value.clamp(0.0, 1.0);
    }

    /// Overall relationship score:
    /// `0.5 * affection + 0.3 * respect + 0.2 * trust`
    pub fn score(&self) -> f64 {
        self.affection * 0.5 + self.respect * 0.3 + self.trust * 0.2
    }

    /// Short label for this relationship, explicit type first
    pub fn label(&self) -> &'static str {
        match self.relationship_type {
            RelationshipType::Family => return "family",
            RelationshipType::Friend => return "close friend",
            RelationshipType::Enemy => return "enemy",
            RelationshipType::Rival => return "rival",
            RelationshipType::Mentor => return "mentor",
            RelationshipType::Student => return "student",
            RelationshipType::Neutral => {}
        }

        let score = self.score();
        if score > 0.7 {
            "very close"
        } else if score > 0.4 {
            "friendly"
        } else if score > 0.0 {
            "acquaintance"
        } else if score > -0.3 {
            "distant"
        } else if score > -0.6 {
            "dislike"
        } else {
            "hates"
        }
    }

    /// Recompute the type from the current score. Sticky types hold.
    fn reclassify(&mut self) {
        if self.relationship_type.is_sticky() {
            return;
        }
        let score = self.score();
        self.relationship_type = if score > 0.6 {
            RelationshipType::Friend
        } else if score < -0.5 {
            RelationshipType::Enemy
        } else {
            RelationshipType::Neutral
        };
    }
}

/// Days without an interaction before an edge starts fading
const DECAY_AGE_DAYS: i64 = 3;
const AFFECTION_DECAY: f64 = 0.001;
const TRUST_DECAY: f64 = 0.002;
const TRUST_DECAY_FLOOR: f64 = 0.3;

/// Sharded store of every directional relationship edge
#[derive(Default)]
pub struct RelationshipGraph {
    edges: DashMap<(AgentId, AgentId), Relationship>,
}

impl RelationshipGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the `owner -> target` edge, lazily created with
    /// neutral defaults when absent
    pub fn get(&self, owner: AgentId, target: AgentId) -> Relationship {
        self.edges
            .entry((owner, target))
            .or_insert_with(|| Relationship::new(owner, target))
            .clone()
    }

    /// Run a closure against the live `owner -> target` edge.
    /// The closure executes under the edge's shard lock, so the
    /// read-modify-write cannot interleave with another mutation of the
    /// same edge.
    pub fn update<F, R>(&self, owner: AgentId, target: AgentId, f: F) -> R
    where
        F: FnOnce(&mut Relationship) -> R,
    {
        let mut edge = self
            .edges
            .entry((owner, target))
            .or_insert_with(|| Relationship::new(owner, target));
        f(edge.value_mut())
    }

    /// Record one interaction between `a` and `b`.
    ///
    /// Both directional edges receive the same quality-derived deltas
    /// (affection by the quality's step, trust by half of it), get their
    /// counters bumped, and are then reclassified — each from its own
    /// score, since the two directions may sit at different values.
    pub fn record_interaction(&self, a: AgentId, b: AgentId, quality: InteractionQuality) {
        let affection_delta = quality.affection_delta();
        let trust_delta = affection_delta * 0.5;
        let now = Utc::now();

        for (owner, target) in [(a, b), (b, a)] {
            self.update(owner, target, |edge| {
                edge.set_affection(edge.affection() + affection_delta);
                edge.set_trust(edge.trust() + trust_delta);
                edge.interaction_count += 1;
                edge.last_interaction = now;
                edge.reclassify();
            });
        }

        tracing::debug!(
            "Interaction recorded: {} <-> {} (quality: {:?})",
            a,
            b,
            quality
        );
    }

    /// Explicitly set a relationship type, applying that type's canonical
    /// value presets. Only the `owner -> target` direction changes.
    pub fn set_type(&self, owner: AgentId, target: AgentId, kind: RelationshipType) {
        self.update(owner, target, |edge| {
            edge.relationship_type = kind;
            match kind {
                RelationshipType::Friend => {
                    edge.set_affection(0.8);
                    edge.set_trust(0.7);
                }
                RelationshipType::Family => {
                    edge.set_affection(0.9);
                    edge.set_trust(0.8);
                }
                RelationshipType::Enemy => {
                    edge.set_affection(-0.7);
                    edge.set_trust(0.1);
                }
                RelationshipType::Rival => {
                    edge.set_affection(-0.3);
                    edge.set_respect(0.7);
                }
                RelationshipType::Mentor => {
                    edge.set_respect(0.9);
                    edge.set_trust(0.8);
                }
                RelationshipType::Student => {
                    edge.set_affection(0.5);
                    edge.set_trust(0.4);
                }
                RelationshipType::Neutral => {}
            }
        });
    }

    /// Fade every edge untouched for three days or more: affection
    /// drifts toward zero, trust decays while it sits above its floor.
    pub fn decay_all(&self, now: DateTime<Utc>) {
        for mut entry in self.edges.iter_mut() {
            let edge = entry.value_mut();
            if now - edge.last_interaction < Duration::days(DECAY_AGE_DAYS) {
                continue;
            }

            if edge.affection() > 0.0 {
                edge.set_affection((edge.affection() - AFFECTION_DECAY).max(0.0));
            } else if edge.affection() < 0.0 {
                edge.set_affection((edge.affection() + AFFECTION_DECAY).min(0.0));
            }

            if edge.trust() > TRUST_DECAY_FLOOR {
                edge.set_trust(edge.trust() - TRUST_DECAY);
            }
        }
    }

    /// Human-readable phrase for how `owner` feels about `target`.
    /// Explicit types win over score-based phrasing.
    pub fn describe(&self, owner: AgentId, target: AgentId, target_name: &str) -> String {
        let edge = self.get(owner, target);

        match edge.relationship_type {
            RelationshipType::Friend => {
                return format!("{} is a good friend of mine.", target_name);
            }
            RelationshipType::Family => {
                return format!("{} is like family to me.", target_name);
            }
            RelationshipType::Enemy => {
                return format!("I don't get along with {}.", target_name);
            }
            RelationshipType::Rival => {
                return format!("{} and I compete over everything.", target_name);
            }
            RelationshipType::Mentor => {
                return format!("{} taught me much of what I know.", target_name);
            }
            RelationshipType::Student => {
                return format!("I've been showing {} the ropes.", target_name);
            }
            RelationshipType::Neutral => {}
        }

        let score = edge.score();
        if score > 0.5 {
            format!("I like {} quite a bit.", target_name)
        } else if score > 0.0 {
            format!("{} seems alright.", target_name)
        } else if score > -0.3 {
            format!("I don't know {} very well.", target_name)
        } else {
            format!("I'm not fond of {}.", target_name)
        }
    }

    /// Agents `owner` has any edge toward
    pub fn known(&self, owner: AgentId) -> Vec<AgentId> {
        self.edges
            .iter()
            .filter(|entry| entry.key().0 == owner)
            .map(|entry| entry.key().1)
            .collect()
    }

    /// Agents `owner` considers friends (score above 0.4)
    pub fn friends(&self, owner: AgentId) -> Vec<AgentId> {
        self.edges
            .iter()
            .filter(|entry| entry.key().0 == owner && entry.value().score() > 0.4)
            .map(|entry| entry.key().1)
            .collect()
    }

    /// Agents `owner` considers enemies (score below -0.3)
    pub fn enemies(&self, owner: AgentId) -> Vec<AgentId> {
        self.edges
            .iter()
            .filter(|entry| entry.key().0 == owner && entry.value().score() < -0.3)
            .map(|entry| entry.key().1)
            .collect()
    }

    /// Purge every edge that references `agent`, as owner or target.
    /// Called on permanent removal.
    pub fn remove(&self, agent: AgentId) {
        self.edges
            .retain(|(owner, target), _| *owner != agent && *target != agent);
    }

    /// Number of directional edges in the graph
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph holds no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
