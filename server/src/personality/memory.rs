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

//! Per-agent episodic memory ledger

use crate::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categories of remembered events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryKind {
    PositiveInteraction,
    NegativeInteraction,
    Achievement,
    Conflict,
    HelpReceived,
    HelpGiven,
    Discovery,
    EmotionalEvent,
}

/// A single remembered event.
///
/// Memories are never deleted; they fade. Strength decays to zero over
/// thirty days unless recalls keep boosting it, and is always scaled by
/// the emotional impact recorded at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// The other agent this memory involves, if any
    pub related: Option<AgentId>,
    pub kind: MemoryKind,
    pub description: String,
    /// How strong the emotion was, in `[0, 1]`
    pub emotional_impact: f64,
    pub created_at: DateTime<Utc>,
    pub recall_count: u32,
}

impl Memory {
    /// Effective strength of this memory at `now`
    pub fn strength(&self, now: DateTime<Utc>) -> f64 {
        let age_days = (now - self.created_at).num_days() as f64;
        let time_decay = (1.0 - age_days / 30.0).max(0.0);
        let recall_boost = (f64::from(self.recall_count) * 0.1).min(1.0);
        (time_decay + recall_boost).min(1.0) * self.emotional_impact
    }
}

/// Append-only ledger of an agent's memories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryLedger {
    memories: Vec<Memory>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a memory
    pub fn record(
        &mut self,
        related: Option<AgentId>,
        kind: MemoryKind,
        description: impl Into<String>,
        emotional_impact: f64,
    ) {
        self.memories.push(Memory {
            related,
            kind,
            description: description.into(),
            emotional_impact: emotional_impact.clamp(0.0, 1.0),
            created_at: Utc::now(),
            recall_count: 0,
        });
    }

    /// All memories, oldest first
    pub fn all(&self) -> &[Memory] {
        &self.memories
    }

    /// The `count` most recent memories, oldest of them first
    pub fn recent(&self, count: usize) -> &[Memory] {
        let start = self.memories.len().saturating_sub(count);
        &self.memories[start..]
    }

    /// Memories about `agent`, marking each as recalled.
    /// Recalls reinforce a memory against time decay.
    pub fn recall_about(&mut self, agent: AgentId, now: DateTime<Utc>) -> Vec<Memory> {
        let mut recalled = Vec::new();
        for memory in &mut self.memories {
            if memory.related == Some(agent) {
                memory.recall_count += 1;
                if memory.strength(now) > 0.0 {
                    recalled.push(memory.clone());
                }
            }
        }
        recalled
    }

    /// Memories whose strength at `now` is at least `threshold`
    pub fn strongest(&self, threshold: f64, now: DateTime<Utc>) -> Vec<&Memory> {
        self.memories
            .iter()
            .filter(|m| m.strength(now) >= threshold)
            .collect()
    }

    /// Number of memories held
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// Whether the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_record_and_recent() {
        let mut ledger = MemoryLedger::new();
        ledger.record(None, MemoryKind::Discovery, "Found the old mill", 0.4);
        ledger.record(None, MemoryKind::Achievement, "Finished the fence", 0.6);
        ledger.record(None, MemoryKind::Conflict, "Argued at the market", 0.8);

        assert_eq!(ledger.len(), 3);
        let recent = ledger.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Finished the fence");
        assert_eq!(recent[1].description, "Argued at the market");
    }

    #[test]
    fn test_strength_fades_with_age() {
        let mut ledger = MemoryLedger::new();
        ledger.record(None, MemoryKind::EmotionalEvent, "The storm", 1.0);
        let memory = &ledger.all()[0];

        let now = memory.created_at;
        assert_eq!(memory.strength(now), 1.0);
        // Half faded after fifteen days
        let later = now + Duration::days(15);
        assert!((memory.strength(later) - 0.5).abs() < 0.01);
        // Fully faded after thirty
        let gone = now + Duration::days(40);
        assert_eq!(memory.strength(gone), 0.0);
    }

    #[test]
    fn test_recall_reinforces() {
        let other = Uuid::new_v4();
        let mut ledger = MemoryLedger::new();
        ledger.record(Some(other), MemoryKind::PositiveInteraction, "A kind word", 1.0);

        let now = ledger.all()[0].created_at;
        let old = now + Duration::days(40);

        // Recall five times; the boost outlives the time decay
        for _ in 0..5 {
            ledger.recall_about(other, now);
        }
        let memory = &ledger.all()[0];
        assert_eq!(memory.recall_count, 5);
        assert!((memory.strength(old) - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_strength_scaled_by_impact() {
        let mut ledger = MemoryLedger::new();
        ledger.record(None, MemoryKind::Discovery, "A pebble", 0.2);
        let memory = &ledger.all()[0];
        assert!((memory.strength(memory.created_at) - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_impact_clamps() {
        let mut ledger = MemoryLedger::new();
        ledger.record(None, MemoryKind::Conflict, "Too much", 4.0);
        assert_eq!(ledger.all()[0].emotional_impact, 1.0);
    }

    #[test]
    fn test_strongest_filters() {
        let mut ledger = MemoryLedger::new();
        ledger.record(None, MemoryKind::Discovery, "Minor", 0.2);
        ledger.record(None, MemoryKind::Conflict, "Major", 0.9);

        let now = Utc::now();
        let strong = ledger.strongest(0.7, now);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].description, "Major");
    }
}
