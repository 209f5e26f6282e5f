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

//! Durable agent profile

use crate::agent::AgentId;
use crate::personality::{MemoryLedger, MoodState, PersonalityTraits};
use crate::world::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trailing window kept of an agent's conversation history, in characters
const HISTORY_WINDOW: usize = 1000;

/// Everything about an agent that survives unload and restart.
///
/// Profiles are hydrated from the [`crate::persistence::ProfileStore`] at
/// startup and written back whenever a conversation completes. Behavior
/// state (mode, timers, targets) is deliberately NOT here — it is cheap
/// to rebuild and lives in [`crate::agent::AgentState`] instead. Position
/// bookkeeping stays here so a reloaded agent resumes near where it left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub name: String,
    /// Free-text entity kind, e.g. "villager" or "merchant"
    pub kind: String,
    /// Free-text personality summary used in prompt generation
    pub persona: String,
    /// Dialogue backend to route this agent's requests to (None = default)
    pub provider_id: Option<String>,
    /// Whether this agent participates in autonomous behavior at all
    pub ai_enabled: bool,
    /// Whether replies are forwarded to the voice sink
    pub voice_enabled: bool,
    pub traits: PersonalityTraits,
    pub mood: MoodState,
    pub memories: MemoryLedger,
    /// Completed conversational exchanges over this agent's lifetime
    pub interaction_count: u64,
    /// Trailing window of recent dialogue, oldest content dropped first
    pub conversation_history: String,
    pub last_position: Option<Point>,
    pub home_position: Option<Point>,
    pub last_trait_update: Option<DateTime<Utc>>,
}

impl AgentProfile {
    /// Create a profile with default disposition
    pub fn new(id: AgentId, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            persona: "Friendly and helpful".to_string(),
            provider_id: None,
            ai_enabled: true,
            voice_enabled: false,
            traits: PersonalityTraits::new(),
            mood: MoodState::new(),
            memories: MemoryLedger::new(),
            interaction_count: 0,
            conversation_history: String::new(),
            last_position: None,
            home_position: None,
            last_trait_update: None,
        }
    }

    /// Set the personality summary
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Set the home position
    pub fn with_home(mut self, home: Point) -> Self {
        self.home_position = Some(home);
        self.last_position = Some(home);
        self
    }

    /// Enable or disable voice output
    pub fn with_voice(mut self, enabled: bool) -> Self {
        self.voice_enabled = enabled;
        self
    }

    /// Append a line to the conversation history, keeping only the
    /// trailing window. Truncation drops the oldest characters so the
    /// most recent context always survives.
    pub fn add_history(&mut self, line: &str) {
        if self.conversation_history.is_empty() {
            self.conversation_history.push_str(line);
        } else {
            self.conversation_history.push('\n');
            self.conversation_history.push_str(line);
        }

        if self.conversation_history.len() > HISTORY_WINDOW {
            let excess = self.conversation_history.len() - HISTORY_WINDOW;
            // Don't split a multi-byte character at the cut point
            let cut = (excess..self.conversation_history.len())
                .find(|i| self.conversation_history.is_char_boundary(*i))
                .unwrap_or(excess);
            self.conversation_history = self.conversation_history.split_off(cut);
        }
    }

    /// Clear the conversation history
    pub fn clear_history(&mut self) {
        self.conversation_history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_profile_defaults() {
        let profile = AgentProfile::new(Uuid::new_v4(), "Edda", "villager");
        assert_eq!(profile.name, "Edda");
        assert!(profile.ai_enabled);
        assert!(!profile.voice_enabled);
        assert_eq!(profile.interaction_count, 0);
        assert_eq!(profile.traits.value("friendliness"), 0.7);
        assert!(profile.conversation_history.is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let home = Point::new(4.0, 64.0, -3.0);
        let profile = AgentProfile::new(Uuid::new_v4(), "Bram", "merchant")
            .with_persona("Shrewd trader")
            .with_home(home)
            .with_voice(true);

        assert_eq!(profile.persona, "Shrewd trader");
        assert_eq!(profile.home_position, Some(home));
        assert_eq!(profile.last_position, Some(home));
        assert!(profile.voice_enabled);
    }

    #[test]
    fn test_history_window() {
        let mut profile = AgentProfile::new(Uuid::new_v4(), "Edda", "villager");
        profile.add_history("first line");
        profile.add_history("second line");
        assert_eq!(profile.conversation_history, "first line\nsecond line");

        // Push well past the window; the newest content must survive
        for i in 0..100 {
            profile.add_history(&format!("line number {} with some padding text", i));
        }
        assert!(profile.conversation_history.len() <= 1000);
        assert!(profile.conversation_history.contains("line number 99"));
        assert!(!profile.conversation_history.contains("first line"));
    }

    #[test]
    fn test_history_truncation_respects_char_boundaries() {
        let mut profile = AgentProfile::new(Uuid::new_v4(), "Edda", "villager");
        for _ in 0..200 {
            profile.add_history("многоязычный текст 多言語");
        }
        // Would panic on a bad boundary; also verify the window held
        assert!(profile.conversation_history.len() <= 1004);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut profile = AgentProfile::new(Uuid::new_v4(), "Edda", "villager");
        profile.traits.set("friendliness", 0.42);
        profile.add_history("Said to Bram: fine morning");

        let json = serde_json::to_string(&profile).unwrap();
        let back: AgentProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, profile.id);
        assert_eq!(back.traits.value("friendliness"), 0.42);
        assert_eq!(back.conversation_history, profile.conversation_history);
    }
}
