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

//! Transient per-agent behavior state

use crate::agent::AgentId;
use crate::world::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Top-level behavior category an agent is currently in.
/// Exactly one mode is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorMode {
    /// Standing still, observing
    Idle,
    /// Random movement within radius
    Wandering,
    /// Following another agent
    Following,
    /// In conversation
    Conversing,
    /// Performing a task
    Working,
    /// Taking a break, regaining energy
    Resting,
    /// Moving to a new location
    Exploring,
    /// Moving away from danger
    Fleeing,
    /// Seeking other agents
    Socializing,
}

/// Goal tags agents re-roll from
const GOAL_POOL: &[&str] = &["explore", "socialize", "rest", "work", "wander"];

/// Live behavior state of one agent.
///
/// Discarded on unload and rebuilt fresh on reload — only the profile is
/// durable. Target fields are meaningful solely for the modes that use
/// them and are cleared whenever the mode changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    mode: BehaviorMode,
    pub target_position: Option<Point>,
    pub target_agent: Option<AgentId>,
    /// Ticks since the last re-decision
    pub action_timer: u32,
    /// Ticks spent idle since the last wander
    pub idle_timer: u32,
    /// Simple mood drive: 0 = unhappy, 1 = happy
    pub mood: f64,
    /// Energy drive: 0 = exhausted, 1 = energetic
    pub energy: f64,
    pub goals: Vec<String>,
    /// Rationale of the most recent decision, for diagnostics only
    pub last_thought: String,
}

impl AgentState {
    /// Create a fresh state in Idle with full energy
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut state = Self {
            mode: BehaviorMode::Idle,
            target_position: None,
            target_agent: None,
            action_timer: 0,
            idle_timer: 0,
            mood: 0.5,
            energy: 1.0,
            goals: Vec::new(),
            last_thought: String::new(),
        };
        state.reroll_goals(rng);
        state
    }

    /// Current behavior mode
    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    /// Switch modes, clearing any targets left over from the old mode
    pub fn set_mode(&mut self, mode: BehaviorMode) {
        if self.mode != mode {
            self.target_position = None;
            self.target_agent = None;
        }
        self.mode = mode;
    }

    /// Pick a new set of two goal tags
    pub fn reroll_goals(&mut self, rng: &mut impl Rng) {
        self.goals.clear();
        for _ in 0..2 {
            let goal = GOAL_POOL[rng.random_range(0..GOAL_POOL.len())];
            self.goals.push(goal.to_string());
        }
    }

    /// Drain energy by `amount`, bottoming out at zero
    pub fn drain_energy(&mut self, amount: f64) {
        self.energy = (self.energy - amount).max(0.0);
    }

    /// Restore energy by `amount`, capped at one
    pub fn restore_energy(&mut self, amount: f64) {
        self.energy = (self.energy + amount).min(1.0);
    }
}
