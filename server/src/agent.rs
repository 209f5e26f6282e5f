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

//! Agent identity, durable profiles, transient behavior state, and the
//! registry that tracks which agents are live in the world.

pub mod profile;
pub mod registry;
pub mod state;

pub use self::profile::AgentProfile;
pub use self::registry::AgentRegistry;
pub use self::state::{AgentState, BehaviorMode};

/// Stable unique identifier of an agent.
///
/// The same identifier keys the profile map, the live-state map, the
/// relationship graph, and the pending-request map.
pub type AgentId = uuid::Uuid;
