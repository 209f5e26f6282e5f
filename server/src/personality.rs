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

//! Personality model: trait vectors, mood, memories, and the evolution
//! rules that shift them after every completed conversation.

mod engine;
mod memory;
mod mood;
mod traits;

pub use self::engine::{
    action_hint, analyze_sentiment, describe_traits, evolve, prompt_context, should_initiate,
};
pub use self::memory::{Memory, MemoryKind, MemoryLedger};
pub use self::mood::MoodState;
pub use self::traits::PersonalityTraits;
