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

//! Voice output capability

use crate::agent::AgentId;

/// Sink for spoken agent replies.
///
/// Replies of voice-enabled agents are forwarded here after a successful
/// dialogue completion; a host can route them to a text-to-speech
/// pipeline. Forwarding is fire-and-forget and never blocks completion
/// handling.
pub trait VoiceSink: Send + Sync {
    /// Emit `text` as speech from `agent`
    fn speak(&self, agent: AgentId, text: &str);
}

/// Voice sink that just logs utterances
#[derive(Debug, Default, Clone, Copy)]
pub struct LogVoice;

impl VoiceSink for LogVoice {
    fn speak(&self, agent: AgentId, text: &str) {
        tracing::info!("{} says: \"{}\"", agent, text);
    }
}
