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

//! Dialogue provider capability.
//!
//! The engine never performs network I/O itself. An embedding host wires
//! in something that implements [`DialogueProvider`] — an HTTP client for
//! a hosted model, a local model runner, a canned script for tests. When
//! nothing is wired in, conversational behavior degrades gracefully and
//! everything else keeps running.

use async_trait::async_trait;
use thiserror::Error;

/// Failures a dialogue backend can report.
///
/// All of these are transient from the engine's point of view: the
/// request is dropped, the speaker returns to Idle, and the next
/// socializing cycle may try again.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("no dialogue provider configured")]
    NotConfigured,
}

/// Text-generation backend the coordinator submits requests to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DialogueProvider: Send + Sync {
    /// Generate a reply.
    ///
    /// `system_prompt` is the speaker's character sheet, `user_message`
    /// the conversational prompt, `history` the speaker's trailing
    /// conversation window.
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        history: &str,
    ) -> Result<String, ProviderError>;

    /// Whether the backend is configured and reachable enough to try
    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider() {
        let mut provider = MockDialogueProvider::new();
        provider.expect_is_ready().return_const(true);
        provider
            .expect_generate()
            .returning(|_, _, _| Ok("A fine morning to you!".to_string()));

        assert!(provider.is_ready());
        let reply = provider.generate("sheet", "prompt", "").await.unwrap();
        assert_eq!(reply, "A fine morning to you!");
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Timeout(30);
        assert_eq!(err.to_string(), "request timed out after 30s");
        let err = ProviderError::NotConfigured;
        assert!(err.to_string().contains("no dialogue provider"));
    }
}
