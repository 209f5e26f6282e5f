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

//! Dialogue generation: the provider capability, the voice sink, and the
//! coordinator that owns the lifecycle of every in-flight request.

pub mod coordinator;
pub mod provider;
pub mod voice;

pub use self::coordinator::RequestCoordinator;
pub use self::provider::{DialogueProvider, ProviderError};
pub use self::voice::{LogVoice, VoiceSink};
