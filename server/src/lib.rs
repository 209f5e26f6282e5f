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

//! Hearthvale simulation engine.
//!
//! Autonomous, personality-evolving agents in a shared world: each agent
//! periodically decides its own behavior, moves, strikes up conversations
//! with its neighbors through a pluggable language-model backend, and
//! forms evolving opinions of everyone it talks to.
//!
//! The engine is headless and host-agnostic. Movement, spatial queries,
//! dialogue generation, voice output, and profile storage are all
//! capability traits ([`world::MovementActuator`],
//! [`world::EnvironmentQuery`], [`dialogue::DialogueProvider`],
//! [`dialogue::VoiceSink`], [`persistence::ProfileStore`]); wire in real
//! implementations to embed it in a game server, or use the bundled
//! headless world to run it standalone.

pub mod agent;
pub mod behavior;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod persistence;
pub mod personality;
pub mod social;
pub mod world;
