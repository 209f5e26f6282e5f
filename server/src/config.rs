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

use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "server/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = "server/.env"
    )]
    pub env_file: Option<String>,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            env_file: Some(".env".to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, String> {
        let conf = serde_yaml::from_reader(
            std::fs::File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?,
        )
        .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(conf)
    }
}

/// Simulation engine tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Milliseconds between tick batches
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Ticks between behavior re-decisions, per agent
    #[serde(default = "default_decision_interval_ticks")]
    pub decision_interval_ticks: u32,

    /// Base radius for social awareness and conversation range
    #[serde(default = "default_interaction_radius")]
    pub interaction_radius: f64,

    /// Concurrent dialogue requests; 0 sizes to available hardware
    #[serde(default)]
    pub dialogue_workers: usize,

    /// Ticks between relationship decay sweeps
    #[serde(default = "default_relationship_decay_interval_ticks")]
    pub relationship_decay_interval_ticks: u64,

    /// Ticks between mood decay sweeps (decay itself is rate-limited)
    #[serde(default = "default_mood_decay_interval_ticks")]
    pub mood_decay_interval_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            decision_interval_ticks: default_decision_interval_ticks(),
            interaction_radius: default_interaction_radius(),
            dialogue_workers: 0,
            relationship_decay_interval_ticks: default_relationship_decay_interval_ticks(),
            mood_decay_interval_ticks: default_mood_decay_interval_ticks(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_decision_interval_ticks() -> u32 {
    100
}

fn default_interaction_radius() -> f64 {
    8.0
}

fn default_relationship_decay_interval_ticks() -> u64 {
    1200
}

fn default_mood_decay_interval_ticks() -> u64 {
    100
}

/// Profile storage settings
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Directory agent profiles are stored under
    pub data_dir: EnvField<String>,

    /// Seconds between auto-save sweeps
    #[serde(default = "default_auto_save_interval_secs")]
    pub auto_save_interval_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: EnvField::from("data/agents".to_string()),
            auto_save_interval_secs: default_auto_save_interval_secs(),
        }
    }
}

fn default_auto_save_interval_secs() -> u64 {
    60
}
