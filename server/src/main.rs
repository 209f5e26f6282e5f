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
use hearthvale_server::agent::AgentProfile;
use hearthvale_server::config::{Arguments, Configuration};
use hearthvale_server::dialogue::LogVoice;
use hearthvale_server::engine::Simulation;
use hearthvale_server::persistence::JsonFileStore;
use hearthvale_server::world::{HeadlessWorld, Point};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration, falling back to defaults when no file exists
    let config = match Configuration::load(&arguments.config_file) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using default configuration", e);
            Configuration::default()
        }
    };

    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!("Starting Hearthvale simulation server...");

    // Headless world doubles as movement actuator and environment query
    let world = Arc::new(HeadlessWorld::new());

    let store = Arc::new(JsonFileStore::new(&**config.persistence.data_dir));
    let simulation = Arc::new(
        Simulation::new(
            config.simulation.clone(),
            store,
            config.persistence.auto_save_interval_secs,
            world.clone(),
            world.clone(),
        )
        .await,
    );
    simulation.set_voice(Arc::new(LogVoice)).await;
    tracing::warn!(
        "No dialogue provider configured; agents will wander and socialize but not converse"
    );

    // Hydrate stored agents, or found a fresh settlement
    let loaded = simulation.load().await?;
    if loaded > 0 {
        tracing::info!("Loaded {} agent profiles", loaded);
    } else {
        tracing::info!("No stored agents found; founding a fresh settlement");
        found_settlement(&simulation).await;
    }

    // Bring every known agent into the world
    for id in simulation.registry().known_ids() {
        let Some(profile) = simulation.registry().profile(id) else {
            continue;
        };
        let (name, kind, position) = {
            let p = profile.read().await;
            (
                p.name.clone(),
                p.kind.clone(),
                p.last_position.or(p.home_position),
            )
        };
        simulation.agent_entered(id, &name, &kind).await;
        world.place_agent(id, position.unwrap_or_default());
    }

    simulation.start_auto_save();

    // World integration runs beside the engine tick loop
    {
        let world = world.clone();
        let tick_ms = config.simulation.tick_interval_ms;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_millis(tick_ms));
            loop {
                interval.tick().await;
                world.step();
            }
        });
    }

    let runner = tokio::spawn(Arc::clone(&simulation).run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    runner.abort();
    simulation.shutdown().await;

    Ok(())
}

/// Seed a small starting village so a fresh data directory has life in it
async fn found_settlement(simulation: &Arc<Simulation>) {
    let founders = [
        ("Edda", "villager", "Warm-hearted baker who knows everyone's business", 0.0, 0.0),
        ("Bram", "merchant", "Shrewd trader with a soft spot for gossip", 6.0, 4.0),
        ("Tamsin", "blacksmith", "Gruff but fair, happiest at the forge", -5.0, 7.0),
        ("Wren", "villager", "Restless wanderer who collects strange stories", 10.0, -6.0),
    ];

    for (name, kind, persona, x, z) in founders {
        let profile = AgentProfile::new(Uuid::new_v4(), name, kind)
            .with_persona(persona)
            .with_home(Point::new(x, 64.0, z));
        let id = profile.id;
        simulation.registry().hydrate(vec![profile]);
        simulation.profiles().mark_dirty(id);
    }
}
