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

//! Autonomous behavior: per-agent mode selection and execution.
//!
//! Every agent re-decides its mode on its own cadence (timers are
//! per-agent, not globally synchronized) and executes the current mode
//! every tick. Decisions weigh personality traits against the immediate
//! surroundings; execution issues movement commands and, for social
//! modes, hands conversation attempts to the request coordinator. A
//! missing or stale target is never an error — the agent just falls back
//! to Idle.

use crate::agent::{AgentId, AgentRegistry, AgentState, BehaviorMode};
use crate::dialogue::RequestCoordinator;
use crate::personality;
use crate::world::{EnvironmentQuery, MovementActuator, Point};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Ticks an agent sits idle before it goes wandering
const IDLE_WANDER_TICKS: u32 = 200;

/// Horizontal distance at which a movement target counts as reached
const ARRIVAL_DISTANCE: f64 = 1.5;

/// A followed agent closer than this is not chased
const FOLLOW_SLACK: f64 = 6.0;

/// Distance from a threat at which fleeing stops
const FLEE_SAFETY: f64 = 16.0;

/// How far one flee step aims past the agent's current position
const FLEE_STEP: f64 = 10.0;

/// Radius scanned for something to glance at while stationary
const GLANCE_RADIUS: f64 = 16.0;

/// Below this energy every other trigger yields to Resting
const ENERGY_REST_THRESHOLD: f64 = 0.2;

/// Energy lost per moving tick
const ENERGY_DRAIN: f64 = 0.0001;

/// Energy regained per resting tick
const ENERGY_REGEN: f64 = 0.001;

const SOCIALIZE_CHANCE: f64 = 0.3;
const EXPLORE_CHANCE: f64 = 0.2;
const GOAL_REROLL_CHANCE: f64 = 0.1;
const CONVERSE_CHANCE: f64 = 0.02;
const GLANCE_CHANCE: f64 = 0.05;

/// Wander targets land between these distances from the agent
const WANDER_MIN_DISTANCE: f64 = 5.0;
const WANDER_MAX_DISTANCE: f64 = 20.0;

/// Tunables for the behavior system
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Ticks between re-decisions, per agent
    pub decision_interval: u32,
    /// Base radius for social awareness and conversation range
    pub interaction_radius: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            decision_interval: 100,
            interaction_radius: 8.0,
        }
    }
}

/// Trait values sampled once per tick so decision code doesn't hold the
/// profile lock while it works on the state
struct Persona {
    enabled: bool,
    friendliness: f64,
    curiosity: f64,
    aggression: f64,
}

/// Work that must happen after the agent's state lock is released
enum Followup {
    None,
    Converse(AgentId),
}

/// Per-agent behavior state machine
pub struct BehaviorSystem {
    registry: Arc<AgentRegistry>,
    coordinator: Arc<RequestCoordinator>,
    movement: Arc<dyn MovementActuator>,
    environment: Arc<dyn EnvironmentQuery>,
    config: BehaviorConfig,
    rng: Mutex<StdRng>,
}

impl BehaviorSystem {
    /// Create a behavior system with an entropy-seeded rng
    pub fn new(
        registry: Arc<AgentRegistry>,
        coordinator: Arc<RequestCoordinator>,
        movement: Arc<dyn MovementActuator>,
        environment: Arc<dyn EnvironmentQuery>,
        config: BehaviorConfig,
    ) -> Self {
        Self {
            registry,
            coordinator,
            movement,
            environment,
            config,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reseed the decision rng for deterministic tests
    pub async fn reseed(&self, seed: u64) {
        *self.rng.lock().await = StdRng::seed_from_u64(seed);
    }

    /// Advance one agent by one tick: timers, a re-decision when due,
    /// then execution of the current mode.
    pub async fn process(&self, id: AgentId) {
        let Some(profile_arc) = self.registry.profile(id) else {
            return;
        };
        let Some(state_arc) = self.registry.state(id) else {
            return;
        };

        let persona = {
            let p = profile_arc.read().await;
            Persona {
                enabled: p.ai_enabled,
                friendliness: p.traits.value("friendliness"),
                curiosity: p.traits.value("curiosity"),
                aggression: p.traits.value("aggression"),
            }
        };
        if !persona.enabled {
            return;
        }

        let mut rng = self.rng.lock().await;
        let mut state = state_arc.lock().await;

        state.action_timer += 1;
        if state.mode() == BehaviorMode::Idle {
            state.idle_timer += 1;
        }
        if state.mode() == BehaviorMode::Resting {
            state.restore_energy(ENERGY_REGEN);
        }

        if state.action_timer >= self.config.decision_interval {
            state.action_timer = 0;
            self.decide(id, &mut *state, &persona, &mut *rng).await;
        }

        let followup = self.execute(id, &mut *state, &persona, &mut *rng).await;

        if self.movement.is_moving(id) && state.mode() != BehaviorMode::Resting {
            state.drain_energy(ENERGY_DRAIN);
        }

        drop(state);
        drop(rng);

        if let Followup::Converse(listener) = followup {
            self.coordinator.initiate(id, listener).await;
        }
    }

    /// Pick a (possibly new) mode from drives, personality, and
    /// surroundings. Trigger order is fixed: exhaustion beats everything.
    async fn decide(
        &self,
        id: AgentId,
        state: &mut AgentState,
        persona: &Persona,
        rng: &mut StdRng,
    ) {
        let Some(position) = self.movement.current_position(id) else {
            state.set_mode(BehaviorMode::Idle);
            return;
        };

        let company = self
            .nearest_eligible(id, self.config.interaction_radius * 2.0)
            .await
            .is_some();
        let stranger_near = self
            .environment
            .nearest_player_like(id, self.config.interaction_radius)
            .is_some();

        if state.energy < ENERGY_REST_THRESHOLD {
            state.set_mode(BehaviorMode::Resting);
            state.last_thought = "I'm feeling tired, time to rest.".to_string();
        } else if company && persona.friendliness > 0.5 && rng.random::<f64>() < SOCIALIZE_CHANCE {
            state.set_mode(BehaviorMode::Socializing);
            state.last_thought = "I see someone I should talk to.".to_string();
        } else if stranger_near && persona.aggression > 0.7 {
            state.set_mode(BehaviorMode::Fleeing);
            state.last_thought = "I don't like strangers around here.".to_string();
        } else if persona.curiosity > 0.6 && rng.random::<f64>() < EXPLORE_CHANCE {
            state.set_mode(BehaviorMode::Exploring);
            state.target_position = Some(wander_target(position, rng));
            state.last_thought = "I wonder what's over there...".to_string();
        } else if state.idle_timer > IDLE_WANDER_TICKS {
            state.set_mode(BehaviorMode::Wandering);
            state.target_position = Some(wander_target(position, rng));
            state.idle_timer = 0;
            state.last_thought = "Time to stretch my legs.".to_string();
        } else if rng.random::<f64>() < GOAL_REROLL_CHANCE {
            state.reroll_goals(rng);
        }
    }

    /// Execute one tick of the current mode
    async fn execute(
        &self,
        id: AgentId,
        state: &mut AgentState,
        persona: &Persona,
        rng: &mut StdRng,
    ) -> Followup {
        match state.mode() {
            BehaviorMode::Wandering | BehaviorMode::Exploring => {
                let Some(position) = self.movement.current_position(id) else {
                    state.set_mode(BehaviorMode::Idle);
                    return Followup::None;
                };
                let target = match state.target_position {
                    Some(target) => target,
                    None => {
                        let target = wander_target(position, rng);
                        state.target_position = Some(target);
                        target
                    }
                };
                if position.horizontal_distance(target) < ARRIVAL_DISTANCE {
                    state.set_mode(BehaviorMode::Idle);
                } else {
                    let speed = 1.0 + persona.curiosity * 0.3;
                    self.movement.move_toward(id, target, speed);
                }
            }
            BehaviorMode::Following => {
                let Some(target_id) = state.target_agent else {
                    state.set_mode(BehaviorMode::Idle);
                    return Followup::None;
                };
                if !self.registry.is_live(target_id) {
                    state.set_mode(BehaviorMode::Idle);
                    return Followup::None;
                }
                let Some(target_pos) = self.movement.current_position(target_id) else {
                    state.set_mode(BehaviorMode::Idle);
                    return Followup::None;
                };
                if let Some(position) = self.movement.current_position(id) {
                    if position.distance(target_pos) > FOLLOW_SLACK {
                        self.movement.move_toward(id, target_pos, 1.2);
                    }
                }
                self.movement.face(id, target_pos);
            }
            BehaviorMode::Socializing => {
                if rng.random::<f64>() < CONVERSE_CHANCE && !self.coordinator.has_pending(id) {
                    if let Some(listener) = self
                        .nearest_eligible(id, self.config.interaction_radius)
                        .await
                    {
                        // Outgoing personalities start conversations more
                        // readily than withdrawn ones
                        if let Some(profile) = self.registry.profile(id) {
                            let go = personality::should_initiate(&*profile.read().await, rng);
                            if go {
                                return Followup::Converse(listener);
                            }
                        }
                    }
                }
            }
            BehaviorMode::Fleeing => {
                let threat = self.environment.nearest_player_like(id, FLEE_SAFETY);
                let position = self.movement.current_position(id);
                match (threat, position) {
                    (Some(threat), Some(position)) => {
                        let away = flee_target(position, threat, rng);
                        self.movement.move_toward(id, away, 1.5);
                    }
                    // Beyond the safety distance, or not placed at all
                    _ => state.set_mode(BehaviorMode::Idle),
                }
            }
            BehaviorMode::Resting
            | BehaviorMode::Idle
            | BehaviorMode::Conversing
            | BehaviorMode::Working => {
                if rng.random::<f64>() < GLANCE_CHANCE {
                    if let Some(watched) = self.environment.nearest_player_like(id, GLANCE_RADIUS) {
                        self.movement.face(id, watched);
                    }
                }
            }
        }

        Followup::None
    }

    /// Nearest live, AI-enabled agent within `radius`, if any
    async fn nearest_eligible(&self, id: AgentId, radius: f64) -> Option<AgentId> {
        let origin = self.movement.current_position(id)?;

        let mut best: Option<(AgentId, f64)> = None;
        for other in self.environment.nearby_agents(id, radius) {
            if !self.registry.is_live(other) {
                continue;
            }
            let Some(profile) = self.registry.profile(other) else {
                continue;
            };
            if !profile.read().await.ai_enabled {
                continue;
            }
            let Some(position) = self.movement.current_position(other) else {
                continue;
            };
            let dist = origin.distance(position);
            if best.map(|(_, d)| dist < d).unwrap_or(true) {
                best = Some((other, dist));
            }
        }
        best.map(|(other, _)| other)
    }
}

/// Random polar offset from `origin` at wander distance
fn wander_target(origin: Point, rng: &mut impl Rng) -> Point {
    let angle = rng.random::<f64>() * std::f64::consts::TAU;
    let distance =
        WANDER_MIN_DISTANCE + rng.random::<f64>() * (WANDER_MAX_DISTANCE - WANDER_MIN_DISTANCE);
    Point::new(
        origin.x + angle.cos() * distance,
        origin.y,
        origin.z + angle.sin() * distance,
    )
}

/// A point directly away from `threat`, `FLEE_STEP` past the agent
fn flee_target(position: Point, threat: Point, rng: &mut impl Rng) -> Point {
    let dx = position.x - threat.x;
    let dz = position.z - threat.z;
    let dist = (dx * dx + dz * dz).sqrt();
    if dist < f64::EPSILON {
        // Standing on top of the threat: any direction will do
        return wander_target(position, rng);
    }
    Point::new(
        position.x + dx / dist * FLEE_STEP,
        position.y,
        position.z + dz / dist * FLEE_STEP,
    )
}
