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

//! World capability seams: movement, spatial queries, and a headless
//! in-memory world used by the server binary and the test suites.
//!
//! The engine never talks to a game engine directly. Movement commands go
//! through [`MovementActuator`] and spatial awareness comes from
//! [`EnvironmentQuery`]; an embedding host implements both against its own
//! entity store. [`HeadlessWorld`] is the reference implementation: a flat,
//! featureless plane that integrates movement once per tick.

use crate::agent::AgentId;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Full 3D distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance in the horizontal plane, ignoring elevation.
    /// Arrival and flee checks use this so slopes don't stall agents.
    pub fn horizontal_distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Movement commands issued by the behavior system.
///
/// `speed_factor` is a multiplier over the host's base walking speed;
/// personality (curiosity) and urgency (fleeing) scale it.
pub trait MovementActuator: Send + Sync {
    /// Start moving an agent toward a target point
    fn move_toward(&self, agent: AgentId, target: Point, speed_factor: f64);

    /// Turn an agent to face a point without moving
    fn face(&self, agent: AgentId, target: Point);

    /// Whether the agent is currently in motion
    fn is_moving(&self, agent: AgentId) -> bool;

    /// Current position of the agent, if it is placed in the world
    fn current_position(&self, agent: AgentId) -> Option<Point>;
}

/// Spatial awareness queries answered by the embedding host.
pub trait EnvironmentQuery: Send + Sync {
    /// Identifiers of other agents within `radius` of `agent`
    fn nearby_agents(&self, agent: AgentId, radius: f64) -> Vec<AgentId>;

    /// Position of the nearest player-like entity within `radius`, if any
    fn nearest_player_like(&self, agent: AgentId, radius: f64) -> Option<Point>;
}

/// Base walking speed of the headless world, in units per tick.
const BASE_SPEED: f64 = 0.4;

#[derive(Debug, Clone)]
struct Body {
    position: Point,
    destination: Option<(Point, f64)>,
    facing: Option<Point>,
}

/// A flat in-memory world. Agents and player-like visitors are points on a
/// plane; `step()` advances every outstanding movement command by one tick.
#[derive(Default)]
pub struct HeadlessWorld {
    bodies: DashMap<AgentId, Body>,
    visitors: DashMap<Uuid, Point>,
}

impl HeadlessWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an agent at a position, replacing any previous placement
    pub fn place_agent(&self, agent: AgentId, position: Point) {
        self.bodies.insert(
            agent,
            Body {
                position,
                destination: None,
                facing: None,
            },
        );
    }

    /// Remove an agent from the world
    pub fn remove_agent(&self, agent: AgentId) {
        self.bodies.remove(&agent);
    }

    /// Place a player-like visitor; returns its identifier
    pub fn place_visitor(&self, position: Point) -> Uuid {
        let id = Uuid::new_v4();
        self.visitors.insert(id, position);
        id
    }

    /// Remove a player-like visitor
    pub fn remove_visitor(&self, id: Uuid) {
        self.visitors.remove(&id);
    }

    /// Advance all movement commands by one tick
    pub fn step(&self) {
        for mut entry in self.bodies.iter_mut() {
            let body = entry.value_mut();
            let Some((target, factor)) = body.destination else {
                continue;
            };
            let remaining = body.position.horizontal_distance(target);
            let stride = BASE_SPEED * factor;
            if remaining <= stride {
                body.position.x = target.x;
                body.position.z = target.z;
                body.destination = None;
            } else {
                body.position.x += (target.x - body.position.x) / remaining * stride;
                body.position.z += (target.z - body.position.z) / remaining * stride;
            }
        }
    }
}

impl MovementActuator for HeadlessWorld {
    fn move_toward(&self, agent: AgentId, target: Point, speed_factor: f64) {
        if let Some(mut body) = self.bodies.get_mut(&agent) {
            body.destination = Some((target, speed_factor));
        }
    }

    fn face(&self, agent: AgentId, target: Point) {
        if let Some(mut body) = self.bodies.get_mut(&agent) {
            body.facing = Some(target);
        }
    }

    fn is_moving(&self, agent: AgentId) -> bool {
        self.bodies
            .get(&agent)
            .map(|b| b.destination.is_some())
            .unwrap_or(false)
    }

    fn current_position(&self, agent: AgentId) -> Option<Point> {
        self.bodies.get(&agent).map(|b| b.position)
    }
}

impl EnvironmentQuery for HeadlessWorld {
    fn nearby_agents(&self, agent: AgentId, radius: f64) -> Vec<AgentId> {
        let Some(origin) = self.current_position(agent) else {
            return Vec::new();
        };
        self.bodies
            .iter()
            .filter(|entry| *entry.key() != agent)
            .filter(|entry| entry.value().position.distance(origin) < radius)
            .map(|entry| *entry.key())
            .collect()
    }

    fn nearest_player_like(&self, agent: AgentId, radius: f64) -> Option<Point> {
        let origin = self.current_position(agent)?;
        self.visitors
            .iter()
            .map(|entry| (*entry.value(), entry.value().distance(origin)))
            .filter(|(_, dist)| *dist < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(3.0, 0.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.horizontal_distance(b), 5.0);

        let c = Point::new(3.0, 10.0, 4.0);
        assert_eq!(a.horizontal_distance(c), 5.0);
        assert!(a.distance(c) > 5.0);
    }

    #[test]
    fn test_movement_integration() {
        let world = HeadlessWorld::new();
        let agent = Uuid::new_v4();
        world.place_agent(agent, Point::new(0.0, 0.0, 0.0));

        world.move_toward(agent, Point::new(10.0, 0.0, 0.0), 1.0);
        assert!(world.is_moving(agent));

        world.step();
        let pos = world.current_position(agent).unwrap();
        assert!(pos.x > 0.0 && pos.x < 10.0);

        // Enough steps to arrive
        for _ in 0..30 {
            world.step();
        }
        let pos = world.current_position(agent).unwrap();
        assert_eq!(pos.x, 10.0);
        assert!(!world.is_moving(agent));
    }

    #[test]
    fn test_nearby_agents() {
        let world = HeadlessWorld::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        world.place_agent(a, Point::new(0.0, 0.0, 0.0));
        world.place_agent(b, Point::new(3.0, 0.0, 0.0));
        world.place_agent(c, Point::new(100.0, 0.0, 0.0));

        let nearby = world.nearby_agents(a, 8.0);
        assert_eq!(nearby, vec![b]);
    }

    #[test]
    fn test_nearest_player_like() {
        let world = HeadlessWorld::new();
        let agent = Uuid::new_v4();
        world.place_agent(agent, Point::new(0.0, 0.0, 0.0));

        assert!(world.nearest_player_like(agent, 16.0).is_none());

        world.place_visitor(Point::new(12.0, 0.0, 0.0));
        let near = world.place_visitor(Point::new(4.0, 0.0, 0.0));

        let found = world.nearest_player_like(agent, 16.0).unwrap();
        assert_eq!(found.x, 4.0);

        world.remove_visitor(near);
        let found = world.nearest_player_like(agent, 16.0).unwrap();
        assert_eq!(found.x, 12.0);
    }
}
