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

//! Emotional state tracking

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const BASELINE_HAPPINESS: f64 = 0.5;
const BASELINE_NEGATIVE: f64 = 0.1;
const BASELINE_EXCITEMENT: f64 = 0.2;

/// Five independent emotion scalars in `[0, 1]`.
///
/// Emotions drift back toward their baselines over time; decay is
/// rate-limited to once per real-time minute so calling it every tick
/// batch is harmless. Happiness and sadness are coupled: raising one
/// pulls the other down by half the delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodState {
    pub happiness: f64,
    pub sadness: f64,
    pub anger: f64,
    pub fear: f64,
    pub excitement: f64,
    last_decay: DateTime<Utc>,
}

impl MoodState {
    /// Create a mood at its resting baselines
    pub fn new() -> Self {
        Self {
            happiness: BASELINE_HAPPINESS,
            sadness: BASELINE_NEGATIVE,
            anger: BASELINE_NEGATIVE,
            fear: BASELINE_NEGATIVE,
            excitement: 0.3,
            last_decay: Utc::now(),
        }
    }

    /// Raise or lower happiness; positive deltas also soothe sadness
    pub fn adjust_happiness(&mut self, delta: f64) {
        self.happiness = (self.happiness + delta).clamp(0.0, 1.0);
        if delta > 0.0 {
            self.sadness = (self.sadness - delta * 0.5).clamp(0.0, 1.0);
        }
    }

    /// Raise or lower sadness; positive deltas also dampen happiness
    pub fn adjust_sadness(&mut self, delta: f64) {
        self.sadness = (self.sadness + delta).clamp(0.0, 1.0);
        if delta > 0.0 {
            self.happiness = (self.happiness - delta * 0.5).clamp(0.0, 1.0);
        }
    }

    /// Raise or lower anger
    pub fn adjust_anger(&mut self, delta: f64) {
        self.anger = (self.anger + delta).clamp(0.0, 1.0);
    }

    /// Raise or lower fear
    pub fn adjust_fear(&mut self, delta: f64) {
        self.fear = (self.fear + delta).clamp(0.0, 1.0);
    }

    /// Raise or lower excitement
    pub fn adjust_excitement(&mut self, delta: f64) {
        self.excitement = (self.excitement + delta).clamp(0.0, 1.0);
    }

    /// The strongest emotion, or "neutral" if nothing exceeds 0.4
    pub fn dominant_emotion(&self) -> &'static str {
        let mut max = 0.0;
        let mut emotion = "neutral";
        for (value, name) in [
            (self.happiness, "happy"),
            (self.sadness, "sad"),
            (self.anger, "angry"),
            (self.fear, "afraid"),
            (self.excitement, "excited"),
        ] {
            if value > max {
                max = value;
                emotion = name;
            }
        }
        if max > 0.4 { emotion } else { "neutral" }
    }

    /// Drift every emotion one step toward its baseline.
    ///
    /// No-op when called again within the same one-minute window, so the
    /// engine can invoke it every tick batch without compounding decay.
    pub fn decay(&mut self, now: DateTime<Utc>) {
        if now - self.last_decay < Duration::seconds(60) {
            return;
        }

        self.happiness = move_toward(self.happiness, BASELINE_HAPPINESS, 0.01);
        self.sadness = move_toward(self.sadness, BASELINE_NEGATIVE, 0.02);
        self.anger = move_toward(self.anger, BASELINE_NEGATIVE, 0.02);
        self.fear = move_toward(self.fear, BASELINE_NEGATIVE, 0.02);
        self.excitement = move_toward(self.excitement, BASELINE_EXCITEMENT, 0.03);

        self.last_decay = now;
    }
}

impl Default for MoodState {
    fn default() -> Self {
        Self::new()
    }
}

fn move_toward(current: f64, target: f64, amount: f64) -> f64 {
    if current < target {
        (current + amount).min(target)
    } else {
        (current - amount).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_coupling() {
        let mut mood = MoodState::new();
        mood.adjust_happiness(0.4);
        assert_eq!(mood.happiness, 0.9);
        // Raising happiness soothes sadness by half the delta
        assert!(mood.sadness < 0.1);

        let mut mood = MoodState::new();
        mood.adjust_sadness(0.4);
        assert_eq!(mood.sadness, 0.5);
        assert_eq!(mood.happiness, 0.3);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut mood = MoodState::new();
        mood.adjust_anger(5.0);
        assert_eq!(mood.anger, 1.0);
        mood.adjust_anger(-5.0);
        assert_eq!(mood.anger, 0.0);
    }

    #[test]
    fn test_dominant_emotion() {
        let mut mood = MoodState::new();
        assert_eq!(mood.dominant_emotion(), "happy");

        mood.adjust_anger(0.8);
        assert_eq!(mood.dominant_emotion(), "angry");

        // Nothing above the 0.4 threshold reads as neutral
        let mut flat = MoodState::new();
        flat.happiness = 0.3;
        flat.excitement = 0.2;
        assert_eq!(flat.dominant_emotion(), "neutral");
    }

    #[test]
    fn test_decay_is_rate_limited() {
        let mut mood = MoodState::new();
        mood.adjust_anger(0.6);
        let spiked = mood.anger;

        let later = Utc::now() + Duration::seconds(90);
        mood.decay(later);
        let once = mood.anger;
        assert!(once < spiked);

        // A second decay inside the same minute window changes nothing
        mood.decay(later + Duration::seconds(10));
        assert_eq!(mood.anger, once);

        // But another full minute later it moves again
        mood.decay(later + Duration::seconds(61));
        assert!(mood.anger < once);
    }

    #[test]
    fn test_decay_converges_to_baseline() {
        let mut mood = MoodState::new();
        mood.adjust_fear(0.5);

        let mut now = Utc::now();
        for _ in 0..60 {
            now += Duration::seconds(61);
            mood.decay(now);
        }
        assert_eq!(mood.fear, BASELINE_NEGATIVE);
        assert_eq!(mood.happiness, BASELINE_HAPPINESS);
    }
}
