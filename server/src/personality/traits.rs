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

//! Scalar personality traits

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trait value used when a trait has never been set.
pub const NEUTRAL_TRAIT: f64 = 0.5;

/// Named personality dimensions in `[0, 1]`.
///
/// The trait set is open: evolution may add new names over an agent's
/// lifetime, but `friendliness`, `curiosity`, `aggression`, and `humor`
/// are always present from creation. Every write clamps into range, and
/// reading an unknown trait yields the neutral default rather than an
/// error. A `BTreeMap` keeps serialized profiles diff-stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    values: BTreeMap<String, f64>,
}

impl PersonalityTraits {
    /// Create a trait set with the default starting disposition
    pub fn new() -> Self {
        let mut values = BTreeMap::new();
        values.insert("friendliness".to_string(), 0.7);
        values.insert("curiosity".to_string(), 0.5);
        values.insert("aggression".to_string(), 0.1);
        values.insert("humor".to_string(), 0.3);
        Self { values }
    }

    /// Read a trait, falling back to the neutral default when unset
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(NEUTRAL_TRAIT)
    }

    /// Set a trait, clamped to `[0, 1]`
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value.clamp(0.0, 1.0));
    }

    /// Shift a trait by `delta`, clamped to `[0, 1]`
    pub fn adjust(&mut self, name: &str, delta: f64) {
        let current = self.value(name);
        self.set(name.to_string(), current + delta);
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names currently present in the trait set
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(|k| k.as_str()).collect()
    }

    /// Number of traits present
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the trait set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let traits = PersonalityTraits::new();
        assert_eq!(traits.value("friendliness"), 0.7);
        assert_eq!(traits.value("curiosity"), 0.5);
        assert_eq!(traits.value("aggression"), 0.1);
        assert_eq!(traits.value("humor"), 0.3);
    }

    #[test]
    fn test_unknown_trait_reads_neutral() {
        let traits = PersonalityTraits::new();
        assert_eq!(traits.value("patience"), NEUTRAL_TRAIT);
    }

    #[test]
    fn test_writes_clamp() {
        let mut traits = PersonalityTraits::new();
        traits.set("friendliness", 3.5);
        assert_eq!(traits.value("friendliness"), 1.0);
        traits.set("aggression", -0.7);
        assert_eq!(traits.value("aggression"), 0.0);

        traits.adjust("humor", 10.0);
        assert_eq!(traits.value("humor"), 1.0);
    }

    #[test]
    fn test_open_trait_set() {
        let mut traits = PersonalityTraits::new();
        assert_eq!(traits.len(), 4);
        traits.adjust("stubbornness", 0.2);
        // Adjusting an unset trait starts from the neutral default
        assert_eq!(traits.value("stubbornness"), 0.7);
        assert_eq!(traits.len(), 5);
    }
}
