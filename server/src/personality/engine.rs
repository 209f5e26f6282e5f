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

//! Personality evolution rules.
//!
//! Traits shift by small deterministic steps after every completed
//! conversation, driven by a keyword sentiment heuristic — this is
//! deliberately not NLP. A rare random drift keeps traits from freezing
//! at local optima; every randomized branch draws from the caller's rng
//! so tests can pin the outcome.

use crate::agent::AgentProfile;
use chrono::Utc;
use rand::Rng;
use std::fmt::Write;

/// Trait step applied per qualifying interaction
const EVOLUTION_RATE: f64 = 0.01;

/// Chance per evolution of one trait drifting on its own
const DRIFT_PROBABILITY: f64 = 0.1;

/// Largest magnitude a single drift can move a trait
const DRIFT_MAGNITUDE: f64 = 0.02;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "love", "thanks", "awesome", "cool", "yes", "sure",
];

const NEGATIVE_WORDS: &[&str] = &["bad", "hate", "no", "angry", "leave", "go away", "stop"];

const QUESTION_WORDS: &[&str] = &["what", "how", "why"];

const HUMOR_WORDS: &[&str] = &["haha", "lol", "joke"];

const HOSTILE_WORDS: &[&str] = &["!", "leave", "go away"];

/// Traits eligible for random drift
const DRIFT_TRAITS: &[&str] = &["friendliness", "curiosity", "aggression", "humor"];

/// Keyword sentiment of `text` in `[-1, 1]`.
///
/// Counts case-insensitive substring matches against the positive and
/// negative word lists and returns `(positive - negative) / total`,
/// or `0.0` when nothing matches.
pub fn analyze_sentiment(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();

    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }
    (positive as f64 - negative as f64) / total as f64
}

/// Evolve a profile's traits and mood from one completed exchange.
///
/// `prior_message` is what prompted the agent to speak; `response` is
/// what came back from the dialogue backend. Never fails: unknown traits
/// read as neutral and every write clamps to `[0, 1]`.
pub fn evolve(profile: &mut AgentProfile, prior_message: &str, response: &str, rng: &mut impl Rng) {
    profile.interaction_count += 1;

    let sentiment = analyze_sentiment(response);
    let response_lower = response.to_lowercase();
    let prior_lower = prior_message.to_lowercase();

    if sentiment > 0.3 {
        profile.traits.adjust("friendliness", EVOLUTION_RATE);
        profile.mood.adjust_happiness(0.05);
    } else if sentiment < -0.3 {
        profile.traits.adjust("friendliness", -EVOLUTION_RATE);
        profile.mood.adjust_sadness(0.05);
        profile.mood.adjust_anger(0.02);
    }

    let asked_question = prior_message.contains('?')
        || QUESTION_WORDS.iter().any(|w| prior_lower.contains(w));
    if asked_question {
        profile.traits.adjust("curiosity", EVOLUTION_RATE);
    }

    if HUMOR_WORDS.iter().any(|w| response_lower.contains(w)) {
        profile.traits.adjust("humor", EVOLUTION_RATE);
    }

    if HOSTILE_WORDS.iter().any(|w| response_lower.contains(w)) {
        profile.traits.adjust("aggression", EVOLUTION_RATE * 0.5);
    }

    // Rare drift so long-lived agents don't settle into fixed points
    if rng.random::<f64>() < DRIFT_PROBABILITY {
        let name = DRIFT_TRAITS[rng.random_range(0..DRIFT_TRAITS.len())];
        let drift = (rng.random::<f64>() - 0.5) * (DRIFT_MAGNITUDE * 2.0);
        profile.traits.adjust(name, drift);
    }

    profile.last_trait_update = Some(Utc::now());
}

/// Render the character sheet handed to the dialogue backend as the
/// system prompt. Pure string assembly, no I/O.
pub fn prompt_context(profile: &AgentProfile) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are {}, a {} in the settlement of Hearthvale.\n",
        profile.name, profile.kind
    );
    let _ = writeln!(prompt, "Your personality: {}\n", profile.persona);

    let _ = writeln!(prompt, "Personality traits (scale 0-1):");
    for (name, value) in profile.traits.iter() {
        let _ = writeln!(prompt, "- {}: {:.2}", name, value);
    }

    prompt.push_str("\nGuidelines for behavior:\n");
    prompt.push_str("- Stay in character as defined by your personality\n");
    prompt.push_str("- Respond naturally and conversationally\n");
    prompt.push_str("- Keep responses concise (1-2 sentences usually)\n");
    prompt.push_str("- Your personality should subtly influence your responses\n");
    prompt.push_str("- You live in a small settlement, so talk of weather, work, and neighbors is natural\n");

    let friendliness = profile.traits.value("friendliness");
    if friendliness > 0.7 {
        prompt.push_str("- You are very friendly and eager to chat\n");
    } else if friendliness < 0.3 {
        prompt.push_str("- You are somewhat reserved and cautious with strangers\n");
    }

    if profile.traits.value("humor") > 0.6 {
        prompt.push_str("- You enjoy making jokes and being playful\n");
    }

    prompt
}

/// Probabilistic gate for starting a conversation:
/// `P = 0.5 + 0.3 * friendliness + 0.2 * curiosity`.
pub fn should_initiate(profile: &AgentProfile, rng: &mut impl Rng) -> bool {
    let chance = 0.5
        + profile.traits.value("friendliness") * 0.3
        + profile.traits.value("curiosity") * 0.2;
    rng.random::<f64>() < chance
}

/// Short prose description of the profile's disposition
pub fn describe_traits(profile: &AgentProfile) -> String {
    let mut desc = String::new();

    let friendliness = profile.traits.value("friendliness");
    if friendliness > 0.8 {
        desc.push_str("Very friendly and welcoming. ");
    } else if friendliness > 0.5 {
        desc.push_str("Generally friendly. ");
    } else if friendliness > 0.3 {
        desc.push_str("Somewhat reserved. ");
    } else {
        desc.push_str("Quite distant and cautious. ");
    }

    let curiosity = profile.traits.value("curiosity");
    if curiosity > 0.7 {
        desc.push_str("Very curious about new things. ");
    } else if curiosity < 0.3 {
        desc.push_str("Not particularly curious. ");
    }

    let humor = profile.traits.value("humor");
    if humor > 0.6 {
        desc.push_str("Enjoys humor and jokes.");
    } else if humor < 0.3 {
        desc.push_str("Takes things seriously.");
    }

    desc.trim().to_string()
}

/// Personality-flavored hint used for diagnostic thought strings
pub fn action_hint(profile: &AgentProfile) -> &'static str {
    let curiosity = profile.traits.value("curiosity");
    let friendliness = profile.traits.value("friendliness");
    let aggression = profile.traits.value("aggression");

    if curiosity > 0.7 {
        "You feel drawn to explore new places."
    } else if friendliness > 0.7 {
        "You want to meet new people."
    } else if aggression > 0.7 {
        "You feel protective of your territory."
    } else if friendliness < 0.3 {
        "You prefer to keep to yourself."
    } else {
        "You're content with where you are."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentProfile;
    use rand::RngCore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    /// Rng that yields the same word forever, for pinning probability
    /// gates open or shut
    struct ConstRng(u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.0.to_le_bytes();
            for (i, byte) in dest.iter_mut().enumerate() {
                *byte = bytes[i % 8];
            }
        }
    }

    fn profile() -> AgentProfile {
        AgentProfile::new(Uuid::new_v4(), "Tamsin", "villager")
    }

    /// Draws pinned near 0.5: the drift gate (p = 0.1) never fires
    fn no_drift_rng() -> ConstRng {
        ConstRng(u64::MAX / 2)
    }

    #[test]
    fn test_sentiment_positive() {
        // "great" and "thanks" hit, nothing negative
        assert_eq!(analyze_sentiment("That's great, thanks!"), 1.0);
    }

    #[test]
    fn test_sentiment_negative() {
        assert_eq!(analyze_sentiment("I hate this, go away"), -1.0);
    }

    #[test]
    fn test_sentiment_mixed_and_empty() {
        // "great" vs "bad": (1 - 1) / 2
        assert_eq!(analyze_sentiment("great but bad"), 0.0);
        assert_eq!(analyze_sentiment(""), 0.0);
        assert_eq!(analyze_sentiment("the mill needs repairs"), 0.0);
    }

    #[test]
    fn test_positive_response_raises_friendliness() {
        let mut profile = profile();
        profile.traits.set("friendliness", 0.5);

        evolve(&mut profile, "hello", "That's great, thanks!", &mut no_drift_rng());
        assert!((profile.traits.value("friendliness") - 0.51).abs() < 1e-9);
        assert_eq!(profile.interaction_count, 1);
        assert!(profile.last_trait_update.is_some());
    }

    #[test]
    fn test_negative_response_lowers_friendliness() {
        let mut profile = profile();
        profile.traits.set("friendliness", 0.5);

        evolve(&mut profile, "hello", "I hate this. Stop bothering me", &mut no_drift_rng());
        assert!((profile.traits.value("friendliness") - 0.49).abs() < 1e-9);
        assert!(profile.mood.sadness > 0.1);
    }

    #[test]
    fn test_question_raises_curiosity() {
        let mut profile = profile();
        profile.traits.set("curiosity", 0.5);

        evolve(&mut profile, "Why is the mill closed?", "It is being repaired", &mut no_drift_rng());
        assert!((profile.traits.value("curiosity") - 0.51).abs() < 1e-9);
    }

    #[test]
    fn test_humor_and_hostility_cues() {
        let mut profile = profile();
        profile.traits.set("humor", 0.3);
        profile.traits.set("aggression", 0.1);

        evolve(&mut profile, "hello", "Haha, that joke again! Leave it to you", &mut no_drift_rng());
        assert!((profile.traits.value("humor") - 0.31).abs() < 1e-9);
        assert!((profile.traits.value("aggression") - 0.105).abs() < 1e-9);
    }

    #[test]
    fn test_updates_always_clamped() {
        let mut profile = profile();
        profile.traits.set("friendliness", 1.0);

        for _ in 0..50 {
            evolve(&mut profile, "hello", "great thanks love it", &mut no_drift_rng());
        }
        assert_eq!(profile.traits.value("friendliness"), 1.0);
    }

    #[test]
    fn test_drift_is_seedable() {
        // Same seed, same starting profile: identical trait vectors after
        // many evolutions, drift included.
        let run = |seed: u64| {
            let mut profile = profile();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..100 {
                evolve(&mut profile, "how are you?", "great, thanks!", &mut rng);
            }
            profile
                .traits
                .iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_drift_stays_bounded() {
        let mut profile = profile();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            // Neutral text: only drift can move traits
            evolve(&mut profile, "the weather", "the weather indeed", &mut rng);
        }
        for (_, value) in profile.traits.iter() {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_prompt_context_structure() {
        let mut profile = profile();
        profile.persona = "Gruff but fair blacksmith".to_string();
        profile.traits.set("friendliness", 0.9);
        profile.traits.set("humor", 0.8);

        let prompt = prompt_context(&profile);
        assert!(prompt.contains("You are Tamsin"));
        assert!(prompt.contains("Gruff but fair blacksmith"));
        assert!(prompt.contains("friendliness: 0.90"));
        assert!(prompt.contains("very friendly and eager"));
        assert!(prompt.contains("jokes"));
    }

    #[test]
    fn test_prompt_context_reserved_clause() {
        let mut profile = profile();
        profile.traits.set("friendliness", 0.1);

        let prompt = prompt_context(&profile);
        assert!(prompt.contains("reserved and cautious"));
        assert!(!prompt.contains("eager to chat"));
    }

    #[test]
    fn test_should_initiate_gate() {
        let mut profile = profile();
        profile.traits.set("friendliness", 1.0);
        profile.traits.set("curiosity", 1.0);
        // P = 1.0: any draw below one passes
        assert!(should_initiate(&profile, &mut ConstRng(u64::MAX / 2)));

        profile.traits.set("friendliness", 0.0);
        profile.traits.set("curiosity", 0.0);
        // P = 0.5: a draw near one fails
        assert!(!should_initiate(&profile, &mut ConstRng(u64::MAX)));
    }

    #[test]
    fn test_describe_traits() {
        let mut profile = profile();
        profile.traits.set("friendliness", 0.9);
        profile.traits.set("curiosity", 0.8);
        profile.traits.set("humor", 0.7);

        let desc = describe_traits(&profile);
        assert!(desc.contains("Very friendly"));
        assert!(desc.contains("Very curious"));
        assert!(desc.contains("jokes"));
    }

    #[test]
    fn test_action_hint() {
        let mut profile = profile();
        profile.traits.set("curiosity", 0.9);
        assert_eq!(action_hint(&profile), "You feel drawn to explore new places.");

        profile.traits.set("curiosity", 0.2);
        profile.traits.set("friendliness", 0.1);
        assert_eq!(action_hint(&profile), "You prefer to keep to yourself.");
    }
}
