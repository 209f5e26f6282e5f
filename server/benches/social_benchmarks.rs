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

//! Benchmarks for the hot paths of the social graph and the sentiment
//! heuristic, both of which run on every conversation completion.

use criterion::{Criterion, criterion_group, criterion_main};
use hearthvale_server::agent::AgentProfile;
use hearthvale_server::personality::{analyze_sentiment, prompt_context};
use hearthvale_server::social::{InteractionQuality, RelationshipGraph};
use std::hint::black_box;
use uuid::Uuid;

fn bench_record_interaction(c: &mut Criterion) {
    let graph = RelationshipGraph::new();
    let agents: Vec<Uuid> = (0..100).map(|_| Uuid::new_v4()).collect();

    let mut i = 0usize;
    c.bench_function("social/record_interaction", |b| {
        b.iter(|| {
            let a = agents[i % agents.len()];
            let t = agents[(i * 7 + 1) % agents.len()];
            if a != t {
                graph.record_interaction(black_box(a), black_box(t), InteractionQuality::Neutral);
            }
            i += 1;
        })
    });
}

fn bench_describe(c: &mut Criterion) {
    let graph = RelationshipGraph::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    graph.record_interaction(a, b, InteractionQuality::Positive);

    c.bench_function("social/describe", |bench| {
        bench.iter(|| graph.describe(black_box(a), black_box(b), "Bram"))
    });
}

fn bench_analyze_sentiment(c: &mut Criterion) {
    let text = "That was a great harvest festival, thanks for the help — \
                though the weather turned bad and half the stalls had to stop early.";

    c.bench_function("personality/analyze_sentiment", |b| {
        b.iter(|| analyze_sentiment(black_box(text)))
    });
}

fn bench_prompt_context(c: &mut Criterion) {
    let mut profile = AgentProfile::new(Uuid::new_v4(), "Edda", "villager");
    profile.persona = "Warm-hearted baker who knows everyone's business".to_string();
    profile.traits.set("friendliness", 0.9);
    profile.traits.set("humor", 0.7);

    c.bench_function("personality/prompt_context", |b| {
        b.iter(|| prompt_context(black_box(&profile)))
    });
}

criterion_group!(
    benches,
    bench_record_interaction,
    bench_describe,
    bench_analyze_sentiment,
    bench_prompt_context
);
criterion_main!(benches);
