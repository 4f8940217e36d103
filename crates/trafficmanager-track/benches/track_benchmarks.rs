//! Track traffic benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trafficmanager_track::prelude::*;
use trafficmanager_waypoint::prelude::*;

fn populated(agents: u32) -> TrackTraffic {
    let track = TrackTraffic::new();
    for agent in 0..agents {
        for step in 0..20 {
            let key = compute_key(1, 0, 1, f64::from(agent * 2 + step));
            track.record_passage(key, AgentId(agent));
            track.update_grid_position(AgentId(agent), &GridId(i64::from(agent / 8)));
        }
    }
    track
}

fn bench_passage(c: &mut Criterion) {
    let track = TrackTraffic::new();
    let key = compute_key(1, 0, 1, 10.0);
    for agent in 0..4 {
        track.record_passage(key, AgentId(agent));
    }

    c.bench_function("record_remove_passage_4_occupants", |b| {
        b.iter(|| {
            track.record_passage(black_box(key), AgentId(99));
            track.remove_passage(black_box(key), AgentId(99));
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlapping_agents");
    for agents in [16_u32, 128, 1024] {
        let track = populated(agents);
        group.bench_with_input(BenchmarkId::from_parameter(agents), &agents, |b, _| {
            b.iter(|| black_box(track.overlapping_agents(AgentId(5))));
        });
    }
    group.finish();

    let track = populated(128);
    let key = compute_key(1, 0, 1, 30.0);
    c.bench_function("passing_agents", |b| {
        b.iter(|| black_box(track.passing_agents(black_box(key))));
    });
}

fn bench_grid_update(c: &mut Criterion) {
    let track = TrackTraffic::new();
    c.bench_function("update_remove_grid_position", |b| {
        b.iter(|| {
            track.update_grid_position(AgentId(1), &GridId(3));
            track.remove_grid_position(AgentId(1), &GridId(3), None);
        });
    });
}

criterion_group!(benches, bench_passage, bench_queries, bench_grid_update);
criterion_main!(benches);
