use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scout_terminal::gradient::{strength_color, weakness_color};
use scout_terminal::metric_schema::METRICS;
use scout_terminal::rankings::{metric_rank, team_profile};
use scout_terminal::state::TeamRecord;
use scout_terminal::stats_fetch::parse_team_stats_json;

/// Full-width league: twenty teams, every schema metric populated.
fn full_league() -> Vec<TeamRecord> {
    (0..20)
        .map(|n| {
            let mut metrics = HashMap::new();
            for (idx, (key, _)) in METRICS.iter().enumerate() {
                let value = 1.0 + (n as f64) * 0.1 + (idx as f64) * 0.01;
                metrics.insert(key.to_string(), Some(value));
            }
            TeamRecord {
                team_name: format!("Team {n:02}"),
                metrics,
            }
        })
        .collect()
}

fn bench_team_stats_parse(c: &mut Criterion) {
    c.bench_function("team_stats_parse", |b| {
        b.iter(|| {
            let records = parse_team_stats_json(black_box(TEAM_STATS_JSON)).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_profile_compute(c: &mut Criterion) {
    let records = full_league();
    c.bench_function("profile_compute", |b| {
        b.iter(|| {
            let profile = team_profile(black_box(&records), black_box("Team 07")).unwrap();
            black_box(profile.strengths.len() + profile.weaknesses.len());
        })
    });
}

fn bench_single_metric_rank(c: &mut Criterion) {
    let records = full_league();
    c.bench_function("single_metric_rank", |b| {
        b.iter(|| {
            let rank = metric_rank(
                black_box(&records),
                black_box("Team 13"),
                black_box("team_season_goals_pg"),
            );
            black_box(rank);
        })
    });
}

fn bench_gradient_sampling(c: &mut Criterion) {
    c.bench_function("gradient_sampling", |b| {
        b.iter(|| {
            for rank in 1..=5usize {
                black_box(strength_color(black_box(rank)));
            }
            for rank in 16..=20usize {
                black_box(weakness_color(black_box(rank), black_box(20)));
            }
        })
    });
}

criterion_group!(
    perf,
    bench_team_stats_parse,
    bench_profile_compute,
    bench_single_metric_rank,
    bench_gradient_sampling
);
criterion_main!(perf);

static TEAM_STATS_JSON: &str = include_str!("../tests/fixtures/team_stats.json");
