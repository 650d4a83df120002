use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cricket_terminal::api::parse_players_json;
use cricket_terminal::model::{MatchStat, Player, Role};
use cricket_terminal::stats;

fn sample_roster(players: u32, matches: u32) -> Vec<Player> {
    (0..players)
        .map(|id| {
            let role = if id % 3 == 0 { Role::Bowler } else { Role::Batsman };
            let stats = (0..matches)
                .map(|m| MatchStat {
                    date: format!("2024-{:02}-{:02}", m % 12 + 1, (m * 7 + id) % 28 + 1),
                    score: ((id * 31 + m * 17) % 120) as i32,
                    opponent: format!("Opponent {}", m % 9),
                    venue: format!("Ground {}", m % 5),
                    is_home: m % 2 == 0,
                })
                .collect();
            Player::new(id, format!("Player {id}"), role).with_stats(stats)
        })
        .collect()
}

fn bench_team_metrics(c: &mut Criterion) {
    let roster = sample_roster(200, 40);
    c.bench_function("team_summary", |b| {
        b.iter(|| {
            let summary = stats::team_summary(black_box(&roster));
            black_box(summary);
        })
    });
}

fn bench_rankings(c: &mut Criterion) {
    let roster = sample_roster(200, 40);
    c.bench_function("top_performers", |b| {
        b.iter(|| {
            let top = stats::top_performers(black_box(&roster), 5);
            black_box(top.len());
        })
    });
    c.bench_function("players_in_form", |b| {
        b.iter(|| {
            let rows = stats::players_in_form(black_box(&roster));
            black_box(rows.len());
        })
    });
}

fn bench_recent_matches(c: &mut Criterion) {
    let roster = sample_roster(200, 40);
    c.bench_function("recent_matches", |b| {
        b.iter(|| {
            let recent = stats::recent_matches(black_box(&roster), 5);
            black_box(recent.len());
        })
    });
}

fn bench_players_parse(c: &mut Criterion) {
    let raw = serde_json::to_string(&sample_roster(100, 20)).expect("roster serializes");
    c.bench_function("players_parse", |b| {
        b.iter(|| {
            let players = parse_players_json(black_box(&raw)).expect("valid roster json");
            black_box(players.len());
        })
    });
}

criterion_group!(
    benches,
    bench_team_metrics,
    bench_rankings,
    bench_recent_matches,
    bench_players_parse
);
criterion_main!(benches);
