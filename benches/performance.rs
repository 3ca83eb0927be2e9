use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mlbdash::fixtures::create_mock_nav;
use mlbdash::matchups::lists::sort_names;
use mlbdash::matchups::options::derive_year_lists;
use mlbdash::matchups::{FragmentIndex, MatchupMode};
use mlbdash::search::SidebarView;
use mlbdash::store::MemoryStore;
use serde_json::{json, Map, Value};

const TEAMS: usize = 30;
const PITCHERS_PER_TEAM: usize = 13;

fn pitcher(team: usize, n: usize) -> String {
    format!("Pitcher{} Team{}x{}", n, team, n)
}

/// A season-sized `sp_vs_team` index: every pitcher against every other team
fn create_season_index() -> FragmentIndex {
    let mut year = Map::new();
    for team in 0..TEAMS {
        for n in 0..PITCHERS_PER_TEAM {
            let mut sides = Map::new();
            for side in ["@", "vs."] {
                let opponents: Map<String, Value> = (0..TEAMS)
                    .filter(|t| *t != team)
                    .map(|t| (format!("Team{}", t), json!(format!("frags/{}_{}_{}.html", team, n, t))))
                    .collect();
                sides.insert(side.to_string(), Value::Object(opponents));
            }
            year.insert(pitcher(team, n), Value::Object(sides));
        }
    }
    let index = json!({ "modes": { "sp_vs_team": { "fragments": { "2024": year } } } });
    serde_json::from_value(index).expect("bench index is valid")
}

fn bench_resolve(c: &mut Criterion) {
    let index = create_season_index();
    let hit = [pitcher(7, 3), "vs.".to_string(), "Team12".to_string()];
    let miss = [pitcher(7, 3), "vs.".to_string(), "Team7".to_string()];

    c.bench_function("resolve_hit", |b| {
        b.iter(|| index.resolve(MatchupMode::SpVsTeam, black_box("2024"), black_box(&hit[..])))
    });
    c.bench_function("resolve_miss", |b| {
        b.iter(|| index.resolve(MatchupMode::SpVsTeam, black_box("2024"), black_box(&miss[..])))
    });
}

fn bench_derive_year_lists(c: &mut Criterion) {
    let index = create_season_index();
    c.bench_function("derive_year_lists", |b| {
        b.iter(|| derive_year_lists(black_box(&index), black_box("2024")))
    });
}

fn bench_sort_names(c: &mut Criterion) {
    let names: Vec<String> = (0..TEAMS * PITCHERS_PER_TEAM)
        .rev()
        .map(|i| pitcher(i % TEAMS, i))
        .collect();
    c.bench_function("sort_names", |b| b.iter(|| sort_names(black_box(names.iter()))));
}

fn bench_sidebar_search(c: &mut Criterion) {
    let nav = create_mock_nav();
    let store = MemoryStore::new();
    let mut view = SidebarView::new(&nav, &store);
    c.bench_function("sidebar_search_cycle", |b| {
        b.iter(|| {
            view.apply_search_and_filters(black_box("doe"), &store);
            view.apply_search_and_filters(black_box(""), &store);
        })
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_derive_year_lists,
    bench_sort_names,
    bench_sidebar_search
);
criterion_main!(benches);
