#![allow(dead_code)]

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use redlilium_inspector::{
    ClassContext, EmptyScope, FnScope, HeadlessBackend, Inspect, Inspector, InspectorConfig,
    Value, evaluate,
};

// ---------------------------------------------------------------------------
// Helper types
// ---------------------------------------------------------------------------

#[derive(Inspect, Default)]
#[inspect(serializable)]
struct Stats {
    #[inspect(min = 0.0, max = 100.0)]
    pub health: f32,
    pub armor: i32,
    pub speed: f32,
}

#[derive(Inspect, Default)]
struct Player {
    #[inspect(box_group = "Identity")]
    pub name: String,
    #[inspect(box_group = "Identity")]
    pub tag: String,
    #[inspect(tab = "Tabs/Combat")]
    pub damage: f32,
    #[inspect(tab = "Tabs/Combat", show_if = "armed")]
    pub crit: f32,
    #[inspect(tab = "Tabs/Movement")]
    pub jump: f32,
    #[inspect(foldout = "Advanced", info_box = "=damage * crit")]
    pub multiplier: f32,
    pub armed: bool,
    pub stats: Stats,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

fn bench_discover(c: &mut Criterion) {
    let player = Player::default();
    let config = InspectorConfig::default();
    c.bench_function("discover_player", |b| {
        b.iter(|| black_box(ClassContext::discover(&player, &config)));
    });
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn bench_render_headless(c: &mut Criterion) {
    let mut player = Player::default();
    let mut inspector = Inspector::for_window(InspectorConfig::default(), Vec::new());
    c.bench_function("render_player_headless", |b| {
        b.iter_batched(
            HeadlessBackend::new,
            |mut backend| {
                inspector.show(&mut player, &mut backend);
                black_box(backend)
            },
            BatchSize::SmallInput,
        );
    });
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

fn bench_evaluate_arithmetic(c: &mut Criterion) {
    c.bench_function("evaluate_arithmetic", |b| {
        b.iter(|| black_box(evaluate("(1 + 2) * 3 - 4 / 5 + -6", &mut EmptyScope)));
    });
}

fn bench_evaluate_variables(c: &mut Criterion) {
    c.bench_function("evaluate_variables", |b| {
        b.iter(|| {
            let mut scope = FnScope {
                variables: |name: &str| match name {
                    "health" => Ok(Value::Float(80.0)),
                    "max" => Ok(Value::Float(100.0)),
                    _ => Err(format!("unknown '{name}'")),
                },
                functions: |name: &str, _args: Value| Err(format!("unknown '{name}'")),
            };
            black_box(evaluate("health / max * 100 + health", &mut scope))
        });
    });
}

criterion_group!(
    benches,
    bench_discover,
    bench_render_headless,
    bench_evaluate_arithmetic,
    bench_evaluate_variables,
);
criterion_main!(benches);
