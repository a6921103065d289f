use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pipeline_layout::config::{LayoutConfig, RenderConfig};
use pipeline_layout::ir::Step;
use pipeline_layout::layout::compute_layout;
use pipeline_layout::parser::parse_steps;
use pipeline_layout::pipeline::compute_pipeline_layout;
use pipeline_layout::resolve::resolve_dependencies;
use pipeline_layout::theme::Theme;
use std::hint::black_box;

/// `stages` layers of `width` parallel steps; every step depends on all
/// steps of the previous stage plus `skips` longer-range references.
fn staged_pipeline(stages: usize, width: usize, skips: usize) -> Vec<Step> {
    let mut steps = Vec::with_capacity(stages * width);
    for stage in 0..stages {
        for lane in 0..width {
            let idx = (stage * width + lane) as i64;
            let mut deps: Vec<i64> = Vec::new();
            if stage > 0 {
                let prev = ((stage - 1) * width) as i64;
                deps.extend(prev..prev + width as i64);
            }
            for skip in 0..skips {
                let back = stage as i64 - 2 - skip as i64;
                if back >= 0 {
                    deps.push(back * width as i64 + ((lane + skip) % width) as i64);
                }
            }
            steps.push(
                Step::new(1000 + idx, idx)
                    .depending_on(deps)
                    .in_group(format!("stage-{stage}")),
            );
        }
    }
    steps
}

/// Chain with a closing back reference, forcing the grid path.
fn cyclic_pipeline(len: usize) -> Vec<Step> {
    (0..len as i64)
        .map(|idx| {
            let dep = if idx == 0 { len as i64 - 1 } else { idx - 1 };
            Step::new(idx, idx).depending_on([dep])
        })
        .collect()
}

fn steps_json(steps: &[Step]) -> String {
    serde_json::to_string(steps).expect("serialize failed")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, steps) in [
        ("staged_small", staged_pipeline(4, 3, 0)),
        ("staged_large", staged_pipeline(20, 8, 2)),
    ] {
        let input = steps_json(&steps);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_steps(black_box(data)).expect("parse failed");
                black_box(parsed.steps.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let mut group = c.benchmark_group("layout");
    for (name, steps) in [
        ("staged_small", staged_pipeline(4, 3, 0)),
        ("staged_medium", staged_pipeline(10, 5, 1)),
        ("staged_large", staged_pipeline(20, 8, 2)),
        ("cyclic_large", cyclic_pipeline(200)),
    ] {
        let edges = resolve_dependencies(&steps);
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(steps, edges),
            |b, (steps, edges)| {
                b.iter(|| {
                    let layout = compute_layout(black_box(steps), black_box(edges), &config);
                    black_box(layout.nodes.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let render = RenderConfig::default();
    let theme = Theme::default();
    let mut group = c.benchmark_group("end_to_end");
    for (name, steps) in [
        ("staged_medium", staged_pipeline(10, 5, 1)),
        ("staged_large", staged_pipeline(20, 8, 2)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &steps, |b, steps| {
            b.iter(|| {
                let result = compute_pipeline_layout(black_box(steps), &render, &config, &theme);
                black_box(result.swimlanes.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_end_to_end
);
criterion_main!(benches);
