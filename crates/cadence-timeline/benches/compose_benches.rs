use cadence_core::Duration;
use cadence_timeline::{KeyedDescription, Keyframes, SequenceItem, Stage, TargetId};
use criterion::{criterion_group, criterion_main, Criterion};

fn description(steps: usize) -> KeyedDescription {
    (0..steps)
        .fold(Keyframes::new(), |kf, i| {
            kf.at(i as f64 * 16.0, [("x", i as f64), ("opacity", 1.0)])
        })
        .option("easing", "ease-in-out")
        .build()
}

fn create_stage(effects: usize) -> (Stage, Vec<SequenceItem>) {
    let mut stage = Stage::new();
    let target = TargetId::new("bench");
    stage.add_target(target.clone());
    let desc = description(32);

    let mut items = Vec::with_capacity(effects * 2);
    for i in 0..effects {
        let key = stage.compile(&target, None, &desc).unwrap();
        if i % 10 == 0 {
            items.push(SequenceItem::Label(format!("mark-{}", i)));
        }
        items.push(SequenceItem::Effect(key));
    }
    (stage, items)
}

fn bench_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("cadence_timeline");

    let desc = description(64);
    group.bench_function("resolve_64_steps", |b| {
        b.iter(|| cadence_timeline::resolve_keyframes(None, &desc).unwrap());
    });

    group.bench_function("sequence_1000_effects", |b| {
        b.iter_custom(|iters| {
            let mut total_duration = std::time::Duration::from_nanos(0);

            for _ in 0..iters {
                let (mut stage, items) = create_stage(1000);

                let start = std::time::Instant::now();
                stage.sequence(Duration::zero(), items).unwrap();
                total_duration += start.elapsed();
            }

            total_duration
        });
    });

    group.finish();
}

criterion_group!(benches, bench_composition);
criterion_main!(benches);
