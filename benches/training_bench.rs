//! Benchmark training and prediction throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use itemknn_core::{ratings::JsonlRatings, ItemItemModel, KnnConfig, Predictor, TrainingPipeline};

/// Deterministic synthetic ratings: every user rates a strided subset of items.
fn synthetic_ratings(n_users: u32, n_items: u32) -> Vec<(u32, u32, f64)> {
    let mut out = Vec::new();
    for u in 0..n_users {
        for i in (u % 3..n_items).step_by(3) {
            let rating = 1.0 + ((u * 7 + i * 13) % 5) as f64;
            out.push((u, i, rating));
        }
    }
    out
}

fn bench_training(c: &mut Criterion) {
    let ratings = synthetic_ratings(500, 300);

    c.bench_function("train_synthetic_500x300", |b| {
        b.iter(|| {
            let pipeline = TrainingPipeline::new(KnnConfig {
                save_neighbors: Some(50),
                ..KnnConfig::default()
            });
            let model: ItemItemModel<u32, u32> = pipeline.train(ratings.iter().copied()).unwrap();
            black_box(model);
        });
    });

    c.bench_function("train_sample_jsonl", |b| {
        let source = JsonlRatings::new("data/sample_ratings.jsonl");
        b.iter(|| {
            let model = TrainingPipeline::new(KnnConfig::default()).train_from_jsonl(&source).unwrap();
            black_box(model);
        });
    });
}

fn bench_prediction(c: &mut Criterion) {
    let config = KnnConfig::default();
    let model: ItemItemModel<u32, u32> = TrainingPipeline::new(config.clone())
        .train(synthetic_ratings(500, 300))
        .unwrap();
    let predictor = Predictor::new(&config);
    let items: Vec<u32> = (0..300).collect();

    c.bench_function("predict_all_items_one_user", |b| {
        b.iter(|| black_box(predictor.predict(&model, &7u32, &items, None)));
    });
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
