use std::collections::HashMap;
use std::io::Write;

use itemknn_core::{
    persistence::{self, ModelMetadata},
    ratings::JsonlRatings,
    ItemItemModel, KnnConfig, Predictor, TrainingPipeline,
};

#[test]
fn smoke_train_persist_predict() -> anyhow::Result<()> {
    // 1. Small JSONL rating file
    let dir = tempfile::tempdir()?;
    let ratings_path = dir.path().join("ratings.jsonl");
    let mut file = std::fs::File::create(&ratings_path)?;
    writeln!(file, r#"{{"user": "ann", "item": "heat", "rating": 5}}"#)?;
    writeln!(file, r#"{{"user": "ann", "item": "ronin", "rating": 4}}"#)?;
    writeln!(file, r#"{{"user": "ann", "item": "amelie", "rating": 1}}"#)?;
    writeln!(file, r#"{{"user": "bob", "item": "heat", "rating": 2}}"#)?;
    writeln!(file, r#"{{"user": "bob", "item": "ronin", "rating": 1}}"#)?;
    writeln!(file, r#"{{"user": "bob", "item": "amelie", "rating": 5}}"#)?;
    writeln!(file, r#"{{"user": "cat", "item": "heat", "rating": 4}}"#)?;
    writeln!(file, r#"{{"user": "cat", "item": "amelie", "rating": 2}}"#)?;
    writeln!(file, r#"{{"user": "dan", "item": "ronin", "rating": 5}}"#)?;
    drop(file);

    // 2. Train
    let config = KnnConfig::default();
    let model = TrainingPipeline::new(config.clone()).train_from_jsonl(&JsonlRatings::new(&ratings_path))?;

    let stats = model.stats();
    assert_eq!(stats.num_users, 4);
    assert_eq!(stats.num_items, 3);
    assert_eq!(stats.num_ratings, 9);
    assert!(stats.num_edges > 0);

    let heat_nbrs = model.neighbors("heat").expect("heat is trained");
    assert_eq!(heat_nbrs[0].0, "ronin");

    // 3. Persist and reload
    let model_dir = dir.path().join("model");
    persistence::save_model(&model_dir, &ModelMetadata::new(&config), &model)?;
    let (metadata, loaded): (_, ItemItemModel<String, String>) = persistence::load_model(&model_dir)?;

    assert_eq!(metadata.config, config);
    assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(loaded.stats(), stats);
    assert_eq!(loaded.rating("cat", "amelie"), Some(2.0));

    let mut cat: Vec<(String, f64)> = loaded
        .user_ratings("cat")
        .expect("cat is trained")
        .into_iter()
        .map(|(item, rating)| (item.clone(), rating))
        .collect();
    cat.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(cat, vec![("amelie".to_string(), 2.0), ("heat".to_string(), 4.0)]);
    assert!(loaded.user_ratings("nobody").is_none());

    // 4. Predict with both models
    let predictor = Predictor::new(&metadata.config);
    let items = vec!["ronin".to_string(), "nope".to_string()];
    let before = predictor.predict(&model, "cat", &items, None);
    let after = predictor.predict(&loaded, "cat", &items, None);
    assert_eq!(before, after);
    assert!(before[0].score.is_some());
    assert_eq!(before[1].score, None);

    // cat liked heat, which tracks ronin, so ronin should come out above its mean
    let ronin_mean = loaded.item_mean("ronin").unwrap();
    assert!(before[0].score.unwrap() > ronin_mean);

    let explicit: HashMap<String, f64> = [("heat".to_string(), 1.0)].into_iter().collect();
    let low = predictor.predict(&loaded, "cat", &items, Some(&explicit));
    assert!(low[0].score.unwrap() < ronin_mean);

    Ok(())
}

#[test]
fn sample_dataset_trains() -> anyhow::Result<()> {
    let source = JsonlRatings::new("data/sample_ratings.jsonl");
    let model = TrainingPipeline::new(KnnConfig {
        save_neighbors: Some(5),
        ..KnnConfig::default()
    })
    .train_from_jsonl(&source)?;

    let stats = model.stats();
    println!("{:?}", stats);
    assert_eq!(stats.num_items, 10);
    assert!(stats.avg_neighbors <= 5.0);
    Ok(())
}

#[test]
fn loading_a_missing_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = persistence::load_model::<String, String>(&dir.path().join("absent"));
    assert!(result.is_err());
}
