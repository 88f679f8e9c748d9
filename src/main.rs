use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use itemknn_core::{
    persistence::{self, ModelMetadata},
    ratings::JsonlRatings,
    KnnConfig, Predictor, TrainingPipeline,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "itemknn", about = "Item-item collaborative filtering CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a model from a ratings file and persist it.
    Train {
        /// Path to the input ratings (JSONL)
        #[arg(long)]
        ratings: PathBuf,
        /// Output directory for the model
        #[arg(long)]
        model_dir: PathBuf,
        /// Path to config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Predict ratings of items for one user.
    Predict {
        /// Path to the model directory
        #[arg(long)]
        model_dir: PathBuf,
        /// User key
        #[arg(long)]
        user: String,
        /// Candidate items, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        items: Vec<String>,
        /// Explicit rating as item=value; replaces the user's stored ratings
        #[arg(long = "rating", value_parser = parse_rating)]
        ratings: Vec<(String, f64)>,
    },

    /// Print summary statistics of a trained model.
    Stats {
        /// Path to the model directory
        #[arg(long)]
        model_dir: PathBuf,
    },

    /// Start HTTP API server.
    Serve {
        /// Path to the model directory
        #[arg(long)]
        model_dir: PathBuf,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { ratings, model_dir, config } => {
            cmd_train(ratings, model_dir, config)?;
        }
        Commands::Predict { model_dir, user, items, ratings } => {
            cmd_predict(model_dir, &user, &items, ratings)?;
        }
        Commands::Stats { model_dir } => {
            cmd_stats(model_dir)?;
        }
        Commands::Serve { model_dir, port } => {
            itemknn_core::server::start_server(model_dir, port).await?;
        }
    }

    Ok(())
}

fn parse_rating(s: &str) -> Result<(String, f64), String> {
    let (item, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected item=value, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad rating value '{}': {}", value, e))?;
    Ok((item.trim().to_string(), value))
}

fn cmd_train(ratings_path: PathBuf, model_dir: PathBuf, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // 1) Load config
    let config = if let Some(path) = config_path {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&s)?
    } else {
        KnnConfig::default()
    };
    println!("Using config: {:?}", config);

    // 2) Train
    let source = JsonlRatings::new(ratings_path);
    let pipeline = TrainingPipeline::new(config.clone());
    let model = pipeline.train_from_jsonl(&source)?;

    let stats = model.stats();
    println!(
        "Model trained: {} users, {} items, {} ratings, {} neighbor pairs",
        stats.num_users, stats.num_items, stats.num_ratings, stats.num_edges
    );

    // 3) Save
    println!("Saving model to {}...", model_dir.display());
    persistence::save_model(&model_dir, &ModelMetadata::new(&config), &model)?;
    println!("Model saved successfully.");
    Ok(())
}

fn cmd_predict(
    model_dir: PathBuf,
    user: &str,
    items: &[String],
    ratings: Vec<(String, f64)>,
) -> anyhow::Result<()> {
    let (metadata, model) = persistence::load_model::<String, String>(&model_dir)?;
    let predictor = Predictor::new(&metadata.config);

    let explicit: Option<HashMap<String, f64>> = if ratings.is_empty() {
        None
    } else {
        Some(ratings.into_iter().collect())
    };

    let predictions = predictor.predict(&model, user, items, explicit.as_ref());

    println!("User: '{}'", user);
    if explicit.is_none() {
        match model.user_ratings(user) {
            Some(known) => println!("  {} stored ratings", known.len()),
            None => println!("  unknown user, no stored ratings"),
        }
    }
    for p in predictions {
        match p.score {
            Some(score) => println!("  {}: {:.4}", p.item, score),
            None => println!("  {}: no prediction", p.item),
        }
    }
    Ok(())
}

fn cmd_stats(model_dir: PathBuf) -> anyhow::Result<()> {
    let (metadata, model) = persistence::load_model::<String, String>(&model_dir)?;
    let stats = model.stats();

    println!("=== Model ===");
    println!("  Version: {}", metadata.version);
    println!("  Created: {}", metadata.created_at);
    println!("  Min similarity: {}", metadata.config.min_similarity);
    println!("  Save neighbors: {:?}", metadata.config.neighbor_cap());
    println!("  Max neighbors: {:?}", metadata.config.max_neighbors);
    println!("  Min neighbors: {}", metadata.config.min_neighbors);
    println!();
    println!("=== Statistics ===");
    println!("  Users: {}", stats.num_users);
    println!("  Items: {}", stats.num_items);
    println!("  Ratings: {}", stats.num_ratings);
    println!("  Neighbor pairs: {}", stats.num_edges);
    println!("  Avg neighbors per item: {:.2}", stats.avg_neighbors);
    println!("  Items without neighbors: {}", stats.items_without_neighbors);
    Ok(())
}
