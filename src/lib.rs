#![forbid(unsafe_code)]
#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]

//! # itemknn-core
//!
//! Item-item nearest-neighbor collaborative filtering over explicit ratings:
//! - mean-centered, unit-normalized item rating vectors
//! - sparse adjusted-cosine similarity with threshold and top-K truncation
//! - weighted-average rating prediction with query-time neighbor truncation
//!
//! Training is parallel across items; the trained model is immutable and can
//! be shared between threads for prediction.

pub mod config;
pub mod errors;
/// Trained model container.
pub mod model;
/// High-level pipelines.
pub mod pipeline;
/// Rating prediction.
pub mod predict;
/// Sparse rating store and ingestion.
pub mod ratings;
pub mod similarity;
/// Persistence layer.
pub mod persistence;
/// HTTP API server.
pub mod server;
pub mod types;

pub use config::KnnConfig;
pub use errors::KnnError;
pub use model::{ItemItemModel, ModelStats};
pub use pipeline::TrainingPipeline;
pub use predict::Predictor;
pub use types::{Prediction, RatingRecord};
