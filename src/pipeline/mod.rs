//! High-level pipelines: model training.

pub mod train;

pub use train::TrainingPipeline;
