//! Persistence layer for trained models.
//! Saves/loads: metadata (JSON) and the model itself (bincode).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::KnnConfig;
use crate::model::ItemItemModel;
use crate::types::Key;

const METADATA_FILE: &str = "metadata.json";
const MODEL_FILE: &str = "model.bin";

/// Metadata stored with the model.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Version of the itemknn-core library.
    pub version: String,
    /// ISO 8601 timestamp of creation.
    pub created_at: String,
    /// Configuration used to train the model.
    pub config: KnnConfig,
}

impl ModelMetadata {
    /// Create new metadata with current version and timestamp.
    pub fn new(config: &KnnConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
        }
    }
}

/// Save a model and its metadata into `model_dir`.
pub fn save_model<U, I>(model_dir: &Path, metadata: &ModelMetadata, model: &ItemItemModel<U, I>) -> Result<()>
where
    U: Key + Serialize,
    I: Key + Serialize,
{
    std::fs::create_dir_all(model_dir)
        .with_context(|| format!("Failed to create model directory {}", model_dir.display()))?;

    let meta_file = File::create(model_dir.join(METADATA_FILE)).context("Failed to create metadata file")?;
    serde_json::to_writer_pretty(meta_file, metadata)?;

    let model_file = File::create(model_dir.join(MODEL_FILE)).context("Failed to create model file")?;
    let mut writer = BufWriter::new(model_file);
    bincode::serialize_into(&mut writer, model)?;
    writer.flush().context("Failed to flush model file")?;

    Ok(())
}

/// Load a model and its metadata from `model_dir`.
pub fn load_model<U, I>(model_dir: &Path) -> Result<(ModelMetadata, ItemItemModel<U, I>)>
where
    U: Key + DeserializeOwned,
    I: Key + DeserializeOwned,
{
    let meta_file = File::open(model_dir.join(METADATA_FILE)).context("Failed to open metadata file")?;
    let metadata: ModelMetadata = serde_json::from_reader(meta_file)?;

    let model_bytes = std::fs::read(model_dir.join(MODEL_FILE)).context("Failed to read model file")?;
    let model: ItemItemModel<U, I> = bincode::deserialize(&model_bytes).context("Corrupt model file")?;

    Ok((metadata, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TrainingPipeline;

    #[test]
    fn model_file_holds_every_serialized_byte() {
        let config = KnnConfig::default();
        let ratings = [("u1", "a", 4.0), ("u2", "a", 2.0), ("u1", "c", 5.0), ("u2", "c", 1.0)]
            .map(|(u, i, r)| (u.to_string(), i.to_string(), r));
        let model: ItemItemModel<String, String> = TrainingPipeline::new(config.clone()).train(ratings).unwrap();

        let dir = tempfile::tempdir().unwrap();
        save_model(dir.path(), &ModelMetadata::new(&config), &model).unwrap();

        let written = std::fs::metadata(dir.path().join(MODEL_FILE)).unwrap().len();
        assert_eq!(written, bincode::serialized_size(&model).unwrap());

        let (_, loaded): (_, ItemItemModel<String, String>) = load_model(dir.path()).unwrap();
        assert_eq!(loaded.stats(), model.stats());
    }
}
