//! Preparation tool configuration format.

use anyhow::Result;
use retrain_dl::{
    batch::LabelMode,
    config::RunConfig,
    processor::ColorMode,
    schedule::WarmupSchedule,
};
use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, path::Path, path::PathBuf};

/// The main tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scope: String,
    pub dataset: DatasetConfig,
    pub training: WarmupSchedule,
}

/// Dataset options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub image_dir: PathBuf,
    pub validation_pct: f64,
    pub image_height: NonZeroUsize,
    pub image_width: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    pub color_mode: ColorMode,
    pub label_mode: LabelMode,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    /// The identifier-bearing view of this configuration.
    pub fn run_config(&self) -> RunConfig {
        let dataset = RunConfig::new()
            .with("batch_size", self.dataset.batch_size.get())
            .with(
                "image_size",
                vec![
                    self.dataset.image_height.get(),
                    self.dataset.image_width.get(),
                ],
            )
            .with("validation_pct", self.dataset.validation_pct);
        let training = RunConfig::new()
            .with("epochs", self.training.epochs.get())
            .with("lr_max", self.training.lr_max.raw())
            .with("lr_min", self.training.lr_min.raw());

        RunConfig::scoped(&self.scope)
            .with("dataset", dataset)
            .with("training", training)
    }
}
