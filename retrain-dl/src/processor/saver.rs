use crate::common::*;
use image::{GrayImage, RgbImage};

/// Where and how to dump produced batches for visual inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSamplesConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub format: String,
}

/// Writes every image of a batch to disk as
/// `<dir>/<prefix>_<index>_<rand>.<format>`. Diagnostic only; the batch
/// itself is not touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSaver {
    config: SaveSamplesConfig,
}

impl SampleSaver {
    pub fn new(config: SaveSamplesConfig) -> Result<Self> {
        fs::create_dir_all(&config.dir)
            .with_context(|| format!("failed to create '{}'", config.dir.display()))?;
        Ok(Self { config })
    }

    pub fn save_batch(&self, images: &Array4<f32>, batch_offset: usize) -> Result<()> {
        let mut rng = rand::thread_rng();

        for (slot, pixels) in images.axis_iter(Axis(0)).enumerate() {
            let file_name = format!(
                "{}_{}_{}.{}",
                self.config.prefix,
                batch_offset + slot,
                rng.gen_range(0..10000),
                self.config.format
            );
            let path = self.config.dir.join(file_name);

            let (height, width, channels) = pixels.dim();
            // rescale min..max into the displayable 0..255 range
            let min = pixels.fold(f32::INFINITY, |acc, &value| acc.min(value));
            let max = pixels.fold(f32::NEG_INFINITY, |acc, &value| acc.max(value));
            let scale = if max > min { 255.0 / (max - min) } else { 0.0 };
            let bytes: Vec<u8> = pixels
                .iter()
                .map(|&value| ((value - min) * scale).round() as u8)
                .collect();

            match channels {
                3 => {
                    let buffer = RgbImage::from_raw(width as u32, height as u32, bytes)
                        .ok_or_else(|| format_err!("batch slot {} has a malformed shape", slot))?;
                    buffer.save(&path)?;
                }
                1 => {
                    let buffer = GrayImage::from_raw(width as u32, height as u32, bytes)
                        .ok_or_else(|| format_err!("batch slot {} has a malformed shape", slot))?;
                    buffer.save(&path)?;
                }
                _ => bail!("cannot save image with {} channels", channels),
            }
        }

        Ok(())
    }
}
