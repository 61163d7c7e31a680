use crate::common::*;
use image::{imageops::FilterType, DynamicImage};

/// Color mode images are decoded in. Explicit at construction; there is no
/// global backend lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Rgb,
    Grayscale,
}

impl ColorMode {
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Grayscale => 1,
        }
    }
}

impl FromStr for ColorMode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mode = match text {
            "rgb" => Self::Rgb,
            "grayscale" => Self::Grayscale,
            _ => bail!(
                "invalid color mode '{}'; expected 'rgb' or 'grayscale'",
                text
            ),
        };
        Ok(mode)
    }
}

/// Loads images from disk as `(height, width, channels)` float arrays at a
/// fixed target size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoader {
    target_size: (usize, usize),
    color_mode: ColorMode,
}

impl ImageLoader {
    pub fn new(target_size: (usize, usize), color_mode: ColorMode) -> Result<Self> {
        let (height, width) = target_size;
        ensure!(
            height > 0 && width > 0,
            "target size {}x{} must be positive",
            height,
            width
        );
        Ok(Self {
            target_size,
            color_mode,
        })
    }

    pub fn target_size(&self) -> (usize, usize) {
        self.target_size
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// The `(height, width, channels)` shape of every loaded image.
    pub fn image_shape(&self) -> (usize, usize, usize) {
        let (height, width) = self.target_size;
        (height, width, self.color_mode.channels())
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Array3<f32>> {
        let path = path.as_ref();
        let (height, width) = self.target_size;

        let img = image::open(path)
            .with_context(|| format!("failed to load image file '{}'", path.display()))?
            .resize_exact(width as u32, height as u32, FilterType::Triangle);

        let pixels = match self.color_mode {
            ColorMode::Rgb => {
                let buffer = img.to_rgb8();
                Array3::from_shape_vec((height, width, 3), buffer.into_raw())?
            }
            ColorMode::Grayscale => {
                let buffer = match img {
                    DynamicImage::ImageLuma8(buffer) => buffer,
                    other => other.to_luma8(),
                };
                Array3::from_shape_vec((height, width, 1), buffer.into_raw())?
            }
        };

        Ok(pixels.mapv(f32::from))
    }
}
