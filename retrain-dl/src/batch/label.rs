use crate::common::*;

/// How batch labels are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// One-hot vectors, one row per sample.
    Categorical,
    /// Class indexes cast to float. Meaningful only with exactly two
    /// classes; the caller is responsible for that.
    Binary,
    /// Raw integer class indexes.
    Sparse,
    /// No labels; batches carry images only.
    None,
}

impl FromStr for LabelMode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mode = match text {
            "categorical" => Self::Categorical,
            "binary" => Self::Binary,
            "sparse" => Self::Sparse,
            "none" => Self::None,
            _ => bail!(
                "invalid label mode '{}'; expected one of 'categorical', 'binary', 'sparse', 'none'",
                text
            ),
        };
        Ok(mode)
    }
}

/// Encoded labels of one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    Categorical(Array2<f32>),
    Binary(Array1<f32>),
    Sparse(Array1<i64>),
}

/// Encodes the class indexes of one batch per `mode`. Returns `None` in
/// image-only mode.
pub fn encode_labels(mode: LabelMode, classes: &[usize], num_classes: usize) -> Option<Labels> {
    let labels = match mode {
        LabelMode::Categorical => {
            let mut one_hot = Array2::zeros((classes.len(), num_classes));
            for (row, &class) in classes.iter().enumerate() {
                one_hot[(row, class)] = 1.0;
            }
            Labels::Categorical(one_hot)
        }
        LabelMode::Binary => {
            Labels::Binary(classes.iter().map(|&class| class as f32).collect())
        }
        LabelMode::Sparse => Labels::Sparse(classes.iter().map(|&class| class as i64).collect()),
        LabelMode::None => return None,
    };
    Some(labels)
}
