use super::{is_validation, MAX_IMAGES_PER_CLASS};
use crate::common::*;

/// The set of file extensions accepted as images. Matching is case-sensitive.
pub const VALID_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "JPG", "JPEG"];

/// The subset of a class an image is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Training,
    Validation,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Validation => "validation",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let category = match text {
            "training" => Self::Training,
            "validation" => Self::Validation,
            _ => bail!(
                "invalid category '{}'; expected 'training' or 'validation'",
                text
            ),
        };
        Ok(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The indexed image files of one class directory.
///
/// The record is immutable after indexing. File names are bare names
/// relative to `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    /// The raw subdirectory name the class was discovered under.
    pub dir: String,
    pub training: Vec<String>,
    pub validation: Vec<String>,
}

impl ClassRecord {
    pub fn files(&self, category: Category) -> &[String] {
        match category {
            Category::Training => &self.training,
            Category::Validation => &self.validation,
        }
    }
}

/// The per-class train/validation split of an image directory tree.
///
/// Keys are normalized labels in ascending order; values keep the file names
/// assigned to each subset. The split of a file depends only on its bare
/// name, never on the run, the machine, or enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLists {
    classes: IndexMap<String, ClassRecord>,
}

impl ImageLists {
    /// Walks the immediate subdirectories of `image_dir` and splits each
    /// class's images into training and validation subsets.
    ///
    /// Class directories without any accepted image file are skipped with a
    /// warning. The filesystem is never modified.
    pub fn index(image_dir: impl AsRef<Path>, validation_pct: f64) -> Result<Self> {
        let image_dir = image_dir.as_ref();
        ensure!(
            image_dir.is_dir(),
            "image directory '{}' not found",
            image_dir.display()
        );
        ensure!(
            (0.0..=100.0).contains(&validation_pct),
            "validation percentage {} is out of the 0-100 range",
            validation_pct
        );

        let mut sub_dirs: Vec<_> = fs::read_dir(image_dir)
            .with_context(|| format!("failed to list '{}'", image_dir.display()))?
            .map(|entry| Ok(entry?.path()))
            .filter_ok(|path| path.is_dir())
            .try_collect::<_, Vec<_>, Error>()?;
        sub_dirs.sort();

        let mut classes = IndexMap::new();

        for sub_dir in sub_dirs {
            let dir_name = match sub_dir.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_owned(),
                None => {
                    warn!("skip non-unicode directory '{}'", sub_dir.display());
                    continue;
                }
            };

            let file_names = list_image_files(&sub_dir)?;
            if file_names.is_empty() {
                warn!("no image files found in '{}'", sub_dir.display());
                continue;
            }
            if file_names.len() < 20 {
                warn!(
                    "class directory '{}' has less than 20 images, which may cause issues",
                    dir_name
                );
            } else if file_names.len() > MAX_IMAGES_PER_CLASS {
                warn!(
                    "class directory '{}' has more than {} images; some images will never be selected",
                    dir_name, MAX_IMAGES_PER_CLASS
                );
            }

            let label = normalize_label(&dir_name);
            let mut training = vec![];
            let mut validation = vec![];
            for file_name in file_names {
                if is_validation(&file_name, validation_pct) {
                    validation.push(file_name);
                } else {
                    training.push(file_name);
                }
            }

            classes.insert(
                label,
                ClassRecord {
                    dir: dir_name,
                    training,
                    validation,
                },
            );
        }

        classes.sort_keys();
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &IndexMap<String, ClassRecord> {
        &self.classes
    }

    pub fn get(&self, label: &str) -> Option<&ClassRecord> {
        self.classes.get(label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The number of files assigned to `category` across all classes.
    pub fn num_files(&self, category: Category) -> usize {
        self.classes
            .values()
            .map(|record| record.files(category).len())
            .sum()
    }

    /// Resolves the path of the `index`-th image of a label and category.
    ///
    /// `index` is taken modulo the number of files in the category, so it can
    /// be arbitrarily large.
    pub fn image_path(
        &self,
        label: &str,
        index: usize,
        image_dir: impl AsRef<Path>,
        category: Category,
    ) -> Result<PathBuf> {
        let record = self
            .classes
            .get(label)
            .ok_or_else(|| format_err!("label '{}' does not exist", label))?;
        let files = record.files(category);
        ensure!(
            !files.is_empty(),
            "label '{}' has no images in the category '{}'",
            label,
            category
        );
        let file_name = &files[index % files.len()];
        Ok(image_dir.as_ref().join(&record.dir).join(file_name))
    }
}

/// Lists the accepted image files directly under `dir`, deduplicated and
/// sorted by name.
fn list_image_files(dir: &Path) -> Result<Vec<String>> {
    let mut file_names = IndexSet::new();

    for extension in VALID_IMAGE_EXTENSIONS {
        let pattern = format!("{}/*.{}", dir.display(), extension);
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                file_names.insert(name.to_owned());
            }
        }
    }

    let mut file_names: Vec<_> = file_names.into_iter().collect();
    file_names.sort();
    Ok(file_names)
}

/// Normalizes a directory name into a class label: lowercase with every run
/// of non-alphanumeric characters collapsed to a single space.
pub fn normalize_label(dir_name: &str) -> String {
    static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
    NON_ALPHANUMERIC
        .replace_all(&dir_name.to_lowercase(), " ")
        .into_owned()
}
