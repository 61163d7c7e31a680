use super::{encode_labels, BatchIndexes, IndexSampler, LabelMode, Labels};
use crate::{
    common::*,
    dataset::{Category, ImageLists},
    processor::{ColorMode, ImageLoader, SampleFn, SampleSaver, SaveSamplesConfig},
};
use derivative::Derivative;

/// One produced batch: an NHWC image tensor plus its label encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub images: Array4<f32>,
    pub labels: Option<Labels>,
    pub epoch: usize,
}

/// `BatchIterator` construction options.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct BatchIteratorInit {
    pub image_dir: PathBuf,
    pub target_size: (usize, usize),
    pub color_mode: ColorMode,
    pub label_mode: LabelMode,
    pub batch_size: usize,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub save_samples: Option<SaveSamplesConfig>,
    /// Random augmentation hook, applied before normalization.
    #[derivative(Debug = "ignore")]
    pub transform: Option<SampleFn>,
    #[derivative(Debug = "ignore")]
    pub normalize: Option<SampleFn>,
}

impl BatchIteratorInit {
    pub fn new(image_dir: impl Into<PathBuf>, target_size: (usize, usize)) -> Self {
        Self {
            image_dir: image_dir.into(),
            target_size,
            color_mode: ColorMode::Rgb,
            label_mode: LabelMode::Categorical,
            batch_size: 32,
            shuffle: true,
            seed: None,
            save_samples: None,
            transform: None,
            normalize: None,
        }
    }

    /// Builds an iterator over one category of an indexed dataset.
    ///
    /// Flattens the category's files into `(path, class index)` pairs with
    /// classes in ascending label order and per-class file order preserved.
    pub fn build(self, image_lists: &ImageLists, category: Category) -> Result<BatchIterator> {
        let Self {
            image_dir,
            target_size,
            color_mode,
            label_mode,
            batch_size,
            shuffle,
            seed,
            save_samples,
            transform,
            normalize,
        } = self;

        let num_classes = image_lists.len();
        ensure!(num_classes > 0, "the dataset index has no classes");

        let mut samples = vec![];
        for (class_index, (label, record)) in image_lists.classes().iter().enumerate() {
            for file_name in record.files(category) {
                let path = image_dir.join(&record.dir).join(file_name);
                samples.push(Sample {
                    path,
                    class: class_index,
                });
            }
            if record.files(category).is_empty() {
                warn!("label '{}' has no images in the category '{}'", label, category);
            }
        }
        ensure!(
            !samples.is_empty(),
            "the category '{}' has no images",
            category
        );
        info!("found {} {} files", samples.len(), category);

        let sampler = IndexSampler::new(samples.len(), batch_size, shuffle, seed)?;
        let loader = ImageLoader::new(target_size, color_mode)?;
        let saver = save_samples.map(SampleSaver::new).transpose()?;

        Ok(BatchIterator {
            samples,
            num_classes,
            category,
            label_mode,
            sampler,
            loader,
            saver,
            transform,
            normalize,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Sample {
    path: PathBuf,
    class: usize,
}

/// A restartable, endless source of shuffled image batches.
///
/// `next_batch` may be called from several threads on one shared iterator:
/// index allocation is exclusive inside the sampler, while image decoding,
/// augmentation, and normalization run outside of any lock so threads decode
/// in parallel into their own batch buffers.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct BatchIterator {
    samples: Vec<Sample>,
    num_classes: usize,
    category: Category,
    label_mode: LabelMode,
    sampler: IndexSampler,
    loader: ImageLoader,
    saver: Option<SampleSaver>,
    #[derivative(Debug = "ignore")]
    transform: Option<SampleFn>,
    #[derivative(Debug = "ignore")]
    normalize: Option<SampleFn>,
}

impl BatchIterator {
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn batch_size(&self) -> usize {
        self.sampler.batch_size()
    }

    /// Produces the next batch. Wraps at epoch boundaries and never
    /// exhausts; the final batch of an epoch may be short.
    pub fn next_batch(&self) -> Result<Batch> {
        let BatchIndexes {
            indexes,
            offset,
            epoch,
        } = self.sampler.next_batch();

        // everything below runs without holding the sampler lock
        let (height, width, channels) = self.loader.image_shape();
        let mut images = Array4::zeros((indexes.len(), height, width, channels));
        let mut classes = Vec::with_capacity(indexes.len());

        for (slot, &index) in indexes.iter().enumerate() {
            let Sample { path, class } = &self.samples[index];
            let mut pixels = self.loader.load(path)?;
            if let Some(transform) = &self.transform {
                pixels = transform(pixels);
            }
            if let Some(normalize) = &self.normalize {
                pixels = normalize(pixels);
            }
            ensure!(
                pixels.dim() == (height, width, channels),
                "transform changed the shape of '{}' to {:?}",
                path.display(),
                pixels.dim()
            );
            images.index_axis_mut(Axis(0), slot).assign(&pixels);
            classes.push(*class);
        }

        if let Some(saver) = &self.saver {
            saver.save_batch(&images, offset)?;
        }

        let labels = encode_labels(self.label_mode, &classes, self.num_classes);

        Ok(Batch {
            images,
            labels,
            epoch,
        })
    }

    /// Adapts the iterator into an endless `Iterator` of batch results.
    pub fn batches(self: Arc<Self>) -> Batches {
        Batches { iterator: self }
    }
}

/// An endless `Iterator` adapter over a shared [`BatchIterator`].
#[derive(Debug, Clone)]
pub struct Batches {
    iterator: Arc<BatchIterator>,
}

impl Iterator for Batches {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.iterator.next_batch())
    }
}
