use crate::common::*;

/// A pixel-array to pixel-array function, used for both random augmentation
/// and normalization. Supplied by the caller; the batching code never assumes
/// a particular augmentation backend.
pub type SampleFn = Arc<dyn Fn(Array3<f32>) -> Array3<f32> + Send + Sync>;

/// Maps 0-255 pixel values into the -1.0 to 1.0 range.
pub fn symmetric_unit_scale() -> SampleFn {
    Arc::new(|pixels| pixels.mapv(|value| (value / 255.0 - 0.5) * 2.0))
}
