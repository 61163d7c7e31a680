//! Per-sample image processing: decoding, augmentation hooks, debug dumps.

mod loader;
mod saver;
mod transform;

pub use loader::*;
pub use saver::*;
pub use transform::*;
