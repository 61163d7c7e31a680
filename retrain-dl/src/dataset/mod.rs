//! Dataset discovery and deterministic train/validation splitting.

mod image_list;
mod partition;
mod utils;

pub use image_list::*;
pub use partition::*;
pub use utils::*;
