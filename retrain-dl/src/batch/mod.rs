//! Batched sample serving with thread-safe index allocation.

mod iterator;
mod label;
mod sampler;

pub use iterator::*;
pub use label::*;
pub use sampler::*;
