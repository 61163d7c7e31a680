//! Training-data preparation toolkit for image classification.
//!
//! The crate discovers per-class image directories, deterministically splits
//! them into training and validation subsets, and serves shuffled, augmented
//! batches through a thread-safe iterator.

mod common;

pub mod batch;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod processor;
pub mod schedule;
