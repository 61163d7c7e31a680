//! Error-swallowing wrapper for long-running batch consumers.

use crate::common::*;

/// Wraps a fallible producer into a sequence that survives failed pulls.
///
/// Each error is logged and skipped, so a transient I/O failure never
/// terminates a long-running consumer. The sequence only ends when the
/// underlying producer does.
#[derive(Debug, Clone)]
pub struct Resilient<I> {
    inner: I,
    skipped: usize,
}

impl<I> Resilient<I> {
    pub fn new(inner: I) -> Self {
        Self { inner, skipped: 0 }
    }

    /// The number of failed pulls skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I, T> Iterator for Resilient<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next() {
                Some(Ok(item)) => return Some(item),
                Some(Err(err)) => {
                    self.skipped += 1;
                    warn!("failed to produce an item, skipping: {:#}", err);
                }
                None => return None,
            }
        }
    }
}
