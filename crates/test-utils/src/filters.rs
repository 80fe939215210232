//! Filter fixtures.

use logflow::filter::Filter;
use logflow::log::Entry;

/// Wraps a filter and counts how many entries a scan handed it.
#[derive(Debug)]
pub struct CountingFilter<F> {
    inner: F,
    tested: usize,
}

impl<F: Filter> CountingFilter<F> {
    pub fn wrap(inner: F) -> Self {
        Self { inner, tested: 0 }
    }

    /// `test` calls since the last reset.
    pub fn tested(&self) -> usize {
        self.tested
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Filter> Filter for CountingFilter<F> {
    fn test(&mut self, entry: &Entry) -> bool {
        self.tested += 1;
        self.inner.test(entry)
    }

    fn complete(&self) -> bool {
        self.inner.complete()
    }

    fn reset(&mut self) {
        self.tested = 0;
        self.inner.reset();
    }
}
