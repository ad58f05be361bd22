use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of posting iterators currently handed out by an index.
#[derive(Debug, Default)]
pub struct OpenPostingsCounter {
    open: AtomicUsize,
}

impl OpenPostingsCounter {
    pub fn acquire(&self) -> OpenPostingHandle<'_> {
        self.open.fetch_add(1, Ordering::AcqRel);
        OpenPostingHandle { counter: self }
    }

    pub fn open(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }
}

/// Held by a posting iterator for its whole life.
#[derive(Debug)]
pub struct OpenPostingHandle<'a> {
    counter: &'a OpenPostingsCounter,
}

impl<'a> Drop for OpenPostingHandle<'a> {
    fn drop(&mut self) {
        // release happens on every exit path, including errors mid-scan
        self.counter.open.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_release_on_drop() {
        let counter = OpenPostingsCounter::default();
        let a = counter.acquire();
        let b = counter.acquire();
        assert_eq!(counter.open(), 2);
        drop(a);
        assert_eq!(counter.open(), 1);
        drop(b);
        assert_eq!(counter.open(), 0);
    }
}
