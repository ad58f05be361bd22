use std::fmt;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::core::docset::{BitDocIdSet, DocIdSet};
use crate::core::filter::Filter;
use crate::core::index::IndexReader;
use crate::Result;

type CachedDocs = Option<Arc<dyn DocIdSet>>;

/// Remembers the doc set of the wrapped filter for the latest reader content.
///
/// Only one reader version is kept, a new cache key evicts the previous set.
/// Sets that aren't cacheable are copied into a [`BitDocIdSet`] first.
pub struct CachingWrapperFilter {
    filter: Arc<dyn Filter>,
    cache: Mutex<Option<(u64, CachedDocs)>>,
}

impl CachingWrapperFilter {
    pub fn new(filter: Arc<dyn Filter>) -> Self {
        Self { filter, cache: Mutex::new(None) }
    }

    /// Number of reader versions with a cached set, at most one.
    pub fn cached_readers(&self) -> usize {
        usize::from(self.cache.lock().is_some())
    }

    fn cacheable_docs(&self, reader: &dyn IndexReader) -> Result<CachedDocs> {
        let docs = match self.filter.doc_id_set(reader)? {
            Some(docs) => docs,
            None => return Ok(None),
        };
        if docs.is_cacheable() {
            return Ok(Some(docs));
        }
        match docs.iterator()? {
            Some(mut iterator) => {
                let bits = BitDocIdSet::from_iterator(iterator.as_mut(), reader.max_doc())?;
                Ok(Some(Arc::new(bits)))
            }
            None => Ok(None),
        }
    }
}

impl Filter for CachingWrapperFilter {
    fn doc_id_set(&self, reader: &dyn IndexReader) -> Result<Option<Arc<dyn DocIdSet>>> {
        let key = reader.cache_key();
        if let Some((cached_key, cached)) = self.cache.lock().as_ref() {
            if *cached_key == key {
                debug!("filter cache hit for reader {}", key);
                return Ok(cached.clone());
            }
        }
        // computed without holding the lock, a concurrent miss just computes it twice
        let docs = self.cacheable_docs(reader)?;
        if let Some((stale_key, _)) = self.cache.lock().replace((key, docs.clone())) {
            if stale_key != key {
                debug!("filter cache for reader {} replaced by reader {}", stale_key, key);
            }
        }
        Ok(docs)
    }
}

impl fmt::Debug for CachingWrapperFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingWrapperFilter").field("filter", &self.filter).finish()
    }
}

impl fmt::Display for CachingWrapperFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CachingWrapperFilter({})", self.filter)
    }
}
