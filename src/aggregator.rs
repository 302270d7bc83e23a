//! Append-only accumulation of fetched pages.
//!
//! A [`ListAggregator`] owns everything a list screen needs: the records
//! fetched so far, their view-model projections, and the latest pagination
//! cursor. Records keep their first-appearance order — first page first, each
//! subsequent page appended — and nothing is ever removed or reordered.
//!
//! Invariant: `view_models.len() == items.len()` after every apply, with
//! positional 1:1 correspondence. Mapping is infallible (see
//! [`crate::mapper`]), so this holds regardless of data quality.

use crate::mapper::RecordMapper;
use crate::models::{PageEnvelope, PageInfo};

/// Accumulated list state for one entity kind.
pub struct ListAggregator<M: RecordMapper> {
    mapper: M,
    items: Vec<M::Record>,
    view_models: Vec<M::ViewModel>,
    cursor: Option<PageInfo>,
}

impl<M: RecordMapper> ListAggregator<M> {
    pub fn new(mapper: M) -> Self {
        Self {
            mapper,
            items: Vec::new(),
            view_models: Vec::new(),
            cursor: None,
        }
    }

    /// Replace all state with the envelope's records. Only used for the very
    /// first page of a fresh list.
    pub fn apply_first_page(&mut self, envelope: PageEnvelope<M::Record>) {
        self.view_models = self.mapper.map_all(&envelope.results);
        self.items = envelope.results;
        self.cursor = Some(envelope.info);
    }

    /// Append the envelope's records and advance the cursor. An empty
    /// `results` still updates the cursor — the newer `next`/`prev`
    /// supersede the old.
    pub fn apply_next_page(&mut self, envelope: PageEnvelope<M::Record>) {
        self.view_models
            .extend(self.mapper.map_all(&envelope.results));
        self.items.extend(envelope.results);
        self.cursor = Some(envelope.info);
    }

    /// Bounds-checked record lookup; out-of-range returns `None`.
    pub fn item_at(&self, index: usize) -> Option<&M::Record> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[M::Record] {
        &self.items
    }

    pub fn view_models(&self) -> &[M::ViewModel] {
        &self.view_models
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The latest page's pagination metadata, if any page has been applied.
    pub fn cursor(&self) -> Option<&PageInfo> {
        self.cursor.as_ref()
    }

    /// The URL of the next page, if the cursor says one exists.
    pub fn next_page_url(&self) -> Option<&str> {
        self.cursor.as_ref()?.next.as_deref()
    }
}
