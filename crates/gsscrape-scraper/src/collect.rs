//! The collection loop: page iteration, deduplication and stop policy.
//!
//! Pages are requested sequentially starting at page 1. The listing API has
//! no "has more" flag, so the first page that yields zero records is taken as
//! the end of the data, even if the emptiness was transient.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use gsscrape_core::Record;

use crate::error::ScraperError;

/// First page index; the listing API is 1-based.
pub const FIRST_PAGE: u32 = 1;

/// One page request. Only `page` changes between calls within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// A source of listing pages. [`crate::PageClient`] is the HTTP
/// implementation.
pub trait PageSource {
    /// Returns the valid records on one page, possibly none.
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Record>, ScraperError>> + Send;
}

/// Insertion-ordered set of records keyed by id. The first record seen for an
/// id is kept; later duplicates are ignored.
#[derive(Debug, Default)]
pub struct Collection {
    records: Vec<Record>,
    seen: HashSet<String>,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` unless its id is already present. Returns whether it
    /// was inserted.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.seen.contains(&record.id) {
            return false;
        }
        self.seen.insert(record.id.clone());
        self.records.push(record);
        true
    }

    /// Inserts every record first-seen-wins and returns how many were new.
    pub fn extend<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        records
            .into_iter()
            .map(|record| usize::from(self.insert(record)))
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Finalizes the collection into records in first-seen order.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Number of unique records to collect. Checked between pages, so the
    /// result can overshoot by up to one page.
    pub target_count: usize,
    pub page_size: u32,
    /// Pause between consecutive page requests.
    pub delay: Duration,
    /// Optional hard cap on the number of pages requested.
    pub max_pages: Option<u32>,
}

/// Why the collection loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    /// A page yielded zero records.
    Exhausted,
    PageLimit,
}

#[derive(Debug)]
pub struct CollectionOutcome {
    pub records: Vec<Record>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

/// Collects unique records from `source` until `target_count` is reached,
/// a page comes back empty, or `max_pages` pages have been requested.
///
/// **All-or-nothing semantics**: any fetch error aborts the run and the
/// records gathered so far are discarded.
///
/// # Errors
///
/// Propagates the first error returned by [`PageSource::fetch_page`].
pub async fn collect_records<S>(
    source: &S,
    options: &CollectOptions,
) -> Result<CollectionOutcome, ScraperError>
where
    S: PageSource,
{
    let mut collection = Collection::new();
    let mut page = FIRST_PAGE;
    let mut pages_fetched = 0u32;

    let stop_reason = loop {
        if let Some(reason) = stop_before_fetch(&collection, pages_fetched, options) {
            break reason;
        }

        let records = source
            .fetch_page(PageRequest {
                page,
                page_size: options.page_size,
            })
            .await?;
        pages_fetched += 1;

        if records.is_empty() {
            tracing::info!(page, "no records returned; stopping");
            break StopReason::Exhausted;
        }

        let added = collection.extend(records);
        tracing::info!(
            page,
            added,
            collected = collection.len(),
            target = options.target_count,
            "collected records"
        );

        page = page.saturating_add(1);

        if !options.delay.is_zero()
            && stop_before_fetch(&collection, pages_fetched, options).is_none()
        {
            tokio::time::sleep(options.delay).await;
        }
    };

    if stop_reason == StopReason::PageLimit {
        tracing::warn!(
            pages_fetched,
            collected = collection.len(),
            target = options.target_count,
            "page limit reached before target"
        );
    }

    Ok(CollectionOutcome {
        records: collection.into_records(),
        pages_fetched,
        stop_reason,
    })
}

/// Stop conditions that are checked before each request.
fn stop_before_fetch(
    collection: &Collection,
    pages_fetched: u32,
    options: &CollectOptions,
) -> Option<StopReason> {
    if collection.len() >= options.target_count {
        return Some(StopReason::TargetReached);
    }
    if options.max_pages.is_some_and(|max| pages_fetched >= max) {
        return Some(StopReason::PageLimit);
    }
    None
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
