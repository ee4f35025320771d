//! Result accumulation and pagination state machine.
//!
//! [`SearchState`] holds everything the interface renders: committed filters,
//! held results, loading and error flags. Transitions are plain methods; the
//! network call happens between [`SearchState::begin_search`] (or
//! [`SearchState::load_more`]) and [`SearchState::complete`], driven by
//! whoever owns the state.

use crate::error::ApiError;
use crate::types::{RedditItem, SearchFilters, SearchResponse, DEFAULT_PAGE_SIZE};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// An issued request, handed back to [`SearchState::complete`] with its
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    /// Filters committed once the request succeeds.
    pub filters: SearchFilters,
    /// Escalated page size sent in place of `filters.size`.
    pub size: u32,
}

impl SearchRequest {
    /// Filters as they go over the wire.
    pub fn outgoing(&self) -> SearchFilters {
        SearchFilters {
            size: self.size,
            ..self.filters.clone()
        }
    }

    pub fn replaces_results(&self) -> bool {
        self.filters.page == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Results were replaced or extended.
    Applied { added: usize },
    /// The request failed; held results are untouched.
    Failed,
    /// A newer request was issued after this one; the outcome was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    filters: SearchFilters,
    results: Vec<RedditItem>,
    loading: bool,
    error: Option<String>,
    api_url: Option<String>,
    total_results: Option<u64>,
    current_size: u32,
    page_size: u32,
    generation: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SearchState {
    pub fn new(page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            filters: SearchFilters {
                size: page_size,
                ..Default::default()
            },
            results: Vec::new(),
            loading: false,
            error: None,
            api_url: None,
            total_results: None,
            current_size: page_size,
            page_size,
            generation: 0,
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn results(&self) -> &[RedditItem] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    pub fn current_size(&self) -> u32 {
        self.current_size
    }

    pub fn has_more(&self) -> bool {
        matches!(self.total_results, Some(total) if (self.results.len() as u64) < total)
    }

    /// Starts a search. A change to anything but the page drops held
    /// results and starts over at page 1 with the base page size.
    pub fn begin_search(&mut self, mut filters: SearchFilters) -> SearchRequest {
        self.loading = true;
        self.error = None;

        if !filters.same_context(&self.filters) {
            debug!("Search context changed, clearing {} results", self.results.len());
            self.results.clear();
            self.total_results = None;
            self.current_size = self.page_size;
            filters.page = 1;
        }

        self.generation += 1;
        let request = SearchRequest {
            generation: self.generation,
            filters,
            size: self.current_size,
        };
        info!(
            "Search #{} for {:?}: page {}, size {}",
            request.generation, request.filters.query, request.filters.page, request.size
        );
        request
    }

    /// Requests the next page, growing the page size by one step.
    ///
    /// Returns `None` while a request is in flight, before anything is held,
    /// or once every reported result is held.
    pub fn load_more(&mut self) -> Option<SearchRequest> {
        if self.loading || self.results.is_empty() || !self.has_more() {
            debug!(
                "Load more ignored (loading: {}, held: {}, total: {:?})",
                self.loading,
                self.results.len(),
                self.total_results
            );
            return None;
        }

        self.current_size += self.page_size;
        let next = self.filters.with_page(self.filters.page + 1);
        Some(self.begin_search(next))
    }

    /// Records the URL actually requested for `request`.
    pub fn record_api_url(&mut self, request: &SearchRequest, url: String) {
        if request.generation == self.generation {
            self.api_url = Some(url);
        }
    }

    pub fn complete(
        &mut self,
        request: SearchRequest,
        outcome: Result<SearchResponse, ApiError>,
    ) -> Completion {
        if request.generation != self.generation {
            debug!(
                "Dropping outcome of search #{} superseded by #{}",
                request.generation, self.generation
            );
            return Completion::Stale;
        }
        self.loading = false;

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!("Search #{} failed: {}", request.generation, e);
                self.error = Some(e.message());
                return Completion::Failed;
            }
        };

        let reported = response.reported_total();
        let held_before = if request.replaces_results() {
            self.results.clear();
            0
        } else {
            self.results.len()
        };
        self.append(response.data);

        // Only a reported total may trim, and never below what was already held.
        let total = match reported {
            Some(reported) => {
                let total = reported.max(held_before as u64);
                let cap = usize::try_from(total).unwrap_or(usize::MAX);
                if self.results.len() > cap {
                    debug!("Trimming held results from {} to {}", self.results.len(), cap);
                    self.results.truncate(cap);
                }
                total
            }
            None if request.replaces_results() => self.results.len() as u64,
            None => self
                .total_results
                .unwrap_or(0)
                .max(self.results.len() as u64),
        };

        self.total_results = Some(total);
        self.filters = request.filters;
        info!(
            "Search #{} holds {} of {} results",
            request.generation,
            self.results.len(),
            total
        );
        Completion::Applied {
            added: self.results.len().saturating_sub(held_before),
        }
    }

    // Size escalation can return items already held; those are skipped.
    fn append(&mut self, items: Vec<RedditItem>) {
        let mut seen: HashSet<String> = self.results.iter().map(|item| item.id.clone()).collect();
        let before = self.results.len();
        let offered = items.len();

        for item in items {
            if seen.insert(item.id.clone()) {
                self.results.push(item);
            }
        }

        let added = self.results.len() - before;
        if added < offered {
            warn!("Skipped {} duplicate results", offered - added);
        }
    }
}
