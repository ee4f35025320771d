//! Async driver for [`SearchState`].
//!
//! A session owns the state machine and a backend, runs one request at a
//! time and publishes a snapshot of the state on a watch channel whenever it
//! changes.

use crate::api::PullPushClient;
use pullsearch_core::{ApiError, Completion, SearchFilters, SearchRequest, SearchResponse, SearchState};
use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

/// Anything that can answer a search.
pub trait SearchBackend {
    fn search(
        &self,
        filters: &SearchFilters,
    ) -> impl Future<Output = Result<SearchResponse, ApiError>> + Send;

    /// URL shown to the user for `filters`, if the backend has one.
    fn request_url(&self, filters: &SearchFilters) -> Option<String>;
}

impl SearchBackend for PullPushClient {
    fn search(
        &self,
        filters: &SearchFilters,
    ) -> impl Future<Output = Result<SearchResponse, ApiError>> + Send {
        PullPushClient::search(self, filters)
    }

    fn request_url(&self, filters: &SearchFilters) -> Option<String> {
        PullPushClient::request_url(self, filters)
            .ok()
            .map(String::from)
    }
}

pub struct SearchSession<B> {
    backend: B,
    state: SearchState,
    updates: watch::Sender<SearchState>,
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(backend: B, page_size: u32) -> Self {
        let state = SearchState::new(page_size);
        let (updates, _) = watch::channel(state.clone());
        Self {
            backend,
            state,
            updates,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Receives every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.updates.subscribe()
    }

    pub async fn search(&mut self, filters: SearchFilters) -> Completion {
        let request = self.state.begin_search(filters);
        self.run(request).await
    }

    /// Fetches the next page, or returns `None` when nothing more may be
    /// requested right now.
    pub async fn load_more(&mut self) -> Option<Completion> {
        let request = self.state.load_more()?;
        Some(self.run(request).await)
    }

    async fn run(&mut self, request: SearchRequest) -> Completion {
        let outgoing = request.outgoing();
        if let Some(url) = self.backend.request_url(&outgoing) {
            self.state.record_api_url(&request, url);
        }
        self.publish();

        let outcome = self.backend.search(&outgoing).await;
        let completion = self.state.complete(request, outcome);
        debug!("Search completed: {:?}", completion);
        self.publish();
        completion
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }
}
