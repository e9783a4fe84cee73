//! # Search Commands
//!
//! A CLI query behaves like a single keystroke: it enters the debounce
//! window, and the command waits on the phase channel until the
//! computation settles.
//!
//! ```text
//! set_query ──► Debouncing ──(300 ms)──► Loading ──► Settled ──► respond
//!      │
//!      └── blank ──► Idle ──► respond immediately
//! ```

use serde::Serialize;
use storefront_state::{SearchPhase, SearchSnapshot, SearchStore, StoreOrchestrator};
use tracing::debug;

use super::persist_warning;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Absent for commands that only touch the recent log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSnapshot>,

    /// Newest first.
    pub recent: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_warning: Option<String>,
}

impl SearchResponse {
    fn recent_only(search: &SearchStore) -> Self {
        SearchResponse {
            search: None,
            recent: search.recent_searches(),
            persist_warning: persist_warning(search.last_persist_error()),
        }
    }
}

/// Runs a query through the debounce and waits for it to settle.
pub async fn run_search(
    orchestrator: &StoreOrchestrator,
    query: &str,
) -> Result<SearchResponse, ApiError> {
    debug!(query = %query, "run_search command");
    let search = orchestrator.search();
    let mut phases = search.subscribe();

    search.set_query(query);
    if search.phase() != SearchPhase::Idle {
        phases
            .wait_for(|phase| *phase == SearchPhase::Settled)
            .await
            .map_err(|_| ApiError::internal("Search store dropped before settling"))?;
    }

    Ok(SearchResponse {
        search: Some(search.snapshot()),
        ..SearchResponse::recent_only(search)
    })
}

pub fn recent_searches(orchestrator: &StoreOrchestrator) -> SearchResponse {
    debug!("recent_searches command");
    SearchResponse::recent_only(orchestrator.search())
}

pub fn clear_recent_searches(orchestrator: &StoreOrchestrator) -> SearchResponse {
    debug!("clear_recent_searches command");
    let search = orchestrator.search();
    search.clear_recent_searches();
    SearchResponse::recent_only(search)
}

pub fn forget_recent_search(orchestrator: &StoreOrchestrator, query: &str) -> SearchResponse {
    debug!(query = %query, "forget_recent_search command");
    let search = orchestrator.search();
    search.remove_recent_search(query);
    SearchResponse::recent_only(search)
}
