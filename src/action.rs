//! Actions: user intents, async results, and timer signals

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{FetchOutcome, SortKey};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Catalog category =====
    /// Intent: load the base record set (dispatched on mount)
    CatalogFetch,

    /// Intent: restart the pipeline after a failure
    CatalogRetry,

    /// Result: initial load finished
    CatalogDidLoad { request_id: u64, outcome: FetchOutcome },

    /// Result: initial load failed
    CatalogDidError { request_id: u64, error: String },

    /// Result: re-derivation fetch finished
    CatalogDidRefresh { request_id: u64, outcome: FetchOutcome },

    /// Result: re-derivation fetch failed (logged, never surfaced as a failure)
    CatalogRefreshDidError { request_id: u64, error: String },

    // ===== Search category =====
    /// Focus the search input
    SearchFocus,

    /// Leave the search input, keeping the term
    SearchBlur,

    /// Search text changed
    SearchTermChange(String),

    // ===== Sort category =====
    SortSet(SortKey),

    SortToggle,

    // ===== Derive category =====
    /// Debounce timer fired for the given ticket
    DeriveDue(u64),

    // ===== Grid category =====
    /// Scroll the grid by whole rows
    GridScroll(i16),

    /// Terminal width changed; tiles per row
    GridResize(usize),

    // ===== Uncategorized (global) =====
    /// Force a re-render (cursor movement etc.)
    Render,

    /// Spinner frame while loading
    Tick,

    Quit,
}
