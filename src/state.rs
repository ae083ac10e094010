//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::config::OptimizationConfig;

/// Message shown for any catalog failure, whatever the underlying cause
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch Pokemon data. Please try again later.";

/// Spinner cadence while the catalog is loading.
pub const LOADING_TICK_MS: u64 = 120;

/// UI-ready projection of one Pokemon detail resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayRecord {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
}

/// Every record from one fetch cycle plus the number of HTTP requests it took
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FetchResult {
    pub records: Vec<DisplayRecord>,
    pub request_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FetchSource {
    Network,
    Cache,
}

/// What a single catalog fetch produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FetchOutcome {
    pub result: FetchResult,
    pub source: FetchSource,
}

impl FetchOutcome {
    pub fn network(result: FetchResult) -> Self {
        Self {
            result,
            source: FetchSource::Network,
        }
    }

    pub fn cached(result: FetchResult) -> Self {
        Self {
            result,
            source: FetchSource::Cache,
        }
    }

    /// Requests this outcome actually sent over the wire
    pub fn requests_issued(&self) -> u32 {
        match self.source {
            FetchSource::Network => self.result.request_count,
            FetchSource::Cache => 0,
        }
    }
}

/// Sort order for the catalog grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortKey {
    #[default]
    Id,
    Name,
}

impl SortKey {
    pub fn toggle(&self) -> Self {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name => SortKey::Id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "Sort by Pokedex Number",
            SortKey::Name => "Sort by Name",
        }
    }
}

/// Running totals shown in the header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FetchStats {
    /// Catalog fetches issued, cache hits included
    pub fetch_calls: u32,
    /// HTTP requests sent across all accepted fetches
    pub request_count: u32,
}

impl FetchStats {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.request_count = self.request_count.saturating_add(outcome.requests_issued());
    }
}

/// Externally observed lifecycle of the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Ready,
    Failed,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Base record set: Empty → Loading → Loaded/Failed
    #[debug(section = "Catalog", label = "Records", debug_fmt)]
    pub catalog: DataResource<Vec<DisplayRecord>>,

    /// Filtered and sorted copy of the base records
    #[debug(skip)]
    pub visible: Vec<DisplayRecord>,

    #[debug(section = "View", label = "Search")]
    pub search_term: String,

    #[debug(section = "View", label = "Sort", debug_fmt)]
    pub sort_key: SortKey,

    #[debug(section = "View", label = "Search focused")]
    pub search_active: bool,

    /// First grid row on screen
    #[debug(section = "View", label = "Scroll")]
    pub scroll: usize,

    /// Tiles per grid row at the current terminal width
    #[debug(section = "View", label = "Grid columns")]
    pub grid_columns: usize,

    #[debug(section = "Stats", label = "Fetches", debug_fmt)]
    pub stats: FetchStats,

    #[debug(section = "Stats", label = "Optimizations", debug_fmt)]
    pub optimizations: OptimizationConfig,

    /// Latest issued fetch; completions for any other id are stale
    #[debug(section = "Sequencing", label = "Request id")]
    pub latest_request_id: u64,

    /// Latest derivation ticket; a debounced derivation only runs if it still matches
    #[debug(section = "Sequencing", label = "Derive ticket")]
    pub derive_ticket: u64,

    /// Last swallowed background refresh failure
    #[debug(section = "Sequencing", label = "Refresh error", debug_fmt)]
    pub refresh_error: Option<String>,

    #[debug(skip)]
    pub tick: u32,
}

impl AppState {
    pub fn new(optimizations: OptimizationConfig) -> Self {
        Self {
            catalog: DataResource::Empty,
            visible: Vec::new(),
            search_term: String::new(),
            sort_key: SortKey::default(),
            search_active: false,
            scroll: 0,
            grid_columns: 1,
            stats: FetchStats::default(),
            optimizations,
            latest_request_id: 0,
            derive_ticket: 0,
            refresh_error: None,
            tick: 0,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        match &self.catalog {
            DataResource::Empty | DataResource::Loading => ViewPhase::Loading,
            DataResource::Loaded(_) => ViewPhase::Ready,
            DataResource::Failed(_) => ViewPhase::Failed,
        }
    }

    /// Last grid row that can be scrolled to
    pub fn max_scroll_row(&self) -> usize {
        self.visible
            .len()
            .div_ceil(self.grid_columns.max(1))
            .saturating_sub(1)
    }

    pub fn base_records(&self) -> &[DisplayRecord] {
        self.catalog.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Issue a new request id, superseding every fetch still in flight
    pub fn next_request_id(&mut self) -> u64 {
        self.latest_request_id = self.latest_request_id.wrapping_add(1);
        self.latest_request_id
    }

    /// Issue a new derivation ticket, canceling any pending debounced derivation
    pub fn next_derive_ticket(&mut self) -> u64 {
        self.derive_ticket = self.derive_ticket.wrapping_add(1);
        self.derive_ticket
    }

    pub fn is_current_request(&self, request_id: u64) -> bool {
        request_id == self.latest_request_id
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(OptimizationConfig::default())
    }
}
