//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, FetchOutcome, SortKey, ViewPhase, FETCH_FAILED_MESSAGE};
use crate::view::derive_view;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Catalog actions =====
        Action::CatalogFetch => begin_load(state),

        Action::CatalogRetry => {
            if state.phase() != ViewPhase::Failed {
                return DispatchResult::unchanged();
            }
            begin_load(state)
        }

        Action::CatalogDidLoad {
            request_id,
            outcome,
        } => {
            if !state.is_current_request(request_id) {
                tracing::debug!(request_id, "ignoring stale catalog load");
                return DispatchResult::unchanged();
            }
            apply_outcome(state, outcome);
            DispatchResult::changed()
        }

        Action::CatalogDidError { request_id, error } => {
            if !state.is_current_request(request_id) {
                tracing::debug!(request_id, "ignoring stale catalog error");
                return DispatchResult::unchanged();
            }
            tracing::error!(request_id, %error, "catalog load failed");
            state.catalog = DataResource::Failed(FETCH_FAILED_MESSAGE.to_string());
            state.visible.clear();
            state.scroll = 0;
            DispatchResult::changed()
        }

        Action::CatalogDidRefresh {
            request_id,
            outcome,
        } => {
            if !state.is_current_request(request_id) || state.phase() != ViewPhase::Ready {
                tracing::debug!(request_id, "ignoring stale catalog refresh");
                return DispatchResult::unchanged();
            }
            apply_outcome(state, outcome);
            DispatchResult::changed()
        }

        Action::CatalogRefreshDidError { request_id, error } => {
            if !state.is_current_request(request_id) {
                return DispatchResult::unchanged();
            }
            // Stale data stays on screen; the view remains Ready.
            tracing::warn!(request_id, %error, "catalog refresh failed, keeping previous view");
            state.refresh_error = Some(error);
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchFocus => {
            if state.search_active || state.phase() != ViewPhase::Ready {
                return DispatchResult::unchanged();
            }
            state.search_active = true;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            DispatchResult::changed()
        }

        Action::SearchTermChange(term) => {
            if term == state.search_term {
                return DispatchResult::unchanged();
            }
            state.search_term = term;
            request_derivation(state)
        }

        // ===== Sort actions =====
        Action::SortSet(key) => set_sort(state, key),

        Action::SortToggle => {
            let key = state.sort_key.toggle();
            set_sort(state, key)
        }

        // ===== Derive actions =====
        Action::DeriveDue(ticket) => {
            if ticket != state.derive_ticket || state.phase() != ViewPhase::Ready {
                tracing::debug!(ticket, current = state.derive_ticket, "derivation superseded");
                return DispatchResult::unchanged();
            }
            begin_refresh(state)
        }

        // ===== Grid actions =====
        Action::GridScroll(delta) => {
            let max_row = state.max_scroll_row();
            let next = (state.scroll as i64 + delta as i64).clamp(0, max_row as i64) as usize;
            if next == state.scroll {
                return DispatchResult::unchanged();
            }
            state.scroll = next;
            DispatchResult::changed()
        }

        Action::GridResize(columns) => {
            let columns = columns.max(1);
            if columns == state.grid_columns {
                return DispatchResult::unchanged();
            }
            state.grid_columns = columns;
            state.scroll = state.scroll.min(state.max_scroll_row());
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.phase() == ViewPhase::Loading {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn begin_load(state: &mut AppState) -> DispatchResult<Effect> {
    state.catalog = DataResource::Loading;
    state.visible.clear();
    state.scroll = 0;
    state.tick = 0;
    state.refresh_error = None;
    state.search_active = false;
    state.stats.fetch_calls += 1;
    let request_id = state.next_request_id();
    DispatchResult::changed_with(Effect::LoadCatalog { request_id })
}

fn begin_refresh(state: &mut AppState) -> DispatchResult<Effect> {
    state.stats.fetch_calls += 1;
    let request_id = state.next_request_id();
    DispatchResult::changed_with(Effect::RefreshCatalog { request_id })
}

fn set_sort(state: &mut AppState, key: SortKey) -> DispatchResult<Effect> {
    if state.sort_key == key {
        return DispatchResult::unchanged();
    }
    state.sort_key = key;
    request_derivation(state)
}

/// Input changed: re-derive now, or after the debounce delay.
///
/// Before the catalog is Ready only the input is recorded; the pending load
/// derives with whatever term and key are current when it lands.
fn request_derivation(state: &mut AppState) -> DispatchResult<Effect> {
    state.scroll = 0;
    if state.phase() != ViewPhase::Ready {
        return DispatchResult::changed();
    }
    let ticket = state.next_derive_ticket();
    if state.optimizations.debounce {
        DispatchResult::changed_with(Effect::ScheduleDerive {
            ticket,
            delay_ms: state.optimizations.debounce_ms,
        })
    } else {
        begin_refresh(state)
    }
}

fn apply_outcome(state: &mut AppState, outcome: FetchOutcome) {
    state.stats.record(&outcome);
    let records = outcome.result.records;
    state.visible = derive_view(&records, &state.search_term, state.sort_key);
    state.catalog = DataResource::Loaded(records);
    state.refresh_error = None;
    state.scroll = state.scroll.min(state.max_scroll_row());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationConfig;
    use crate::state::{DisplayRecord, FetchResult};
    use pretty_assertions::assert_eq;

    fn record(id: u32, name: &str) -> DisplayRecord {
        DisplayRecord {
            id,
            name: name.to_string(),
            sprite: Some(format!("https://sprites/{id}.png")),
        }
    }

    fn outcome() -> FetchOutcome {
        FetchOutcome::network(FetchResult {
            records: vec![
                record(2, "Ivysaur"),
                record(1, "Bulbasaur"),
                record(4, "Charmander"),
            ],
            request_count: 4,
        })
    }

    fn ready_state(optimizations: OptimizationConfig) -> AppState {
        let mut state = AppState::new(optimizations);
        let result = reducer(&mut state, Action::CatalogFetch);
        let request_id = match &result.effects[0] {
            Effect::LoadCatalog { request_id } => *request_id,
            other => panic!("expected LoadCatalog, got {other:?}"),
        };
        reducer(
            &mut state,
            Action::CatalogDidLoad {
                request_id,
                outcome: outcome(),
            },
        );
        state
    }

    fn visible_ids(state: &AppState) -> Vec<u32> {
        state.visible.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_fetch_sets_loading_and_counts_call() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::CatalogFetch);

        assert!(result.changed);
        assert!(state.catalog.is_loading());
        assert_eq!(state.phase(), ViewPhase::Loading);
        assert_eq!(state.stats.fetch_calls, 1);
        assert_eq!(result.effects, vec![Effect::LoadCatalog { request_id: 1 }]);
    }

    #[test]
    fn test_load_derives_sorted_view() {
        let state = ready_state(OptimizationConfig::default());
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert_eq!(visible_ids(&state), vec![1, 2, 4]);
        // Base order is kept as fetched
        let base: Vec<u32> = state.base_records().iter().map(|r| r.id).collect();
        assert_eq!(base, vec![2, 1, 4]);
        assert_eq!(state.stats.request_count, 4);
    }

    #[test]
    fn test_load_error_fails_with_generic_message() {
        let mut state = AppState::default();
        reducer(&mut state, Action::CatalogFetch);
        let result = reducer(
            &mut state,
            Action::CatalogDidError {
                request_id: 1,
                error: "HTTP 500".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.phase(), ViewPhase::Failed);
        assert_eq!(state.catalog.error(), Some(FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut state = ready_state(OptimizationConfig::default());
        assert!(!reducer(&mut state, Action::CatalogRetry).changed);

        state.catalog = DataResource::Failed(FETCH_FAILED_MESSAGE.into());
        let result = reducer(&mut state, Action::CatalogRetry);
        assert!(result.changed);
        assert!(state.catalog.is_loading());
        assert!(matches!(result.effects[0], Effect::LoadCatalog { .. }));
    }

    #[test]
    fn test_search_without_debounce_refreshes_immediately() {
        let mut state = ready_state(OptimizationConfig::default());
        let result = reducer(&mut state, Action::SearchTermChange("char".into()));

        assert_eq!(state.search_term, "char");
        assert_eq!(state.stats.fetch_calls, 2);
        assert_eq!(result.effects, vec![Effect::RefreshCatalog { request_id: 2 }]);

        reducer(
            &mut state,
            Action::CatalogDidRefresh {
                request_id: 2,
                outcome: outcome(),
            },
        );
        assert_eq!(visible_ids(&state), vec![4]);
        assert_eq!(state.phase(), ViewPhase::Ready);
    }

    #[test]
    fn test_search_with_debounce_schedules_timer() {
        let mut state = ready_state(OptimizationConfig {
            debounce: true,
            ..Default::default()
        });

        let first = reducer(&mut state, Action::SearchTermChange("c".into()));
        let second = reducer(&mut state, Action::SearchTermChange("ch".into()));

        assert_eq!(
            first.effects,
            vec![Effect::ScheduleDerive {
                ticket: 1,
                delay_ms: 500
            }]
        );
        assert_eq!(
            second.effects,
            vec![Effect::ScheduleDerive {
                ticket: 2,
                delay_ms: 500
            }]
        );
        // No fetch until the timer fires
        assert_eq!(state.stats.fetch_calls, 1);

        // Superseded ticket is canceled
        assert!(!reducer(&mut state, Action::DeriveDue(1)).changed);

        let fired = reducer(&mut state, Action::DeriveDue(2));
        assert!(matches!(fired.effects[0], Effect::RefreshCatalog { .. }));
        assert_eq!(state.stats.fetch_calls, 2);
    }

    #[test]
    fn test_stale_refresh_is_ignored() {
        let mut state = ready_state(OptimizationConfig::default());
        reducer(&mut state, Action::SearchTermChange("b".into()));
        reducer(&mut state, Action::SearchTermChange("bu".into()));
        assert_eq!(state.latest_request_id, 3);

        let stale = reducer(
            &mut state,
            Action::CatalogDidRefresh {
                request_id: 2,
                outcome: FetchOutcome::network(FetchResult::default()),
            },
        );
        assert!(!stale.changed);
        assert_eq!(state.base_records().len(), 3);
        assert_eq!(state.stats.request_count, 4);
    }

    #[test]
    fn test_refresh_error_keeps_ready_and_stale_data() {
        let mut state = ready_state(OptimizationConfig::default());
        reducer(&mut state, Action::SortSet(SortKey::Name));

        let result = reducer(
            &mut state,
            Action::CatalogRefreshDidError {
                request_id: 2,
                error: "connection reset".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert_eq!(visible_ids(&state), vec![1, 2, 4]);
        assert_eq!(state.refresh_error.as_deref(), Some("connection reset"));
    }

    #[test]
    fn test_input_before_ready_only_records_term() {
        let mut state = AppState::default();
        reducer(&mut state, Action::CatalogFetch);

        let result = reducer(&mut state, Action::SortSet(SortKey::Name));
        assert!(result.changed);
        assert!(result.effects.is_empty());

        reducer(
            &mut state,
            Action::CatalogDidLoad {
                request_id: 1,
                outcome: outcome(),
            },
        );
        let names: Vec<&str> = state.visible.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bulbasaur", "Charmander", "Ivysaur"]);
    }

    #[test]
    fn test_sort_toggle_and_same_key_is_noop() {
        let mut state = ready_state(OptimizationConfig::default());
        assert!(!reducer(&mut state, Action::SortSet(SortKey::Id)).changed);

        reducer(&mut state, Action::SortToggle);
        assert_eq!(state.sort_key, SortKey::Name);
        reducer(&mut state, Action::SortToggle);
        assert_eq!(state.sort_key, SortKey::Id);
    }

    #[test]
    fn test_grid_scroll_clamps() {
        let mut state = ready_state(OptimizationConfig::default());
        assert!(!reducer(&mut state, Action::GridScroll(-1)).changed);

        reducer(&mut state, Action::GridScroll(1));
        assert_eq!(state.scroll, 1);
        reducer(&mut state, Action::GridScroll(5));
        assert_eq!(state.scroll, 2);
    }

    #[test]
    fn test_grid_scroll_stops_at_last_row() {
        let records: Vec<DisplayRecord> = (1..=300).map(|id| record(id, "Mon")).collect();
        let mut state = AppState {
            visible: records.clone(),
            catalog: DataResource::Loaded(records),
            ..Default::default()
        };
        reducer(&mut state, Action::GridResize(4));

        for _ in 0..400 {
            reducer(&mut state, Action::GridScroll(1));
        }
        assert_eq!(state.scroll, 74);

        // The first Up press moves the view
        assert!(reducer(&mut state, Action::GridScroll(-1)).changed);
        assert_eq!(state.scroll, 73);
    }

    #[test]
    fn test_grid_resize_reclamps_scroll() {
        let records: Vec<DisplayRecord> = (1..=10).map(|id| record(id, "Mon")).collect();
        let mut state = AppState {
            visible: records.clone(),
            catalog: DataResource::Loaded(records),
            ..Default::default()
        };
        reducer(&mut state, Action::GridScroll(9));
        assert_eq!(state.scroll, 9);

        // 10 records over 5 columns: rows 0 and 1
        assert!(reducer(&mut state, Action::GridResize(5)).changed);
        assert_eq!(state.scroll, 1);
        assert!(!reducer(&mut state, Action::GridResize(5)).changed);
        assert!(!reducer(&mut state, Action::GridScroll(1)).changed);
    }

    #[test]
    fn test_tick_only_while_loading() {
        let mut state = AppState::default();
        reducer(&mut state, Action::CatalogFetch);
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick, 1);

        let mut ready = ready_state(OptimizationConfig::default());
        assert!(!reducer(&mut ready, Action::Tick).changed);
    }

    #[test]
    fn test_search_focus_requires_ready() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::SearchFocus).changed);

        let mut state = ready_state(OptimizationConfig::default());
        assert!(reducer(&mut state, Action::SearchFocus).changed);
        assert!(state.search_active);
        assert!(reducer(&mut state, Action::SearchBlur).changed);
        assert!(!state.search_active);
    }
}
