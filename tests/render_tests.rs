//! Render snapshot tests using RenderHarness

use tui_dispatch::{testing::*, DataResource};
use pokedex_explorer::{
    components::{
        catalog_display::{ATTRIBUTION, LOADING_MESSAGE},
        catalog_grid::NO_MATCH_MESSAGE,
        CatalogDisplay, CatalogDisplayProps, Component,
    },
    config::OptimizationConfig,
    state::{AppState, DisplayRecord, FetchStats, SortKey, FETCH_FAILED_MESSAGE},
};

fn render_state(state: &AppState, width: u16, height: u16) -> String {
    let mut render = RenderHarness::new(width, height);
    let mut component = CatalogDisplay::new();
    render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    })
}

fn loaded(records: Vec<DisplayRecord>) -> AppState {
    AppState {
        visible: records.clone(),
        catalog: DataResource::Loaded(records),
        ..Default::default()
    }
}

fn starters() -> Vec<DisplayRecord> {
    vec![
        DisplayRecord {
            id: 1,
            name: "Bulbasaur".into(),
            sprite: Some("https://sprites.example/pokemon/1.png".into()),
        },
        DisplayRecord {
            id: 4,
            name: "Charmander".into(),
            sprite: Some("https://sprites.example/pokemon/4.png".into()),
        },
        DisplayRecord {
            id: 7,
            name: "Squirtle".into(),
            sprite: None,
        },
    ]
}

#[test]
fn test_render_loading_state() {
    let state = AppState {
        catalog: DataResource::Loading,
        tick: 3,
        ..Default::default()
    };

    let output = render_state(&state, 60, 12);

    assert!(output.contains(LOADING_MESSAGE), "loading text missing:\n{output}");
    assert!(!output.contains("Search by name"), "no search bar while loading:\n{output}");
}

#[test]
fn test_render_error_state() {
    let state = AppState {
        catalog: DataResource::Failed(FETCH_FAILED_MESSAGE.into()),
        ..Default::default()
    };

    let output = render_state(&state, 80, 14);

    assert!(output.contains("Error"));
    assert!(output.contains(FETCH_FAILED_MESSAGE));
    assert!(output.contains("Press r to try again"));
}

#[test]
fn test_render_tiles_in_visible_order() {
    let output = render_state(&loaded(starters()), 80, 16);

    assert!(output.contains("#001"));
    assert!(output.contains("#004"));
    assert!(output.contains("#007"));
    assert!(output.contains("1.png"));
    assert!(output.contains("no sprite"));

    let bulbasaur = output.find("Bulbasaur").expect("Bulbasaur tile");
    let charmander = output.find("Charmander").expect("Charmander tile");
    assert!(bulbasaur < charmander, "tiles follow the visible order");
}

#[test]
fn test_render_no_match_placeholder() {
    let mut state = loaded(starters());
    state.search_term = "zzz".into();
    state.visible.clear();

    let output = render_state(&state, 80, 16);

    assert!(output.contains(NO_MATCH_MESSAGE));
    assert!(output.contains("zzz"), "term stays in the input:\n{output}");
}

#[test]
fn test_render_sort_label_and_attribution() {
    let mut state = loaded(starters());
    state.sort_key = SortKey::Name;

    let output = render_state(&state, 100, 16);

    assert!(output.contains("Sort by Name"));
    assert!(output.contains(ATTRIBUTION));
}

#[test]
fn test_render_header_stats_and_flags() {
    let mut state = loaded(starters());
    state.stats = FetchStats {
        fetch_calls: 2,
        request_count: 4,
    };
    state.optimizations = OptimizationConfig {
        initial_cache: true,
        debounce: true,
        debounce_ms: 500,
    };

    let output = render_state(&state, 110, 16);

    assert!(output.contains("Pokémon Explorer"));
    assert!(output.contains("Fetch function count: 2"));
    assert!(output.contains("Fetch request count: 4"));
    assert!(output.contains("[cache, debounce 500ms]"));
}

#[test]
fn test_render_refresh_error_hint() {
    let mut state = loaded(starters());
    state.refresh_error = Some("timeout".into());

    let output = render_state(&state, 100, 16);

    assert!(output.contains("refresh failed"));
    assert!(output.contains("Bulbasaur"), "previous results stay visible");
}
