//! Pokedex Explorer - browse the PokeAPI catalog in the terminal

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pokedex_explorer::action::Action;
use pokedex_explorer::api::CatalogClient;
use pokedex_explorer::cache::CatalogCache;
use pokedex_explorer::components::catalog_grid::columns_for;
use pokedex_explorer::components::{CatalogDisplay, CatalogDisplayProps, Component};
use pokedex_explorer::config::{CatalogConfig, DEFAULT_DEBOUNCE_MS};
use pokedex_explorer::effect::Effect;
use pokedex_explorer::logging;
use pokedex_explorer::reducer::reducer;
use pokedex_explorer::state::{AppState, LOADING_TICK_MS};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Pokedex Explorer - PokeAPI catalog browser
#[derive(Parser, Debug)]
#[command(name = "pokedex-explorer")]
#[command(about = "Search and sort the PokeAPI catalog from the terminal")]
struct Args {
    /// API base URL (overrides POKEDEX_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Number of entries in the bulk listing (overrides POKEDEX_LIMIT)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Serve repeat fetches from the in-memory cache
    #[arg(long)]
    initial_cache: bool,

    /// Wait for search/sort input to settle before re-deriving
    #[arg(long)]
    debounce: bool,

    /// Debounce delay in milliseconds
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Log file (default: pokedex-explorer.log in the temp dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::default().with_env_overrides();
        if let Some(base) = &self.api_base {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(limit) = self.limit {
            config.limit = limit as usize;
        }
        config.optimizations.initial_cache = self.initial_cache;
        config.optimizations.debounce = self.debounce;
        config.optimizations.debounce_ms = self.debounce_ms;
        config
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokedexComponentId {
    Catalog,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokedexContext {
    Main,
    Search,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        if self.search_active {
            Some(PokedexComponentId::Search)
        } else {
            Some(PokedexComponentId::Catalog)
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.search_active {
            Some(PokedexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Catalog => PokedexContext::Main,
            PokedexComponentId::Search => PokedexContext::Search,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = args.catalog_config();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;
    tracing::info!(
        api_base = %config.api_base,
        limit = config.limit,
        initial_cache = config.optimizations.initial_cache,
        debounce = config.optimizations.debounce,
        "starting pokedex explorer"
    );

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let optimizations = config.optimizations.clone();
    let mut state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(optimizations))
        })
        .await
        .map_err(debug_error)?;

    if let Ok((width, _)) = crossterm::terminal::size() {
        state.grid_columns = columns_for(width);
    }

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let client = CatalogClient::new(config, CatalogCache::new());

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, client).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("pokedex explorer exited");
    Ok(())
}

struct PokedexUi {
    display: CatalogDisplay,
}

impl PokedexUi {
    fn new() -> Self {
        Self {
            display: CatalogDisplay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        event_ctx.set_component_area(PokedexComponentId::Catalog, area);
        if state.search_active {
            event_ctx.set_component_area(PokedexComponentId::Search, area);
        } else {
            event_ctx
                .component_areas
                .remove(&PokedexComponentId::Search);
        }

        let props = CatalogDisplayProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.display.render(frame, area, props);
    }

    fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = self.display.handle_search_event(event, state);
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: CatalogClient,
) -> io::Result<DebugRunOutput<AppState>> {
    let client = Arc::new(client);
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(PokedexComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // The grid spans the full width, so the terminal width decides the columns
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, _) => HandlerResponse {
            actions: vec![Action::GridResize(columns_for(width))],
            consumed: false,
            needs_render: true,
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::CatalogFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, client.clone()),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: Arc<CatalogClient>) {
    match effect {
        Effect::LoadCatalog { request_id } => {
            ctx.tasks().cancel(&TaskKey::new("catalog_refresh"));
            ctx.tasks().spawn("catalog", async move {
                match client.fetch_catalog(request_id).await {
                    Ok(outcome) => Action::CatalogDidLoad {
                        request_id,
                        outcome,
                    },
                    Err(err) => Action::CatalogDidError {
                        request_id,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::RefreshCatalog { request_id } => {
            ctx.tasks().spawn("catalog_refresh", async move {
                match client.fetch_catalog(request_id).await {
                    Ok(outcome) => Action::CatalogDidRefresh {
                        request_id,
                        outcome,
                    },
                    Err(err) => Action::CatalogRefreshDidError {
                        request_id,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::ScheduleDerive { ticket, delay_ms } => {
            ctx.tasks()
                .debounce("derive", Duration::from_millis(delay_ms), async move {
                    Action::DeriveDue(ticket)
                });
        }
    }
}
