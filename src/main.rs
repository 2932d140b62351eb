//! Weather board - city cards, favorites and a map in the terminal

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};
use weather_board::action::Action;
use weather_board::api;
use weather_board::components::{Component, Dashboard, DashboardProps};
use weather_board::config::Args;
use weather_board::effect::Effect;
use weather_board::logging::init_tracing;
use weather_board::reducer::reducer;
use weather_board::state::{AppState, Pane};

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum BoardComponentId {
    Lists,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum BoardContext {
    Main,
    Search,
}

impl EventRoutingState<BoardComponentId, BoardContext> for AppState {
    fn focused(&self) -> Option<BoardComponentId> {
        if self.focus == Pane::Search {
            Some(BoardComponentId::Search)
        } else {
            Some(BoardComponentId::Lists)
        }
    }

    fn modal(&self) -> Option<BoardComponentId> {
        if self.focus == Pane::Search {
            Some(BoardComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: BoardComponentId) -> BoardContext {
        match id {
            BoardComponentId::Lists => BoardContext::Main,
            BoardComponentId::Search => BoardContext::Search,
        }
    }

    fn default_context(&self) -> BoardContext {
        BoardContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let (config, debug_args) = Args::parse().into_parts();
    init_tracing(&config.log);
    tracing::info!(feed = %config.endpoints.feed_url, geo = %config.endpoints.geo_url, "starting");

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let endpoints = config.endpoints.clone();
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(endpoints))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

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

    tracing::info!("stopped");
    Ok(())
}

struct BoardUi {
    dashboard: Dashboard,
}

impl BoardUi {
    fn new() -> Self {
        Self {
            dashboard: Dashboard::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<BoardComponentId>,
    ) {
        event_ctx.set_component_area(BoardComponentId::Lists, area);
        event_ctx.set_component_area(
            BoardComponentId::Search,
            Rect {
                height: area.height.min(1),
                ..area
            },
        );

        let props = DashboardProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.dashboard.render(frame, area, props);
    }

    fn handle_lists_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .dashboard
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

    fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let actions = self.dashboard.handle_search_event(event, state);
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
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(BoardUi::new()));
    let mut bus: EventBus<AppState, Action, BoardComponentId, BoardContext> = EventBus::new();
    let keybindings: Keybindings<BoardContext> = Keybindings::new();

    let ui_lists = Rc::clone(&ui);
    bus.register(BoardComponentId::Lists, move |event, state| {
        ui_lists.borrow_mut().handle_lists_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(BoardComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCities { url } => {
            ctx.tasks().spawn("feed", async move {
                Action::FeedDidLoad(api::load_all_cities(&url).await)
            });
        }
        Effect::Locate { url } => {
            ctx.tasks().spawn("locate", async move {
                Action::LocationDidLoad(api::locate(&url).await)
            });
        }
    }
}
