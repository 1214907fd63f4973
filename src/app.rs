//! Kanban Board App
//!
//! Root component: provides config, store and context, and loads the board.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::{BoardApi, DemoBoardApi, HttpBoardApi, LoadGuard, LoadedBoard};
use crate::components::BoardView;
use crate::config::BoardConfig;
use crate::context::AppContext;
use crate::history;
use crate::store::{store_apply_loaded, BoardState, BoardStateStoreFields};

fn make_api(config: &BoardConfig) -> Rc<dyn BoardApi> {
    if config.demo {
        let sample = BoardState::sample();
        Rc::new(DemoBoardApi::new(LoadedBoard { columns: sample.columns, tasks: sample.tasks }))
    } else {
        Rc::new(HttpBoardApi::new(&config.api_base))
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = BoardConfig::from_location();
    tracing::info!(folder_id = %config.folder_id, demo = config.demo, "starting board");

    let store = Store::new(BoardState::new(config.min_card_rows));
    let ctx = AppContext::new(signal(0u32), history::task_from_location(), make_api(&config));

    // Provide context to all children
    provide_context(store);
    provide_context(ctx);
    provide_context(config.clone());

    // Load the board on mount and on every reload request; a newer load
    // supersedes one still in flight
    let guard = LoadGuard::new();
    let load_guard = guard.clone();
    let folder_id = config.folder_id.clone();
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let token = load_guard.begin();
        let api = ctx.api();
        let folder_id = folder_id.clone();
        tracing::debug!(folder_id = %folder_id, trigger, "loading board");
        store.loading().set(true);

        spawn_local(async move {
            match token.settle(api.load_board(&folder_id).await) {
                Ok(board) => store_apply_loaded(&store, board),
                Err(e) if e.is_aborted() => {
                    tracing::debug!(folder_id = %folder_id, "board load superseded");
                }
                Err(e) => {
                    tracing::error!(folder_id = %folder_id, error = %e, "failed to load board");
                    store.loading().set(false);
                }
            }
        });
    });
    on_cleanup(move || guard.cancel());

    view! {
        <div class="app-layout">
            <header class="board-header">
                <h1>"Board"</h1>
                <Show when=move || store.loading().get()>
                    <span class="board-loading">"Loading…"</span>
                </Show>
                <span class="board-count">
                    {move || format!("{} tasks in {} columns", store.tasks().read().len(), store.columns().read().len())}
                </span>
            </header>
            <BoardView />
            <LogPanel />
        </div>
    }
}

/// Most recent log lines, newest first
const LOG_PANEL_ROWS: usize = 50;

/// Collapsible view over the in-memory log buffer
#[component]
fn LogPanel() -> impl IntoView {
    let lines = RwSignal::new(None::<Vec<String>>);
    let toggle = move |_| {
        lines.update(|lines| {
            *lines = match lines {
                Some(_) => None,
                None => Some(
                    rolling_logger::recent()
                        .iter()
                        .rev()
                        .take(LOG_PANEL_ROWS)
                        .map(ToString::to_string)
                        .collect(),
                ),
            };
        });
    };

    view! {
        <footer class="board-log">
            <button class="board-log-toggle" on:click=toggle>
                {move || if lines.with(Option::is_some) { "Hide log" } else { "Show log" }}
            </button>
            {move || lines.get().map(|lines| view! {
                <pre class="board-log-lines">{lines.join("\n")}</pre>
            })}
        </footer>
    }
}
