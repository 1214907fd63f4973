//! Task Detail Panel
//!
//! Docked or maximized panel for the selected task. Opening it fetches the
//! task detail and merges the enriched fields into the store; a newer
//! selection supersedes an in-flight fetch.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::LoadGuard;
use crate::context::AppContext;
use crate::markdown::render_description;
use crate::store::{store_merge_task_detail, store_set_detail_error, use_board_store, BoardStateStoreFields};

/// How long the fetch error banner stays up
const ERROR_BANNER_MS: u32 = 5_000;

#[component]
pub fn TaskDetail() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_board_store();

    let guard = LoadGuard::new();
    let loading = RwSignal::new(false);

    let fetch_guard = guard.clone();
    Effect::new(move |_| {
        let Some(task_id) = ctx.selected_task.get() else {
            fetch_guard.cancel();
            return;
        };
        let token = fetch_guard.begin();
        let api = ctx.api();
        loading.set(true);
        store_set_detail_error(&store, None);

        spawn_local(async move {
            match token.settle(api.fetch_task(&task_id).await) {
                Ok(detail) => store_merge_task_detail(&store, detail),
                Err(e) if e.is_aborted() => {
                    tracing::debug!(task_id = %task_id, "detail fetch superseded");
                    return;
                }
                Err(e) => {
                    tracing::error!(task_id = %task_id, error = %e, "failed to load task details");
                    store_set_detail_error(&store, Some(format!("Could not load task details: {e}")));
                    loading.set(false);
                    TimeoutFuture::new(ERROR_BANNER_MS).await;
                    if token.is_current() {
                        store_set_detail_error(&store, None);
                    }
                    return;
                }
            }
            loading.set(false);
        });
    });
    on_cleanup(move || guard.cancel());

    let task = Memo::new(move |_| {
        let id = ctx.selected_task.get()?;
        store.tasks().read().iter().find(|t| t.id == id).cloned()
    });
    let status = Memo::new(move |_| {
        let task = task.get()?;
        let columns = store.columns().read();
        let label = columns
            .iter()
            .find(|c| c.id == task.column_id)
            .map(|c| c.status_label().to_string())
            .or(task.column_title)?;
        Some(label)
    });

    let panel_class = move || {
        if ctx.panel_maximized.get() {
            "task-detail maximized"
        } else {
            "task-detail docked"
        }
    };

    view! {
        <aside class=panel_class>
            <div class="task-detail-toolbar">
                <span class="task-detail-key">{move || task.get().map(|t| t.key)}</span>
                <button
                    class="task-detail-maximize"
                    title=move || if ctx.panel_maximized.get() { "Restore" } else { "Maximize" }
                    on:click=move |_| ctx.toggle_maximized()
                >
                    {move || if ctx.panel_maximized.get() { "🗗" } else { "🗖" }}
                </button>
                <button class="task-detail-close" title="Close" on:click=move |_| ctx.close_panel()>"×"</button>
            </div>

            {move || store.detail_error().get().map(|message| view! { <div class="task-detail-error">{message}</div> })}
            <Show when=move || loading.get()>
                <div class="task-detail-loading">"Loading…"</div>
            </Show>

            {move || match task.get() {
                None => view! { <p class="task-detail-missing">"This task is no longer on the board."</p> }.into_any(),
                Some(task) => {
                    let description = task.description.as_deref().map(render_description).unwrap_or_default();
                    let assignees = task
                        .assignees
                        .iter()
                        .map(|a| view! { <span class=format!("avatar {}", a.color)>{a.initials.clone()}</span> })
                        .collect_view();
                    view! {
                        <h2 class="task-detail-title">{task.content.clone()}</h2>
                        <dl class="task-detail-fields">
                            <dt>"Status"</dt>
                            <dd>{move || status.get().unwrap_or_default()}</dd>
                            <dt>"Priority"</dt>
                            <dd>{task.priority.map(|p| p.label()).unwrap_or("None")}</dd>
                            <dt>"Due date"</dt>
                            <dd>{task.due_date.clone().unwrap_or_else(|| "-".to_string())}</dd>
                            <dt>"Assignees"</dt>
                            <dd class="task-assignees">{assignees}</dd>
                        </dl>
                        {task.permalink.clone().map(|href| view! {
                            <a class="task-detail-permalink" href=href target="_blank" rel="noopener noreferrer">"Open in tracker"</a>
                        })}
                        <div class="task-detail-description markdown-body" inner_html=description></div>
                    }
                    .into_any()
                }
            }}
        </aside>
    }
}
