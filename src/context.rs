//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::BoardApi;
use crate::history;
use crate::models::TaskId;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the board from the backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the board from the backend - write
    set_reload_trigger: WriteSignal<u32>,
    /// Task shown in the detail panel
    pub selected_task: RwSignal<Option<TaskId>>,
    /// Detail panel fills the board (mirrored as `?task=<id>`)
    pub panel_maximized: RwSignal<bool>,
    /// Backend for loads, detail fetches and moves
    api: StoredValue<Rc<dyn BoardApi>, LocalStorage>,
}

impl AppContext {
    pub fn new(
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        initial_task: Option<TaskId>,
        api: Rc<dyn BoardApi>,
    ) -> Self {
        let maximized = initial_task.is_some();
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            selected_task: RwSignal::new(initial_task),
            panel_maximized: RwSignal::new(maximized),
            api: StoredValue::new_local(api),
        }
    }

    pub fn api(&self) -> Rc<dyn BoardApi> {
        self.api.get_value()
    }

    /// Trigger a reload of the board
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Open the detail panel docked
    pub fn select_task(&self, task_id: TaskId) {
        self.selected_task.set(Some(task_id));
        self.panel_maximized.set(false);
    }

    pub fn close_panel(&self) {
        self.selected_task.set(None);
        self.panel_maximized.set(false);
        history::clear_task();
    }

    pub fn toggle_maximized(&self) {
        let Some(task_id) = self.selected_task.get_untracked() else {
            return;
        };
        if self.panel_maximized.get_untracked() {
            self.panel_maximized.set(false);
            history::clear_task();
        } else {
            self.panel_maximized.set(true);
            history::push_task(&task_id);
        }
    }
}
