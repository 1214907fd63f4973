//! Kanban Board Frontend Entry Point

mod api;
mod app;
mod board;
mod components;
mod config;
mod context;
mod history;
mod markdown;
mod models;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let logs = rolling_logger::init(rolling_logger::DEFAULT_CAPACITY, tracing::Level::DEBUG);
    tracing::debug!(capacity = logs.capacity(), "logger installed");
    mount_to_body(App);
}
