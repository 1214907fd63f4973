//! Deep links
//!
//! The detail panel's maximized state is mirrored in the URL as
//! `?task=<id>` through `pushState` / `replaceState`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::models::TaskId;

pub const TASK_PARAM: &str = "task";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryState<'a> {
    task_id: &'a str,
}

/// Value of `name` in a query string (with or without the leading `?`)
pub fn parse_query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(&value.replace('+', " ")).decode_utf8_lossy().into_owned())
        .filter(|value| !value.is_empty())
}

/// `{path}?task={id}`
pub fn task_url(path: &str, task_id: &TaskId) -> String {
    format!("{}?{}={}", path, TASK_PARAM, utf8_percent_encode(task_id.as_str(), NON_ALPHANUMERIC))
}

fn pathname() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

/// Task named by the current URL, if any
pub fn task_from_location() -> Option<TaskId> {
    let search = web_sys::window()?.location().search().ok()?;
    parse_query_param(&search, TASK_PARAM).map(TaskId::from)
}

/// Add a history entry for the maximized panel
pub fn push_task(task_id: &TaskId) {
    let Some(window) = web_sys::window() else { return };
    let Some(path) = pathname() else { return };
    let state = serde_wasm_bindgen::to_value(&HistoryState { task_id: task_id.as_str() }).unwrap_or(JsValue::NULL);
    let result = window
        .history()
        .and_then(|history| history.push_state_with_url(&state, "", Some(&task_url(&path, task_id))));
    if let Err(e) = result {
        tracing::warn!(error = ?e, task_id = %task_id, "pushState failed");
    }
}

/// Drop the query string without adding a history entry
pub fn clear_task() {
    let Some(window) = web_sys::window() else { return };
    let Some(path) = pathname() else { return };
    let result = window
        .history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&path)));
    if let Err(e) = result {
        tracing::warn!(error = ?e, "replaceState failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_param() {
        assert_eq!(parse_query_param("?task=t1&folder=F", "task").as_deref(), Some("t1"));
        assert_eq!(parse_query_param("folder=IEAB%2F12+x", "folder").as_deref(), Some("IEAB/12 x"));
        assert_eq!(parse_query_param("?task=&x=1", "task"), None);
        assert_eq!(parse_query_param("?flag", "task"), None);
        assert_eq!(parse_query_param("", "task"), None);
    }

    #[test]
    fn test_task_url_round_trips_through_parser() {
        let id = TaskId::from("IEAB 7/x");
        let url = task_url("/board", &id);
        assert_eq!(url, "/board?task=IEAB%207%2Fx");
        let (_, search) = url.split_once('?').unwrap();
        assert_eq!(parse_query_param(search, TASK_PARAM), Some(id.0));
    }
}
