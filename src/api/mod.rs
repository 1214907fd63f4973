//! Board API
//!
//! REST bindings for the external board service, organized by concern.

mod demo;
mod dto;
mod guard;
mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Column, ColumnId, Task, TaskId};

pub use demo::DemoBoardApi;
pub use guard::LoadGuard;
pub use http::HttpBoardApi;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Superseded by a newer request; never an error worth reporting
    #[error("request superseded")]
    Aborted,
}

impl ApiError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Columns and tasks as delivered by a board load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedBoard {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

/// Operations the board needs from the backend
#[async_trait(?Send)]
pub trait BoardApi {
    /// `GET /api/board/folders/{folder_id}`
    async fn load_board(&self, folder_id: &str) -> ApiResult<LoadedBoard>;

    /// `GET /api/board/tasks/{task_id}`
    async fn fetch_task(&self, task_id: &TaskId) -> ApiResult<Task>;

    /// `POST /api/board/tasks/{task_id}/move`
    async fn move_task(&self, task_id: &TaskId, from: &ColumnId, to: &ColumnId) -> ApiResult<()>;
}
