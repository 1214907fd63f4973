//! In-memory [`BoardApi`] serving a fixed board, for offline development.

use async_trait::async_trait;

use super::{ApiError, ApiResult, BoardApi, LoadedBoard};
use crate::models::{ColumnId, Task, TaskId};

#[derive(Clone, Debug, Default)]
pub struct DemoBoardApi {
    board: LoadedBoard,
}

impl DemoBoardApi {
    pub fn new(board: LoadedBoard) -> Self {
        Self { board }
    }
}

#[async_trait(?Send)]
impl BoardApi for DemoBoardApi {
    async fn load_board(&self, _folder_id: &str) -> ApiResult<LoadedBoard> {
        Ok(self.board.clone())
    }

    async fn fetch_task(&self, task_id: &TaskId) -> ApiResult<Task> {
        self.board
            .tasks
            .iter()
            .find(|t| &t.id == task_id)
            .cloned()
            .ok_or_else(|| ApiError::Status { status: 404, url: format!("demo://tasks/{task_id}") })
    }

    async fn move_task(&self, task_id: &TaskId, from: &ColumnId, to: &ColumnId) -> ApiResult<()> {
        tracing::debug!(task_id = %task_id, from = %from, to = %to, "demo move accepted");
        Ok(())
    }
}
