//! HTTP implementation of [`BoardApi`] backed by `reqwest` (fetch on wasm32).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use super::dto::{BoardDto, MoveBody, TaskDto};
use super::{ApiError, ApiResult, BoardApi, LoadedBoard};
use crate::models::{ColumnId, Task, TaskId};

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Clone, Debug)]
pub struct HttpBoardApi {
    client: reqwest::Client,
    base: String,
}

impl HttpBoardApi {
    pub fn new(base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/api/board/{segments...}` with each segment percent-encoded
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/api/board", self.base);
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        url
    }

    fn check(url: &str, response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status { status: status.as_u16(), url: url.to_string() })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self.client.get(url).send().await?;
        let response = Self::check(url, response)?;
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl BoardApi for HttpBoardApi {
    async fn load_board(&self, folder_id: &str) -> ApiResult<LoadedBoard> {
        let url = self.url(&["folders", folder_id]);
        tracing::debug!(%url, "loading board");
        let dto: BoardDto = self.get_json(&url).await?;
        Ok(dto.into())
    }

    async fn fetch_task(&self, task_id: &TaskId) -> ApiResult<Task> {
        let url = self.url(&["tasks", task_id.as_str()]);
        let dto: TaskDto = self.get_json(&url).await?;
        // Column labels come from the stored task when the detail is merged
        Ok(dto.into_detail(&[]))
    }

    async fn move_task(&self, task_id: &TaskId, from: &ColumnId, to: &ColumnId) -> ApiResult<()> {
        let url = self.url(&["tasks", task_id.as_str(), "move"]);
        let body = MoveBody { from: from.as_str(), to: to.as_str() };
        let response = self.client.post(&url).json(&body).send().await?;
        Self::check(&url, response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_segments() {
        let api = HttpBoardApi::new("https://example.test/");
        assert_eq!(api.url(&["folders", "IEAB/12 3"]), "https://example.test/api/board/folders/IEAB%2F12%203");
        assert_eq!(api.url(&["tasks", "t1", "move"]), "https://example.test/api/board/tasks/t1/move");
    }
}
