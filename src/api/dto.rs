//! Wire DTOs
//!
//! Payload shapes of the board service and their mapping onto board models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::LoadedBoard;
use crate::models::{Assignee, Column, Priority, Task};

/// Neutral gray used when the service sends no assignee color
pub const DEFAULT_ASSIGNEE_COLOR: &str = "bg-gray-400";

const DUE_DATE_FORMAT: &str = "%d %b, %Y";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardDto {
    #[serde(default)]
    pub columns: Vec<ColumnDto>,
    #[serde(default)]
    pub tasks: Vec<TaskDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDto {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub key: Option<String>,
    pub importance: Option<String>,
    pub due_date: Option<String>,
    pub assignees: Option<Vec<AssigneeDto>>,
    pub permalink: Option<String>,
    pub raw_wrike_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssigneeDto {
    pub initials: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Body of the move request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveBody<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl From<ColumnDto> for Column {
    fn from(dto: ColumnDto) -> Self {
        Column { id: dto.id.into(), title: dto.title }
    }
}

impl AssigneeDto {
    fn into_assignee(self) -> Assignee {
        let initials = self
            .initials
            .filter(|i| !i.trim().is_empty())
            .or_else(|| {
                self.name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(|n| n.chars().take(2).collect::<String>().to_uppercase())
            })
            .unwrap_or_else(|| "?".to_string());
        let color = self
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ASSIGNEE_COLOR.to_string());
        Assignee { initials, color }
    }
}

/// List payloads only flag high importance
fn list_priority(importance: Option<&str>) -> Option<Priority> {
    importance.filter(|i| i.eq_ignore_ascii_case("high")).map(|_| Priority::High)
}

fn detail_priority(importance: Option<&str>) -> Option<Priority> {
    let importance = importance?;
    if importance.eq_ignore_ascii_case("high") {
        Some(Priority::High)
    } else if importance.eq_ignore_ascii_case("medium") {
        Some(Priority::Medium)
    } else if importance.eq_ignore_ascii_case("low") {
        Some(Priority::Low)
    } else {
        None
    }
}

/// Short display date ("15 Apr, 2025"); unparseable input is kept verbatim
pub fn format_due_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format(DUE_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

impl TaskDto {
    fn into_task_with(self, columns: &[Column], priority: Option<Priority>) -> Task {
        let column_title = columns
            .iter()
            .find(|c| c.id.as_str() == self.column_id)
            .map(|c| c.title.clone());
        Task {
            id: self.id.into(),
            column_id: self.column_id.into(),
            column_title,
            content: self.title,
            key: self.key.unwrap_or_default(),
            description: self.description,
            due_date: self.due_date.as_deref().map(format_due_date),
            priority,
            assignees: self
                .assignees
                .unwrap_or_default()
                .into_iter()
                .map(AssigneeDto::into_assignee)
                .collect(),
            permalink: self.permalink,
            raw_status: self.raw_wrike_status,
        }
    }

    /// Map a task from the board list payload
    pub fn into_task(self, columns: &[Column]) -> Task {
        let priority = list_priority(self.importance.as_deref());
        self.into_task_with(columns, priority)
    }

    /// Map a task from the detail payload, which also carries medium/low
    pub fn into_detail(self, columns: &[Column]) -> Task {
        let priority = detail_priority(self.importance.as_deref());
        self.into_task_with(columns, priority)
    }
}

impl From<BoardDto> for LoadedBoard {
    fn from(dto: BoardDto) -> Self {
        let columns: Vec<Column> = dto.columns.into_iter().map(Column::from).collect();
        let tasks = dto.tasks.into_iter().map(|t| t.into_task(&columns)).collect();
        LoadedBoard { columns, tasks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_JSON: &str = r#"{
        "columns": [{"id": "todo", "title": "Todo"}, {"id": "done", "title": "Done"}],
        "tasks": [
            {"id": "t1", "columnId": "todo", "title": "Write docs", "importance": "HIGH",
             "dueDate": "2025-04-15T09:30:00Z",
             "assignees": [{"name": "jane doe"}, {"initials": "MR", "color": "bg-green-600"}, {}]},
            {"id": "t2", "columnId": "done", "title": "Ship", "importance": "Medium",
             "key": "CON 20", "rawWrikeStatus": "Completed"}
        ]
    }"#;

    #[test]
    fn test_board_mapping() {
        let dto: BoardDto = serde_json::from_str(BOARD_JSON).unwrap();
        let board = LoadedBoard::from(dto);
        assert_eq!(board.columns.len(), 2);

        let t1 = &board.tasks[0];
        assert_eq!(t1.content, "Write docs");
        assert_eq!(t1.priority, Some(Priority::High));
        assert_eq!(t1.due_date.as_deref(), Some("15 Apr, 2025"));
        assert_eq!(t1.column_title.as_deref(), Some("Todo"));
        assert_eq!(t1.key, "");
        assert_eq!(t1.assignees[0], Assignee { initials: "JA".into(), color: DEFAULT_ASSIGNEE_COLOR.into() });
        assert_eq!(t1.assignees[1], Assignee { initials: "MR".into(), color: "bg-green-600".into() });
        assert_eq!(t1.assignees[2].initials, "?");

        // list payloads ignore medium/low
        let t2 = &board.tasks[1];
        assert_eq!(t2.priority, None);
        assert_eq!(t2.key, "CON 20");
        assert_eq!(t2.raw_status.as_deref(), Some("Completed"));
    }

    #[test]
    fn test_detail_priority_recognizes_all_levels() {
        let columns = vec![Column::new("todo", "Todo")];
        let task = |importance: &str| TaskDto {
            id: "t".into(),
            column_id: "todo".into(),
            title: "T".into(),
            importance: Some(importance.into()),
            ..Default::default()
        };
        assert_eq!(task("medium").into_detail(&columns).priority, Some(Priority::Medium));
        assert_eq!(task("Low").into_detail(&columns).priority, Some(Priority::Low));
        assert_eq!(task("high").into_detail(&columns).priority, Some(Priority::High));
        assert_eq!(task("urgent").into_detail(&columns).priority, None);
    }

    #[test]
    fn test_due_date_formats() {
        assert_eq!(format_due_date("2025-05-02"), "02 May, 2025");
        assert_eq!(format_due_date("2025-05-02T00:00:00"), "02 May, 2025");
        assert_eq!(format_due_date("next week"), "next week");
    }

    #[test]
    fn test_move_body_shape() {
        let body = serde_json::to_value(MoveBody { from: "todo", to: "done" }).unwrap();
        assert_eq!(body, serde_json::json!({"from": "todo", "to": "done"}));
    }
}
