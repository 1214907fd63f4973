//! Frontend Models
//!
//! Board entities and the drag payloads built from them.

use std::fmt;

use leptos_dragdrop::{Draggable, DroppableKey};
use serde::{Deserialize, Serialize};

/// Column identifier (e.g. `todo`, `in-progress`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub String);

/// Task identifier, unique across the board
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(ColumnId);
string_id!(TaskId);

/// A named lane; its position in the column list is its display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    pub fn new(id: &str, title: &str) -> Self {
        Self { id: id.into(), title: title.to_string() }
    }

    /// Label shown on status badges
    pub fn status_label(&self) -> &str {
        match self.id.as_str() {
            "todo" => "Todo",
            "in-progress" => "In progress",
            "done" => "Done",
            _ => &self.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Priority::High => "priority-high",
            Priority::Medium => "priority-medium",
            Priority::Low => "priority-low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub initials: String,
    pub color: String,
}

/// A work item. Belongs to exactly one column at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub column_id: ColumnId,
    pub column_title: Option<String>,
    pub content: String,
    pub key: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub assignees: Vec<Assignee>,
    pub permalink: Option<String>,
    pub raw_status: Option<String>,
}

impl Task {
    pub fn new(id: &str, column_id: &str, content: &str) -> Self {
        Self {
            id: id.into(),
            column_id: column_id.into(),
            column_title: None,
            content: content.to_string(),
            key: String::new(),
            description: None,
            due_date: None,
            priority: None,
            assignees: Vec::new(),
            permalink: None,
            raw_status: None,
        }
    }

    /// Copy of this task placed in another column
    pub fn in_column(&self, column_id: &ColumnId, column_title: Option<String>) -> Self {
        Self {
            column_id: column_id.clone(),
            column_title,
            ..self.clone()
        }
    }
}

/// What kind of entity is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Column,
    Task,
}

impl DragKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragKind::Column => "column",
            DragKind::Task => "task",
        }
    }
}

/// Payload of the entity picked up by the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum DragData {
    Column(Column),
    Task(Task),
}

impl DragData {
    pub fn target(&self) -> DropTarget {
        match self {
            DragData::Column(c) => DropTarget::Column(c.id.clone()),
            DragData::Task(t) => DropTarget::Task(t.id.clone()),
        }
    }
}

impl Draggable for DragData {
    fn droppable_key(&self) -> DroppableKey {
        self.target().into()
    }
}

/// A droppable region: a column body or a task card
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    Column(ColumnId),
    Task(TaskId),
}

impl DropTarget {
    pub fn kind(&self) -> DragKind {
        match self {
            DropTarget::Column(_) => DragKind::Column,
            DropTarget::Task(_) => DragKind::Task,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DropTarget::Column(id) => id.as_str(),
            DropTarget::Task(id) => id.as_str(),
        }
    }

    /// Parse the key read back from DOM data attributes
    pub fn from_key(key: &DroppableKey) -> Option<Self> {
        match key.kind.as_str() {
            "column" => Some(DropTarget::Column(key.id.as_str().into())),
            "task" => Some(DropTarget::Task(key.id.as_str().into())),
            _ => None,
        }
    }
}

impl From<DropTarget> for DroppableKey {
    fn from(target: DropTarget) -> Self {
        DroppableKey::new(target.kind().as_str(), target.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_target_key_round_trip() {
        let target = DropTarget::Task("task1".into());
        let key: DroppableKey = target.clone().into();
        assert_eq!(key, DroppableKey::new("task", "task1"));
        assert_eq!(DropTarget::from_key(&key), Some(target));
        assert_eq!(DropTarget::from_key(&DroppableKey::new("lane", "x")), None);
    }

    #[test]
    fn test_status_label_falls_back_to_title() {
        assert_eq!(Column::new("in-progress", "Doing").status_label(), "In progress");
        assert_eq!(Column::new("qa", "Review").status_label(), "Review");
    }
}
