//! Back-office tasks.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::tasks::{ChecklistItem, ChecklistProgress};
use galeria_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub category: String,
    pub tags: Vec<String>,
    pub checklist: Json<Vec<ChecklistItem>>,
    pub related_event_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub related_artwork_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task with its derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
    pub checklist_progress: Option<ChecklistProgress>,
}

impl TaskView {
    pub fn new(task: Task, now: Timestamp) -> Self {
        Self {
            is_overdue: galeria_core::tasks::is_overdue(&task.status, task.due_date, now),
            checklist_progress: galeria_core::tasks::checklist_progress(&task.checklist),
            task,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Timestamp>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub related_event_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub related_artwork_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Timestamp>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub related_event_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub related_artwork_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// A concrete status, or `"active"` for pending and in-progress.
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    /// `"today"` or `"week"`.
    pub due: Option<String>,
    pub overdue: bool,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Aggregate counters for the task dashboard.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct TaskStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub overdue: i64,
    pub due_today: i64,
    pub urgent: i64,
}
