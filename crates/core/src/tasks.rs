//! Back-office task list.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

pub const MAX_TITLE_LENGTH: usize = 200;

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_URGENT: &str = "urgent";

pub const VALID_PRIORITIES: &[&str] =
    &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH, PRIORITY_URGENT];

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] =
    &[STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_COMPLETED, STATUS_CANCELLED];

/// Pseudo-status used by list filters for pending + in-progress tasks.
pub const STATUS_FILTER_ACTIVE: &str = "active";

pub const ACTIVE_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_IN_PROGRESS];

pub const VALID_CATEGORIES: &[&str] = &[
    "artwork",
    "sales",
    "client",
    "supplier",
    "exhibition",
    "administrative",
    "other",
];

pub const SORT_DUE_DATE: &str = "dueDate";
pub const SORT_PRIORITY: &str = "priority";
pub const SORT_NEWEST: &str = "newest";

pub const DUE_TODAY: &str = "today";
pub const DUE_WEEK: &str = "week";

/// Ordering weight of a priority; higher is more pressing.
///
/// Used in SQL as well via [`priority_rank_sql`].
pub fn priority_rank(priority: &str) -> i32 {
    match priority {
        PRIORITY_URGENT => 4,
        PRIORITY_HIGH => 3,
        PRIORITY_MEDIUM => 2,
        PRIORITY_LOW => 1,
        _ => 0,
    }
}

/// SQL expression ranking a `priority` column like [`priority_rank`].
pub fn priority_rank_sql(column: &str) -> String {
    let arms: String = VALID_PRIORITIES
        .iter()
        .map(|p| format!(" WHEN '{p}' THEN {}", priority_rank(p)))
        .collect();
    format!("CASE {column}{arms} ELSE 0 END")
}

/// One checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

/// Completion summary of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Progress of a checklist, or `None` when it is empty.
pub fn checklist_progress(items: &[ChecklistItem]) -> Option<ChecklistProgress> {
    if items.is_empty() {
        return None;
    }
    let completed = items.iter().filter(|i| i.is_completed).count();
    let total = items.len();
    let percentage = ((completed as f64 / total as f64) * 100.0).round() as u32;
    Some(ChecklistProgress {
        completed,
        total,
        percentage,
    })
}

/// Flip the completion of item `index`. Returns `false` when out of range.
pub fn toggle_checklist_item(items: &mut [ChecklistItem], index: usize, now: Timestamp) -> bool {
    let Some(item) = items.get_mut(index) else {
        return false;
    };
    item.is_completed = !item.is_completed;
    item.completed_at = item.is_completed.then_some(now);
    true
}

/// A task is overdue when still open and past its due date.
pub fn is_overdue(status: &str, due_date: Option<Timestamp>, now: Timestamp) -> bool {
    match due_date {
        Some(due) => status != STATUS_COMPLETED && status != STATUS_CANCELLED && now > due,
        None => false,
    }
}

/// New `completed_at` after a status change.
pub fn completed_at_for(
    status: &str,
    previous: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    if status == STATUS_COMPLETED {
        previous.or(Some(now))
    } else {
        None
    }
}

pub fn validate_priority(priority: &str) -> Result<(), String> {
    crate::validation::validate_choice("priority", priority, VALID_PRIORITIES)
}

pub fn validate_status(status: &str) -> Result<(), String> {
    crate::validation::validate_choice("task status", status, VALID_STATUSES)
}

pub fn validate_category(category: &str) -> Result<(), String> {
    crate::validation::validate_choice("task category", category, VALID_CATEGORIES)
}
