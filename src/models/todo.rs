// Todo entity - the task record and its derived state
// completed_date / comment_updated_date only change through the transition methods

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority assigned when none is supplied
pub const DEFAULT_PRIORITY: &str = "low";

/// Opaque identifier assigned by the persistence gateway on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Task state without an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    comment_updated_date: Option<NaiveDateTime>,
    #[serde(default)]
    completed: bool,
    created_date: NaiveDateTime,
    pub due_date: NaiveDate,
    /// "low", "medium", "high" or "urgent"; other values are kept as-is
    pub priority: String,
    #[serde(default)]
    pub reminder: Option<NaiveDateTime>,
    #[serde(default)]
    completed_date: Option<NaiveDateTime>,
}

impl Todo {
    /// New incomplete task created at `now`, due on the same day, priority "low"
    pub fn new(title: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            comment: None,
            comment_updated_date: None,
            completed: false,
            created_date: now,
            due_date: now.date(),
            priority: DEFAULT_PRIORITY.to_string(),
            reminder: None,
            completed_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        if let Some(due) = due_date {
            self.due_date = due;
        }
        self
    }

    pub fn with_priority(mut self, priority: Option<String>) -> Self {
        self.priority = priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_reminder(mut self, reminder: Option<NaiveDateTime>) -> Self {
        self.reminder = reminder;
        self
    }

    // ---- transitions ----

    /// Incomplete -> Complete. Keeps an existing completion stamp.
    pub fn mark_complete(mut self, now: NaiveDateTime) -> Self {
        self.completed = true;
        if self.completed_date.is_none() {
            self.completed_date = Some(now);
        }
        self
    }

    /// Complete -> Incomplete. Always clears the completion stamp.
    pub fn mark_incomplete(mut self) -> Self {
        self.completed = false;
        self.completed_date = None;
        self
    }

    pub fn set_completed(self, completed: bool, now: NaiveDateTime) -> Self {
        if completed {
            self.mark_complete(now)
        } else {
            self.mark_incomplete()
        }
    }

    pub fn toggled(self, now: NaiveDateTime) -> Self {
        let completed = !self.completed;
        self.set_completed(completed, now)
    }

    /// Replace the comment. Non-blank text stamps `comment_updated_date`,
    /// anything else clears it.
    pub fn with_comment(mut self, comment: Option<String>, now: NaiveDateTime) -> Self {
        self.comment_updated_date = match comment.as_deref() {
            Some(text) if !text.trim().is_empty() => Some(now),
            _ => None,
        };
        self.comment = comment;
        self
    }

    // ---- accessors ----

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn comment_updated_date(&self) -> Option<NaiveDateTime> {
        self.comment_updated_date
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_date(&self) -> NaiveDateTime {
        self.created_date
    }

    pub fn completed_date(&self) -> Option<NaiveDateTime> {
        self.completed_date
    }

    // ---- derived predicates ----

    /// Not completed and due before `today`
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }

    /// Not completed and due on `today`
    pub fn is_due_today_on(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date == today
    }

    /// Completed with a completion stamp inside the calendar month of `today`
    pub fn is_completed_in_month_of(&self, today: NaiveDate) -> bool {
        match self.completed_date {
            Some(done) if self.completed => {
                done.year() == today.year() && done.month() == today.month()
            }
            _ => false,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    pub fn is_due_today(&self) -> bool {
        self.is_due_today_on(today())
    }

    pub fn is_completed_this_month(&self) -> bool {
        self.is_completed_in_month_of(today())
    }
}

/// A persisted todo: the gateway-assigned id plus its state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    #[serde(flatten)]
    pub todo: Todo,
}

impl TodoRecord {
    pub fn new(id: TodoId, todo: Todo) -> Self {
        Self { id, todo }
    }

    /// Apply a transition to the state, keeping the id
    pub fn map(self, f: impl FnOnce(Todo) -> Todo) -> Self {
        Self {
            id: self.id,
            todo: f(self.todo),
        }
    }
}

/// Serialized representation returned to callers, derived predicates included
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoView {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub comment_updated_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub created_date: NaiveDateTime,
    pub due_date: NaiveDate,
    pub priority: String,
    pub reminder: Option<NaiveDateTime>,
    pub completed_date: Option<NaiveDateTime>,
    pub overdue: bool,
    pub due_today: bool,
    pub completed_this_month: bool,
}

impl TodoView {
    /// Build the view, evaluating the predicates against `today`
    pub fn at(record: &TodoRecord, today: NaiveDate) -> Self {
        let todo = &record.todo;
        Self {
            id: record.id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            comment: todo.comment.clone(),
            comment_updated_date: todo.comment_updated_date,
            completed: todo.completed,
            created_date: todo.created_date,
            due_date: todo.due_date,
            priority: todo.priority.clone(),
            reminder: todo.reminder,
            completed_date: todo.completed_date,
            overdue: todo.is_overdue_on(today),
            due_today: todo.is_due_today_on(today),
            completed_this_month: todo.is_completed_in_month_of(today),
        }
    }
}

impl From<&TodoRecord> for TodoView {
    fn from(record: &TodoRecord) -> Self {
        Self::at(record, today())
    }
}

/// Current local wall-clock time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
