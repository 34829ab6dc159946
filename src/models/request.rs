// Request bodies for the todo endpoints and the decoding policy applied to them
// Optional fields never fail a request: bad dates fall back or are ignored

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::todo::{Todo, DEFAULT_PRIORITY};

/// A JSON field that can be missing, explicitly null, or carry a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Collapse to an Option, treating null like a missing key
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Absent | Field::Null => None,
        }
    }
}

// Only called when the key is present; `#[serde(default)]` covers the missing case
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// Request body for POST /api/todos
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// YYYY-MM-DD; missing or unparseable means today
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// ISO date-time; missing, blank or unparseable leaves it unset
    #[serde(default)]
    pub reminder: Option<String>,
}

impl CreateTodoRequest {
    /// Build a new incomplete todo stamped at `now`
    pub fn into_todo(self, now: NaiveDateTime) -> Todo {
        let due_date = self.due_date.as_deref().and_then(parse_due_date);
        if due_date.is_none() {
            if let Some(raw) = &self.due_date {
                tracing::debug!("Unparseable dueDate {:?}, defaulting to today", raw);
            }
        }

        let reminder = match self.reminder.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match parse_reminder(raw) {
                Ok(reminder) => Some(reminder),
                Err(e) => {
                    tracing::warn!("Failed to parse reminder {:?}: {}", raw, e);
                    None
                }
            },
            _ => None,
        };

        Todo::new(self.title.unwrap_or_default(), now)
            .with_description(self.description)
            .with_due_date(due_date)
            .with_priority(self.priority)
            .with_reminder(reminder)
            .with_comment(self.comment, now)
    }
}

/// Request body for PUT /api/todos/{id}; every field is a partial update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub description: Field<String>,
    #[serde(default)]
    pub comment: Field<String>,
    #[serde(default)]
    pub completed: Field<bool>,
    #[serde(default)]
    pub due_date: Field<String>,
    #[serde(default)]
    pub priority: Field<String>,
    #[serde(default)]
    pub reminder: Field<String>,
}

impl UpdateTodoRequest {
    /// Merge the supplied fields into `todo`
    pub fn apply(self, mut todo: Todo, now: NaiveDateTime) -> Todo {
        match self.title {
            Field::Value(title) => todo.title = title,
            Field::Null => todo.title = String::new(),
            Field::Absent => {}
        }

        if !self.description.is_absent() {
            todo.description = self.description.into_option();
        }

        if let Field::Value(completed) = self.completed {
            todo = todo.set_completed(completed, now);
        }

        if let Field::Value(raw) = &self.due_date {
            match parse_due_date(raw) {
                Some(due) => todo.due_date = due,
                None => tracing::debug!("Unparseable dueDate {:?}, keeping {}", raw, todo.due_date),
            }
        }

        match self.priority {
            Field::Value(priority) => todo.priority = priority,
            Field::Null => todo.priority = DEFAULT_PRIORITY.to_string(),
            Field::Absent => {}
        }

        match self.reminder {
            Field::Value(raw) if raw.is_empty() => todo.reminder = None,
            Field::Null => todo.reminder = None,
            Field::Value(raw) => match parse_reminder(&raw) {
                Ok(reminder) => todo.reminder = Some(reminder),
                Err(e) => tracing::warn!("Failed to parse reminder {:?}: {}, keeping previous", raw, e),
            },
            Field::Absent => {}
        }

        if !self.comment.is_absent() {
            todo = todo.with_comment(self.comment.into_option(), now);
        }

        todo
    }
}

/// Form body for POST /add on the HTML page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl From<AddTodoForm> for CreateTodoRequest {
    fn from(form: AddTodoForm) -> Self {
        // Browsers submit empty inputs as "", which means "not supplied"
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            title: Some(form.title),
            description: non_blank(form.description),
            comment: None,
            due_date: non_blank(form.due_date),
            priority: non_blank(form.priority),
            reminder: None,
        }
    }
}

/// Response body for DELETE /api/todos/{id}
#[derive(Debug, Clone, Serialize)]
pub struct DeleteTodoResponse {
    pub message: String,
}

/// Response for status checks
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Parse a calendar date in strict `YYYY-MM-DD` form: two-digit month and day, no surrounding whitespace
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parse an ISO date-time. Seconds and fraction are optional; an explicit
/// offset is accepted and dropped, keeping the wall-clock time as written.
pub fn parse_reminder(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn update(json: &str) -> UpdateTodoRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_field_tri_state() {
        let req = update(r#"{"comment": null, "reminder": "2024-06-01T10:00:00"}"#);
        assert_eq!(req.comment, Field::Null);
        assert_eq!(req.reminder, Field::Value("2024-06-01T10:00:00".to_string()));
        assert_eq!(req.title, Field::Absent);
        assert_eq!(req.completed, Field::Absent);
    }

    #[test]
    fn test_wrong_json_type_fails() {
        assert!(serde_json::from_str::<UpdateTodoRequest>(r#"{"completed": "yes"}"#).is_err());
        assert!(serde_json::from_str::<CreateTodoRequest>(r#"{"title": 5}"#).is_err());
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_due_date("2023-02-29"), None);
        assert_eq!(parse_due_date("not-a-date"), None);
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("2024-6-1"), None);
        assert_eq!(parse_due_date("2024-06-1"), None);
        assert_eq!(parse_due_date(" 2024-06-01"), None);
        assert_eq!(parse_due_date("2024-06-01 "), None);
    }

    #[test]
    fn test_parse_reminder_formats() {
        assert_eq!(parse_reminder("2024-06-01T10:15").unwrap(), dt("2024-06-01T10:15:00"));
        assert_eq!(parse_reminder("2024-06-01T10:15:30").unwrap(), dt("2024-06-01T10:15:30"));
        assert_eq!(
            parse_reminder("2024-06-01T10:15:30.250").unwrap(),
            dt("2024-06-01T10:15:30") + chrono::Duration::milliseconds(250)
        );
        assert_eq!(parse_reminder("2024-06-01T10:15:30+08:00").unwrap(), dt("2024-06-01T10:15:30"));
        assert_eq!(parse_reminder("2024-06-01T10:15:30Z").unwrap(), dt("2024-06-01T10:15:30"));
        assert!(parse_reminder("tomorrow").is_err());
        assert!(parse_reminder("2024-06-01").is_err());
    }

    #[test]
    fn test_create_defaults() {
        let todo = CreateTodoRequest {
            title: Some("A".to_string()),
            ..Default::default()
        }
        .into_todo(now());

        assert_eq!(todo.title, "A");
        assert_eq!(todo.due_date, now().date());
        assert_eq!(todo.priority, "low");
        assert!(todo.reminder.is_none());
        assert!(!todo.is_completed());
        assert!(todo.comment_updated_date().is_none());
    }

    #[test]
    fn test_create_bad_dates_fall_back() {
        let req: CreateTodoRequest = serde_json::from_str(
            r#"{"title": "A", "dueDate": "not-a-date", "reminder": "soon"}"#,
        )
        .unwrap();
        let todo = req.into_todo(now());
        assert_eq!(todo.due_date, now().date());
        assert!(todo.reminder.is_none());
    }

    #[test]
    fn test_create_full_payload() {
        let req: CreateTodoRequest = serde_json::from_str(
            r#"{"title": "A", "description": "d", "comment": "c", "dueDate": "2024-06-01",
                "priority": "urgent", "reminder": "2024-05-31T09:00"}"#,
        )
        .unwrap();
        let todo = req.into_todo(now());
        assert_eq!(todo.description.as_deref(), Some("d"));
        assert_eq!(todo.comment(), Some("c"));
        assert_eq!(todo.comment_updated_date(), Some(now()));
        assert_eq!(todo.due_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(todo.priority, "urgent");
        assert_eq!(todo.reminder, Some(dt("2024-05-31T09:00:00")));
    }

    #[test]
    fn test_create_null_title_is_empty() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(req.into_todo(now()).title, "");
    }

    fn existing() -> Todo {
        CreateTodoRequest {
            title: Some("A".to_string()),
            description: Some("desc".to_string()),
            comment: Some("note".to_string()),
            due_date: Some("2024-06-01".to_string()),
            priority: Some("high".to_string()),
            reminder: Some("2024-05-31T09:00:00".to_string()),
        }
        .into_todo(now())
    }

    #[test]
    fn test_update_empty_body_changes_nothing() {
        let before = existing();
        let after = update("{}").apply(before.clone(), now());
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_reminder_states() {
        let cleared = update(r#"{"reminder": ""}"#).apply(existing(), now());
        assert!(cleared.reminder.is_none());

        let nulled = update(r#"{"reminder": null}"#).apply(existing(), now());
        assert!(nulled.reminder.is_none());

        let kept = update(r#"{"reminder": "garbage"}"#).apply(existing(), now());
        assert_eq!(kept.reminder, Some(dt("2024-05-31T09:00:00")));

        let blank = update(r#"{"reminder": "   "}"#).apply(existing(), now());
        assert_eq!(blank.reminder, Some(dt("2024-05-31T09:00:00")));

        let set = update(r#"{"reminder": "2024-07-01T18:00"}"#).apply(existing(), now());
        assert_eq!(set.reminder, Some(dt("2024-07-01T18:00:00")));
    }

    #[test]
    fn test_update_due_date_bad_value_keeps_previous() {
        let kept = update(r#"{"dueDate": "31/12/2024"}"#).apply(existing(), now());
        assert_eq!(kept.due_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let nulled = update(r#"{"dueDate": null}"#).apply(existing(), now());
        assert_eq!(nulled.due_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let short = update(r#"{"dueDate": "2024-7-4"}"#).apply(existing(), now());
        assert_eq!(short.due_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let set = update(r#"{"dueDate": "2024-12-31"}"#).apply(existing(), now());
        assert_eq!(set.due_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_update_comment_clears_stamp() {
        let later = now() + chrono::Duration::hours(1);

        let cleared = update(r#"{"comment": null}"#).apply(existing(), later);
        assert!(cleared.comment().is_none());
        assert!(cleared.comment_updated_date().is_none());

        let blank = update(r#"{"comment": "  "}"#).apply(existing(), later);
        assert!(blank.comment_updated_date().is_none());

        let restamped = update(r#"{"comment": "new"}"#).apply(existing(), later);
        assert_eq!(restamped.comment(), Some("new"));
        assert_eq!(restamped.comment_updated_date(), Some(later));

        let untouched = update(r#"{"title": "B"}"#).apply(existing(), later);
        assert_eq!(untouched.comment_updated_date(), Some(now()));
    }

    #[test]
    fn test_update_completed_and_priority() {
        let done = update(r#"{"completed": true}"#).apply(existing(), now());
        assert!(done.is_completed());
        assert_eq!(done.completed_date(), Some(now()));

        let still_done = update(r#"{"completed": null}"#).apply(done.clone(), now());
        assert!(still_done.is_completed());

        let undone = update(r#"{"completed": false}"#).apply(done, now());
        assert!(!undone.is_completed());
        assert!(undone.completed_date().is_none());

        let reset = update(r#"{"priority": null}"#).apply(existing(), now());
        assert_eq!(reset.priority, "low");

        let custom = update(r#"{"priority": "someday"}"#).apply(existing(), now());
        assert_eq!(custom.priority, "someday");
    }

    #[test]
    fn test_update_title_and_description() {
        let todo = update(r#"{"title": "B", "description": null}"#).apply(existing(), now());
        assert_eq!(todo.title, "B");
        assert!(todo.description.is_none());

        let todo = update(r#"{"title": null}"#).apply(existing(), now());
        assert_eq!(todo.title, "");
    }

    #[test]
    fn test_form_blank_fields_are_absent() {
        let form = AddTodoForm {
            title: "A".to_string(),
            description: Some(String::new()),
            due_date: Some(String::new()),
            priority: Some(" ".to_string()),
        };
        let todo = CreateTodoRequest::from(form).into_todo(now());
        assert!(todo.description.is_none());
        assert_eq!(todo.due_date, now().date());
        assert_eq!(todo.priority, "low");
    }
}
