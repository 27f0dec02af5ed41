use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Tasks due within this many days from now count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task is completed.
    Completed,
}

/// Lowercases and strips separators so "In Progress", "in_progress" and
/// "inprogress" all compare equal.
fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "inprogress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("unknown task priority: {}", s)),
        }
    }
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    /// The owning user. Set once at creation.
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `owner_id`, stamped with a fresh id and the current time.
    pub fn new(owner_id: Uuid, new_task: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            due_date: new_task.due_date,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::from("must not be blank"));
        return Err(error);
    }
    Ok(())
}

/// Request body for creating a task. Any `owner` field is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    #[validate(custom = "not_blank", length(max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    #[serde(default, deserialize_with = "due_date::deserialize")]
    pub due_date: Option<DateTime<Utc>>,
}

/// A validated task with every default applied, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<TaskInput> for NewTask {
    fn from(input: TaskInput) -> Self {
        Self {
            title: input.title.trim().to_string(),
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
        }
    }
}

/// Partial update of a task: only the fields present are applied.
///
/// `dueDate: null` clears the due date, an absent `dueDate` leaves it untouched.
/// Ownership cannot change, so there is no owner field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[validate(custom = "not_blank", length(max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    #[serde(default, deserialize_with = "due_date::deserialize_patch")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    /// Writes the present fields into `task` and bumps `updated_at`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
    }
}

/// Requested ordering of a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    /// Earliest due date first, undated tasks last, ties broken by newest first.
    DueDate,
    /// Most recently created first.
    CreatedAt,
}

impl FromStr for TaskSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "duedate" | "due" => Ok(TaskSort::DueDate),
            "createdat" | "created" => Ok(TaskSort::CreatedAt),
            _ => Err(format!("unknown sort order: {}", s)),
        }
    }
}

/// Constraints on a task listing. Absent options impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Inclusive upper bound on the due date.
    pub due_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on the due date.
    pub due_after: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Also match `search` against the description.
    pub search_description: bool,
    pub sort: Option<TaskSort>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| status != task.status) {
            return false;
        }
        if self.priority.is_some_and(|priority| priority != task.priority) {
            return false;
        }
        if let Some(bound) = self.due_before {
            if !task.due_date.is_some_and(|due| due <= bound) {
                return false;
            }
        }
        if let Some(bound) = self.due_after {
            if !task.due_date.is_some_and(|due| due >= bound) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description =
                self.search_description && task.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }

    /// Orders `tasks` as requested, newest first when no order was requested.
    pub fn sort(&self, tasks: &mut [Task]) {
        match self.sort {
            Some(TaskSort::DueDate) => tasks.sort_by(|a, b| {
                let by_due = match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                by_due.then_with(|| b.created_at.cmp(&a.created_at))
            }),
            Some(TaskSort::CreatedAt) | None => {
                tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
        }
    }
}

/// Raw query parameters of `GET /tasks`. Blank parameters are treated as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_before: Option<String>,
    pub due_after: Option<String>,
    pub search: Option<String>,
    /// Older name of `search`, consulted only when `search` is absent or blank.
    pub query: Option<String>,
    pub search_description: Option<bool>,
    pub sort: Option<String>,
}

fn present(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl TaskQuery {
    pub fn into_filter(self) -> Result<TaskFilter, String> {
        let parse_date = |raw: String| {
            parse_due_date(&raw).ok_or_else(|| format!("invalid date: {}", raw))
        };

        Ok(TaskFilter {
            status: present(self.status).map(|s| s.parse()).transpose()?,
            priority: present(self.priority).map(|p| p.parse()).transpose()?,
            due_before: present(self.due_before).map(parse_date).transpose()?,
            due_after: present(self.due_after).map(parse_date).transpose()?,
            search: present(self.search).or_else(|| present(self.query)),
            search_description: self.search_description.unwrap_or(false),
            sort: present(self.sort).map(|s| s.parse()).transpose()?,
        })
    }
}

/// Per-user task counters shown on the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
    /// Tasks due between now and seven days from now, inclusive.
    pub upcoming: i64,
}

impl TaskStats {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
        tasks.into_iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
            }
            if task.due_date.is_some_and(|due| due >= now && due <= horizon) {
                stats.upcoming += 1;
            }
            stats
        })
    }
}

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date meaning midnight UTC.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

mod due_date {
    use super::parse_due_date;
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_due_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid due date: {}", raw))),
        }
    }

    pub fn deserialize_patch<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}
