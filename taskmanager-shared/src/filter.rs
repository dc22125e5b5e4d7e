/// Task filter predicate
///
/// Narrows a task listing by status, performer, label and "only tasks I
/// created". Present criteria combine by AND; absent ones don't restrict.
/// Filtering keeps the input order, so a listing in creation order stays in
/// creation order.
///
/// The filter deserializes from a query string such as
/// `?status=<uuid>&performer=<uuid>&labels=<uuid>&self_tasks=on`. Empty
/// values count as absent, matching what an unfilled HTML form submits.
///
/// # Example
///
/// ```
/// use taskmanager_shared::filter::TaskFilter;
/// use uuid::Uuid;
///
/// let status = Uuid::new_v4();
/// let filter = TaskFilter { status: Some(status), ..TaskFilter::default() };
///
/// assert!(!filter.is_empty());
/// assert!(TaskFilter::default().is_empty());
/// ```

use serde::{de, Deserialize, Deserializer};
use uuid::Uuid;

use crate::models::task::Task;

/// Criteria for narrowing a task listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFilter {
    /// Keep tasks in this status
    #[serde(default, deserialize_with = "optional_uuid")]
    pub status: Option<Uuid>,

    /// Keep tasks assigned to this user
    #[serde(default, deserialize_with = "optional_uuid")]
    pub performer: Option<Uuid>,

    /// Keep tasks carrying this label
    #[serde(default, deserialize_with = "optional_uuid")]
    pub labels: Option<Uuid>,

    /// When true, keep only tasks authored by the requesting actor
    #[serde(default, deserialize_with = "optional_flag")]
    pub self_tasks: Option<bool>,
}

impl TaskFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.performer.is_none()
            && self.labels.is_none()
            && self.self_tasks != Some(true)
    }

    /// Checks a single task against every present criterion
    pub fn matches(&self, task: &Task, actor_id: Uuid) -> bool {
        if let Some(status) = self.status {
            if task.status_id != status {
                return false;
            }
        }

        if let Some(performer) = self.performer {
            if task.performer_id != Some(performer) {
                return false;
            }
        }

        if let Some(label) = self.labels {
            if !task.has_label(label) {
                return false;
            }
        }

        if self.self_tasks == Some(true) && task.author_id != actor_id {
            return false;
        }

        true
    }

    /// Filters `tasks` for `actor_id`, preserving order
    pub fn apply(&self, tasks: Vec<Task>, actor_id: Uuid) -> Vec<Task> {
        tasks
            .into_iter()
            .filter(|task| self.matches(task, actor_id))
            .collect()
    }
}

fn optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id: {}", raw))),
    }
}

// Checkboxes submit "on"; API clients send "true"
fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "on" | "1" | "yes" => Ok(Some(true)),
            "false" | "off" | "0" | "no" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("invalid flag: {}", other))),
        },
    }
}
