use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_local(now: &DateTime<Local>) -> Self {
        let day = now.date_naive();
        Self(format!("{:04}-{:02}-{:02}", day.year(), day.month(), day.day()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for DateKey {
    fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub date_key: DateKey,
    #[serde(default)]
    pub overdue: bool,
}

impl Task {
    pub fn group(&self) -> Group {
        if !self.done && self.overdue { Group::Overdue } else { Group::Today }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn get(&self, id: &TaskId) -> Option<&Task> { self.0.iter().find(|t| &t.id == id) }

    pub fn contains(&self, id: &TaskId) -> bool { self.get(id).is_some() }
}

impl Deref for TaskList {
    type Target = [Task];

    fn deref(&self) -> &[Task] { &self.0 }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self { Self(tasks) }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group { Overdue, Today }

impl Group {
    pub fn list_id(self) -> &'static str {
        match self { Group::Overdue => "overdue-list", Group::Today => "today-list" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task group `{0}`")]
pub struct UnknownGroup(pub String);

impl FromStr for Group {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overdue-list" | "overdue" => Ok(Group::Overdue),
            "today-list" | "today" => Ok(Group::Today),
            other => Err(UnknownGroup(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayOrder {
    #[default]
    Created,
    Manual,
}
