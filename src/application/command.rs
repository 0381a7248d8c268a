use crate::domain::task::{Group, TaskId, UnknownGroup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { text: String },
    Toggle { id: TaskId },
    Edit { id: TaskId, text: String },
    Delete { id: TaskId },
    Rollover,
    Reorder { ids: Vec<TaskId>, group: Group },
}

impl Command {
    /// Reorder request as produced by a rendered list: its ids top to bottom
    /// plus the list id (`"overdue-list"` or `"today-list"`).
    pub fn reorder<I, S>(ids: I, list_id: &str) -> Result<Self, UnknownGroup>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = list_id.parse()?;
        Ok(Command::Reorder { ids: ids.into_iter().map(|id| TaskId(id.into())).collect(), group })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Toggle { .. } => "toggle",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Rollover => "rollover",
            Command::Reorder { .. } => "reorder",
        }
    }
}
