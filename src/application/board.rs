use std::borrow::Cow;

use chrono::{DateTime, Local};

use super::command::Command;
use crate::domain::{
    engine::{self, DisplayGroups},
    repository::TaskRepository,
    task::{DateKey, DisplayOrder, TaskId, TaskList},
};
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Unchanged,
}

impl Outcome {
    pub fn is_applied(self) -> bool { self == Outcome::Applied }
}

pub struct TaskBoard<R: TaskRepository> {
    repo: R,
    tasks: TaskList,
    order: DisplayOrder,
    focused: Option<TaskId>,
    day: DateKey,
}

impl<R: TaskRepository> TaskBoard<R> {
    pub async fn open(repo: R, order: DisplayOrder, now: &DateTime<Local>) -> Result<Self, StorageError> {
        repo.init().await?;
        let loaded = repo.load().await;
        let rolled = engine::rollover(&loaded, now);

        let board = Self { repo, tasks: rolled.tasks, order, focused: None, day: engine::today_key(now) };
        if rolled.changed {
            board.persist().await;
        }
        tracing::info!(count = board.tasks.len(), carried_over = rolled.changed, day = %board.day, "task board ready");
        Ok(board)
    }

    pub async fn dispatch(&mut self, command: Command, now: &DateTime<Local>) -> Outcome {
        let next = match &command {
            Command::Add { text } => applied(engine::add(&self.tasks, text, now)),
            Command::Toggle { id } => applied(engine::toggle(&self.tasks, id)),
            Command::Edit { id, text } => applied(engine::edit(&self.tasks, id, text)),
            Command::Delete { id } => applied(engine::delete(&self.tasks, id)),
            Command::Reorder { ids, group } => applied(engine::reorder_within_group(&self.tasks, ids, *group)),
            Command::Rollover => {
                self.day = engine::today_key(now);
                let rolled = engine::rollover(&self.tasks, now);
                if rolled.changed {
                    Some(rolled.tasks)
                } else {
                    // Cleared flags ride along with the next save.
                    self.tasks = rolled.tasks;
                    None
                }
            }
        };

        let Some(next) = next else {
            tracing::debug!(command = command.name(), "no change");
            return Outcome::Unchanged;
        };

        self.tasks = next;
        self.persist().await;
        if self.focused.as_ref().is_some_and(|id| !self.tasks.contains(id)) {
            self.focused = None;
        }
        tracing::info!(command = command.name(), count = self.tasks.len(), "applied");
        Outcome::Applied
    }

    async fn persist(&self) {
        if let Err(err) = self.repo.save(&self.tasks).await {
            tracing::warn!(%err, "could not save tasks; in-memory list is kept");
        }
    }

    pub fn tasks(&self) -> &TaskList { &self.tasks }

    pub fn groups(&self) -> DisplayGroups<'_> { engine::partition_with_order(&self.tasks, self.order) }

    pub fn display_order(&self) -> DisplayOrder { self.order }

    pub fn focused(&self) -> Option<&TaskId> { self.focused.as_ref() }

    pub fn focus(&mut self, id: Option<TaskId>) {
        self.focused = id.filter(|id| self.tasks.contains(id));
    }

    pub fn day_changed(&self, now: &DateTime<Local>) -> bool { engine::today_key(now) != self.day }
}

fn applied(next: Cow<'_, TaskList>) -> Option<TaskList> {
    match next {
        Cow::Owned(list) => Some(list),
        Cow::Borrowed(_) => None,
    }
}
