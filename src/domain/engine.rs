use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{DateTime, Local};

use super::task::{DateKey, DisplayOrder, Group, Task, TaskId, TaskList};

pub fn today_key(now: &DateTime<Local>) -> DateKey { DateKey::from_local(now) }

pub fn add<'a>(list: &'a TaskList, raw_text: &str, now: &DateTime<Local>) -> Cow<'a, TaskList> {
    let text = raw_text.trim();
    if text.is_empty() {
        return Cow::Borrowed(list);
    }

    let mut id = TaskId::generate();
    while list.contains(&id) {
        id = TaskId::generate();
    }

    let task = Task {
        id,
        text: text.to_owned(),
        done: false,
        created_at: now.timestamp_millis(),
        date_key: today_key(now),
        overdue: false,
    };
    Cow::Owned(std::iter::once(task).chain(list.iter().cloned()).collect())
}

pub fn toggle<'a>(list: &'a TaskList, id: &TaskId) -> Cow<'a, TaskList> {
    replace(list, id, |task| Task { done: !task.done, ..task.clone() })
}

pub fn edit<'a>(list: &'a TaskList, id: &TaskId, raw_text: &str) -> Cow<'a, TaskList> {
    let text = raw_text.trim();
    if text.is_empty() || list.get(id).is_some_and(|task| task.text == text) {
        return Cow::Borrowed(list);
    }
    replace(list, id, |task| Task { text: text.to_owned(), ..task.clone() })
}

pub fn delete<'a>(list: &'a TaskList, id: &TaskId) -> Cow<'a, TaskList> {
    if !list.contains(id) {
        return Cow::Borrowed(list);
    }
    Cow::Owned(list.iter().filter(|task| &task.id != id).cloned().collect())
}

fn replace<'a>(list: &'a TaskList, id: &TaskId, f: impl Fn(&Task) -> Task) -> Cow<'a, TaskList> {
    if !list.contains(id) {
        return Cow::Borrowed(list);
    }
    Cow::Owned(list.iter().map(|task| if &task.id == id { f(task) } else { task.clone() }).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollover {
    pub changed: bool,
    pub tasks: TaskList,
}

pub fn rollover(list: &TaskList, now: &DateTime<Local>) -> Rollover {
    let today = today_key(now);
    let mut changed = false;

    let tasks = list
        .iter()
        .map(|task| {
            if !task.done && task.date_key < today {
                changed = true;
                Task { overdue: true, date_key: today.clone(), ..task.clone() }
            } else {
                Task { overdue: false, ..task.clone() }
            }
        })
        .collect();

    Rollover { changed, tasks }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayGroups<'a> {
    pub overdue: Vec<&'a Task>,
    pub today: Vec<&'a Task>,
}

impl<'a> DisplayGroups<'a> {
    pub fn counts(&self) -> Counts {
        let completed = self.today.iter().filter(|task| task.done).count();
        Counts { active: self.overdue.len() + self.today.len() - completed, completed }
    }

    pub fn is_empty(&self) -> bool { self.overdue.is_empty() && self.today.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.overdue.iter().chain(self.today.iter()).copied()
    }

    pub fn group(&self, group: Group) -> &[&'a Task] {
        match group {
            Group::Overdue => &self.overdue,
            Group::Today => &self.today,
        }
    }
}

pub fn partition_for_display(list: &TaskList) -> DisplayGroups<'_> {
    partition_with_order(list, DisplayOrder::Created)
}

pub fn partition_with_order(list: &TaskList, order: DisplayOrder) -> DisplayGroups<'_> {
    let select = |pred: fn(&Task) -> bool| {
        let mut tasks: Vec<&Task> = list.iter().filter(|task| pred(task)).collect();
        if order == DisplayOrder::Created {
            tasks.sort_by_key(|task| Reverse(task.created_at));
        }
        tasks
    };

    let overdue = select(|task| !task.done && task.overdue);
    let mut today = select(|task| !task.done && !task.overdue);
    today.extend(select(|task| task.done));

    DisplayGroups { overdue, today }
}

/// Ids outside `group` are dropped. Members the request leaves out follow
/// the requested ones in their previous order.
pub fn reorder_within_group<'a>(list: &'a TaskList, ordered_ids: &[TaskId], group: Group) -> Cow<'a, TaskList> {
    let mut seen: HashSet<&TaskId> = HashSet::new();
    let requested: Vec<&Task> = ordered_ids
        .iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| list.get(id))
        .filter(|task| task.group() == group)
        .collect();
    let leftover = list.iter().filter(|task| task.group() == group && !seen.contains(&task.id));
    let reordered: Vec<&Task> = requested.into_iter().chain(leftover).collect();
    let others = list.iter().filter(|task| task.group() != group);

    let next: Vec<&Task> = match group {
        Group::Overdue => reordered.into_iter().chain(others).collect(),
        Group::Today => others.chain(reordered).collect(),
    };

    if next.iter().map(|task| &task.id).eq(list.iter().map(|task| &task.id)) {
        return Cow::Borrowed(list);
    }
    Cow::Owned(next.into_iter().cloned().collect())
}
