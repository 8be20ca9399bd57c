//! The user's task list: estimates in pomodoros, spent counters, manual
//! ordering.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

pub const ESTIMATE_RANGE: (u32, u32) = (1, 20);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Estimated pomodoros.
    pub est: u32,
    #[serde(default)]
    pub done: bool,
    /// Pomodoros spent so far.
    #[serde(default)]
    pub spent: u32,
}

/// Ordered task list. Order is user-defined and preserved on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Force every estimate into `ESTIMATE_RANGE`.
    pub fn clamped(mut self) -> Self {
        for task in &mut self.tasks {
            task.est = task.est.clamp(ESTIMATE_RANGE.0, ESTIMATE_RANGE.1);
        }
        self
    }

    /// Append a new task. The estimate is clamped into `ESTIMATE_RANGE`.
    pub fn add(&mut self, title: &str, est: u32) -> Result<&Task, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty {
                field: "title".into(),
            });
        }
        self.tasks.push(Task {
            id: Uuid::new_v4().simple().to_string(),
            title: title.to_string(),
            est: est.clamp(ESTIMATE_RANGE.0, ESTIMATE_RANGE.1),
            done: false,
            spent: 0,
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn set_done(&mut self, id: &str, done: bool) -> Result<(), ValidationError> {
        self.find_mut(id)?.done = done;
        Ok(())
    }

    pub fn rename(&mut self, id: &str, title: &str) -> Result<(), ValidationError> {
        self.find_mut(id)?.title = title.to_string();
        Ok(())
    }

    /// Count one more pomodoro against the task; returns the new count.
    pub fn add_spent(&mut self, id: &str) -> Result<u32, ValidationError> {
        let task = self.find_mut(id)?;
        task.spent = task.spent.saturating_add(1);
        Ok(task.spent)
    }

    pub fn remove(&mut self, id: &str) -> Result<Task, ValidationError> {
        let index = self.position(id)?;
        Ok(self.tasks.remove(index))
    }

    /// Drop every finished task; returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.done);
        before - self.tasks.len()
    }

    /// Sort by position in `ids`. Tasks missing from `ids` keep their
    /// relative order after the listed ones.
    pub fn reorder(&mut self, ids: &[String]) {
        self.tasks.sort_by_key(|t| {
            ids.iter()
                .position(|id| *id == t.id)
                .unwrap_or(usize::MAX)
        });
    }

    /// Move a task to `index`, clamped to the end of the list.
    pub fn move_to(&mut self, id: &str, index: usize) -> Result<(), ValidationError> {
        let from = self.position(id)?;
        let task = self.tasks.remove(from);
        let to = index.min(self.tasks.len());
        self.tasks.insert(to, task);
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, ValidationError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> ValidationError {
    ValidationError::NotFound {
        entity: "task".into(),
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &TaskList) -> Vec<String> {
        list.iter().map(|t| t.id.clone()).collect()
    }

    fn titles(list: &TaskList) -> Vec<&str> {
        list.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn add_trims_and_clamps() {
        let mut list = TaskList::default();
        let task = list.add("  Write report  ", 99).unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.est, 20);
        assert!(!task.done);
        let task = list.add("Tiny", 0).unwrap();
        assert_eq!(task.est, 1);
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut list = TaskList::default();
        assert_eq!(
            list.add("   ", 1).unwrap_err(),
            ValidationError::Empty {
                field: "title".into()
            }
        );
        assert!(list.is_empty());
    }

    #[test]
    fn done_spent_rename_remove() {
        let mut list = TaskList::default();
        let id = list.add("A", 2).unwrap().id.clone();
        list.set_done(&id, true).unwrap();
        assert_eq!(list.add_spent(&id).unwrap(), 1);
        assert_eq!(list.add_spent(&id).unwrap(), 2);
        list.rename(&id, "B").unwrap();
        let task = list.get(&id).unwrap();
        assert!(task.done);
        assert_eq!(task.title, "B");
        assert_eq!(list.remove(&id).unwrap().spent, 2);
        assert!(list.remove(&id).is_err());
    }

    #[test]
    fn clear_completed_keeps_open_tasks() {
        let mut list = TaskList::default();
        let a = list.add("A", 1).unwrap().id.clone();
        list.add("B", 1).unwrap();
        let c = list.add("C", 1).unwrap().id.clone();
        list.set_done(&a, true).unwrap();
        list.set_done(&c, true).unwrap();
        assert_eq!(list.clear_completed(), 2);
        assert_eq!(titles(&list), ["B"]);
    }

    #[test]
    fn reorder_by_ids() {
        let mut list = TaskList::default();
        for t in ["A", "B", "C", "D"] {
            list.add(t, 1).unwrap();
        }
        let original = ids(&list);
        list.reorder(&[original[2].clone(), original[0].clone()]);
        assert_eq!(titles(&list), ["C", "A", "B", "D"]);
    }

    #[test]
    fn move_to_clamps_index() {
        let mut list = TaskList::default();
        for t in ["A", "B", "C"] {
            list.add(t, 1).unwrap();
        }
        let a = ids(&list)[0].clone();
        list.move_to(&a, 10).unwrap();
        assert_eq!(titles(&list), ["B", "C", "A"]);
        list.move_to(&a, 0).unwrap();
        assert_eq!(titles(&list), ["A", "B", "C"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut list = TaskList::default();
        list.add("A", 3).unwrap();
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["est"], 3);
        assert_eq!(json[0]["spent"], 0);
    }
}
