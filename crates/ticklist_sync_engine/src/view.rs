//! Client view state and its transitions.
//!
//! Everything here is synchronous and free of I/O. The engine pairs each
//! `begin_*` call with exactly one `confirm_*` or `rollback_*` once the
//! server answers.

use ticklist_protocol::{Task, TaskId};

/// A task as the client displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Server id, or a temporary id while a create is in flight.
    pub id: TaskId,
    /// Task text.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// True while a request concerning this task has not yet settled.
    pub pending: bool,
}

impl TaskView {
    /// Returns the same task with `pending` cleared.
    pub fn settled(mut self) -> Self {
        self.pending = false;
        self
    }

    /// Returns the wire form of this task.
    pub fn to_task(&self) -> Task {
        Task::new(self.id.clone(), self.text.clone()).with_completed(self.completed)
    }
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            text: task.text,
            completed: task.completed,
            pending: false,
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Tasks in display order.
    pub tasks: Vec<TaskView>,
    /// The visible error notice, if any.
    pub error_message: Option<String>,
    /// True until the first load settles.
    pub is_loading_initial: bool,
    /// True while a create is in flight.
    pub is_submitting: bool,
    /// Text of the new-task input.
    pub draft: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            error_message: None,
            is_loading_initial: true,
            is_submitting: false,
            draft: String::new(),
        }
    }
}

impl ViewState {
    /// Creates the state shown before the first load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the task with the given id.
    pub fn get(&self, id: &TaskId) -> Option<&TaskView> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Returns true if a task with the given id is shown.
    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of tasks awaiting a server answer.
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.pending).count()
    }

    /// Replaces the whole list with the server's tasks, in server order.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks.into_iter().map(TaskView::from).collect();
    }

    /// Appends a pending task under `temp_id` and clears the draft.
    pub fn begin_create(&mut self, temp_id: TaskId, text: impl Into<String>) {
        self.tasks.push(TaskView {
            id: temp_id,
            text: text.into(),
            completed: false,
            pending: true,
        });
        self.draft.clear();
        self.is_submitting = true;
    }

    /// Swaps the placeholder for the server's task.
    ///
    /// If the server id is already shown (a reload raced the create), the
    /// placeholder is dropped instead so ids stay unique.
    pub fn confirm_create(&mut self, temp_id: &TaskId, task: Task) {
        if self.contains(&task.id) {
            self.tasks.retain(|t| &t.id != temp_id);
        } else if let Some(entry) = self.tasks.iter_mut().find(|t| &t.id == temp_id) {
            *entry = TaskView::from(task);
        }
        self.is_submitting = false;
    }

    /// Drops the placeholder.
    pub fn rollback_create(&mut self, temp_id: &TaskId) {
        self.tasks.retain(|t| &t.id != temp_id);
        self.is_submitting = false;
    }

    /// Flips the task's completion flag in place and marks it pending.
    ///
    /// Returns the flipped task, which is what gets sent to the server.
    /// The entry is located by `task.id`; if it is no longer shown the view
    /// is left alone but the flipped value is still returned.
    pub fn begin_toggle(&mut self, task: &TaskView) -> TaskView {
        let toggled = TaskView {
            completed: !task.completed,
            pending: true,
            ..task.clone()
        };
        if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *entry = toggled.clone();
        }
        toggled
    }

    /// Replaces the entry with the server's version of the task.
    pub fn confirm_toggle(&mut self, task: Task) {
        if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *entry = TaskView::from(task);
        }
    }

    /// Puts back the task as it was before the toggle.
    pub fn rollback_toggle(&mut self, original: TaskView) {
        if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == original.id) {
            *entry = original.settled();
        }
    }

    /// Removes the task and returns it for a possible rollback.
    pub fn begin_delete(&mut self, id: &TaskId) -> Option<TaskView> {
        let index = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Re-inserts a task whose delete failed.
    ///
    /// The task goes to the end of the list. If an entry with its id
    /// reappeared meanwhile, that entry is overwritten instead.
    pub fn rollback_delete(&mut self, removed: TaskView) {
        let removed = removed.settled();
        match self.tasks.iter_mut().find(|t| t.id == removed.id) {
            Some(entry) => *entry = removed,
            None => self.tasks.push(removed),
        }
    }
}
