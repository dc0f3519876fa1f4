//! Route layout of the task API.

use crate::task::TaskId;

/// Collection route: list (GET) and create (POST).
pub const TASKS_PATH: &str = "/api/todos";

/// Item route for a single task: update (PUT) and delete (DELETE).
pub fn task_path(id: &TaskId) -> String {
    format!("{}/{}", TASKS_PATH, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_path() {
        assert_eq!(task_path(&TaskId::new("42")), "/api/todos/42");
    }
}
