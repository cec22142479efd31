pub mod board;
pub mod config;
pub mod dates;
pub mod drag;
pub mod error;
pub mod html;
pub mod markup;
pub mod model;
pub mod notes;
pub mod render;
pub mod storage;
pub mod task_store;
pub mod urgency;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Bucket, Task};

    #[test]
    fn task_has_required_fields() {
        let task = Task::new(
            "demo".to_string(),
            "2024-06-20".to_string(),
            "Work".to_string(),
        );

        assert_eq!(task.name, "demo");
        assert_eq!(task.due_date, "2024-06-20");
        assert_eq!(task.category, "Work");
        assert!(!task.completed);
        assert!(!task.is_current);
        assert_eq!(task.completed_date, None);
        assert_eq!(task.bucket(), Bucket::Other);
    }

    #[test]
    fn completion_takes_bucket_priority() {
        let mut task = Task::new("demo".into(), "2024-06-20".into(), "Work".into());
        task.is_current = true;
        assert_eq!(task.bucket(), Bucket::Current);
        task.completed = true;
        assert_eq!(task.bucket(), Bucket::Completed);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing name");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "invalid_input - missing name");
        assert_eq!(AppError::network("down").code(), "network_error");
    }
}
