//! Task form validation: the boundary in front of add and update.
//!
//! The store accepts whatever it is given. Any surface that submits tasks
//! validates first with [`TaskForm::validate`] and blocks submission when
//! a field is blank.

use taskdeck_proto::task::{Task, TaskDraft};

/// Error shown under a blank title.
pub const TITLE_REQUIRED: &str = "Title is required";

/// Error shown under a blank description.
pub const DESCRIPTION_REQUIRED: &str = "Description is required";

/// Per-field validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    /// Error for the title field.
    pub title: Option<String>,
    /// Error for the description field.
    pub description: Option<String>,
}

impl FormErrors {
    /// Whether no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [self.title.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Editable form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Title as typed.
    pub title: String,
    /// Description as typed.
    pub description: String,
}

impl TaskForm {
    /// Creates a form with the given contents.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Pre-fills a form from an existing task for editing.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self::new(task.title.clone(), task.description.clone())
    }

    /// Checks that both fields are non-empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] naming every blank field.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let errors = FormErrors {
            title: self
                .title
                .trim()
                .is_empty()
                .then(|| TITLE_REQUIRED.to_string()),
            description: self
                .description
                .trim()
                .is_empty()
                .then(|| DESCRIPTION_REQUIRED.to_string()),
        };
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validates and builds a creation draft. Values are passed as typed.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] if validation fails.
    pub fn into_draft(self) -> Result<TaskDraft, FormErrors> {
        self.validate()?;
        Ok(TaskDraft::new(self.title, self.description))
    }

    /// Validates and builds the full record for updating `existing`.
    ///
    /// `id`, `completed` and `created_at` are carried over from the
    /// existing record.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] if validation fails.
    pub fn into_update(self, existing: &Task) -> Result<Task, FormErrors> {
        self.validate()?;
        Ok(Task {
            id: existing.id.clone(),
            title: self.title,
            description: self.description,
            completed: existing.completed,
            created_at: existing.created_at,
        })
    }
}
