//! Plain-text rendering of tasks and notifications for the command line.

use std::fmt::Write as _;

use chrono::Local;
use taskdeck_proto::task::Task;

use crate::notify::Notification;

/// Formats one task as a list line: `[x] <id>  <title>: <description> (<created>)`.
///
/// An invalid `timestamp_format` falls back to RFC 3339.
#[must_use]
pub fn task_line(task: &Task, timestamp_format: &str) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let local = task.created_at.with_timezone(&Local);
    let mut created = String::new();
    if write!(created, "{}", local.format(timestamp_format)).is_err() {
        created = local.to_rfc3339();
    }
    format!(
        "[{mark}] {}  {}: {} ({created})",
        task.id, task.title, task.description
    )
}

/// Formats the whole list, or a placeholder when empty.
#[must_use]
pub fn task_list(tasks: &[Task], timestamp_format: &str) -> String {
    if tasks.is_empty() {
        return "No tasks yet. Add one with `taskdeck add`.".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "{}", task_line(task, timestamp_format));
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    let _ = write!(out, "{done}/{} completed", tasks.len());
    out
}

/// Formats a notification as a single line.
#[must_use]
pub fn notification_line(notification: &Notification) -> String {
    let marker = if notification.is_destructive() { "!" } else { "*" };
    format!(
        "{marker} {}: {}",
        notification.title, notification.description
    )
}
