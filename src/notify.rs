use crate::sync::BatchOutcome;
use notify_rust::{Notification, Urgency};

/// Desktop notification when a batch delete finishes. Critical urgency when
/// anything failed so the toast sticks around.
pub fn send_batch_result(outcome: &BatchOutcome) {
    let (summary, icon, urgency) = if outcome.failed.is_empty() {
        ("Cleanup finished", "dialog-information", Urgency::Normal)
    } else {
        ("Cleanup incomplete", "dialog-error", Urgency::Critical)
    };

    let mut body = outcome.summary();
    if let Some(first) = outcome.failed.first() {
        body.push_str(&format!("\nFailed: {}", first.full_name));
        if outcome.failed.len() > 1 {
            body.push_str(&format!(" (+{} more)", outcome.failed.len() - 1));
        }
    }

    let _ = Notification::new()
        .summary(summary)
        .body(&body)
        .icon(icon)
        .urgency(urgency)
        .show();
}
