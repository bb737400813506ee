use std::time::Duration;

/// How long a one-shot popup stays up.
pub const POPUP_LENGTH: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Information,
    Warning,
}

/// One-shot popup shown on the local instance.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: NotificationSeverity,
    pub popup_length: Duration,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: NotificationSeverity::Information,
            popup_length: POPUP_LENGTH,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: NotificationSeverity::Warning,
            popup_length: POPUP_LENGTH,
        }
    }
}
