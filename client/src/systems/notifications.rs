use crate::systems::labels;
use bevy::prelude::{App, EventReader, IntoSystemConfig, Plugin};
use hns_common::notification::{Notification, NotificationSeverity};
use tracing::{info, warn};

/// Drains notifications to the log. A host popup widget showed these in
/// the original gamemode; structured log lines are the standalone analog.
pub struct NotificationPlugin;

impl Plugin for NotificationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Notification>()
            .add_system(show_notifications.after(labels::Round));
    }
}

fn show_notifications(mut notifications: EventReader<Notification>) {
    for notification in notifications.iter() {
        let secs = notification.popup_length.as_secs();

        match notification.severity {
            NotificationSeverity::Information => {
                info!("[{}] {} ({}s)", notification.title, notification.message, secs);
            },
            NotificationSeverity::Warning => {
                warn!("[{}] {} ({}s)", notification.title, notification.message, secs);
            },
        }
    }
}
