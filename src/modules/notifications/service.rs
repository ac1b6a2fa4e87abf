use tracing::{instrument, warn};

use clearance_core::AppError;
use clearance_db::Store;
use clearance_models::{Notification, NotificationId, Recipient};

use crate::metrics::track_notification_dropped;

pub struct NotificationService;

impl NotificationService {
    /// Stores an unread notification for `recipient`.
    #[instrument(skip(store, message))]
    pub async fn send(
        store: &dyn Store,
        recipient: Recipient,
        message: &str,
    ) -> Result<Notification, AppError> {
        let notification = store.create_notification(recipient, message).await?;
        Ok(notification)
    }

    /// Fire-and-forget delivery. A failure is logged and counted, never
    /// returned.
    pub async fn send_best_effort(store: &dyn Store, recipient: Recipient, message: &str) {
        if let Err(e) = Self::send(store, recipient, message).await {
            track_notification_dropped();
            warn!(?recipient, error = %e, "Failed to deliver notification");
        }
    }

    #[instrument(skip(store))]
    pub async fn get_notification(
        store: &dyn Store,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        let notification = store.get_notification(id).await?;
        Ok(notification)
    }

    #[instrument(skip(store))]
    pub async fn list_notifications(
        store: &dyn Store,
        recipient: Recipient,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = store.list_notifications(recipient).await?;
        Ok(notifications)
    }

    /// Idempotent: marking an already read notification succeeds.
    #[instrument(skip(store))]
    pub async fn mark_notification_read(
        store: &dyn Store,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        let notification = store.mark_notification_read(id).await?;
        Ok(notification)
    }
}
