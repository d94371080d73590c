use anyhow::Context;
use chrono::Utc;
use semita_api::{ComplaintId, Notification, NotificationId, NotificationType, ServiceId, Uuid};

use crate::{
    db::{self, Db},
    Error,
};

/// Append a system-generated alert. Only the service tracker and the
/// complaint ledger call this; there is no client-facing create endpoint.
pub async fn push(
    db: &Db,
    kind: NotificationType,
    title: String,
    message: String,
    service_id: Option<ServiceId>,
    complaint_id: Option<ComplaintId>,
) -> anyhow::Result<Notification> {
    let notification = Notification {
        id: NotificationId(Uuid::new_v4()),
        kind,
        title,
        message,
        timestamp: Utc::now(),
        read: false,
        service_id,
        complaint_id,
    };
    db.save(&db::notif_key(&notification.id), &notification)
        .await
        .context("persisting notification")?;
    tracing::debug!(id = %notification.id, ?kind, "notification emitted");
    Ok(notification)
}

/// Newest first. Polled frequently by clients, so this stays a single
/// prefix scan with an in-memory sort.
pub async fn list(db: &Db) -> anyhow::Result<Vec<Notification>> {
    let mut notifications: Vec<Notification> = db
        .fetch_all(db::NOTIF_PREFIX)
        .await
        .context("listing notifications")?
        .into_iter()
        .map(|(_, n)| n)
        .collect();
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(notifications)
}

pub async fn mark_read(db: &Db, id: &NotificationId) -> Result<(), Error> {
    let key = db::notif_key(id);
    let _guard = db.lock(&key).await;
    let mut notification: Notification = db
        .fetch(&key)
        .await
        .with_context(|| format!("fetching notification {id}"))?
        .ok_or_else(|| Error::not_found(format!("notification {id} does not exist")))?;
    notification.read = true;
    db.save(&key, &notification)
        .await
        .with_context(|| format!("persisting notification {id}"))?;
    Ok(())
}

pub async fn mark_all_read(db: &Db) -> anyhow::Result<()> {
    let notifications: Vec<(String, Notification)> = db
        .fetch_all(db::NOTIF_PREFIX)
        .await
        .context("listing notifications")?;
    for (key, mut notification) in notifications {
        if notification.read {
            continue;
        }
        let _guard = db.lock(&key).await;
        notification.read = true;
        db.save(&key, &notification)
            .await
            .with_context(|| format!("persisting notification {key:?}"))?;
    }
    Ok(())
}
