use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    alerts::{self, Snapshot},
    database::Database,
    models::{new_id, Announcement, NewAnnouncement, Notification},
};

use super::ApiError;

/// Runs every alert rule over the current snapshot. Nothing is stored;
/// polling clients call this on an interval and own read/unread state.
pub async fn analyze(State(db): State<Database>) -> Json<Vec<Notification>> {
    let now = Utc::now();
    let notifications = db
        .read(|doc| {
            let snapshot = Snapshot {
                inventory: &doc.inventory_items,
                tickets: &doc.tickets,
                customers: &doc.customers,
                devices: &doc.devices,
            };
            alerts::analyze(&snapshot, now)
        })
        .await;
    Json(notifications)
}

pub async fn list(State(db): State<Database>) -> Json<Vec<Announcement>> {
    Json(db.read(|doc| doc.notifications.clone()).await)
}

/// Posts a stored notice; newest first, like the dropdown displays them.
pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<Announcement>), ApiError> {
    let announcement = Announcement {
        id: new_id(),
        kind: body.kind,
        title: body.title,
        message: body.message,
        read: false,
        created_at: Utc::now(),
        link: body.link,
    };
    let created = db
        .write(|doc| {
            doc.notifications.insert(0, announcement.clone());
            announcement
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
