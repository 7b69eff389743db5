use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    database::Database,
    models::{new_id, NewReceiver, Receiver, ReceiverUpdate},
};

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Json<Vec<Receiver>> {
    Json(db.read(|doc| doc.receivers.clone()).await)
}

pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewReceiver>,
) -> Result<(StatusCode, Json<Receiver>), ApiError> {
    let now = Utc::now();
    let receiver = Receiver {
        id: new_id(),
        name: body.name,
        email: body.email,
        created_at: now,
        updated_at: now,
    };
    let created = db
        .write(|doc| {
            doc.receivers.push(receiver.clone());
            receiver
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<ReceiverUpdate>,
) -> Result<Json<Receiver>, ApiError> {
    db.write(|doc| {
        let receiver = doc.receivers.iter_mut().find(|r| r.id == id)?;
        body.apply(receiver);
        receiver.updated_at = Utc::now();
        Some(receiver.clone())
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Receiver"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.receivers.iter().position(|r| r.id == id)?;
            doc.receivers.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Receiver")),
    }
}
