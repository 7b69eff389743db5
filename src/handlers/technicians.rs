use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    database::Database,
    models::{new_id, NewTechnician, Technician, TechnicianUpdate},
};

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Json<Vec<Technician>> {
    Json(db.read(|doc| doc.technicians.clone()).await)
}

pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewTechnician>,
) -> Result<(StatusCode, Json<Technician>), ApiError> {
    let now = Utc::now();
    let technician = Technician {
        id: new_id(),
        name: body.name,
        email: body.email,
        created_at: now,
        updated_at: now,
    };
    let created = db
        .write(|doc| {
            doc.technicians.push(technician.clone());
            technician
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<TechnicianUpdate>,
) -> Result<Json<Technician>, ApiError> {
    db.write(|doc| {
        let technician = doc.technicians.iter_mut().find(|t| t.id == id)?;
        body.apply(technician);
        technician.updated_at = Utc::now();
        Some(technician.clone())
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Technician"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.technicians.iter().position(|t| t.id == id)?;
            doc.technicians.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Technician")),
    }
}
