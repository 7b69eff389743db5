use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    database::Database,
    models::{new_id, NewSupplier, Supplier, SupplierUpdate},
};

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Json<Vec<Supplier>> {
    Json(db.read(|doc| doc.suppliers.clone()).await)
}

pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewSupplier>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    let now = Utc::now();
    let supplier = Supplier {
        id: new_id(),
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        created_at: now,
        updated_at: now,
    };
    let created = db
        .write(|doc| {
            doc.suppliers.push(supplier.clone());
            supplier
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<SupplierUpdate>,
) -> Result<Json<Supplier>, ApiError> {
    db.write(|doc| {
        let supplier = doc.suppliers.iter_mut().find(|s| s.id == id)?;
        body.apply(supplier);
        supplier.updated_at = Utc::now();
        Some(supplier.clone())
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Supplier"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.suppliers.iter().position(|s| s.id == id)?;
            doc.suppliers.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Supplier")),
    }
}
