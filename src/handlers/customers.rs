use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    database::Database,
    models::{new_id, Customer, CustomerUpdate, NewCustomer},
};

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Json<Vec<Customer>> {
    Json(db.read(|doc| doc.customers.clone()).await)
}

pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let now = Utc::now();
    let customer = Customer {
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
            doc.customers.push(customer.clone());
            customer
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<CustomerUpdate>,
) -> Result<Json<Customer>, ApiError> {
    db.write(|doc| {
        let customer = doc.customers.iter_mut().find(|c| c.id == id)?;
        body.apply(customer);
        customer.updated_at = Utc::now();
        Some(customer.clone())
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Customer"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.customers.iter().position(|c| c.id == id)?;
            doc.customers.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Customer")),
    }
}
