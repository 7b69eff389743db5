use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    database::Database,
    models::{new_id, Customer, Device, DeviceUpdate, NewDevice, TicketStatus},
};

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Json<Vec<Device>> {
    Json(db.read(|doc| doc.devices.clone()).await)
}

pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewDevice>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let now = Utc::now();
    let unique_id = Device::derive_unique_id(&body.brand, &body.model, &body.serial_number);
    let device = Device {
        id: new_id(),
        unique_id,
        serial_number: body.serial_number,
        brand: body.brand,
        model: body.model,
        problem: body.problem,
        problem_type: body.problem_type,
        customer_id: body.customer_id,
        technician_id: body.technician_id,
        created_at: now,
        updated_at: now,
    };
    let created = db
        .write(|doc| {
            doc.devices.push(device.clone());
            device
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Merges the update, re-derives `uniqueId`, and cascades a changed
/// `uniqueId` into every ticket referencing the device so embedded
/// references never go stale.
pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<DeviceUpdate>,
) -> Result<Json<Device>, ApiError> {
    db.write(|doc| {
        let device = doc.devices.iter_mut().find(|d| d.id == id)?;
        body.apply(device);
        device.updated_at = Utc::now();
        let updated = device.clone();
        for ticket in doc.tickets.iter_mut().filter(|t| t.device_id == id) {
            ticket.device_unique_id = Some(updated.unique_id.clone());
        }
        Some(updated)
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Device"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.devices.iter().position(|d| d.id == id)?;
            doc.devices.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Device")),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub device_id: String,
    pub device_unique_id: String,
    pub ticket_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub technician_id: Option<String>,
    pub technician_name: Option<String>,
    pub problem_description: String,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub status: TicketStatus,
    pub consultancy_fee: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub received_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceHistoryResponse {
    pub device: Device,
    pub history: Vec<HistoryEntry>,
    pub total_repairs: usize,
    pub total_revenue: Decimal,
    pub customer: Option<Customer>,
}

/// Reporting join: every ticket for the device, enriched with customer
/// and technician names, newest received first, with repair and revenue
/// totals (revenue counts COMPLETED tickets only).
pub async fn history(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<DeviceHistoryResponse>, ApiError> {
    db.read(|doc| {
        let device = doc.devices.iter().find(|d| d.id == id)?.clone();

        let mut history: Vec<HistoryEntry> = doc
            .tickets
            .iter()
            .filter(|t| t.device_id == id)
            .map(|ticket| {
                let customer = doc.customers.iter().find(|c| c.id == ticket.customer_id);
                let technician = ticket
                    .technician_id
                    .as_ref()
                    .and_then(|tid| doc.technicians.iter().find(|t| t.id == *tid));
                HistoryEntry {
                    id: ticket.id.clone(),
                    device_id: ticket.device_id.clone(),
                    device_unique_id: device.unique_id.clone(),
                    ticket_id: ticket.id.clone(),
                    customer_id: ticket.customer_id.clone(),
                    customer_name: customer.map(|c| c.name.clone()),
                    technician_id: ticket.technician_id.clone(),
                    technician_name: technician.map(|t| t.name.clone()),
                    problem_description: ticket.description.clone(),
                    diagnosis: ticket.diagnosis.clone(),
                    solution: ticket.report.clone(),
                    status: ticket.status,
                    consultancy_fee: ticket.consultancy_fee,
                    total_cost: ticket.invoice_total,
                    received_date: ticket.received_date.unwrap_or(ticket.created_at),
                    completed_date: (ticket.status == TicketStatus::Completed)
                        .then_some(ticket.updated_at),
                    created_at: ticket.created_at,
                }
            })
            .collect();

        let total_repairs = history.len();
        let total_revenue = history
            .iter()
            .filter(|h| h.status == TicketStatus::Completed)
            .filter_map(|h| h.total_cost)
            .sum();

        history.sort_by(|a, b| b.received_date.cmp(&a.received_date));

        let customer = doc
            .customers
            .iter()
            .find(|c| c.id == device.customer_id)
            .cloned();

        Some(DeviceHistoryResponse {
            device,
            history,
            total_repairs,
            total_revenue,
            customer,
        })
    })
    .await
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Device"))
}
