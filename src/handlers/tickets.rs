use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    database::Database,
    grid::{self, Column, DataGrid, FilterMode, ListQuery},
    models::{new_id, NewTicket, Ticket, TicketStatus, TicketUpdate},
};

use super::ApiError;

fn ticket_columns() -> Vec<Column<Ticket>> {
    vec![
        Column::new("id", "Ticket", |t: &Ticket| Some(t.id.clone()))
            .sortable(|a: &Ticket, b: &Ticket| a.id.cmp(&b.id)),
        Column::new("status", "Status", |t: &Ticket| {
            Some(t.status.as_str().to_string())
        })
        .filter(FilterMode::AutoDerived),
        Column::new("description", "Description", |t: &Ticket| {
            Some(t.description.clone())
        })
        .filter(FilterMode::FreeText),
        Column::new("receivedDate", "Received", |t: &Ticket| {
            Some(t.age_reference().to_rfc3339())
        })
        .sortable(|a: &Ticket, b: &Ticket| a.age_reference().cmp(&b.age_reference())),
    ]
}

fn matches_query(ticket: &Ticket, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let fields = [
        Some(ticket.id.as_str()),
        Some(ticket.description.as_str()),
        ticket.diagnosis.as_deref(),
        ticket.device_unique_id.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle))
}

/// Plain array with no parameters; a grid-computed page when any of the
/// listing parameters are present.
pub async fn list(State(db): State<Database>, Query(query): Query<ListQuery>) -> Response {
    let tickets = db.read(|doc| doc.tickets.clone()).await;
    if query.is_plain() {
        return Json(tickets).into_response();
    }
    let tickets = match &query.q {
        Some(q) if !q.is_empty() => tickets
            .into_iter()
            .filter(|t| matches_query(t, q))
            .collect(),
        _ => tickets,
    };
    let grid = DataGrid::new(ticket_columns(), tickets, |t: &Ticket| Some(t.id.clone()));
    Json(grid::run_query(grid, &query)).into_response()
}

/// Stamps `deviceUniqueId` from the referenced device so the embedded
/// reference matches at creation time; the reference itself stays
/// advisory (a dangling device id is accepted).
pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewTicket>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let now = Utc::now();
    let created = db
        .write(|doc| {
            let device_unique_id = doc
                .devices
                .iter()
                .find(|d| d.id == body.device_id)
                .map(|d| d.unique_id.clone());
            let ticket = Ticket {
                id: new_id(),
                customer_id: body.customer_id,
                technician_id: body.technician_id,
                received_by_id: body.received_by_id,
                device_id: body.device_id,
                device_unique_id,
                description: body.description,
                diagnosis: body.diagnosis,
                report: None,
                status: body.status.unwrap_or(TicketStatus::Received),
                consultancy_fee: body.consultancy_fee,
                invoice_total: None,
                received_date: body.received_date,
                created_at: now,
                updated_at: now,
            };
            doc.tickets.push(ticket.clone());
            ticket
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<TicketUpdate>,
) -> Result<Json<Ticket>, ApiError> {
    db.write(|doc| {
        let ticket = doc.tickets.iter_mut().find(|t| t.id == id)?;
        body.apply(ticket);
        ticket.updated_at = Utc::now();
        Some(ticket.clone())
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Ticket"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.tickets.iter().position(|t| t.id == id)?;
            doc.tickets.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Ticket")),
    }
}

/// A ticket item with name and price resolved from its inventory item
/// at read time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketItemDetail {
    pub id: String,
    pub ticket_id: String,
    pub inventory_item_id: String,
    pub quantity: i32,
    pub name: Option<String>,
    pub price: Decimal,
}

pub async fn items(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TicketItemDetail>>, ApiError> {
    let details = db
        .read(|doc| {
            doc.ticket_items
                .iter()
                .filter(|item| item.ticket_id == id)
                .map(|item| {
                    let inventory = doc
                        .inventory_items
                        .iter()
                        .find(|inv| inv.id == item.inventory_item_id);
                    TicketItemDetail {
                        id: item.id.clone(),
                        ticket_id: item.ticket_id.clone(),
                        inventory_item_id: item.inventory_item_id.clone(),
                        quantity: item.quantity,
                        name: inventory.map(|inv| inv.name.clone()),
                        price: inventory.and_then(|inv| inv.price).unwrap_or(Decimal::ZERO),
                    }
                })
                .collect()
        })
        .await;
    Ok(Json(details))
}

/// Customer-facing tracking view: no internal ids, fees or reports.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTicket {
    pub id: String,
    pub status: TicketStatus,
    pub customer_name: String,
    pub device: String,
    pub description: String,
    pub diagnosis: Option<String>,
    pub received_date: DateTime<Utc>,
    pub technician: Option<String>,
}

pub async fn public(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<PublicTicket>, ApiError> {
    db.read(|doc| {
        let ticket = doc.tickets.iter().find(|t| t.id == id)?;
        let customer = doc.customers.iter().find(|c| c.id == ticket.customer_id);
        let device = doc.devices.iter().find(|d| d.id == ticket.device_id);
        let technician = ticket
            .technician_id
            .as_ref()
            .and_then(|tid| doc.technicians.iter().find(|t| t.id == *tid));

        Some(PublicTicket {
            id: ticket.id.clone(),
            status: ticket.status,
            customer_name: customer
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            device: device
                .map(|d| format!("{} {}", d.brand, d.model))
                .unwrap_or_else(|| "Unknown Device".to_string()),
            description: ticket.description.clone(),
            diagnosis: ticket.diagnosis.clone(),
            received_date: ticket.received_date.unwrap_or(ticket.created_at),
            technician: technician.map(|t| t.name.clone()),
        })
    })
    .await
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Ticket"))
}
