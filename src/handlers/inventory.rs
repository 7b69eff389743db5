use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::{
    database::Database,
    grid::{self, Column, DataGrid, FilterMode, ListQuery},
    models::{new_id, InventoryItem, InventoryItemUpdate, NewInventoryItem},
};

use super::ApiError;

fn inventory_columns() -> Vec<Column<InventoryItem>> {
    vec![
        Column::new("name", "Name", |i: &InventoryItem| Some(i.name.clone()))
            .sortable(|a: &InventoryItem, b: &InventoryItem| a.name.cmp(&b.name))
            .filter(FilterMode::FreeText),
        Column::new("brand", "Brand", |i: &InventoryItem| i.brand.clone())
            .filter(FilterMode::AutoDerived),
        Column::new("category", "Category", |i: &InventoryItem| {
            i.category.clone()
        })
        .filter(FilterMode::AutoDerived),
        Column::new("quantity", "Quantity", |i: &InventoryItem| {
            Some(i.quantity.to_string())
        })
        .sortable(|a: &InventoryItem, b: &InventoryItem| a.quantity.cmp(&b.quantity)),
    ]
}

fn matches_query(item: &InventoryItem, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let fields = [
        Some(item.name.as_str()),
        item.brand.as_deref(),
        item.model.as_deref(),
        item.category.as_deref(),
        item.serial_number.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle))
}

/// Plain array with no parameters; a grid-computed page when any of the
/// listing parameters are present.
pub async fn list(State(db): State<Database>, Query(query): Query<ListQuery>) -> Response {
    let items = db.read(|doc| doc.inventory_items.clone()).await;
    if query.is_plain() {
        return Json(items).into_response();
    }
    let items = match &query.q {
        Some(q) if !q.is_empty() => items.into_iter().filter(|i| matches_query(i, q)).collect(),
        _ => items,
    };
    let grid = DataGrid::new(inventory_columns(), items, |i: &InventoryItem| {
        Some(i.id.clone())
    });
    Json(grid::run_query(grid, &query)).into_response()
}

pub async fn create(
    State(db): State<Database>,
    Json(body): Json<NewInventoryItem>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let now = Utc::now();
    let item = InventoryItem {
        id: new_id(),
        name: body.name,
        brand: body.brand,
        model: body.model,
        serial_number: body.serial_number,
        category: body.category,
        description: body.description,
        quantity: body.quantity,
        reorder_level: body.reorder_level,
        price: body.price,
        supplier_id: body.supplier_id,
        created_at: now,
        updated_at: now,
    };
    let created = db
        .write(|doc| {
            doc.inventory_items.push(item.clone());
            item
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<InventoryItemUpdate>,
) -> Result<Json<InventoryItem>, ApiError> {
    db.write(|doc| {
        let item = doc.inventory_items.iter_mut().find(|i| i.id == id)?;
        body.apply(item);
        item.updated_at = Utc::now();
        Some(item.clone())
    })
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Inventory item"))
}

pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = db
        .write(|doc| {
            let index = doc.inventory_items.iter().position(|i| i.id == id)?;
            doc.inventory_items.remove(index);
            Some(())
        })
        .await?;
    match removed {
        Some(()) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found("Inventory item")),
    }
}
