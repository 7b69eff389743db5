use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: i32,
    pub reorder_level: i32,
    pub price: Option<Decimal>,
    pub supplier_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: i32,
    pub reorder_level: i32,
    pub price: Option<Decimal>,
    pub supplier_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub reorder_level: Option<i32>,
    pub price: Option<Decimal>,
    pub supplier_id: Option<String>,
}

impl InventoryItemUpdate {
    pub fn apply(self, item: &mut InventoryItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(brand) = self.brand {
            item.brand = Some(brand);
        }
        if let Some(model) = self.model {
            item.model = Some(model);
        }
        if let Some(serial_number) = self.serial_number {
            item.serial_number = Some(serial_number);
        }
        if let Some(category) = self.category {
            item.category = Some(category);
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(reorder_level) = self.reorder_level {
            item.reorder_level = reorder_level;
        }
        if let Some(price) = self.price {
            item.price = Some(price);
        }
        if let Some(supplier_id) = self.supplier_id {
            item.supplier_id = Some(supplier_id);
        }
    }
}
