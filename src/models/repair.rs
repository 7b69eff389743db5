use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemType {
    Hardware,
    Software,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Received,
    Pending,
    NotRepairable,
    InProgress,
    ReadyToDeliver,
    Completed,
    Cancelled,
}

impl TicketStatus {
    /// Statuses that count as an open repair for overdue checks.
    pub fn is_open(self) -> bool {
        !matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }

    /// Wire-format name, as stored in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Received => "RECEIVED",
            TicketStatus::Pending => "PENDING",
            TicketStatus::NotRepairable => "NOT_REPAIRABLE",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::ReadyToDeliver => "READY_TO_DELIVER",
            TicketStatus::Completed => "COMPLETED",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub unique_id: String,
    pub serial_number: String,
    pub brand: String,
    pub model: String,
    pub problem: Option<String>,
    pub problem_type: Option<ProblemType>,
    pub customer_id: String,
    pub technician_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// First four characters each of brand, model and serial number,
    /// upper-cased and hyphen-joined, e.g. `DELL-LATI-SN01`.
    pub fn derive_unique_id(brand: &str, model: &str, serial_number: &str) -> String {
        let code = |s: &str| s.chars().take(4).collect::<String>().to_uppercase();
        format!(
            "{}-{}-{}",
            code(brand),
            code(model),
            code(serial_number)
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub serial_number: String,
    pub brand: String,
    pub model: String,
    pub problem: Option<String>,
    pub problem_type: Option<ProblemType>,
    pub customer_id: String,
    pub technician_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub problem: Option<String>,
    pub problem_type: Option<ProblemType>,
    pub customer_id: Option<String>,
    pub technician_id: Option<String>,
}

impl DeviceUpdate {
    /// Merges present fields and re-derives `unique_id` from the merged
    /// record. Callers are responsible for cascading a changed
    /// `unique_id` into tickets that embed it.
    pub fn apply(self, device: &mut Device) {
        if let Some(serial_number) = self.serial_number {
            device.serial_number = serial_number;
        }
        if let Some(brand) = self.brand {
            device.brand = brand;
        }
        if let Some(model) = self.model {
            device.model = model;
        }
        if let Some(problem) = self.problem {
            device.problem = Some(problem);
        }
        if let Some(problem_type) = self.problem_type {
            device.problem_type = Some(problem_type);
        }
        if let Some(customer_id) = self.customer_id {
            device.customer_id = customer_id;
        }
        if let Some(technician_id) = self.technician_id {
            device.technician_id = Some(technician_id);
        }
        device.unique_id =
            Device::derive_unique_id(&device.brand, &device.model, &device.serial_number);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub customer_id: String,
    pub technician_id: Option<String>,
    pub received_by_id: Option<String>,
    pub device_id: String,
    pub device_unique_id: Option<String>,
    pub description: String,
    pub diagnosis: Option<String>,
    pub report: Option<String>,
    pub status: TicketStatus,
    pub consultancy_fee: Option<Decimal>,
    pub invoice_total: Option<Decimal>,
    pub received_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Reference point for age-based alerting: the later of creation
    /// and physical receipt.
    pub fn age_reference(&self) -> DateTime<Utc> {
        match self.received_date {
            Some(received) => received.max(self.created_at),
            None => self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub customer_id: String,
    pub technician_id: Option<String>,
    pub received_by_id: Option<String>,
    pub device_id: String,
    pub description: String,
    pub diagnosis: Option<String>,
    pub status: Option<TicketStatus>,
    pub consultancy_fee: Option<Decimal>,
    pub received_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub customer_id: Option<String>,
    pub technician_id: Option<String>,
    pub received_by_id: Option<String>,
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub report: Option<String>,
    pub status: Option<TicketStatus>,
    pub consultancy_fee: Option<Decimal>,
    pub invoice_total: Option<Decimal>,
    pub received_date: Option<DateTime<Utc>>,
}

impl TicketUpdate {
    pub fn apply(self, ticket: &mut Ticket) {
        if let Some(customer_id) = self.customer_id {
            ticket.customer_id = customer_id;
        }
        if let Some(technician_id) = self.technician_id {
            ticket.technician_id = Some(technician_id);
        }
        if let Some(received_by_id) = self.received_by_id {
            ticket.received_by_id = Some(received_by_id);
        }
        if let Some(description) = self.description {
            ticket.description = description;
        }
        if let Some(diagnosis) = self.diagnosis {
            ticket.diagnosis = Some(diagnosis);
        }
        if let Some(report) = self.report {
            ticket.report = Some(report);
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(consultancy_fee) = self.consultancy_fee {
            ticket.consultancy_fee = Some(consultancy_fee);
        }
        if let Some(invoice_total) = self.invoice_total {
            ticket.invoice_total = Some(invoice_total);
        }
        if let Some(received_date) = self.received_date {
            ticket.received_date = Some(received_date);
        }
    }
}

/// Join record tying consumed stock to a ticket; name and price are
/// resolved from the inventory item at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketItem {
    pub id: String,
    pub ticket_id: String,
    pub inventory_item_id: String,
    pub quantity: i32,
}
