pub mod inventory;
pub mod notification;
pub mod repair;
pub mod shop;
pub mod user;

// Re-export only the types we actually use
pub use inventory::{InventoryItem, InventoryItemUpdate, NewInventoryItem};
pub use notification::{Announcement, NewAnnouncement, Notification, NotificationKind};
pub use repair::{
    Device, DeviceUpdate, NewDevice, NewTicket, ProblemType, Ticket, TicketItem, TicketStatus,
    TicketUpdate,
};
pub use shop::{
    Customer, CustomerUpdate, NewCustomer, NewReceiver, NewSupplier, NewTechnician, Receiver,
    ReceiverUpdate, Supplier, SupplierUpdate, Technician, TechnicianUpdate,
};
pub use user::{LoginRequest, User, UserResponse};

use uuid::Uuid;

/// Opaque record identifier for a freshly created entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
