//! Derives transient operational alerts from the current entity
//! snapshot. Pure function of its inputs and the passed-in clock: no
//! stored state, no memory of previously delivered notifications. Ids
//! are deterministic (rule name + source record id) so callers can
//! deduplicate across repeated derivation calls.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::models::{
    Customer, Device, InventoryItem, Notification, NotificationKind, Ticket, TicketStatus,
};

const OVERDUE_AFTER_DAYS: i64 = 7;
const PENDING_ESCALATION_DAYS: i64 = 3;
const COMPLETED_WINDOW_HOURS: i64 = 24;

/// Borrowed view of the collections the rules read.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub inventory: &'a [InventoryItem],
    pub tickets: &'a [Ticket],
    pub customers: &'a [Customer],
    pub devices: &'a [Device],
}

/// Runs every rule against the snapshot and returns the combined alert
/// list, most recent first. All rules stamp `now`, so the stable sort
/// keeps emission order (rule order, then source-collection order) for
/// ties.
pub fn analyze(snapshot: &Snapshot<'_>, now: DateTime<Utc>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    low_stock(snapshot, now, &mut notifications);
    overdue_tickets(snapshot, now, &mut notifications);
    stale_pending_tickets(snapshot, now, &mut notifications);
    recently_completed(snapshot, now, &mut notifications);
    inactive_devices(snapshot, now, &mut notifications);
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notifications
}

fn customer_name<'a>(snapshot: &Snapshot<'a>, customer_id: &str) -> &'a str {
    snapshot
        .customers
        .iter()
        .find(|c| c.id == customer_id)
        .map(|c| c.name.as_str())
        .unwrap_or("customer")
}

/// Rule 1: every item at or below its reorder level.
fn low_stock(snapshot: &Snapshot<'_>, now: DateTime<Utc>, out: &mut Vec<Notification>) {
    for item in snapshot.inventory.iter().filter(|i| i.is_low_stock()) {
        out.push(Notification {
            id: format!("low-stock-{}", item.id),
            kind: NotificationKind::Warning,
            title: "Low Stock Alert".to_string(),
            message: format!(
                "{} is running low ({} items left, reorder at {})",
                item.name, item.quantity, item.reorder_level
            ),
            read: false,
            created_at: now,
            link: "/inventory".to_string(),
        });
    }
}

/// Rule 2: open tickets older than seven days, measured from the later
/// of creation and physical receipt.
fn overdue_tickets(snapshot: &Snapshot<'_>, now: DateTime<Utc>, out: &mut Vec<Notification>) {
    for ticket in snapshot.tickets {
        if !ticket.status.is_open() {
            continue;
        }
        if now - ticket.age_reference() <= Duration::days(OVERDUE_AFTER_DAYS) {
            continue;
        }
        out.push(Notification {
            id: format!("overdue-{}", ticket.id),
            kind: NotificationKind::Urgent,
            title: "Overdue Repair Ticket".to_string(),
            message: format!(
                "Ticket {} for {} is overdue",
                ticket.id,
                customer_name(snapshot, &ticket.customer_id)
            ),
            read: false,
            created_at: now,
            link: format!("/tickets/{}", ticket.id),
        });
    }
}

/// Rule 3: tickets sitting in PENDING for more than three days.
fn stale_pending_tickets(snapshot: &Snapshot<'_>, now: DateTime<Utc>, out: &mut Vec<Notification>) {
    for ticket in snapshot.tickets {
        if ticket.status != TicketStatus::Pending {
            continue;
        }
        if now - ticket.age_reference() <= Duration::days(PENDING_ESCALATION_DAYS) {
            continue;
        }
        out.push(Notification {
            id: format!("priority-{}", ticket.id),
            kind: NotificationKind::Warning,
            title: "High Priority Ticket".to_string(),
            message: format!(
                "Ticket {} has been pending for over {} days",
                ticket.id, PENDING_ESCALATION_DAYS
            ),
            read: false,
            created_at: now,
            link: format!("/tickets/{}", ticket.id),
        });
    }
}

/// Rule 4: tickets completed within the past 24 hours.
fn recently_completed(snapshot: &Snapshot<'_>, now: DateTime<Utc>, out: &mut Vec<Notification>) {
    for ticket in snapshot.tickets {
        if ticket.status != TicketStatus::Completed {
            continue;
        }
        if now - ticket.updated_at > Duration::hours(COMPLETED_WINDOW_HOURS) {
            continue;
        }
        out.push(Notification {
            id: format!("completed-{}", ticket.id),
            kind: NotificationKind::Success,
            title: "Repair Completed".to_string(),
            message: format!(
                "Ticket {} for {} has been completed",
                ticket.id,
                customer_name(snapshot, &ticket.customer_id)
            ),
            read: false,
            created_at: now,
            link: format!("/tickets/{}", ticket.id),
        });
    }
}

/// Rule 5: devices no ticket has ever referenced.
fn inactive_devices(snapshot: &Snapshot<'_>, now: DateTime<Utc>, out: &mut Vec<Notification>) {
    let referenced: HashSet<&str> = snapshot
        .tickets
        .iter()
        .map(|t| t.device_id.as_str())
        .collect();
    for device in snapshot
        .devices
        .iter()
        .filter(|d| !referenced.contains(d.id.as_str()))
    {
        out.push(Notification {
            id: format!("abandoned-{}", device.id),
            kind: NotificationKind::Info,
            title: "Inactive Device".to_string(),
            message: format!(
                "{} {} has no recent repair tickets",
                device.brand, device.model
            ),
            read: false,
            created_at: now,
            link: "/devices".to_string(),
        });
    }
}

/// View state for an alert dropdown fed by polling [`analyze`] calls.
/// Read/unread flags live here, never in the generator, and a refresh
/// is applied only if no newer refresh has been issued since: each
/// `begin_refresh` hands out a monotonically increasing token, and
/// [`Feed::apply`] discards any response carrying a stale one, so an
/// overlapping manual refresh and poll tick cannot clobber each other
/// out of order.
#[derive(Debug, Default)]
pub struct Feed {
    notifications: Vec<Notification>,
    read_ids: HashSet<String>,
    last_issued: u64,
    last_applied: u64,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for an in-flight refresh.
    pub fn begin_refresh(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// Applies a refresh response. Returns false (and changes nothing)
    /// when a newer refresh was applied in the meantime. Read flags
    /// survive across refreshes keyed by the deterministic alert ids.
    pub fn apply(&mut self, token: u64, notifications: Vec<Notification>) -> bool {
        if token <= self.last_applied {
            return false;
        }
        self.last_applied = token;
        let current: HashSet<&str> = notifications.iter().map(|n| n.id.as_str()).collect();
        self.read_ids.retain(|id| current.contains(id.as_str()));
        self.notifications = notifications;
        true
    }

    pub fn mark_as_read(&mut self, id: &str) {
        if self.notifications.iter().any(|n| n.id == id) {
            self.read_ids.insert(id.to_string());
        }
    }

    pub fn mark_all_read(&mut self) {
        self.read_ids = self.notifications.iter().map(|n| n.id.clone()).collect();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| !self.read_ids.contains(&n.id))
            .count()
    }

    /// Current list with the transient read flags folded in.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .iter()
            .map(|n| Notification {
                read: self.read_ids.contains(&n.id),
                ..n.clone()
            })
            .collect()
    }
}
