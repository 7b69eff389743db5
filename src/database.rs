use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{
    Announcement, Customer, Device, InventoryItem, Receiver, Supplier, Technician, Ticket,
    TicketItem, User,
};

/// The entire backing database: one JSON document, one array per
/// collection. Collections default to empty so a document missing a
/// collection still deserializes.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub customers: Vec<Customer>,
    pub devices: Vec<Device>,
    pub technicians: Vec<Technician>,
    pub receivers: Vec<Receiver>,
    pub suppliers: Vec<Supplier>,
    pub inventory_items: Vec<InventoryItem>,
    pub tickets: Vec<Ticket>,
    pub ticket_items: Vec<TicketItem>,
    pub notifications: Vec<Announcement>,
    pub users: Vec<User>,
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "document store I/O error: {}", e),
            StoreError::Parse(e) => write!(f, "document store parse error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e)
    }
}

/// Handle to the file-backed document store, cloned into every handler
/// via axum state. All mutations are funneled through [`Database::write`],
/// which holds the write lock across the read-modify-write and the file
/// rewrite, so writers are linearized within the process.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    doc: RwLock<Document>,
}

impl Database {
    /// Loads the document from `path`, or starts empty if the file does
    /// not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            inner: Arc::new(Inner {
                path,
                doc: RwLock::new(doc),
            }),
        })
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        let doc = self.inner.doc.read().await;
        f(&doc)
    }

    /// Applies `f` to the document and rewrites the backing file before
    /// releasing the write lock.
    pub async fn write<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T, StoreError> {
        let mut doc = self.inner.doc.write().await;
        let out = f(&mut doc);
        self.persist(&doc)?;
        Ok(out)
    }

    fn persist(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.inner.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_vec_pretty(doc)?;
        std::fs::write(&self.inner.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{new_id, NewCustomer};
    use chrono::Utc;

    fn customer(name: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id: new_id(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("db.json")).unwrap();
        let count = db.read(|doc| doc.customers.len()).await;
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn write_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let db = Database::open(&path).unwrap();
        db.write(|doc| doc.customers.push(customer("ada")))
            .await
            .unwrap();

        let reopened = Database::open(&path).unwrap();
        let names = reopened
            .read(|doc| doc.customers.iter().map(|c| c.name.clone()).collect::<Vec<_>>())
            .await;
        assert_eq!(names, vec!["ada"]);
    }

    #[tokio::test]
    async fn absent_collections_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{"customers": []}"#).unwrap();

        let db = Database::open(&path).unwrap();
        let (tickets, devices) = db
            .read(|doc| (doc.tickets.len(), doc.devices.len()))
            .await;
        assert_eq!((tickets, devices), (0, 0));
    }

    #[test]
    fn new_customer_shape_matches_wire_format() {
        let body: NewCustomer =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com"}"#).unwrap();
        assert_eq!(body.name, "Ada");
        assert!(body.phone.is_none());
    }
}
