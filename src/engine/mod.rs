mod admission;
mod capacity;
mod error;
mod queries;
mod report;

pub use admission::{BookingPatch, BookingRequest};
pub use error::EngineError;
pub use queries::BookingFilter;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::directory::Directory;
use crate::model::*;
use crate::notify::NotifyHub;

pub type SharedLedger = Arc<RwLock<ResourceLedger>>;

/// The booking engine. One ledger per directory resource; the ledger's write
/// guard is the admission critical section, held from capacity check through
/// commit, so concurrent admissions for the same resource serialize and the
/// later one observes the earlier commit.
pub struct Engine {
    pub(super) directory: Directory,
    pub(super) ledgers: DashMap<ResourceId, SharedLedger>,
    /// Reverse lookup: booking id → resource id.
    pub(super) booking_index: DashMap<BookingId, ResourceId>,
    pub notify: Arc<NotifyHub>,
    /// Monotonically increasing, never reused, even after deletes.
    next_booking_id: AtomicI64,
}

impl Engine {
    pub fn new(directory: Directory, notify: Arc<NotifyHub>) -> Self {
        let ledgers = DashMap::new();
        for resource in directory.resources() {
            let id = resource.id;
            ledgers.insert(id, Arc::new(RwLock::new(ResourceLedger::new(resource))));
        }
        Self {
            directory,
            ledgers,
            booking_index: DashMap::new(),
            notify,
            next_booking_id: AtomicI64::new(1),
        }
    }

    pub(super) fn ledger(&self, id: ResourceId) -> Option<SharedLedger> {
        self.ledgers.get(&id).map(|e| e.value().clone())
    }

    pub(super) fn resource_for_booking(&self, id: BookingId) -> Option<ResourceId> {
        self.booking_index.get(&id).map(|e| *e.value())
    }

    pub(super) fn allocate_booking_id(&self) -> BookingId {
        self.next_booking_id.fetch_add(1, Ordering::Relaxed)
    }
}
