//! crewplan: resource booking and capacity-allocation engine.
//!
//! Assigns resources to projects over date ranges with fractional daily-hour
//! allocations, guaranteeing no resource is ever booked beyond its daily
//! capacity across overlapping bookings. Admission is check-then-commit under
//! a per-resource write lock; reads run concurrently against committed
//! snapshots.

pub mod allocation;
pub mod calendar;
pub mod directory;
pub mod engine;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;

pub use directory::Directory;
pub use engine::{BookingFilter, BookingPatch, BookingRequest, Engine, EngineError};
pub use model::{
    AllocationMethod, Booking, BookingId, BookingType, CapacityPreview, DateRange, DayLoad,
    Event, Project, ProjectId, Resource, ResourceId, UtilizationReport,
};
pub use notify::NotifyHub;
