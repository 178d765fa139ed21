//! Registries
//!
//! Ownership layer over the stores: each registry owns one entity kind
//! and its lookup/counter contract. Business orchestration (capacity,
//! duplicates, check-in) lives in the workflows on top of these.

mod attendees;
mod entrances;
mod events;

pub use attendees::AttendeeRegistry;
pub use entrances::EntranceRegistry;
pub use events::EventRegistry;
