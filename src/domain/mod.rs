//! Domain model
//!
//! Entities and input types for events, attendees, entrances and users.
//! Pure data plus small invariant helpers; persistence lives behind the
//! store traits and business rules in the workflows.

pub mod attendee;
pub mod badge;
pub mod entrance;
pub mod event;
pub mod user;

pub use attendee::{Attendee, AttendeeDetails, CheckInRequest, RegisterAttendee};
pub use badge::{BadgeIdSource, RandomBadgeIds};
pub use entrance::{CreateEntrance, Entrance, UpdateEntrance};
pub use event::{CreateEvent, Event, UpdateEvent};
pub use user::{User, ROLE_ADMIN, ROLE_USER};
