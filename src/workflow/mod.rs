//! Workflows
//!
//! Orchestration of registration and check-in on top of the registries.
//! These are where the capacity, duplicate-email and double-check-in
//! rules live.

mod checkin;
mod registration;

pub use checkin::CheckInWorkflow;
pub use registration::{
    BulkErrors, BulkRowError, BulkSuccess, BulkSummary, BulkUpload, BulkUploadResult,
    RegistrationWorkflow,
};
