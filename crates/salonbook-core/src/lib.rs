//! Salonbook Core Library
//!
//! This crate provides the booking core for Salonbook:
//! - Cart (multi-service selection state, totals, readiness)
//! - Availability (staff-per-service cache with in-flight de-duplication)
//! - Scheduling (fetch orchestration, selection ordering, cancellation)
//! - Submission (auth-gated booking creation and history)
//! - Storage (SQLite cart snapshot + booking history)
//! - Catalog access (HTTP client and collaborator traits)
//!
//! The view layer is an external collaborator: it calls the coordinator's
//! operations and renders the derived state, nothing more.

pub mod availability;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod scheduling;
pub mod session;
pub mod storage;
pub mod submission;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::booking::{Booking, BookingApi, BookingRequest, BookingStatus};
    pub use crate::cart::{Cart, CartSnapshot, SelectionProgress, ServiceSelection};
    pub use crate::catalog::{CatalogApi, Employee, HttpApiClient, Service, TimeSlot};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::scheduling::SchedulingCoordinator;
    pub use crate::session::{LoginOutcome, PendingAction, SessionProvider};
    pub use crate::storage::{BookingHistoryStore, CartStore, Database};
    pub use crate::submission::{ConfirmOutcome, SubmissionFlow};
}
