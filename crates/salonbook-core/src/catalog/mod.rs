//! Salon catalog access
//!
//! This module provides the value types delivered by the catalog API and
//! the [`CatalogApi`] trait the coordinator fetches through. The concrete
//! HTTP implementation lives in [`client`]; tests substitute mocks.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::{HttpApiClient, HttpApiClientBuilder};
pub use types::{Employee, EmployeesResponse, LocalizedText, Price, Service, SlotsResponse, TimeSlot};

/// Availability queries against the salon catalog
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch the staff who can perform a service, with their per-service
    /// price/duration overrides. `date` scopes the result to a working day.
    async fn employees_for_service(
        &self,
        salon_id: &str,
        service_id: &str,
        date: Option<&str>,
    ) -> Result<Vec<Employee>>;

    /// Fetch the bookable time slots for a date. Slot availability is
    /// computed salon-wide for the given representative service.
    async fn available_slots(
        &self,
        salon_id: &str,
        date: &str,
        service_id: &str,
    ) -> Result<Vec<TimeSlot>>;
}
