//! Booking cart state
//!
//! The cart is a pure state container: no I/O, no async. It holds the
//! in-progress selection for one salon visit — which services, which date,
//! and per service which time and staff member. Orchestration (fetching,
//! invalidation pairing, persistence) belongs to the scheduling
//! coordinator; the cart only enforces local shape invariants such as
//! service-id uniqueness.

pub mod snapshot;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Employee, Service, TimeSlot};

pub use snapshot::CartSnapshot;

/// Per-service selection progress
///
/// A time must be chosen before a staff member; there is no
/// employee-without-time state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionProgress {
    Unselected,
    TimeChosen,
    Complete,
}

/// A service in the cart together with its selection state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub service: Service,
    pub selected_employee: Option<Employee>,
    /// "HH:MM"
    pub selected_time: Option<String>,
}

impl ServiceSelection {
    /// Wrap a catalog service with empty selection state
    pub fn new(service: Service) -> Self {
        Self {
            service,
            selected_employee: None,
            selected_time: None,
        }
    }

    /// Current progress through the time-then-employee selection order
    pub fn progress(&self) -> SelectionProgress {
        match (&self.selected_time, &self.selected_employee) {
            (None, _) => SelectionProgress::Unselected,
            (Some(_), None) => SelectionProgress::TimeChosen,
            (Some(_), Some(_)) => SelectionProgress::Complete,
        }
    }

    /// Whether both time and staff member are chosen
    pub fn is_complete(&self) -> bool {
        self.progress() == SelectionProgress::Complete
    }

    /// Price for this line in minor units, preferring the staff override
    pub fn effective_price(&self) -> i64 {
        self.selected_employee
            .as_ref()
            .and_then(|e| e.price)
            .unwrap_or_else(|| self.service.price.minor_units())
    }

    /// Duration for this line in minutes, preferring the staff override
    pub fn effective_duration(&self) -> u32 {
        self.selected_employee
            .as_ref()
            .and_then(|e| e.duration_minutes)
            .unwrap_or(self.service.duration_minutes)
    }

    /// Drop the time/staff assignment, returning the service to Unselected
    pub fn reset_selection(&mut self) {
        self.selected_employee = None;
        self.selected_time = None;
    }
}

/// The in-progress booking selection for one salon visit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub salon_id: Option<String>,
    pub salon_name: Option<String>,
    services: Vec<ServiceSelection>,
    pub selected_date: Option<String>,
    pub available_slots: Vec<TimeSlot>,
    /// Transient fetch flag; never persisted
    pub is_loading_slots: bool,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the salon this cart belongs to
    ///
    /// Re-entering the same salon keeps existing selections.
    pub fn set_salon(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.salon_id = Some(id.into());
        self.salon_name = Some(name.into());
    }

    /// Append a service with empty selection state
    ///
    /// Adding a service whose id is already present is a no-op.
    pub fn add_service(&mut self, service: Service) {
        if self.services.iter().any(|s| s.service.id == service.id) {
            debug!(service_id = %service.id, "Service already in cart, ignoring");
            return;
        }
        self.services.push(ServiceSelection::new(service));
    }

    /// Remove a service by id; absent ids are ignored
    pub fn remove_service(&mut self, service_id: &str) {
        self.services.retain(|s| s.service.id != service_id);
    }

    /// Replace the staff assignment for a service; no-op if absent
    pub fn update_service_employee(&mut self, service_id: &str, employee: Option<Employee>) {
        if let Some(selection) = self.service_mut(service_id) {
            selection.selected_employee = employee;
        }
    }

    /// Replace the time assignment for a service; no-op if absent
    pub fn update_service_time(&mut self, service_id: &str, time: Option<String>) {
        if let Some(selection) = self.service_mut(service_id) {
            selection.selected_time = time;
        }
    }

    /// Set or clear the selected date
    ///
    /// Staff availability is date-scoped, so the caller (the coordinator)
    /// pairs every date change with [`Cart::clear_service_selections`].
    pub fn set_selected_date(&mut self, date: Option<String>) {
        self.selected_date = date;
    }

    /// Drop every service's time/staff assignment
    pub fn clear_service_selections(&mut self) {
        for selection in &mut self.services {
            selection.reset_selection();
        }
    }

    /// Replace the fetched slot list
    pub fn set_available_slots(&mut self, slots: Vec<TimeSlot>) {
        self.available_slots = slots;
    }

    /// Set the transient slot-loading flag
    pub fn set_is_loading_slots(&mut self, loading: bool) {
        self.is_loading_slots = loading;
    }

    /// The ordered service selections
    pub fn services(&self) -> &[ServiceSelection] {
        &self.services
    }

    /// Look up a selection by service id
    pub fn service(&self, service_id: &str) -> Option<&ServiceSelection> {
        self.services.iter().find(|s| s.service.id == service_id)
    }

    fn service_mut(&mut self, service_id: &str) -> Option<&mut ServiceSelection> {
        self.services.iter_mut().find(|s| s.service.id == service_id)
    }

    /// Total price in minor units, with staff overrides preferred
    pub fn total_price(&self) -> i64 {
        self.services.iter().map(|s| s.effective_price()).sum()
    }

    /// Total duration in minutes, with staff overrides preferred
    pub fn total_duration(&self) -> u32 {
        self.services.iter().map(|s| s.effective_duration()).sum()
    }

    /// Whether the cart can be submitted: salon and date set, at least one
    /// service, and every service has both a time and a staff member
    pub fn is_ready_to_book(&self) -> bool {
        self.salon_id.is_some()
            && self.selected_date.is_some()
            && !self.services.is_empty()
            && self.services.iter().all(ServiceSelection::is_complete)
    }

    /// Reset to an empty cart
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
