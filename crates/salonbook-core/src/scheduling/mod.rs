//! Scheduling coordination
//!
//! The [`SchedulingCoordinator`] ties the cart, the availability cache,
//! and the catalog API together. It reacts to salon/service/date changes
//! by refreshing staff availability (sequentially, one service at a time,
//! with cache and in-flight de-duplication), fetches the shared time-slot
//! list for the selected date, enforces the time-before-employee selection
//! order, and keeps the durable cart snapshot current when a store is
//! attached.
//!
//! Every context change supersedes the previous cancellation token, so a
//! fetch that was started for an older salon/date/service set discards its
//! result instead of committing stale state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::availability::{cache_key, AvailabilityCache, ServiceAvailability};
use crate::cart::{Cart, CartSnapshot};
use crate::catalog::{CatalogApi, Employee, Service};
use crate::error::{Error, Result};
use crate::storage::CartStore;

/// Orchestrates availability fetching and selection ordering for one
/// booking flow session
pub struct SchedulingCoordinator {
    cart: Cart,
    cache: AvailabilityCache,
    availability: ServiceAvailability,
    catalog: Arc<dyn CatalogApi>,
    store: Option<CartStore>,
    context: CancellationToken,
    active_service: Option<String>,
}

impl SchedulingCoordinator {
    /// Create a coordinator with an empty cart
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            cart: Cart::new(),
            cache: AvailabilityCache::new(),
            availability: ServiceAvailability::new(),
            catalog,
            store: None,
            context: CancellationToken::new(),
            active_service: None,
        }
    }

    /// Attach a durable cart store; the snapshot is saved after every
    /// durable mutation and cleared together with the cart
    pub fn with_store(mut self, store: CartStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The current cart state
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Per-service loading/error/staff maps for the view
    pub fn availability(&self) -> &ServiceAvailability {
        &self.availability
    }

    /// The service currently in focus, if any
    pub fn active_service(&self) -> Option<&str> {
        self.active_service.as_deref()
    }

    /// Move focus to a service explicitly (user tapped its row)
    pub fn set_active_service(&mut self, service_id: impl Into<String>) {
        self.active_service = Some(service_id.into());
    }

    /// The cancellation token guarding the current fetch context
    ///
    /// Superseded (cancelled and replaced) whenever the salon, the service
    /// membership, or the date changes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.context.clone()
    }

    /// Restore a previously persisted cart and refetch availability for it
    pub async fn restore(&mut self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Some(snapshot) = store.load().await? {
            info!(
                salon_id = ?snapshot.salon_id,
                services = snapshot.services.len(),
                "Restoring persisted cart"
            );
            self.cart = snapshot.restore();
            self.supersede_context();
            self.refresh_availability().await;
            self.refresh_slots().await;
        }
        Ok(())
    }

    /// Set the salon this flow books against
    ///
    /// Re-entry with the same salon keeps existing selections.
    pub async fn select_salon(
        &mut self,
        salon_id: impl Into<String>,
        salon_name: impl Into<String>,
    ) -> Result<()> {
        self.cart.set_salon(salon_id, salon_name);
        self.supersede_context();
        self.refresh_availability().await;
        self.persist().await
    }

    /// Add a service to the cart and fetch its staff availability
    pub async fn add_service(&mut self, service: Service) -> Result<()> {
        self.cart.add_service(service);
        self.supersede_context();
        self.refresh_availability().await;
        self.persist().await
    }

    /// Remove a service; in-flight fetches for the old membership are
    /// superseded
    pub async fn remove_service(&mut self, service_id: &str) -> Result<()> {
        self.cart.remove_service(service_id);
        if self.active_service.as_deref() == Some(service_id) {
            self.active_service = None;
        }
        self.supersede_context();
        self.persist().await
    }

    /// Set or clear the selected date
    ///
    /// Staff availability is date-scoped, so every date change clears all
    /// per-service time/staff assignments before refetching.
    pub async fn set_date(&mut self, date: Option<String>) -> Result<()> {
        self.cart.set_selected_date(date);
        self.cart.clear_service_selections();
        self.supersede_context();
        self.refresh_availability().await;
        self.refresh_slots().await;
        self.persist().await
    }

    /// Choose (or clear) a time for a service
    ///
    /// Choosing a time unlocks staff selection for that service. A
    /// previously chosen staff member that the new time invalidates is
    /// left in place; the view renders them unavailable until the user
    /// re-selects.
    pub async fn select_time(&mut self, service_id: &str, time: Option<String>) -> Result<()> {
        if self.cart.service(service_id).is_none() {
            return Err(Error::ServiceNotInCart(service_id.to_string()));
        }
        self.cart.update_service_time(service_id, time);
        self.persist().await
    }

    /// Choose (or clear) a staff member for a service
    ///
    /// Rejected while the service has no time. On a successful choice the
    /// active-service pointer advances to the next incomplete service, if
    /// one exists.
    pub async fn select_employee(
        &mut self,
        service_id: &str,
        employee: Option<Employee>,
    ) -> Result<()> {
        let Some(selection) = self.cart.service(service_id) else {
            return Err(Error::ServiceNotInCart(service_id.to_string()));
        };
        if employee.is_some() && selection.selected_time.is_none() {
            return Err(Error::TimeRequired(service_id.to_string()));
        }

        let chosen = employee.is_some();
        self.cart.update_service_employee(service_id, employee);
        if chosen {
            self.advance_active_service(service_id);
        }
        self.persist().await
    }

    /// Staff who can be booked for a service at its currently chosen time
    ///
    /// The cached per-service staff list intersected with the staff free
    /// at the chosen slot; unfiltered while no time is chosen.
    pub fn bookable_employees(&self, service_id: &str) -> Vec<Employee> {
        let Some(employees) = self.availability.employees(service_id) else {
            return Vec::new();
        };

        let chosen_time = self
            .cart
            .service(service_id)
            .and_then(|s| s.selected_time.as_deref());

        match chosen_time {
            None => employees.clone(),
            Some(time) => {
                let Some(slot) = self.cart.available_slots.iter().find(|s| s.time == time)
                else {
                    return Vec::new();
                };
                employees
                    .iter()
                    .filter(|e| slot.employee_ids.contains(&e.id))
                    .cloned()
                    .collect()
            }
        }
    }

    /// Empty the cart and all derived state, dropping the stored snapshot
    pub async fn clear(&mut self) -> Result<()> {
        self.cart.clear();
        self.availability.reset();
        self.active_service = None;
        self.supersede_context();
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        Ok(())
    }

    /// Refresh staff availability for every service in the cart
    ///
    /// Services are processed sequentially in list order. Cached keys are
    /// reused without a network call, keys with a fetch already in flight
    /// are skipped, and a failure for one service is recorded in its error
    /// slot without aborting the rest. Results are committed only while
    /// the originating context is still current.
    pub async fn refresh_availability(&mut self) {
        let Some(salon_id) = self.cart.salon_id.clone() else {
            return;
        };
        let date = self.cart.selected_date.clone();
        let service_ids: Vec<String> = self
            .cart
            .services()
            .iter()
            .map(|s| s.service.id.clone())
            .collect();
        let token = self.context.clone();
        let catalog = Arc::clone(&self.catalog);

        for service_id in service_ids {
            let key = cache_key(&service_id, date.as_deref());

            if let Some(cached) = self.cache.get(&key) {
                debug!(service_id = %service_id, key = %key, "Availability cache hit");
                self.availability.set_employees(&service_id, cached.clone());
                continue;
            }
            if !self.cache.begin_fetch(&key) {
                debug!(key = %key, "Fetch already in flight, skipping");
                continue;
            }

            self.availability.set_loading(&service_id, true);
            self.availability.clear_error(&service_id);

            let result = catalog
                .employees_for_service(&salon_id, &service_id, date.as_deref())
                .await;

            self.cache.finish_fetch(&key);

            if token.is_cancelled() {
                debug!(service_id = %service_id, "Context superseded, discarding result");
                self.availability.set_loading(&service_id, false);
                return;
            }

            match result {
                Ok(employees) => {
                    debug!(
                        service_id = %service_id,
                        count = employees.len(),
                        "Staff availability fetched"
                    );
                    self.availability.set_employees(&service_id, employees.clone());
                    self.cache.insert(key, employees);
                }
                Err(err) => {
                    warn!(service_id = %service_id, error = %err, "Staff fetch failed");
                    self.availability.set_error(&service_id, err.to_string());
                }
            }
            self.availability.set_loading(&service_id, false);
        }
    }

    /// Fetch the shared time-slot list for the selected date
    ///
    /// Known limitation carried over from the platform: slots are queried
    /// for the first service in the cart only, not intersected across all
    /// selected services. The previous list stays visible while the new
    /// one loads; a failed fetch clears the list and logs a warning.
    pub async fn refresh_slots(&mut self) {
        let (Some(salon_id), Some(date)) =
            (self.cart.salon_id.clone(), self.cart.selected_date.clone())
        else {
            self.cart.set_available_slots(Vec::new());
            return;
        };
        let Some(primary) = self.cart.services().first() else {
            self.cart.set_available_slots(Vec::new());
            return;
        };
        let primary_id = primary.service.id.clone();
        let token = self.context.clone();
        let catalog = Arc::clone(&self.catalog);

        self.cart.set_is_loading_slots(true);

        let result = catalog.available_slots(&salon_id, &date, &primary_id).await;

        if token.is_cancelled() {
            debug!(date = %date, "Context superseded, discarding slot result");
            self.cart.set_is_loading_slots(false);
            return;
        }

        match result {
            Ok(slots) => {
                info!(date = %date, count = slots.len(), "Time slots fetched");
                self.cart.set_available_slots(slots);
            }
            Err(err) => {
                warn!(date = %date, error = %err, "Slot fetch failed, clearing slot list");
                self.cart.set_available_slots(Vec::new());
            }
        }
        self.cart.set_is_loading_slots(false);
    }

    /// Cancel any in-flight fetches for the previous context and start a
    /// fresh one
    fn supersede_context(&mut self) {
        self.context.cancel();
        self.context = CancellationToken::new();
    }

    /// After a staff choice, move focus to the next incomplete service
    fn advance_active_service(&mut self, completed_id: &str) {
        let next = self
            .cart
            .services()
            .iter()
            .find(|s| !s.is_complete())
            .map(|s| s.service.id.clone());
        self.active_service = next.or_else(|| Some(completed_id.to_string()));
    }

    /// Capture and persist the durable snapshot, when a store is attached
    async fn persist(&self) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&CartSnapshot::capture(&self.cart)).await?;
        }
        Ok(())
    }
}
