//! Staff availability cache
//!
//! Caches employees-for-service results keyed by `(service, date)` so that
//! revisiting a date never re-issues the network call, and tracks which
//! keys are currently being fetched so concurrent refreshes de-duplicate.
//! The cache is owned by the coordinator instance; nothing here is global.
//! Entries are never expired, only superseded by a newer fetch for the
//! same key.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::catalog::Employee;

/// Cache key for a `(service, date)` pair
pub fn cache_key(service_id: &str, date: Option<&str>) -> String {
    format!("{}-{}", service_id, date.unwrap_or("no-date"))
}

/// In-memory availability cache with in-flight de-duplication
#[derive(Debug, Default)]
pub struct AvailabilityCache {
    entries: HashMap<String, Vec<Employee>>,
    in_flight: HashSet<String>,
}

impl AvailabilityCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached staff list
    pub fn get(&self, key: &str) -> Option<&Vec<Employee>> {
        self.entries.get(key)
    }

    /// Store a fetched staff list, replacing any previous entry
    pub fn insert(&mut self, key: String, employees: Vec<Employee>) {
        debug!(key = %key, count = employees.len(), "Caching staff availability");
        self.entries.insert(key, employees);
    }

    /// Mark a key as having a fetch in flight; returns false if one
    /// already is, in which case the caller skips the duplicate request
    pub fn begin_fetch(&mut self, key: &str) -> bool {
        self.in_flight.insert(key.to_string())
    }

    /// Clear the in-flight mark for a key
    pub fn finish_fetch(&mut self, key: &str) {
        self.in_flight.remove(key);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-service fetch state exposed to the view
///
/// Loading and error state is keyed by service id so the view can render
/// partial failure: one service's fetch failing never blocks the others.
#[derive(Debug, Default)]
pub struct ServiceAvailability {
    employees: HashMap<String, Vec<Employee>>,
    loading: HashSet<String>,
    errors: HashMap<String, String>,
}

impl ServiceAvailability {
    /// Create empty per-service state
    pub fn new() -> Self {
        Self::default()
    }

    /// The staff list currently known for a service
    pub fn employees(&self, service_id: &str) -> Option<&Vec<Employee>> {
        self.employees.get(service_id)
    }

    /// Replace the staff list for a service
    pub fn set_employees(&mut self, service_id: &str, employees: Vec<Employee>) {
        self.employees.insert(service_id.to_string(), employees);
    }

    /// Whether a service's staff list is being fetched
    pub fn is_loading(&self, service_id: &str) -> bool {
        self.loading.contains(service_id)
    }

    /// Mark or clear the loading flag for a service
    pub fn set_loading(&mut self, service_id: &str, loading: bool) {
        if loading {
            self.loading.insert(service_id.to_string());
        } else {
            self.loading.remove(service_id);
        }
    }

    /// The fetch error for a service, if its last fetch failed
    pub fn error(&self, service_id: &str) -> Option<&str> {
        self.errors.get(service_id).map(String::as_str)
    }

    /// Record a per-service fetch error
    pub fn set_error(&mut self, service_id: &str, message: impl Into<String>) {
        self.errors.insert(service_id.to_string(), message.into());
    }

    /// Drop any stale error for a service
    pub fn clear_error(&mut self, service_id: &str) {
        self.errors.remove(service_id);
    }

    /// Drop all per-service state (on cart clear or salon change)
    pub fn reset(&mut self) {
        self.employees.clear();
        self.loading.clear();
        self.errors.clear();
    }
}
