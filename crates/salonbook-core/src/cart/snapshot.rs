//! Durable cart snapshot
//!
//! Only identity and user selections survive a reload. Transient fetch
//! state (`available_slots`, `is_loading_slots`) is rebuilt by the
//! coordinator on restore and is deliberately absent from the snapshot.

use serde::{Deserialize, Serialize};

use super::{Cart, ServiceSelection};

/// The persisted subset of a [`Cart`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub salon_id: Option<String>,
    pub salon_name: Option<String>,
    pub services: Vec<ServiceSelection>,
    pub selected_date: Option<String>,
}

impl CartSnapshot {
    /// Capture the durable fields of a cart
    pub fn capture(cart: &Cart) -> Self {
        Self {
            salon_id: cart.salon_id.clone(),
            salon_name: cart.salon_name.clone(),
            services: cart.services().to_vec(),
            selected_date: cart.selected_date.clone(),
        }
    }

    /// Rebuild a cart from the snapshot, with empty transient state
    pub fn restore(self) -> Cart {
        let mut cart = Cart::new();
        if let (Some(id), Some(name)) = (self.salon_id, self.salon_name) {
            cart.set_salon(id, name);
        }
        cart.set_selected_date(self.selected_date);
        for selection in self.services {
            cart.add_service(selection.service.clone());
            cart.update_service_time(&selection.service.id, selection.selected_time);
            cart.update_service_employee(&selection.service.id, selection.selected_employee);
        }
        cart
    }
}
