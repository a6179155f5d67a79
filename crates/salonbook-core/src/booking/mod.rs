//! Booking records and the booking-creation API
//!
//! A [`Booking`] is the immutable historical record of a confirmed
//! submission; only its status ever changes afterwards. The
//! [`BookingRequest`] is the wire shape sent to the platform: one line
//! item per service, carrying the staff override price/duration rather
//! than the catalog values whenever a staff member was chosen.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{Cart, ServiceSelection};
use crate::error::{Error, Result};

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from the database/wire representation
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(Error::InvalidInput(format!(
                "Unknown booking status: {other}"
            ))),
        }
    }
}

/// A confirmed booking, as recorded in local history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub salon_id: String,
    pub salon_name: String,
    /// Frozen copy of the submitted selections
    pub services: Vec<ServiceSelection>,
    /// "YYYY-MM-DD"
    pub date: String,
    /// Time of the first service, "HH:MM"
    pub time: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Freeze a ready-to-book cart into a history record
    ///
    /// Callers validate readiness first; missing fields are an invariant
    /// violation reported as [`Error::NotReady`].
    pub fn from_cart(cart: &Cart) -> Result<Self> {
        let salon_id = cart
            .salon_id
            .clone()
            .ok_or_else(|| Error::NotReady("no salon selected".to_string()))?;
        let date = cart
            .selected_date
            .clone()
            .ok_or_else(|| Error::NotReady("no date selected".to_string()))?;
        let time = cart
            .services()
            .first()
            .and_then(|s| s.selected_time.clone())
            .ok_or_else(|| Error::NotReady("no time selected".to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            salon_id,
            salon_name: cart.salon_name.clone().unwrap_or_default(),
            services: cart.services().to_vec(),
            date,
            time,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        })
    }
}

/// One service line in a booking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingLineItem {
    pub service_id: String,
    pub service_name: String,
    pub employee_id: String,
    pub employee_name: String,
    /// Combined "YYYY-MM-DDTHH:MM" start
    pub starts_at: String,
    /// Minor units; staff override when one exists
    pub price: i64,
    pub duration_minutes: u32,
}

/// The request sent to the booking-creation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub items: Vec<BookingLineItem>,
}

impl BookingRequest {
    /// Build a request from a ready-to-book cart
    ///
    /// `locale` resolves localized service names. Every service must be
    /// complete; this is an invariant the submission flow has already
    /// checked via `Cart::is_ready_to_book`.
    pub fn from_cart(cart: &Cart, locale: &str) -> Result<Self> {
        let date = cart
            .selected_date
            .as_deref()
            .ok_or_else(|| Error::NotReady("no date selected".to_string()))?;

        let mut items = Vec::with_capacity(cart.services().len());
        for selection in cart.services() {
            let employee = selection.selected_employee.as_ref().ok_or_else(|| {
                Error::NotReady(format!(
                    "no staff member for service {}",
                    selection.service.id
                ))
            })?;
            let time = selection.selected_time.as_deref().ok_or_else(|| {
                Error::NotReady(format!("no time for service {}", selection.service.id))
            })?;

            items.push(BookingLineItem {
                service_id: selection.service.id.clone(),
                service_name: selection.service.name.resolve(locale).to_string(),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                starts_at: format!("{date}T{time}"),
                price: selection.effective_price(),
                duration_minutes: selection.effective_duration(),
            });
        }

        Ok(Self { items })
    }
}

/// Confirmation returned by the booking-creation endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// The booking-creation endpoint
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Submit a booking request scoped to a salon
    async fn create_booking(
        &self,
        salon_id: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation>;
}
