//! Catalog value types
//!
//! Services, staff, and time slots as returned by the salon catalog API.
//! These are immutable once fetched; all selection state lives in the cart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A display name that may be provided per language
///
/// The upstream API returns either a plain string or a map of language
/// tags, so both shapes deserialize into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    PerLanguage(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Create a plain, untranslated text
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Resolve the text for a language tag, falling back to any
    /// available translation
    pub fn resolve(&self, lang: &str) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::PerLanguage(map) => map
                .get(lang)
                .or_else(|| map.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// A price as delivered by the catalog
///
/// Older catalog records carry formatted strings ("40,000 RSD"), newer
/// ones carry integer minor units. Totals always go through
/// [`Price::minor_units`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(i64),
    Text(String),
}

impl Price {
    /// Parse the price into integer minor units
    ///
    /// String prices keep only their digits; anything unparseable is 0.
    pub fn minor_units(&self) -> i64 {
        match self {
            Self::Amount(amount) => *amount,
            Self::Text(text) => {
                let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
                digits.parse().unwrap_or(0)
            }
        }
    }
}

/// A bookable catalog offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: LocalizedText,
    pub duration_minutes: u32,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A staff member, as returned by a per-service availability query
///
/// `price` and `duration_minutes` are overrides for the queried service:
/// the same person may charge differently per service. When present they
/// take precedence over the catalog values in totals and in the booking
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// A specific time on the selected date, with the staff free at that time
///
/// Slots are computed salon-wide per date; `employee_ids` is shared across
/// every service requested on that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// "HH:MM"
    pub time: String,
    #[serde(default)]
    pub employee_ids: Vec<String>,
}

/// Response envelope for the employees-for-service endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesResponse {
    pub employees: Vec<Employee>,
}

/// Response envelope for the slots-for-date endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SlotsResponse {
    pub slots: Vec<TimeSlot>,
}
