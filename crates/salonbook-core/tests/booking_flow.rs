//! End-to-end booking flow tests
//!
//! Exercises the public API the way a host application would: assemble a
//! cart through the coordinator, confirm through the submission flow, and
//! observe history and persistence.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use salonbook_core::booking::{BookingApi, BookingConfirmation, BookingRequest};
use salonbook_core::catalog::{
    CatalogApi, Employee, LocalizedText, Price, Service, TimeSlot,
};
use salonbook_core::prelude::*;
use salonbook_core::session::{LoginOutcome, SessionProvider};

struct FakeCatalog {
    employee_calls: AtomicUsize,
}

impl FakeCatalog {
    fn new() -> Self {
        Self {
            employee_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn employees_for_service(
        &self,
        _salon_id: &str,
        service_id: &str,
        _date: Option<&str>,
    ) -> Result<Vec<Employee>> {
        self.employee_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            Employee {
                id: "e1".into(),
                name: "Mina".into(),
                position: Some("Senior stylist".into()),
                price: if service_id == "1" { Some(45000) } else { None },
                duration_minutes: None,
            },
            Employee {
                id: "e2".into(),
                name: "Luka".into(),
                position: None,
                price: None,
                duration_minutes: Some(50),
            },
        ])
    }

    async fn available_slots(
        &self,
        _salon_id: &str,
        _date: &str,
        _service_id: &str,
    ) -> Result<Vec<TimeSlot>> {
        Ok(vec![
            TimeSlot {
                time: "14:00".into(),
                employee_ids: vec!["e1".into(), "e2".into()],
            },
            TimeSlot {
                time: "16:00".into(),
                employee_ids: vec!["e2".into()],
            },
        ])
    }
}

#[derive(Default)]
struct FakeBookingApi {
    calls: AtomicUsize,
}

#[async_trait]
impl BookingApi for FakeBookingApi {
    async fn create_booking(
        &self,
        _salon_id: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!request.items.is_empty());
        Ok(BookingConfirmation {
            booking_id: "remote-42".into(),
            status: Some("pending".into()),
        })
    }
}

struct FakeSession {
    authenticated: AtomicBool,
}

#[async_trait]
impl SessionProvider for FakeSession {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

fn haircut() -> Service {
    Service {
        id: "1".into(),
        name: LocalizedText::plain("Haircut"),
        duration_minutes: 30,
        price: Price::Text("40,000".into()),
        category: Some("hair".into()),
    }
}

fn coloring() -> Service {
    Service {
        id: "2".into(),
        name: LocalizedText::plain("Coloring"),
        duration_minutes: 45,
        price: Price::Text("25,000".into()),
        category: Some("hair".into()),
    }
}

async fn assemble_cart(coordinator: &mut SchedulingCoordinator) {
    coordinator.select_salon("s1", "Main Street Salon").await.unwrap();
    coordinator.add_service(haircut()).await.unwrap();
    coordinator.add_service(coloring()).await.unwrap();
    coordinator.set_date(Some("2025-01-10".into())).await.unwrap();

    coordinator.select_time("1", Some("14:00".into())).await.unwrap();
    let staff = coordinator
        .bookable_employees("1")
        .into_iter()
        .find(|e| e.id == "e1")
        .unwrap();
    coordinator.select_employee("1", Some(staff)).await.unwrap();

    coordinator.select_time("2", Some("16:00".into())).await.unwrap();
    let staff = coordinator
        .bookable_employees("2")
        .into_iter()
        .find(|e| e.id == "e2")
        .unwrap();
    coordinator.select_employee("2", Some(staff)).await.unwrap();
}

#[tokio::test]
async fn test_full_booking_flow_with_authentication() {
    let db = Database::in_memory().await.unwrap();
    let catalog = Arc::new(FakeCatalog::new());
    let booking_api = Arc::new(FakeBookingApi::default());
    let session = Arc::new(FakeSession {
        authenticated: AtomicBool::new(false),
    });
    let history = BookingHistoryStore::new(db.pool().clone());

    let mut coordinator = SchedulingCoordinator::new(Arc::clone(&catalog) as Arc<dyn CatalogApi>)
        .with_store(CartStore::new(db.pool().clone()));
    let mut flow = SubmissionFlow::new(
        Arc::clone(&booking_api) as Arc<dyn BookingApi>,
        Arc::clone(&session) as Arc<dyn SessionProvider>,
        history.clone(),
        "en",
    );

    assemble_cart(&mut coordinator).await;

    // The worked totals: 45,000 override + 25,000 catalog
    assert_eq!(coordinator.cart().total_price(), 70000);
    // 30 catalog + 50 override
    assert_eq!(coordinator.cart().total_duration(), 80);
    assert!(coordinator.cart().is_ready_to_book());

    // Unauthenticated confirm parks the submission
    let outcome = flow.confirm(&mut coordinator).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::AwaitingLogin));
    assert_eq!(booking_api.calls.load(Ordering::SeqCst), 0);

    // Sign-in resumes it exactly once
    session.authenticated.store(true, Ordering::SeqCst);
    let booking = flow
        .login_completed(LoginOutcome::Success, &mut coordinator)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking_api.calls.load(Ordering::SeqCst), 1);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.services.len(), 2);

    // History holds the record, the cart and its snapshot are gone
    assert_eq!(history.list().await.unwrap().len(), 1);
    assert!(coordinator.cart().services().is_empty());
    assert!(CartStore::new(db.pool().clone())
        .load()
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_cart_survives_reload_through_snapshot() {
    let db = Database::in_memory().await.unwrap();
    let catalog = Arc::new(FakeCatalog::new());

    {
        let mut coordinator =
            SchedulingCoordinator::new(Arc::clone(&catalog) as Arc<dyn CatalogApi>)
                .with_store(CartStore::new(db.pool().clone()));
        assemble_cart(&mut coordinator).await;
    }

    // A fresh coordinator on the same database restores the selection
    let mut restored = SchedulingCoordinator::new(Arc::clone(&catalog) as Arc<dyn CatalogApi>)
        .with_store(CartStore::new(db.pool().clone()));
    restored.restore().await.unwrap();

    assert_eq!(restored.cart().services().len(), 2);
    assert_eq!(restored.cart().selected_date.as_deref(), Some("2025-01-10"));
    assert!(restored.cart().is_ready_to_book());
    // Transient state was refetched, not restored
    assert!(!restored.cart().available_slots.is_empty());
}

#[tokio::test]
async fn test_revisiting_a_date_reuses_the_cache() {
    let catalog = Arc::new(FakeCatalog::new());
    let mut coordinator =
        SchedulingCoordinator::new(Arc::clone(&catalog) as Arc<dyn CatalogApi>);

    coordinator.select_salon("s1", "Main Street Salon").await.unwrap();
    coordinator.add_service(haircut()).await.unwrap();

    coordinator.set_date(Some("2025-01-10".into())).await.unwrap();
    coordinator.set_date(Some("2025-01-11".into())).await.unwrap();
    let after_two_dates = catalog.employee_calls.load(Ordering::SeqCst);

    // Back to the first date: both keys are already cached
    coordinator.set_date(Some("2025-01-10".into())).await.unwrap();
    assert_eq!(catalog.employee_calls.load(Ordering::SeqCst), after_two_dates);
}

#[tokio::test]
async fn test_status_transitions_persist_in_history() {
    let db = Database::in_memory().await.unwrap();
    let history = BookingHistoryStore::new(db.pool().clone());
    let catalog = Arc::new(FakeCatalog::new());
    let booking_api = Arc::new(FakeBookingApi::default());
    let session = Arc::new(FakeSession {
        authenticated: AtomicBool::new(true),
    });

    let mut coordinator =
        SchedulingCoordinator::new(Arc::clone(&catalog) as Arc<dyn CatalogApi>);
    let mut flow = SubmissionFlow::new(
        Arc::clone(&booking_api) as Arc<dyn BookingApi>,
        Arc::clone(&session) as Arc<dyn SessionProvider>,
        history.clone(),
        "en",
    );

    assemble_cart(&mut coordinator).await;
    let ConfirmOutcome::Booked(booking) = flow.confirm(&mut coordinator).await.unwrap() else {
        panic!("expected a booking");
    };

    history
        .update_status(&booking.id.to_string(), BookingStatus::Confirmed)
        .await
        .unwrap();
    let loaded = history.get(&booking.id.to_string()).await.unwrap().unwrap();
    assert_eq!(loaded.status, BookingStatus::Confirmed);
    assert_eq!(loaded.date, "2025-01-10");
    assert_eq!(loaded.time, "14:00");
}
