//! Booking submission flow
//!
//! Drives confirmation of a ready cart behind the authentication gate.
//! An unauthenticated confirm parks a [`PendingAction::ConfirmBooking`]
//! and hands control back so the host can present its login dialog; the
//! dialog's outcome resumes or abandons the parked action. The pending
//! action is consumed exactly once, so a double-tap on confirm before the
//! dialog resolves can never submit twice.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::booking::{Booking, BookingApi, BookingRequest};
use crate::error::{Error, Result};
use crate::scheduling::SchedulingCoordinator;
use crate::session::{LoginOutcome, PendingAction, SessionProvider};
use crate::storage::BookingHistoryStore;

/// What happened when the user confirmed the booking
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// Submitted and recorded; the cart has been cleared
    Booked(Booking),
    /// Parked behind the login dialog; resume via
    /// [`SubmissionFlow::login_completed`]
    AwaitingLogin,
}

/// Auth-gated submission of the assembled cart
pub struct SubmissionFlow {
    booking_api: Arc<dyn BookingApi>,
    session: Arc<dyn SessionProvider>,
    history: BookingHistoryStore,
    locale: String,
    pending: Option<PendingAction>,
    is_submitting: bool,
}

impl SubmissionFlow {
    /// Create a submission flow
    pub fn new(
        booking_api: Arc<dyn BookingApi>,
        session: Arc<dyn SessionProvider>,
        history: BookingHistoryStore,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            booking_api,
            session,
            history,
            locale: locale.into(),
            pending: None,
            is_submitting: false,
        }
    }

    /// Whether a confirmation is parked behind the login dialog
    pub fn has_pending_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a submission request is in flight
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Confirm the booking
    ///
    /// Requires the cart to be ready. Without a valid session the
    /// confirmation is parked and `AwaitingLogin` returned; the cart is
    /// left untouched.
    pub async fn confirm(
        &mut self,
        coordinator: &mut SchedulingCoordinator,
    ) -> Result<ConfirmOutcome> {
        if !coordinator.cart().is_ready_to_book() {
            return Err(Error::NotReady(
                "every service needs a time and a staff member, plus a date".to_string(),
            ));
        }

        if !self.session.is_authenticated().await {
            info!("Confirmation requires sign-in, parking pending action");
            self.pending = Some(PendingAction::ConfirmBooking);
            return Ok(ConfirmOutcome::AwaitingLogin);
        }

        let booking = self.submit(coordinator).await?;
        Ok(ConfirmOutcome::Booked(booking))
    }

    /// Report the outcome of the host's login dialog
    ///
    /// Consumes the parked action exactly once: a successful login resumes
    /// the submission, a dismissal abandons it. Returns the booking when a
    /// submission ran, `None` otherwise.
    pub async fn login_completed(
        &mut self,
        outcome: LoginOutcome,
        coordinator: &mut SchedulingCoordinator,
    ) -> Result<Option<Booking>> {
        let Some(action) = self.pending.take() else {
            return Ok(None);
        };

        match outcome {
            LoginOutcome::Dismissed => {
                info!("Login dismissed, abandoning pending confirmation");
                Ok(None)
            }
            LoginOutcome::Success => match action {
                PendingAction::ConfirmBooking => {
                    let booking = self.submit(coordinator).await?;
                    Ok(Some(booking))
                }
            },
        }
    }

    /// Build the request, call the booking API, record history, clear the
    /// cart
    ///
    /// On failure every selection is preserved and the submitting flag is
    /// reset, so the same confirm can simply be retried.
    async fn submit(&mut self, coordinator: &mut SchedulingCoordinator) -> Result<Booking> {
        if self.is_submitting {
            warn!("Submission already in flight, ignoring");
            return Err(Error::SubmissionFailed(
                "a submission is already in progress".to_string(),
            ));
        }
        self.is_submitting = true;

        let result = self.submit_inner(coordinator).await;
        self.is_submitting = false;
        result
    }

    async fn submit_inner(&mut self, coordinator: &mut SchedulingCoordinator) -> Result<Booking> {
        let cart = coordinator.cart();
        let salon_id = cart
            .salon_id
            .clone()
            .ok_or_else(|| Error::NotReady("no salon selected".to_string()))?;
        let request = BookingRequest::from_cart(cart, &self.locale)?;
        let booking = Booking::from_cart(cart)?;

        let confirmation = self
            .booking_api
            .create_booking(&salon_id, &request)
            .await
            .map_err(|err| {
                error!(salon_id = %salon_id, error = %err, "Booking submission failed");
                err
            })?;

        info!(
            booking_id = %booking.id,
            remote_id = %confirmation.booking_id,
            services = booking.services.len(),
            total_price = coordinator.cart().total_price(),
            "Booking created"
        );

        self.history.append(&booking).await?;
        coordinator.clear().await?;

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingConfirmation;
    use crate::catalog::{CatalogApi, Employee, LocalizedText, Price, Service, TimeSlot};
    use crate::storage::Database;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct StaticCatalog;

    #[async_trait]
    impl CatalogApi for StaticCatalog {
        async fn employees_for_service(
            &self,
            _salon_id: &str,
            _service_id: &str,
            _date: Option<&str>,
        ) -> Result<Vec<Employee>> {
            Ok(vec![Employee {
                id: "e1".into(),
                name: "Mina".into(),
                position: None,
                price: Some(45000),
                duration_minutes: None,
            }])
        }

        async fn available_slots(
            &self,
            _salon_id: &str,
            _date: &str,
            _service_id: &str,
        ) -> Result<Vec<TimeSlot>> {
            Ok(vec![TimeSlot {
                time: "14:00".into(),
                employee_ids: vec!["e1".into()],
            }])
        }
    }

    #[derive(Default)]
    struct MockBookingApi {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl BookingApi for MockBookingApi {
        async fn create_booking(
            &self,
            _salon_id: &str,
            _request: &BookingRequest,
        ) -> Result<BookingConfirmation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Api {
                    status: 500,
                    message: "backend unavailable".into(),
                });
            }
            Ok(BookingConfirmation {
                booking_id: "remote-1".into(),
                status: Some("pending".into()),
            })
        }
    }

    struct MockSession {
        authenticated: AtomicBool,
    }

    #[async_trait]
    impl crate::session::SessionProvider for MockSession {
        async fn is_authenticated(&self) -> bool {
            self.authenticated.load(Ordering::SeqCst)
        }
    }

    async fn ready_coordinator() -> SchedulingCoordinator {
        let mut coordinator = SchedulingCoordinator::new(Arc::new(StaticCatalog));
        coordinator.select_salon("s1", "Main Street Salon").await.unwrap();
        coordinator
            .add_service(Service {
                id: "1".into(),
                name: LocalizedText::plain("Haircut"),
                duration_minutes: 30,
                price: Price::Text("40,000".into()),
                category: None,
            })
            .await
            .unwrap();
        coordinator.set_date(Some("2025-01-10".into())).await.unwrap();
        coordinator.select_time("1", Some("14:00".into())).await.unwrap();
        let staff = coordinator.bookable_employees("1").remove(0);
        coordinator.select_employee("1", Some(staff)).await.unwrap();
        coordinator
    }

    async fn flow_with(
        api: Arc<MockBookingApi>,
        authenticated: bool,
    ) -> SubmissionFlow {
        let db = Database::in_memory().await.unwrap();
        SubmissionFlow::new(
            api,
            Arc::new(MockSession {
                authenticated: AtomicBool::new(authenticated),
            }),
            BookingHistoryStore::new(db.pool().clone()),
            "en",
        )
    }

    #[tokio::test]
    async fn test_confirm_rejects_unready_cart() {
        let api = Arc::new(MockBookingApi::default());
        let mut flow = flow_with(Arc::clone(&api), true).await;
        let mut coordinator = SchedulingCoordinator::new(Arc::new(StaticCatalog));

        let err = flow.confirm(&mut coordinator).await.unwrap_err();
        assert!(matches!(err, Error::NotReady(_)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_confirm_books_and_clears() {
        let api = Arc::new(MockBookingApi::default());
        let mut flow = flow_with(Arc::clone(&api), true).await;
        let mut coordinator = ready_coordinator().await;

        let outcome = flow.confirm(&mut coordinator).await.unwrap();
        let ConfirmOutcome::Booked(booking) = outcome else {
            panic!("expected a booking");
        };

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(booking.salon_id, "s1");
        assert!(coordinator.cart().services().is_empty());
        assert_eq!(flow.history.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unauthenticated_confirm_parks_and_resumes_once() {
        let api = Arc::new(MockBookingApi::default());
        let mut flow = flow_with(Arc::clone(&api), false).await;
        let mut coordinator = ready_coordinator().await;

        // Two quick confirms before the dialog resolves
        let first = flow.confirm(&mut coordinator).await.unwrap();
        let second = flow.confirm(&mut coordinator).await.unwrap();
        assert!(matches!(first, ConfirmOutcome::AwaitingLogin));
        assert!(matches!(second, ConfirmOutcome::AwaitingLogin));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(coordinator.cart().is_ready_to_book());

        let booking = flow
            .login_completed(LoginOutcome::Success, &mut coordinator)
            .await
            .unwrap();
        assert!(booking.is_some());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(!flow.has_pending_confirmation());

        // A stray second callback finds nothing to resume
        let again = flow
            .login_completed(LoginOutcome::Success, &mut coordinator)
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dismissed_login_abandons_pending_confirmation() {
        let api = Arc::new(MockBookingApi::default());
        let mut flow = flow_with(Arc::clone(&api), false).await;
        let mut coordinator = ready_coordinator().await;

        flow.confirm(&mut coordinator).await.unwrap();
        let result = flow
            .login_completed(LoginOutcome::Dismissed, &mut coordinator)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!flow.has_pending_confirmation());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        // The cart stays intact; nothing was submitted
        assert!(coordinator.cart().is_ready_to_book());
    }

    #[tokio::test]
    async fn test_failed_submission_preserves_cart_for_retry() {
        let api = Arc::new(MockBookingApi::default());
        api.fail.store(true, Ordering::SeqCst);
        let mut flow = flow_with(Arc::clone(&api), true).await;
        let mut coordinator = ready_coordinator().await;
        let before = coordinator.cart().clone();

        let err = flow.confirm(&mut coordinator).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(!flow.is_submitting());
        assert_eq!(coordinator.cart(), &before);
        assert!(flow.history.list().await.unwrap().is_empty());

        // Backend recovers; the identical state submits cleanly
        api.fail.store(false, Ordering::SeqCst);
        let outcome = flow.confirm(&mut coordinator).await.unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Booked(_)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert!(coordinator.cart().services().is_empty());
    }
}
