//! Test doubles for the external collaborators.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::booking::{booking_path, Booking, BookingClient, BookingError};
use crate::identity::UserId;

/// Booking client that answers immediately and records every request path.
pub struct RecordingBookingClient {
    outcome: Result<(), BookingError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingBookingClient {
    pub fn accepting() -> Self {
        Self {
            outcome: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            outcome: Err(BookingError::Rejected(status)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingClient for RecordingBookingClient {
    async fn put_booking(&self, user: &UserId, booking: &Booking) -> Result<(), BookingError> {
        self.calls.lock().unwrap().push(booking_path(user, booking));
        self.outcome.clone()
    }
}

/// A submission parked inside [`GatedBookingClient`] until the test resolves it.
pub struct PendingPut {
    pub user: UserId,
    pub booking: Booking,
    responder: oneshot::Sender<Result<(), BookingError>>,
}

impl PendingPut {
    pub fn accept(self) {
        let _ = self.responder.send(Ok(()));
    }

    pub fn reject(self, error: BookingError) {
        let _ = self.responder.send(Err(error));
    }
}

/// Booking client whose requests complete only when the test says so.
///
/// Each submission is handed to the test through the receiver returned by
/// [`GatedBookingClient::new`], which lets tests pick the completion order.
pub struct GatedBookingClient {
    submitted: mpsc::UnboundedSender<PendingPut>,
}

impl GatedBookingClient {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingPut>) {
        let (submitted, rx) = mpsc::unbounded_channel();
        (Self { submitted }, rx)
    }
}

#[async_trait]
impl BookingClient for GatedBookingClient {
    async fn put_booking(&self, user: &UserId, booking: &Booking) -> Result<(), BookingError> {
        let (responder, outcome) = oneshot::channel();
        self.submitted
            .send(PendingPut {
                user: user.clone(),
                booking: booking.clone(),
                responder,
            })
            .map_err(|_| BookingError::Request("test harness dropped".to_string()))?;
        outcome
            .await
            .unwrap_or_else(|_| Err(BookingError::Request("request abandoned".to_string())))
    }
}
