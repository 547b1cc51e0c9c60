use std::time::Duration;

use async_trait::async_trait;

use crate::booking::Booking;
use crate::identity::UserId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("config error: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timeout: {0}")]
    Timeout(String),
    #[error("booking rejected with status {0}")]
    Rejected(u16),
}

impl From<reqwest::Error> for BookingError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout(value.to_string());
        }
        Self::Request(value.to_string())
    }
}

/// Transport that submits a booking to the server.
///
/// `Ok(())` means the server accepted the booking.
#[async_trait]
pub trait BookingClient: Send + Sync {
    async fn put_booking(&self, user: &UserId, booking: &Booking) -> Result<(), BookingError>;
}

/// Relative URL of the booking resource.
pub fn booking_path(user: &UserId, booking: &Booking) -> String {
    format!(
        "/api/users/{}/bookings/{}?amountOfTickets={}",
        urlencoding::encode(user.as_str()),
        urlencoding::encode(&booking.movie_id),
        booking.amount_of_tickets
    )
}

/// [`BookingClient`] speaking HTTP to the booking API.
pub struct HttpBookingClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBookingClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BookingError> {
        if base_url.trim().is_empty() {
            return Err(BookingError::Config(
                "booking api base url cannot be empty".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client: builder
                .build()
                .map_err(|error| BookingError::Config(error.to_string()))?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BookingClient for HttpBookingClient {
    async fn put_booking(&self, user: &UserId, booking: &Booking) -> Result<(), BookingError> {
        let endpoint = format!("{}{}", self.base_url, booking_path(user, booking));
        let response = self.client.put(&endpoint).send().await?;
        let status = response.status();
        tracing::debug!("booking PUT {endpoint}: status={status}");

        if !status.is_success() {
            return Err(BookingError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
