use std::sync::Arc;

use crate::booking::{Booking, BookingClient, BookingError, TicketAmountInput};
use crate::bus::{stream, Bus, EventStream};
use crate::identity::IdentityProvider;

/// A booking the server did not accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("booking of {} ticket(s) for {} failed: {}", .booking.amount_of_tickets, .booking.movie_id, .error)]
pub struct SubmissionFailure {
    pub booking: Booking,
    pub error: BookingError,
}

/// Validated input that could not be turned into a booking is discarded here.
pub fn validated_bookings(input: &Bus<TicketAmountInput>) -> EventStream<Booking> {
    let source = input.name().to_string();
    stream::filter_map(input.stream(), move |raw| {
        let booking = raw.to_booking();
        if booking.is_none() {
            tracing::debug!(
                "{source}: discarding malformed ticket amount {:?} for {}",
                raw.text_input,
                raw.movie_id
            );
        }
        booking
    })
}

/// Bookings accepted by the server.
///
/// Every valid keystroke becomes one concurrent submission; nothing is
/// de-duplicated or cancelled. A booking is emitted only once its submission
/// succeeds, in completion order. Failed submissions are pushed on `failures`.
pub fn accepted_bookings(
    input: &Bus<TicketAmountInput>,
    identity: Arc<dyn IdentityProvider>,
    client: Arc<dyn BookingClient>,
    failures: Bus<SubmissionFailure>,
) -> EventStream<Booking> {
    stream::flat_map_async_reporting(
        validated_bookings(input),
        move |booking: Booking| {
            let identity = identity.clone();
            let client = client.clone();
            async move {
                let user = identity.get_or_create();
                tracing::debug!(
                    "submitting {} ticket(s) for {} as {user}",
                    booking.amount_of_tickets,
                    booking.movie_id
                );
                match client.put_booking(&user, &booking).await {
                    Ok(()) => Ok(booking),
                    Err(error) => Err(SubmissionFailure { booking, error }),
                }
            }
        },
        move |failure: SubmissionFailure| {
            tracing::debug!("{failure}");
            failures.push(failure);
        },
    )
}
