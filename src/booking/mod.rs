//! Ticket booking: the optimistic-update pipeline.
//!
//! Raw keystrokes flow through `RawInput -> Validated -> Submitted -> Accepted`:
//! - `input`: validation and normalization of the ticket-amount field
//! - `client`: the transport that submits a booking to the server
//! - `pipeline`: wiring of both into the stream of server-accepted bookings
//!
//! Local state only ever reflects a booking after the server accepted it.

mod client;
mod input;
mod pipeline;

pub use client::{booking_path, BookingClient, BookingError, HttpBookingClient};
pub use input::{parse_ticket_amount, Booking, TicketAmountInput};
pub use pipeline::{accepted_bookings, validated_bookings, SubmissionFailure};
