use serde::{Deserialize, Serialize};

/// Raw content of a movie's ticket-amount field, pushed on every keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAmountInput {
    pub movie_id: String,
    pub text_input: String,
}

impl TicketAmountInput {
    pub fn new(movie_id: impl Into<String>, text_input: impl Into<String>) -> Self {
        Self {
            movie_id: movie_id.into(),
            text_input: text_input.into(),
        }
    }

    /// Validate and normalize into a booking command.
    pub fn to_booking(&self) -> Option<Booking> {
        parse_ticket_amount(&self.text_input).map(|amount_of_tickets| Booking {
            movie_id: self.movie_id.clone(),
            amount_of_tickets,
        })
    }
}

/// A normalized booking: how many tickets the user wants for a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub movie_id: String,
    pub amount_of_tickets: u32,
}

/// Parse the ticket-amount field.
///
/// Accepts the empty string (meaning zero tickets) or a string made only of
/// ASCII digits. Everything else, including digit strings that overflow `u32`,
/// is rejected.
pub fn parse_ticket_amount(text: &str) -> Option<u32> {
    if text.is_empty() {
        return Some(0);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
