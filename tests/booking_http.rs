use std::sync::Arc;
use std::time::Duration;

use boxoffice_lib::booking::{Booking, BookingClient, BookingError, HttpBookingClient, TicketAmountInput};
use boxoffice_lib::identity::{FixedIdentity, UserId};
use boxoffice_lib::navigation::MemoryHistory;
use boxoffice_lib::pages::movies::{sample_catalog, BookMovieTicketsPage};
use futures::StreamExt;
use httpmock::Method::PUT;
use httpmock::MockServer;

fn booking(movie_id: &str, amount_of_tickets: u32) -> Booking {
    Booking {
        movie_id: movie_id.to_string(),
        amount_of_tickets,
    }
}

#[tokio::test]
async fn put_booking_hits_the_user_booking_resource() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/users/u1/bookings/m1")
            .query_param("amountOfTickets", "3");
        then.status(204);
    });

    let client = HttpBookingClient::new(&server.base_url(), None).expect("client");
    client
        .put_booking(&UserId::new("u1"), &booking("m1", 3))
        .await
        .expect("booking accepted");

    mock.assert();
}

#[tokio::test]
async fn non_success_status_is_a_rejection() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path("/api/users/u1/bookings/m1");
        then.status(500).body("boom");
    });

    let client = HttpBookingClient::new(&format!("{}/", server.base_url()), None).expect("client");
    let err = client
        .put_booking(&UserId::new("u1"), &booking("m1", 2))
        .await
        .expect_err("500 must not count as accepted");
    assert_eq!(err, BookingError::Rejected(500));
}

#[tokio::test]
async fn slow_server_hits_the_configured_timeout() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path("/api/users/u1/bookings/m1");
        then.status(200).delay(Duration::from_millis(500));
    });

    let client = HttpBookingClient::new(&server.base_url(), Some(Duration::from_millis(50)))
        .expect("client");
    let err = client
        .put_booking(&UserId::new("u1"), &booking("m1", 1))
        .await
        .expect_err("request should time out");
    assert!(matches!(err, BookingError::Timeout(_)), "{err:?}");
}

#[tokio::test]
async fn page_records_only_what_the_server_accepted() {
    let server = MockServer::start();
    let accepted = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/users/u1/bookings/m1")
            .query_param("amountOfTickets", "2");
        then.status(200);
    });
    let rejected = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/users/u1/bookings/m2")
            .query_param("amountOfTickets", "4");
        then.status(409);
    });

    let client = HttpBookingClient::new(&server.base_url(), Some(Duration::from_secs(5))).expect("client");
    let page = BookMovieTicketsPage::new(
        Arc::new(FixedIdentity(UserId::new("u1"))),
        Arc::new(client),
        Arc::new(MemoryHistory::new("/")),
    );
    let mut failures = page.submission_failures();
    let mut states = page.application_state(BookMovieTicketsPage::initial_state(
        sample_catalog(),
        "/",
        im::HashMap::new(),
    ));
    states.next().await.expect("initial state");

    page.amount_input().push(TicketAmountInput::new("m2", "4"));
    page.amount_input().push(TicketAmountInput::new("m1", "2"));

    let mut booked = None;
    let mut failed = None;
    while booked.is_none() || failed.is_none() {
        tokio::select! {
            Some(state) = states.next() => booked = Some(state),
            Some(failure) = failures.next() => failed = Some(failure),
        }
    }

    let booked = booked.expect("state");
    assert_eq!(booked.amount_for("m1"), Some(2));
    assert_eq!(booked.amount_for("m2"), None);
    assert_eq!(failed.expect("failure").error, BookingError::Rejected(409));
    accepted.assert();
    rejected.assert();
}
