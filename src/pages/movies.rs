//! The ticket booking page: movie list, ticket amounts, and the user's bookings.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use im::{HashMap, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accumulator::Accumulator;
use crate::booking::{accepted_bookings, Booking, BookingClient, SubmissionFailure, TicketAmountInput};
use crate::bus::{Bus, EventStream};
use crate::identity::IdentityProvider;
use crate::navigation::Navigator;
use crate::pages::{app_routes, PageId, Render};
use crate::router::{current_url_stream, find_user_id, RouteMatch, RouteTable, RouterError};

pub const PAGE_TITLE: &str = "Book movie tickets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub start_time: String,
    #[serde(default)]
    pub image_url: String,
}

/// Immutable snapshot of the booking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingState {
    pub movies: Vector<Movie>,
    /// Movie id → ticket amount accepted by the server.
    pub bookings: HashMap<String, u32>,
    pub current_url: String,
}

impl BookingState {
    pub fn lists_movie(&self, movie_id: &str) -> bool {
        self.movies.iter().any(|movie| movie.id == movie_id)
    }

    pub fn amount_for(&self, movie_id: &str) -> Option<u32> {
        self.bookings.get(movie_id).copied()
    }

    /// Bookings whose movie is no longer in the catalog.
    pub fn stale_bookings(&self) -> Vec<String> {
        let known: HashSet<&str> = self.movies.iter().map(|movie| movie.id.as_str()).collect();
        let mut stale: Vec<String> = self
            .bookings
            .keys()
            .filter(|id| !known.contains(id.as_str()))
            .cloned()
            .collect();
        stale.sort();
        stale
    }
}

// ---------------------------------------------------------------------------
// Reducers
// ---------------------------------------------------------------------------

/// Record an accepted booking. The new amount replaces any previous one.
pub fn apply_booking(state: &BookingState, booking: Booking) -> BookingState {
    BookingState {
        bookings: state
            .bookings
            .update(booking.movie_id, booking.amount_of_tickets),
        ..state.clone()
    }
}

pub fn apply_url(state: &BookingState, current_url: String) -> BookingState {
    BookingState {
        current_url,
        ..state.clone()
    }
}

/// Replace the movie list and drop bookings for movies that disappeared.
pub fn apply_catalog(state: &BookingState, movies: Vector<Movie>) -> BookingState {
    let known: HashSet<&str> = movies.iter().map(|movie| movie.id.as_str()).collect();
    let bookings = state
        .bookings
        .iter()
        .filter(|(id, _)| known.contains(id.as_str()))
        .map(|(id, amount)| (id.clone(), *amount))
        .collect();
    BookingState {
        movies,
        bookings,
        current_url: state.current_url.clone(),
    }
}

// ---------------------------------------------------------------------------
// Page module
// ---------------------------------------------------------------------------

/// Ticket amounts can only be typed for movies the page lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no movie with id '{0}' is listed")]
pub struct UnknownMovie(pub String);

/// Buses and collaborators of the booking page.
pub struct BookMovieTicketsPage {
    amount_input: Bus<TicketAmountInput>,
    booking_clicked: Bus<()>,
    pop_state: Bus<()>,
    catalog_reloaded: Bus<Vector<Movie>>,
    submission_failed: Bus<SubmissionFailure>,
    identity: Arc<dyn IdentityProvider>,
    client: Arc<dyn BookingClient>,
    navigator: Arc<dyn Navigator>,
}

impl BookMovieTicketsPage {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        client: Arc<dyn BookingClient>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            amount_input: Bus::new("amount_of_tickets_input"),
            booking_clicked: Bus::new("booking_button_clicked"),
            pop_state: Bus::new("pop_state"),
            catalog_reloaded: Bus::new("catalog_reloaded"),
            submission_failed: Bus::new("submission_failed"),
            identity,
            client,
            navigator,
        }
    }

    pub fn initial_state(
        movies: Vector<Movie>,
        initial_url: impl Into<String>,
        initial_bookings: HashMap<String, u32>,
    ) -> BookingState {
        BookingState {
            movies,
            bookings: initial_bookings,
            current_url: initial_url.into(),
        }
    }

    /// Text typed into a movie's ticket-amount field.
    pub fn amount_input(&self) -> &Bus<TicketAmountInput> {
        &self.amount_input
    }

    /// Forward typed text to `amount_input` if `current` lists the movie.
    pub fn enter_amount(
        &self,
        current: &BookingState,
        input: TicketAmountInput,
    ) -> Result<(), UnknownMovie> {
        if !current.lists_movie(&input.movie_id) {
            return Err(UnknownMovie(input.movie_id));
        }
        self.amount_input.push(input);
        Ok(())
    }

    /// "Book now" button presses.
    pub fn booking_clicked(&self) -> &Bus<()> {
        &self.booking_clicked
    }

    /// Browser back/forward navigation. Push after the navigator moved.
    pub fn pop_state(&self) -> &Bus<()> {
        &self.pop_state
    }

    /// A freshly loaded movie list.
    pub fn catalog_reloaded(&self) -> &Bus<Vector<Movie>> {
        &self.catalog_reloaded
    }

    /// Bookings the server did not accept.
    pub fn submission_failures(&self) -> EventStream<SubmissionFailure> {
        self.submission_failed.stream()
    }

    /// The live sequence of page states, starting with `initial`.
    pub fn application_state(&self, initial: BookingState) -> EventStream<BookingState> {
        let bookings = accepted_bookings(
            &self.amount_input,
            self.identity.clone(),
            self.client.clone(),
            self.submission_failed.clone(),
        );
        let urls = current_url_stream(
            &self.booking_clicked,
            &self.pop_state,
            self.identity.clone(),
            self.navigator.clone(),
        );

        Accumulator::new()
            .on(bookings, apply_booking)
            .on(urls, apply_url)
            .on(self.catalog_reloaded.stream(), apply_catalog)
            .fold(initial)
    }
}

// ---------------------------------------------------------------------------
// Text view
// ---------------------------------------------------------------------------

/// Plain-text rendering of the booking page.
pub struct MoviesView {
    routes: RouteTable<PageId>,
}

impl MoviesView {
    pub fn new() -> Result<Self, RouterError> {
        Ok(Self {
            routes: app_routes()?,
        })
    }

    fn show_movies(state: &BookingState, out: &mut String) {
        if state.movies.is_empty() {
            out.push_str("No movies scheduled.\n");
        }
        for movie in &state.movies {
            let amount = state.amount_for(&movie.id);
            let _ = writeln!(out, "* {} [{}]", movie.title, movie.id);
            let _ = writeln!(out, "    starts: {}", movie.start_time);
            if !movie.image_url.is_empty() {
                let _ = writeln!(out, "    image:  {}", movie.image_url);
            }
            let _ = writeln!(
                out,
                "    tickets: {}   [Book now{}]",
                amount.map_or_else(|| "-".to_string(), |n| n.to_string()),
                if amount.unwrap_or(0) > 0 { "" } else { " (disabled)" }
            );
        }
    }

    fn show_bookings(state: &BookingState, out: &mut String) {
        match find_user_id(&state.current_url) {
            Some(user) => {
                let _ = writeln!(out, "Your bookings ({user})");
            }
            None => out.push_str("Your bookings\n"),
        }
        let booked: Vec<&Movie> = state
            .movies
            .iter()
            .filter(|movie| state.bookings.contains_key(&movie.id))
            .collect();
        if booked.is_empty() {
            out.push_str("  (none)\n");
        }
        for movie in booked {
            let _ = writeln!(
                out,
                "  {}, {}: {} tickets",
                movie.title,
                movie.start_time,
                state.amount_for(&movie.id).unwrap_or(0)
            );
        }
    }
}

impl Render<BookingState> for MoviesView {
    type View = String;

    fn render(&self, state: &BookingState) -> String {
        let mut out = format!("== {PAGE_TITLE} ==\n");
        match self.routes.match_url(&state.current_url) {
            RouteMatch::Page(PageId::FrontPage) => Self::show_movies(state, &mut out),
            RouteMatch::Page(PageId::UserBookings) => Self::show_bookings(state, &mut out),
            RouteMatch::NotFound => {
                let _ = writeln!(out, "Could not find a route for {}", state.current_url);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate movie id in catalog: {0}")]
    DuplicateId(String),
}

/// Parse a JSON array of movies.
pub fn parse_catalog(raw: &str) -> Result<Vector<Movie>, CatalogError> {
    let movies: Vec<Movie> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    for movie in &movies {
        if !seen.insert(movie.id.as_str()) {
            return Err(CatalogError::DuplicateId(movie.id.clone()));
        }
    }
    Ok(movies.into_iter().collect())
}

pub fn load_catalog(path: &Path) -> Result<Vector<Movie>, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&raw)
}

/// Built-in schedule used when no catalog file is configured.
pub fn sample_catalog() -> Vector<Movie> {
    [
        ("m1", "The Grand Budapest Hotel", "7pm", "/images/grand-budapest.jpg"),
        ("m2", "Arrival", "8:30pm", "/images/arrival.jpg"),
        ("m3", "Paddington 2", "5pm", "/images/paddington-2.jpg"),
    ]
    .into_iter()
    .map(|(id, title, start_time, image_url)| Movie {
        id: id.to_string(),
        title: title.to_string(),
        start_time: start_time.to_string(),
        image_url: image_url.to_string(),
    })
    .collect()
}
