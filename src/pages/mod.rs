//! Page modules.
//!
//! A page module bundles everything one page needs to run: its initial state,
//! the buses UI collaborators push into, its reducers, and a renderer. Every
//! page folds its own state with its own accumulator; pages share nothing.

pub mod counter;
pub mod movies;

use crate::router::{RouteTable, RouterError, FRONT_PAGE_PATH, USER_BOOKINGS_PATH};

/// Pure view function over a page's state.
pub trait Render<S> {
    type View;

    fn render(&self, state: &S) -> Self::View;
}

/// Views of the ticket booking application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    /// Movie list with the ticket-amount inputs.
    FrontPage,
    /// The bookings of one user.
    UserBookings,
}

/// The application's route table.
pub fn app_routes() -> Result<RouteTable<PageId>, RouterError> {
    RouteTable::new()
        .route(FRONT_PAGE_PATH, PageId::FrontPage)?
        .route(USER_BOOKINGS_PATH, PageId::UserBookings)
}
