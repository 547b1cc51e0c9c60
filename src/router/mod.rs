//! URL-driven page selection.
//!
//! The router owns two things:
//! - `RouteTable`: ordered `(pattern, page)` pairs, first match wins
//! - `current_url_stream`: the merged stream of URL changes, fed by booking
//!   clicks (which push a history entry) and by back/forward navigation

mod table;

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::bus::{stream, Bus, EventStream};
use crate::identity::{IdentityProvider, UserId};
use crate::navigation::Navigator;

pub use table::{match_route, Route, RouteMatch, RouteTable, RouterError};

pub const FRONT_PAGE_PATH: &str = "^/$";
pub const USER_BOOKINGS_PATH: &str = "^/user/(.*)/bookings$";

fn user_bookings_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(USER_BOOKINGS_PATH).expect("valid user bookings pattern"))
}

/// Extract the user id embedded in a bookings URL.
pub fn find_user_id(url: &str) -> Option<String> {
    user_bookings_regex()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|user_id| user_id.as_str().to_string())
}

pub fn user_bookings_path(user: &UserId) -> String {
    format!("/user/{user}/bookings")
}

/// Stream of URL changes.
///
/// A booking click resolves the user's bookings URL and records it in the
/// history before emitting it. A popstate event re-reads whatever path the
/// navigator now points at; the navigator itself is never driven from here.
pub fn current_url_stream(
    booking_clicked: &Bus<()>,
    pop_state: &Bus<()>,
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
) -> EventStream<String> {
    let history = navigator.clone();
    let after_booking = stream::inspect(
        stream::map(booking_clicked.stream(), move |()| {
            user_bookings_path(&identity.get_or_create())
        }),
        move |url| history.push_state(url),
    );
    let after_navigation = stream::map(pop_state.stream(), move |()| navigator.current_path());

    stream::merge([after_booking, after_navigation])
}
