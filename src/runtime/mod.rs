//! Task that drives a page's state stream.
//!
//! Events are delivered through per-observer channels; the driver task polls
//! the page's accumulated state stream, so reducers and combinators always run
//! one event at a time and only booking submissions ever suspend.

mod driver;

pub use driver::{RuntimeError, StateDriver};
