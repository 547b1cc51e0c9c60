//! Event buses and the stream combinators built on top of them.
//!
//! # Architecture
//!
//! Events flow from UI collaborator → `Bus` → derived `EventStream`s:
//! - `Bus`: hot multicast channel, one unbounded queue per observer
//! - `stream`: lazy combinators (`map`, `filter`, `flat_map_async`, `merge`, ...)
//!   that compose bus streams into the inputs of a state accumulator

mod event_bus;
pub mod stream;

pub use event_bus::Bus;
pub use stream::EventStream;
