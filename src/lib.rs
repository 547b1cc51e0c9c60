//! Reactive movie-ticket booking client core.
//!
//! The page state is a fold over UI event streams: collaborators push onto
//! buses, pure reducers combine the events into immutable snapshots, and a
//! renderer turns each snapshot into a view.
//!
//! # Architecture
//!
//! - `bus`: hot multicast event buses and stream combinators
//! - `accumulator`: folds (stream, reducer) pairs into a state stream
//! - `booking`: ticket-amount validation and server submission
//! - `router`: URL pattern matching and the current-URL stream
//! - `identity`: per-browser user id, persisted through `storage`
//! - `navigation`: history access (push state, back, forward)
//! - `pages`: page modules wiring the above into renderable state
//! - `runtime`: drives a state stream and hands snapshots to the host
//! - `db`: SQLite-backed key/value store
//! - `config`: environment configuration

pub mod accumulator;
pub mod booking;
pub mod bus;
pub mod config;
pub mod db;
pub mod identity;
pub mod navigation;
pub mod pages;
pub mod router;
pub mod runtime;
pub mod storage;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Db(#[from] db::DbError),
    #[error("{0}")]
    Storage(#[from] storage::StorageError),
    #[error("{0}")]
    Booking(#[from] booking::BookingError),
    #[error("{0}")]
    Router(#[from] router::RouterError),
    #[error("{0}")]
    Catalog(#[from] pages::movies::CatalogError),
    #[error("{0}")]
    Runtime(#[from] runtime::RuntimeError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Output goes to stderr so rendered pages on stdout stay readable.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("boxoffice_lib=debug,boxoffice=debug,info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
