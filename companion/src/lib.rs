//! Data and logic core for the book companion.
//!
//! The crate is laid out hexagonally:
//! - [`domain`] holds the typed records, pure rules (rating aggregation,
//!   levels, achievements), the ports, and the services over them.
//! - [`outbound`] implements the ports against the hosted REST backend and
//!   the bundled content shipped by `book-content`.
//! - [`config`] loads and validates backend connection settings.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(test)]
mod test_support;
