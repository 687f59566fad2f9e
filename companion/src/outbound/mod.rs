//! Outbound adapters: the bundled content tier and the REST backend.

pub mod bundled;
pub mod rest;
