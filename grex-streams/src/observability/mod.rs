//! Structured logging vocabulary.
//!
//! Library code emits `tracing` events carrying an `event` name from [`events`]
//! and the shared field values from [`fields`]. It never installs a subscriber;
//! binaries and tests do that once at the process boundary.

pub mod events;
pub mod fields;
