//! counterctl-core: a single persisted integer counter
//!
//! [`CounterStore`] owns the SQLite database and hands out transactional
//! sessions; [`CounterRepo`] implements get / increment / reset on top of it.

pub mod config;
pub mod counter;
pub mod error;
pub mod store;

pub use config::CounterConfig;
pub use counter::{Counter, CounterRepo};
pub use error::{CounterError, Result};
pub use store::{CounterStore, Session};
