//! bpfstats core: label sets, label identity keys, and the shared error type.
//!
//! This crate carries no runtime or transport dependencies. The exporter
//! crate builds the instruments and the exposition listener on top of it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A bad label set
//! surfaces as `StatsError` so one caller's input cannot take down the
//! reporting path of a whole process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod labels;

/// Shared result type.
pub use error::{ErrorKind, Result, StatsError};
pub use labels::{hash_labels, LabelKey, LabelSet};
