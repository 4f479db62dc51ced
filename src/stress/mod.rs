// src/stress/mod.rs

//! Row ordering by stress minimisation.
//!
//! - [`connection`] counts edges between rows.
//! - [`position`] holds the relative order of rows and its swap operation.
//! - [`manager`] runs the two-phase local search and produces the ranking.

pub mod connection;
pub mod manager;
pub mod position;

pub use connection::ConnectionMatrix;
pub use manager::{LayoutOptions, StressManager, StressReport};
pub use position::PositionMatrix;
