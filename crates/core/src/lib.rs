//! Domain types and rules for the slot booking service.
//!
//! This crate has zero internal deps so the store, the HTTP layer and the
//! one-shot worker can all share the same validation and calendar logic.

pub mod booking;
pub mod calendar;
pub mod config;
pub mod error;
pub mod types;
