//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! platform or transport concerns.

mod application;

pub use application::{AppIcon, Application};
