//! Core services - the registry's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic;
//! they are pure orchestrators and never know about concrete platform
//! implementations.

mod registry;

pub use registry::{AppRegistry, RegistryError};
