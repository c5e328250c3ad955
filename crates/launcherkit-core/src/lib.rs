//! launcherkit-core: registry of applications installed on the host platform.
//!
//! The crate is organized hexagonally:
//!
//! - `domain` - pure value types (`Application`, `AppIcon`)
//! - `events` - the install/uninstall event union
//! - `ports` - trait abstractions for the platform package service and for
//!   consumer-supplied listeners
//! - `services` - `AppRegistry`, the cache-plus-subscription service
//!
//! The platform itself (package enumeration, process launch, uninstall flows,
//! event delivery) is an external collaborator reached only through
//! [`ports::PlatformPackageService`]. Adapters implement that trait; the
//! registry never touches the OS directly, which is also what makes it
//! testable with the fakes in [`testing`].

#![deny(unsafe_code)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use domain::{AppIcon, Application};
pub use events::AppEvent;
pub use ports::{
    AppDescriptor, AppInstallUninstallListener, LaunchTarget, PackageEventSink, PlatformError,
    PlatformPackageService, UninstallRequest,
};
pub use services::{AppRegistry, RegistryError};
