//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the registry expects from its surroundings.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No OS or IPC types in any signature; activation and uninstall handles
//!   are opaque newtypes the platform adapter round-trips
//! - The registry drives the platform only through [`PlatformPackageService`]
//! - The platform drives the registry only through [`PackageEventSink`]
//! - Consumers observe the registry only through [`AppInstallUninstallListener`]

pub mod listener;
pub mod platform;

pub use listener::AppInstallUninstallListener;
#[cfg(test)]
pub use listener::MockAppInstallUninstallListener;
pub use platform::{
    AppDescriptor, LaunchTarget, PackageEventSink, PlatformError, PlatformPackageService,
    UninstallRequest,
};
