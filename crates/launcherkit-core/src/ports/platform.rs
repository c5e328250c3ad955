//! Platform package service port.
//!
//! This port defines the interface the registry expects from the host
//! platform: enumeration of launchable applications, launch and uninstall
//! primitives, and install/uninstall event delivery. Adapters own the
//! actual OS calls; queries may be slow (filesystem/IPC work) and no
//! timeout is applied here.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AppIcon, Application};

/// Raw per-application record produced by the platform query.
///
/// Field-for-field precursor of [`Application`]; kept separate so the port
/// surface does not promise domain invariants the platform cannot uphold
/// (deduplication and ordering happen in the registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    /// Display name.
    pub name: String,
    /// Platform-wide unique package identifier.
    pub package_id: String,
    /// Opaque icon handle.
    pub icon: AppIcon,
    /// Activation target identifier.
    pub entry_point: String,
    /// Monotonically increasing version counter.
    pub version_code: i64,
    /// Display version string.
    pub version_name: String,
}

impl From<AppDescriptor> for Application {
    fn from(descriptor: AppDescriptor) -> Self {
        Self {
            name: descriptor.name,
            package_id: descriptor.package_id,
            icon: descriptor.icon,
            entry_point: descriptor.entry_point,
            version_code: descriptor.version_code,
            version_name: descriptor.version_name,
        }
    }
}

/// Opaque activation handle.
///
/// Produced by [`PlatformPackageService::resolve_launch_target`] and passed
/// back unmodified to [`PlatformPackageService::start_activation`]; the
/// registry never inspects the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget(pub String);

/// Opaque uninstall request addressed to one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallRequest(pub String);

/// Errors surfaced by platform adapters.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform could not enumerate or inspect packages.
    #[error("platform package query failed: {0}")]
    QueryFailed(String),

    /// The platform accepted an activation handle but could not start it.
    #[error("activation failed: {0}")]
    ActivationFailed(String),

    /// Install/uninstall event subscription could not be established or torn down.
    #[error("event subscription failed: {0}")]
    SubscriptionFailed(String),

    /// Internal adapter error.
    #[error("internal platform error: {0}")]
    Internal(String),
}

/// Callback surface the platform drives on install/uninstall activity.
///
/// Events arrive at package-id granularity on a task owned by the platform
/// adapter; implementations must be safe to invoke concurrently with any
/// registry operation.
#[async_trait]
pub trait PackageEventSink: Send + Sync {
    /// A package finished installing.
    async fn package_added(&self, package_id: &str);

    /// A package was removed.
    async fn package_removed(&self, package_id: &str);
}

/// Port for the host platform's package facilities.
#[async_trait]
pub trait PlatformPackageService: Send + Sync {
    /// Enumerate all launchable applications currently installed.
    ///
    /// May be slow; callers should run it off any latency-sensitive path.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the platform cannot be queried.
    async fn query_launchable_applications(&self) -> Result<Vec<AppDescriptor>, PlatformError>;

    /// Resolve full metadata for a single package.
    ///
    /// Returns `None` if the package is not installed or not launchable.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the platform cannot be queried.
    async fn resolve_package(
        &self,
        package_id: &str,
    ) -> Result<Option<AppDescriptor>, PlatformError>;

    /// Resolve an activation handle for a package.
    ///
    /// Returns `None` when the package no longer exists or has no launchable
    /// entry point.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the platform cannot be queried.
    async fn resolve_launch_target(
        &self,
        package_id: &str,
    ) -> Result<Option<LaunchTarget>, PlatformError>;

    /// Start a previously resolved activation handle.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the platform rejects the activation.
    async fn start_activation(&self, target: LaunchTarget) -> Result<(), PlatformError>;

    /// Build an uninstall request addressed to one package.
    ///
    /// Building is pure bookkeeping; nothing is submitted yet.
    fn build_uninstall_request(&self, package_id: &str) -> UninstallRequest;

    /// Submit an uninstall request to the platform's uninstall flow.
    ///
    /// The flow is asynchronous and typically user-confirmable; completion is
    /// reported later through [`PackageEventSink::package_removed`].
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request cannot be submitted.
    async fn submit_uninstall(&self, request: UninstallRequest) -> Result<(), PlatformError>;

    /// Subscribe the given sink to install/uninstall events.
    ///
    /// Re-subscribing while already subscribed replaces the sink and is
    /// harmless.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the subscription cannot be established.
    async fn subscribe(&self, sink: Arc<dyn PackageEventSink>) -> Result<(), PlatformError>;

    /// Stop delivering install/uninstall events.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the subscription cannot be torn down.
    async fn unsubscribe(&self) -> Result<(), PlatformError>;
}
