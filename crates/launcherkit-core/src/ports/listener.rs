//! Consumer-facing install/uninstall listener trait.

use crate::domain::Application;

/// Observer invoked when the registry learns of install/uninstall activity.
///
/// Callbacks run synchronously on the event-delivery task, one listener at a
/// time; long-running work belongs on the listener's own executor. Listener
/// identity (for deduplication and removal) is `Arc` pointer identity, so the
/// same allocation registered twice counts once.
#[cfg_attr(test, mockall::automock)]
pub trait AppInstallUninstallListener: Send + Sync {
    /// A new application was installed.
    fn on_app_installed(&self, app: &Application);

    /// A previously cached application was uninstalled.
    fn on_app_uninstalled(&self, app: &Application);
}
