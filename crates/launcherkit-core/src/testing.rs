//! Test support: a scriptable fake platform and a recording listener.
//!
//! Compiled for this crate's own tests and, behind the `test-utils` feature,
//! for downstream crates that want to exercise registry consumers without a
//! real platform adapter.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{AppIcon, Application};
use crate::events::AppEvent;
use crate::ports::{
    AppDescriptor, AppInstallUninstallListener, LaunchTarget, PackageEventSink, PlatformError,
    PlatformPackageService, UninstallRequest,
};

/// Build an [`AppDescriptor`] with no icon data.
pub fn descriptor(
    name: &str,
    package_id: &str,
    entry_point: &str,
    version_code: i64,
    version_name: &str,
) -> AppDescriptor {
    AppDescriptor {
        name: name.to_string(),
        package_id: package_id.to_string(),
        icon: AppIcon::none(),
        entry_point: entry_point.to_string(),
        version_code,
        version_name: version_name.to_string(),
    }
}

/// In-memory [`PlatformPackageService`] with call counters and scriptable
/// install/uninstall event delivery.
///
/// Launch targets resolve for exactly the packages currently "installed" on
/// the fake; `simulate_install` / `simulate_uninstall` mutate that set and
/// drive the subscribed sink the way a real platform would.
#[derive(Default)]
pub struct FakePlatform {
    apps: Mutex<Vec<AppDescriptor>>,
    query_calls: AtomicUsize,
    fail_next_query: AtomicBool,
    subscribe_calls: AtomicUsize,
    unsubscribe_calls: AtomicUsize,
    started: Mutex<Vec<LaunchTarget>>,
    submitted: Mutex<Vec<UninstallRequest>>,
    sink: Mutex<Option<Arc<dyn PackageEventSink>>>,
}

impl FakePlatform {
    /// Create a fake with the given installed applications.
    pub fn with_apps(apps: Vec<AppDescriptor>) -> Self {
        Self {
            apps: Mutex::new(apps),
            ..Self::default()
        }
    }

    /// Make the next `query_launchable_applications` call fail.
    pub fn fail_next_query(&self) {
        self.fail_next_query.store(true, Ordering::SeqCst);
    }

    /// How many times the full enumeration query ran.
    pub fn query_count(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// How many times a sink was subscribed.
    pub fn subscribe_count(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    /// How many times the subscription was torn down.
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    /// Activation handles that were started.
    pub fn started_targets(&self) -> Vec<LaunchTarget> {
        self.started.lock().unwrap().clone()
    }

    /// Uninstall requests that were submitted.
    pub fn submitted_uninstalls(&self) -> Vec<UninstallRequest> {
        self.submitted.lock().unwrap().clone()
    }

    /// Install a package on the fake platform and deliver the event to the
    /// subscribed sink, if any.
    pub async fn simulate_install(&self, descriptor: AppDescriptor) {
        let package_id = descriptor.package_id.clone();
        {
            let mut apps = self.apps.lock().unwrap();
            apps.retain(|a| a.package_id != package_id);
            apps.push(descriptor);
        }
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.package_added(&package_id).await;
        }
    }

    /// Remove a package from the fake platform and deliver the event to the
    /// subscribed sink, if any.
    pub async fn simulate_uninstall(&self, package_id: &str) {
        self.apps
            .lock()
            .unwrap()
            .retain(|a| a.package_id != package_id);
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.package_removed(package_id).await;
        }
    }
}

#[async_trait]
impl PlatformPackageService for FakePlatform {
    async fn query_launchable_applications(&self) -> Result<Vec<AppDescriptor>, PlatformError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_query.swap(false, Ordering::SeqCst) {
            return Err(PlatformError::QueryFailed(
                "scripted query failure".to_string(),
            ));
        }
        Ok(self.apps.lock().unwrap().clone())
    }

    async fn resolve_package(
        &self,
        package_id: &str,
    ) -> Result<Option<AppDescriptor>, PlatformError> {
        Ok(self
            .apps
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.package_id == package_id)
            .cloned())
    }

    async fn resolve_launch_target(
        &self,
        package_id: &str,
    ) -> Result<Option<LaunchTarget>, PlatformError> {
        let known = self
            .apps
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.package_id == package_id);
        Ok(known.then(|| LaunchTarget(package_id.to_string())))
    }

    async fn start_activation(&self, target: LaunchTarget) -> Result<(), PlatformError> {
        self.started.lock().unwrap().push(target);
        Ok(())
    }

    fn build_uninstall_request(&self, package_id: &str) -> UninstallRequest {
        UninstallRequest(package_id.to_string())
    }

    async fn submit_uninstall(&self, request: UninstallRequest) -> Result<(), PlatformError> {
        self.submitted.lock().unwrap().push(request);
        Ok(())
    }

    async fn subscribe(&self, sink: Arc<dyn PackageEventSink>) -> Result<(), PlatformError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    async fn unsubscribe(&self) -> Result<(), PlatformError> {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        *self.sink.lock().unwrap() = None;
        Ok(())
    }
}

/// Listener that records every event it receives, in order.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<AppEvent>>,
}

impl RecordingListener {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received so far, in delivery order.
    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Applications reported as installed, in delivery order.
    pub fn installed(&self) -> Vec<Application> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::Installed { app } => Some(app),
                AppEvent::Uninstalled { .. } => None,
            })
            .collect()
    }

    /// Applications reported as uninstalled, in delivery order.
    pub fn uninstalled(&self) -> Vec<Application> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::Uninstalled { app } => Some(app),
                AppEvent::Installed { .. } => None,
            })
            .collect()
    }
}

impl AppInstallUninstallListener for RecordingListener {
    fn on_app_installed(&self, app: &Application) {
        self.events
            .lock()
            .unwrap()
            .push(AppEvent::Installed { app: app.clone() });
    }

    fn on_app_uninstalled(&self, app: &Application) {
        self.events
            .lock()
            .unwrap()
            .push(AppEvent::Uninstalled { app: app.clone() });
    }
}
