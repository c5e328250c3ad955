//! Installed-application registry service.
//!
//! `AppRegistry` owns the cached set of installed applications, exposes
//! query/launch/uninstall operations, and fans install/uninstall events out
//! to registered listeners. It reaches the OS only through the injected
//! [`PlatformPackageService`] port.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::Application;
use crate::events::AppEvent;
use crate::ports::{
    AppInstallUninstallListener, PackageEventSink, PlatformError, PlatformPackageService,
};

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The underlying platform call failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// The installed-application registry.
///
/// One instance is expected per process, owned by the composition root and
/// shared by cloning the handle. All state lives behind the handle, so clones
/// observe the same cache and listener set.
///
/// # Caching
///
/// The cache is empty until the first [`installed_applications`] call, which
/// populates it wholesale from the platform. Afterwards the cache is the
/// source of truth: repeated queries do not touch the platform, and uninstall
/// events remove single entries. Install events deliberately do NOT insert
/// into the cache; a query issued after an install notification can therefore
/// return a list without the new app until the cache is next repopulated.
/// This mirrors the asymmetry of the uninstall path (which must consult the
/// cache anyway to recover full metadata) and keeps the query path the only
/// writer of full snapshots.
///
/// # Concurrency
///
/// Cache and listener set are guarded by `RwLock`; guards are never held
/// across `.await`. Notification iterates a snapshot of the listener set, so
/// concurrent (un)registration during a fan-out is safe.
///
/// [`installed_applications`]: AppRegistry::installed_applications
#[derive(Clone)]
pub struct AppRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    platform: Arc<dyn PlatformPackageService>,
    /// Installed applications keyed by package id.
    cache: RwLock<HashMap<String, Application>>,
    /// Registered listeners, deduplicated by `Arc` pointer identity.
    listeners: RwLock<Vec<Arc<dyn AppInstallUninstallListener>>>,
    /// True iff the registry's sink is subscribed to platform events.
    /// Guards the UNSUBSCRIBED/SUBSCRIBED transitions; async because the
    /// transition itself awaits the platform.
    subscribed: tokio::sync::Mutex<bool>,
}

impl AppRegistry {
    /// Create a registry over the given platform port.
    ///
    /// The registry starts with an empty cache, no listeners, and no platform
    /// event subscription.
    pub fn new(platform: Arc<dyn PlatformPackageService>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                platform,
                cache: RwLock::new(HashMap::new()),
                listeners: RwLock::new(Vec::new()),
                subscribed: tokio::sync::Mutex::new(false),
            }),
        }
    }

    /// List installed applications, sorted by name ascending.
    ///
    /// Returns the cached snapshot when one exists; otherwise queries the
    /// platform, replaces the cache wholesale, and returns the fresh
    /// snapshot. The result never contains duplicate package ids. The
    /// platform call may block for a while; invoke this from a background
    /// task if the caller is latency-sensitive.
    ///
    /// # Errors
    ///
    /// Propagates [`PlatformError`] from the platform query. On error the
    /// cache is left untouched, so the next call queries again; a partially
    /// populated snapshot is never returned.
    pub async fn installed_applications(&self) -> Result<Vec<Application>, RegistryError> {
        {
            let cache = self.inner.cache.read().unwrap();
            if !cache.is_empty() {
                return Ok(sorted_by_name(&cache));
            }
        }

        let descriptors = self.inner.platform.query_launchable_applications().await?;
        debug!(count = descriptors.len(), "populated application cache");

        let fresh: HashMap<String, Application> = descriptors
            .into_iter()
            .map(|descriptor| {
                let app = Application::from(descriptor);
                (app.package_id.clone(), app)
            })
            .collect();

        let mut cache = self.inner.cache.write().unwrap();
        *cache = fresh;
        Ok(sorted_by_name(&cache))
    }

    /// Launch the given application.
    ///
    /// Resolves an activation handle for the app's package and starts it.
    /// If no handle can be resolved (package gone, or nothing launchable in
    /// it) the call is a silent no-op: listing-then-launching races with an
    /// uninstall are not user-visible failures.
    ///
    /// # Errors
    ///
    /// Propagates [`PlatformError`] from resolution or activation transport
    /// failures.
    pub async fn launch(&self, app: &Application) -> Result<(), RegistryError> {
        match self
            .inner
            .platform
            .resolve_launch_target(&app.package_id)
            .await?
        {
            Some(target) => {
                self.inner.platform.start_activation(target).await?;
                Ok(())
            }
            None => {
                debug!(package_id = %app.package_id, "no launch target, ignoring");
                Ok(())
            }
        }
    }

    /// Ask the platform to run its uninstall flow for the given application.
    ///
    /// The cache is not touched here: real uninstalls are asynchronous and
    /// user-confirmable, so removal happens only when the platform later
    /// confirms it through an uninstall event.
    ///
    /// # Errors
    ///
    /// Propagates [`PlatformError`] if the request cannot be submitted.
    pub async fn request_uninstall(&self, app: &Application) -> Result<(), RegistryError> {
        let request = self.inner.platform.build_uninstall_request(&app.package_id);
        self.inner.platform.submit_uninstall(request).await?;
        Ok(())
    }

    /// Register a listener for install/uninstall notifications.
    ///
    /// Adding the same `Arc` twice is a no-op. The first listener switches
    /// the registry from UNSUBSCRIBED to SUBSCRIBED on the platform; further
    /// additions leave the subscription alone.
    ///
    /// # Errors
    ///
    /// Propagates [`PlatformError`] if the platform subscription cannot be
    /// established; the listener stays registered and the next registration
    /// retries the subscription.
    pub async fn register_listener(
        &self,
        listener: Arc<dyn AppInstallUninstallListener>,
    ) -> Result<(), RegistryError> {
        {
            let mut listeners = self.inner.listeners.write().unwrap();
            if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
                listeners.push(listener);
            }
        }

        let mut subscribed = self.inner.subscribed.lock().await;
        if !*subscribed {
            let sink: Arc<dyn PackageEventSink> = Arc::new(RegistrySink {
                inner: Arc::downgrade(&self.inner),
            });
            self.inner.platform.subscribe(sink).await?;
            *subscribed = true;
        }
        Ok(())
    }

    /// Remove a previously registered listener.
    ///
    /// Removal is by `Arc` pointer identity; unknown listeners are ignored.
    /// When the last listener goes away the registry unsubscribes from
    /// platform events so nobody pays for updates no one consumes.
    ///
    /// # Errors
    ///
    /// Propagates [`PlatformError`] if the platform subscription cannot be
    /// torn down.
    pub async fn unregister_listener(
        &self,
        listener: &Arc<dyn AppInstallUninstallListener>,
    ) -> Result<(), RegistryError> {
        let now_empty = {
            let mut listeners = self.inner.listeners.write().unwrap();
            listeners.retain(|l| !Arc::ptr_eq(l, listener));
            listeners.is_empty()
        };

        if now_empty {
            let mut subscribed = self.inner.subscribed.lock().await;
            if *subscribed {
                self.inner.platform.unsubscribe().await?;
                *subscribed = false;
            }
        }
        Ok(())
    }
}

/// Clone-and-sort the cache values. Byte-wise name collation on every path,
/// matching the collation of the initial load.
fn sorted_by_name(cache: &HashMap<String, Application>) -> Vec<Application> {
    let mut apps: Vec<Application> = cache.values().cloned().collect();
    apps.sort_by(|a, b| a.name.cmp(&b.name));
    apps
}

impl RegistryInner {
    /// Fan an event out to a snapshot of the current listeners, in
    /// registration order. The snapshot is taken under the read lock and the
    /// lock released before any callback runs, so listeners may re-enter the
    /// registry.
    fn notify_listeners(&self, event: &AppEvent) {
        let snapshot: Vec<Arc<dyn AppInstallUninstallListener>> =
            self.listeners.read().unwrap().clone();
        for listener in snapshot {
            match event {
                AppEvent::Installed { app } => listener.on_app_installed(app),
                AppEvent::Uninstalled { app } => listener.on_app_uninstalled(app),
            }
        }
    }
}

/// The registry's own event sink, handed to the platform on subscription.
///
/// Holds a weak back-reference so a platform adapter that outlives the
/// registry does not keep its state alive; events after teardown are dropped.
struct RegistrySink {
    inner: Weak<RegistryInner>,
}

#[async_trait]
impl PackageEventSink for RegistrySink {
    async fn package_added(&self, package_id: &str) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };

        // The cache is not updated here; only the query path writes full
        // snapshots, so a populated cache can lag behind an install until
        // the next repopulation. See AppRegistry's caching notes.
        match inner.platform.resolve_package(package_id).await {
            Ok(Some(descriptor)) => {
                inner.notify_listeners(&AppEvent::Installed {
                    app: descriptor.into(),
                });
            }
            Ok(None) => {
                warn!(package_id, "install event for unresolvable package, ignoring");
            }
            Err(err) => {
                warn!(package_id, error = %err, "failed to resolve installed package");
            }
        }
    }

    async fn package_removed(&self, package_id: &str) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };

        let removed = inner.cache.write().unwrap().remove(package_id);
        match removed {
            Some(app) => {
                inner.notify_listeners(&AppEvent::Uninstalled { app });
            }
            None => {
                // Cache was never populated, or the platform told us about a
                // package we never listed. Either way other subscribers must
                // keep receiving unrelated events, so this only logs.
                warn!(package_id, "uninstall event for package not in cache, ignoring");
            }
        }
    }
}
