//! End-to-end tests for the registry: cache population, event-driven cache
//! maintenance, and listener fan-out, all against the fake platform.

use std::sync::Arc;

use launcherkit_core::testing::{FakePlatform, RecordingListener, descriptor};
use launcherkit_core::{AppDescriptor, AppInstallUninstallListener, AppRegistry};

fn sample_apps() -> Vec<AppDescriptor> {
    vec![
        descriptor("Gmail", "com.google.gmail", "GMailMainActivity", 1, "1.0.0"),
        descriptor(
            "Facebook",
            "com.facebook.app",
            "FacebookMainActivity",
            2,
            "1.0.1",
        ),
        descriptor(
            "Instagram",
            "com.facebook.instagram",
            "InstagramMainActivity",
            3,
            "1.0.2",
        ),
    ]
}

fn recording_pair() -> (Arc<RecordingListener>, Arc<dyn AppInstallUninstallListener>) {
    let recorder = Arc::new(RecordingListener::new());
    let listener: Arc<dyn AppInstallUninstallListener> = recorder.clone();
    (recorder, listener)
}

#[tokio::test]
async fn install_event_notifies_listener_with_resolved_app() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());

    let (recorder, listener) = recording_pair();
    registry.register_listener(listener).await.unwrap();

    platform
        .simulate_install(descriptor("X", "com.x", "XMainActivity", 1, "1.0"))
        .await;

    let installed = recorder.installed();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].package_id, "com.x");
    assert_eq!(installed[0].name, "X");
    assert!(recorder.uninstalled().is_empty());
}

#[tokio::test]
async fn install_event_does_not_refresh_a_populated_cache() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());

    let before = registry.installed_applications().await.unwrap();
    assert_eq!(before.len(), 3);

    let (recorder, listener) = recording_pair();
    registry.register_listener(listener).await.unwrap();
    platform
        .simulate_install(descriptor("X", "com.x", "XMainActivity", 1, "1.0"))
        .await;

    // Listeners hear about the install, but the cached snapshot lags until
    // the cache is next repopulated.
    assert_eq!(recorder.installed().len(), 1);
    let after = registry.installed_applications().await.unwrap();
    assert_eq!(after, before);
    assert_eq!(platform.query_count(), 1);
}

#[tokio::test]
async fn uninstall_event_removes_app_and_notifies_every_listener() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());

    registry.installed_applications().await.unwrap();

    let (first_recorder, first) = recording_pair();
    let (second_recorder, second) = recording_pair();
    registry.register_listener(first).await.unwrap();
    registry.register_listener(second).await.unwrap();

    platform.simulate_uninstall("com.facebook.app").await;

    for recorder in [&first_recorder, &second_recorder] {
        let uninstalled = recorder.uninstalled();
        assert_eq!(uninstalled.len(), 1);
        assert_eq!(uninstalled[0].package_id, "com.facebook.app");
        assert_eq!(uninstalled[0].name, "Facebook");
    }

    let apps = registry.installed_applications().await.unwrap();
    let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Gmail", "Instagram"]);
}

#[tokio::test]
async fn unregistered_listener_receives_nothing_further() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());
    registry.installed_applications().await.unwrap();

    let (removed_recorder, removed) = recording_pair();
    let (kept_recorder, kept) = recording_pair();
    registry.register_listener(removed.clone()).await.unwrap();
    registry.register_listener(kept).await.unwrap();
    registry.unregister_listener(&removed).await.unwrap();

    platform.simulate_uninstall("com.google.gmail").await;
    platform
        .simulate_install(descriptor("X", "com.x", "XMainActivity", 1, "1.0"))
        .await;

    assert!(removed_recorder.events().is_empty());
    assert_eq!(kept_recorder.uninstalled().len(), 1);
    assert_eq!(kept_recorder.installed().len(), 1);
}

#[tokio::test]
async fn events_after_last_listener_left_are_not_delivered() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());
    registry.installed_applications().await.unwrap();

    let (recorder, listener) = recording_pair();
    registry.register_listener(listener.clone()).await.unwrap();
    registry.unregister_listener(&listener).await.unwrap();

    // The fake drops its sink on unsubscribe, like a real platform would.
    platform.simulate_uninstall("com.google.gmail").await;
    assert!(recorder.events().is_empty());

    // The removal still reached nobody, and the cache keeps the entry
    // because the platform had no subscriber to tell.
    let apps = registry.installed_applications().await.unwrap();
    assert_eq!(apps.len(), 3);
}

#[tokio::test]
async fn listeners_are_notified_in_registration_order() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());
    registry.installed_applications().await.unwrap();

    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    struct OrderListener {
        tag: &'static str,
        order: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl AppInstallUninstallListener for OrderListener {
        fn on_app_installed(&self, _app: &launcherkit_core::Application) {}

        fn on_app_uninstalled(&self, _app: &launcherkit_core::Application) {
            self.order.lock().unwrap().push(self.tag);
        }
    }

    for tag in ["first", "second", "third"] {
        let listener: Arc<dyn AppInstallUninstallListener> = Arc::new(OrderListener {
            tag,
            order: order.clone(),
        });
        registry.register_listener(listener).await.unwrap();
    }

    platform.simulate_uninstall("com.facebook.app").await;

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn concurrent_queries_settle_on_one_consistent_snapshot() {
    let platform = Arc::new(FakePlatform::with_apps(sample_apps()));
    let registry = AppRegistry::new(platform.clone());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry.installed_applications().await.unwrap()
        }));
    }

    for handle in handles {
        let apps = handle.await.unwrap();
        assert_eq!(apps.len(), 3);
        let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Facebook", "Gmail", "Instagram"]);
    }
}
