//! Canonical event union for install/uninstall activity.
//!
//! This module is the single source of truth for the events the registry
//! fans out to listeners and that adapters may forward over a wire.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "installed", "app": { "name": "Gmail", "packageId": "com.google.gmail", ... } }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::Application;

/// An install or uninstall observed on the platform.
///
/// Each variant carries the fully resolved [`Application`] so the event is
/// self-describing for subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A package was installed on the platform.
    Installed {
        /// The newly installed application.
        app: Application,
    },

    /// A package was removed from the platform.
    Uninstalled {
        /// The application as it was known before removal.
        app: Application,
    },
}

impl AppEvent {
    /// Get the event name for wire protocols.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Installed { .. } => "app:installed",
            Self::Uninstalled { .. } => "app:uninstalled",
        }
    }

    /// The application this event is about.
    pub const fn application(&self) -> &Application {
        match self {
            Self::Installed { app } | Self::Uninstalled { app } => app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppIcon;

    fn facebook() -> Application {
        Application {
            name: "Facebook".to_string(),
            package_id: "com.facebook.app".to_string(),
            icon: AppIcon::none(),
            entry_point: "FacebookMainActivity".to_string(),
            version_code: 2,
            version_name: "1.0.1".to_string(),
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Installed { app: facebook() };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"installed\""));
        assert!(json.contains("\"packageId\":\"com.facebook.app\""));
    }

    /// Lock down event names so forwarding adapters can subscribe by name.
    #[test]
    fn event_names_are_stable() {
        let cases = vec![
            (AppEvent::Installed { app: facebook() }, "app:installed"),
            (AppEvent::Uninstalled { app: facebook() }, "app:uninstalled"),
        ];

        for (event, expected_name) in cases {
            assert_eq!(event.event_name(), expected_name);
        }
    }

    #[test]
    fn application_accessor_returns_payload() {
        let event = AppEvent::Uninstalled { app: facebook() };
        assert_eq!(event.application().package_id, "com.facebook.app");
    }
}
