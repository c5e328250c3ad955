//! Installed application value types.

use serde::{Deserialize, Serialize};

/// Opaque icon handle for an installed application.
///
/// Wraps whatever encoded image data the platform hands over. The registry
/// never decodes it; equality is byte-wise. Platforms that do not supply
/// icon data use [`AppIcon::none`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIcon(Option<Vec<u8>>);

impl AppIcon {
    /// Wrap raw encoded image data from the platform.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self(Some(data))
    }

    /// An icon the platform could not (or chose not to) provide.
    pub const fn none() -> Self {
        Self(None)
    }

    /// The raw encoded bytes, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }
}

/// One installed, launchable application.
///
/// Equality is full-field. `package_id` is the natural key used for cache
/// lookup and removal, independent of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Display name shown to users.
    pub name: String,
    /// Platform-wide unique package identifier, stable across updates.
    #[serde(rename = "packageId")]
    pub package_id: String,
    /// Opaque icon handle supplied by the platform.
    pub icon: AppIcon,
    /// Identifier of the activation target (main entry point).
    #[serde(rename = "entryPoint")]
    pub entry_point: String,
    /// Monotonically increasing version counter for the package.
    #[serde(rename = "versionCode")]
    pub version_code: i64,
    /// Display version string; not guaranteed unique or ordered.
    #[serde(rename = "versionName")]
    pub version_name: String,
}
