//! Runtime configuration
//!
//! The client talks to exactly one backend. Its address is one of two
//! hardcoded emulator-loopback defaults, picked by target platform, unless
//! the user points it somewhere else (a laptop on the LAN when testing on a
//! physical device).

use reqwest::Url;
use std::path::PathBuf;
use tracing::warn;

/// Backend address as seen from the iOS simulator or a desktop build
pub const LOCALHOST_URL: &str = "http://localhost:5000";

/// Backend address as seen from the Android emulator (host loopback alias)
pub const ANDROID_EMULATOR_URL: &str = "http://10.0.2.2:5000";

/// Overrides the backend base address
pub const API_URL_VAR: &str = "PLANT_DOCTOR_API_URL";

/// Shell command used to capture a photo; `{output}` is replaced by the target path
pub const CAMERA_CMD_VAR: &str = "PLANT_DOCTOR_CAMERA_CMD";

/// Overrides where the session database lives
pub const SESSION_DB_VAR: &str = "PLANT_DOCTOR_SESSION_DB";

/// Platform families that matter for picking the default backend address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }

    /// Default backend address for this platform
    pub fn default_base_url(self) -> &'static str {
        match self {
            Platform::Android => ANDROID_EMULATOR_URL,
            Platform::Other => LOCALHOST_URL,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base address of the classification backend, without trailing slash
    pub base_url: String,
    /// Optional camera capture command
    pub camera_command: Option<String>,
    /// Optional session database path (defaults to the user data directory)
    pub session_db: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(Platform::current(), |key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup(platform: Platform, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match validate_base_url(&raw) {
                Some(url) => Some(url),
                None => {
                    warn!(
                        "⚠️  Ignoring {}={:?}: not an absolute http(s) URL",
                        API_URL_VAR, raw
                    );
                    None
                }
            })
            .unwrap_or_else(|| platform.default_base_url().to_string());

        let camera_command = lookup(CAMERA_CMD_VAR)
            .filter(|cmd| !cmd.trim().is_empty());
        let session_db = lookup(SESSION_DB_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Config {
            base_url,
            camera_command,
            session_db,
        }
    }
}

/// Accept only absolute http/https addresses; strip any trailing slash
fn validate_base_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_platform_defaults() {
        let android = Config::from_lookup(Platform::Android, lookup_from(&[]));
        assert_eq!(android.base_url, "http://10.0.2.2:5000");

        let other = Config::from_lookup(Platform::Other, lookup_from(&[]));
        assert_eq!(other.base_url, "http://localhost:5000");
        assert_eq!(other.camera_command, None);
        assert_eq!(other.session_db, None);
    }

    #[test]
    fn test_override_for_physical_device() {
        let config = Config::from_lookup(
            Platform::Android,
            lookup_from(&[(API_URL_VAR, "http://192.168.1.20:5000/")]),
        );
        assert_eq!(config.base_url, "http://192.168.1.20:5000");
    }

    #[test]
    fn test_invalid_override_falls_back() {
        for bad in ["not a url", "ftp://host:21", "   "] {
            let vars = lookup_from(&[(API_URL_VAR, bad)]);
            let config = Config::from_lookup(Platform::Other, vars);
            assert_eq!(config.base_url, LOCALHOST_URL, "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_optional_settings() {
        let config = Config::from_lookup(
            Platform::Other,
            lookup_from(&[
                (CAMERA_CMD_VAR, "fswebcam --no-banner {output}"),
                (SESSION_DB_VAR, "/tmp/session.db"),
            ]),
        );
        assert_eq!(
            config.camera_command.as_deref(),
            Some("fswebcam --no-banner {output}")
        );
        assert_eq!(config.session_db, Some(PathBuf::from("/tmp/session.db")));
    }
}
