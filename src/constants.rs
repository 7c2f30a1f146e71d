//! Shared crate-wide constants for Groundwork.
//!
//! Centralizes magic values and default paths used across modules.
//! Adjusting these here will propagate through the crate.

/// UUIDv5 namespace tag for deterministic run/action IDs.
pub const NS_TAG: &str = "https://groundwork/stack";

/// Poll interval in milliseconds for the file-backed lock manager
/// (see `adapters/lock/file.rs`).
pub const LOCK_POLL_MS: u64 = 25;

/// Default lock timeout used by `Engine::new()` unless overridden by
/// `with_lock_timeout_ms()`.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 10_000;

/// Default path of the run lock file.
pub const DEFAULT_LOCK_PATH: &str = "/run/groundwork.lock";

/// Unit name of the web server service.
pub const WEB_SERVICE: &str = "apache2";

/// Unit name of the database server service.
pub const DB_SERVICE: &str = "mysql";

/// System account owning the deployed document root.
pub const WEB_OWNER: &str = "www-data";

/// Web server configuration layout (Debian-style available/enabled split).
pub const SITES_AVAILABLE: &str = "/etc/apache2/sites-available";
pub const SITES_ENABLED: &str = "/etc/apache2/sites-enabled";
pub const MODS_AVAILABLE: &str = "/etc/apache2/mods-available";
pub const MODS_ENABLED: &str = "/etc/apache2/mods-enabled";

/// Default runtime configuration file mutated by the session-hardening step.
pub const DEFAULT_PHP_INI: &str = "/etc/php/8.1/apache2/php.ini";

/// Session state directory purged when the session policy actually changes.
pub const PHP_SESSION_DIR: &str = "/var/lib/php/sessions";

/// Key and certificate directories for the TLS step.
pub const TLS_KEY_DIR: &str = "/etc/ssl/private";
pub const TLS_CERT_DIR: &str = "/etc/ssl/certs";

/// Validity window for self-signed certificates unless overridden.
pub const DEFAULT_TLS_DAYS: u32 = 365;

/// Default base URL application release archives are fetched from.
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://releases.example.org/app";

/// Marker file written by the final notification step; its presence makes the
/// announcement idempotent across re-runs.
pub const PROVISION_STAMP: &str = ".provisioned";
