//! Self-update: finding out whether a newer version exists, and installing it.
//!
//! - [`source`]: where the latest version number comes from
//! - [`version`]: parsing and comparing `major.minor.patch`
//! - [`locate`]: finding the install directory
//! - [`apply`]: download, swap and rollback

pub mod apply;
pub mod locate;
pub mod source;
pub mod version;

pub use apply::{Installer, PostInstall, Step};
pub use locate::{default_probes, locate_install_dir, InstallProbe};
pub use source::{archive_url, GithubReleases, ReleaseSource};
pub use version::{compare_versions, Version};

use tracing::debug;

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const REINSTALL_HINT: &str = "curl -fsSL https://gis.ph/install.sh | bash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheckResult {
    pub update_available: bool,
    pub current_version: Version,
    /// Absent only when the check failed.
    pub latest_version: Option<Version>,
    pub error: Option<String>,
}

/// Ask `source` for the latest version and compare it with `current`.
/// Failures are folded into the result rather than returned.
pub fn check_for_updates(source: &dyn ReleaseSource, current: &str) -> UpdateCheckResult {
    let current_version = Version::parse(current);
    match source.latest_version() {
        Ok(latest) => {
            let latest_version = Version::parse(&latest);
            debug!(%current_version, %latest_version, "update check");
            UpdateCheckResult {
                update_available: latest_version > current_version,
                current_version,
                latest_version: Some(latest_version),
                error: None,
            }
        }
        Err(e) => {
            debug!(error = %e, "update check failed");
            UpdateCheckResult {
                update_available: false,
                current_version,
                latest_version: None,
                error: Some(e.to_string()),
            }
        }
    }
}
