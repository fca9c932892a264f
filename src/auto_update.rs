//! Once-a-day update check run after a command has printed its output.
//!
//! Nothing here ever fails: a check that cannot complete simply yields no
//! notice.

use crate::config::ConfigStore;
use crate::update::{check_for_updates, ReleaseSource, Version};
use chrono::{DateTime, Duration, Utc};
use std::time::Duration as StdDuration;
use tracing::debug;

pub const CHECK_INTERVAL_HOURS: i64 = 24;
/// HTTP timeout for the automatic check, kept short since it runs after
/// the user's command.
pub const AUTO_CHECK_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Shown to the user once primary output is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotice {
    pub current: Version,
    pub latest: Version,
}

/// Whether enough time has passed since the last recorded check.
pub fn is_due(config: &ConfigStore, now: DateTime<Utc>) -> bool {
    match config.last_update_check() {
        Some(last) => now.signed_duration_since(last) >= Duration::hours(CHECK_INTERVAL_HOURS),
        None => true,
    }
}

/// Run the gated check. The timestamp is recorded before asking `source`,
/// so a failing source is not retried until the next interval.
pub fn run_auto_check(
    config: &mut ConfigStore,
    source: &dyn ReleaseSource,
    current: &str,
    now: DateTime<Utc>,
) -> Option<PendingNotice> {
    if config.auto_update_disabled() {
        debug!("automatic update checks disabled");
        return None;
    }
    if !is_due(config, now) {
        debug!("update checked recently, skipping");
        return None;
    }
    if let Err(e) = config.record_update_check(now) {
        debug!(error = %e, "could not record update check time");
    }

    let result = check_for_updates(source, current);
    match (result.update_available, result.latest_version) {
        (true, Some(latest)) => Some(PendingNotice {
            current: result.current_version,
            latest,
        }),
        _ => None,
    }
}
