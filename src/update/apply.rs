//! Replacing an installed source tree with a freshly downloaded one.
//!
//! The old tree is moved aside to `<dir>.backup` rather than deleted. If the
//! swap or the dependency build fails, the new tree is removed and the backup
//! is moved back, so a failed update leaves the previous install in place.

use super::locate::MANIFEST;
use super::source::manifest_version;
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tar::Archive;
use tempfile::TempDir;
use tracing::{debug, info, warn};

const ARCHIVE_NAME: &str = "cli.tar.gz";
const EXTRACT_DIR: &str = "extract";
const STAGING_PREFIX: &str = ".gisph-update-";

/// Command run inside the new tree once it is in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInstall {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for PostInstall {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
            args: vec!["build".into(), "--release".into(), "--quiet".into()],
        }
    }
}

/// Steps reported while an update runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Downloading,
    Extracting,
    Replacing,
    Building,
    CleaningUp,
}

impl Step {
    pub fn message(self) -> &'static str {
        match self {
            Step::Downloading => "Downloading latest version...",
            Step::Extracting => "Extracting...",
            Step::Replacing => "Replacing installation...",
            Step::Building => "Installing dependencies...",
            Step::CleaningUp => "Cleaning up...",
        }
    }
}

pub struct Installer {
    install_dir: PathBuf,
    post_install: PostInstall,
}

impl Installer {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            post_install: PostInstall::default(),
        }
    }

    pub fn with_post_install(mut self, post_install: PostInstall) -> Self {
        self.post_install = post_install;
        self
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn backup_dir(&self) -> PathBuf {
        let mut name = self
            .install_dir
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("install"));
        name.push(".backup");
        self.install_dir.with_file_name(name)
    }

    /// Version recorded in the installed manifest.
    pub fn installed_version(&self) -> Option<String> {
        fs::read_to_string(self.install_dir.join(MANIFEST))
            .ok()
            .and_then(|text| manifest_version(&text))
    }

    /// Download `url` and install it. Returns the version now installed.
    pub fn update_from_url<F>(&self, client: &Client, url: &str, mut progress: F) -> Result<String>
    where
        F: FnMut(Step),
    {
        let staging = self.staging_dir()?;
        let archive = staging.path().join(ARCHIVE_NAME);

        progress(Step::Downloading);
        download(client, url, &archive)?;

        self.install_archive(&archive, staging.path(), progress)?;
        Ok(self.installed_version().unwrap_or_else(|| "unknown".to_string()))
    }

    /// Install from an already downloaded `.tar.gz`, extracting into
    /// `staging`. The archive must hold a single top-level directory.
    pub fn install_archive<F>(&self, archive: &Path, staging: &Path, mut progress: F) -> Result<()>
    where
        F: FnMut(Step),
    {
        progress(Step::Extracting);
        let new_tree = extract(archive, &staging.join(EXTRACT_DIR))?;

        progress(Step::Replacing);
        let backup = self.backup_dir();
        if backup.exists() {
            fs::remove_dir_all(&backup).map_err(|e| {
                Error::UpdateFailed(format!(
                    "could not remove stale backup {}: {}",
                    backup.display(),
                    e
                ))
            })?;
        }
        fs::rename(&self.install_dir, &backup).map_err(|e| {
            Error::UpdateFailed(format!("could not back up {}: {}", self.install_dir.display(), e))
        })?;
        debug!(backup = %backup.display(), "moved current install aside");

        if let Err(e) = fs::rename(&new_tree, &self.install_dir) {
            return Err(self.rollback(format!("could not move new version into place: {}", e)));
        }

        progress(Step::Building);
        if let Err(reason) = self.run_post_install() {
            return Err(self.rollback(reason));
        }

        progress(Step::CleaningUp);
        if let Err(e) = fs::remove_dir_all(&backup) {
            warn!(backup = %backup.display(), error = %e, "could not remove backup");
        }
        info!(dir = %self.install_dir.display(), "update installed");
        Ok(())
    }

    fn staging_dir(&self) -> Result<TempDir> {
        let parent = self
            .install_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| Error::UpdateFailed(format!("could not create staging directory: {}", e)))
    }

    fn run_post_install(&self) -> std::result::Result<(), String> {
        let PostInstall { program, args } = &self.post_install;
        debug!(%program, ?args, "running post-install");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.install_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("could not run {}: {}", program, e))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "{} failed ({}): {}",
            program,
            output.status,
            stderr.trim()
        ))
    }

    /// Put the backup back. The returned error says whether that worked.
    fn rollback(&self, reason: String) -> Error {
        let backup = self.backup_dir();
        warn!(%reason, "update failed, restoring previous install");

        if self.install_dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.install_dir) {
                return Error::UpdateFailed(format!(
                    "{}; could not remove partial install ({}). Previous version kept at {}",
                    reason,
                    e,
                    backup.display()
                ));
            }
        }
        match fs::rename(&backup, &self.install_dir) {
            Ok(()) => Error::UpdateFailed(format!("{}; previous version restored", reason)),
            Err(e) => Error::UpdateFailed(format!(
                "{}; could not restore backup ({}). Previous version kept at {}",
                reason,
                e,
                backup.display()
            )),
        }
    }
}

fn download(client: &Client, url: &str, dest: &Path) -> Result<()> {
    debug!(%url, dest = %dest.display(), "downloading archive");
    let mut res = client
        .get(url)
        .send()
        .map_err(|e| Error::UpdateFailed(format!("download failed: {}", e)))?;
    if !res.status().is_success() {
        return Err(Error::UpdateFailed(format!(
            "download failed: {} returned {}",
            url,
            res.status()
        )));
    }

    let mut file = File::create(dest)?;
    res.copy_to(&mut file)
        .map_err(|e| Error::UpdateFailed(format!("download failed: {}", e)))?;
    Ok(())
}

/// Unpack `archive` into `into` and return its top-level directory.
fn extract(archive: &Path, into: &Path) -> Result<PathBuf> {
    fs::create_dir_all(into)?;
    let file = File::open(archive)?;
    Archive::new(GzDecoder::new(file))
        .unpack(into)
        .map_err(|e| Error::UpdateFailed(format!("could not extract archive: {}", e)))?;

    for entry in fs::read_dir(into)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            return Ok(entry.path());
        }
    }
    Err(Error::UpdateFailed(
        "archive did not contain a directory".to_string(),
    ))
}
