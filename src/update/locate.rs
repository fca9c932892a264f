//! Finding the directory the CLI was installed into.
//!
//! Each [`InstallProbe`] looks in one place and returns a path or nothing;
//! [`locate_install_dir`] walks them in order and takes the first hit.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File that marks the root of an installed source tree.
pub const MANIFEST: &str = "Cargo.toml";
pub const INSTALL_DIR_ENV: &str = "MYAPI_INSTALL_DIR";

const RECORDED_PATH: &[&str] = &[".config", "gisph", "install_dir"];
const WELL_KNOWN_DIRS: &[&str] = &[".gisph", ".gisph-cli"];
const MAX_EXE_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallProbe {
    /// A file written by the installer containing the install path.
    RecordedPath(PathBuf),
    /// A path taken from the environment.
    EnvOverride(Option<PathBuf>),
    /// Conventional locations; each must contain the manifest.
    WellKnown(Vec<PathBuf>),
    /// The running executable, only when it is a symlink: its target is
    /// walked up to the nearest ancestor holding the manifest. A plain binary
    /// (say, inside a development checkout) never counts as an install.
    Executable(Option<PathBuf>),
}

impl InstallProbe {
    pub fn probe(&self) -> Option<PathBuf> {
        match self {
            InstallProbe::RecordedPath(file) => {
                let recorded = fs::read_to_string(file).ok()?;
                let dir = PathBuf::from(recorded.trim());
                (!dir.as_os_str().is_empty() && dir.exists()).then_some(dir)
            }
            InstallProbe::EnvOverride(dir) => dir.as_ref().filter(|d| d.exists()).cloned(),
            InstallProbe::WellKnown(dirs) => dirs.iter().find(|d| has_manifest(d)).cloned(),
            InstallProbe::Executable(exe) => {
                let exe = exe.as_ref()?;
                if !fs::symlink_metadata(exe).ok()?.file_type().is_symlink() {
                    return None;
                }
                let real = fs::canonicalize(exe).ok()?;
                real.ancestors()
                    .skip(1)
                    .take(MAX_EXE_DEPTH)
                    .find(|d| has_manifest(d))
                    .map(Path::to_path_buf)
            }
        }
    }
}

/// The probes for this machine, in priority order.
pub fn default_probes() -> Vec<InstallProbe> {
    let home = home_dir();
    probes_for(
        home.as_deref(),
        env::var_os(INSTALL_DIR_ENV).map(PathBuf::from),
        invoked_path().or_else(|| env::current_exe().ok()),
    )
}

/// The path the binary was started through: `argv[0]` as given, or looked
/// up on `PATH` when it is a bare name. `current_exe` already resolves
/// symlinks on some platforms, so it is only the fallback.
fn invoked_path() -> Option<PathBuf> {
    let argv0 = PathBuf::from(env::args_os().next()?);
    if argv0.components().count() > 1 {
        return Some(argv0);
    }
    which::which(&argv0).ok()
}

pub fn probes_for(
    home: Option<&Path>,
    env_dir: Option<PathBuf>,
    exe: Option<PathBuf>,
) -> Vec<InstallProbe> {
    let mut probes = Vec::new();
    if let Some(home) = home {
        probes.push(InstallProbe::RecordedPath(
            RECORDED_PATH.iter().fold(home.to_path_buf(), |p, c| p.join(c)),
        ));
    }
    probes.push(InstallProbe::EnvOverride(env_dir.filter(|p| !p.as_os_str().is_empty())));
    if let Some(home) = home {
        probes.push(InstallProbe::WellKnown(
            WELL_KNOWN_DIRS.iter().map(|d| home.join(d)).collect(),
        ));
    }
    probes.push(InstallProbe::Executable(exe));
    probes
}

pub fn locate_install_dir(probes: &[InstallProbe]) -> Option<PathBuf> {
    probes.iter().find_map(|p| {
        let found = p.probe();
        debug!(probe = ?p, found = ?found, "install dir probe");
        found
    })
}

/// `HOME`, then `USERPROFILE`, then the platform lookup.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

fn has_manifest(dir: &Path) -> bool {
    dir.is_dir() && dir.join(MANIFEST).is_file()
}
