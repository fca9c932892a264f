use crate::api::REQUEST_TIMEOUT;
use crate::cli::UpdateArgs;
use crate::error::Error;
use crate::ui;
use crate::update::{
    archive_url, check_for_updates, default_probes, locate_install_dir, GithubReleases,
    InstallProbe, Installer, PostInstall, ReleaseSource, UpdateCheckResult, CURRENT_VERSION,
    REINSTALL_HINT,
};
use crossterm::style::Stylize;
use reqwest::blocking::Client;
use std::time::Duration;

pub fn run(args: &UpdateArgs) -> anyhow::Result<()> {
    let source = GithubReleases::from_env(REQUEST_TIMEOUT)?;
    if args.check {
        check(&source, CURRENT_VERSION)?;
        Ok(())
    } else {
        let plan = UpdatePlan::for_repo(source.repo());
        perform(&source, &plan, CURRENT_VERSION, args.force)
    }
}

/// Where `update` looks for the install, what it downloads and what it runs
/// afterwards.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    pub probes: Vec<InstallProbe>,
    pub archive_url: String,
    pub post_install: PostInstall,
}

impl UpdatePlan {
    pub fn for_repo(repo: &str) -> Self {
        Self {
            probes: default_probes(),
            archive_url: archive_url(repo),
            post_install: PostInstall::default(),
        }
    }
}

/// `update --check`: report the comparison to the user.
pub fn check(source: &dyn ReleaseSource, current: &str) -> anyhow::Result<UpdateCheckResult> {
    let spinner = ui::spinner("Checking for updates...");
    let result = check_for_updates(source, current);

    if let Some(err) = &result.error {
        ui::spinner_failure(&spinner, "Failed to check for updates");
        anyhow::bail!("{}", err);
    }
    ui::spinner_success(&spinner, "Update check complete");

    match (result.update_available, result.latest_version) {
        (true, Some(latest)) => {
            println!("\n{}", "Update available!".yellow());
            println!("{}", format!("   Current: {}", result.current_version).dark_grey());
            println!("{}", format!("   Latest:  {}", latest).green());
            println!("\n   Run {} to upgrade\n", "gisph update".bold().cyan());
        }
        _ => {
            ui::success(&format!(
                "You're on the latest version ({})",
                result.current_version
            ));
        }
    }
    Ok(result)
}

/// `update`: check (unless forced), find the install and replace it.
pub fn perform(
    source: &dyn ReleaseSource,
    plan: &UpdatePlan,
    current: &str,
    force: bool,
) -> anyhow::Result<()> {
    println!("\n{}\n", "Updating CLI...".blue());

    if !force {
        let result = check_for_updates(source, current);
        if let Some(err) = result.error {
            anyhow::bail!("{}", err);
        }
        if !result.update_available {
            ui::success(&format!(
                "Already on the latest version ({})",
                result.current_version
            ));
            ui::hint("Use --force to reinstall anyway");
            return Ok(());
        }
    }

    let Some(install_dir) = locate_install_dir(&plan.probes) else {
        ui::warning("Please reinstall using:");
        ui::hint(REINSTALL_HINT);
        return Err(Error::InstallDirNotFound.into());
    };

    // The archive can take a while; only the connect is bounded.
    let client = Client::builder()
        .timeout(None::<Duration>)
        .connect_timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("gisph-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::UpdateFailed(e.to_string()))?;
    let installer = Installer::new(install_dir).with_post_install(plan.post_install.clone());

    let spinner = ui::spinner("Downloading latest version...");
    let outcome = installer.update_from_url(&client, &plan.archive_url, |step| {
        spinner.set_message(step.message())
    });
    match outcome {
        Ok(version) => {
            ui::spinner_success(&spinner, "Update complete!");
            ui::success(&format!("Successfully updated to version {}", version));
            ui::hint("Changes will take effect immediately.");
            Ok(())
        }
        Err(e) => {
            ui::spinner_failure(&spinner, "Update failed");
            ui::warning("If the problem persists, try reinstalling:");
            ui::hint(REINSTALL_HINT);
            Err(e.into())
        }
    }
}
