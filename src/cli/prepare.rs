//! Startup checks run before any command.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::{Settings, SettingsSources};
use crate::error::Result;
use crate::registry::VersionResolver;
use crate::shell::{drop_privileges, PrivilegeDrop};
use crate::ui::UserInterface;
use crate::updates::{self, InstallMethod};

use super::args::Cli;

/// `SUDO_UID` and `SUDO_GID` of the invoking user, when both are set.
pub fn sudo_ids(env: &HashMap<String, String>) -> Option<(u32, u32)> {
    let uid = env.get("SUDO_UID")?.trim().parse().ok()?;
    let gid = env.get("SUDO_GID")?.trim().parse().ok()?;
    Some((uid, gid))
}

/// Stop running as root when started through sudo.
pub fn check_root(env: &HashMap<String, String>) -> Result<PrivilegeDrop> {
    let outcome = drop_privileges(sudo_ids(env))?;
    match outcome {
        PrivilegeDrop::NotElevated => {}
        PrivilegeDrop::Dropped { uid, gid } => {
            tracing::debug!("Dropped root privileges to uid {} gid {}", uid, gid);
        }
        PrivilegeDrop::StillElevated => {
            tracing::warn!("Running as root; files in the cache will belong to root");
        }
    }
    Ok(outcome)
}

/// Version, privileges, home directory and settings, in that order.
pub fn prepare(
    cli: &Cli,
    env: HashMap<String, String>,
    home_dir: Option<PathBuf>,
) -> Result<Settings> {
    tracing::debug!("stencil {}", updates::VERSION);

    check_root(&env)?;

    let settings = Settings::load(SettingsSources {
        home_dir,
        env,
        local_path: cli.local_path.clone(),
        debug: cli.debug,
    })?;
    tracing::debug!("Cache home: {}", settings.cache_home.display());
    if let Some(local) = &settings.local_path {
        tracing::debug!("Local path: {}", local.display());
    }

    Ok(settings)
}

/// Warn when a newer Stencil is published. Lookup failures only warn.
pub fn check_update(resolver: &VersionResolver, ui: &mut dyn UserInterface) {
    match updates::check_for_update(resolver, updates::PACKAGE_NAME, updates::VERSION) {
        Ok(Some(info)) => ui.warning(&info.notice(InstallMethod::detect())),
        Ok(None) => tracing::debug!("stencil {} is up to date", updates::VERSION),
        Err(e) => tracing::warn!("Could not check for updates: {}", e),
    }
}
