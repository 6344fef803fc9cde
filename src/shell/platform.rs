//! Platform-specific process queries.

use crate::error::Result;

/// Outcome of [`drop_privileges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeDrop {
    /// The process was not running elevated.
    NotElevated,
    /// Privileges were dropped to the invoking sudo user.
    Dropped { uid: u32, gid: u32 },
    /// Running elevated with nobody to drop to.
    StillElevated,
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive prompts in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Give up root privileges when started through sudo.
///
/// Files written into the cache while elevated would otherwise belong to root
/// and be unusable by later unprivileged runs. `sudo_ids` carries the parsed
/// `SUDO_UID`/`SUDO_GID` of the invoking user.
pub fn drop_privileges(sudo_ids: Option<(u32, u32)>) -> Result<PrivilegeDrop> {
    if !is_elevated() {
        return Ok(PrivilegeDrop::NotElevated);
    }

    let Some((uid, gid)) = sudo_ids else {
        return Ok(PrivilegeDrop::StillElevated);
    };

    #[cfg(unix)]
    {
        // Groups first: after setuid the process may no longer change them.
        // SAFETY: an empty group list needs no buffer; failures are checked.
        if unsafe { libc::setgroups(0, std::ptr::null()) } != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        // SAFETY: plain syscalls with integer arguments; failures are checked.
        if unsafe { libc::setgid(gid as libc::gid_t) } != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        // SAFETY: as above.
        if unsafe { libc::setuid(uid as libc::uid_t) } != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        Ok(PrivilegeDrop::Dropped { uid, gid })
    }

    #[cfg(not(unix))]
    {
        let _ = (uid, gid);
        Ok(PrivilegeDrop::StillElevated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_ci_detects_environment() {
        // Just ensure function doesn't panic
        let _ = is_ci();
    }

    #[test]
    fn drop_privileges_without_root_is_noop() {
        if is_elevated() {
            return;
        }
        assert_eq!(
            drop_privileges(Some((1000, 1000))).unwrap(),
            PrivilegeDrop::NotElevated
        );
        assert_eq!(drop_privileges(None).unwrap(), PrivilegeDrop::NotElevated);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn drop_privileges_clears_supplementary_groups() {
        if !is_elevated() {
            return;
        }

        // SAFETY: the child only makes syscalls before `_exit`.
        let pid = unsafe { libc::fork() };
        assert!(pid >= 0);
        if pid == 0 {
            let code = match drop_privileges(Some((65534, 65534))) {
                Ok(PrivilegeDrop::Dropped { .. }) => {
                    // SAFETY: a zero-sized query writes nothing.
                    let groups = unsafe { libc::getgroups(0, std::ptr::null_mut()) };
                    // SAFETY: plain syscalls.
                    let ids = unsafe { (libc::getuid(), libc::getgid()) };
                    if groups == 0 && ids == (65534, 65534) {
                        0
                    } else {
                        2
                    }
                }
                _ => 1,
            };
            // SAFETY: terminates the forked child without unwinding.
            unsafe { libc::_exit(code) };
        }

        let mut status = 0;
        // SAFETY: waits for the child forked above.
        unsafe { libc::waitpid(pid, &mut status, 0) };
        assert!(libc::WIFEXITED(status));
        assert_eq!(libc::WEXITSTATUS(status), 0);
    }
}
