/// Whether the process runs with root privileges (effective UID 0)
#[cfg(unix)]
pub fn is_elevated() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    false
}

/// Prefix needed to run a privileged command.
///
/// Root needs none. Otherwise `sudo -n` for a non-interactive attempt that
/// fails instead of prompting, or plain `sudo` for a command a user will
/// run by hand.
pub fn privilege_prefix(is_root: bool, non_interactive: bool) -> &'static str {
    match (is_root, non_interactive) {
        (true, _) => "",
        (false, true) => "sudo -n ",
        (false, false) => "sudo ",
    }
}
