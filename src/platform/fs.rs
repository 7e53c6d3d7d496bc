// Platform-specific filesystem operations

use std::io;
use std::path::Path;

/// Capacity figures of a mounted filesystem, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsUsage {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub available_bytes: u64,
}

#[cfg(unix)]
pub fn filesystem_usage(mount_point: &Path) -> io::Result<FsUsage> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(mount_point.as_os_str().as_bytes())?;
    // SAFETY: statvfs is plain old data, fully written by a successful call
    let mut stats: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is NUL-terminated and stats is a valid out pointer
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stats) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    let block_size = stats.f_frsize as u64;
    Ok(FsUsage {
        total_bytes: (stats.f_blocks as u64).saturating_mul(block_size),
        free_bytes: (stats.f_bfree as u64).saturating_mul(block_size),
        available_bytes: (stats.f_bavail as u64).saturating_mul(block_size),
    })
}

#[cfg(not(unix))]
pub fn filesystem_usage(_mount_point: &Path) -> io::Result<FsUsage> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "statvfs is not available on this platform",
    ))
}

/// Read a small text file and trim trailing whitespace
pub fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim_end().to_string())
}
