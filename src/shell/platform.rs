//! Platform detection.

use std::path::Path;

/// File whose presence identifies an Ubuntu (lsb-release) system.
pub const LSB_RELEASE: &str = "/etc/lsb-release";

/// Name of the operating system this binary was built for.
pub fn os_name() -> &'static str {
    std::env::consts::OS
}

/// Check whether this is an Ubuntu-like distribution.
pub fn has_lsb_release() -> bool {
    Path::new(LSB_RELEASE).is_file()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
