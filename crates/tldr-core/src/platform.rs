//! Target platforms for tldr pages
//!
//! Pages are organized per operating system, plus the special "common"
//! platform for OS-independent commands.

use std::fmt;
use std::str::FromStr;

/// A page platform. The set is closed: it mirrors the directories of the
/// upstream page repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    OsX,
    Windows,
    SunOs,
    FreeBsd,
    NetBsd,
    OpenBsd,
    Android,
    /// OS-independent pages.
    Common,
}

/// All platforms, in the order used to extend a priority list.
pub const ALL_PLATFORMS: [Platform; 9] = [
    Platform::Linux,
    Platform::OsX,
    Platform::Windows,
    Platform::SunOs,
    Platform::FreeBsd,
    Platform::NetBsd,
    Platform::OpenBsd,
    Platform::Android,
    Platform::Common,
];

impl Platform {
    /// The directory name used in page URLs and cache paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::OsX => "osx",
            Platform::Windows => "windows",
            Platform::SunOs => "sunos",
            Platform::FreeBsd => "freebsd",
            Platform::NetBsd => "netbsd",
            Platform::OpenBsd => "openbsd",
            Platform::Android => "android",
            Platform::Common => "common",
        }
    }

    /// The platform the client is currently running on.
    ///
    /// Unknown operating systems fall back to [`Platform::Common`], which
    /// still resolves OS-independent pages.
    pub fn host() -> Platform {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::OsX,
            "windows" => Platform::Windows,
            "solaris" | "illumos" => Platform::SunOs,
            "freebsd" => Platform::FreeBsd,
            "netbsd" => Platform::NetBsd,
            "openbsd" => Platform::OpenBsd,
            "android" => Platform::Android,
            _ => Platform::Common,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "osx" | "macos" | "darwin" => Ok(Platform::OsX),
            "windows" => Ok(Platform::Windows),
            "sunos" | "solaris" => Ok(Platform::SunOs),
            "freebsd" => Ok(Platform::FreeBsd),
            "netbsd" => Ok(Platform::NetBsd),
            "openbsd" => Ok(Platform::OpenBsd),
            "android" => Ok(Platform::Android),
            "common" => Ok(Platform::Common),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Build the ordered platform search list.
///
/// An explicit override replaces the whole list with a singleton. Otherwise
/// the list is: current platform, then "common", then every other platform.
/// No platform appears twice.
pub fn platform_list(override_platform: Option<Platform>) -> Vec<Platform> {
    if let Some(platform) = override_platform {
        return vec![platform];
    }

    let mut list = vec![Platform::host(), Platform::Common];
    for platform in ALL_PLATFORMS {
        if !list.contains(&platform) {
            list.push(platform);
        }
    }
    list.dedup();
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("macos".parse::<Platform>(), Ok(Platform::OsX));
        assert_eq!("darwin".parse::<Platform>(), Ok(Platform::OsX));
        assert_eq!("SunOS".parse::<Platform>(), Ok(Platform::SunOs));
        assert!("plan9".parse::<Platform>().is_err());
    }

    #[test]
    fn test_override_is_singleton() {
        assert_eq!(platform_list(Some(Platform::Windows)), vec![Platform::Windows]);
    }

    #[test]
    fn test_list_has_no_duplicates() {
        let list = platform_list(None);
        for (i, p) in list.iter().enumerate() {
            assert!(!list[i + 1..].contains(p), "{} appears twice", p);
        }
        assert_eq!(list.len(), ALL_PLATFORMS.len());
    }

    #[test]
    fn test_host_ranks_first_then_common() {
        let list = platform_list(None);
        assert_eq!(list[0], Platform::host());
        if Platform::host() != Platform::Common {
            assert_eq!(list[1], Platform::Common);
        }
    }
}
