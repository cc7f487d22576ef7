//! Build settings: the target platform axes a binary package is keyed on.
//!
//! Settings describe *where* a package is built for (OS, architecture,
//! compiler, build type), as opposed to options, which describe *how*
//! (shared vs. static, header-only, ...). Every axis defaults to the host
//! platform and can be overridden individually, e.g. `-s os=windows`.

use serde::{Deserialize, Serialize};

/// Errors raised while parsing or overriding settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// The settings key is not one of `os`, `arch`, `compiler`, `build_type`.
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// The value is not admissible for the given key.
    #[error("Invalid value '{value}' for settings key '{key}'")]
    InvalidValue {
        /// The settings key being assigned.
        key: String,
        /// The rejected value.
        value: String,
    },
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Linux (any distribution).
    Linux,
    /// macOS.
    Macos,
    /// Windows.
    Windows,
    /// FreeBSD.
    Freebsd,
}

impl Os {
    /// Get the operating system kiln is running on.
    pub fn host() -> Self {
        #[cfg(target_os = "linux")]
        {
            Self::Linux
        }
        #[cfg(target_os = "macos")]
        {
            Self::Macos
        }
        #[cfg(target_os = "windows")]
        {
            Self::Windows
        }
        #[cfg(target_os = "freebsd")]
        {
            Self::Freebsd
        }
        #[cfg(not(any(
            target_os = "linux",
            target_os = "macos",
            target_os = "windows",
            target_os = "freebsd"
        )))]
        {
            Self::Linux
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Freebsd => "freebsd",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::Macos),
            "windows" | "win32" => Ok(Self::Windows),
            "freebsd" => Ok(Self::Freebsd),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// `x86_64` (amd64).
    X86_64,
    /// ARM64 (aarch64).
    Arm64,
}

impl Arch {
    /// Get the architecture kiln is running on.
    pub fn host() -> Self {
        #[cfg(target_arch = "aarch64")]
        {
            Self::Arm64
        }
        #[cfg(not(target_arch = "aarch64"))]
        {
            Self::X86_64
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}

/// Compiler family used for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    /// GNU GCC.
    Gcc,
    /// LLVM Clang.
    Clang,
    /// Apple Clang (distinct ABI/version scheme from upstream Clang).
    #[serde(rename = "apple-clang")]
    AppleClang,
    /// Microsoft Visual C++.
    Msvc,
}

impl Compiler {
    /// The conventional compiler for the given operating system.
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Linux => Self::Gcc,
            Os::Macos => Self::AppleClang,
            Os::Windows => Self::Msvc,
            Os::Freebsd => Self::Clang,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        }
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "apple-clang" | "appleclang" => Ok(Self::AppleClang),
            "msvc" => Ok(Self::Msvc),
            _ => Err(format!("Unknown compiler: {s}")),
        }
    }
}

/// Optimization profile of the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Unoptimized build with debug info.
    Debug,
    /// Optimized build (default).
    #[default]
    Release,
}

impl BuildType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// The value passed to `-DCMAKE_BUILD_TYPE=`.
    pub fn cmake_name(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(format!("Unknown build type: {s}")),
        }
    }
}

/// The full set of target axes for one packaging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    /// Target operating system.
    pub os: Os,
    /// Target CPU architecture.
    pub arch: Arch,
    /// Compiler family.
    pub compiler: Compiler,
    /// Optimization profile.
    pub build_type: BuildType,
}

impl Settings {
    /// Settings describing the machine kiln is running on.
    pub fn host() -> Self {
        let os = Os::host();
        Self {
            os,
            arch: Arch::host(),
            compiler: Compiler::default_for(os),
            build_type: BuildType::default(),
        }
    }

    /// Override one axis from a `key=value` pair (`-s os=windows`).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownKey`] for keys other than `os`,
    /// `arch`, `compiler` and `build_type`, and
    /// [`SettingsError::InvalidValue`] when the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |key: &str, value: &str| SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "os" => self.os = value.parse().map_err(|_| invalid(key, value))?,
            "arch" => self.arch = value.parse().map_err(|_| invalid(key, value))?,
            "compiler" => self.compiler = value.parse().map_err(|_| invalid(key, value))?,
            "build_type" => self.build_type = value.parse().map_err(|_| invalid(key, value))?,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "os={} arch={} compiler={} build_type={}",
            self.os, self.arch, self.compiler, self.build_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_roundtrip() {
        for os in [Os::Linux, Os::Macos, Os::Windows, Os::Freebsd] {
            assert_eq!(os.as_str().parse::<Os>().unwrap(), os);
        }
    }

    #[test]
    fn test_os_aliases() {
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("win32".parse::<Os>().unwrap(), Os::Windows);
        assert!("beos".parse::<Os>().is_err());
    }

    #[test]
    fn test_settings_set() {
        let mut settings = Settings::host();
        settings.set("os", "windows").unwrap();
        settings.set("build_type", "debug").unwrap();
        assert_eq!(settings.os, Os::Windows);
        assert_eq!(settings.build_type, BuildType::Debug);
    }

    #[test]
    fn test_settings_set_rejects_unknown_key() {
        let mut settings = Settings::host();
        assert!(matches!(
            settings.set("libc", "musl"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_settings_set_rejects_bad_value() {
        let mut settings = Settings::host();
        assert!(matches!(
            settings.set("arch", "sparc"),
            Err(SettingsError::InvalidValue { .. })
        ));
    }
}
