//! Packaging settings shared by every platform packager.
//!
//! Settings hold the knobs that are not part of the application descriptor:
//! which executables to drive, how long to wait for them, and which CPU
//! architecture to target. They are normally built from `dist.toml` plus CLI
//! overrides via [`SettingsBuilder`].

use serde::Deserialize;
use std::{fmt, time::Duration};

/// Default compiler executable.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Default Debian archive builder executable.
pub const DEFAULT_DEB_BUILDER: &str = "dpkg-deb";

/// Default limit for a single external tool run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// CPU architecture for target binaries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    #[default]
    #[serde(alias = "x86_64")]
    Amd64,
    /// AArch64 / ARM64 (64-bit)
    #[serde(alias = "aarch64")]
    Arm64,
}

impl Arch {
    /// Architecture name understood by the Go toolchain (`GOARCH`).
    pub fn go_arch(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    /// Debian architecture string for control files and package names.
    pub fn debian(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    /// `processorArchitecture` value for Windows application manifests.
    pub fn windows(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_arch())
    }
}

/// Main settings for packaging operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    toolchain: String,
    deb_builder: String,
    timeout: Duration,
    arch: Arch,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            toolchain: DEFAULT_TOOLCHAIN.to_string(),
            deb_builder: DEFAULT_DEB_BUILDER.to_string(),
            timeout: DEFAULT_TIMEOUT,
            arch: Arch::default(),
        }
    }
}

impl Settings {
    /// Compiler executable name or path.
    pub fn toolchain(&self) -> &str {
        &self.toolchain
    }

    /// Debian archive builder executable name or path.
    pub fn deb_builder(&self) -> &str {
        &self.deb_builder
    }

    /// Limit applied to each external tool run.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Target CPU architecture.
    pub fn arch(&self) -> Arch {
        self.arch
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Starts from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compiler executable.
    pub fn toolchain(mut self, program: impl Into<String>) -> Self {
        self.settings.toolchain = program.into();
        self
    }

    /// Sets the Debian archive builder executable.
    pub fn deb_builder(mut self, program: impl Into<String>) -> Self {
        self.settings.deb_builder = program.into();
        self
    }

    /// Sets the per-tool timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the target architecture.
    pub fn arch(mut self, arch: Arch) -> Self {
        self.settings.arch = arch;
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> Settings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_amd64_go() {
        let settings = Settings::default();
        assert_eq!(settings.toolchain(), "go");
        assert_eq!(settings.deb_builder(), "dpkg-deb");
        assert_eq!(settings.arch(), Arch::Amd64);
        assert_eq!(settings.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_builder_overrides() {
        let settings = SettingsBuilder::new()
            .toolchain("/opt/go/bin/go")
            .timeout(Duration::from_secs(30))
            .arch(Arch::Arm64)
            .build();
        assert_eq!(settings.toolchain(), "/opt/go/bin/go");
        assert_eq!(settings.timeout().as_secs(), 30);
        assert_eq!(settings.arch().debian(), "arm64");
    }
}
