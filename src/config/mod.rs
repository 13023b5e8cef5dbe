//! Optional per-project configuration (`dist.toml`).
//!
//! ```toml
//! [toolchain]
//! program = "go"
//! timeout_secs = 600
//! arch = "amd64"
//!
//! [linux]
//! deb_builder = "dpkg-deb"
//! ```
//!
//! Every key is optional. A missing file means defaults; unknown keys are
//! rejected so typos do not silently fall back to defaults.

use crate::bundler::{Arch, Settings, SettingsBuilder};
use crate::error::ConfigError;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// File name of the configuration inside a project root.
pub const CONFIG_FILE_NAME: &str = "dist.toml";

/// Parsed `dist.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistConfig {
    /// `[toolchain]` section
    pub toolchain: ToolchainConfig,
    /// `[linux]` section
    pub linux: LinuxConfig,
}

/// Compiler settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Compiler executable
    pub program: Option<String>,
    /// Limit for each external tool run, in seconds
    pub timeout_secs: Option<u64>,
    /// Target architecture
    pub arch: Option<Arch>,
}

/// Debian packaging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinuxConfig {
    /// Archive builder executable
    pub deb_builder: Option<String>,
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--toolchain`
    pub toolchain: Option<String>,
    /// `--timeout`
    pub timeout_secs: Option<u64>,
}

impl DistConfig {
    /// Parses configuration text; `path` is only used in error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `dist.toml` from a project root, or defaults when there is none.
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        let path = config_path(project_root);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let config = Self::from_toml(&text, &path)?;
                log::debug!("Loaded {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, project_root.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Merges the file with command line overrides into packaging settings.
    pub fn into_settings(self, overrides: &Overrides) -> Result<Settings, ConfigError> {
        let mut builder = SettingsBuilder::new();

        if let Some(program) = overrides.toolchain.clone().or(self.toolchain.program) {
            builder = builder.toolchain(non_empty("toolchain.program", program)?);
        }
        if let Some(program) = self.linux.deb_builder {
            builder = builder.deb_builder(non_empty("linux.deb_builder", program)?);
        }
        if let Some(secs) = overrides.timeout_secs.or(self.toolchain.timeout_secs) {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "toolchain.timeout_secs".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(arch) = self.toolchain.arch {
            builder = builder.arch(arch);
        }

        Ok(builder.build())
    }
}

/// Location of `dist.toml` under a project root.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

fn non_empty(key: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<DistConfig, ConfigError> {
        DistConfig::from_toml(text, Path::new("dist.toml"))
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = parse("").unwrap().into_settings(&Overrides::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_file_values_apply() {
        let config = parse(
            "[toolchain]\nprogram = \"/opt/go/bin/go\"\ntimeout_secs = 30\narch = \"arm64\"\n\n[linux]\ndeb_builder = \"fakeroot-dpkg\"\n",
        )
        .unwrap();
        let settings = config.into_settings(&Overrides::default()).unwrap();
        assert_eq!(settings.toolchain(), "/opt/go/bin/go");
        assert_eq!(settings.deb_builder(), "fakeroot-dpkg");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.arch(), Arch::Arm64);
    }

    #[test]
    fn test_overrides_win() {
        let config = parse("[toolchain]\nprogram = \"go1.22\"\ntimeout_secs = 30\n").unwrap();
        let overrides = Overrides {
            toolchain: Some("tinygo".into()),
            timeout_secs: Some(5),
        };
        let settings = config.into_settings(&overrides).unwrap();
        assert_eq!(settings.toolchain(), "tinygo");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse("[toolchain]\nprogramme = \"go\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse("[toolchain]\ntimeout_secs = 0\n")
            .unwrap()
            .into_settings(&Overrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(
            DistConfig::load_from_project(temp.path()).unwrap(),
            DistConfig::default()
        );
    }
}
