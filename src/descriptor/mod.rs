//! Application descriptor (`app.yml`) loading.
//!
//! The descriptor is read once per invocation and handed to the packagers as an
//! immutable record.

use crate::bundler::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the descriptor inside a project root.
pub const DESCRIPTOR_FILE_NAME: &str = "app.yml";

/// Identity and build inputs of the application being packaged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppDescriptor {
    /// Package and binary short name, filesystem-safe.
    #[serde(default)]
    pub id: String,

    /// Reverse-domain identifier (e.g. `com.example.foo`).
    #[serde(default)]
    pub long_id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Free-form version string.
    #[serde(default)]
    pub version: String,

    /// One-line description.
    #[serde(default)]
    pub description: String,

    /// Maintainer contact string.
    #[serde(default)]
    pub contact: String,

    /// Entry point path, relative to the project root.
    #[serde(rename = "main", default)]
    pub main_dir: String,

    /// Source raster icon, relative to the project root.
    #[serde(rename = "icon", default)]
    pub icon_file: String,

    /// Copyright notice.
    #[serde(default)]
    pub copyright: String,
}

impl AppDescriptor {
    /// Loads and validates the descriptor at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| Error::DescriptorRead {
            path: path.to_path_buf(),
            error,
        })?;
        let descriptor = Self::from_yaml(&text).map_err(|e| match e {
            Error::DescriptorParse { error, .. } => Error::DescriptorParse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })?;
        log::debug!(
            "Loaded descriptor for {} {} from {}",
            descriptor.id,
            descriptor.version,
            path.display()
        );
        Ok(descriptor)
    }

    /// Loads `app.yml` from a project root.
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        Self::load(&project_root.join(DESCRIPTOR_FILE_NAME))
    }

    /// Parses and validates descriptor YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let descriptor: Self =
            serde_yaml::from_str(text).map_err(|error| Error::DescriptorParse {
                path: PathBuf::from(DESCRIPTOR_FILE_NAME),
                error,
            })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Checks the fields every packager relies on.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("id", &self.id),
            ("name", &self.name),
            ("version", &self.version),
            ("main", &self.main_dir),
            ("icon", &self.icon_file),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidDescriptor {
                    field,
                    reason: "missing or empty".into(),
                });
            }
        }

        if !is_filesystem_safe(&self.id) {
            return Err(Error::InvalidDescriptor {
                field: "id",
                reason: format!(
                    "{:?} may only contain ASCII letters, digits, '-', '_' and '.', and must not start with '.'",
                    self.id
                ),
            });
        }

        if self.version.contains(char::is_whitespace) {
            return Err(Error::InvalidDescriptor {
                field: "version",
                reason: format!("{:?} must not contain whitespace", self.version),
            });
        }

        // Both end up in workspace entry names.
        for (field, value) in [("version", &self.version), ("name", &self.name)] {
            if !is_path_component(value) {
                return Err(Error::InvalidDescriptor {
                    field,
                    reason: format!("{value:?} must not contain '/' or '\\', or be '.' or '..'"),
                });
            }
        }

        // Control file fields are one line each.
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("contact", &self.contact),
        ] {
            if value.contains(char::is_control) {
                return Err(Error::InvalidDescriptor {
                    field,
                    reason: "must be a single line without control characters".into(),
                });
            }
        }

        Ok(())
    }

    /// Entry point as a native path relative to the project root.
    pub fn main_path(&self) -> PathBuf {
        from_slash(&self.main_dir)
    }

    /// Absolute location of the source icon.
    pub fn icon_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(from_slash(&self.icon_file))
    }
}

fn is_filesystem_safe(id: &str) -> bool {
    !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_path_component(value: &str) -> bool {
    !value.contains(['/', '\\']) && value != "." && value != ".."
}

/// Converts a slash-separated descriptor path into a native one.
fn from_slash(path: &str) -> PathBuf {
    path.split('/').filter(|part| !part.is_empty()).fold(
        if path.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::new()
        },
        |acc, part| acc.join(part),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::error::ErrorKind;

    const FOO: &str = "\
id: foo
long_id: com.example.foo
name: Foo
version: \"1.0\"
description: Foo app
contact: a@b.com
main: ./cmd/foo
icon: icon.png
copyright: (c) Example
";

    #[test]
    fn test_parses_all_fields() {
        let desc = AppDescriptor::from_yaml(FOO).unwrap();
        assert_eq!(desc.id, "foo");
        assert_eq!(desc.long_id, "com.example.foo");
        assert_eq!(desc.name, "Foo");
        assert_eq!(desc.version, "1.0");
        assert_eq!(desc.contact, "a@b.com");
        assert_eq!(desc.main_dir, "./cmd/foo");
        assert_eq!(desc.icon_file, "icon.png");
        assert_eq!(desc.copyright, "(c) Example");
    }

    #[test]
    fn test_main_path_is_native() {
        let desc = AppDescriptor::from_yaml(FOO).unwrap();
        assert_eq!(
            desc.main_path(),
            PathBuf::from(".").join("cmd").join("foo")
        );
    }

    #[test]
    fn test_missing_required_field() {
        let err = AppDescriptor::from_yaml("id: foo\nname: Foo\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Descriptor);
        assert!(err.to_string().contains("`version`"));
    }

    #[test]
    fn test_rejects_unsafe_id() {
        let yaml = FOO.replace("id: foo", "id: ../foo");
        let err = AppDescriptor::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidDescriptor { field: "id", .. }));
    }

    #[test]
    fn test_rejects_version_with_separators() {
        for version in ["1.0/beta", "1/../../escaped", "1.0\\beta", ".."] {
            let yaml = FOO.replace("version: \"1.0\"", &format!("version: {version:?}"));
            let err = AppDescriptor::from_yaml(&yaml).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDescriptor { field: "version", .. }),
                "{version}: {err}"
            );
        }
    }

    #[test]
    fn test_rejects_name_with_separators() {
        for name in ["../../../Evil", "Foo/Bar", "Foo\\Bar", ".."] {
            let yaml = FOO.replace("name: Foo", &format!("name: {name:?}"));
            let err = AppDescriptor::from_yaml(&yaml).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDescriptor { field: "name", .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_name_may_contain_dots() {
        let yaml = FOO.replace("name: Foo", "name: Foo v1.0...");
        assert_eq!(AppDescriptor::from_yaml(&yaml).unwrap().name, "Foo v1.0...");
    }

    #[test]
    fn test_rejects_multiline_description() {
        let yaml = FOO.replace("description: Foo app", "description: \"Foo app\\nSecond line\"");
        let err = AppDescriptor::from_yaml(&yaml).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDescriptor {
                field: "description",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = AppDescriptor::from_yaml("id: [unterminated").unwrap_err();
        assert!(matches!(err, Error::DescriptorParse { .. }));
    }

    #[test]
    fn test_missing_file_is_descriptor_error() {
        let err = AppDescriptor::load(Path::new("/nonexistent/app.yml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Descriptor);
    }
}
