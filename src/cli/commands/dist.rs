//! `dist` command: package one project for one platform.

use crate::bundler::{Bundler, Platform};
use crate::cli::{Args, RuntimeConfig};
use crate::config::DistConfig;
use crate::descriptor::{AppDescriptor, DESCRIPTOR_FILE_NAME};
use crate::error::{CliError, Result};
use std::path::Path;

/// Execute dist command
pub(super) async fn execute_dist(
    args: &Args,
    platform: Platform,
    project_dir: &Path,
    config: &RuntimeConfig,
) -> Result<i32> {
    check_project_dir(project_dir)?;

    let output = config.output();
    let _ = output.section(&format!("dist {platform}"));

    let settings = DistConfig::load_from_project(project_dir)?.into_settings(&args.overrides())?;
    let descriptor = AppDescriptor::load_from_project(project_dir)?;
    let _ = output.info(&format!(
        "{} {} ({}) for {}/{}",
        descriptor.name,
        descriptor.version,
        descriptor.id,
        platform.go_os(),
        settings.arch()
    ));

    let artifact = Bundler::new(settings)
        .bundle_descriptor(platform, &descriptor, project_dir)
        .await?;

    let _ = output.success(&format!("Created {}", artifact.path.display()));
    Ok(0)
}

fn check_project_dir(project_dir: &Path) -> std::result::Result<(), CliError> {
    if !project_dir.is_dir() {
        return Err(CliError::ProjectNotFound {
            path: project_dir.to_path_buf(),
        });
    }
    if !project_dir.join(DESCRIPTOR_FILE_NAME).is_file() {
        return Err(CliError::MissingDescriptor {
            path: project_dir.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_checks() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_project_dir(&temp.path().join("missing")),
            Err(CliError::ProjectNotFound { .. })
        ));
        assert!(matches!(
            check_project_dir(temp.path()),
            Err(CliError::MissingDescriptor { .. })
        ));

        std::fs::write(temp.path().join("app.yml"), "id: foo\n").unwrap();
        assert!(check_project_dir(temp.path()).is_ok());
    }
}
