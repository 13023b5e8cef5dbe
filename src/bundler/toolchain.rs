//! Cross-compilation of the application entry point.
//!
//! The toolchain runs inside the project root with the target passed through
//! `GOOS` / `GOARCH`, the output path through `-o` and the entry point as the
//! final positional argument.

use crate::bundler::{
    error::{Error, ErrorExt, Result, ToolRole},
    platform::Platform,
    process::{CommandRunner, Invocation},
    settings::{Arch, Settings},
    workspace,
};
use std::path::Path;

/// Describes the compiler run producing `output` for `target`/`arch`.
pub fn build_invocation(
    settings: &Settings,
    project_root: &Path,
    main_dir: &Path,
    output: &Path,
    target: Platform,
    arch: Arch,
) -> Invocation {
    Invocation::new(ToolRole::Compiler, settings.toolchain(), project_root)
        .arg("build")
        .arg("-o")
        .arg(output)
        .arg(main_dir)
        .env("GOOS", target.go_os())
        .env("GOARCH", arch.go_arch())
}

/// Cross-compiles the entry point into `output`.
///
/// Creates the output's parent directory first. Fails if the compiler exits
/// unsuccessfully or reports success without producing `output`.
pub async fn build_binary<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    project_root: &Path,
    main_dir: &Path,
    output: &Path,
    target: Platform,
    arch: Arch,
) -> Result<()> {
    if let Some(parent) = output.parent() {
        workspace::create_dir_all(parent)
            .await
            .fs_context("error creating binary folder", parent)?;
    }

    let invocation = build_invocation(settings, project_root, main_dir, output, target, arch);
    log::info!(
        "Compiling {} for {}/{}",
        main_dir.display(),
        target.go_os(),
        arch.go_arch()
    );
    runner.run(&invocation).await?;

    if !output.is_file() {
        return Err(Error::ToolOutputMissing {
            role: ToolRole::Compiler,
            command: invocation.command_line(),
            path: output.to_path_buf(),
        });
    }
    Ok(())
}
