//! Shared fixtures for integration tests.

#![allow(dead_code)]

use appdist::bundler::{
    CommandRunner, Invocation, Result,
    error::ToolRole,
};
use image::{ImageBuffer, Rgba};
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

pub const APP_YML: &str = "\
id: foo
long_id: com.example.foo
name: Foo
version: \"1.0\"
description: Foo app
contact: a@b.com
main: ./cmd/foo
icon: assets/icon.png
copyright: (c) Example
";

/// Project tree with a descriptor, an entry point directory and a PNG icon.
pub fn project() -> tempfile::TempDir {
    project_with(APP_YML)
}

pub fn project_with(app_yml: &str) -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    std::fs::write(root.join("app.yml"), app_yml).unwrap();
    std::fs::create_dir_all(root.join("cmd/foo")).unwrap();
    std::fs::write(root.join("cmd/foo/main.go"), "package main\n\nfunc main() {}\n").unwrap();
    std::fs::create_dir_all(root.join("assets")).unwrap();
    ImageBuffer::from_pixel(64, 64, Rgba([30u8, 144, 255, 255]))
        .save(root.join("assets/icon.png"))
        .unwrap();
    temp
}

/// Runner that records invocations and emulates the compiler and `dpkg-deb`
/// by creating the files they would produce.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    fail_role: Option<ToolRole>,
    silent: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner whose `role` invocations exit with code 2.
    pub fn failing(role: ToolRole) -> Self {
        Self {
            fail_role: Some(role),
            ..Self::default()
        }
    }

    /// Runner whose invocations all succeed without writing any output.
    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_with_role(&self, role: ToolRole) -> Vec<Invocation> {
        self.calls().into_iter().filter(|c| c.role == role).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.lock().unwrap().push(invocation.clone());

        if self.fail_role == Some(invocation.role) {
            return Err(invocation.failure(Some(2)));
        }
        if self.silent {
            return Ok(());
        }

        match invocation.role {
            ToolRole::Compiler => {
                let output = invocation.cwd.join(&invocation.args[2]);
                std::fs::write(output, b"\x7fELF fake binary").unwrap();
            }
            ToolRole::Packager => {
                let folder = invocation.args.last().unwrap().to_string_lossy().into_owned();
                std::fs::write(invocation.cwd.join(format!("{folder}.deb")), b"!<arch>\n").unwrap();
            }
        }
        Ok(())
    }
}

/// Relative paths of every entry under `root`, sorted.
pub fn tree(root: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap().path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    entries.sort();
    entries
}
