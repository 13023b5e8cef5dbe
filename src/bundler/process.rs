//! External tool execution.
//!
//! Pipelines describe a tool run as an [`Invocation`] and hand it to a
//! [`CommandRunner`]. [`SystemRunner`] spawns real processes; tests swap in a
//! runner that records invocations instead.

use crate::bundler::error::{Error, Result, ToolRole};
use std::{
    ffi::OsString,
    future::Future,
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

/// A fully described external tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// What the tool is used for; decides the error classification.
    pub role: ToolRole,
    /// Executable name or path.
    pub program: String,
    /// Positional and flag arguments.
    pub args: Vec<OsString>,
    /// Working directory of the child.
    pub cwd: PathBuf,
    /// Variables added to the inherited environment.
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    /// Starts an invocation of `program` running in `cwd`.
    pub fn new(role: ToolRole, program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            role,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            envs: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds one environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Value of an added environment variable, if any.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Human-readable command line for logs and errors.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Error for a run that finished with a failing status.
    pub fn failure(&self, code: Option<i32>) -> Error {
        match self.role {
            ToolRole::Compiler => Error::Build {
                command: self.command_line(),
                code,
            },
            ToolRole::Packager => Error::Packaging {
                command: self.command_line(),
                code,
            },
        }
    }
}

/// Executes invocations to completion.
pub trait CommandRunner: Send + Sync {
    /// Runs `invocation`, returning once the child has exited successfully.
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<()>> + Send;
}

impl<R: CommandRunner> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<()>> + Send {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes.
///
/// The child's stdout and stderr are inherited so compiler diagnostics reach
/// the terminal as they are produced. A child still running when the timeout
/// expires is killed.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    /// Creates a runner that allows each child `timeout` to finish.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        let command_line = invocation.command_line();

        let program = which::which(&invocation.program).map_err(|e| {
            log::debug!("{} lookup failed: {}", invocation.program, e);
            Error::ToolNotFound {
                role: invocation.role,
                tool: invocation.program.clone(),
            }
        })?;

        log::debug!(
            "Running `{}` in {} (env: {:?})",
            command_line,
            invocation.cwd.display(),
            invocation.envs
        );

        let mut child = tokio::process::Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::CommandFailed {
                role: invocation.role,
                command: command_line.clone(),
                error,
            })?;

        let waited = tokio::time::timeout(self.timeout, child.wait()).await;
        match waited {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(invocation.failure(status.code())),
            Ok(Err(error)) => Err(Error::CommandFailed {
                role: invocation.role,
                command: command_line,
                error,
            }),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill timed out `{}`: {}", command_line, e);
                }
                Err(Error::Timeout {
                    role: invocation.role,
                    command: command_line,
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::error::ErrorKind;

    #[test]
    fn test_command_line_rendering() {
        let inv = Invocation::new(ToolRole::Packager, "dpkg-deb", "/tmp")
            .arg("--build")
            .arg("--root-owner-group")
            .arg("foo_1.0-1_amd64");
        assert_eq!(
            inv.command_line(),
            "dpkg-deb --build --root-owner-group foo_1.0-1_amd64"
        );
    }

    #[test]
    fn test_failure_follows_role() {
        let build = Invocation::new(ToolRole::Compiler, "go", "/tmp").failure(Some(1));
        assert_eq!(build.kind(), ErrorKind::Build);

        let pack = Invocation::new(ToolRole::Packager, "dpkg-deb", "/tmp").failure(Some(2));
        assert!(matches!(pack, Error::Packaging { code: Some(2), .. }));
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let runner = SystemRunner::new(Duration::from_secs(5));
        let inv = Invocation::new(
            ToolRole::Compiler,
            "appdist-definitely-not-a-real-tool",
            std::env::temp_dir(),
        );
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::Build);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_carries_code() {
        let runner = SystemRunner::new(Duration::from_secs(5));
        let inv = Invocation::new(ToolRole::Packager, "sh", std::env::temp_dir())
            .arg("-c")
            .arg("exit 3");
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, Error::Packaging { code: Some(3), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_env_and_cwd_reach_child() {
        let temp = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new(Duration::from_secs(5));
        let inv = Invocation::new(ToolRole::Compiler, "sh", temp.path())
            .arg("-c")
            .arg("printf '%s' \"$GOOS\" > marker")
            .env("GOOS", "darwin");
        runner.run(&inv).await.unwrap();
        let marker = std::fs::read_to_string(temp.path().join("marker")).unwrap();
        assert_eq!(marker, "darwin");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_child_times_out() {
        let runner = SystemRunner::new(Duration::from_millis(200));
        let inv = Invocation::new(ToolRole::Compiler, "sleep", std::env::temp_dir()).arg("5");
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
