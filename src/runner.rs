//! External command execution
//!
//! Every collaborator is started from an argument vector, never through a
//! shell. `CommandRunner` is the seam tests replace with a scripted fake.

use base64::prelude::*;
use std::ffi::OsString;
use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

use crate::error::ToolError;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// How a command's stdout is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Lossy UTF-8 text
    Text,
    /// Raw bytes encoded with the standard padded base64 alphabet.
    /// Used for tools whose output must survive byte-for-byte.
    Base64,
}

/// One fully-specified command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    /// Paths are kept as `OsString` so non-UTF-8 names reach the tool intact
    pub args: Vec<OsString>,
    pub capture: Capture,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            capture: Capture::Text,
        }
    }

    pub fn with_capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }
}

/// Result of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Successful exit with the given (already captured) stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Non-zero exit with the given stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            status: format!("exit status: {}", code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout of a successful run, or the exit diagnostic
    pub fn into_stdout(self, program: &str) -> Result<String, ToolError> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(ToolError::Failed {
                program: program.to_string(),
                status: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

pub trait CommandRunner {
    /// Run `invocation` to completion and capture its output.
    /// `Err` only when the process could not be started.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send;
}

impl<R: CommandRunner> CommandRunner for Arc<R> {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send {
        (**self).run(invocation)
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        let mut cmd = Command::new(&invocation.program);
        #[cfg(windows)]
        {
            cmd.creation_flags(CREATE_NO_WINDOW);
        }
        let output = cmd
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let stdout = match invocation.capture {
            Capture::Text => String::from_utf8_lossy(&output.stdout).into_owned(),
            Capture::Base64 => BASE64_STANDARD.encode(&output.stdout),
        };

        Ok(ToolOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
