use crate::foundation::error::{OverwriteError, OverwriteResult};
use crate::video::args::EncoderInvocation;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one encoder run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was killed before exiting.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// Return `true` for a zero exit code.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes an encoder invocation to completion.
pub trait EncoderRunner {
    /// Run `invocation`, blocking until it exits.
    ///
    /// Only a failure to launch is an error here; a non-zero exit is reported through
    /// [`ProcessOutput::code`].
    fn run(&self, invocation: &EncoderInvocation) -> OverwriteResult<ProcessOutput>;
}

/// Runs the encoder as a synchronous child process with captured output streams.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl EncoderRunner for SystemRunner {
    fn run(&self, invocation: &EncoderInvocation) -> OverwriteResult<ProcessOutput> {
        let out = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| OverwriteError::process_launch(&invocation.program_name(), e))?;
        Ok(ProcessOutput {
            code: out.status.code(),
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }
}

/// Return `true` when `program -version` runs and exits cleanly.
pub fn is_encoder_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/video/runner.rs"]
mod tests;
