//! Script execution with captured output
//!
//! Executing documents is a trust boundary. The runner never decides what is
//! allowed to run; the resolver only hands it paths that matched the
//! allow-list. How a script actually runs is behind [`ScriptExecutor`].

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::content::ContentResult;
use crate::error::{Result, ServeError};
use crate::http::mime::TEXT_HTML;

/// In-memory sink standing in for a script's standard output.
///
/// One buffer is created per run and dropped with it, so output from one
/// script can never leak into another response or onto the server's own
/// stdout.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    bytes: Vec<u8>,
}

impl CaptureBuffer {
    pub fn write(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Runs one script, sending everything it prints to `stdout`.
///
/// Returning an error means the script failed; whatever was captured so far
/// is discarded by the caller.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn execute(&self, script: &Path, stdout: &mut CaptureBuffer) -> anyhow::Result<()>;
}

/// Executes scripts as `<interpreter> <script>` child processes.
///
/// The child's stdout is piped into the capture buffer, stderr goes to the
/// server's stderr and stdin is closed. The child is killed if the run is
/// dropped before it finishes.
#[derive(Debug, Clone)]
pub struct InterpreterExecutor {
    interpreter: String,
}

impl InterpreterExecutor {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }
}

#[async_trait]
impl ScriptExecutor for InterpreterExecutor {
    async fn execute(&self, script: &Path, stdout: &mut CaptureBuffer) -> anyhow::Result<()> {
        let mut child = Command::new(&self.interpreter)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start {}", self.interpreter))?;

        let mut pipe = child
            .stdout
            .take()
            .context("child stdout was not piped")?;

        let mut output = Vec::new();
        pipe.read_to_end(&mut output).await?;
        let status = child.wait().await?;

        if !status.success() {
            anyhow::bail!("{} exited with {}", self.interpreter, status);
        }

        stdout.write(&output);
        Ok(())
    }
}

/// Runs allow-listed scripts and wraps their output as `text/html`.
#[derive(Clone)]
pub struct ScriptRunner {
    executor: Arc<dyn ScriptExecutor>,
}

impl ScriptRunner {
    pub fn new(executor: Arc<dyn ScriptExecutor>) -> Self {
        Self { executor }
    }

    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self::new(Arc::new(InterpreterExecutor::new(interpreter)))
    }

    pub async fn run(&self, script: &Path) -> Result<ContentResult> {
        let mut capture = CaptureBuffer::default();

        tracing::debug!(script = %script.display(), "Running script");

        self.executor
            .execute(script, &mut capture)
            .await
            .map_err(|e| ServeError::ScriptExecution {
                script: script.display().to_string(),
                reason: format!("{:#}", e),
            })?;

        tracing::debug!(
            script = %script.display(),
            bytes = capture.len(),
            "Script finished"
        );

        Ok(ContentResult::new(capture.into_bytes(), TEXT_HTML))
    }
}
