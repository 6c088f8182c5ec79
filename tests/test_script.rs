//! Tests for script execution and output capture

mod common;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docserve::content::{CaptureBuffer, InterpreterExecutor, ScriptExecutor, ScriptRunner};
use docserve::error::ServeError;

/// Writes a fixed page in-process and counts how often it ran.
#[derive(Default)]
struct CountingExecutor {
    runs: AtomicUsize,
}

#[async_trait]
impl ScriptExecutor for CountingExecutor {
    async fn execute(&self, _script: &Path, stdout: &mut CaptureBuffer) -> anyhow::Result<()> {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        stdout.write(format!("<p>run {}</p>", run).as_bytes());
        Ok(())
    }
}

/// Prints something, then fails.
struct FailingExecutor;

#[async_trait]
impl ScriptExecutor for FailingExecutor {
    async fn execute(&self, _script: &Path, stdout: &mut CaptureBuffer) -> anyhow::Result<()> {
        stdout.write(b"partial output");
        anyhow::bail!("division by zero")
    }
}

#[test]
fn test_capture_buffer() {
    let mut capture = CaptureBuffer::default();
    assert!(capture.is_empty());

    capture.write(b"hello ");
    capture.write(b"world");

    assert_eq!(capture.len(), 11);
    assert_eq!(capture.into_bytes(), b"hello world".to_vec());
}

#[tokio::test]
async fn test_runner_returns_captured_output_as_html() {
    let executor = Arc::new(CountingExecutor::default());
    let runner = ScriptRunner::new(executor.clone());

    let content = runner.run(Path::new("make_time.py")).await.unwrap();

    assert_eq!(content.body, b"<p>run 1</p>".to_vec());
    assert_eq!(content.mime_type, "text/html");
    assert_eq!(executor.runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_runner_uses_fresh_capture_per_run() {
    let runner = ScriptRunner::new(Arc::new(CountingExecutor::default()));

    let first = runner.run(Path::new("make_time.py")).await.unwrap();
    let second = runner.run(Path::new("make_time.py")).await.unwrap();

    assert_eq!(first.body, b"<p>run 1</p>".to_vec());
    assert_eq!(second.body, b"<p>run 2</p>".to_vec());
}

#[tokio::test]
async fn test_runner_failure_is_script_execution_error() {
    let runner = ScriptRunner::new(Arc::new(FailingExecutor));

    let result = runner.run(Path::new("make_time.py")).await;

    match result {
        Err(ServeError::ScriptExecution { script, reason }) => {
            assert_eq!(script, "make_time.py");
            assert!(reason.contains("division by zero"));
        }
        other => panic!("expected script failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_interpreter_executor_captures_stdout() {
    let root = common::webroot();
    let runner = ScriptRunner::with_interpreter("sh");

    let content = runner.run(&root.path().join("make_time.sh")).await.unwrap();

    assert_eq!(content.body, common::SCRIPT_OUTPUT.as_bytes());
}

#[tokio::test]
async fn test_interpreter_executor_nonzero_exit_fails() {
    let root = common::webroot();
    let script = root.path().join("broken.sh");
    std::fs::write(&script, "echo before\nexit 3\n").unwrap();

    let result = ScriptRunner::with_interpreter("sh").run(&script).await;

    assert!(matches!(result, Err(ServeError::ScriptExecution { .. })));
}

#[tokio::test]
async fn test_interpreter_executor_missing_interpreter_fails() {
    let root = common::webroot();
    let executor = InterpreterExecutor::new("/no/such/interpreter");
    assert_eq!(executor.interpreter(), "/no/such/interpreter");

    let result = ScriptRunner::new(Arc::new(executor))
        .run(&root.path().join("make_time.sh"))
        .await;

    assert!(matches!(result, Err(ServeError::ScriptExecution { .. })));
}

#[tokio::test]
async fn test_resolver_only_runs_allow_listed_scripts() {
    let root = common::webroot();
    let executor = Arc::new(CountingExecutor::default());
    let resolver = common::resolver_with(root.path(), executor.clone());

    let raw = resolver.resolve("/other.sh").await.unwrap();
    assert_eq!(raw.body, common::INERT_SCRIPT.as_bytes());
    assert_eq!(executor.runs.load(Ordering::SeqCst), 0);

    let ran = resolver.resolve("/make_time.sh").await.unwrap();
    assert_eq!(ran.body, b"<p>run 1</p>".to_vec());
    assert_eq!(executor.runs.load(Ordering::SeqCst), 1);
}
