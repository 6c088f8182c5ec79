#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use docserve::config::ScriptConfig;
use docserve::content::{Resolver, ScriptExecutor, ScriptRunner};
use docserve::server::Pipeline;
use tempfile::TempDir;

pub const PAGE_HTML: &str = "<html>hi</html>";
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, 0x01, 0x02, 0xff];
pub const SCRIPT_OUTPUT: &str = "<html>it is time</html>";
pub const INERT_SCRIPT: &str = "echo this script should not run\n";

/// Document root used across the integration tests:
///
/// ```text
/// page.html
/// notes.txt
/// images/sample_1.png
/// images/sample_2.png
/// make_time.sh          allow-listed
/// other.sh              not allow-listed
/// ```
pub fn webroot() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    fs::write(root.join("page.html"), PAGE_HTML).unwrap();
    fs::write(root.join("notes.txt"), "plain notes").unwrap();
    fs::create_dir(root.join("images")).unwrap();
    fs::write(root.join("images/sample_1.png"), PNG_BYTES).unwrap();
    fs::write(root.join("images/sample_2.png"), PNG_BYTES).unwrap();
    fs::write(
        root.join("make_time.sh"),
        format!("printf '%s' '{}'\n", SCRIPT_OUTPUT),
    )
    .unwrap();
    fs::write(root.join("other.sh"), INERT_SCRIPT).unwrap();

    dir
}

/// Scripts are shell files run with `sh`; only `make_time.sh` may execute.
pub fn shell_scripts() -> ScriptConfig {
    ScriptConfig {
        extension: "sh".to_string(),
        interpreter: "sh".to_string(),
        allow_list: vec!["make_time.sh".to_string()],
    }
}

pub fn resolver(root: &Path) -> Resolver {
    let scripts = shell_scripts();
    let runner = ScriptRunner::with_interpreter(scripts.interpreter.clone());
    Resolver::new(root, &scripts, runner)
}

pub fn resolver_with(root: &Path, executor: Arc<dyn ScriptExecutor>) -> Resolver {
    Resolver::new(root, &shell_scripts(), ScriptRunner::new(executor))
}

pub fn pipeline(root: &Path) -> Pipeline {
    Pipeline::new(resolver(root))
}
