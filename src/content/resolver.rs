//! Request path to content mapping
//!
//! A path is resolved by a single metadata lookup followed by one of three
//! reads: enumerate a directory, read a file, or hand an allow-listed script
//! to the [`ScriptRunner`].

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::config::{Config, ScriptConfig};
use crate::content::{ContentResult, ResolvedTarget, ScriptRunner};
use crate::error::{Result, ServeError};
use crate::http::mime::{self, TEXT_PLAIN};

/// What a location on disk turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    Directory,
    RegularFile,
}

impl EntryKind {
    /// Stats `location`, following symlinks.
    ///
    /// A path that runs through a regular file (`/page.html/x`) is reported
    /// as missing.
    pub async fn of(location: &Path) -> Result<Self> {
        match tokio::fs::metadata(location).await {
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::RegularFile),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(EntryKind::Missing)
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub struct Resolver {
    document_root: PathBuf,
    script_extension: String,
    allow_list: Vec<String>,
    runner: ScriptRunner,
}

impl Resolver {
    pub fn new(
        document_root: impl Into<PathBuf>,
        scripts: &ScriptConfig,
        runner: ScriptRunner,
    ) -> Self {
        Self {
            document_root: document_root.into(),
            script_extension: scripts.extension.trim_start_matches('.').to_string(),
            allow_list: scripts.allow_list.clone(),
            runner,
        }
    }

    /// Builds a resolver that runs scripts with the configured interpreter.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.document_root.clone(),
            &cfg.scripts,
            ScriptRunner::with_interpreter(cfg.scripts.interpreter.clone()),
        )
    }

    /// Maps a request path onto the document root.
    ///
    /// The path is appended as-is (no decoding, no normalization) except
    /// that any `..` segment is refused.
    pub fn locate(&self, path: &str) -> Result<PathBuf> {
        if path.split('/').any(|segment| segment == "..") {
            tracing::warn!(path, "Rejecting path with parent segment");
            return Err(ServeError::NotFound(path.to_string()));
        }

        Ok(self.document_root.join(path.trim_start_matches('/')))
    }

    /// True if `path` names an executable script: it must carry the script
    /// extension and, minus its first character, match an allow-list entry
    /// exactly. The first character is dropped whatever it is, so a path
    /// without a leading `/` never matches.
    pub fn is_allowed_script(&self, path: &str) -> bool {
        let has_extension = Path::new(path)
            .extension()
            .is_some_and(|ext| ext == self.script_extension.as_str());
        let mut chars = path.chars();
        chars.next();
        let name = chars.as_str();

        has_extension && self.allow_list.iter().any(|allowed| allowed == name)
    }

    /// Works out what `path` refers to without reading any file contents.
    pub async fn target(&self, path: &str) -> Result<ResolvedTarget> {
        let location = self.locate(path)?;

        match EntryKind::of(&location).await? {
            EntryKind::Missing => Err(ServeError::NotFound(path.to_string())),
            EntryKind::Directory => {
                let entries = self.list_directory(&location).await?;
                Ok(ResolvedTarget::Directory(location, entries))
            }
            EntryKind::RegularFile if self.is_allowed_script(path) => {
                Ok(ResolvedTarget::Script(location))
            }
            EntryKind::RegularFile => Ok(ResolvedTarget::RegularFile(location)),
        }
    }

    pub async fn resolve(&self, path: &str) -> Result<ContentResult> {
        match self.target(path).await? {
            ResolvedTarget::Directory(location, entries) => {
                tracing::debug!(
                    dir = %location.display(),
                    entries = entries.len(),
                    "Listing directory"
                );
                let listing: String = entries
                    .iter()
                    .map(|entry| format!("{}\r\n", entry))
                    .collect();
                Ok(ContentResult::new(listing, TEXT_PLAIN))
            }
            ResolvedTarget::Script(location) => self.runner.run(&location).await,
            ResolvedTarget::RegularFile(location) => {
                let body = tokio::fs::read(&location).await.map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        ServeError::NotFound(path.to_string())
                    } else {
                        ServeError::Io(e)
                    }
                })?;
                Ok(ContentResult::new(body, mime::guess(path)))
            }
        }
    }

    /// Immediate children of `dir` in enumeration order, each written
    /// relative to the document root with `/` separators.
    async fn list_directory(&self, dir: &Path) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let child = entry.path();
            let name = match child.strip_prefix(&self.document_root) {
                Ok(relative) => display_relative(relative),
                Err(_) => entry.file_name().to_string_lossy().into_owned(),
            };
            entries.push(name);
        }

        Ok(entries)
    }
}

fn display_relative(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
