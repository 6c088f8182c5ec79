//! Content resolution
//!
//! This module maps request paths onto the document root and produces the
//! bytes that go into a 200 response: raw files, directory listings, or the
//! captured output of an allow-listed script.

pub mod resolver;
pub mod script;

pub use resolver::{EntryKind, Resolver};
pub use script::{CaptureBuffer, InterpreterExecutor, ScriptExecutor, ScriptRunner};

use std::path::PathBuf;

/// A response body and the content type it is served as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentResult {
    pub body: Vec<u8>,
    pub mime_type: String,
}

impl ContentResult {
    pub fn new(body: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// What a request path points at on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// A file served as-is
    RegularFile(PathBuf),
    /// A directory and its immediate children, relative to the document root
    Directory(PathBuf, Vec<String>),
    /// An allow-listed script to execute
    Script(PathBuf),
}
